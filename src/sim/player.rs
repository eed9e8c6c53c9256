use crate::pod::segment::Timeline;
use crate::sequencer::runtime::PodController;
use crate::sequencer::AdBreakHost;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info};

/// One sequencer command as observed by the simulated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Play {
        timeline: Timeline,
        notify_item_completions: bool,
    },
    SeekAndPause {
        position_ms: u64,
    },
    Resume,
    PodComplete,
    SkipToContent,
}

/// Host integration that records every sequencer command into a channel,
/// for [`PlayerSim`] (or a test) to consume.
pub struct SimulatedPlayer {
    commands: mpsc::UnboundedSender<HostCommand>,
}

impl SimulatedPlayer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostCommand>) {
        let (commands, queue) = mpsc::unbounded_channel();
        (Self { commands }, queue)
    }
}

impl AdBreakHost for SimulatedPlayer {
    fn play(&mut self, timeline: &Timeline, notify_item_completions: bool) {
        let _ = self.commands.send(HostCommand::Play {
            timeline: timeline.clone(),
            notify_item_completions,
        });
    }

    fn seek_and_pause(&mut self, position_ms: u64) {
        let _ = self.commands.send(HostCommand::SeekAndPause { position_ms });
    }

    fn resume(&mut self) {
        let _ = self.commands.send(HostCommand::Resume);
    }

    fn ad_pod_complete(&mut self) {
        let _ = self.commands.send(HostCommand::PodComplete);
    }

    fn skip_to_content(&mut self) {
        let _ = self.commands.send(HostCommand::SkipToContent);
    }
}

/// Why a simulated break ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOutcome {
    /// Normal end of break.
    PodComplete,
    /// Credit-earned early exit.
    SkippedToContent,
    /// The sequencer went away before the break ended.
    Aborted,
}

/// Replays the command stream the way a real video player would.
///
/// Tracks a position inside the current timeline, honors seek-and-pause and
/// resume, and reports item transitions (only when the play command asked
/// for them) and timeline ends back to the sequencer. Placeholder durations
/// are compressed by `time_scale` so a 30-second ad plays out in fractions
/// of a second.
pub struct PlayerSim {
    controller: PodController,
    commands: mpsc::UnboundedReceiver<HostCommand>,
    time_scale: u64,
    /// Cumulative end offsets of the current timeline's entries.
    boundaries: Vec<u64>,
    next_boundary: usize,
    position_ms: u64,
    playing: bool,
    notify_item_completions: bool,
}

impl PlayerSim {
    pub fn new(
        controller: PodController,
        commands: mpsc::UnboundedReceiver<HostCommand>,
        time_scale: u64,
    ) -> Self {
        Self {
            controller,
            commands,
            time_scale: time_scale.max(1),
            boundaries: Vec::new(),
            next_boundary: 0,
            position_ms: 0,
            playing: false,
            notify_item_completions: false,
        }
    }

    /// Drive the break until it completes, skips to content, or the
    /// sequencer goes away.
    pub async fn run(mut self) -> SimOutcome {
        loop {
            let gap_ms = self.gap_to_next_boundary();
            let wait = self.scaled(gap_ms.unwrap_or(0));
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        return SimOutcome::Aborted;
                    };
                    if let Some(outcome) = self.apply(command) {
                        return outcome;
                    }
                }
                _ = sleep(wait), if gap_ms.is_some() => {
                    if self.cross_boundary().is_err() {
                        return SimOutcome::Aborted;
                    }
                }
            }
        }
    }

    fn apply(&mut self, command: HostCommand) -> Option<SimOutcome> {
        match command {
            HostCommand::Play {
                timeline,
                notify_item_completions,
            } => {
                let mut end = 0;
                self.boundaries = timeline
                    .entries()
                    .iter()
                    .map(|entry| {
                        end += entry.duration_ms;
                        end
                    })
                    .collect();
                self.next_boundary = 0;
                self.position_ms = 0;
                self.playing = true;
                self.notify_item_completions = notify_item_completions;
                debug!(
                    "sim player: playing timeline of {} entries ({}ms)",
                    timeline.entries().len(),
                    end
                );
                None
            }
            HostCommand::SeekAndPause { position_ms } => {
                self.position_ms = position_ms;
                self.next_boundary = self.boundaries.partition_point(|b| *b <= position_ms);
                self.playing = false;
                debug!("sim player: paused at {}ms", position_ms);
                None
            }
            HostCommand::Resume => {
                self.playing = true;
                debug!("sim player: resumed at {}ms", self.position_ms);
                None
            }
            HostCommand::PodComplete => {
                info!("sim player: ad pod complete, back to content");
                Some(SimOutcome::PodComplete)
            }
            HostCommand::SkipToContent => {
                info!("sim player: skipping to content");
                Some(SimOutcome::SkippedToContent)
            }
        }
    }

    /// Advance to the next item boundary, reporting it to the sequencer.
    fn cross_boundary(&mut self) -> crate::error::Result<()> {
        let boundary = self.boundaries[self.next_boundary];
        self.position_ms = boundary;
        self.next_boundary += 1;

        if self.next_boundary >= self.boundaries.len() {
            debug!("sim player: timeline ended at {}ms", boundary);
            self.playing = false;
            self.controller.playback_ended()
        } else if self.notify_item_completions {
            debug!("sim player: item transition at {}ms", boundary);
            self.controller.media_item_completed()
        } else {
            Ok(())
        }
    }

    fn gap_to_next_boundary(&self) -> Option<u64> {
        if !self.playing {
            return None;
        }
        self.boundaries
            .get(self.next_boundary)
            .map(|boundary| boundary - self.position_ms)
    }

    fn scaled(&self, gap_ms: u64) -> Duration {
        Duration::from_millis(gap_ms / self.time_scale)
    }
}
