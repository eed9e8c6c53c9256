//! The ad-pod sequencing state machine.
//!
//! [`AdPodSequencer`] owns segment/ad progress for one advertising break. It
//! is a plain `&mut self` state machine driven by serialized external
//! callbacks — host player events, overlay completion, failsafe expiry — and
//! never executes two transitions concurrently. The async plumbing that
//! delivers those callbacks one at a time lives in [`runtime`].

pub mod failsafe;
pub mod runtime;

use crate::error::Result;
use crate::overlay::{OverlayError, OverlayRequest};
use crate::pod::item::{AdItem, AdType};
use crate::pod::segment::{build_segments, validate_pod, AdSegment, Timeline};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Guard before the end of an interactive placeholder video when seeking,
/// to avoid racing the host player's own end-of-item transition.
pub const SEEK_GUARD_MS: u64 = 100;

/// The failsafe timer bounds an overlay to this multiple of the ad's
/// nominal duration.
pub const FAILSAFE_FACTOR: u64 = 2;

/// Sequencer phase for the current break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodPhase {
    /// Pod configured (or nothing configured yet); playback not started.
    Idle,
    /// A segment timeline is playing on the host player.
    PlayingSegment,
    /// The player is paused and an interactive overlay owns the screen.
    OverlayActive,
    /// The break is over — normally or via credit-earned early exit.
    Complete,
}

/// The host side of an ad break: player commands and application
/// notifications issued by the sequencer.
pub trait AdBreakHost {
    /// Load and play a segment timeline. `notify_item_completions` is true
    /// for concatenated segments, whose internal item transitions must be
    /// reported back via `media_item_completed`.
    fn play(&mut self, timeline: &Timeline, notify_item_completions: bool);

    /// Seek to `position_ms` and pause there.
    fn seek_and_pause(&mut self, position_ms: u64);

    /// Resume playback from the current (paused) position.
    fn resume(&mut self);

    /// The break finished normally; resume main content.
    fn ad_pod_complete(&mut self);

    /// Credit earned — abandon remaining pod items and resume main content
    /// immediately.
    fn skip_to_content(&mut self);
}

/// One overlay launch: the renderer request, the failsafe bound, and the
/// generation number identifying this overlay instance. Completions must be
/// reported back as `overlay_finished(generation, credit)`; completions
/// carrying a stale generation are inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLaunch {
    pub request: OverlayRequest,
    pub failsafe_delay: Duration,
    pub generation: u64,
}

/// Owner of the single active overlay instance: renderer plus failsafe
/// timer, created and torn down together. The sequencer guarantees
/// `teardown` before any new `launch`.
pub trait OverlayGateway {
    fn launch(&mut self, launch: OverlayLaunch) -> std::result::Result<(), OverlayError>;

    /// Stop the active overlay and cancel its failsafe timer. Idempotent.
    fn teardown(&mut self);

    /// Forward an application pause to the active renderer, if any.
    fn pause(&mut self) {}

    /// Forward an application resume to the active renderer, if any.
    fn resume(&mut self) {}
}

/// The core ad-pod state machine.
pub struct AdPodSequencer<H, G> {
    host: H,
    gateway: G,
    segments: Vec<AdSegment>,
    segment_index: usize,
    ad_index: usize,
    credit_received: bool,
    phase: PodPhase,
    /// Generation of the active overlay, if one is in flight.
    active_overlay: Option<u64>,
    next_generation: u64,
}

impl<H: AdBreakHost, G: OverlayGateway> AdPodSequencer<H, G> {
    pub fn new(host: H, gateway: G) -> Self {
        Self {
            host,
            gateway,
            segments: Vec::new(),
            segment_index: 0,
            ad_index: 0,
            credit_received: false,
            phase: PodPhase::Idle,
            active_overlay: None,
            next_generation: 0,
        }
    }

    /// Configure a new ad pod for the upcoming break.
    ///
    /// Rejects pods violating the ordering rule (trueX anywhere but first,
    /// or more than one trueX) without touching existing state. On success,
    /// tears down any active overlay, rebuilds segments, and resets
    /// progress.
    pub fn set_ad_pod(&mut self, items: Vec<AdItem>) -> Result<()> {
        validate_pod(&items)?;

        self.cancel_overlay();
        let ad_count = items.len();
        self.segments = build_segments(items);
        self.segment_index = 0;
        self.ad_index = 0;
        self.credit_received = false;
        self.phase = PodPhase::Idle;
        info!(
            "ad pod configured: {} ads in {} segments",
            ad_count,
            self.segments.len()
        );
        Ok(())
    }

    /// Start (or restart) the configured break from the beginning.
    ///
    /// Any in-flight overlay and armed failsafe timer are torn down first.
    /// An empty pod completes immediately.
    pub fn start_ad_pod(&mut self) {
        self.cancel_overlay();
        self.segment_index = 0;
        self.ad_index = 0;
        self.credit_received = false;
        info!("starting ad pod");
        self.play_next_segment();
    }

    /// Host event: the current segment's timeline finished playing.
    pub fn on_playback_ended(&mut self) {
        if self.phase != PodPhase::PlayingSegment {
            debug!("playback_ended ignored in phase {:?}", self.phase);
            return;
        }
        self.segment_index += 1;
        self.play_next_segment();
    }

    /// Host event: the player auto-transitioned between items inside a
    /// concatenated segment.
    pub fn on_media_item_completed(&mut self) {
        if self.phase != PodPhase::PlayingSegment {
            debug!("media_item_completed ignored in phase {:?}", self.phase);
            return;
        }
        if self.current_ad().is_none() {
            debug!("media_item_completed with no current ad ignored");
            return;
        }
        self.advance_to_next_ad();
    }

    /// Overlay completion, from the gateway or the failsafe timer — both
    /// funnel through here, never both for the same overlay instance.
    pub fn overlay_finished(&mut self, generation: u64, credit: bool) {
        if self.active_overlay != Some(generation) {
            debug!(
                "stale overlay completion (generation {}, credit {}) ignored",
                generation, credit
            );
            return;
        }
        self.active_overlay = None;
        self.gateway.teardown();
        info!("overlay finished, credit: {}", credit);
        self.finish_overlay(credit);
    }

    /// Forward an application pause to the active overlay renderer.
    pub fn on_app_paused(&mut self) {
        self.gateway.pause();
    }

    /// Forward an application resume to the active overlay renderer.
    pub fn on_app_resumed(&mut self) {
        self.gateway.resume();
    }

    /// True when the current item hands control to an overlay. Host UIs use
    /// this to gate key handling while an engagement owns the screen.
    pub fn is_playing_interactive_ad(&self) -> bool {
        self.current_ad().is_some_and(AdItem::is_interactive)
    }

    pub fn phase(&self) -> PodPhase {
        self.phase
    }

    pub fn credit_received(&self) -> bool {
        self.credit_received
    }

    pub fn segments(&self) -> &[AdSegment] {
        &self.segments
    }

    fn current_segment(&self) -> Option<&AdSegment> {
        self.segments.get(self.segment_index)
    }

    fn current_ad(&self) -> Option<&AdItem> {
        self.current_segment().and_then(|s| s.ad(self.ad_index))
    }

    fn play_next_segment(&mut self) {
        let Some(segment) = self.segments.get(self.segment_index) else {
            info!("ad pod complete");
            self.phase = PodPhase::Complete;
            self.host.ad_pod_complete();
            return;
        };

        self.ad_index = 0;
        let timeline = segment.timeline().clone();
        let notify = segment.is_concatenated();
        info!(
            "playing segment {} ({} ads, concatenated: {})",
            self.segment_index,
            segment.len(),
            notify
        );
        self.phase = PodPhase::PlayingSegment;
        self.host.play(&timeline, notify);

        self.launch_overlay_if_interactive();
    }

    /// Advance internal progress to reflect the player finishing one ad.
    /// This does not drive the concatenated timeline forward — the player
    /// does that itself — it only tracks it, and launches the overlay when
    /// the newly current ad is interactive.
    fn advance_to_next_ad(&mut self) {
        let (concatenated, segment_len) = match self.current_segment() {
            Some(segment) => (segment.is_concatenated(), segment.len()),
            None => return,
        };

        if concatenated {
            self.ad_index += 1;
            if self.ad_index >= segment_len {
                self.segment_index += 1;
                self.play_next_segment();
            } else {
                self.launch_overlay_if_interactive();
            }
        } else {
            self.segment_index += 1;
            self.play_next_segment();
        }
    }

    fn launch_overlay_if_interactive(&mut self) {
        let Some(segment) = self.current_segment() else {
            return;
        };
        let Some(ad) = segment.ad(self.ad_index) else {
            return;
        };
        if !ad.is_interactive() {
            return;
        }

        let ad = ad.clone();
        let end_offset_ms = segment.end_offset_ms(self.ad_index);

        // Park the player just before the end of the interactive
        // placeholder, so resuming finishes the item almost immediately.
        self.host
            .seek_and_pause(end_offset_ms.saturating_sub(SEEK_GUARD_MS));

        match self.begin_overlay(&ad) {
            Ok(()) => {
                self.phase = PodPhase::OverlayActive;
            }
            Err(e) => {
                warn!("overlay launch failed for {}: {}", ad.ad_id, e);
                self.finish_overlay(false);
            }
        }
    }

    fn begin_overlay(&mut self, ad: &AdItem) -> std::result::Result<(), OverlayError> {
        let vast_config_url =
            ad.vast_config_url
                .clone()
                .ok_or_else(|| OverlayError::MissingVastConfig {
                    ad_id: ad.ad_id.clone(),
                })?;

        let generation = self.next_generation;
        self.next_generation += 1;

        info!(
            "launching overlay for {} ({:?}, generation {})",
            ad.ad_id,
            ad.ad_type(),
            generation
        );
        self.gateway.launch(OverlayLaunch {
            request: OverlayRequest::new(vast_config_url, ad.ad_type()),
            failsafe_delay: Duration::from_millis(ad.duration_ms() * FAILSAFE_FACTOR),
            generation,
        })?;
        self.active_overlay = Some(generation);
        Ok(())
    }

    /// Decide what a finished overlay means for the break, in order:
    /// IDVx inside a concatenated segment resumes the parked player
    /// regardless of credit; earned credit skips the rest of the pod;
    /// anything else advances to the next ad or segment.
    fn finish_overlay(&mut self, credit: bool) {
        let concatenated_idvx = self
            .current_ad()
            .is_some_and(|ad| ad.ad_type() == AdType::Idvx)
            && self
                .current_segment()
                .is_some_and(AdSegment::is_concatenated);
        if concatenated_idvx {
            // The placeholder was parked at T-100ms; the player's own
            // end-of-item transition finalizes index advancement.
            self.phase = PodPhase::PlayingSegment;
            self.host.resume();
            return;
        }

        if credit {
            self.credit_received = true;
            info!("credit received, skipping remaining ads");
            self.phase = PodPhase::Complete;
            self.host.skip_to_content();
            return;
        }

        self.advance_to_next_ad();
    }

    fn cancel_overlay(&mut self) {
        self.active_overlay = None;
        self.gateway.teardown();
    }
}
