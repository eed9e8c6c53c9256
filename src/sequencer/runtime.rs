//! Async plumbing around the core state machine.
//!
//! [`spawn`] runs an [`AdPodSequencer`] on a tokio task fed by one unbounded
//! event queue, so every external callback — host player events, overlay
//! completion, failsafe expiry — is applied one transition at a time.
//! [`PodController`] is the cloneable handle the host integration drives.

use crate::error::{PodError, Result};
use crate::overlay::{OverlayError, OverlayRenderer, OverlayRequest, OverlaySession};
use crate::pod::item::AdItem;
use crate::sequencer::failsafe::FailsafeTimer;
use crate::sequencer::{AdBreakHost, AdPodSequencer, OverlayGateway, OverlayLaunch};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Inputs serialized into the sequencer task.
enum PodEvent {
    SetPod {
        items: Vec<AdItem>,
        reply: oneshot::Sender<Result<()>>,
    },
    Start,
    PlaybackEnded,
    MediaItemCompleted,
    OverlayFinished { generation: u64, credit: bool },
    AppPaused,
    AppResumed,
}

/// Handle to a running sequencer task.
///
/// All methods enqueue an event; the task applies them in order. Methods
/// fail with [`PodError::SequencerGone`] once the task has shut down (every
/// controller clone dropped).
#[derive(Clone)]
pub struct PodController {
    events: mpsc::UnboundedSender<PodEvent>,
}

impl PodController {
    /// Configure a new ad pod, waiting for the validation outcome.
    pub async fn set_pod(&self, items: Vec<AdItem>) -> Result<()> {
        let (reply, outcome) = oneshot::channel();
        self.events
            .send(PodEvent::SetPod { items, reply })
            .map_err(|_| PodError::SequencerGone)?;
        outcome.await.map_err(|_| PodError::SequencerGone)?
    }

    /// Start (or restart) the configured break.
    pub fn start(&self) -> Result<()> {
        self.send(PodEvent::Start)
    }

    /// Host player event: the current segment's timeline finished.
    pub fn playback_ended(&self) -> Result<()> {
        self.send(PodEvent::PlaybackEnded)
    }

    /// Host player event: item auto-transition inside a concatenated
    /// segment.
    pub fn media_item_completed(&self) -> Result<()> {
        self.send(PodEvent::MediaItemCompleted)
    }

    /// Forward an application pause to the active overlay renderer.
    pub fn app_paused(&self) -> Result<()> {
        self.send(PodEvent::AppPaused)
    }

    /// Forward an application resume to the active overlay renderer.
    pub fn app_resumed(&self) -> Result<()> {
        self.send(PodEvent::AppResumed)
    }

    fn send(&self, event: PodEvent) -> Result<()> {
        self.events.send(event).map_err(|_| PodError::SequencerGone)
    }
}

/// Start a sequencer task for the given host integration and overlay
/// renderer.
///
/// The task lives as long as any [`PodController`] clone; internal overlay
/// and failsafe tasks hold only weak queue handles, so they never keep the
/// loop alive on their own. Dropping the last controller tears down any
/// in-flight overlay.
pub fn spawn<H>(host: H, renderer: Arc<dyn OverlayRenderer>) -> PodController
where
    H: AdBreakHost + Send + 'static,
{
    let (events, queue) = mpsc::unbounded_channel();
    let gateway = TokioOverlayGateway::new(renderer, events.downgrade());
    let sequencer = AdPodSequencer::new(host, gateway);
    tokio::spawn(run_event_loop(sequencer, queue));
    PodController { events }
}

async fn run_event_loop<H: AdBreakHost>(
    mut sequencer: AdPodSequencer<H, TokioOverlayGateway>,
    mut queue: mpsc::UnboundedReceiver<PodEvent>,
) {
    while let Some(event) = queue.recv().await {
        match event {
            PodEvent::SetPod { items, reply } => {
                let _ = reply.send(sequencer.set_ad_pod(items));
            }
            PodEvent::Start => sequencer.start_ad_pod(),
            PodEvent::PlaybackEnded => sequencer.on_playback_ended(),
            PodEvent::MediaItemCompleted => sequencer.on_media_item_completed(),
            PodEvent::OverlayFinished { generation, credit } => {
                sequencer.overlay_finished(generation, credit);
            }
            PodEvent::AppPaused => sequencer.on_app_paused(),
            PodEvent::AppResumed => sequencer.on_app_resumed(),
        }
    }
    debug!("sequencer event loop shutting down");
}

/// Tokio-backed overlay gateway.
///
/// Owns the single active overlay as one bundle: the renderer-driving task
/// and the armed failsafe timer, cancelled together on teardown. Both
/// completion sources funnel back into the event queue as
/// `OverlayFinished` tagged with the launch generation, so a late failsafe
/// can never race a renderer completion for the same instance.
struct TokioOverlayGateway {
    renderer: Arc<dyn OverlayRenderer>,
    events: mpsc::WeakUnboundedSender<PodEvent>,
    failsafe: FailsafeTimer,
    active: Option<CancellationToken>,
}

impl TokioOverlayGateway {
    fn new(renderer: Arc<dyn OverlayRenderer>, events: mpsc::WeakUnboundedSender<PodEvent>) -> Self {
        Self {
            renderer,
            events,
            failsafe: FailsafeTimer::new(),
            active: None,
        }
    }
}

impl OverlayGateway for TokioOverlayGateway {
    fn launch(&mut self, launch: OverlayLaunch) -> std::result::Result<(), OverlayError> {
        self.teardown();

        let OverlayLaunch {
            request,
            failsafe_delay,
            generation,
        } = launch;

        let events = self.events.clone();
        self.failsafe.arm(failsafe_delay, move || {
            warn!(
                "overlay failsafe fired for generation {}, forcing no-credit completion",
                generation
            );
            if let Some(events) = events.upgrade() {
                let _ = events.send(PodEvent::OverlayFinished {
                    generation,
                    credit: false,
                });
            }
        });

        let token = CancellationToken::new();
        let renderer = Arc::clone(&self.renderer);
        let events = self.events.clone();
        let task_token = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!("overlay task cancelled (generation {})", generation);
                }
                credit = drive_overlay(renderer, request) => {
                    if let Some(events) = events.upgrade() {
                        let _ = events.send(PodEvent::OverlayFinished { generation, credit });
                    }
                }
            }
        });

        self.active = Some(token);
        Ok(())
    }

    fn teardown(&mut self) {
        self.failsafe.cancel();
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }

    fn pause(&mut self) {
        if self.active.is_some() {
            self.renderer.pause();
        }
    }

    fn resume(&mut self) {
        if self.active.is_some() {
            self.renderer.resume();
        }
    }
}

impl Drop for TokioOverlayGateway {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Run one engagement to its terminal credit outcome.
///
/// A renderer that fails to start, or whose event stream closes without a
/// terminal event, resolves to no credit; a renderer that stays silent is
/// bounded by the failsafe timer instead.
async fn drive_overlay(renderer: Arc<dyn OverlayRenderer>, request: OverlayRequest) -> bool {
    let mut stream = match renderer.start(request).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("overlay renderer failed to start: {}", e);
            return false;
        }
    };

    let mut session = OverlaySession::new();
    while let Some(event) = stream.recv().await {
        debug!("overlay event: {:?}", event);
        if let Some(credit) = session.on_event(event) {
            return credit;
        }
    }

    warn!("overlay event stream closed without a terminal event");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pod::provider::SamplePodProvider;
    use crate::pod::segment::Timeline;

    struct NullHost;

    impl AdBreakHost for NullHost {
        fn play(&mut self, _timeline: &Timeline, _notify_item_completions: bool) {}
        fn seek_and_pause(&mut self, _position_ms: u64) {}
        fn resume(&mut self) {}
        fn ad_pod_complete(&mut self) {}
        fn skip_to_content(&mut self) {}
    }

    struct UnusedRenderer;

    #[async_trait::async_trait]
    impl OverlayRenderer for UnusedRenderer {
        async fn start(
            &self,
            _request: OverlayRequest,
        ) -> std::result::Result<mpsc::UnboundedReceiver<crate::overlay::OverlayEvent>, OverlayError>
        {
            Err(OverlayError::NoSurface)
        }
    }

    #[tokio::test]
    async fn set_pod_accepts_valid_pod() {
        let controller = spawn(NullHost, Arc::new(UnusedRenderer));
        let result = controller.set_pod(SamplePodProvider::preroll_pod()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn set_pod_propagates_validation_errors() {
        let controller = spawn(NullHost, Arc::new(UnusedRenderer));
        let mut pod = SamplePodProvider::preroll_pod();
        pod.rotate_left(1); // trueX no longer first

        let result = controller.set_pod(pod).await;
        assert!(matches!(result, Err(PodError::TruexNotFirst { .. })));
    }

    #[tokio::test]
    async fn controller_reports_sequencer_gone() {
        let (events, queue) = mpsc::unbounded_channel();
        drop(queue);
        let controller = PodController { events };

        assert!(matches!(controller.start(), Err(PodError::SequencerGone)));
        assert!(matches!(
            controller.set_pod(Vec::new()).await,
            Err(PodError::SequencerGone)
        ));
    }
}
