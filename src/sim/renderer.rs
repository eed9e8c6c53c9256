use crate::overlay::{OverlayError, OverlayEvent, OverlayRenderer, OverlayRequest};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::info;

/// Terminal behavior of a scripted engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedOutcome {
    /// Complete after the engagement delay with credit earned.
    CompleteWithCredit,
    /// Complete after the engagement delay without credit.
    CompleteWithoutCredit,
    /// The user backs out of the stream after the delay; never credits.
    CancelStream,
    /// Never emit a terminal event — the failsafe timer must end it.
    Silent,
    /// Fail to start, as if no render surface were available.
    Unavailable,
}

/// Overlay renderer double that plays out a fixed engagement script.
#[derive(Debug, Clone)]
pub struct ScriptedOverlayRenderer {
    outcome: ScriptedOutcome,
    engagement: Duration,
}

impl ScriptedOverlayRenderer {
    pub fn new(outcome: ScriptedOutcome, engagement: Duration) -> Self {
        Self {
            outcome,
            engagement,
        }
    }
}

#[async_trait]
impl OverlayRenderer for ScriptedOverlayRenderer {
    async fn start(
        &self,
        request: OverlayRequest,
    ) -> Result<mpsc::UnboundedReceiver<OverlayEvent>, OverlayError> {
        if self.outcome == ScriptedOutcome::Unavailable {
            return Err(OverlayError::NoSurface);
        }

        info!(
            "scripted overlay: starting {:?} engagement ({:?})",
            request.ad_type, self.outcome
        );
        let (events, stream) = mpsc::unbounded_channel();
        let outcome = self.outcome;
        let engagement = self.engagement;

        tokio::spawn(async move {
            let _ = events.send(OverlayEvent::AdStarted);
            let _ = events.send(OverlayEvent::AdDisplayed);

            if outcome == ScriptedOutcome::Silent {
                // Hold the engagement open until the gateway tears it down
                events.closed().await;
                return;
            }

            sleep(engagement).await;
            match outcome {
                ScriptedOutcome::CompleteWithCredit => {
                    let _ = events.send(OverlayEvent::OptIn);
                    let _ = events.send(OverlayEvent::AdFreePod);
                    let _ = events.send(OverlayEvent::AdCompleted);
                }
                ScriptedOutcome::CompleteWithoutCredit => {
                    let _ = events.send(OverlayEvent::OptOut);
                    let _ = events.send(OverlayEvent::AdCompleted);
                }
                ScriptedOutcome::CancelStream => {
                    let _ = events.send(OverlayEvent::UserCancelStream);
                }
                ScriptedOutcome::Silent | ScriptedOutcome::Unavailable => unreachable!(),
            }
        });

        Ok(stream)
    }
}
