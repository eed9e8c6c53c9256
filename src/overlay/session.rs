use crate::overlay::events::OverlayEvent;

/// Folds a renderer's event stream into a single terminal credit outcome.
///
/// Credit is granted only by an explicit [`OverlayEvent::AdFreePod`] before
/// the terminal event; a stream cancellation always resolves without credit,
/// even when credit had already been earned.
#[derive(Debug, Default)]
pub struct OverlaySession {
    credit_earned: bool,
}

impl OverlaySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one renderer event. Returns `Some(credit)` when the event is
    /// terminal; the session must not be fed further events after that.
    pub fn on_event(&mut self, event: OverlayEvent) -> Option<bool> {
        match event {
            OverlayEvent::AdFreePod => {
                self.credit_earned = true;
                None
            }
            OverlayEvent::AdCompleted | OverlayEvent::AdError | OverlayEvent::NoAdsAvailable => {
                Some(self.credit_earned)
            }
            OverlayEvent::UserCancelStream => Some(false),
            OverlayEvent::AdStarted
            | OverlayEvent::AdDisplayed
            | OverlayEvent::SkipCardShown
            | OverlayEvent::OptIn
            | OverlayEvent::OptOut
            | OverlayEvent::UserCancel => None,
        }
    }

    /// Whether an ad-free-pod signal has been seen so far.
    pub fn credit_earned(&self) -> bool {
        self.credit_earned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(events: &[OverlayEvent]) -> Option<bool> {
        let mut session = OverlaySession::new();
        let mut outcome = None;
        for &event in events {
            assert!(outcome.is_none(), "event after terminal outcome");
            outcome = session.on_event(event);
        }
        outcome
    }

    #[test]
    fn completion_without_credit() {
        assert_eq!(
            fold(&[OverlayEvent::AdStarted, OverlayEvent::AdCompleted]),
            Some(false)
        );
    }

    #[test]
    fn ad_free_pod_then_completion_grants_credit() {
        assert_eq!(
            fold(&[
                OverlayEvent::AdStarted,
                OverlayEvent::OptIn,
                OverlayEvent::AdFreePod,
                OverlayEvent::AdCompleted,
            ]),
            Some(true)
        );
    }

    #[test]
    fn error_terminates_with_recorded_credit() {
        assert_eq!(fold(&[OverlayEvent::AdError]), Some(false));
        assert_eq!(
            fold(&[OverlayEvent::AdFreePod, OverlayEvent::AdError]),
            Some(true)
        );
    }

    #[test]
    fn no_ads_available_terminates() {
        assert_eq!(fold(&[OverlayEvent::NoAdsAvailable]), Some(false));
    }

    #[test]
    fn cancel_stream_never_grants_credit() {
        // Even after AD_FREE_POD, backing out of the stream yields no credit
        assert_eq!(
            fold(&[OverlayEvent::AdFreePod, OverlayEvent::UserCancelStream]),
            Some(false)
        );
    }

    #[test]
    fn non_terminal_events_keep_session_open() {
        let mut session = OverlaySession::new();
        for event in [
            OverlayEvent::AdStarted,
            OverlayEvent::AdDisplayed,
            OverlayEvent::SkipCardShown,
            OverlayEvent::OptIn,
            OverlayEvent::OptOut,
            OverlayEvent::UserCancel,
        ] {
            assert_eq!(session.on_event(event), None, "{event:?} must not terminate");
        }
        assert!(!session.credit_earned());
    }
}
