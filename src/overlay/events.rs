/// Lifecycle events emitted by the overlay renderer during an engagement.
///
/// This is the renderer SDK's vocabulary; the sequencer never consumes these
/// directly — [`OverlaySession`](crate::overlay::OverlaySession) folds the
/// stream into a single terminal credit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// The engagement has started.
    AdStarted,
    /// The engagement is loaded and ready to show.
    AdDisplayed,
    /// A skip card was shown instead of an ad.
    SkipCardShown,
    /// The user started the engagement experience.
    OptIn,
    /// The user declined the choice card, explicitly or via timeout.
    OptOut,
    /// The user backed out of the ad, returning to the choice card.
    UserCancel,
    /// Sufficient interaction for an ad credit.
    AdFreePod,
    /// The engagement finished.
    AdCompleted,
    /// A renderer error forced the engagement closed.
    AdError,
    /// No engagement available; fall back to linear ads.
    NoAdsAvailable,
    /// The user backed out of the choice card and wants to leave the stream.
    UserCancelStream,
}

impl OverlayEvent {
    /// True for events that end the engagement.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OverlayEvent::AdCompleted
                | OverlayEvent::AdError
                | OverlayEvent::NoAdsAvailable
                | OverlayEvent::UserCancelStream
        )
    }
}
