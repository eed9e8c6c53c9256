//! Interface to the external interactive-overlay renderer.
//!
//! The renderer is a third-party SDK that draws a choice card over the
//! paused video and reports lifecycle events. The sequencer consumes none of
//! that vocabulary directly: [`OverlaySession`] reduces an engagement's
//! event stream to one terminal outcome — did the viewer earn credit or not.

pub mod events;
pub mod session;

pub use events::OverlayEvent;
pub use session::OverlaySession;

use crate::pod::item::AdType;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from starting an overlay engagement.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// No render surface is available to draw the overlay on.
    #[error("no render surface available for the overlay")]
    NoSurface,

    /// The current interactive ad carries no VAST config URL.
    #[error("interactive ad \"{ad_id}\" has no VAST config url")]
    MissingVastConfig { ad_id: String },

    /// The renderer SDK failed to initialize the engagement.
    #[error("overlay renderer failed to start: {0}")]
    RendererInit(String),
}

/// Renderer options derived from the ad type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Whether the engagement offers the user a way to leave the stream
    /// entirely. Only trueX choice cards support this; IDVx ads do not.
    pub supports_user_cancel_stream: bool,
}

impl OverlayOptions {
    pub fn for_ad_type(ad_type: AdType) -> Self {
        Self {
            supports_user_cancel_stream: ad_type == AdType::Truex,
        }
    }
}

/// Everything the renderer needs to start one engagement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRequest {
    pub vast_config_url: String,
    pub ad_type: AdType,
    pub options: OverlayOptions,
}

impl OverlayRequest {
    pub fn new(vast_config_url: impl Into<String>, ad_type: AdType) -> Self {
        Self {
            vast_config_url: vast_config_url.into(),
            ad_type,
            options: OverlayOptions::for_ad_type(ad_type),
        }
    }
}

/// The external overlay renderer SDK.
///
/// `start` begins one engagement and returns its event stream; the stream
/// ends with a terminal event (see [`OverlayEvent::is_terminal`]). Dropping
/// the receiver tears the engagement down. `pause`/`resume` forward
/// application lifecycle changes to an engagement in flight.
#[async_trait]
pub trait OverlayRenderer: Send + Sync {
    async fn start(
        &self,
        request: OverlayRequest,
    ) -> Result<mpsc::UnboundedReceiver<OverlayEvent>, OverlayError>;

    fn pause(&self) {}

    fn resume(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truex_requests_support_cancel_stream() {
        let request = OverlayRequest::new("https://get.truex.com/vast/config", AdType::Truex);
        assert!(request.options.supports_user_cancel_stream);
    }

    #[test]
    fn idvx_requests_do_not_support_cancel_stream() {
        let request = OverlayRequest::new("https://qa-get.truex.com/vast/config", AdType::Idvx);
        assert!(!request.options.supports_user_cancel_stream);
    }
}
