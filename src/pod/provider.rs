use crate::error::{PodError, Result};
use crate::pod::item::AdItem;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Trait for ad pod sources.
///
/// Implementations deliver the ordered list of creatives for an upcoming ad
/// break. This abstraction keeps the sequencer decoupled from where pod
/// metadata comes from (built-in sample, file, ad server, ...).
#[async_trait]
pub trait PodProvider: Send + Sync {
    /// Fetch the ad pod for the next break, in delivery order.
    async fn ad_break(&self) -> Result<Vec<AdItem>>;
}

/// Built-in sample pod with mixed ad types, for demos and tests.
///
/// Position 1 is a trueX choice card (a trueX ad must always be first),
/// position 2 an IDVx interactive ad, positions 3-4 regular video ads.
#[derive(Clone, Debug, Default)]
pub struct SamplePodProvider;

impl SamplePodProvider {
    pub fn new() -> Self {
        Self
    }

    /// The sample preroll break, synchronously.
    pub fn preroll_pod() -> Vec<AdItem> {
        vec![
            AdItem::new(
                "trueX",
                "https://media.truex.com/m/video/truexloadingplaceholder-30s.mp4",
                Some("https://get.truex.com/88ac681ba8d0458e413dc22374194ab9f60b6664/vast/config?dimension_5=PI-2449-ctv-ad".to_string()),
                30,
                1,
                "truex-preroll",
            ),
            AdItem::new(
                "IDVx",
                "https://qa-media.truex.com/m/video/truexloadingplaceholder-30s.mp4",
                Some("https://qa-get.truex.com/eb9f752aeab71d71dd129da48ed98206e53a96dd/vast/config".to_string()),
                30,
                2,
                "idvx-preroll",
            ),
            AdItem::new(
                "GDFP",
                "http://media.truex.com/file_assets/2019-01-30/7fe9da33-6b9e-446d-816d-e1aec51a3173.mp4",
                None,
                30,
                3,
                "airline-preroll",
            ),
            AdItem::new(
                "GDFP",
                "http://media.truex.com/file_assets/2019-01-30/742eb926-6ec0-48b4-b1e6-093cee334dd1.mp4",
                None,
                30,
                4,
                "pets-preroll",
            ),
        ]
    }
}

#[async_trait]
impl PodProvider for SamplePodProvider {
    async fn ad_break(&self) -> Result<Vec<AdItem>> {
        let pod = Self::preroll_pod();
        info!("SamplePodProvider: serving built-in pod of {} ads", pod.len());
        Ok(pod)
    }
}

/// Pod source backed by a JSON file containing an array of ad items.
#[derive(Clone, Debug)]
pub struct FilePodProvider {
    path: PathBuf,
}

impl FilePodProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PodProvider for FilePodProvider {
    async fn ad_break(&self) -> Result<Vec<AdItem>> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| PodError::PodFileRead {
                path: self.path.display().to_string(),
                source,
            })?;
        let pod: Vec<AdItem> = serde_json::from_str(&body)?;
        info!(
            "FilePodProvider: loaded pod of {} ads from {}",
            pod.len(),
            self.path.display()
        );
        Ok(pod)
    }
}
