use podcue::config::{Config, PodSource};
use podcue::pod::{AdItem, FilePodProvider, PodProvider, SamplePodProvider};
use podcue::sequencer::runtime;
use podcue::sim::{PlayerSim, ScriptedOverlayRenderer, SimulatedPlayer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Setup logging
    tracing_subscriber::fmt::init();

    info!("🚀 Starting Podcue - simulated ad break");

    let config = Config::from_env();
    info!(
        "Pod source: {:?}, overlay outcome: {:?}, time scale: {}x",
        config.pod_source, config.overlay_outcome, config.time_scale
    );

    let pod = match load_pod(&config).await {
        Ok(pod) => pod,
        Err(e) => {
            error!("Failed to load ad pod: {}", e);
            std::process::exit(1);
        }
    };

    let (player, commands) = SimulatedPlayer::new();
    let renderer = Arc::new(ScriptedOverlayRenderer::new(
        config.overlay_outcome,
        Duration::from_secs(config.overlay_engagement_secs),
    ));
    let controller = runtime::spawn(player, renderer);

    if let Err(e) = controller.set_pod(pod).await {
        error!("Failed to configure ad pod: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = controller.start() {
        error!("Failed to start ad pod: {}", e);
        std::process::exit(1);
    }

    let outcome = PlayerSim::new(controller, commands, config.time_scale)
        .run()
        .await;
    info!("Ad break finished: {:?}", outcome);
}

async fn load_pod(config: &Config) -> podcue::Result<Vec<AdItem>> {
    match &config.pod_source {
        PodSource::Sample => SamplePodProvider::new().ad_break().await,
        PodSource::File(path) => FilePodProvider::new(path.clone()).ad_break().await,
    }
}
