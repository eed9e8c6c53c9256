use crate::sim::ScriptedOutcome;
use std::env;
use std::path::PathBuf;

/// Where the demo harness gets its ad pod.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PodSource {
    /// Built-in sample preroll pod.
    Sample,
    /// JSON file containing an array of ad items.
    File(PathBuf),
}

/// Demo harness configuration loaded from environment variables.
///
/// Every variable has a default, so the simulator runs with no setup:
/// - `POD_SOURCE`: `sample` (default) or a path to a pod JSON file
/// - `TIME_SCALE`: playback compression factor (default 100 — a 30 s ad
///   plays out in 300 ms)
/// - `OVERLAY_OUTCOME`: `credit`, `no-credit` (default), `cancel-stream`,
///   `timeout`, or `unavailable`
/// - `OVERLAY_ENGAGEMENT_SECS`: scripted engagement length (default 5)
#[derive(Clone, Debug)]
pub struct Config {
    pub pod_source: PodSource,
    pub time_scale: u64,
    pub overlay_outcome: ScriptedOutcome,
    pub overlay_engagement_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults above for anything unset or unparseable.
    pub fn from_env() -> Self {
        let pod_source = match env::var("POD_SOURCE") {
            Ok(value) if !value.is_empty() && value.to_lowercase() != "sample" => {
                PodSource::File(PathBuf::from(value))
            }
            _ => PodSource::Sample,
        };

        let time_scale = env::var("TIME_SCALE")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .unwrap_or(100);

        let overlay_outcome = match env::var("OVERLAY_OUTCOME")
            .unwrap_or_else(|_| "no-credit".to_string())
            .to_lowercase()
            .as_str()
        {
            "credit" => ScriptedOutcome::CompleteWithCredit,
            "cancel-stream" | "cancel" => ScriptedOutcome::CancelStream,
            "timeout" | "silent" => ScriptedOutcome::Silent,
            "unavailable" => ScriptedOutcome::Unavailable,
            _ => ScriptedOutcome::CompleteWithoutCredit,
        };

        let overlay_engagement_secs = env::var("OVERLAY_ENGAGEMENT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);

        Config {
            pod_source,
            time_scale,
            overlay_outcome,
            overlay_engagement_secs,
        }
    }
}
