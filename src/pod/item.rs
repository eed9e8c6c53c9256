use serde::{Deserialize, Serialize};

/// Ad system string that classifies an ad as a trueX choice card.
pub const TRUEX_AD_SYSTEM: &str = "trueX";

/// Ad system string that classifies an ad as an IDVx interactive ad.
pub const IDVX_AD_SYSTEM: &str = "IDVx";

/// Creative classification derived from the ad system string.
///
/// Interactive types hand control to the overlay renderer instead of playing
/// their video to completion; trueX can award viewing credit, IDVx cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdType {
    Truex,
    Idvx,
    Regular,
}

impl AdType {
    /// True for types that pause the player and launch an overlay.
    pub fn is_interactive(self) -> bool {
        matches!(self, AdType::Truex | AdType::Idvx)
    }
}

/// A single advertising creative within an ad pod.
///
/// Field names follow the delivered JSON (camelCase); `position` is the
/// 1-based ordinal in the pod as delivered by the ad server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdItem {
    /// Ad network/vendor identifier; drives the type classification.
    pub ad_system: String,
    /// Location of the creative's (placeholder) video.
    pub ad_url: String,
    /// VAST config URL; present for interactive types only.
    #[serde(default)]
    pub vast_config_url: Option<String>,
    /// Nominal playable length in seconds.
    pub duration_secs: u32,
    /// 1-based ordinal in the pod as delivered.
    pub position: u32,
    /// Opaque creative identifier.
    pub ad_id: String,
}

impl AdItem {
    pub fn new(
        ad_system: impl Into<String>,
        ad_url: impl Into<String>,
        vast_config_url: Option<String>,
        duration_secs: u32,
        position: u32,
        ad_id: impl Into<String>,
    ) -> Self {
        Self {
            ad_system: ad_system.into(),
            ad_url: ad_url.into(),
            vast_config_url,
            duration_secs,
            position,
            ad_id: ad_id.into(),
        }
    }

    /// Classification derived from the ad system string (exact match; any
    /// unrecognized system is a regular video ad).
    pub fn ad_type(&self) -> AdType {
        match self.ad_system.as_str() {
            TRUEX_AD_SYSTEM => AdType::Truex,
            IDVX_AD_SYSTEM => AdType::Idvx,
            _ => AdType::Regular,
        }
    }

    /// True for ads that launch an interactive overlay.
    pub fn is_interactive(&self) -> bool {
        self.ad_type().is_interactive()
    }

    /// True for plain video ads.
    pub fn is_regular(&self) -> bool {
        self.ad_type() == AdType::Regular
    }

    /// Nominal duration in milliseconds (the placeholder extent used for
    /// timeline offsets).
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration_secs) * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(ad_system: &str) -> AdItem {
        AdItem::new(ad_system, "https://ads.example.com/a.mp4", None, 30, 1, "a")
    }

    #[test]
    fn truex_classified_by_exact_match() {
        assert_eq!(item("trueX").ad_type(), AdType::Truex);
        // Case matters — near-misses are regular ads
        assert_eq!(item("truex").ad_type(), AdType::Regular);
        assert_eq!(item("TrueX").ad_type(), AdType::Regular);
    }

    #[test]
    fn idvx_classified_by_exact_match() {
        assert_eq!(item("IDVx").ad_type(), AdType::Idvx);
        assert_eq!(item("idvx").ad_type(), AdType::Regular);
    }

    #[test]
    fn unknown_systems_are_regular() {
        assert_eq!(item("GDFP").ad_type(), AdType::Regular);
        assert_eq!(item("").ad_type(), AdType::Regular);
    }

    #[test]
    fn interactive_predicates() {
        assert!(item("trueX").is_interactive());
        assert!(item("IDVx").is_interactive());
        assert!(!item("GDFP").is_interactive());
        assert!(item("GDFP").is_regular());
        assert!(!item("trueX").is_regular());
    }

    #[test]
    fn duration_ms_scales_seconds() {
        let ad = AdItem::new("GDFP", "https://a", None, 32, 1, "a");
        assert_eq!(ad.duration_ms(), 32_000);
    }

    #[test]
    fn deserializes_camel_case_json() {
        let json = r#"{
            "adSystem": "trueX",
            "adUrl": "https://media.truex.com/m/video/placeholder-30s.mp4",
            "vastConfigUrl": "https://get.truex.com/vast/config",
            "durationSecs": 30,
            "position": 1,
            "adId": "truex-preroll"
        }"#;
        let ad: AdItem = serde_json::from_str(json).unwrap();
        assert_eq!(ad.ad_type(), AdType::Truex);
        assert_eq!(ad.duration_secs, 30);
        assert_eq!(
            ad.vast_config_url.as_deref(),
            Some("https://get.truex.com/vast/config")
        );
    }

    #[test]
    fn vast_config_url_optional_in_json() {
        let json = r#"{
            "adSystem": "GDFP",
            "adUrl": "https://ads.example.com/spot.mp4",
            "durationSecs": 15,
            "position": 3,
            "adId": "spot-3"
        }"#;
        let ad: AdItem = serde_json::from_str(json).unwrap();
        assert_eq!(ad.vast_config_url, None);
        assert!(ad.is_regular());
    }
}
