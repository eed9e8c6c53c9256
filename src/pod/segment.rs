//! Pod segmentation and timeline offsets.
//!
//! A pod plays as one or two host-player timelines: an optional individual
//! segment for a leading trueX ad, then a single concatenated segment for
//! everything else. The timeline records each creative at its nominal
//! duration as a placeholder extent — offsets computed here are used for
//! seeking inside the concatenated source, not for real playback length.

use crate::error::{PodError, Result};
use crate::pod::item::{AdItem, AdType};

/// One entry in a combined playback timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    /// Location of the creative's video.
    pub uri: String,
    /// Placeholder extent in milliseconds (actual media duration may differ).
    pub duration_ms: u64,
}

/// Opaque handle to a pre-built playback timeline, handed to the host player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    fn from_items(items: &[AdItem]) -> Self {
        let entries = items
            .iter()
            .map(|ad| TimelineEntry {
                uri: ad.ad_url.clone(),
                duration_ms: ad.duration_ms(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Total placeholder extent of the timeline.
    pub fn total_duration_ms(&self) -> u64 {
        self.entries.iter().map(|e| e.duration_ms).sum()
    }
}

/// A maximal run of pod items played back as one host-player timeline.
#[derive(Debug, Clone)]
pub struct AdSegment {
    ads: Vec<AdItem>,
    timeline: Timeline,
    concatenated: bool,
}

impl AdSegment {
    /// Build a concatenated segment combining every item's source at its
    /// placeholder duration.
    pub fn concatenated(ads: Vec<AdItem>) -> Self {
        let timeline = Timeline::from_items(&ads);
        Self {
            ads,
            timeline,
            concatenated: true,
        }
    }

    /// Build an individual segment for a single standalone item.
    pub fn individual(ad: AdItem) -> Self {
        let timeline = Timeline::from_items(std::slice::from_ref(&ad));
        Self {
            ads: vec![ad],
            timeline,
            concatenated: false,
        }
    }

    pub fn ads(&self) -> &[AdItem] {
        &self.ads
    }

    pub fn ad(&self, index: usize) -> Option<&AdItem> {
        self.ads.get(index)
    }

    pub fn len(&self) -> usize {
        self.ads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }

    pub fn is_concatenated(&self) -> bool {
        self.concatenated
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Position where the ad at `ad_index` ends inside this segment's
    /// timeline: the inclusive prefix sum of placeholder durations.
    ///
    /// Always 0 for an individual segment — its single item starts the
    /// timeline, so there is no interior offset to seek to.
    pub fn end_offset_ms(&self, ad_index: usize) -> u64 {
        if !self.concatenated {
            return 0;
        }
        self.ads
            .iter()
            .take(ad_index + 1)
            .map(AdItem::duration_ms)
            .sum()
    }
}

/// Reject pods that violate the ordering rule: at most one trueX ad, and if
/// present it must open the pod. The segmenter only inspects index 0, so
/// misplaced trueX items would otherwise be silently misclassified.
pub fn validate_pod(items: &[AdItem]) -> Result<()> {
    let truex_count = items
        .iter()
        .filter(|ad| ad.ad_type() == AdType::Truex)
        .count();
    if truex_count > 1 {
        return Err(PodError::MultipleTruex { count: truex_count });
    }
    if let Some((index, ad)) = items
        .iter()
        .enumerate()
        .find(|(_, ad)| ad.ad_type() == AdType::Truex)
    {
        if index != 0 {
            return Err(PodError::TruexNotFirst {
                ad_id: ad.ad_id.clone(),
                index,
            });
        }
    }
    Ok(())
}

/// Partition an ordered pod into playback segments.
///
/// A leading trueX ad gets its own individual segment; all remaining items
/// (regardless of type, IDVx included) form one concatenated segment. With
/// no trueX ad the whole pod is a single concatenated segment. Callers must
/// run [`validate_pod`] first; this function only inspects index 0.
pub fn build_segments(items: Vec<AdItem>) -> Vec<AdSegment> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut items = items;
    if items[0].ad_type() == AdType::Truex {
        let rest = items.split_off(1);
        let truex = items.remove(0);
        let mut segments = vec![AdSegment::individual(truex)];
        if !rest.is_empty() {
            segments.push(AdSegment::concatenated(rest));
        }
        segments
    } else {
        vec![AdSegment::concatenated(items)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad(ad_system: &str, duration_secs: u32, position: u32) -> AdItem {
        AdItem::new(
            ad_system,
            format!("https://ads.example.com/{position}.mp4"),
            None,
            duration_secs,
            position,
            format!("ad-{position}"),
        )
    }

    #[test]
    fn empty_pod_yields_no_segments() {
        assert!(build_segments(Vec::new()).is_empty());
    }

    #[test]
    fn pod_without_truex_is_one_concatenated_segment() {
        let pod = vec![ad("IDVx", 30, 1), ad("GDFP", 30, 2), ad("GDFP", 15, 3)];
        let segments = build_segments(pod.clone());

        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_concatenated());
        assert_eq!(segments[0].ads(), pod.as_slice());
    }

    #[test]
    fn truex_only_pod_is_one_individual_segment() {
        let segments = build_segments(vec![ad("trueX", 30, 1)]);

        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_concatenated());
        assert_eq!(segments[0].len(), 1);
    }

    #[test]
    fn leading_truex_splits_into_two_segments() {
        let pod = vec![
            ad("trueX", 30, 1),
            ad("IDVx", 30, 2),
            ad("GDFP", 30, 3),
            ad("GDFP", 30, 4),
        ];
        let segments = build_segments(pod.clone());

        assert_eq!(segments.len(), 2);
        assert!(!segments[0].is_concatenated());
        assert_eq!(segments[0].ads(), &pod[..1]);
        assert!(segments[1].is_concatenated());
        assert_eq!(segments[1].ads(), &pod[1..]);
    }

    #[test]
    fn segments_cover_all_items_in_order() {
        let pod = vec![ad("trueX", 30, 1), ad("GDFP", 20, 2), ad("GDFP", 10, 3)];
        let segments = build_segments(pod.clone());

        let flattened: Vec<AdItem> = segments
            .iter()
            .flat_map(|s| s.ads().iter().cloned())
            .collect();
        assert_eq!(flattened, pod);
    }

    #[test]
    fn end_offset_is_inclusive_prefix_sum() {
        let segment =
            AdSegment::concatenated(vec![ad("IDVx", 30, 1), ad("GDFP", 20, 2), ad("GDFP", 10, 3)]);

        assert_eq!(segment.end_offset_ms(0), 30_000);
        assert_eq!(segment.end_offset_ms(1), 50_000);
        assert_eq!(segment.end_offset_ms(2), 60_000);
    }

    #[test]
    fn end_offset_is_monotone() {
        let segment = AdSegment::concatenated(vec![
            ad("GDFP", 5, 1),
            ad("GDFP", 0, 2),
            ad("GDFP", 12, 3),
        ]);

        let offsets: Vec<u64> = (0..segment.len()).map(|i| segment.end_offset_ms(i)).collect();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]), "{offsets:?}");
    }

    #[test]
    fn end_offset_zero_for_individual_segment() {
        let segment = AdSegment::individual(ad("trueX", 30, 1));
        assert_eq!(segment.end_offset_ms(0), 0);
    }

    #[test]
    fn timeline_mirrors_placeholder_durations() {
        let segment = AdSegment::concatenated(vec![ad("GDFP", 30, 1), ad("GDFP", 32, 2)]);
        let timeline = segment.timeline();

        assert_eq!(timeline.entries().len(), 2);
        assert_eq!(timeline.entries()[0].duration_ms, 30_000);
        assert_eq!(timeline.entries()[1].duration_ms, 32_000);
        assert_eq!(timeline.total_duration_ms(), 62_000);
    }

    #[test]
    fn validate_accepts_leading_truex() {
        let pod = vec![ad("trueX", 30, 1), ad("GDFP", 30, 2)];
        assert!(validate_pod(&pod).is_ok());
    }

    #[test]
    fn validate_accepts_pod_without_truex() {
        let pod = vec![ad("IDVx", 30, 1), ad("GDFP", 30, 2)];
        assert!(validate_pod(&pod).is_ok());
    }

    #[test]
    fn validate_rejects_truex_not_first() {
        let pod = vec![ad("GDFP", 30, 1), ad("trueX", 30, 2)];
        match validate_pod(&pod) {
            Err(PodError::TruexNotFirst { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected TruexNotFirst, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_multiple_truex() {
        let pod = vec![ad("trueX", 30, 1), ad("trueX", 30, 2)];
        match validate_pod(&pod) {
            Err(PodError::MultipleTruex { count }) => assert_eq!(count, 2),
            other => panic!("expected MultipleTruex, got {other:?}"),
        }
    }
}
