//! Synthetic run identifier and stage timeline.
//!
//! Decorative telemetry for the reviewer. The timestamps are spaced at a
//! fixed interval from the generation moment and say nothing about how long
//! the extraction service actually took.

use chrono::{DateTime, Local, TimeDelta};
use rand::Rng;

/// Spacing between consecutive timeline stages.
pub const STAGE_INTERVAL: TimeDelta = TimeDelta::seconds(38);

/// Pipeline stages shown on the timeline, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Uploaded,
    Parsed,
    Extracted,
    Validated,
    Decision,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Uploaded,
        Stage::Parsed,
        Stage::Extracted,
        Stage::Validated,
        Stage::Decision,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Uploaded => "Uploaded",
            Stage::Parsed => "Parsed",
            Stage::Extracted => "Extracted",
            Stage::Validated => "Validated",
            Stage::Decision => "Decision",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub stage: Stage,
    pub at: DateTime<Local>,
}

impl TimelineEntry {
    /// `HH:MM:SS` in local time.
    pub fn time_label(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

/// Run id plus timeline for one accepted extraction result.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetadata {
    pub run_id: String,
    pub timeline: Vec<TimelineEntry>,
}

impl RunMetadata {
    /// Generate metadata from the current clock and the thread RNG.
    pub fn now() -> Self {
        Self::generate(Local::now(), &mut rand::thread_rng())
    }

    /// Generate metadata for a run that started at `now`.
    ///
    /// Run ids look like `RUN-20260112-4821`; the suffix is in `1000..=9999`.
    pub fn generate<R: Rng + ?Sized>(now: DateTime<Local>, rng: &mut R) -> Self {
        let suffix: u16 = rng.gen_range(1000..=9999);
        let run_id = format!("RUN-{}-{}", now.format("%Y%m%d"), suffix);

        let timeline = Stage::ALL
            .iter()
            .zip(0i32..)
            .map(|(&stage, i)| TimelineEntry {
                stage,
                at: now + STAGE_INTERVAL * i,
            })
            .collect();

        Self { run_id, timeline }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed_now() -> DateTime<Local> {
        chrono::Utc
            .with_ymd_and_hms(2026, 1, 12, 15, 30, 0)
            .unwrap()
            .with_timezone(&Local)
    }

    #[test]
    fn five_stages_in_order() {
        let meta = RunMetadata::generate(fixed_now(), &mut StdRng::seed_from_u64(7));
        let labels: Vec<&str> = meta.timeline.iter().map(|e| e.stage.label()).collect();
        assert_eq!(
            labels,
            ["Uploaded", "Parsed", "Extracted", "Validated", "Decision"]
        );
    }

    #[test]
    fn timestamps_strictly_increasing_at_fixed_spacing() {
        let now = fixed_now();
        let meta = RunMetadata::generate(now, &mut StdRng::seed_from_u64(7));
        assert_eq!(meta.timeline[0].at, now);
        for pair in meta.timeline.windows(2) {
            assert!(pair[0].at < pair[1].at);
            assert_eq!(pair[1].at - pair[0].at, STAGE_INTERVAL);
        }
        assert_eq!(
            meta.timeline[4].at - meta.timeline[0].at,
            TimeDelta::seconds(152)
        );
    }

    #[test]
    fn run_id_shape() {
        let now = fixed_now();
        let meta = RunMetadata::generate(now, &mut StdRng::seed_from_u64(42));
        let prefix = format!("RUN-{}-", now.format("%Y%m%d"));
        assert!(meta.run_id.starts_with(&prefix), "{}", meta.run_id);
        let suffix = &meta.run_id[prefix.len()..];
        assert_eq!(suffix.len(), 4);
        let n: u16 = suffix.parse().unwrap();
        assert!((1000..=9999).contains(&n));
    }

    #[test]
    fn fresh_metadata_each_time() {
        let now = fixed_now();
        let mut rng = StdRng::seed_from_u64(1);
        let ids: std::collections::HashSet<String> = (0..20)
            .map(|_| RunMetadata::generate(now, &mut rng).run_id)
            .collect();
        assert!(ids.len() > 1);
        assert_eq!(RunMetadata::now().timeline.len(), 5);
    }

    #[test]
    fn time_label_format() {
        let entry = TimelineEntry {
            stage: Stage::Parsed,
            at: Local.with_ymd_and_hms(2026, 1, 12, 9, 5, 38).earliest().unwrap(),
        };
        assert_eq!(entry.time_label(), "09:05:38");
    }
}
