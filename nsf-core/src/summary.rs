//! Краткая сводка по записи для отчётов.

use std::collections::HashSet;

use nsf_types::{FileType, SetupTag};
use serde::Serialize;

use crate::recording::Recording;

/// Сводка по загруженной записи.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingSummary {
    pub file_type: FileType,
    pub revision: String,
    pub patient: String,
    pub date: String,
    pub time: String,
    pub channels: usize,
    /// Частота дискретизации, Гц
    pub rate: u16,
    /// Выборок (Continuous) или точек (Average) на канал
    pub points: usize,
    pub duration_secs: Option<f64>,
    pub variance: bool,
    pub events: usize,
    pub labels: Vec<String>,
    pub setup: SetupPresence,
    pub extra_chunks: usize,
    pub opaque_bytes: usize,
}

/// Какие блоки настроек взяты из файла, а какие подставлены.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupPresence {
    pub basic: bool,
    pub epoch: bool,
    pub trigger: bool,
    pub fsp: bool,
    pub frequency: bool,
    pub ocular: bool,
    pub subject: bool,
    /// Каналов с собственным блоком настроек
    pub electrodes: usize,
}

impl RecordingSummary {
    pub fn from_recording(rec: &Recording) -> Self {
        let header = rec.header();
        let file_type = rec.file_type();

        Self {
            file_type,
            revision: header.revision.to_string(),
            patient: header.patient.to_string(),
            date: header.date.to_string(),
            time: header.time.to_string(),
            channels: rec.channel_count(),
            rate: header.rate,
            points: rec.samples().points(),
            duration_secs: match file_type {
                FileType::Continuous => header.duration_secs(),
                _ => None,
            },
            variance: rec.variance().is_some(),
            events: rec.events().len(),
            labels: rec.channel_names(),
            setup: SetupPresence::from_recording(rec),
            extra_chunks: rec.extra_chunks().len(),
            opaque_bytes: rec.opaque_tail().len(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl SetupPresence {
    fn from_recording(rec: &Recording) -> Self {
        let defaulted: HashSet<u32> = rec.setup().defaulted().iter().copied().collect();
        let loaded = |tag: SetupTag| !defaulted.contains(&tag.id());

        let electrodes = (0..rec.channel_count())
            .filter(|&c| {
                SetupTag::addressable_electrode_id(c).is_some_and(|id| !defaulted.contains(&id))
            })
            .count();

        Self {
            basic: loaded(SetupTag::Basic),
            epoch: loaded(SetupTag::Epoch),
            trigger: loaded(SetupTag::Trigger),
            fsp: loaded(SetupTag::Fsp),
            frequency: loaded(SetupTag::Frequency),
            ocular: loaded(SetupTag::Ocular),
            subject: loaded(SetupTag::Subject),
            electrodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::RecordingBuilder, HeaderSink, SampleSink};

    #[test]
    fn test_summary_of_built_recording() {
        let mut b = RecordingBuilder::new();
        b.set_channel_count(2);
        b.set_sample_rate(100);
        b.set_electrode_label(0, "C3");
        b.set_electrode_label(1, "C4");
        b.append_samples(&[0.0; 400]);

        let rec = b.build().unwrap();
        let summary = RecordingSummary::from_recording(&rec);

        assert_eq!(summary.file_type, FileType::Continuous);
        assert_eq!(summary.points, 200);
        assert_eq!(summary.duration_secs, Some(2.0));
        assert_eq!(summary.labels, vec!["C3", "C4"]);
        assert!(summary.setup.subject);
        assert_eq!(summary.setup.electrodes, 2);
    }

    #[test]
    fn test_json_fields() {
        let mut b = RecordingBuilder::new();
        b.set_channel_count(1);
        let summary = RecordingSummary::from_recording(&b.build().unwrap());

        let json = summary.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["file_type"], "Continuous");
        assert_eq!(value["channels"], 1);
        assert_eq!(value["setup"]["basic"], true);
    }
}
