//! Текстовые и JSON-отчёты команд `info` и `chunks`.

use std::fmt;

use nsf_core::{ChunkSet, EventRecord, Recording, RecordingSummary};
use nsf_types::SetupTag;
use serde::Serialize;

use crate::{
    config::{CliConfig, OutputFormat},
    error::CliResult,
};

/// Событие в отчёте.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventLine {
    pub index: usize,
    pub stim_type: u16,
    pub offset: u32,
    pub event_type: u16,
    pub response_latency: f32,
    pub accept: u8,
}

/// Основные поля блоков настроек.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupLine {
    pub subject_name: String,
    pub subject_id: String,
    pub age: i32,
    pub session: String,
    pub epoch_points: u32,
    pub epoch_sweeps: u32,
    pub notch_frequency: u32,
    pub defaulted: Vec<u32>,
}

/// Отчёт команды `info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoReport {
    #[serde(flatten)]
    pub summary: RecordingSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub event_list: Vec<EventLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_details: Option<SetupLine>,
}

/// Подчанк в отчёте `chunks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkLine {
    pub id: u32,
    pub occurrence: usize,
    pub version: u16,
    pub size: usize,
    pub tag: Option<String>,
}

/// Отчёт команды `chunks`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChunkReport {
    pub region_offset: Option<u64>,
    pub chunks: Vec<ChunkLine>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl InfoReport {
    pub fn new(
        rec: &Recording,
        config: &CliConfig,
    ) -> Self {
        let event_list = rec
            .events()
            .iter()
            .take(config.events)
            .enumerate()
            .map(|(index, e)| EventLine::new(index, e))
            .collect();

        let setup_details = config.show_setup.then(|| {
            let setup = rec.setup();
            SetupLine {
                subject_name: setup.subject.name.to_string(),
                subject_id: setup.subject.id.to_string(),
                age: setup.subject.age,
                session: setup.subject.session.to_string(),
                epoch_points: setup.epoch.points,
                epoch_sweeps: setup.epoch.sweeps,
                notch_frequency: setup.basic.notch_frequency,
                defaulted: setup.defaulted().to_vec(),
            }
        });

        Self {
            summary: RecordingSummary::from_recording(rec),
            event_list,
            setup_details,
        }
    }

    pub fn render(
        &self,
        format: OutputFormat,
    ) -> CliResult<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl EventLine {
    fn new(
        index: usize,
        e: &EventRecord,
    ) -> Self {
        Self {
            index,
            stim_type: e.base.stim_type,
            offset: e.base.offset,
            event_type: e.event_type,
            response_latency: e.response_latency,
            accept: e.accept,
        }
    }
}

impl ChunkReport {
    pub fn new(
        region_offset: u64,
        set: &ChunkSet,
    ) -> Self {
        let chunks = set
            .addressed()
            .into_iter()
            .map(|(occurrence, c)| ChunkLine {
                id: c.id,
                occurrence,
                version: c.version,
                size: c.size(),
                tag: SetupTag::from_id(c.id).map(|t| format!("{t:?}")),
            })
            .collect();

        Self {
            region_offset: Some(region_offset),
            chunks,
        }
    }

    pub fn render(
        &self,
        format: OutputFormat,
    ) -> CliResult<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для InfoReport, ChunkReport
////////////////////////////////////////////////////////////////////////////////

impl fmt::Display for InfoReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = &self.summary;

        writeln!(f, "File type    : {}", s.file_type)?;
        writeln!(f, "Revision     : {}", s.revision)?;
        writeln!(f, "Patient      : {}", s.patient)?;
        writeln!(f, "Recorded     : {} {}", s.date, s.time)?;
        writeln!(f, "Channels     : {} [{}]", s.channels, s.labels.join(", "))?;
        writeln!(f, "Rate         : {} Hz", s.rate)?;
        match s.duration_secs {
            Some(d) => writeln!(f, "Points       : {} ({d:.3} s)", s.points)?,
            None => writeln!(f, "Points       : {}", s.points)?,
        }
        writeln!(f, "Variance     : {}", if s.variance { "yes" } else { "no" })?;
        writeln!(f, "Events       : {}", s.events)?;
        writeln!(f, "Extra chunks : {}", s.extra_chunks)?;
        if s.opaque_bytes > 0 {
            writeln!(f, "Opaque bytes : {}", s.opaque_bytes)?;
        }

        for e in &self.event_list {
            writeln!(
                f,
                "  [{}] stim {} @ {} (type {}, latency {:.1})",
                e.index, e.stim_type, e.offset, e.event_type, e.response_latency
            )?;
        }

        if let Some(setup) = &self.setup_details {
            writeln!(f, "Subject      : {} ({})", setup.subject_name, setup.subject_id)?;
            writeln!(f, "Age          : {}", setup.age)?;
            writeln!(f, "Session      : {}", setup.session)?;
            writeln!(
                f,
                "Epoch        : {} points, {} sweeps",
                setup.epoch_points, setup.epoch_sweeps
            )?;
            writeln!(f, "Notch        : {} Hz", setup.notch_frequency)?;
            if !setup.defaulted.is_empty() {
                writeln!(f, "Defaulted    : {:?}", setup.defaulted)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ChunkReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let Some(offset) = self.region_offset else {
            return writeln!(f, "No chunk region");
        };

        writeln!(f, "Chunk region at {offset}, {} chunk(s)", self.chunks.len())?;
        writeln!(f, "{:>6} {:>4} {:>7} {:>8}  tag", "id", "occ", "version", "size")?;
        for c in &self.chunks {
            writeln!(
                f,
                "{:>6} {:>4} {:>7} {:>8}  {}",
                c.id,
                c.occurrence,
                c.version,
                c.size,
                c.tag.as_deref().unwrap_or("-")
            )?;
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use nsf_core::{Chunk, HeaderSink, RecordingBuilder, SampleSink};

    use super::*;

    fn recording() -> Recording {
        let mut b = RecordingBuilder::new();
        b.set_channel_count(2);
        b.set_sample_rate(200);
        b.set_electrode_label(0, "O1");
        b.set_electrode_label(1, "O2");
        b.append_samples(&[0.0; 8]);

        let mut rec = b.build().unwrap();
        rec.events_mut().push(EventRecord::new(3, 2));
        rec.events_mut().push(EventRecord::new(4, 3));
        rec.setup_mut().subject.name.set("Ivanov");
        rec
    }

    #[test]
    fn test_info_text() {
        let config = CliConfig {
            events: 1,
            show_setup: true,
            ..Default::default()
        };
        let text = InfoReport::new(&recording(), &config)
            .render(OutputFormat::Text)
            .unwrap();

        assert!(text.contains("File type    : Continuous"));
        assert!(text.contains("Channels     : 2 [O1, O2]"));
        assert!(text.contains("Points       : 4 (0.020 s)"));
        assert!(text.contains("[0] stim 3 @ 2"));
        assert!(!text.contains("stim 4"));
        assert!(text.contains("Subject      : Ivanov"));
    }

    #[test]
    fn test_info_json_flattens_summary() {
        let report = InfoReport::new(&recording(), &CliConfig::default());
        let json = report.render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["channels"], 2);
        assert_eq!(value["events"], 2);
        assert!(value.get("event_list").is_none());
        assert!(value.get("setup_details").is_none());
    }

    #[test]
    fn test_chunk_report_occurrences() {
        let mut set = ChunkSet::new();
        set.push(Chunk::new(1000, 2, vec![0; 4]));
        set.push(Chunk::new(77, 0, vec![0; 2]));
        set.push(Chunk::new(77, 0, vec![0; 3]));

        let report = ChunkReport::new(64, &set);
        let occ: Vec<(u32, usize)> = report.chunks.iter().map(|c| (c.id, c.occurrence)).collect();

        assert_eq!(occ, vec![(1000, 1), (77, 1), (77, 2)]);
        assert_eq!(report.chunks[0].tag.as_deref(), Some("Basic"));
        assert_eq!(report.chunks[2].size, 3);

        let text = report.render(OutputFormat::Text).unwrap();
        assert!(text.starts_with("Chunk region at 64, 3 chunk(s)"));
    }

    #[test]
    fn test_empty_chunk_report() {
        let text = ChunkReport::default().to_string();
        assert_eq!(text, "No chunk region\n");
    }
}
