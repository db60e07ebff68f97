//! Реализация подкоманд `nsf`.

use std::path::Path;

use log::{debug, info};
use nsf_core::Recording;

use crate::{
    config::{CliConfig, OutputFormat},
    error::CliResult,
    report::{ChunkReport, InfoReport},
};

/// `nsf info`: сводка по файлу.
pub fn run_info(
    path: &Path,
    config: &CliConfig,
) -> CliResult<String> {
    let rec = Recording::open(path)?;
    InfoReport::new(&rec, config).render(config.format)
}

/// `nsf chunks`: подчанки области настроек в порядке записи.
pub fn run_chunks(
    path: &Path,
    format: OutputFormat,
) -> CliResult<String> {
    let rec = Recording::open(path)?;

    let Some(offset) = rec.region_offset() else {
        debug!("{}: no chunk region", path.display());
        return ChunkReport::default().render(format);
    };

    ChunkReport::new(offset, &rec.region_chunks()?).render(format)
}

/// `nsf copy`: загрузка и атомарное сохранение под новым именем.
pub fn run_copy(
    input: &Path,
    output: &Path,
) -> CliResult<()> {
    let mut rec = Recording::open(input)?;
    rec.save_to_path(output)?;

    info!(
        "Copied {} -> {} ({}, {} channels)",
        input.display(),
        output.display(),
        rec.file_type(),
        rec.channel_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use nsf_core::{Chunk, HeaderSink, RecordingBuilder, SampleSink};

    use super::*;

    fn write_sample(path: &Path) {
        let mut b = RecordingBuilder::new();
        b.set_channel_count(2);
        b.set_sample_rate(100);
        b.append_samples(&[1.0, 2.0, 3.0, 4.0]);

        let mut rec = b.build().unwrap();
        rec.extra_chunks_mut().push(Chunk::new(1000, 2, vec![0; 8]));
        rec.save_to_path(path).unwrap();
    }

    #[test]
    fn test_chunks_lists_region() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.cnt");
        write_sample(&path);

        let json = run_chunks(&path, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let chunks = value["chunks"].as_array().unwrap();

        // Basic, 2 электрода, Epoch..Subject и повтор Basic
        assert_eq!(chunks.len(), 10);
        assert_eq!(chunks[0]["id"], 1000);
        assert_eq!(chunks[1]["id"], 5000);
        assert_eq!(chunks[9]["id"], 1000);
        assert_eq!(chunks[9]["occurrence"], 2);
    }

    #[test]
    fn test_copy_preserves_samples() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.cnt");
        let dst = dir.path().join("dst.cnt");
        write_sample(&src);

        run_copy(&src, &dst).unwrap();

        let a = Recording::open(&src).unwrap();
        let b = Recording::open(&dst).unwrap();
        assert_eq!(a.samples(), b.samples());
        assert_eq!(a.extra_chunks(), b.extra_chunks());
        assert_eq!(std::fs::read(&src).unwrap(), std::fs::read(&dst).unwrap());
    }

    #[test]
    fn test_info_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_info(&dir.path().join("absent.cnt"), &CliConfig::default());
        assert!(err.is_err());
    }
}
