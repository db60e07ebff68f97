//! Кодек многоканальных записей ЭЭГ устаревшего формата
//!
//! Непрерывные записи (CNT) и усреднённые вызванные потенциалы (AVG):
//! заголовок фиксированной длины, таблица электродов, блок выборок, таблица
//! событий и необязательная область тегированных чанков с настройками.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use nsf_core::{HeaderSink, Recording, RecordingBuilder, SampleSink};
//!
//! let mut rec = Recording::open("session.cnt")?;
//! println!("{}: {:?}", rec.file_type(), rec.channel_names());
//! rec.set_electrode_label(0, "Fp1");
//! rec.save_to_path("session-fixed.cnt")?;
//!
//! let mut builder = RecordingBuilder::new();
//! builder.set_channel_count(2);
//! builder.set_sample_rate(250);
//! builder.append_samples(&[1.0, -1.0, 2.0, -2.0]);
//! builder.build()?.save_to_path("imported.cnt")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binary;
pub mod builder;
pub mod chunk;
pub mod classify;
pub mod electrode;
pub mod events;
pub mod header;
pub mod layout;
pub mod recording;
pub mod samples;
pub mod setup;
pub mod summary;

pub use builder::{HeaderSink, RecordingBuilder, SampleSink, SubjectIds};
pub use chunk::{Chunk, ChunkReader, ChunkSet, ChunkWriter};
pub use classify::classify;
pub use electrode::{ElectrodeRecord, ElectrodeTable, ELECTRODE_SIZE};
pub use events::{event_count, EventRecord, EventTable};
pub use header::{HeaderRecord, HEADER_SIZE};
pub use layout::{FixedStr, Reserved};
pub use nsf_types::{FileType, IoLocation, NsError, NsResult, SetupTag};
pub use recording::{data_offset, Recording};
pub use samples::{SampleBuffer, SampleLayout};
pub use setup::SetupRecords;
pub use summary::RecordingSummary;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
