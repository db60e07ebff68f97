//! Необязательные блоки настроек, хранящиеся в тегированных чанках.

pub mod acquisition;
pub mod basic;
pub mod common;
pub mod electrode;
pub mod subject;

pub use acquisition::*;
pub use basic::*;
pub use common::*;
pub use electrode::*;
pub use subject::*;

use std::collections::HashMap;

use log::{debug, warn};
use nsf_types::{NsResult, SetupTag};

use crate::{
    chunk::{Chunk, ChunkSet},
    layout::{decode, encode, Record},
};

/// Все известные блоки настроек файла.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetupRecords {
    pub basic: BasicSetup,
    pub epoch: EpochSetup,
    pub trigger: TriggerSetup,
    pub fsp: FspSetup,
    pub frequency: FrequencySetup,
    pub ocular: OcularSetup,
    /// По одному блоку на канал
    pub electrodes: Vec<ElectrodeSetup>,
    pub subject: SubjectInfo,
    /// Теги, для которых при загрузке подставлены значения по умолчанию
    defaulted: Vec<u32>,
}

impl SetupRecords {
    /// Значения по умолчанию для `channels` каналов.
    pub fn with_channels(channels: usize) -> Self {
        Self {
            electrodes: vec![ElectrodeSetup::default(); channels],
            ..Default::default()
        }
    }

    /// Извлекает первое вхождение каждого известного тега.
    ///
    /// Возвращает блоки и набор оставшихся чанков (неизвестные id и
    /// повторные вхождения) в исходном порядке.
    pub fn from_chunks(
        chunks: &ChunkSet,
        channels: usize,
    ) -> (Self, ChunkSet) {
        let first = chunks.first_occurrences();
        let mut defaulted = Vec::new();

        let setup = Self {
            basic: pull(&first, SetupTag::Basic.id(), &mut defaulted),
            epoch: pull(&first, SetupTag::Epoch.id(), &mut defaulted),
            trigger: pull(&first, SetupTag::Trigger.id(), &mut defaulted),
            fsp: pull(&first, SetupTag::Fsp.id(), &mut defaulted),
            frequency: pull(&first, SetupTag::Frequency.id(), &mut defaulted),
            ocular: pull(&first, SetupTag::Ocular.id(), &mut defaulted),
            electrodes: (0..channels)
                .map(|c| match SetupTag::addressable_electrode_id(c) {
                    Some(id) => pull(&first, id, &mut defaulted),
                    None => ElectrodeSetup::default(),
                })
                .collect(),
            subject: pull(&first, SetupTag::Subject.id(), &mut defaulted),
            defaulted,
        };

        let mut rest = ChunkSet::new();
        for (occurrence, chunk) in chunks.addressed() {
            if occurrence > 1 || !is_consumed(chunk.id, channels) {
                rest.push(chunk.clone());
            }
        }

        if !rest.is_empty() {
            debug!("{} chunk(s) kept unmodelled", rest.len());
        }

        (setup, rest)
    }

    /// Кодирует блоки в порядке записи: Basic, электроды, Epoch, Trigger,
    /// Fsp, Frequency, Ocular, Subject.
    ///
    /// Канал, id которого совпал бы с id другого тега, не записывается.
    pub fn to_chunks(&self) -> NsResult<ChunkSet> {
        let mut set = ChunkSet::new();

        set.push(chunk(SetupTag::Basic, SetupTag::Basic.id(), &self.basic)?);
        for (c, electrode) in self.electrodes.iter().enumerate() {
            match SetupTag::addressable_electrode_id(c) {
                Some(id) => set.push(chunk(SetupTag::Electrode, id, electrode)?),
                None => debug!("Channel {c} has no electrode chunk id, skipped"),
            }
        }
        set.push(chunk(SetupTag::Epoch, SetupTag::Epoch.id(), &self.epoch)?);
        set.push(chunk(SetupTag::Trigger, SetupTag::Trigger.id(), &self.trigger)?);
        set.push(chunk(SetupTag::Fsp, SetupTag::Fsp.id(), &self.fsp)?);
        set.push(chunk(SetupTag::Frequency, SetupTag::Frequency.id(), &self.frequency)?);
        set.push(chunk(SetupTag::Ocular, SetupTag::Ocular.id(), &self.ocular)?);
        set.push(chunk(SetupTag::Subject, SetupTag::Subject.id(), &self.subject)?);

        Ok(set)
    }

    /// Теги, отсутствовавшие или усечённые при загрузке.
    pub fn defaulted(&self) -> &[u32] {
        &self.defaulted
    }

    /// Все блоки взяты из файла.
    pub fn is_complete(&self) -> bool {
        self.defaulted.is_empty()
    }
}

fn is_consumed(
    id: u32,
    channels: usize,
) -> bool {
    match SetupTag::electrode_channel(id) {
        Some(channel) => channel < channels,
        None => SetupTag::from_id(id).is_some(),
    }
}

fn pull<T: Record + Default>(
    first: &HashMap<u32, &Chunk>,
    id: u32,
    defaulted: &mut Vec<u32>,
) -> T {
    let Some(chunk) = first.get(&id) else {
        debug!("Chunk {id} absent, using defaults");
        defaulted.push(id);
        return T::default();
    };

    match decode::<T>(&chunk.payload) {
        Ok(value) => value,
        Err(e) => {
            warn!("Chunk {id}: {e}; using defaults");
            defaulted.push(id);
            T::default()
        }
    }
}

fn chunk<T: Record>(
    tag: SetupTag,
    id: u32,
    value: &T,
) -> NsResult<Chunk> {
    Ok(Chunk::new(id, tag.version(), encode(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Field, FixedStr};

    #[test]
    fn test_chunk_order_and_versions() {
        let setup = SetupRecords::with_channels(2);
        let set = setup.to_chunks().unwrap();

        let ids: Vec<(u32, u16)> = set.iter().map(|c| (c.id, c.version)).collect();
        assert_eq!(
            ids,
            vec![
                (1000, 2),
                (5000, 0),
                (5001, 0),
                (1001, 2),
                (1002, 0),
                (1003, 0),
                (1005, 3),
                (1006, 0),
                (40000, 0),
            ]
        );
        assert_eq!(set.get(1000, 1).map(|c| c.size()), Some(BasicSetup::WIDTH));
    }

    #[test]
    fn test_roundtrip_through_chunks() {
        let mut setup = SetupRecords::with_channels(3);
        setup.subject.name = FixedStr::new("Sidorov");
        setup.electrodes[2].calibration = 0.25;
        setup.frequency.cwt_max = 80.0;

        let set = setup.to_chunks().unwrap();
        let (back, rest) = SetupRecords::from_chunks(&set, 3);

        assert_eq!(back, setup);
        assert!(back.is_complete());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_missing_and_short_chunks_default() {
        let mut set = ChunkSet::new();
        set.push(Chunk::new(SetupTag::Trigger.id(), 0, vec![1, 2, 3]));

        let mut long = encode(&OcularSetup {
            veog_channel: 7,
            ..Default::default()
        })
        .unwrap();
        long.extend_from_slice(&[0xEE; 12]);
        set.push(Chunk::new(SetupTag::Ocular.id(), 0, long));

        let (setup, _) = SetupRecords::from_chunks(&set, 1);

        assert_eq!(setup.trigger, TriggerSetup::default());
        assert_eq!(setup.ocular.veog_channel, 7);
        assert!(setup.defaulted().contains(&SetupTag::Trigger.id()));
        assert!(setup.defaulted().contains(&SetupTag::electrode_id(0)));
        assert!(!setup.defaulted().contains(&SetupTag::Ocular.id()));
        assert_eq!(setup.electrodes.len(), 1);
    }

    #[test]
    fn test_high_channel_electrode_chunk_consumed() {
        let channels = 10_001;
        let set = SetupRecords::with_channels(channels).to_chunks().unwrap();
        assert!(set.get(15000, 1).is_some());

        let (setup, rest) = SetupRecords::from_chunks(&set, channels);

        assert!(rest.is_empty());
        assert!(setup.is_complete());
        assert_eq!(setup.electrodes.len(), channels);
    }

    #[test]
    fn test_subject_id_not_taken_by_electrode() {
        let channels = 35_001;
        let mut setup = SetupRecords::with_channels(channels);
        setup.subject.name = FixedStr::new("Kuznetsova");
        setup.electrodes[35_000].calibration = 9.0;

        let set = setup.to_chunks().unwrap();
        let subjects: Vec<_> = set.iter().filter(|c| c.id == SetupTag::Subject.id()).collect();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].size(), SubjectInfo::WIDTH);

        let (back, rest) = SetupRecords::from_chunks(&set, channels);

        assert!(rest.is_empty());
        assert!(back.is_complete());
        assert_eq!(back.subject.name.as_str(), "Kuznetsova");
        assert_eq!(back.electrodes[35_000], ElectrodeSetup::default());
    }

    #[test]
    fn test_unknown_and_repeated_chunks_kept() {
        let mut set = SetupRecords::with_channels(1).to_chunks().unwrap();
        set.push(Chunk::new(77, 1, b"custom".to_vec()));
        set.push(Chunk::new(SetupTag::Subject.id(), 0, vec![0; 8]));
        set.push(Chunk::new(SetupTag::electrode_id(5), 0, vec![0; 4]));

        let (_, rest) = SetupRecords::from_chunks(&set, 1);
        let ids: Vec<u32> = rest.iter().map(|c| c.id).collect();

        assert_eq!(ids, vec![77, SetupTag::Subject.id(), SetupTag::electrode_id(5)]);
    }
}
