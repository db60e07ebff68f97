use std::{collections::HashMap, io::Write};

use nsf_types::{
    IoContext, IoLocation, NsError, NsResult, CHUNK_MAGIC, MAIN_CHUNK_IDS, SETUP_BIT32,
    TAG_INVALID,
};

use super::{Chunk, MainChunkHeader, SubChunkHeader};
use crate::binary::write_record;

/// Последовательный писатель области чанков.
pub struct ChunkWriter<W: Write> {
    inner: W,
    /// Сколько раз записан каждый идентификатор
    written: HashMap<u32, usize>,
}

impl<W: Write> ChunkWriter<W> {
    /// Пишет магическую строку, главный заголовок и дескриптор.
    pub fn create(mut inner: W) -> NsResult<Self> {
        inner
            .write_all(&CHUNK_MAGIC)
            .at(IoLocation::ChunkRegion)?;

        let main = MainChunkHeader {
            id0: MAIN_CHUNK_IDS[0],
            id1: MAIN_CHUNK_IDS[1],
            ..Default::default()
        };
        write_record(&mut inner, &main, IoLocation::ChunkRegion)?;

        let descriptor = SubChunkHeader {
            id: TAG_INVALID,
            version: SETUP_BIT32,
            ..Default::default()
        };
        write_record(&mut inner, &descriptor, IoLocation::ChunkRegion)?;

        Ok(Self {
            inner,
            written: HashMap::new(),
        })
    }

    /// Дописывает подчанк. Идентификатор 0 зарезервирован: вызов ничего не
    /// пишет и возвращает `false`.
    pub fn write_chunk(
        &mut self,
        id: u32,
        version: u16,
        payload: &[u8],
    ) -> NsResult<bool> {
        if id == TAG_INVALID {
            return Ok(false);
        }

        let size = u32::try_from(payload.len()).map_err(|_| {
            NsError::shape_mismatch(format!("chunk {id} payload of {} bytes", payload.len()))
        })?;

        let occurrence = self.written.entry(id).or_default();
        *occurrence += 1;
        let location = IoLocation::Chunk {
            id,
            occurrence: *occurrence,
        };

        let header = SubChunkHeader {
            id,
            version,
            reserved: 0,
            size,
            next_entry: size,
        };
        write_record(&mut self.inner, &header, location)?;
        self.inner.write_all(payload).at(location)?;

        Ok(true)
    }

    pub fn write(
        &mut self,
        chunk: &Chunk,
    ) -> NsResult<bool> {
        self.write_chunk(chunk.id, chunk.version, &chunk.payload)
    }

    /// Число записанных подчанков.
    pub fn chunk_count(&self) -> usize {
        self.written.values().sum()
    }

    pub fn finish(mut self) -> NsResult<W> {
        self.inner.flush().at(IoLocation::ChunkRegion)?;
        Ok(self.inner)
    }
}
