use std::io::{Read, Seek, SeekFrom};

use log::{debug, trace};
use nsf_types::{IoContext, IoLocation, NsError, NsResult, CHUNK_MAGIC, TAG_INVALID};

use super::{Chunk, MainChunkHeader, SubChunkHeader};
use crate::{
    binary::{read_block, read_record},
    layout::Field,
};

/// Последовательный читатель области чанков.
///
/// Поиск идёт вперёд от текущей позиции; для поиска с начала области
/// вызовите [`ChunkReader::rewind`].
pub struct ChunkReader<R: Read + Seek> {
    inner: R,
    descriptor: SubChunkHeader,
    /// Позиция первого подчанка после дескриптора
    first: u64,
    /// Конец потока
    end: u64,
}

impl<R: Read + Seek> ChunkReader<R> {
    /// Открывает область, начинающуюся с текущей позиции `inner`.
    ///
    /// Проверяет магическую строку и читает главный заголовок и дескриптор.
    pub fn open(mut inner: R) -> NsResult<Self> {
        let start = inner.stream_position().at(IoLocation::ChunkRegion)?;
        let end = inner.seek(SeekFrom::End(0)).at(IoLocation::ChunkRegion)?;
        inner
            .seek(SeekFrom::Start(start))
            .at(IoLocation::ChunkRegion)?;

        let magic = read_block(&mut inner, CHUNK_MAGIC.len(), "chunk magic", IoLocation::ChunkRegion)?;

        // Завершающий ноль не проверяется
        if magic[..7] != CHUNK_MAGIC[..7] {
            let mut found = [0u8; 8];
            found.copy_from_slice(&magic);
            return Err(NsError::BadMagic { found });
        }

        // Идентификаторы главного чанка при чтении не проверяются
        let _: MainChunkHeader = read_record(&mut inner, IoLocation::ChunkRegion)?;
        let descriptor: SubChunkHeader = read_record(&mut inner, IoLocation::ChunkRegion)?;
        let first = inner.stream_position().at(IoLocation::ChunkRegion)?;

        debug!(
            "Chunk region at {start}: descriptor version {}, {} bytes follow",
            descriptor.version,
            end.saturating_sub(first)
        );

        Ok(Self {
            inner,
            descriptor,
            first,
            end,
        })
    }

    /// Версия, записанная в дескрипторе области.
    pub fn version(&self) -> u16 {
        self.descriptor.version
    }

    /// Возвращает курсор к первому подчанку.
    pub fn rewind(&mut self) -> NsResult<()> {
        self.inner
            .seek(SeekFrom::Start(self.first))
            .at(IoLocation::ChunkRegion)?;
        Ok(())
    }

    /// Ищет `occurrence`-е (с 1) вхождение подчанка `id` от текущей позиции.
    ///
    /// При успехе курсор стоит на начале полезной нагрузки и возвращается её
    /// размер. Конец области, обрезанный заголовок или нагрузка за концом
    /// файла означают «не найдено».
    pub fn seek_to_tag(
        &mut self,
        id: u32,
        occurrence: usize,
    ) -> NsResult<Option<u32>> {
        if id == TAG_INVALID || occurrence == 0 {
            return Ok(None);
        }

        let mut seen = 0;

        while let Some(header) = self.next_header()? {
            if header.id == id {
                seen += 1;
                if seen == occurrence {
                    trace!("Found chunk {id} #{occurrence}, {} bytes", header.size);
                    return Ok(Some(header.size));
                }
            }

            self.inner
                .seek(SeekFrom::Current(header.size as i64))
                .at(IoLocation::Chunk { id, occurrence })?;
        }

        Ok(None)
    }

    /// Читает `size` байт нагрузки с текущей позиции.
    pub fn read_payload(
        &mut self,
        size: u32,
    ) -> NsResult<Vec<u8>> {
        read_block(&mut self.inner, size as usize, "chunk payload", IoLocation::ChunkRegion)
    }

    /// Читает следующий подчанк целиком.
    pub fn next_chunk(&mut self) -> NsResult<Option<Chunk>> {
        let Some(header) = self.next_header()? else {
            return Ok(None);
        };

        let payload = self.read_payload(header.size)?;

        Ok(Some(Chunk {
            id: header.id,
            version: header.version,
            payload,
        }))
    }

    /// Читает заголовок следующего подчанка, если он и его нагрузка целиком
    /// помещаются в поток.
    fn next_header(&mut self) -> NsResult<Option<SubChunkHeader>> {
        let pos = self
            .inner
            .stream_position()
            .at(IoLocation::ChunkRegion)?;

        if pos + SubChunkHeader::WIDTH as u64 > self.end {
            return Ok(None);
        }

        let header: SubChunkHeader = read_record(&mut self.inner, IoLocation::ChunkRegion)?;

        if pos + SubChunkHeader::WIDTH as u64 + header.size as u64 > self.end {
            debug!(
                "Chunk {} at {pos} claims {} bytes past end of stream",
                header.id, header.size
            );
            return Ok(None);
        }

        Ok(Some(header))
    }
}
