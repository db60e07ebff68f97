use std::{
    collections::HashMap,
    io::{Read, Seek, Write},
};

use nsf_types::NsResult;

use super::{Chunk, ChunkReader, ChunkWriter};

/// Упорядоченный набор подчанков с адресацией по (id, вхождение).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkSet {
    chunks: Vec<Chunk>,
}

impl ChunkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Читает все подчанки области с её начала.
    pub fn read_from<R: Read + Seek>(reader: &mut ChunkReader<R>) -> NsResult<Self> {
        reader.rewind()?;

        let mut chunks = Vec::new();
        while let Some(chunk) = reader.next_chunk()? {
            chunks.push(chunk);
        }

        Ok(Self { chunks })
    }

    /// Пишет все подчанки в порядке добавления.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut ChunkWriter<W>,
    ) -> NsResult<()> {
        for chunk in &self.chunks {
            writer.write(chunk)?;
        }

        Ok(())
    }

    pub fn push(
        &mut self,
        chunk: Chunk,
    ) {
        self.chunks.push(chunk);
    }

    /// `occurrence`-е (с 1) вхождение подчанка `id`.
    pub fn get(
        &self,
        id: u32,
        occurrence: usize,
    ) -> Option<&Chunk> {
        if occurrence == 0 {
            return None;
        }

        self.chunks
            .iter()
            .filter(|c| c.id == id)
            .nth(occurrence - 1)
    }

    /// Сколько раз встречается `id`.
    pub fn occurrences(
        &self,
        id: u32,
    ) -> usize {
        self.chunks.iter().filter(|c| c.id == id).count()
    }

    /// Подчанки, для которых `keep` вернул `true`, в исходном порядке.
    pub fn filtered<F: Fn(&Chunk) -> bool>(
        &self,
        keep: F,
    ) -> Self {
        Self {
            chunks: self.chunks.iter().filter(|c| keep(c)).cloned().collect(),
        }
    }

    pub fn extend(
        &mut self,
        other: &ChunkSet,
    ) {
        self.chunks.extend(other.chunks.iter().cloned());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Подчанки вместе с номером вхождения своего идентификатора.
    pub fn addressed(&self) -> Vec<(usize, &Chunk)> {
        let mut seen: HashMap<u32, usize> = HashMap::new();

        self.chunks
            .iter()
            .map(|chunk| {
                let occurrence = seen.entry(chunk.id).or_default();
                *occurrence += 1;
                (*occurrence, chunk)
            })
            .collect()
    }

    /// Первое вхождение каждого id.
    pub fn first_occurrences(&self) -> HashMap<u32, &Chunk> {
        let mut first = HashMap::new();
        for chunk in &self.chunks {
            first.entry(chunk.id).or_insert(chunk);
        }

        first
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, SeekFrom};

    use nsf_types::{NsError, CHUNK_MAGIC};

    use super::*;

    const A: u32 = 1000;
    const B: u32 = 1001;
    const C: u32 = 40000;

    fn region(chunks: &[(u32, &str)]) -> Vec<u8> {
        let mut writer = ChunkWriter::create(Vec::new()).unwrap();
        for (id, payload) in chunks {
            writer.write_chunk(*id, 0, payload.as_bytes()).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_region_layout() {
        let bytes = region(&[(A, "xyz")]);

        assert_eq!(&bytes[..8], &CHUNK_MAGIC);
        assert_eq!(bytes.len(), 8 + 40 + 16 + 16 + 3);
        // Дескриптор: id 0, версия 1, размер 0
        assert_eq!(&bytes[48..56], &[0, 0, 0, 0, 1, 0, 0, 0]);
        // nextEntry совпадает с размером
        assert_eq!(&bytes[72..76], &3u32.to_le_bytes());
        assert_eq!(&bytes[76..80], &3u32.to_le_bytes());
    }

    #[test]
    fn test_seek_by_occurrence() {
        let bytes = region(&[(A, "a1"), (B, "b22"), (A, "a333"), (A, "a4444"), (C, "c1")]);
        let mut reader = ChunkReader::open(Cursor::new(bytes)).unwrap();

        let size = reader.seek_to_tag(A, 3).unwrap();
        assert_eq!(size, Some(5));
        assert_eq!(reader.read_payload(5).unwrap(), b"a4444");

        // Поиск продолжается вперёд: следующий A уже не найти
        assert_eq!(reader.seek_to_tag(A, 1).unwrap(), None);

        reader.rewind().unwrap();
        assert_eq!(reader.seek_to_tag(A, 1).unwrap(), Some(2));
        assert_eq!(reader.read_payload(2).unwrap(), b"a1");

        reader.rewind().unwrap();
        assert_eq!(reader.seek_to_tag(A, 2).unwrap(), Some(4));

        reader.rewind().unwrap();
        assert_eq!(reader.seek_to_tag(A, 4).unwrap(), None);

        reader.rewind().unwrap();
        assert_eq!(reader.seek_to_tag(B, 1).unwrap(), Some(3));
        assert_eq!(reader.read_payload(3).unwrap(), b"b22");
        assert_eq!(reader.seek_to_tag(C, 1).unwrap(), Some(2));
    }

    #[test]
    fn test_invalid_queries() {
        let bytes = region(&[(A, "a")]);
        let mut reader = ChunkReader::open(Cursor::new(bytes)).unwrap();

        assert_eq!(reader.seek_to_tag(0, 1).unwrap(), None);
        assert_eq!(reader.seek_to_tag(A, 0).unwrap(), None);
    }

    #[test]
    fn test_zero_id_write_is_noop() {
        let mut writer = ChunkWriter::create(Vec::new()).unwrap();

        assert!(!writer.write_chunk(0, 0, b"ignored").unwrap());
        assert_eq!(writer.chunk_count(), 0);
        assert_eq!(writer.finish().unwrap().len(), 8 + 40 + 16);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = region(&[]);
        bytes[0] = b'X';

        match ChunkReader::open(Cursor::new(bytes)) {
            Err(NsError::BadMagic { found }) => assert_eq!(found[0], b'X'),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("bad magic accepted"),
        }
    }

    #[test]
    fn test_short_region_is_truncated() {
        let err = ChunkReader::open(Cursor::new(b"NSI".to_vec())).err();
        assert!(err.is_some_and(|e| e.is_truncated()));
    }

    #[test]
    fn test_payload_past_end_ends_scan() {
        let mut bytes = region(&[(A, "ok"), (B, "cut-off")]);
        bytes.truncate(bytes.len() - 3);

        let mut reader = ChunkReader::open(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.seek_to_tag(B, 1).unwrap(), None);

        let set = ChunkSet::read_from(&mut reader).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(A, 1).map(|c| c.payload.as_slice()), Some(&b"ok"[..]));
    }

    #[test]
    fn test_region_after_prefix() {
        let mut bytes = b"PREFIX".to_vec();
        bytes.extend(region(&[(C, "subject")]));

        let mut cursor = Cursor::new(bytes);
        cursor.seek(SeekFrom::Start(6)).unwrap();

        let mut reader = ChunkReader::open(cursor).unwrap();
        let set = ChunkSet::read_from(&mut reader).unwrap();
        assert_eq!(set.occurrences(C), 1);
    }

    #[test]
    fn test_set_roundtrip_and_addressing() {
        let mut set = ChunkSet::new();
        set.push(Chunk::new(A, 2, b"one".to_vec()));
        set.push(Chunk::new(B, 0, Vec::new()));
        set.push(Chunk::new(A, 2, b"two".to_vec()));

        let mut writer = ChunkWriter::create(Vec::new()).unwrap();
        set.write_to(&mut writer).unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = ChunkReader::open(Cursor::new(bytes)).unwrap();
        let back = ChunkSet::read_from(&mut reader).unwrap();

        assert_eq!(back, set);
        assert_eq!(back.occurrences(A), 2);
        assert_eq!(back.get(A, 2).map(|c| c.payload.as_slice()), Some(&b"two"[..]));
        assert_eq!(back.get(A, 0), None);

        let addressed: Vec<(usize, u32)> = back.addressed().iter().map(|(n, c)| (*n, c.id)).collect();
        assert_eq!(addressed, vec![(1, A), (1, B), (2, A)]);

        let only_b = back.filtered(|c| c.id == B);
        assert_eq!(only_b.len(), 1);
    }
}
