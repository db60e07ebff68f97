//! Таблица событий непрерывного файла.
//!
//! Таблица начинается с ведущей записи (тип + размер данных в байтах), за
//! которой идут записи событий второго типа по 19 байт.

use std::io::{Read, Seek, SeekFrom, Write};

use log::warn;
use nsf_types::{IoContext, IoLocation, NsResult};

use crate::{
    binary::{read_record, write_record},
    layout::{packed_record, Field},
};

/// Код ведущей записи для событий первого типа.
pub const TEEG_EVENT1: u8 = 1;
/// Код ведущей записи для событий второго типа (пишется по умолчанию).
pub const TEEG_EVENT2: u8 = 2;

packed_record! {
    /// Ведущая запись таблицы событий.
    pub struct TeegRecord {
        pub kind: u8,
        /// Размер следующих за ней данных в байтах
        pub size: i64,
    }
}

packed_record! {
    /// Общая часть события: стимул, клавиатура и смещение в данных.
    pub struct EventBase {
        pub stim_type: u16,
        pub keyboard: u8,
        pub keypad_accept: u8,
        pub offset: u32,
    }
}

packed_record! {
    /// Событие второго типа.
    pub struct EventRecord {
        pub base: EventBase,
        pub event_type: u16,
        pub event_code: u16,
        pub response_latency: f32,
        pub epoch_event: u8,
        pub accept: u8,
        pub accuracy: u8,
    }
}

/// Упорядоченный список событий.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTable {
    kind: u8,
    events: Vec<EventRecord>,
}

/// Число записей размера `record_size`, целиком помещающихся в `size` байт.
/// Остаток отбрасывается, отрицательный размер даёт 0.
pub fn event_count(
    size: i64,
    record_size: usize,
) -> usize {
    if size <= 0 || record_size == 0 {
        return 0;
    }

    (size as u64 / record_size as u64) as usize
}

impl EventRecord {
    pub fn new(
        stim_type: u16,
        offset: u32,
    ) -> Self {
        Self {
            base: EventBase {
                stim_type,
                offset,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self {
            kind: TEEG_EVENT2,
            events: Vec::new(),
        }
    }
}

impl EventTable {
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    /// Читает таблицу, начинающуюся с абсолютного смещения `offset`.
    pub fn read_at<R: Read + Seek>(
        r: &mut R,
        offset: u64,
    ) -> NsResult<Self> {
        r.seek(SeekFrom::Start(offset)).at(IoLocation::EventTable)?;
        Self::read_from(r)
    }

    /// Читает таблицу с текущей позиции потока.
    pub fn read_from<R: Read>(r: &mut R) -> NsResult<Self> {
        let teeg: TeegRecord = read_record(r, IoLocation::EventTable)?;
        let count = event_count(teeg.size, EventRecord::WIDTH);

        if teeg.size > 0 && teeg.size as u64 % EventRecord::WIDTH as u64 != 0 {
            warn!(
                "Event table size {} is not a multiple of {}, tail ignored",
                teeg.size,
                EventRecord::WIDTH
            );
        }

        let mut events = Vec::with_capacity(count.min(1 << 16));
        for index in 0..count {
            events.push(read_record(r, IoLocation::Event { index })?);
        }

        // Хвост, не образующий целой записи, пропускается
        let tail = teeg.size.max(0) as u64 - (count * EventRecord::WIDTH) as u64;
        if tail > 0 {
            std::io::copy(&mut r.by_ref().take(tail), &mut std::io::sink()).at(IoLocation::EventTable)?;
        }

        Ok(Self {
            kind: teeg.kind,
            events,
        })
    }

    pub fn write_to<W: Write>(
        &self,
        w: &mut W,
    ) -> NsResult<()> {
        let teeg = TeegRecord {
            kind: self.kind,
            size: self.byte_len() as i64,
        };
        write_record(w, &teeg, IoLocation::EventTable)?;

        for (index, ev) in self.events.iter().enumerate() {
            write_record(w, ev, IoLocation::Event { index })?;
        }

        Ok(())
    }

    /// Размер событий на диске без ведущей записи.
    pub fn byte_len(&self) -> usize {
        self.events.len() * EventRecord::WIDTH
    }

    pub fn kind(&self) -> u8 {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<&EventRecord> {
        self.events.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter()
    }

    pub fn push(
        &mut self,
        event: EventRecord,
    ) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn as_slice(&self) -> &[EventRecord] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_record_sizes() {
        assert_eq!(TeegRecord::WIDTH, 9);
        assert_eq!(EventBase::WIDTH, 8);
        assert_eq!(EventRecord::WIDTH, 19);
    }

    #[test]
    fn test_event_count_truncates() {
        assert_eq!(event_count(37, 12), 3);
        assert_eq!(event_count(38, 19), 2);
        assert_eq!(event_count(18, 19), 0);
        assert_eq!(event_count(-19, 19), 0);
    }

    #[test]
    fn test_table_roundtrip_at_offset() {
        let mut table = EventTable::default();
        table.push(EventRecord::new(1, 100));
        table.push(EventRecord::new(2, 2000));

        let mut file = vec![0xAAu8; 17];
        table.write_to(&mut file).unwrap();
        assert_eq!(file.len(), 17 + 9 + 2 * 19);
        assert_eq!(file[17], TEEG_EVENT2);

        let back = EventTable::read_at(&mut Cursor::new(file), 17).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.get(1).map(|e| e.base.offset), Some(2000));
    }

    #[test]
    fn test_partial_record_skipped() {
        let mut data = Vec::new();
        let teeg = TeegRecord {
            kind: TEEG_EVENT2,
            size: 19 + 7,
        };
        write_record(&mut data, &teeg, IoLocation::EventTable).unwrap();
        write_record(&mut data, &EventRecord::new(9, 4), IoLocation::Stream).unwrap();
        data.extend_from_slice(&[0u8; 7]);
        data.extend_from_slice(b"NEXT");

        let mut cursor = Cursor::new(data);
        let table = EventTable::read_from(&mut cursor).unwrap();

        assert_eq!(table.len(), 1);
        let mut rest = Vec::new();
        cursor.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"NEXT");
    }
}
