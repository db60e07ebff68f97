//! Таблица электродов: по одной записи на канал сразу за заголовком.

use std::io::{Read, Write};

use nsf_types::{IoContext, IoLocation, NsResult};

use crate::{
    binary::read_record,
    layout::{encode, packed_record, Field, FixedStr},
};

/// Размер записи электрода в байтах.
pub const ELECTRODE_SIZE: usize = 75;

packed_record! {
    /// Параметры одного канала.
    pub struct ElectrodeRecord {
        pub label: FixedStr<10>,
        pub reference: u8,
        pub skip: u8,
        pub reject: u8,
        pub display: u8,
        pub bad: u8,
        /// Число усреднённых проходов
        pub sweeps: u16,
        pub avg_reference: u8,
        pub clip_add: u8,
        pub x_coord: f32,
        pub y_coord: f32,
        pub veog_weight: f32,
        pub veog_std: f32,
        pub snr: f32,
        pub heog_weight: f32,
        pub heog_std: f32,
        pub baseline: u16,
        pub filtered: u8,
        pub fsp: u8,
        pub aux1_weight: f32,
        pub aux1_std: f32,
        /// Чувствительность усилителя, участвует в масштабировании выборок
        pub sensitivity: f32,
        pub gain: u8,
        pub high_pass: u8,
        pub low_pass: u8,
        pub page: u8,
        pub size: u8,
        pub impedance: u8,
        pub physical_channel: u8,
        pub rectify: u8,
        /// Калибровочный множитель
        pub calibration: f32,
    }
}

impl ElectrodeRecord {
    pub fn with_label(label: &str) -> Self {
        Self {
            label: FixedStr::new(label),
            ..Default::default()
        }
    }
}

/// Упорядоченная таблица электродов.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElectrodeTable {
    records: Vec<ElectrodeRecord>,
}

impl ElectrodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Таблица из `n` записей по умолчанию.
    pub fn with_channels(n: usize) -> Self {
        Self {
            records: vec![ElectrodeRecord::default(); n],
        }
    }

    pub fn from_records(records: Vec<ElectrodeRecord>) -> Self {
        Self { records }
    }

    /// Читает `n` подряд идущих записей.
    pub fn read_from<R: Read>(
        r: &mut R,
        n: usize,
    ) -> NsResult<Self> {
        let mut records = Vec::with_capacity(n);

        for index in 0..n {
            records.push(read_record(r, IoLocation::Electrode { index })?);
        }

        Ok(Self { records })
    }

    /// Кодирует всю таблицу; ошибка переполнения поля не оставляет
    /// частично записанных данных.
    pub fn encode(&self) -> NsResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.records.len() * ElectrodeRecord::WIDTH);

        for (i, rec) in self.records.iter().enumerate() {
            let bytes = encode(rec).map_err(|e| e.in_field(&format!("electrode[{i}]")))?;
            out.extend_from_slice(&bytes);
        }

        Ok(out)
    }

    pub fn write_to<W: Write>(
        &self,
        w: &mut W,
    ) -> NsResult<()> {
        let bytes = self.encode()?;
        w.write_all(&bytes).at(IoLocation::Electrode {
            index: self.records.len().saturating_sub(1),
        })
    }

    /// Размер таблицы на диске.
    pub fn byte_len(&self) -> usize {
        self.records.len() * ElectrodeRecord::WIDTH
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<&ElectrodeRecord> {
        self.records.get(index)
    }

    pub fn get_mut(
        &mut self,
        index: usize,
    ) -> Option<&mut ElectrodeRecord> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElectrodeRecord> {
        self.records.iter()
    }

    pub fn labels(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.label.as_str().to_string())
            .collect()
    }

    pub fn sensitivities(&self) -> Vec<f32> {
        self.records.iter().map(|r| r.sensitivity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{decode, field_offset};

    #[test]
    fn test_electrode_size() {
        assert_eq!(ElectrodeRecord::WIDTH, ELECTRODE_SIZE);
        assert_eq!(field_offset::<ElectrodeRecord>("sweeps"), Some(15));
        assert_eq!(field_offset::<ElectrodeRecord>("sensitivity"), Some(59));
        assert_eq!(field_offset::<ElectrodeRecord>("calibration"), Some(71));
    }

    #[test]
    fn test_table_roundtrip() {
        let mut table = ElectrodeTable::from_records(vec![
            ElectrodeRecord::with_label("Fp1"),
            ElectrodeRecord::with_label("Fp2"),
            ElectrodeRecord::with_label("Cz"),
        ]);
        if let Some(rec) = table.get_mut(2) {
            rec.sensitivity = 204.8;
            rec.calibration = 1.0;
            rec.sweeps = 40;
        }

        let bytes = table.encode().unwrap();
        assert_eq!(bytes.len(), 3 * ELECTRODE_SIZE);

        let back = ElectrodeTable::read_from(&mut bytes.as_slice(), 3).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.labels(), vec!["Fp1", "Fp2", "Cz"]);
        assert_eq!(back.sensitivities(), vec![0.0, 0.0, 204.8]);
    }

    #[test]
    fn test_label_overflow_reports_index() {
        let table = ElectrodeTable::from_records(vec![
            ElectrodeRecord::with_label("O1"),
            ElectrodeRecord::with_label("MuchTooLongLabel"),
        ]);

        let err = table.encode().unwrap_err();
        assert!(err.to_string().contains("electrode[1].ElectrodeRecord.label"));
    }

    #[test]
    fn test_short_table_is_truncated() {
        let bytes = vec![0u8; ELECTRODE_SIZE + 10];
        let err = ElectrodeTable::read_from(&mut bytes.as_slice(), 2).unwrap_err();

        assert!(err.is_truncated());
        assert!(decode::<ElectrodeRecord>(&bytes).is_ok());
    }
}
