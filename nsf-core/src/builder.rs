//! Приём данных из внешних форматов.
//!
//! Импортёр другого формата заполняет заголовок через [`HeaderSink`] и
//! передаёт выборки через [`SampleSink`] в порядке «по кадрам»:
//! `s0c0, s0c1, ..., s1c0, ...`. [`RecordingBuilder`] реализует оба трейта и
//! собирает непрерывную запись.

use log::debug;
use nsf_types::{definitions::AMPLIFIER_DIVISOR, NsResult};

use crate::{
    electrode::{ElectrodeRecord, ElectrodeTable},
    header::HeaderRecord,
    layout::FixedStr,
    recording::Recording,
    samples::SampleBuffer,
};

/// Идентификаторы пациента и сеанса.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectIds {
    pub patient_id: String,
    pub doctor: String,
    pub patient: String,
    pub date: String,
    pub time: String,
}

/// Приёмник метаданных заголовка.
pub trait HeaderSink {
    /// Задаёт число каналов. Применяется, только пока таблица электродов
    /// пуста; возвращает `true`, если значение принято.
    fn set_channel_count(
        &mut self,
        channels: usize,
    ) -> bool;

    fn set_sample_rate(
        &mut self,
        rate: u16,
    );

    /// Общий множитель перевода отсчётов в физические единицы.
    fn set_calibration_scale(
        &mut self,
        scale: f64,
    );

    fn set_electrode_label(
        &mut self,
        channel: usize,
        label: &str,
    ) -> bool;

    fn set_electrode_calibration(
        &mut self,
        channel: usize,
        calibration: f32,
    ) -> bool;

    fn set_subject_ids(
        &mut self,
        ids: &SubjectIds,
    );
}

/// Приёмник плоской последовательности выборок.
pub trait SampleSink {
    fn append_sample(
        &mut self,
        value: f32,
    );

    fn append_samples(
        &mut self,
        values: &[f32],
    ) {
        for &v in values {
            self.append_sample(v);
        }
    }
}

/// Сборщик непрерывной записи.
#[derive(Debug, Clone)]
pub struct RecordingBuilder {
    header: HeaderRecord,
    electrodes: ElectrodeTable,
    interleaved: Vec<f32>,
}

impl Default for RecordingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self {
            header: HeaderRecord::continuous(0),
            electrodes: ElectrodeTable::new(),
            interleaved: Vec::new(),
        }
    }

    pub fn channel_count(&self) -> usize {
        self.electrodes.len()
    }

    /// Принято значений (по всем каналам).
    pub fn sample_count(&self) -> usize {
        self.interleaved.len()
    }

    /// Собирает запись, переставляя выборки в канальный порядок.
    ///
    /// Ошибка `ShapeMismatch`, если число значений не кратно числу каналов.
    pub fn build(self) -> NsResult<Recording> {
        let channels = self.electrodes.len();
        let samples = SampleBuffer::from_interleaved(channels, &self.interleaved)?;

        let mut rec = Recording::new(self.header, self.electrodes)?;
        rec.set_samples(samples)?;

        debug!(
            "Built continuous recording: {channels} channels, {} samples",
            rec.header().num_samples
        );
        Ok(rec)
    }
}

impl HeaderSink for RecordingBuilder {
    fn set_channel_count(
        &mut self,
        channels: usize,
    ) -> bool {
        if !self.electrodes.is_empty() {
            return false;
        }

        // Чувствительность 204.8 сохраняет значения без масштабирования
        let template = ElectrodeRecord {
            sensitivity: AMPLIFIER_DIVISOR as f32,
            ..Default::default()
        };
        self.electrodes = ElectrodeTable::from_records(vec![template; channels]);
        true
    }

    fn set_sample_rate(
        &mut self,
        rate: u16,
    ) {
        self.header.rate = rate;
    }

    fn set_calibration_scale(
        &mut self,
        scale: f64,
    ) {
        self.header.scale = scale;
    }

    fn set_electrode_label(
        &mut self,
        channel: usize,
        label: &str,
    ) -> bool {
        self.electrodes
            .get_mut(channel)
            .map(|e| e.label.set(label))
            .is_some()
    }

    fn set_electrode_calibration(
        &mut self,
        channel: usize,
        calibration: f32,
    ) -> bool {
        self.electrodes
            .get_mut(channel)
            .map(|e| e.calibration = calibration)
            .is_some()
    }

    fn set_subject_ids(
        &mut self,
        ids: &SubjectIds,
    ) {
        self.header.patient_id = FixedStr::new(ids.patient_id.as_str());
        self.header.doctor = FixedStr::new(ids.doctor.as_str());
        self.header.patient = FixedStr::new(ids.patient.as_str());
        self.header.date = FixedStr::new(ids.date.as_str());
        self.header.time = FixedStr::new(ids.time.as_str());
    }
}

impl SampleSink for RecordingBuilder {
    fn append_sample(
        &mut self,
        value: f32,
    ) {
        self.interleaved.push(value);
    }

    fn append_samples(
        &mut self,
        values: &[f32],
    ) {
        self.interleaved.extend_from_slice(values);
    }
}

#[cfg(test)]
mod tests {
    use nsf_types::{FileType, NsError};

    use super::*;

    #[test]
    fn test_channel_count_set_once() {
        let mut b = RecordingBuilder::new();

        assert!(b.set_channel_count(4));
        assert!(!b.set_channel_count(8));
        assert_eq!(b.channel_count(), 4);
    }

    #[test]
    fn test_zero_channels_can_be_replaced() {
        let mut b = RecordingBuilder::new();

        assert!(b.set_channel_count(0));
        assert!(b.set_channel_count(2));
        assert_eq!(b.channel_count(), 2);
    }

    #[test]
    fn test_build_transposes() {
        let mut b = RecordingBuilder::new();
        b.set_channel_count(2);
        b.set_sample_rate(256);
        assert!(b.set_electrode_label(1, "Oz"));
        assert!(!b.set_electrode_label(2, "none"));
        b.append_samples(&[1.0, 10.0, 2.0, 20.0, 3.0]);
        b.append_sample(30.0);

        let rec = b.build().unwrap();

        assert_eq!(rec.file_type(), FileType::Continuous);
        assert_eq!(rec.header().num_samples, 3);
        assert_eq!(rec.header().rate, 256);
        assert_eq!(rec.samples().channel(1), Some(&[10.0, 20.0, 30.0][..]));
        assert_eq!(rec.channel_names(), vec!["", "Oz"]);
    }

    #[test]
    fn test_incomplete_frame_rejected() {
        let mut b = RecordingBuilder::new();
        b.set_channel_count(3);
        b.append_samples(&[1.0, 2.0]);

        assert!(matches!(b.build(), Err(NsError::ShapeMismatch(_))));
    }

    #[test]
    fn test_subject_ids() {
        let mut b = RecordingBuilder::new();
        b.set_channel_count(1);
        b.set_subject_ids(&SubjectIds {
            patient_id: "P-17".into(),
            doctor: "Dr. Orlov".into(),
            ..Default::default()
        });

        let rec = b.build().unwrap();
        assert_eq!(rec.header().patient_id.as_str(), "P-17");
        assert_eq!(rec.header().doctor.as_str(), "Dr. Orlov");
    }
}
