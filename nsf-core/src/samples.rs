//! Кодеки блока выборок.
//!
//! В памяти выборки всегда хранятся канально: значение канала `c` в точке
//! `i` лежит по индексу `c * points + i`. На диске раскладка зависит от типа
//! файла:
//!
//! ```text
//! Continuous:  [s0c0 s0c1 .. s0cN][s1c0 ..] ...      i32, по выборкам
//! Average:     [5 байт метки][p0 .. pM] x каналы     f32, по каналам
//!              [p0 .. pM] x каналы                   f32, дисперсия (опц.)
//! ```

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use nsf_types::{
    definitions::{AMPLIFIER_DIVISOR, AVERAGED_LABEL_WIDTH},
    FileType, IoContext, IoLocation, NsError, NsResult,
};

use crate::header::HeaderRecord;

/// Канально упорядоченный буфер значений `channels x points`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleBuffer {
    channels: usize,
    points: usize,
    values: Vec<f32>,
}

/// Геометрия блока выборок, выведенная из заголовка.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLayout {
    /// Непрерывная запись: `samples` выборок i32 на канал
    Continuous { samples: usize },
    /// Усреднённый файл: `points` точек f32 на канал и, возможно, дисперсия
    Averaged { points: usize, variance: bool },
}

/// Результат декодирования блока выборок.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedSamples {
    pub samples: SampleBuffer,
    pub variance: Option<SampleBuffer>,
}

impl SampleBuffer {
    /// Нулевой буфер.
    pub fn new(
        channels: usize,
        points: usize,
    ) -> Self {
        Self {
            channels,
            points,
            values: vec![0.0; channels * points],
        }
    }

    /// Оборачивает канально упорядоченные значения, проверяя длину.
    pub fn from_values(
        channels: usize,
        points: usize,
        values: Vec<f32>,
    ) -> NsResult<Self> {
        if values.len() != channels * points {
            return Err(NsError::shape_mismatch(format!(
                "{} values for {channels} channels x {points} points",
                values.len()
            )));
        }

        Ok(Self {
            channels,
            points,
            values,
        })
    }

    /// Переставляет значения из порядка «по выборкам» (как приходят с
    /// усилителя) в канальный.
    pub fn from_interleaved(
        channels: usize,
        interleaved: &[f32],
    ) -> NsResult<Self> {
        if channels == 0 {
            return if interleaved.is_empty() {
                Ok(Self::default())
            } else {
                Err(NsError::shape_mismatch("samples without channels"))
            };
        }

        if interleaved.len() % channels != 0 {
            return Err(NsError::shape_mismatch(format!(
                "{} interleaved values do not form whole frames of {channels} channels",
                interleaved.len()
            )));
        }

        let points = interleaved.len() / channels;
        let mut values = vec![0.0; interleaved.len()];

        for (i, frame) in interleaved.chunks_exact(channels).enumerate() {
            for (c, &v) in frame.iter().enumerate() {
                values[c * points + i] = v;
            }
        }

        Ok(Self {
            channels,
            points,
            values,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Точек (выборок) на канал.
    pub fn points(&self) -> usize {
        self.points
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(
        &self,
        channel: usize,
        point: usize,
    ) -> Option<f32> {
        self.offset(channel, point).map(|i| self.values[i])
    }

    /// Записывает значение; `false`, если индекс вне буфера.
    pub fn set(
        &mut self,
        channel: usize,
        point: usize,
        value: f32,
    ) -> bool {
        match self.offset(channel, point) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// Значения одного канала.
    pub fn channel(
        &self,
        channel: usize,
    ) -> Option<&[f32]> {
        (channel < self.channels).then(|| &self.values[channel * self.points..(channel + 1) * self.points])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    pub fn has_shape(
        &self,
        channels: usize,
        points: usize,
    ) -> bool {
        self.channels == channels && self.points == points
    }

    fn offset(
        &self,
        channel: usize,
        point: usize,
    ) -> Option<usize> {
        (channel < self.channels && point < self.points).then(|| channel * self.points + point)
    }
}

impl SampleLayout {
    /// Раскладка для файла данного типа; `None` для типов без выборок.
    pub fn for_header(
        header: &HeaderRecord,
        file_type: FileType,
    ) -> Option<Self> {
        match file_type {
            FileType::Continuous => Some(Self::Continuous {
                samples: header.num_samples as usize,
            }),
            FileType::Average => Some(Self::Averaged {
                points: header.points as usize,
                variance: header.has_variance(),
            }),
            FileType::Coherence | FileType::Unknown => None,
        }
    }

    /// Точек на канал.
    pub fn points(&self) -> usize {
        match *self {
            Self::Continuous { samples } => samples,
            Self::Averaged { points, .. } => points,
        }
    }

    pub fn has_variance(&self) -> bool {
        matches!(self, Self::Averaged { variance: true, .. })
    }

    /// Размер блока на диске для `channels` каналов.
    pub fn byte_len(
        &self,
        channels: usize,
    ) -> u64 {
        let channels = channels as u64;

        match *self {
            Self::Continuous { samples } => channels * samples as u64 * 4,
            Self::Averaged { points, variance } => {
                let main = channels * (AVERAGED_LABEL_WIDTH as u64 + points as u64 * 4);
                let var = if variance { channels * points as u64 * 4 } else { 0 };
                main + var
            }
        }
    }

    pub fn decode<R: Read>(
        &self,
        r: &mut R,
        channels: usize,
    ) -> NsResult<DecodedSamples> {
        match *self {
            Self::Continuous { samples } => Ok(DecodedSamples {
                samples: decode_continuous(r, channels, samples)?,
                variance: None,
            }),
            Self::Averaged { points, variance } => decode_averaged(r, channels, points, variance),
        }
    }
}

/// Переводит значение в сырой отсчёт непрерывного файла.
///
/// `round(value / 204.8 * sensitivity)`; приведение `as` насыщает результат
/// до диапазона i32.
pub fn scale_to_raw(
    value: f32,
    sensitivity: f32,
) -> i32 {
    (value as f64 / AMPLIFIER_DIVISOR * sensitivity as f64).round() as i32
}

/// Читает непрерывные данные: `samples` кадров по `channels` отсчётов i32.
/// Отсчёты сохраняются без масштабирования.
pub fn decode_continuous<R: Read>(
    r: &mut R,
    channels: usize,
    samples: usize,
) -> NsResult<SampleBuffer> {
    let mut buf = SampleBuffer::new(channels, samples);

    for index in 0..samples {
        for channel in 0..channels {
            let raw = r
                .read_i32::<LittleEndian>()
                .at(IoLocation::Sample { channel, index })?;
            buf.values[channel * samples + index] = raw as f32;
        }
    }

    Ok(buf)
}

/// Пишет непрерывные данные по кадрам, масштабируя каждое значение
/// чувствительностью своего канала.
pub fn encode_continuous<W: Write>(
    w: &mut W,
    samples: &SampleBuffer,
    sensitivities: &[f32],
) -> NsResult<()> {
    if sensitivities.len() != samples.channels {
        return Err(NsError::shape_mismatch(format!(
            "{} sensitivities for {} channels",
            sensitivities.len(),
            samples.channels
        )));
    }

    for index in 0..samples.points {
        for (channel, &sens) in sensitivities.iter().enumerate() {
            let value = samples.values[channel * samples.points + index];
            w.write_i32::<LittleEndian>(scale_to_raw(value, sens))
                .at(IoLocation::Sample { channel, index })?;
        }
    }

    Ok(())
}

/// Читает усреднённые данные и, при `with_variance`, следующий за ними
/// блок дисперсии. Метка перед каждым каналом пропускается.
pub fn decode_averaged<R: Read>(
    r: &mut R,
    channels: usize,
    points: usize,
    with_variance: bool,
) -> NsResult<DecodedSamples> {
    let mut samples = SampleBuffer::new(channels, points);
    let mut label = [0u8; AVERAGED_LABEL_WIDTH];

    for channel in 0..channels {
        r.read_exact(&mut label)
            .at(IoLocation::Sample { channel, index: 0 })?;

        for index in 0..points {
            samples.values[channel * points + index] = r
                .read_f32::<LittleEndian>()
                .at(IoLocation::Sample { channel, index })?;
        }
    }

    let variance = if with_variance {
        let mut var = SampleBuffer::new(channels, points);

        for channel in 0..channels {
            for point in 0..points {
                var.values[channel * points + point] = r
                    .read_f32::<LittleEndian>()
                    .at(IoLocation::Variance { channel, point })?;
            }
        }

        Some(var)
    } else {
        None
    };

    Ok(DecodedSamples { samples, variance })
}

/// Пишет усреднённые данные: нулевая метка и значения каждого канала, затем
/// блок дисперсии без меток, если он передан.
pub fn encode_averaged<W: Write>(
    w: &mut W,
    samples: &SampleBuffer,
    variance: Option<&SampleBuffer>,
) -> NsResult<()> {
    if let Some(var) = variance {
        if !var.has_shape(samples.channels, samples.points) {
            return Err(NsError::shape_mismatch(format!(
                "variance {}x{} differs from samples {}x{}",
                var.channels, var.points, samples.channels, samples.points
            )));
        }
    }

    let label = [0u8; AVERAGED_LABEL_WIDTH];

    for channel in 0..samples.channels {
        w.write_all(&label)
            .at(IoLocation::Sample { channel, index: 0 })?;

        for index in 0..samples.points {
            w.write_f32::<LittleEndian>(samples.values[channel * samples.points + index])
                .at(IoLocation::Sample { channel, index })?;
        }
    }

    if let Some(var) = variance {
        for channel in 0..var.channels {
            for point in 0..var.points {
                w.write_f32::<LittleEndian>(var.values[channel * var.points + point])
                    .at(IoLocation::Variance { channel, point })?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_to_raw() {
        assert_eq!(scale_to_raw(1000.0, 1.0), 5);
        assert_eq!(scale_to_raw(204.8, 1.0), 1);
        assert_eq!(scale_to_raw(-1000.0, 1.0), -5);
        assert_eq!(scale_to_raw(0.0, 0.0), 0);
        assert_eq!(scale_to_raw(f32::MAX, 1000.0), i32::MAX);
        assert_eq!(scale_to_raw(f32::MIN, 1000.0), i32::MIN);
    }

    #[test]
    fn test_continuous_is_sample_major_on_disk() {
        let samples = SampleBuffer::from_values(2, 3, vec![204.8, 409.6, 614.4, -204.8, -409.6, -614.4]).unwrap();
        let mut out = Vec::new();
        encode_continuous(&mut out, &samples, &[1.0, 1.0]).unwrap();

        assert_eq!(out.len(), 2 * 3 * 4);
        let raw: Vec<i32> = out
            .chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        assert_eq!(raw, vec![1, -1, 2, -2, 3, -3]);

        let back = decode_continuous(&mut out.as_slice(), 2, 3).unwrap();
        assert_eq!(back.channel(0), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(back.channel(1), Some(&[-1.0, -2.0, -3.0][..]));
    }

    #[test]
    fn test_continuous_truncated_reports_position() {
        let data = vec![0u8; 4 * 3];
        let err = decode_continuous(&mut data.as_slice(), 2, 2).unwrap_err();

        match err {
            NsError::IoFailure { location, .. } => {
                assert_eq!(location, IoLocation::Sample { channel: 1, index: 1 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sensitivity_count_checked() {
        let samples = SampleBuffer::new(3, 1);
        let err = encode_continuous(&mut Vec::new(), &samples, &[1.0]).unwrap_err();

        assert!(matches!(err, NsError::ShapeMismatch(_)));
    }

    #[test]
    fn test_averaged_layout_with_variance() {
        let samples = SampleBuffer::from_values(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let variance = SampleBuffer::from_values(2, 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap();

        let mut out = Vec::new();
        encode_averaged(&mut out, &samples, Some(&variance)).unwrap();

        let layout = SampleLayout::Averaged {
            points: 2,
            variance: true,
        };
        assert_eq!(out.len() as u64, layout.byte_len(2));
        assert_eq!(&out[..5], &[0u8; 5]);
        assert_eq!(&out[13..18], &[0u8; 5]);

        let decoded = layout.decode(&mut out.as_slice(), 2).unwrap();
        assert_eq!(decoded.samples, samples);
        assert_eq!(decoded.variance, Some(variance));
    }

    #[test]
    fn test_averaged_ignores_label_contents() {
        let mut data = Vec::new();
        data.extend_from_slice(b"Cz\0\0\0");
        data.extend_from_slice(&2.5f32.to_le_bytes());

        let decoded = decode_averaged(&mut data.as_slice(), 1, 1, false).unwrap();
        assert_eq!(decoded.samples.get(0, 0), Some(2.5));
        assert!(decoded.variance.is_none());
    }

    #[test]
    fn test_interleaved_transpose() {
        let buf = SampleBuffer::from_interleaved(3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        assert_eq!(buf.points(), 2);
        assert_eq!(buf.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert!(SampleBuffer::from_interleaved(3, &[1.0, 2.0]).is_err());
        assert!(SampleBuffer::from_interleaved(0, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_buffer_bounds() {
        let mut buf = SampleBuffer::new(2, 2);

        assert!(buf.set(1, 1, 7.0));
        assert!(!buf.set(2, 0, 1.0));
        assert_eq!(buf.get(1, 1), Some(7.0));
        assert_eq!(buf.get(0, 2), None);
        assert_eq!(buf.channel(5), None);
        assert!(SampleBuffer::from_values(2, 2, vec![0.0; 3]).is_err());
    }
}
