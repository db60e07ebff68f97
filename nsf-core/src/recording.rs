//! Файл записи целиком: загрузка, доступ к данным и сохранение.
//!
//! Порядок секций на диске:
//!
//! ```text
//! HeaderRecord                 900 байт
//! ElectrodeRecord x N          75 * N
//! блок выборок                 см. [`SampleLayout`]
//! таблица событий              только Continuous
//! область чанков               необязательна
//! ```
//!
//! Для файлов Coherence/Unknown всё, что идёт после таблицы электродов,
//! хранится как непрозрачный хвост и записывается обратно без изменений.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::Path,
};

use log::{debug, info, warn};
use nsf_types::{FileType, IoContext, IoLocation, NsError, NsResult};
use tempfile::NamedTempFile;

use crate::{
    binary::{read_record, read_remainder},
    chunk::{ChunkReader, ChunkSet, ChunkWriter},
    classify::classify,
    electrode::{ElectrodeRecord, ElectrodeTable, ELECTRODE_SIZE},
    events::EventTable,
    header::{HeaderRecord, HEADER_SIZE},
    layout::encode,
    samples::{encode_averaged, encode_continuous, SampleBuffer, SampleLayout},
    setup::SetupRecords,
};

/// Загруженная в память запись.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    header: HeaderRecord,
    electrodes: ElectrodeTable,
    samples: SampleBuffer,
    variance: Option<SampleBuffer>,
    events: EventTable,
    setup: SetupRecords,
    /// Чанки, которые не разбираются, но сохраняются при записи
    extra_chunks: ChunkSet,
    opaque_tail: Vec<u8>,
    /// Смещение области чанков в загруженном файле
    region_offset: Option<u64>,
}

/// Смещение блока выборок для `channels` каналов.
pub fn data_offset(channels: usize) -> u64 {
    (HEADER_SIZE + ELECTRODE_SIZE * channels) as u64
}

impl Recording {
    /// Пустая запись с нулевыми выборками нужной формы.
    ///
    /// Число каналов заголовка берётся из таблицы электродов.
    pub fn new(
        mut header: HeaderRecord,
        electrodes: ElectrodeTable,
    ) -> NsResult<Self> {
        let channels = electrodes.len();
        header.nchannels = channel_count_u16(channels)?;

        let layout = SampleLayout::for_header(&header, classify(&header));
        let points = layout.map_or(0, |l| l.points());
        let variance = layout
            .filter(SampleLayout::has_variance)
            .map(|_| SampleBuffer::new(channels, points));

        Ok(Self {
            header,
            electrodes,
            samples: SampleBuffer::new(channels, points),
            variance,
            events: EventTable::default(),
            setup: SetupRecords::with_channels(channels),
            extra_chunks: ChunkSet::new(),
            opaque_tail: Vec::new(),
            region_offset: None,
        })
    }

    /// Открывает и загружает файл.
    pub fn open<P: AsRef<Path>>(path: P) -> NsResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).at(IoLocation::Stream)?;

        let rec = Self::load(file)?;
        info!(
            "Loaded {} ({}, {} channels)",
            path.display(),
            rec.file_type(),
            rec.channel_count()
        );

        Ok(rec)
    }

    /// Загружает запись из потока, начиная с его текущей позиции.
    ///
    /// Смещения из заголовка отсчитываются от этой позиции. Блок выборок
    /// длиннее остатка потока отвергается с `TruncatedRecord` до выделения
    /// буферов.
    pub fn load<R: Read + Seek>(inner: R) -> NsResult<Self> {
        let mut r = BufReader::new(inner);
        let base = r.stream_position().at(IoLocation::Stream)?;

        let header: HeaderRecord = read_record(&mut r, IoLocation::Header)
            .map_err(|e| NsError::corrupt_header(e.to_string()))?;
        let channels = header.channel_count();
        let electrodes = ElectrodeTable::read_from(&mut r, channels)?;

        let file_type = classify(&header);
        debug!("Classified as {file_type}: {channels} channels, rate {}", header.rate);

        let mut rec = Self {
            header,
            electrodes,
            samples: SampleBuffer::new(channels, 0),
            variance: None,
            events: EventTable::default(),
            setup: SetupRecords::with_channels(channels),
            extra_chunks: ChunkSet::new(),
            opaque_tail: Vec::new(),
            region_offset: None,
        };

        let Some(layout) = SampleLayout::for_header(&rec.header, file_type) else {
            rec.opaque_tail = read_remainder(&mut r, IoLocation::OpaqueTail)?;
            debug!("Kept {} opaque bytes", rec.opaque_tail.len());
            return Ok(rec);
        };

        let data_len = layout.byte_len(channels);
        let left = bytes_left(&mut r)?;
        if left < data_len {
            return Err(NsError::TruncatedRecord {
                record: "sample data",
                expected: usize::try_from(data_len).unwrap_or(usize::MAX),
                found: usize::try_from(left).unwrap_or(usize::MAX),
            });
        }

        let decoded = layout.decode(&mut r, channels)?;
        rec.samples = decoded.samples;
        rec.variance = decoded.variance;
        debug!("Decoded {} x {} samples", channels, layout.points());

        if file_type == FileType::Continuous {
            let data_end = base + data_offset(channels) + data_len;
            rec.events = read_events(&mut r, &rec.header, base, data_end)?;
        }

        if r.fill_buf().at(IoLocation::ChunkRegion)?.is_empty() {
            debug!("No setup region, using defaults");
            rec.setup = SetupRecords::from_chunks(&ChunkSet::new(), channels).0;
            return Ok(rec);
        }

        let region_start = r.stream_position().at(IoLocation::ChunkRegion)?;
        let mut reader = match ChunkReader::open(&mut r) {
            Ok(reader) => reader,
            Err(e) if e.is_truncated() => {
                warn!("Setup region cut short ({e}), using defaults");
                rec.setup = SetupRecords::from_chunks(&ChunkSet::new(), channels).0;
                return Ok(rec);
            }
            Err(e) => return Err(e),
        };

        let chunks = ChunkSet::read_from(&mut reader)?;
        let (setup, extra) = SetupRecords::from_chunks(&chunks, channels);
        debug!(
            "Setup region: {} chunks, {} defaulted, {} extra",
            chunks.len(),
            setup.defaulted().len(),
            extra.len()
        );

        rec.setup = setup;
        rec.extra_chunks = extra;
        rec.region_offset = Some(region_start - base);

        Ok(rec)
    }

    /// Сохраняет запись в поток.
    ///
    /// Перед записью обновляет в заголовке смещение таблицы событий и их
    /// число. Несоответствие формы буферов заголовку и переполнение строковых
    /// полей обнаруживаются до записи первого байта.
    pub fn save<W: Write>(
        &mut self,
        inner: W,
    ) -> NsResult<()> {
        let file_type = self.file_type();
        let channels = self.electrodes.len();
        self.header.nchannels = channel_count_u16(channels)?;

        let layout = SampleLayout::for_header(&self.header, file_type);
        if let Some(layout) = layout {
            self.check_shape(layout)?;
        }

        if let Some(layout @ SampleLayout::Continuous { .. }) = layout {
            let pos = data_offset(channels) + layout.byte_len(channels);
            self.header.event_table_pos = u32::try_from(pos).map_err(|_| {
                NsError::shape_mismatch(format!("event table offset {pos} exceeds 32 bits"))
            })?;
            self.header.num_events = i32::try_from(self.events.len()).map_err(|_| {
                NsError::shape_mismatch(format!("{} events", self.events.len()))
            })?;
        }

        let header_bytes = encode(&self.header)?;
        let electrode_bytes = self.electrodes.encode()?;
        let chunks = match layout {
            Some(_) => Some(self.setup.to_chunks()?),
            None => None,
        };

        let mut w = BufWriter::new(inner);
        w.write_all(&header_bytes).at(IoLocation::Header)?;
        w.write_all(&electrode_bytes)
            .at(IoLocation::Electrode { index: 0 })?;

        match layout {
            None => w
                .write_all(&self.opaque_tail)
                .at(IoLocation::OpaqueTail)?,
            Some(SampleLayout::Continuous { .. }) => {
                encode_continuous(&mut w, &self.samples, &self.electrodes.sensitivities())?;
                self.events.write_to(&mut w)?;
            }
            Some(SampleLayout::Averaged { variance, .. }) => {
                let var = if variance { self.variance.as_ref() } else { None };
                encode_averaged(&mut w, &self.samples, var)?;
            }
        }

        if let Some(chunks) = chunks {
            let mut cw = ChunkWriter::create(&mut w)?;
            chunks.write_to(&mut cw)?;
            self.extra_chunks.write_to(&mut cw)?;
            debug!("Wrote {} setup chunks", cw.chunk_count());
            cw.finish()?;
        }

        w.flush().at(IoLocation::Stream)?;
        debug!("Saved {file_type}: {channels} channels");

        Ok(())
    }

    /// Атомарно сохраняет запись по пути: данные пишутся во временный файл
    /// рядом с целевым и переименовываются только после успешной записи.
    pub fn save_to_path<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> NsResult<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).at(IoLocation::Stream)?;
        self.save(tmp.as_file_mut())?;
        tmp.as_file().sync_all().at(IoLocation::Stream)?;
        tmp.persist(path)
            .map_err(|e| NsError::io_at(IoLocation::Stream, e.error))?;

        info!("Saved {} to {}", self.file_type(), path.display());
        Ok(())
    }

    ////////////////////////////////////////////////////////////////////////////
    // Доступ
    ////////////////////////////////////////////////////////////////////////////

    /// Тип файла; вычисляется заново при каждом вызове.
    pub fn file_type(&self) -> FileType {
        classify(&self.header)
    }

    pub fn header(&self) -> &HeaderRecord {
        &self.header
    }

    /// Заголовок для изменения. Число каналов через него не меняется.
    pub fn header_mut(&mut self) -> &mut HeaderRecord {
        &mut self.header
    }

    pub fn channel_count(&self) -> usize {
        self.electrodes.len()
    }

    pub fn electrodes(&self) -> &ElectrodeTable {
        &self.electrodes
    }

    pub fn electrode_mut(
        &mut self,
        channel: usize,
    ) -> Option<&mut ElectrodeRecord> {
        self.electrodes.get_mut(channel)
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.electrodes.labels()
    }

    pub fn electrode_label(
        &self,
        channel: usize,
    ) -> Option<&str> {
        self.electrodes.get(channel).map(|e| e.label.as_str())
    }

    pub fn set_electrode_label(
        &mut self,
        channel: usize,
        label: &str,
    ) -> bool {
        self.electrodes
            .get_mut(channel)
            .map(|e| e.label.set(label))
            .is_some()
    }

    pub fn electrode_calibration(
        &self,
        channel: usize,
    ) -> Option<f32> {
        self.electrodes.get(channel).map(|e| e.calibration)
    }

    pub fn set_electrode_calibration(
        &mut self,
        channel: usize,
        calibration: f32,
    ) -> bool {
        self.electrodes
            .get_mut(channel)
            .map(|e| e.calibration = calibration)
            .is_some()
    }

    pub fn electrode_sweeps(
        &self,
        channel: usize,
    ) -> Option<u16> {
        self.electrodes.get(channel).map(|e| e.sweeps)
    }

    pub fn set_electrode_sweeps(
        &mut self,
        channel: usize,
        sweeps: u16,
    ) -> bool {
        self.electrodes
            .get_mut(channel)
            .map(|e| e.sweeps = sweeps)
            .is_some()
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    /// Значение как оно хранится в буфере.
    pub fn sample(
        &self,
        channel: usize,
        point: usize,
    ) -> Option<f32> {
        self.samples.get(channel, point)
    }

    pub fn set_sample(
        &mut self,
        channel: usize,
        point: usize,
        value: f32,
    ) -> bool {
        self.samples.set(channel, point, value)
    }

    /// Значение в физических единицах: делится на число проходов канала
    /// (если оно ненулевое) и умножается на калибровку.
    pub fn calibrated_sample(
        &self,
        channel: usize,
        point: usize,
    ) -> Option<f32> {
        let value = self.samples.get(channel, point)?;
        let electrode = self.electrodes.get(channel)?;
        let sweeps = if electrode.sweeps == 0 { 1.0 } else { electrode.sweeps as f32 };

        Some(value / sweeps * electrode.calibration)
    }

    /// Заменяет буфер выборок и обновляет геометрию заголовка (число
    /// выборок или точек).
    pub fn set_samples(
        &mut self,
        samples: SampleBuffer,
    ) -> NsResult<()> {
        if samples.channels() != self.channel_count() {
            return Err(NsError::shape_mismatch(format!(
                "{} channels in buffer, {} electrodes",
                samples.channels(),
                self.channel_count()
            )));
        }

        match self.file_type() {
            FileType::Continuous => {
                self.header.num_samples = u32::try_from(samples.points()).map_err(|_| {
                    NsError::shape_mismatch(format!("{} samples per channel", samples.points()))
                })?;
            }
            FileType::Average => {
                self.header.points = u16::try_from(samples.points()).map_err(|_| {
                    NsError::shape_mismatch(format!("{} points per channel", samples.points()))
                })?;
            }
            other => {
                return Err(NsError::shape_mismatch(format!("{other} files carry no samples")));
            }
        }

        self.samples = samples;
        Ok(())
    }

    pub fn variance(&self) -> Option<&SampleBuffer> {
        self.variance.as_ref()
    }

    /// Задаёт или убирает блок дисперсии; флаг в заголовке следует за ним.
    pub fn set_variance(
        &mut self,
        variance: Option<SampleBuffer>,
    ) -> NsResult<()> {
        if let Some(var) = &variance {
            if !var.has_shape(self.samples.channels(), self.samples.points()) {
                return Err(NsError::shape_mismatch(format!(
                    "variance {}x{} differs from samples {}x{}",
                    var.channels(),
                    var.points(),
                    self.samples.channels(),
                    self.samples.points()
                )));
            }
        }

        self.header.set_variance(variance.is_some());
        self.variance = variance;
        Ok(())
    }

    pub fn events(&self) -> &EventTable {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventTable {
        &mut self.events
    }

    pub fn setup(&self) -> &SetupRecords {
        &self.setup
    }

    pub fn setup_mut(&mut self) -> &mut SetupRecords {
        &mut self.setup
    }

    pub fn extra_chunks(&self) -> &ChunkSet {
        &self.extra_chunks
    }

    pub fn extra_chunks_mut(&mut self) -> &mut ChunkSet {
        &mut self.extra_chunks
    }

    /// Неразобранные байты файла Coherence/Unknown.
    pub fn opaque_tail(&self) -> &[u8] {
        &self.opaque_tail
    }

    /// Где в загруженном файле начиналась область чанков, если она была.
    pub fn region_offset(&self) -> Option<u64> {
        self.region_offset
    }

    /// Подчанки области в порядке записи: блоки настроек, взятые из файла,
    /// и затем оставшиеся чанки.
    pub fn region_chunks(&self) -> NsResult<ChunkSet> {
        let defaulted: HashSet<u32> = self.setup.defaulted().iter().copied().collect();

        let mut set = self.setup.to_chunks()?.filtered(|c| !defaulted.contains(&c.id));
        set.extend(&self.extra_chunks);

        Ok(set)
    }

    fn check_shape(
        &self,
        layout: SampleLayout,
    ) -> NsResult<()> {
        let channels = self.electrodes.len();
        let points = layout.points();

        if !self.samples.has_shape(channels, points) {
            return Err(NsError::shape_mismatch(format!(
                "samples are {}x{}, header expects {channels}x{points}",
                self.samples.channels(),
                self.samples.points()
            )));
        }

        if layout.has_variance() {
            match &self.variance {
                Some(var) if var.has_shape(channels, points) => {}
                Some(var) => {
                    return Err(NsError::shape_mismatch(format!(
                        "variance is {}x{}, header expects {channels}x{points}",
                        var.channels(),
                        var.points()
                    )));
                }
                None => {
                    return Err(NsError::shape_mismatch("variance flag set without variance data"));
                }
            }
        }

        if self.setup.electrodes.len() != channels {
            return Err(NsError::shape_mismatch(format!(
                "{} electrode setup blocks for {channels} channels",
                self.setup.electrodes.len()
            )));
        }

        Ok(())
    }
}

/// Сколько байт осталось в потоке от текущей позиции.
fn bytes_left<R: Seek>(r: &mut R) -> NsResult<u64> {
    let pos = r.stream_position().at(IoLocation::Stream)?;
    let end = r.seek(SeekFrom::End(0)).at(IoLocation::Stream)?;
    r.seek(SeekFrom::Start(pos)).at(IoLocation::Stream)?;

    Ok(end.saturating_sub(pos))
}

/// Читает таблицу событий непрерывного файла.
///
/// Смещение из заголовка, указывающее внутрь данных, заменяется концом
/// блока выборок. Если после данных ничего нет, таблица пуста.
fn read_events<R: BufRead + Seek>(
    r: &mut R,
    header: &HeaderRecord,
    base: u64,
    data_end: u64,
) -> NsResult<EventTable> {
    let mut pos = base + header.event_table_pos as u64;

    if pos < data_end {
        warn!("Event table offset {pos} points into sample data, reading at {data_end}");
        pos = data_end;
    }

    r.seek(SeekFrom::Start(pos))
        .at(IoLocation::EventTable)?;

    if r.fill_buf().at(IoLocation::EventTable)?.is_empty() {
        debug!("No event table");
        return Ok(EventTable::default());
    }

    let events = EventTable::read_from(r)?;
    if events.len() as i64 != header.num_events as i64 {
        debug!(
            "Header counts {} events, table holds {}",
            header.num_events,
            events.len()
        );
    }

    Ok(events)
}

fn channel_count_u16(channels: usize) -> NsResult<u16> {
    u16::try_from(channels)
        .map_err(|_| NsError::shape_mismatch(format!("{channels} channels exceed header capacity")))
}
