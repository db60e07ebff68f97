//! Основной заголовок файла (900 байт).

use nsf_types::{definitions::*, Gender, Handedness};

use crate::layout::{packed_record, FixedStr, Reserved};

/// Размер основного заголовка в байтах.
pub const HEADER_SIZE: usize = 900;

/// Строка ревизии, которую пишут новые файлы.
pub const DEFAULT_REVISION: &str = "Version 3.0";

packed_record! {
    /// Основной заголовок: сведения о пациенте, параметры сбора,
    /// фильтрации, отображения, калибровки и геометрия данных.
    pub struct HeaderRecord {
        pub revision: FixedStr<12>,
        pub next_file: u32,
        pub prev_file: u32,
        pub type_code: u8,
        pub patient_id: FixedStr<20>,
        pub operator: FixedStr<20>,
        pub doctor: FixedStr<20>,
        pub referral: FixedStr<20>,
        pub hospital: FixedStr<20>,
        pub patient: FixedStr<20>,
        pub age: u16,
        pub sex: u8,
        pub hand: u8,
        pub medications: FixedStr<20>,
        pub category: FixedStr<20>,
        pub state: FixedStr<20>,
        pub label: FixedStr<20>,
        pub date: FixedStr<10>,
        pub time: FixedStr<12>,
        pub mean_age: f32,
        pub stdev: f32,
        pub group_count: u16,
        pub comparison_file: FixedStr<38>,
        pub spect_win_comp: f32,
        pub mean_accuracy: f32,
        pub mean_latency: f32,
        pub sort_file: FixedStr<46>,
        pub num_events: i32,
        pub comparison_op: u8,
        pub avg_mode: u8,
        pub review: u8,
        pub sweeps: u16,
        pub comparison_sweeps: u16,
        pub accept_count: u16,
        pub reject_count: u16,
        /// Точек на канал в усреднённом файле
        pub points: u16,
        pub(crate) nchannels: u16,
        pub avg_update: u16,
        pub domain: u8,
        pub variance: u8,
        /// Частота дискретизации, Гц
        pub rate: u16,
        pub scale: f64,

        // Коррекция артефактов VEOG/HEOG/AUX1/AUX2
        pub veog_correct: u8,
        pub heog_correct: u8,
        pub aux1_correct: u8,
        pub aux2_correct: u8,
        pub veog_trig: f32,
        pub heog_trig: f32,
        pub aux1_trig: f32,
        pub aux2_trig: f32,
        pub heog_channel: u16,
        pub veog_channel: u16,
        pub aux1_channel: u16,
        pub aux2_channel: u16,
        pub veog_dir: u8,
        pub heog_dir: u8,
        pub aux1_dir: u8,
        pub aux2_dir: u8,
        pub veog_n: u16,
        pub heog_n: u16,
        pub aux1_n: u16,
        pub aux2_n: u16,
        pub veog_max_count: u16,
        pub heog_max_count: u16,
        pub aux1_max_count: u16,
        pub aux2_max_count: u16,
        pub veog_method: u8,
        pub heog_method: u8,
        pub aux1_method: u8,
        pub aux2_method: u8,

        pub amp_sensitivity: f32,
        pub low_pass: u8,
        pub high_pass: u8,
        pub notch: u8,
        pub auto_clip_add: u8,
        pub baseline: u8,
        pub offset_start: f32,
        pub offset_stop: f32,
        pub reject: u8,
        pub reject_start: f32,
        pub reject_stop: f32,
        pub reject_min: f32,
        pub reject_max: f32,

        pub trig_type: u8,
        pub trig_value: f32,
        pub trig_channel: u8,
        pub trig_mask: u16,
        pub trig_isi: f32,
        pub trig_min: f32,
        pub trig_max: f32,
        pub trig_dir: u8,
        pub autoscale: u8,
        pub n2: u16,
        pub dir: u8,

        pub display_min: f32,
        pub display_max: f32,
        pub x_min: f32,
        pub x_max: f32,
        pub auto_min: f32,
        pub auto_max: f32,
        pub z_min: f32,
        pub z_max: f32,
        pub low_cut: f32,
        pub high_cut: f32,
        pub common: u8,
        pub savemode: u8,
        pub man_mode: u8,
        pub ref_name: FixedStr<10>,
        pub rectify: u8,
        pub display_x_min: f32,
        pub display_x_max: f32,
        pub phase: u8,
        pub screen: Reserved<16>,

        pub cal_mode: u16,
        pub cal_method: u16,
        pub cal_update: u16,
        pub cal_baseline: u16,
        pub cal_sweeps: u16,
        pub cal_attenuator: f32,
        pub cal_pulse_volt: f32,
        pub cal_pulse_start: f32,
        pub cal_pulse_stop: f32,
        pub cal_freq: f32,

        pub task_file: FixedStr<34>,
        pub seq_file: FixedStr<34>,
        pub spect_method: u8,
        pub spect_scaling: u8,
        pub spect_window: u8,
        pub spect_win_length: f32,
        pub spect_order: u8,
        pub notch_filter: u8,
        pub head_gain: i16,
        pub additional_files: u32,
        pub unused: Reserved<5>,

        pub fsp_stop_method: i16,
        pub fsp_stop_mode: i16,
        pub fsp_f_value: f32,
        pub fsp_point: u16,
        pub fsp_block_size: u16,
        pub fsp_p1: u16,
        pub fsp_p2: u16,
        pub fsp_alpha: f32,
        pub fsp_noise: f32,
        pub fsp_v1: u16,

        pub montage: FixedStr<40>,
        pub event_file: FixedStr<40>,
        pub f_ratio: f32,
        pub minor_rev: u8,
        pub eeg_update: u16,
        pub compressed: u8,

        pub x_scale: f32,
        pub y_scale: f32,
        pub x_size: f32,
        pub y_size: f32,
        pub ac_mode: u8,
        pub common_channel: u8,
        pub x_tics: u8,
        pub x_range: u8,
        pub y_tics: u8,
        pub y_range: u8,
        pub x_scale_value: f32,
        pub x_scale_interval: f32,
        pub y_scale_value: f32,
        pub y_scale_interval: f32,
        pub scale_tool_x1: f32,
        pub scale_tool_y1: f32,
        pub scale_tool_x2: f32,
        pub scale_tool_y2: f32,
        pub port: u16,
        /// Выборок на канал в непрерывном файле
        pub num_samples: u32,

        pub filter_flag: u8,
        pub low_cutoff: f32,
        pub low_poles: u16,
        pub high_cutoff: f32,
        pub high_poles: u16,
        pub filter_type: u8,
        pub filter_domain: u8,
        pub snr_flag: u8,
        pub coherence_flag: u8,
        pub continuous_type: u8,
        /// Абсолютное смещение таблицы событий
        pub event_table_pos: u32,
        pub continuous_seconds: f32,
        pub channel_offset: u32,
        pub auto_correct_flag: u8,
        pub dc_threshold: u8,
    }
}

impl HeaderRecord {
    /// Заголовок нового непрерывного файла.
    pub fn continuous(rate: u16) -> Self {
        Self {
            revision: FixedStr::new(DEFAULT_REVISION),
            savemode: SAVE_CONTINUOUS_EEG,
            domain: DOMAIN_TIME,
            rate,
            ..Default::default()
        }
    }

    /// Заголовок нового усреднённого файла с `points` точками на канал.
    pub fn averaged(
        rate: u16,
        points: u16,
    ) -> Self {
        Self {
            revision: FixedStr::new(DEFAULT_REVISION),
            type_code: TYPE_AVERAGED,
            savemode: SAVE_AVERAGED_AND_EPOCHED,
            domain: DOMAIN_TIME,
            rate,
            points,
            ..Default::default()
        }
    }

    /// Число каналов; всегда равно длине таблицы электродов.
    pub fn channel_count(&self) -> usize {
        self.nchannels as usize
    }

    pub fn gender(&self) -> Gender {
        Gender::from_u8(self.sex)
    }

    pub fn set_gender(
        &mut self,
        gender: Gender,
    ) {
        self.sex = gender.as_u8();
    }

    pub fn handedness(&self) -> Handedness {
        Handedness::from_u8(self.hand)
    }

    pub fn set_handedness(
        &mut self,
        hand: Handedness,
    ) {
        self.hand = hand.as_u8();
    }

    pub fn is_frequency_domain(&self) -> bool {
        self.domain == DOMAIN_FREQUENCY
    }

    pub fn set_frequency_domain(
        &mut self,
        on: bool,
    ) {
        self.domain = if on { DOMAIN_FREQUENCY } else { DOMAIN_TIME };
    }

    /// Есть ли за усреднёнными данными блок дисперсии.
    pub fn has_variance(&self) -> bool {
        self.variance != 0
    }

    pub fn set_variance(
        &mut self,
        on: bool,
    ) {
        self.variance = u8::from(on);
    }

    pub fn is_coherence(&self) -> bool {
        self.coherence_flag == 1
    }

    /// Диапазон оси X при отображении; установка меняет и границы эпохи.
    pub fn display_x_range(&self) -> (f32, f32) {
        (self.display_x_min, self.display_x_max)
    }

    pub fn set_display_x_range(
        &mut self,
        min: f32,
        max: f32,
    ) {
        self.display_x_min = min;
        self.display_x_max = max;
        self.x_min = min;
        self.x_max = max;
    }

    /// Длительность непрерывной записи в секундах.
    pub fn duration_secs(&self) -> Option<f64> {
        (self.rate > 0).then(|| self.num_samples as f64 / self.rate as f64)
    }
}
