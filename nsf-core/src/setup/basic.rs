use crate::layout::{packed_record, FixedStr, Reserved};

use super::common::{AmpInfo, FilterSetup, MapSetup};

packed_record! {
    /// Основные параметры сбора (тег 1000).
    pub struct BasicSetup {
        pub acquisition_type: u32,
        pub rate: u32,
        pub channels: u32,
        pub notch_frequency: u32,
        pub domain: u32,
        pub use_common_amp_settings: u32,
        pub common_amp: AmpInfo,
        pub common_filter: FilterSetup,
        pub dc_auto_correct: u32,
        pub dc_threshold: u32,
        pub ac_coupling: u32,

        // Окна отображения
        pub single_window1_enable: u32,
        pub single_window2_enable: u32,
        pub multi_window_enable: u32,
        pub single_window1_filter: u32,
        pub single_window2_filter: u32,
        pub multi_window_filter: u32,
        pub single_window1_derivation: u32,
        pub single_window2_derivation: u32,
        pub multi_window_derivation: u32,
        pub single_window1_ldr: FixedStr<512>,
        pub single_window2_ldr: FixedStr<512>,
        pub multi_window_ldr: FixedStr<512>,

        pub auto_save: u32,
        pub clear_average: u32,
        pub menu_startup: u32,
        pub sound: u32,
        pub volume: u32,
        pub balance: u32,
        pub maps: [MapSetup; 5],
        pub annotation_definitions: i32,
        pub hot_keys: i32,
        pub invert_wave: u32,
        pub video_enabled: u32,
        pub map_video: i32,
        pub add_after: i32,

        // Поля версии 1
        pub variance_available: u32,
        pub display_variance: u32,
        pub variance_wave_color: u32,
        pub data_type: u32,
        pub off_line: u32,
        pub f_rate: f32,
        pub complex: u32,
        pub cartesian: u32,
        pub real_symmetry: u32,

        pub amp_resolution: u32,
        pub range: f32,
        pub electrode_markers: u32,
        pub ref_name: FixedStr<10>,
        pub record_date: FixedStr<10>,
        pub record_time: FixedStr<12>,
        pub comments: FixedStr<64>,
        pub positions_present: u32,
        pub major_version: u32,
        pub minor_version: u32,
        pub overall_noise: f32,
        pub best_snr: f32,
        pub scales: u32,
        pub time_frequency: u32,
        pub custom_rate: u32,
        pub enable_custom_rate: u32,
        pub input_custom_rate: u32,
        pub show_uncorrected: u32,
        pub save_corrected_data: u32,
        pub num_cnt_points: u64,
        pub reserved: Reserved<3872>,
    }
}
