use crate::layout::{packed_record, FixedStr, Reserved};

use super::common::{AmpInfo, AngleSetup, CompareSetup, FilterSetup, Position3d, SoundSetup};

packed_record! {
    /// Расширенные параметры канала (тег 5000 + номер канала).
    pub struct ElectrodeSetup {
        pub label: FixedStr<20>,
        pub reference: u32,
        pub skip: u32,
        pub artifact_rejection: u32,
        pub fsp_stop: u32,
        pub bad: u32,
        pub hide: u32,
        pub accept: u32,
        pub reject: u32,
        pub x_units: FixedStr<10>,
        pub y_units: FixedStr<10>,
        /// Масштаб для каждой страницы отображения
        pub scale_factor: [f32; 20],
        pub display_in_page: [u32; 20],

        // Нормированные координаты окна: малое (s) и большое (l)
        pub win_left_s: [f32; 20],
        pub win_right_s: [f32; 20],
        pub win_top_s: [f32; 20],
        pub win_bottom_s: [f32; 20],
        pub win_left_l: [f32; 20],
        pub win_right_l: [f32; 20],
        pub win_top_l: [f32; 20],
        pub win_bottom_l: [f32; 20],

        pub large_window: u32,
        pub dc_coupled: u32,
        pub display_page: u32,
        pub calibration: f32,
        pub physical_channel: u32,
        pub amp: AmpInfo,
        pub filter: FilterSetup,
        pub position: Position3d,
        pub sound: SoundSetup,
        pub compare: [CompareSetup; 8],
        pub auto_add: u32,
        pub auto_add_last: u32,
        pub snr: f32,
        pub sweeps: u32,
        pub baseline_correct: u32,
        pub multi_wave_color: u32,
        pub single_wave_color: u32,
        pub custom_color_single: u32,
        pub custom_color_multi: u32,
        pub impedance: u32,
        pub compare_line_style: [u32; 8],
        pub angular_position: AngleSetup,
        pub reserved: Reserved<644>,
    }
}
