//! Вложенные записи, общие для нескольких блоков настроек.

use crate::layout::{packed_record, FixedStr, Reserved};

packed_record! {
    /// Параметры усилителя.
    pub struct AmpInfo {
        pub microvolts_per_lsb: f32,
        pub filter_type: u32,
        pub low_pass: f32,
        pub low_filter_order: u32,
        pub high_pass: f32,
        pub high_filter_order: u32,
        pub gain: f32,
        pub reserved: Reserved<796>,
    }
}

packed_record! {
    /// Параметры фильтра.
    pub struct FilterSetup {
        pub enable: u32,
        pub low_pass: f32,
        pub high_pass: f32,
        /// 0 ФНЧ, 1 ФВЧ, 2 полосовой, 3 режекторный
        pub filter_type: i32,
        pub mode: u32,
        pub notch_start: f32,
        pub notch_stop: f32,
        pub low_poles: u32,
        pub high_poles: u32,
        pub notch_poles: u32,
        pub rectify: u32,
        pub all_channels: u32,
        pub unused: Reserved<20>,
    }
}

packed_record! {
    /// Настройки одной топографической карты.
    pub struct MapSetup {
        pub enable: u32,
        pub frequency: u32,
        pub display_min: f32,
        pub display_max: f32,
        pub freq_start: f32,
        pub freq_stop: f32,
        pub label: FixedStr<20>,
        pub file: FixedStr<512>,
        pub ldr_file: FixedStr<512>,
        pub display: u32,
        pub data_source_index: u32,
        pub time_start: f32,
        pub time_stop: f32,
        pub raw_start: f32,
        pub raw_stop: f32,
    }
}

packed_record! {
    /// Положение электрода в пространстве, см.
    pub struct Position3d {
        pub x: f32,
        pub y: f32,
        pub z: f32,
        pub available: u8,
        pub label: FixedStr<19>,
    }
}

packed_record! {
    pub struct SoundSetup {
        pub enable: u32,
        pub weight: i32,
        pub left: u32,
        pub unused: Reserved<20>,
    }
}

packed_record! {
    pub struct CompareSetup {
        pub color: u32,
        pub index: u32,
    }
}

packed_record! {
    /// Положение электрода в сферических координатах.
    pub struct AngleSetup {
        pub phi: f32,
        pub theta: f32,
        pub radius: f32,
        pub x: u32,
        pub y: u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Field;

    #[test]
    fn test_nested_widths() {
        assert_eq!(AmpInfo::WIDTH, 824);
        assert_eq!(FilterSetup::WIDTH, 68);
        assert_eq!(MapSetup::WIDTH, 1092);
        assert_eq!(Position3d::WIDTH, 32);
        assert_eq!(SoundSetup::WIDTH, 32);
        assert_eq!(CompareSetup::WIDTH, 8);
        assert_eq!(AngleSetup::WIDTH, 20);
    }
}
