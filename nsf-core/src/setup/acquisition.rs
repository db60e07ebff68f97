//! Блоки эпохи, триггера, FSP, спектра и окулографии.

use crate::layout::{packed_record, FixedStr};

packed_record! {
    /// Параметры эпохи (тег 1001).
    pub struct EpochSetup {
        pub points: u32,
        pub prestim_points: u32,
        pub baseline_correction: u32,
        pub baseline_start: f32,
        pub baseline_stop: f32,
        pub reject: u32,
        pub reject_start: f32,
        pub reject_stop: f32,
        pub reject_min: f32,
        pub reject_max: f32,
        pub sweeps: u32,
        pub average_update: u32,
        pub display_x_min: f32,
        pub display_x_max: f32,
        pub display_y_min: f32,
        pub display_y_max: f32,
        pub display_z_min: f32,
        pub display_z_max: f32,
        pub display_y_autoscale: u32,
        pub display_z_autoscale: u32,
        pub sort_enable: u32,
        pub sort_file: FixedStr<512>,
        pub accept: u32,
        pub reject_count: u32,
        pub comp_sweeps: u32,
        pub groups: u32,
        pub mean_age: f32,
        pub mean_latency: f32,
        pub mean_accuracy: f32,
        /// Латентность первой точки, с
        pub x_min: f32,
        /// Латентность последней точки, с
        pub x_max0: f32,
        pub x_max1: f32,
        pub save_sweeps_in_memory: u32,
        pub reserved: u32,
    }
}

packed_record! {
    /// Параметры запуска (тег 1002).
    pub struct TriggerSetup {
        pub mode: u32,
        pub voltage_threshold: f32,
        pub voltage_slope: u32,
        pub voltage_channel: u32,
        pub voltage_rectify: u32,
        pub external_hold: u32,
        pub external_invert: u32,
        pub internal_interval: f32,
        pub reserved: u32,
    }
}

packed_record! {
    /// Параметры FSP (тег 1003).
    pub struct FspSetup {
        pub terminate_method: u32,
        pub terminate_channels: u32,
        pub f_value: f32,
        pub single_point_pos: f32,
        pub sweeps_per_block: u32,
        pub window_start: f32,
        pub window_stop: f32,
        pub noise_level: f32,
        pub alpha: f32,
        pub v1: u32,
        pub display_f_max: f32,
        pub display_noise_max: f32,
        pub reserved: u32,
    }
}

packed_record! {
    /// Спектральные параметры (тег 1005).
    pub struct FrequencySetup {
        pub enable: u32,
        pub scaling_method: u32,
        pub display_method: u32,
        pub acquisition_mode: u32,
        pub mean_frequency: u32,
        pub save_data: u32,
        pub sweeps_per_average: u32,
        pub window_points: u32,
        pub window_length: f32,
        pub window_type: u32,
        pub x_min: f32,
        pub x_max: f32,
        pub y_min: f32,
        pub y_max: f32,
        pub z_min: f32,
        pub z_max: f32,
        pub auto_y_scaling: u32,
        pub auto_z_scaling: u32,
        pub bin_size_hz: f32,
        pub first_bin_hz: f32,
        pub last_bin_hz: f32,
        pub sweeps: u32,
        pub smooth: u32,
        pub cwt: u32,
        pub cwt_channel: u32,
        pub cwt_max: f32,
        pub reserved: u32,
    }
}

packed_record! {
    /// Коррекция VEOG (тег 1006).
    pub struct OcularSetup {
        pub veog_corrected: u32,
        pub veog_trig: f32,
        pub veog_channel: u32,
        pub veog_dir: u32,
        /// Длительность усреднённого моргания, с
        pub veog_duration: f32,
        pub veog_sweeps: u32,
        pub reserved: u32,
    }
}
