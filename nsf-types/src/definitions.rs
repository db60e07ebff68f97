//! Константы заголовка: режимы сохранения, типы файлов, домены.
//!
//! Значения совпадают с теми, что пишет исходный инструмент записи; часть
//! имён перекрывается численно (например, `TYPE_AVERAGED` и
//! `SAVE_EPOCHED_FREQUENCY` оба равны нулю), но относятся к разным полям.

/// Поле `domain`: временная область
pub const DOMAIN_TIME: u8 = 0;
/// Поле `domain`: частотная область
pub const DOMAIN_FREQUENCY: u8 = 1;

/// Поле `savemode`
pub const SAVE_EPOCHED_FREQUENCY: u8 = 0;
pub const SAVE_EPOCHED_TIME: u8 = 1;
pub const SAVE_AVERAGED_AND_EPOCHED: u8 = 2;
pub const SAVE_CONTINUOUS_EEG: u8 = 3;
pub const SAVE_NO_STORAGE: u8 = 4;
pub const SAVE_MODULATION_TRANSFER: u8 = 5;
pub const SAVE_FAST_SINGLE_POINT: u8 = 6;
pub const SAVE_COMPRESSED_SPECTRAL_ARRAY: u8 = 7;

/// Поле `type`
pub const TYPE_AVERAGED: u8 = 0;
pub const TYPE_AVERAGED_AVGD: u8 = 1;
pub const TYPE_GROUP_AVERAGE: u8 = 2;
pub const TYPE_COMPARISON_AVERAGE: u8 = 3;
pub const TYPE_RELATIVE_CHANNEL: u8 = 4;
pub const TYPE_GROUP_COMPARISON: u8 = 5;
pub const TYPE_MEAN_FREQUENCY: u8 = 6;

/// Типы, которые хранятся в усреднённой раскладке
pub const AVERAGED_TYPES: [u8; 4] = [
    TYPE_AVERAGED,
    TYPE_GROUP_AVERAGE,
    TYPE_COMPARISON_AVERAGE,
    TYPE_GROUP_COMPARISON,
];

/// Делитель усилителя при записи непрерывных данных
pub const AMPLIFIER_DIVISOR: f64 = 204.8;

/// Ширина поля метки перед данными канала в усреднённой раскладке
pub const AVERAGED_LABEL_WIDTH: usize = 5;
