use std::fmt;

use thiserror::Error;

/// Результат для операций кодека
pub type NsResult<T> = std::result::Result<T, NsError>;

/// Место в файле, где произошла ошибка ввода/вывода.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoLocation {
    /// Поток без уточнения позиции
    Stream,
    /// Основной заголовок
    Header,
    /// Запись таблицы электродов
    Electrode { index: usize },
    /// Непрерывные данные: выборка `index` канала `channel`
    Sample { channel: usize, index: usize },
    /// Блок дисперсии усреднённого файла
    Variance { channel: usize, point: usize },
    /// Ведущая запись таблицы событий
    EventTable,
    /// Событие с порядковым номером `index`
    Event { index: usize },
    /// Заголовок области тегированных чанков
    ChunkRegion,
    /// Подчанк `id`, вхождение `occurrence` (1-based)
    Chunk { id: u32, occurrence: usize },
    /// Непрозрачный хвост файла неизвестного типа
    OpaqueTail,
}

/// Типы ошибок кодека.
#[derive(Debug, Error)]
pub enum NsError {
    /// Идентификатор области чанков не совпал с `NSI TFF`
    #[error("Bad chunk-region magic: {found:02x?}")]
    BadMagic { found: [u8; 8] },

    /// Для записи фиксированного размера не хватило байт
    #[error("Truncated {record}: expected {expected} bytes, found {found}")]
    TruncatedRecord {
        record: &'static str,
        expected: usize,
        found: usize,
    },

    /// Строка длиннее ёмкости фиксированного поля
    #[error("Field {field} overflow: {length} bytes do not fit into {capacity}")]
    FieldOverflow {
        field: String,
        capacity: usize,
        length: usize,
    },

    /// Основной заголовок не удалось разобрать
    #[error("Corrupt header: {0}")]
    CorruptHeader(String),

    /// Буферы в памяти не соответствуют геометрии заголовка
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Ошибка ввода/вывода с указанием места
    #[error("I/O error at {location}: {source}")]
    IoFailure {
        location: IoLocation,
        #[source]
        source: std::io::Error,
    },
}

impl NsError {
    /// Удобные конструкторы
    pub fn corrupt_header<S: Into<String>>(s: S) -> Self {
        Self::CorruptHeader(s.into())
    }

    pub fn shape_mismatch<S: Into<String>>(s: S) -> Self {
        Self::ShapeMismatch(s.into())
    }

    pub fn io_at(
        location: IoLocation,
        source: std::io::Error,
    ) -> Self {
        Self::IoFailure { location, source }
    }

    /// Добавляет имя поля к пути `FieldOverflow` (`outer.inner`).
    pub fn in_field(
        self,
        name: &str,
    ) -> Self {
        match self {
            Self::FieldOverflow {
                field,
                capacity,
                length,
            } => {
                let field = if field.is_empty() {
                    name.to_string()
                } else {
                    format!("{name}.{field}")
                };
                Self::FieldOverflow {
                    field,
                    capacity,
                    length,
                }
            }
            other => other,
        }
    }

    /// Короткая проверка: ошибка вызвана нехваткой байт.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedRecord { .. })
    }
}

impl From<std::io::Error> for NsError {
    fn from(e: std::io::Error) -> Self {
        Self::IoFailure {
            location: IoLocation::Stream,
            source: e,
        }
    }
}

/// Привязывает `io::Result` к месту в файле.
pub trait IoContext<T> {
    fn at(
        self,
        location: IoLocation,
    ) -> NsResult<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(
        self,
        location: IoLocation,
    ) -> NsResult<T> {
        self.map_err(|e| NsError::io_at(location, e))
    }
}

impl fmt::Display for IoLocation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            IoLocation::Stream => write!(f, "stream"),
            IoLocation::Header => write!(f, "header"),
            IoLocation::Electrode { index } => write!(f, "electrode {index}"),
            IoLocation::Sample { channel, index } => {
                write!(f, "sample {index} of channel {channel}")
            }
            IoLocation::Variance { channel, point } => {
                write!(f, "variance point {point} of channel {channel}")
            }
            IoLocation::EventTable => write!(f, "event table"),
            IoLocation::Event { index } => write!(f, "event {index}"),
            IoLocation::ChunkRegion => write!(f, "chunk region header"),
            IoLocation::Chunk { id, occurrence } => {
                write!(f, "chunk {id} (occurrence {occurrence})")
            }
            IoLocation::OpaqueTail => write!(f, "opaque data tail"),
        }
    }
}
