//! Идентификаторы и версии подчанков области настроек.

/// Идентификатор тегированной области: `NSI TFF` + терминатор
pub const CHUNK_MAGIC: [u8; 8] = [b'N', b'S', b'I', b' ', b'T', b'F', b'F', 0];

/// Два зарезервированных идентификатора главного чанка
pub const MAIN_CHUNK_IDS: [u64; 2] = [0x8053_16f0_8a05_02ce, 0x8a11_0b20_a901_f4f7];

/// Флаг версии дескриптора: данные 32-битные
pub const SETUP_BIT32: u16 = 0x0001;

/// Id 0 зарезервирован за дескриптором области
pub const TAG_INVALID: u32 = 0;

/// Известные теги настроек
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SetupTag {
    Basic = 1000,
    Epoch = 1001,
    Trigger = 1002,
    Fsp = 1003,
    Frequency = 1005,
    Ocular = 1006,
    /// База: id электрода = 5000 + индекс канала
    Electrode = 5000,
    Subject = 40000,
}

/// Теги, которые не относятся к электродам (порядок записи)
pub const SINGLE_SETUP_TAGS: [SetupTag; 7] = [
    SetupTag::Basic,
    SetupTag::Epoch,
    SetupTag::Trigger,
    SetupTag::Fsp,
    SetupTag::Frequency,
    SetupTag::Ocular,
    SetupTag::Subject,
];

/// Верхняя граница диапазона id электродов (не включительно): по одному id
/// на каждый канал, который помещается в u16 заголовка
pub const ELECTRODE_TAG_END: u32 = 5000 + u16::MAX as u32;

impl SetupTag {
    pub fn id(&self) -> u32 {
        *self as u32
    }

    /// Версия подчанка, с которой тег записывается
    pub fn version(&self) -> u16 {
        match self {
            SetupTag::Basic => 2,
            SetupTag::Epoch => 2,
            SetupTag::Trigger => 0,
            SetupTag::Fsp => 0,
            SetupTag::Frequency => 3,
            SetupTag::Ocular => 0,
            SetupTag::Electrode => 0,
            SetupTag::Subject => 0,
        }
    }

    /// Id подчанка электрода для канала `channel`.
    pub fn electrode_id(channel: usize) -> u32 {
        SetupTag::Electrode.id() + channel as u32
    }

    /// Id подчанка электрода, если он не совпадает с id другого тега.
    ///
    /// Канал 35000 получил бы id блока Subject; такой канал хранится без
    /// собственного подчанка.
    pub fn addressable_electrode_id(channel: usize) -> Option<u32> {
        let id = u32::try_from(channel)
            .ok()
            .and_then(|c| SetupTag::Electrode.id().checked_add(c))?;

        (SetupTag::from_id(id) == Some(SetupTag::Electrode)).then_some(id)
    }

    /// Индекс канала для id из диапазона электродов.
    pub fn electrode_channel(id: u32) -> Option<usize> {
        match SetupTag::from_id(id) {
            Some(SetupTag::Electrode) => Some((id - SetupTag::Electrode.id()) as usize),
            _ => None,
        }
    }

    /// Распознаёт id, включая диапазон электродов.
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1000 => Some(SetupTag::Basic),
            1001 => Some(SetupTag::Epoch),
            1002 => Some(SetupTag::Trigger),
            1003 => Some(SetupTag::Fsp),
            1005 => Some(SetupTag::Frequency),
            1006 => Some(SetupTag::Ocular),
            40000 => Some(SetupTag::Subject),
            5000..ELECTRODE_TAG_END => Some(SetupTag::Electrode),
            _ => None,
        }
    }
}
