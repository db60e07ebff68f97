//! Область тегированных чанков.
//!
//! ```text
//! "NSI TFF\0"                          8 байт
//! MainChunkHeader                      40 байт
//! SubChunkHeader (дескриптор, id = 0)  16 байт
//! SubChunkHeader + payload             16 + size
//! ...
//! ```
//!
//! Чанк адресуется парой (id, вхождение); вхождения нумеруются с 1 в порядке
//! следования в файле.

pub mod reader;
pub mod set;
pub mod writer;

pub use reader::*;
pub use set::*;
pub use writer::*;

use crate::layout::packed_record;

packed_record! {
    /// Главный заголовок области.
    pub struct MainChunkHeader {
        pub id0: u64,
        pub id1: u64,
        pub link: u64,
        pub size: u64,
        pub next_entry: u64,
    }
}

packed_record! {
    /// Заголовок подчанка.
    pub struct SubChunkHeader {
        pub id: u32,
        pub version: u16,
        pub reserved: u16,
        /// Размер полезной нагрузки
        pub size: u32,
        pub next_entry: u32,
    }
}

/// Подчанк в памяти.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub id: u32,
    pub version: u16,
    pub payload: Vec<u8>,
}

impl Chunk {
    pub fn new(
        id: u32,
        version: u16,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            id,
            version,
            payload,
        }
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }
}
