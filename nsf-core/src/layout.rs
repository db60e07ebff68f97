//! Декларативная раскладка упакованных записей.
//!
//! Каждая запись формата объявляется один раз через [`packed_record!`]:
//! порядок полей в объявлении и есть порядок байтов на диске, ширина записи
//! складывается из ширин полей. Все числа little-endian, без выравнивания.
//!
//! ```text
//! packed_record! {
//!     pub struct Example {
//!         pub label: FixedStr<10>,   // [0..10)  строка, дополненная нулями
//!         pub count: u16,            // [10..12)
//!         pub coords: [f32; 2],      // [12..20)
//!     }
//! }
//! ```

use std::{
    fmt,
    io::{Cursor, Read, Write},
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use nsf_types::{NsError, NsResult};

/// Поле фиксированной ширины.
pub trait Field: Sized {
    /// Ширина поля на диске в байтах
    const WIDTH: usize;

    fn read_field<R: Read>(r: &mut R) -> NsResult<Self>;

    fn write_field<W: Write>(
        &self,
        w: &mut W,
    ) -> NsResult<()>;
}

/// Именованная запись верхнего уровня со схемой полей.
pub trait Record: Field {
    /// Имя записи для сообщений об ошибках
    const NAME: &'static str;

    /// Поля в порядке следования на диске.
    fn fields() -> &'static [FieldSpec];
}

/// Элемент схемы: имя поля и его ширина.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub width: usize,
}

/// Строка фиксированной ёмкости `N` байт, дополненная нулями.
///
/// Текст хранится в Latin-1: каждый байт соответствует одному символу. Символы за пределами
/// Latin-1 при записи заменяются на `?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FixedStr<const N: usize>(String);

/// Непрозрачные байты фиксированной ширины (резерв, неиспользуемые хвосты).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Reserved<const N: usize>(Vec<u8>);

////////////////////////////////////////////////////////////////////////////////
// Кодирование / декодирование
////////////////////////////////////////////////////////////////////////////////

/// Декодирует запись из начала `bytes`; лишние байты игнорируются.
pub fn decode<T: Record>(bytes: &[u8]) -> NsResult<T> {
    if bytes.len() < T::WIDTH {
        return Err(NsError::TruncatedRecord {
            record: T::NAME,
            expected: T::WIDTH,
            found: bytes.len(),
        });
    }

    let mut cursor = Cursor::new(&bytes[..T::WIDTH]);
    T::read_field(&mut cursor)
}

/// Кодирует запись ровно в `T::WIDTH` байт.
pub fn encode<T: Record>(value: &T) -> NsResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(T::WIDTH);

    value
        .write_field(&mut buf)
        .map_err(|e| e.in_field(T::NAME))?;

    debug_assert_eq!(buf.len(), T::WIDTH, "{} width", T::NAME);
    Ok(buf)
}

/// Смещение поля `name` внутри записи `T`.
pub fn field_offset<T: Record>(name: &str) -> Option<usize> {
    let mut off = 0;

    for spec in T::fields() {
        if spec.name == name {
            return Some(off);
        }
        off += spec.width;
    }

    None
}

////////////////////////////////////////////////////////////////////////////////
// Примитивы
////////////////////////////////////////////////////////////////////////////////

macro_rules! le_field {
    ($ty:ty, $width:expr, $read:ident, $write:ident) => {
        impl Field for $ty {
            const WIDTH: usize = $width;

            fn read_field<R: Read>(r: &mut R) -> NsResult<Self> {
                Ok(r.$read::<LittleEndian>()?)
            }

            fn write_field<W: Write>(
                &self,
                w: &mut W,
            ) -> NsResult<()> {
                Ok(w.$write::<LittleEndian>(*self)?)
            }
        }
    };
}

le_field!(u16, 2, read_u16, write_u16);
le_field!(i16, 2, read_i16, write_i16);
le_field!(u32, 4, read_u32, write_u32);
le_field!(i32, 4, read_i32, write_i32);
le_field!(u64, 8, read_u64, write_u64);
le_field!(i64, 8, read_i64, write_i64);
le_field!(f32, 4, read_f32, write_f32);
le_field!(f64, 8, read_f64, write_f64);

impl Field for u8 {
    const WIDTH: usize = 1;

    fn read_field<R: Read>(r: &mut R) -> NsResult<Self> {
        Ok(r.read_u8()?)
    }

    fn write_field<W: Write>(
        &self,
        w: &mut W,
    ) -> NsResult<()> {
        Ok(w.write_u8(*self)?)
    }
}

impl Field for i8 {
    const WIDTH: usize = 1;

    fn read_field<R: Read>(r: &mut R) -> NsResult<Self> {
        Ok(r.read_i8()?)
    }

    fn write_field<W: Write>(
        &self,
        w: &mut W,
    ) -> NsResult<()> {
        Ok(w.write_i8(*self)?)
    }
}

/// Однородный массив фиксированной длины, включая массивы вложенных записей.
impl<T: Field + Default, const N: usize> Field for [T; N] {
    const WIDTH: usize = T::WIDTH * N;

    fn read_field<R: Read>(r: &mut R) -> NsResult<Self> {
        let mut out: [T; N] = std::array::from_fn(|_| T::default());

        for slot in out.iter_mut() {
            *slot = T::read_field(r)?;
        }

        Ok(out)
    }

    fn write_field<W: Write>(
        &self,
        w: &mut W,
    ) -> NsResult<()> {
        for (i, item) in self.iter().enumerate() {
            item.write_field(w)
                .map_err(|e| e.in_field(&format!("[{i}]")))?;
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// FixedStr / Reserved
////////////////////////////////////////////////////////////////////////////////

impl<const N: usize> FixedStr<N> {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn set<S: Into<String>>(
        &mut self,
        s: S,
    ) {
        self.0 = s.into();
    }

    /// Ёмкость поля в байтах.
    pub const fn capacity() -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Байты строки в Latin-1.
    fn latin1_bytes(&self) -> Vec<u8> {
        self.0
            .chars()
            .map(|c| if (c as u32) < 0x100 { c as u8 } else { b'?' })
            .collect()
    }
}

impl<const N: usize> Field for FixedStr<N> {
    const WIDTH: usize = N;

    fn read_field<R: Read>(r: &mut R) -> NsResult<Self> {
        let mut buf = [0u8; N];
        r.read_exact(&mut buf)?;

        // Строка обрывается на первом нуле
        let text = buf
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect();

        Ok(Self(text))
    }

    fn write_field<W: Write>(
        &self,
        w: &mut W,
    ) -> NsResult<()> {
        let bytes = self.latin1_bytes();

        if bytes.len() > N {
            return Err(NsError::FieldOverflow {
                field: String::new(),
                capacity: N,
                length: bytes.len(),
            });
        }

        w.write_all(&bytes)?;
        w.write_all(&[0u8; N][..N - bytes.len()])?;
        Ok(())
    }
}

impl<const N: usize> From<&str> for FixedStr<N> {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<const N: usize> From<String> for FixedStr<N> {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const N: usize> Reserved<N> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Все байты нулевые (так пишет исходный инструмент).
    pub fn is_zeroed(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl<const N: usize> Default for Reserved<N> {
    fn default() -> Self {
        Self(vec![0u8; N])
    }
}

impl<const N: usize> fmt::Debug for Reserved<N> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Reserved<{N}>(zeroed={})", self.is_zeroed())
    }
}

impl<const N: usize> Field for Reserved<N> {
    const WIDTH: usize = N;

    fn read_field<R: Read>(r: &mut R) -> NsResult<Self> {
        let mut buf = vec![0u8; N];
        r.read_exact(&mut buf)?;
        Ok(Self(buf))
    }

    fn write_field<W: Write>(
        &self,
        w: &mut W,
    ) -> NsResult<()> {
        w.write_all(&self.0)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Макрос объявления записи
////////////////////////////////////////////////////////////////////////////////

/// Объявляет упакованную запись: структуру, её `Field`/`Record` и схему
/// `FIELDS`. Вложенные записи и массивы записей допустимы как типы полей.
macro_rules! packed_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $name {
            /// Схема записи: поля в порядке следования на диске.
            pub const FIELDS: &'static [$crate::layout::FieldSpec] = &[
                $(
                    $crate::layout::FieldSpec {
                        name: stringify!($field),
                        width: <$ty as $crate::layout::Field>::WIDTH,
                    },
                )*
            ];
        }

        impl $crate::layout::Field for $name {
            const WIDTH: usize = 0 $( + <$ty as $crate::layout::Field>::WIDTH )*;

            fn read_field<R: ::std::io::Read>(r: &mut R) -> $crate::NsResult<Self> {
                Ok(Self {
                    $( $field: <$ty as $crate::layout::Field>::read_field(r)?, )*
                })
            }

            fn write_field<W: ::std::io::Write>(
                &self,
                w: &mut W,
            ) -> $crate::NsResult<()> {
                $(
                    $crate::layout::Field::write_field(&self.$field, w)
                        .map_err(|e| e.in_field(stringify!($field)))?;
                )*
                Ok(())
            }
        }

        impl $crate::layout::Record for $name {
            const NAME: &'static str = stringify!($name);

            fn fields() -> &'static [$crate::layout::FieldSpec] {
                Self::FIELDS
            }
        }
    };
}

pub(crate) use packed_record;
