use std::io::Write;

use nsf_types::{IoContext, IoLocation, NsResult};

use crate::layout::{encode, Record};

/// Кодирует запись и пишет её в поток целиком.
///
/// Кодирование выполняется до первой записи в поток, поэтому
/// `FieldOverflow` не оставляет частично записанной записи.
pub fn write_record<T: Record, W: Write>(
    w: &mut W,
    value: &T,
    location: IoLocation,
) -> NsResult<()> {
    let bytes = encode(value)?;
    w.write_all(&bytes).at(location)
}
