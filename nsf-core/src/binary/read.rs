use std::io::Read;

use nsf_types::{IoContext, IoLocation, NsError, NsResult};

use crate::layout::{decode, Record};

/// Читает ровно `len` байт блока `record`.
///
/// Если поток кончился раньше, возвращает `TruncatedRecord` с фактически
/// прочитанным количеством байт.
pub fn read_block<R: Read>(
    r: &mut R,
    len: usize,
    record: &'static str,
    location: IoLocation,
) -> NsResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(len);

    r.by_ref()
        .take(len as u64)
        .read_to_end(&mut buf)
        .at(location)?;

    if buf.len() < len {
        return Err(NsError::TruncatedRecord {
            record,
            expected: len,
            found: buf.len(),
        });
    }

    Ok(buf)
}

/// Читает и декодирует одну запись `T` из потока.
pub fn read_record<T: Record, R: Read>(
    r: &mut R,
    location: IoLocation,
) -> NsResult<T> {
    let buf = read_block(r, T::WIDTH, T::NAME, location)?;
    decode(&buf)
}

/// Дочитывает поток до конца.
pub fn read_remainder<R: Read>(
    r: &mut R,
    location: IoLocation,
) -> NsResult<Vec<u8>> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf).at(location)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_block_short_stream() {
        let data = [1u8, 2, 3];
        let err = read_block(&mut &data[..], 8, "magic", IoLocation::ChunkRegion).unwrap_err();

        match err {
            NsError::TruncatedRecord {
                record,
                expected,
                found,
            } => {
                assert_eq!(record, "magic");
                assert_eq!(expected, 8);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_block_leaves_rest() {
        let data = [1u8, 2, 3, 4, 5];
        let mut cursor = &data[..];

        let head = read_block(&mut cursor, 2, "head", IoLocation::Stream).unwrap();
        assert_eq!(head, vec![1, 2]);
        assert_eq!(read_remainder(&mut cursor, IoLocation::OpaqueTail).unwrap(), vec![3, 4, 5]);
    }
}
