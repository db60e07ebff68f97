//! Определение типа файла по флагам заголовка.

use nsf_types::{definitions::*, FileType};

use crate::header::HeaderRecord;

/// Классифицирует файл.
///
/// Правила проверяются по порядку, срабатывает первое:
///
/// 1. флаг когерентности равен 1 → `Coherence`;
/// 2. режим сохранения `SAVE_CONTINUOUS_EEG` → `Continuous`;
/// 3. временная область и режим, отличный от `SAVE_FAST_SINGLE_POINT`:
///    код типа из [`AVERAGED_TYPES`] → `Average`, иначе `Unknown`;
/// 4. всё остальное → `Unknown`.
pub fn classify(header: &HeaderRecord) -> FileType {
    if header.coherence_flag == 1 {
        return FileType::Coherence;
    }

    if header.savemode == SAVE_CONTINUOUS_EEG {
        return FileType::Continuous;
    }

    if header.domain == DOMAIN_TIME && header.savemode != SAVE_FAST_SINGLE_POINT {
        return if AVERAGED_TYPES.contains(&header.type_code) {
            FileType::Average
        } else {
            FileType::Unknown
        };
    }

    FileType::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(
        coherence: u8,
        savemode: u8,
        domain: u8,
        type_code: u8,
    ) -> HeaderRecord {
        HeaderRecord {
            coherence_flag: coherence,
            savemode,
            domain,
            type_code,
            ..Default::default()
        }
    }

    #[test]
    fn test_classification_table() {
        let cases = [
            ((1, 3, 0, 0), FileType::Coherence),
            ((0, 3, 1, 9), FileType::Continuous),
            ((0, 1, 0, 0), FileType::Average),
            ((0, 1, 0, 2), FileType::Average),
            ((0, 1, 0, 3), FileType::Average),
            ((0, 1, 0, 5), FileType::Average),
            ((0, 1, 0, 1), FileType::Unknown),
            ((0, 1, 0, 4), FileType::Unknown),
            ((0, 6, 0, 0), FileType::Unknown),
            ((0, 1, 1, 0), FileType::Unknown),
        ];

        for ((c, s, d, t), expected) in cases {
            assert_eq!(
                classify(&header(c, s, d, t)),
                expected,
                "coherence={c} savemode={s} domain={d} type={t}"
            );
        }
    }

    #[test]
    fn test_coherence_wins_over_continuous() {
        assert_eq!(classify(&header(1, SAVE_CONTINUOUS_EEG, 0, 0)), FileType::Coherence);
    }

    #[test]
    fn test_constructors_classify() {
        assert_eq!(classify(&HeaderRecord::continuous(1000)), FileType::Continuous);
        assert_eq!(classify(&HeaderRecord::averaged(1000, 10)), FileType::Average);
    }
}
