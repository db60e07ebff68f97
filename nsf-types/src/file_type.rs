use std::fmt;

use serde::Serialize;

/// Семантический тип записи, выводимый из флагов заголовка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileType {
    /// Усреднённые формы волны (канал-мажорная раскладка)
    Average,
    /// Непрерывная ЭЭГ (выборка-мажорная раскладка + таблица событий)
    Continuous,
    /// Файл когерентности (данные не разбираются)
    Coherence,
    /// Нераспознанная комбинация флагов
    Unknown,
}

/// Пол испытуемого (байт `sex` заголовка)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

/// Ведущая рука (байт `hand` заголовка)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Handedness {
    Right,
    Left,
    Mixed,
}

impl FileType {
    /// Есть ли у файла разбираемый блок выборок.
    pub fn has_sample_data(&self) -> bool {
        matches!(self, FileType::Average | FileType::Continuous)
    }
}

impl Gender {
    /// `M` → Male, всё остальное → Female.
    pub fn from_u8(v: u8) -> Self {
        match v {
            b'M' => Gender::Male,
            _ => Gender::Female,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Gender::Male => b'M',
            Gender::Female => b'F',
        }
    }
}

impl Handedness {
    /// `L` → Left, `M` → Mixed, всё остальное → Right.
    pub fn from_u8(v: u8) -> Self {
        match v {
            b'L' => Handedness::Left,
            b'M' => Handedness::Mixed,
            _ => Handedness::Right,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Handedness::Right => b'R',
            Handedness::Left => b'L',
            Handedness::Mixed => b'M',
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            FileType::Average => write!(f, "average"),
            FileType::Continuous => write!(f, "continuous"),
            FileType::Coherence => write!(f, "coherence"),
            FileType::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_and_hand_bytes() {
        assert_eq!(Gender::from_u8(b'M'), Gender::Male);
        assert_eq!(Gender::from_u8(0), Gender::Female);
        assert_eq!(Handedness::from_u8(b'L'), Handedness::Left);
        assert_eq!(Handedness::from_u8(b'M'), Handedness::Mixed);
        assert_eq!(Handedness::from_u8(b'?'), Handedness::Right);
        assert_eq!(Handedness::Mixed.as_u8(), b'M');
    }

    #[test]
    fn test_sample_data_presence() {
        assert!(FileType::Average.has_sample_data());
        assert!(FileType::Continuous.has_sample_data());
        assert!(!FileType::Coherence.has_sample_data());
        assert!(!FileType::Unknown.has_sample_data());
    }
}
