use crate::layout::{packed_record, FixedStr};

packed_record! {
    /// Сведения об испытуемом (тег 40000).
    pub struct SubjectInfo {
        pub age: i32,
        pub date: FixedStr<21>,
        pub department: FixedStr<21>,
        pub date_of_birth: FixedStr<21>,
        pub height: f32,
        pub id: FixedStr<21>,
        pub institute: FixedStr<21>,
        pub medications: FixedStr<256>,
        pub name: FixedStr<21>,
        pub operator: FixedStr<21>,
        pub referral: FixedStr<21>,
        pub researcher: FixedStr<21>,
        pub temperature: f32,
        pub time: FixedStr<21>,
        pub unit: FixedStr<21>,
        pub wakefulness: FixedStr<256>,
        pub weight: f32,
        pub comments: FixedStr<21>,
        pub ethnicity: FixedStr<21>,
        pub language: FixedStr<21>,
        pub session: FixedStr<256>,
        pub gender: i32,
        pub handedness: i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{decode, encode, Field};

    #[test]
    fn test_subject_width() {
        assert_eq!(SubjectInfo::WIDTH, 1086);
    }

    #[test]
    fn test_roundtrip() {
        let subject = SubjectInfo {
            age: 34,
            name: FixedStr::new("Petrova A."),
            session: FixedStr::new("visual oddball, block 2"),
            weight: 61.5,
            ..Default::default()
        };

        let back: SubjectInfo = decode(&encode(&subject).unwrap()).unwrap();
        assert_eq!(back, subject);
    }
}
