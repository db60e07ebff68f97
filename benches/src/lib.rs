//! Синтетические записи для бенчмарков кодека.

use nsf_core::{EventRecord, HeaderSink, NsResult, Recording, RecordingBuilder, SampleSink};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Фиксированное зерно: одинаковые данные от запуска к запуску
pub const SEED: u64 = 0x5EED_EE6;

/// Непрерывная запись `channels` x `samples` с шумом ±500 мкВ и событием
/// каждые `rate` выборок.
pub fn synthetic_continuous(
    channels: usize,
    samples: usize,
    rate: u16,
) -> NsResult<Recording> {
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut builder = RecordingBuilder::new();

    builder.set_channel_count(channels);
    builder.set_sample_rate(rate);
    for c in 0..channels {
        builder.set_electrode_label(c, &format!("E{c:03}"));
    }

    for _ in 0..samples * channels {
        builder.append_sample(rng.gen_range(-500.0f32..500.0).round());
    }

    let mut rec = builder.build()?;
    let step = usize::from(rate.max(1));
    for (i, offset) in (0..samples).step_by(step).enumerate() {
        rec.events_mut()
            .push(EventRecord::new((i % 4 + 1) as u16, offset as u32));
    }

    Ok(rec)
}

/// Та же запись, сохранённая в память.
pub fn synthetic_continuous_bytes(
    channels: usize,
    samples: usize,
    rate: u16,
) -> NsResult<Vec<u8>> {
    let mut rec = synthetic_continuous(channels, samples, rate)?;
    let mut out = Vec::new();
    rec.save(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_synthetic_is_deterministic() {
        let a = synthetic_continuous_bytes(4, 100, 50).unwrap();
        let b = synthetic_continuous_bytes(4, 100, 50).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_synthetic_loads_back() {
        let rec = synthetic_continuous(3, 120, 40).unwrap();
        let bytes = synthetic_continuous_bytes(3, 120, 40).unwrap();
        let back = Recording::load(Cursor::new(bytes)).unwrap();

        assert_eq!(back.samples(), rec.samples());
        assert_eq!(back.events().len(), 3);
    }
}
