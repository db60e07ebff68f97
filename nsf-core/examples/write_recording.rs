//! Пример: сборка непрерывной записи через RecordingBuilder
//!
//! Демонстрирует:
//! - заполнение заголовка через HeaderSink
//! - передачу выборок «по кадрам» через SampleSink
//! - добавление событий и атомарное сохранение

use nsf_core::{EventRecord, HeaderSink, RecordingBuilder, SampleSink, SubjectIds};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = "nsf-core/test_output.cnt";
    let labels = ["Fp1", "Fp2", "C3", "C4"];
    let rate = 250u16;

    let mut builder = RecordingBuilder::new();
    builder.set_channel_count(labels.len());
    builder.set_sample_rate(rate);
    for (c, label) in labels.iter().enumerate() {
        builder.set_electrode_label(c, label);
    }
    builder.set_subject_ids(&SubjectIds {
        patient_id: "demo-001".into(),
        patient: "Demo Subject".into(),
        ..Default::default()
    });

    // --- Две секунды синусоиды 10 Гц с разной амплитудой по каналам ---
    for i in 0..(2 * rate as usize) {
        let t = i as f32 / rate as f32;
        for c in 0..labels.len() {
            let amp = 50.0 * (c + 1) as f32;
            builder.append_sample(amp * (2.0 * std::f32::consts::PI * 10.0 * t).sin());
        }
    }

    let mut rec = builder.build()?;
    rec.events_mut().push(EventRecord::new(1, 0));
    rec.events_mut().push(EventRecord::new(2, 250));

    rec.save_to_path(output_path)?;

    println!("✓ Written {output_path}");
    println!("  Channels : {}", rec.channel_count());
    println!("  Samples  : {}", rec.header().num_samples);
    println!("  Events   : {}", rec.events().len());

    Ok(())
}
