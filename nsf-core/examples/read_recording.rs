//! Пример: чтение записи и вывод сводки
//!
//! Демонстрирует:
//! - загрузку файла любого поддерживаемого типа
//! - доступ к каналам, выборкам и событиям
//! - сводку в JSON

use nsf_core::{FileType, Recording, RecordingSummary};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "nsf-core/test_output.cnt".to_string());

    let rec = match Recording::open(&input_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("✗ Load failed: {e}");
            return Err(Box::new(e));
        }
    };

    let h = rec.header();
    println!("✓ Loaded {input_path}");
    println!("  Type     : {}", rec.file_type());
    println!("  Revision : {}", h.revision);
    println!("  Rate     : {} Hz", h.rate);
    println!("  Channels : {:?}", rec.channel_names());

    if rec.file_type() == FileType::Continuous {
        println!("\nFirst events:");
        for (i, ev) in rec.events().iter().take(3).enumerate() {
            println!("  [{i}] stim {} @ {}", ev.base.stim_type, ev.base.offset);
        }
    }

    // --- Первые точки каждого канала в физических единицах ---
    println!("\nFirst points:");
    for c in 0..rec.channel_count() {
        let values: Vec<f32> = (0..rec.samples().points().min(4))
            .filter_map(|i| rec.calibrated_sample(c, i))
            .collect();
        println!("  {:>6}: {values:?}", rec.electrode_label(c).unwrap_or("?"));
    }

    println!("\n{}", RecordingSummary::from_recording(&rec).to_json()?);

    Ok(())
}
