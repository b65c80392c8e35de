use std::sync::atomic::Ordering;
use std::time::Instant;

use synthetic_log_generator::generator::{GenerationMode, Generator};
use synthetic_log_generator::init::init_tracing;
use synthetic_log_generator::writer::{RotatingFileWriter, RotationConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let dir = std::env::temp_dir().join("loggen-rotation-load");
    std::fs::create_dir_all(&dir)?;

    let mut config = RotationConfig::new(dir.join("app.log"));
    config.max_bytes = 64 * 1024;
    config.max_files = 3;
    let writer = RotatingFileWriter::new(config);
    let mut generator = Generator::seeded("load-test", GenerationMode::Random, 1);

    let ticks: u64 = 20_000;
    let start = Instant::now();

    for _ in 0..ticks {
        for record in generator.tick() {
            writer.write(&record)?;
        }
    }

    let elapsed = start.elapsed();
    let written = writer.written_records.load(Ordering::Relaxed);
    println!(
        "wrote {} records in {:?} (~{:.0} rec/s), {} rotations, {} rename failures, output in {}",
        written,
        elapsed,
        written as f64 / elapsed.as_secs_f64(),
        writer.rotations.load(Ordering::Relaxed),
        writer.rotation_failures.load(Ordering::Relaxed),
        dir.display()
    );

    Ok(())
}
