use {
    logrotate::{LogRotatorBuilder, RotationSize},
    std::{io::Write, time::Instant},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut logger = LogRotatorBuilder::new("./logs/sized.log")
        .max_size(RotationSize::MB(1)) // Rotate at 1MB
        .file_mode(0o640) // Set file permissions to: owner rw, group r, others none
        .build();

    // Simulate writing logs that will trigger size-based rotation
    for i in 1..=35_000 {
        writeln!(
            logger,
            "Log entry #{i}: This is a sample log message that will contribute to file size"
        )?;
    }
    logger.close()?;

    println!("Done logging: {:?}", start.elapsed());
    for backup in logger.backups()? {
        println!("{}", backup.display());
    }
    Ok(())
}
