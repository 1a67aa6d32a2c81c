use {
    logrotate::{BackupCollision, LogRotatorBuilder},
    std::{sync::Arc, thread},
};

/// Several threads share one writer; each line lands whole in exactly one file.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = Arc::new(
        LogRotatorBuilder::new("./logs/concurrent.log")
            .backup_collision(BackupCollision::Sequence) // Rotations within one second get .1, .2, ...
            .build(),
    );

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 1..=10_000 {
                    let line = format!("worker {worker}: log entry #{i}\n");
                    logger.write(line.as_bytes())?;
                }
                Ok::<_, logrotate::LogRotatorError>(())
            })
        })
        .collect();
    for handle in handles {
        handle.join().map_err(|_| "worker panicked")??;
    }
    logger.close()?;

    println!("{} backups written", logger.backups()?.len());
    Ok(())
}
