use {
    logrotate::{BackupCollision, LogRotator, LogRotatorBuilder, LogRotatorError, RotationSize, TimeZone, MEGABYTE},
    regex::Regex,
    std::{
        fs,
        io::{self, Write},
        path::Path,
        sync::Arc,
        thread,
    },
};

const KIB: usize = 1024;

fn file_len(path: &Path) -> u64 {
    fs::metadata(path).map_or(0, |m| m.len())
}

#[test]
fn writes_within_threshold_land_in_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LogRotator::new(&path, 1);

    let mut expected = Vec::new();
    for i in 0..100 {
        let line = format!("Log entry #{i}: This is a sample log message\n");
        assert_eq!(logger.write(line.as_bytes()).unwrap(), line.len());
        expected.extend_from_slice(line.as_bytes());
    }

    assert_eq!(fs::read(&path).unwrap(), expected);
    assert_eq!(logger.current_size(), expected.len() as u64);
    assert!(logger.backups().unwrap().is_empty());
}

#[test]
fn overflowing_write_rotates_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LogRotator::new(&path, 0);
    assert_eq!(logger.max_size(), MEGABYTE);

    let first = vec![b'a'; 600 * KIB];
    let second = vec![b'b'; 600 * KIB];

    assert_eq!(logger.write(&first).unwrap(), first.len());
    assert_eq!(logger.current_size(), first.len() as u64);
    assert!(logger.backups().unwrap().is_empty());

    assert_eq!(logger.write(&second).unwrap(), second.len());
    assert_eq!(logger.current_size(), second.len() as u64);

    let backups = logger.backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read(&backups[0]).unwrap(), first);
    assert_eq!(fs::read(&path).unwrap(), second);
}

#[test]
fn payload_filling_the_file_exactly_does_not_rotate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LogRotator::new(&path, 1);

    logger.write(&vec![b'a'; 512 * KIB]).unwrap();
    logger.write(&vec![b'b'; 512 * KIB]).unwrap();
    assert_eq!(logger.current_size(), MEGABYTE);
    assert!(logger.backups().unwrap().is_empty());

    logger.write(b"c").unwrap();
    assert_eq!(logger.current_size(), 1);
    assert_eq!(logger.backups().unwrap().len(), 1);
    assert_eq!(fs::read(&path).unwrap(), b"c");
}

#[test]
fn oversized_first_write_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let logger = LogRotator::new(logs.join("app.log"), 1);

    let payload = vec![b'x'; 1536 * KIB];
    let err = logger.write(&payload).unwrap_err();

    assert!(matches!(
        err,
        LogRotatorError::PayloadTooLarge { len, max_size } if len == payload.len() as u64 && max_size == MEGABYTE
    ));
    assert!(!logs.exists());
    assert!(!logger.is_open());
    assert_eq!(logger.current_size(), 0);
}

#[test]
fn oversized_write_leaves_existing_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LogRotator::new(&path, 1);

    logger.write(&vec![b'a'; 900 * KIB]).unwrap();
    let err = logger.write(&vec![b'x'; MEGABYTE as usize + 1]).unwrap_err();

    assert!(matches!(err, LogRotatorError::PayloadTooLarge { .. }));
    assert_eq!(file_len(&path), 900 * KIB as u64);
    assert_eq!(logger.current_size(), 900 * KIB as u64);
    assert!(logger.backups().unwrap().is_empty());
}

#[test]
fn backup_name_carries_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LogRotatorBuilder::new(&path).time_zone(TimeZone::UTC).build();

    logger.write(&vec![b'a'; 700 * KIB]).unwrap();
    logger.write(&vec![b'b'; 700 * KIB]).unwrap();

    let backups = logger.backups().unwrap();
    assert_eq!(backups.len(), 1);
    let name = backups[0].file_name().unwrap().to_str().unwrap();
    let pattern = Regex::new(r"^app\.log\.\d{4}\.\d{2}\.\d{2}_\d{2}:\d{2}:\d{2}$").unwrap();
    assert!(pattern.is_match(name), "unexpected backup name {name}");
}

#[test]
fn close_without_open_file_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LogRotator::new(&path, 1);

    logger.close().unwrap();
    logger.close().unwrap();
    assert!(!path.exists());
}

#[test]
fn close_twice_is_safe() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LogRotator::new(&path, 1);

    logger.write(b"hello\n").unwrap();
    assert!(logger.is_open());
    logger.close().unwrap();
    assert!(!logger.is_open());
    assert_eq!(logger.current_size(), 0);
    logger.close().unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"hello\n");
}

#[test]
fn write_after_close_appends_and_resets_counter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LogRotator::new(&path, 1);

    logger.write(b"one\n").unwrap();
    logger.close().unwrap();
    logger.write(b"two\n").unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"one\ntwo\n");
    assert_eq!(logger.current_size(), 4);
}

#[test]
fn creates_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("app.log");
    let logger = LogRotator::new(&path, 1);

    logger.write(b"hello\n").unwrap();
    assert!(dir.path().join("logs").is_dir());
    assert_eq!(fs::read(&path).unwrap(), b"hello\n");
}

#[test]
fn does_not_create_missing_grandparent() {
    let dir = tempfile::tempdir().unwrap();
    let logger = LogRotator::new(dir.path().join("a").join("b").join("app.log"), 1);

    let err = logger.write(b"hello\n").unwrap_err();
    match &err {
        LogRotatorError::CreateDirectory { path, source } => {
            assert_eq!(path, &dir.path().join("a").join("b"));
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("a").exists());
    assert!(!logger.is_open());
}

#[test]
fn parent_behind_a_file_fails_inspection() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file.txt");
    fs::write(&blocker, b"not a directory").unwrap();
    let logger = LogRotator::new(blocker.join("logs").join("app.log"), 1);

    let err = logger.write(b"hello\n").unwrap_err();
    match &err {
        LogRotatorError::InspectDirectory { path, .. } => assert_eq!(path, &blocker.join("logs")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(blocker.is_file());
    assert_eq!(fs::read(&blocker).unwrap(), b"not a directory");
    assert!(!logger.is_open());
    assert_eq!(logger.current_size(), 0);
}

#[test]
fn parent_that_is_a_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("logs"), b"not a directory").unwrap();
    let logger = LogRotator::new(dir.path().join("logs").join("app.log"), 1);

    let err = logger.write(b"hello\n").unwrap_err();
    assert!(matches!(err, LogRotatorError::OpenFile { .. }), "unexpected error: {err}");
    assert!(!logger.is_open());
}

#[test]
fn failed_rename_leaves_writer_closed_until_next_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LogRotator::new(&path, 1);

    logger.write(&vec![b'a'; 600 * KIB]).unwrap();
    fs::remove_file(&path).unwrap();

    let err = logger.write(&vec![b'b'; 600 * KIB]).unwrap_err();
    match &err {
        LogRotatorError::RenameFile { from, source, .. } => {
            assert_eq!(from, &path);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!logger.is_open());
    assert_eq!(logger.current_size(), 0);
    assert!(!path.exists());

    logger.write(b"recovered\n").unwrap();
    assert!(logger.is_open());
    assert_eq!(logger.current_size(), 10);
    assert_eq!(fs::read(&path).unwrap(), b"recovered\n");
    assert!(logger.backups().unwrap().is_empty());
}

#[cfg(target_os = "linux")]
#[test]
fn write_error_reports_partial_count() {
    let device = Path::new("/dev/full");
    if fs::OpenOptions::new().append(true).open(device).is_err() {
        return;
    }
    let logger = LogRotator::new(device, 1);

    let err = logger.write(b"hello\n").unwrap_err();
    match &err {
        LogRotatorError::Write { written, .. } => assert_eq!(*written, 0),
        other => panic!("unexpected error: {other}"),
    }
    assert!(logger.is_open());
    assert_eq!(logger.current_size(), 0);

    let mut shared = &logger;
    let err = io::Write::write(&mut shared, b"hello\n").unwrap_err();
    let inner = err.get_ref().and_then(|inner| inner.downcast_ref::<LogRotatorError>());
    assert!(
        matches!(inner, Some(LogRotatorError::Write { written: 0, .. })),
        "unexpected error: {err}"
    );
}

#[cfg(unix)]
#[test]
fn explicit_file_mode_is_applied() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LogRotatorBuilder::new(&path).file_mode(0o640).build();

    logger.write(b"hello\n").unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o640);

    logger.write(&vec![b'a'; MEGABYTE as usize]).unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o640);
}

#[test]
fn io_write_adapter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let mut logger = LogRotator::new(&path, 1);

    writeln!(logger, "Log entry #{}", 1).unwrap();
    {
        let mut shared = &logger;
        shared.write_all(b"Log entry #2\n").unwrap();
        shared.flush().unwrap();
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "Log entry #1\nLog entry #2\n");

    let err = logger.write_all(&vec![b'x'; 2 * MEGABYTE as usize]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
}

const RECORD_LEN: usize = 256;

fn record(worker: usize, seq: usize) -> Vec<u8> {
    let mut line = format!("w{worker:02}-{seq:06}-").into_bytes();
    line.resize(RECORD_LEN - 1, b'.');
    line.push(b'\n');
    line
}

#[test]
fn concurrent_writers_never_lose_or_split_records() {
    const WORKERS: usize = 8;
    const RECORDS: usize = 1500;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = Arc::new(
        LogRotatorBuilder::new(&path)
            .max_size(RotationSize::MB(1))
            .backup_collision(BackupCollision::Sequence)
            .build(),
    );

    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for seq in 0..RECORDS {
                    logger.write(&record(worker, seq)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.close().unwrap();

    let mut files = logger.backups().unwrap();
    assert!(files.len() >= 2, "expected several rotations, got {}", files.len());
    files.push(path.clone());

    let mut stream = Vec::new();
    for file in &files {
        let contents = fs::read(file).unwrap();
        assert!(contents.len() as u64 <= MEGABYTE);
        assert_eq!(contents.len() % RECORD_LEN, 0, "record split in {}", file.display());
        stream.extend_from_slice(&contents);
    }
    assert_eq!(stream.len(), WORKERS * RECORDS * RECORD_LEN);

    let mut next = [0usize; WORKERS];
    for chunk in stream.chunks(RECORD_LEN) {
        let text = std::str::from_utf8(&chunk[..11]).unwrap();
        let worker: usize = text[1..3].parse().unwrap();
        let seq: usize = text[4..10].parse().unwrap();
        assert_eq!(chunk, record(worker, seq).as_slice());
        assert_eq!(seq, next[worker], "worker {worker} out of order");
        next[worker] += 1;
    }
    assert!(next.iter().all(|&n| n == RECORDS));
}
