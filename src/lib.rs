//! # logrotate
//!
//! logrotate is a size-based rotating log writer. A [`LogRotator`] appends
//! every payload to a single active file and, as soon as the next payload
//! would push that file past the configured maximum size, renames the file
//! to a timestamped backup (`<path>.YYYY.MM.DD_HH:MM:SS`) and continues in a
//! fresh file at the original path.
//!
//! The writer is synchronous and unbuffered. All operations on one instance
//! are serialized by a single lock, so it can be shared between threads
//! through an [`Arc`](std::sync::Arc) and it never interleaves two payloads
//! or splits one payload across two files. Backups are kept indefinitely.
//!
//! ## Example
//!
//! ```rust
//! use {
//!     logrotate::{LogRotator, LogRotatorBuilder, RotationSize},
//!     std::io::Write,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dir = tempfile::tempdir()?;
//!
//!     // Rotate once the file would exceed 10 MB
//!     let logger = LogRotator::new(dir.path().join("app.log"), 10);
//!     logger.write(b"This is an info message\n")?;
//!     logger.close()?;
//!
//!     // The same, configured through the builder
//!     let mut logger = LogRotatorBuilder::new(dir.path().join("logs").join("app.log"))
//!         .max_size(RotationSize::MB(10))
//!         .build();
//!     writeln!(logger, "This is a warning message")?;
//!     writeln!(logger, "This is an error message")?;
//!
//!     Ok(())
//! }
//! ```
use {
    chrono::{DateTime, FixedOffset, Local, Utc},
    regex::Regex,
    std::{
        fs::{self, DirBuilder, File, OpenOptions},
        io::{self, Write as _},
        path::{Path, PathBuf},
        sync::{Mutex, MutexGuard, PoisonError},
    },
};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};

/// Number of bytes in one megabyte.
pub const MEGABYTE: u64 = 1024 * 1024;

/// Default and minimum maximum size, in megabytes.
pub const DEFAULT_MAX_SIZE_MB: u64 = 1;

/// Floor applied to every configured maximum size, in bytes.
pub const MIN_MAX_SIZE: u64 = DEFAULT_MAX_SIZE_MB * MEGABYTE;

/// Creation mode of log files, before the process umask.
const DEFAULT_FILE_MODE: u32 = 0o666;

/// Creation mode of the parent directory, before the process umask.
const DEFAULT_DIR_MODE: u32 = 0o777;

/// chrono format of the timestamp appended to backup file names.
const BACKUP_TIME_FORMAT: &str = "%Y.%m.%d_%H:%M:%S";

/// Defines the size threshold of the active log file in various units.
///
/// Whatever unit is used, the resulting byte count is clamped up to
/// [`MIN_MAX_SIZE`] (1 MB) when the writer is built.
///
/// # Examples
/// ```
/// use logrotate::{LogRotatorBuilder, RotationSize, MEGABYTE};
///
/// let logger = LogRotatorBuilder::new("./logs/large.log")
///     .max_size(RotationSize::MB(100))
///     .build();
/// assert_eq!(logger.max_size(), 100 * MEGABYTE);
///
/// // Too small, clamped to 1 MB
/// let logger = LogRotatorBuilder::new("./logs/tiny.log")
///     .max_size(RotationSize::KB(4))
///     .build();
/// assert_eq!(logger.max_size(), MEGABYTE);
/// ```
#[derive(Debug, Clone)]
pub enum RotationSize {
    /// Raw byte count
    Bytes(u64),
    /// Kilobytes (1 KB = 1024 bytes)
    KB(u64),
    /// Megabytes (1 MB = 1024 KB = 1,048,576 bytes)
    MB(u64),
    /// Gigabytes (1 GB = 1024 MB = 1,073,741,824 bytes)
    GB(u64),
}

impl RotationSize {
    /// Get the size in bytes, saturating on overflow.
    fn bytes(&self) -> u64 {
        match self {
            RotationSize::Bytes(b) => *b,
            RotationSize::KB(kb) => kb.saturating_mul(1024),
            RotationSize::MB(mb) => mb.saturating_mul(MEGABYTE),
            RotationSize::GB(gb) => gb.saturating_mul(1024 * MEGABYTE),
        }
    }
}

/// Specifies the time zone used to stamp backup file names.
///
/// The offset is resolved at every rotation, so [`TimeZone::Local`] follows
/// daylight saving changes of the running system.
///
/// # Examples
/// ```
/// use logrotate::TimeZone;
/// use chrono::FixedOffset;
///
/// let utc = TimeZone::UTC;
/// let local = TimeZone::Local;
/// // UTC+8
/// let china = TimeZone::Fix(FixedOffset::east_opt(8 * 3600).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub enum TimeZone {
    /// Use UTC time zone.
    UTC,
    /// Use the system's local time zone.
    #[default]
    Local,
    /// Use a fixed time zone offset.
    Fix(FixedOffset),
}

/// What to do when the backup name of a rotation already exists.
///
/// Backup names have a resolution of one second, so two rotations within
/// the same second produce the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackupCollision {
    /// Rename onto the existing name and let the platform decide. On Unix
    /// the earlier backup is silently replaced, on Windows the rename fails
    /// and the error is returned from the triggering write.
    #[default]
    Replace,
    /// Append `.1`, `.2`, ... to the backup name and use the first one that
    /// does not exist yet.
    Sequence,
}

/// Configuration of a log rotator. Immutable once built.
#[derive(Debug, Clone)]
struct LogRotatorMeta {
    /// Location of the active log file.
    path: PathBuf,
    /// Maximum size of the active file in bytes, at least [`MIN_MAX_SIZE`].
    max_size: u64,
    /// The time zone used for the backup timestamps.
    time_zone: TimeZone,
    /// Explicit permissions applied to each newly opened log file (Unix
    /// only). When unset the file keeps its umask-filtered creation mode.
    file_mode: Option<u32>,
    /// Creation mode of the parent directory (Unix only).
    dir_mode: u32,
    /// Naming policy for colliding backup names.
    backup_collision: BackupCollision,
}

/// Mutable part of a log rotator, guarded by its lock.
#[derive(Debug, Default)]
struct LogRotatorState {
    /// The active file, if one is open.
    file: Option<File>,
    /// Bytes written to `file` since it was opened, 0 while no file is open.
    curr_file_size_bytes: u64,
}

/// A change to the files on disk made while the state lock is held.
///
/// These are logged only after the lock is released. The rotator may itself
/// be the writer of the subscriber receiving them, and logging under the lock
/// would re-enter it.
#[derive(Debug)]
enum LifecycleEvent {
    CreatedDirectory(PathBuf),
    OpenedFile,
    Rotated { backup: PathBuf },
}

impl LogRotatorMeta {
    /// Create the metadata with the default configuration: 1 MB maximum
    /// size, local time zone, standard permissions and
    /// [`BackupCollision::Replace`].
    fn new<P: AsRef<Path>>(path: P) -> Self {
        LogRotatorMeta {
            path: path.as_ref().to_path_buf(),
            max_size: MIN_MAX_SIZE,
            time_zone: TimeZone::Local,
            file_mode: None,
            dir_mode: DEFAULT_DIR_MODE,
            backup_collision: BackupCollision::Replace,
        }
    }

    /// Get the current time in the configured time zone.
    fn now(&self) -> DateTime<FixedOffset> {
        match &self.time_zone {
            TimeZone::UTC => Utc::now().fixed_offset(),
            TimeZone::Local => Local::now().fixed_offset(),
            TimeZone::Fix(offset) => Utc::now().with_timezone(offset),
        }
    }

    /// Directory holding the log file. `None` for a bare file name, which
    /// lives in the current directory.
    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|parent| !parent.as_os_str().is_empty())
    }

    /// Create the parent directory if it does not exist.
    ///
    /// Only the immediate parent is created; a missing grandparent makes the
    /// creation fail.
    fn ensure_parent_dir(&self, events: &mut Vec<LifecycleEvent>) -> Result<(), LogRotatorError> {
        let Some(parent) = self.parent_dir() else {
            return Ok(());
        };
        match fs::metadata(parent) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let mut builder = DirBuilder::new();
                #[cfg(unix)]
                builder.mode(self.dir_mode);
                builder
                    .create(parent)
                    .map_err(|source| LogRotatorError::CreateDirectory {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                events.push(LifecycleEvent::CreatedDirectory(parent.to_path_buf()));
                Ok(())
            }
            Err(source) => Err(LogRotatorError::InspectDirectory {
                path: parent.to_path_buf(),
                source,
            }),
        }
    }

    /// Open the log file for appending, creating it and its parent directory
    /// when needed.
    fn create_log_file(&self, events: &mut Vec<LifecycleEvent>) -> Result<File, LogRotatorError> {
        self.ensure_parent_dir(events)?;

        #[cfg(test)]
        if tests::take_open_failure() {
            return Err(LogRotatorError::OpenFile {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::Other, "open failure requested by test"),
            });
        }

        let mut open_options = OpenOptions::new();
        open_options.append(true).create(true);
        #[cfg(unix)]
        open_options.mode(DEFAULT_FILE_MODE);

        let log_file = open_options
            .open(&self.path)
            .map_err(|source| LogRotatorError::OpenFile {
                path: self.path.clone(),
                source,
            })?;

        self.set_permissions(&self.path)?;

        events.push(LifecycleEvent::OpenedFile);
        Ok(log_file)
    }

    /// Set the permissions for a file based on the configured file mode.
    ///
    /// Only has an effect when a file mode was configured.
    #[cfg(unix)]
    fn set_permissions(&self, path: &Path) -> Result<(), LogRotatorError> {
        if let Some(mode) = self.file_mode {
            fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| {
                LogRotatorError::SetFilePermissions {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// File modes are a Unix concept; the builder warns when one is set.
    #[cfg(not(unix))]
    fn set_permissions(&self, _path: &Path) -> Result<(), LogRotatorError> {
        Ok(())
    }

    /// Log the lifecycle events collected under the state lock.
    fn log_events(&self, events: Vec<LifecycleEvent>) {
        for event in events {
            match event {
                LifecycleEvent::CreatedDirectory(path) => {
                    tracing::debug!(path = %path.display(), "created log directory");
                }
                LifecycleEvent::OpenedFile => {
                    tracing::debug!(path = %self.path.display(), "opened log file");
                }
                LifecycleEvent::Rotated { backup } => {
                    tracing::debug!(
                        from = %self.path.display(),
                        to = %backup.display(),
                        "rotated log file"
                    );
                }
            }
        }
    }

    /// Close a log file.
    ///
    /// `File` reports nothing when dropped, so the data is synced first and
    /// the sync error stands in for the close error. The handle is released
    /// either way.
    fn close_file(&self, file: File) -> Result<(), LogRotatorError> {
        let res = file.sync_all();
        drop(file);
        res.map_err(|source| LogRotatorError::CloseFile {
            path: self.path.clone(),
            source,
        })
    }

    /// Get the backup path for a rotation happening at `now`.
    fn backup_path(&self, now: &DateTime<FixedOffset>) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".");
        name.push(now.format(BACKUP_TIME_FORMAT).to_string());
        let backup = PathBuf::from(name);
        match self.backup_collision {
            BackupCollision::Replace => backup,
            BackupCollision::Sequence => next_free_path(backup),
        }
    }

    /// Rotate the active file.
    ///
    /// Closes `file`, renames the log file to its backup name and opens a
    /// fresh file at the original path. On error nothing is open anymore:
    /// after a failed close or rename the data is still at the original
    /// path, after a failed reopen it is safe in the backup.
    fn rotate(&self, file: File, events: &mut Vec<LifecycleEvent>) -> Result<File, LogRotatorError> {
        self.close_file(file)?;

        let backup = self.backup_path(&self.now());
        fs::rename(&self.path, &backup).map_err(|source| LogRotatorError::RenameFile {
            from: self.path.clone(),
            to: backup.clone(),
            source,
        })?;
        events.push(LifecycleEvent::Rotated { backup });

        self.create_log_file(events)
    }

    /// List the backups of the log file, oldest first.
    fn list_backups(&self) -> Result<Vec<PathBuf>, LogRotatorError> {
        let Some(filename) = self.path.file_name().and_then(|name| name.to_str()) else {
            return Ok(Vec::new());
        };
        let file_pattern = Regex::new(&format!(
            r"^{}\.(\d{{4}}\.\d{{2}}\.\d{{2}}_\d{{2}}:\d{{2}}:\d{{2}})(?:\.(\d+))?$",
            regex::escape(filename)
        ))?;

        let directory = self.parent_dir().unwrap_or_else(|| Path::new("."));
        let files = fs::read_dir(directory).map_err(|source| LogRotatorError::ReadDirectory {
            path: directory.to_path_buf(),
            source,
        })?;

        let mut backups = Vec::new();
        for file in files.flatten() {
            if !file.file_type().is_ok_and(|file_type| file_type.is_file()) {
                continue;
            }
            let file_name = file.file_name();
            let Some(captures) = file_name.to_str().and_then(|name| file_pattern.captures(name)) else {
                continue;
            };
            // Timestamps are zero padded, so they sort lexically
            let stamp = captures[1].to_owned();
            let seq = captures
                .get(2)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(0);
            backups.push((stamp, seq, file.path()));
        }
        backups.sort();

        Ok(backups.into_iter().map(|(_, _, path)| path).collect())
    }
}

/// First of `base`, `base.1`, `base.2`, ... that does not exist.
fn next_free_path(base: PathBuf) -> PathBuf {
    let mut candidate = base.clone();
    let mut seq = 0u64;
    while fs::symlink_metadata(&candidate).is_ok() {
        seq += 1;
        let mut name = base.clone().into_os_string();
        name.push(format!(".{seq}"));
        candidate = PathBuf::from(name);
    }
    candidate
}

/// Write all of `buf`, returning how many bytes made it to the file along
/// with the outcome.
fn write_counted(file: &mut File, mut buf: &[u8]) -> (usize, io::Result<()>) {
    let mut written = 0;
    while !buf.is_empty() {
        match file.write(buf) {
            Ok(0) => return (written, Err(io::ErrorKind::WriteZero.into())),
            Ok(n) => {
                written += n;
                buf = &buf[n..];
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return (written, Err(err)),
        }
    }
    (written, Ok(()))
}

/// A log writer that rotates its file by size.
///
/// The file is opened lazily by the first write. Whenever a payload would
/// make the active file exceed [`max_size`](Self::max_size), the file is
/// renamed to `<path>.YYYY.MM.DD_HH:MM:SS` and the payload goes to a new file
/// at `path`. A payload larger than the maximum size is rejected.
///
/// Every operation takes the same lock, so a `LogRotator` can be shared
/// between threads.
///
/// # Examples
/// ```
/// use {logrotate::LogRotator, std::sync::Arc, std::thread};
///
/// let dir = tempfile::tempdir().unwrap();
/// let logger = Arc::new(LogRotator::new(dir.path().join("app.log"), 1));
///
/// let handles: Vec<_> = (0..4)
///     .map(|n| {
///         let logger = Arc::clone(&logger);
///         thread::spawn(move || logger.write(format!("worker {n} started\n").as_bytes()))
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap().unwrap();
/// }
/// assert_eq!(logger.current_size(), 4 * "worker 0 started\n".len() as u64);
/// ```
#[derive(Debug)]
pub struct LogRotator {
    meta: LogRotatorMeta,
    state: Mutex<LogRotatorState>,
}

impl LogRotator {
    /// Create a log rotator writing to `path` and rotating at `max_size_mb`
    /// megabytes. Values below [`DEFAULT_MAX_SIZE_MB`], including zero and
    /// negative ones, are clamped up to it. Nothing is touched on disk until
    /// the first write.
    pub fn new<P: AsRef<Path>>(path: P, max_size_mb: i64) -> Self {
        let max_size_mb = u64::try_from(max_size_mb).map_or(DEFAULT_MAX_SIZE_MB, |mb| mb.max(DEFAULT_MAX_SIZE_MB));
        LogRotatorBuilder::new(path)
            .max_size(RotationSize::MB(max_size_mb))
            .build()
    }

    /// Start configuring a log rotator writing to `path`.
    pub fn builder<P: AsRef<Path>>(path: P) -> LogRotatorBuilder {
        LogRotatorBuilder::new(path)
    }

    /// The location of the active log file.
    pub fn path(&self) -> &Path {
        &self.meta.path
    }

    /// The maximum size of the active log file in bytes.
    pub fn max_size(&self) -> u64 {
        self.meta.max_size
    }

    /// Bytes written to the currently open file since it was opened, 0 when
    /// no file is open.
    pub fn current_size(&self) -> u64 {
        self.lock_state().curr_file_size_bytes
    }

    /// Whether a log file is currently open.
    pub fn is_open(&self) -> bool {
        self.lock_state().file.is_some()
    }

    /// List the backup files of this writer found on disk, oldest first.
    pub fn backups(&self) -> Result<Vec<PathBuf>, LogRotatorError> {
        self.meta.list_backups()
    }

    fn lock_state(&self) -> MutexGuard<'_, LogRotatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the whole payload to the active log file, rotating first if it
    /// would not fit.
    ///
    /// Returns the payload length on success. A failed write reports the
    /// number of bytes that reached the file in [`LogRotatorError::Write`];
    /// those bytes are counted towards the file size. Rotation and creation
    /// errors are returned as is and are not retried.
    pub fn write(&self, buf: &[u8]) -> Result<usize, LogRotatorError> {
        let len = buf.len() as u64;
        if len > self.meta.max_size {
            return Err(LogRotatorError::PayloadTooLarge {
                len,
                max_size: self.meta.max_size,
            });
        }

        let mut events = Vec::new();
        let res = self.write_locked(buf, &mut events);
        self.meta.log_events(events);
        res
    }

    fn write_locked(&self, buf: &[u8], events: &mut Vec<LifecycleEvent>) -> Result<usize, LogRotatorError> {
        let len = buf.len() as u64;
        let mut state = self.lock_state();

        let file = match state.file.take() {
            Some(file) => file,
            None => self.meta.create_log_file(events)?,
        };

        let mut file = if state.curr_file_size_bytes + len > self.meta.max_size {
            state.curr_file_size_bytes = 0;
            self.meta.rotate(file, events)?
        } else {
            file
        };

        let (written, res) = write_counted(&mut file, buf);
        state.file = Some(file);
        state.curr_file_size_bytes += written as u64;
        drop(state);

        res.map(|()| written).map_err(|source| LogRotatorError::Write {
            path: self.meta.path.clone(),
            written,
            source,
        })
    }

    /// Flush the active log file. Does nothing if no file is open.
    pub fn flush(&self) -> Result<(), LogRotatorError> {
        let mut state = self.lock_state();
        match state.file.as_mut() {
            Some(file) => file.flush().map_err(|source| LogRotatorError::Flush {
                path: self.meta.path.clone(),
                source,
            }),
            None => Ok(()),
        }
    }

    /// Close the active log file.
    ///
    /// The handle is released even if closing fails. Closing a writer that
    /// has no open file is a no-op, so this may be called any number of
    /// times. A later write opens the file again in append mode.
    pub fn close(&self) -> Result<(), LogRotatorError> {
        let mut state = self.lock_state();
        state.curr_file_size_bytes = 0;
        match state.file.take() {
            Some(file) => self.meta.close_file(file),
            None => Ok(()),
        }
    }
}

/// Errors keep the payload out of two files: a failed [`LogRotator::write`]
/// is reported as `Err` even when part of the payload reached the file, so
/// that `write_all` does not resend the rest, possibly into a new file after
/// a rotation. The partial count is in the wrapped
/// [`LogRotatorError::Write`], reachable through [`io::Error::get_ref`].
impl io::Write for LogRotator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        LogRotator::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        LogRotator::flush(self).map_err(io::Error::from)
    }
}

impl io::Write for &LogRotator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        LogRotator::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        LogRotator::flush(*self).map_err(io::Error::from)
    }
}

/// Errors that can occur when using the log rotator.
#[derive(Debug, thiserror::Error)]
pub enum LogRotatorError {
    #[error("Write length {len} exceeds maximum file size {max_size}")]
    PayloadTooLarge { len: u64, max_size: u64 },
    #[error("Failed to inspect directory '{path}': {source}")]
    InspectDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to open file '{path}': {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to set file permissions for '{path}': {source}")]
    SetFilePermissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write to '{path}' after {written} bytes: {source}")]
    Write {
        path: PathBuf,
        written: usize,
        #[source]
        source: io::Error,
    },
    #[error("Failed to flush file '{path}': {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to close file '{path}': {source}")]
    CloseFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to rename file from '{from}' to '{to}': {source}")]
    RenameFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read directory '{path}': {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid backup file pattern: {0}")]
    BackupPattern(#[from] regex::Error),
}

impl LogRotatorError {
    /// The underlying I/O error, if this error came from the filesystem.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            LogRotatorError::InspectDirectory { source, .. }
            | LogRotatorError::CreateDirectory { source, .. }
            | LogRotatorError::OpenFile { source, .. }
            | LogRotatorError::SetFilePermissions { source, .. }
            | LogRotatorError::Write { source, .. }
            | LogRotatorError::Flush { source, .. }
            | LogRotatorError::CloseFile { source, .. }
            | LogRotatorError::RenameFile { source, .. }
            | LogRotatorError::ReadDirectory { source, .. } => Some(source),
            LogRotatorError::PayloadTooLarge { .. } | LogRotatorError::BackupPattern(_) => None,
        }
    }
}

impl From<LogRotatorError> for io::Error {
    fn from(err: LogRotatorError) -> Self {
        let kind = match &err {
            LogRotatorError::PayloadTooLarge { .. } => io::ErrorKind::InvalidInput,
            other => other.io_error().map_or(io::ErrorKind::Other, io::Error::kind),
        };
        io::Error::new(kind, err)
    }
}

/// Provides a fluent interface for configuring [`LogRotator`] instances.
///
/// # Default Configuration
///
/// * 1 MB maximum size
/// * Local system time zone for backup names
/// * Standard file (`0o666`) and directory (`0o777`) creation modes, filtered
///   by the process umask
/// * [`BackupCollision::Replace`]
///
/// # Examples
///
/// ```rust
/// use logrotate::{BackupCollision, LogRotatorBuilder, RotationSize, TimeZone};
///
/// let logger = LogRotatorBuilder::new("./logs/app.log")
///     .max_size(RotationSize::MB(50))
///     .time_zone(TimeZone::UTC)
///     .file_mode(0o640)
///     .backup_collision(BackupCollision::Sequence)
///     .build();
/// ```
pub struct LogRotatorBuilder {
    meta: LogRotatorMeta,
}

impl LogRotatorBuilder {
    /// Create a new log rotator builder for the log file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        LogRotatorBuilder {
            meta: LogRotatorMeta::new(path),
        }
    }

    /// Set the maximum size of the active log file. Sizes below
    /// [`MIN_MAX_SIZE`] are clamped up to it.
    pub fn max_size(self, max_size: RotationSize) -> Self {
        Self {
            meta: LogRotatorMeta {
                max_size: max_size.bytes().max(MIN_MAX_SIZE),
                ..self.meta
            },
        }
    }

    /// Set the time zone of the backup timestamps.
    pub fn time_zone(self, time_zone: TimeZone) -> Self {
        Self {
            meta: LogRotatorMeta { time_zone, ..self.meta },
        }
    }

    /// Set the file permissions for log files (Unix-like systems only).
    /// This sets the file mode bits in octal notation like when using chmod,
    /// regardless of the umask. For example, 0o640 for rw-r----- permissions.
    pub fn file_mode(self, mode: u32) -> Self {
        Self {
            meta: LogRotatorMeta {
                file_mode: Some(mode),
                ..self.meta
            },
        }
    }

    /// Set the mode used when creating the missing parent directory
    /// (Unix-like systems only). The umask still applies.
    pub fn dir_mode(self, mode: u32) -> Self {
        Self {
            meta: LogRotatorMeta {
                dir_mode: mode,
                ..self.meta
            },
        }
    }

    /// Set how a rotation names its backup when the name is already taken.
    pub fn backup_collision(self, backup_collision: BackupCollision) -> Self {
        Self {
            meta: LogRotatorMeta {
                backup_collision,
                ..self.meta
            },
        }
    }

    /// Build the log rotator. No file is opened until the first write.
    pub fn build(self) -> LogRotator {
        #[cfg(not(unix))]
        if let Some(mode) = self.meta.file_mode {
            tracing::warn!(
                path = %self.meta.path.display(),
                mode = format_args!("{mode:o}"),
                "setting file permissions is not supported on non-Unix platforms"
            );
        }
        LogRotator {
            meta: self.meta,
            state: Mutex::new(LogRotatorState::default()),
        }
    }
}
