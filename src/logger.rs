use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// File-backed logger behind the `log` facade. The TUI owns the terminal,
/// so log lines go to an append-only file instead of stdout.
struct FileLogger {
    file: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install the file logger. Can only succeed once per process; the game
/// runs fine if this fails or is never called.
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    log::set_boxed_logger(Box::new(FileLogger {
        file: Mutex::new(file),
    }))
    .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;
    log::set_max_level(LevelFilter::Info);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // set_boxed_logger is process-global, so everything lives in one test
    #[test]
    fn test_init_logs_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("matho.log");

        init(&path).unwrap();
        log::info!("quiz started");
        log::info!("final score: 735");
        log::logger().flush();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[INFO] quiz started"));
        assert!(contents.contains("final score: 735"));

        // a second init must refuse, not panic
        assert!(init(&path).is_err());
    }
}
