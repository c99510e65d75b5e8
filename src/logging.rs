use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Recent log lines kept for the Log pane.
#[derive(Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    max_lines: usize,
}

impl LogBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::new())),
            max_lines,
        }
    }

    pub fn push_line(&self, line: String) {
        let mut lines = self.lock();
        lines.push_back(line);
        while lines.len() > self.max_lines {
            lines.pop_front();
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn writer(&self) -> LogBufferWriter {
        LogBufferWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        // A panic while holding the lock leaves the deque intact.
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Collects one formatted event and appends it to the buffer on drop.
pub struct LogBufferWriter {
    buffer: LogBuffer,
    pending: Vec<u8>,
}

impl Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogBufferWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.pending);
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            self.buffer.push_line(line.to_string());
        }
    }
}

/// Installs the global subscriber: a daily log file under `log_dir` and the
/// in-memory buffer. Nothing goes to stdout while the terminal UI owns it.
///
/// Log level is controlled by RUST_LOG (default: info). The returned guard
/// must live until shutdown so buffered file output is flushed.
pub fn init_tracing(log_dir: &Path, buffer: &LogBuffer) -> io::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "unreal-panel");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let pane = buffer.clone();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(move || pane.writer())
                .with_ansi(false)
                .with_target(false)
                .without_time()
                .compact()
                .with_filter(LevelFilter::INFO),
        )
        .try_init()
        .ok();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_lines() {
        let buffer = LogBuffer::new(2);
        buffer.push_line("one".into());
        buffer.push_line("two".into());
        buffer.push_line("three".into());

        assert_eq!(buffer.snapshot(), vec!["two", "three"]);
    }

    #[test]
    fn writer_commits_lines_on_drop() {
        let buffer = LogBuffer::new(10);
        {
            let mut writer = buffer.writer();
            write!(writer, " INFO Deleted: ").unwrap();
            writeln!(writer, "/p/Saved").unwrap();
            assert_eq!(buffer.len(), 0);
        }

        assert_eq!(buffer.snapshot(), vec![" INFO Deleted: /p/Saved"]);
    }
}
