//! Bounded standard input consumption.
//!
//! Reading happens on a spawned thread while the caller waits on a channel
//! with a timeout. Whichever finishes first decides the result; a reader that
//! loses the race is left detached and never joined.
//!
//! Whether stdin is read at all is decided by [`StdinPolicy`]:
//!
//! - never when skipped
//! - always when the input option is the `-` marker
//! - otherwise only when implicit reads are enabled, no input file was
//!   given, and stdin is not an interactive terminal

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::options::PipelineOptions;
use std::io::{self, IsTerminal, Read};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Something stdin-like the processor can consume.
pub trait StdinSource: Send + 'static {
    /// True when attached to an interactive terminal.
    fn is_terminal(&self) -> bool;

    /// Read until EOF.
    fn read_all(&mut self) -> io::Result<String>;
}

/// The process's standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessStdin;

impl StdinSource for ProcessStdin {
    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn read_all(&mut self) -> io::Result<String> {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        Ok(buf)
    }
}

/// Any reader standing in for stdin.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    terminal: bool,
}

impl<R: Read + Send + 'static> ReaderSource<R> {
    /// A piped (non-terminal) source.
    pub fn piped(reader: R) -> Self {
        Self {
            reader,
            terminal: false,
        }
    }

    /// A source that reports itself as an interactive terminal.
    pub fn terminal(reader: R) -> Self {
        Self {
            reader,
            terminal: true,
        }
    }
}

impl<R: Read + Send + 'static> StdinSource for ReaderSource<R> {
    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn read_all(&mut self) -> io::Result<String> {
        let mut buf = String::new();
        self.reader.read_to_string(&mut buf)?;
        Ok(buf)
    }
}

/// When and how long to read stdin for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdinPolicy {
    pub skip: bool,
    /// Input option is the `-` marker.
    pub explicit: bool,
    pub implicit_read: bool,
    /// Input option names a file.
    pub has_input_file: bool,
    pub timeout: Duration,
}

impl StdinPolicy {
    pub fn new(options: &PipelineOptions, config: &Config) -> Self {
        let explicit = options.reads_stdin_explicitly();
        Self {
            skip: options.skip_stdin,
            explicit,
            implicit_read: config.stdin.implicit_read,
            has_input_file: options.from_file.is_some() && !explicit,
            timeout: Duration::from_millis(
                options.stdin_timeout_ms.unwrap_or(config.stdin.timeout_ms),
            ),
        }
    }

    /// Decide whether to read, given whether stdin is a terminal.
    pub fn should_read(&self, stdin_is_terminal: bool) -> bool {
        if self.skip {
            return false;
        }
        if self.explicit {
            return true;
        }
        self.implicit_read && !self.has_input_file && !stdin_is_terminal
    }
}

/// Read stdin according to `policy`.
///
/// # Returns
///
/// * `Ok(String)` - Captured text; empty when no read was wanted or stdin was empty
/// * `Err(PipelineError::StdinReadError)` - Timed out (`timeout_ms` set) or failed (`message` set)
pub fn process_stdin<S: StdinSource>(source: S, policy: &StdinPolicy) -> Result<String> {
    if !policy.should_read(source.is_terminal()) {
        tracing::debug!("stdin read not requested");
        return Ok(String::new());
    }

    read_with_timeout(source, policy.timeout)
}

/// Race a read-to-EOF against `timeout`.
pub fn read_with_timeout<S: StdinSource>(source: S, timeout: Duration) -> Result<String> {
    let (tx, rx) = mpsc::channel();
    let mut source = source;

    // The handle is dropped on purpose: a reader that outlives the timeout is detached.
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            // Receiver may be gone after a timeout; nothing to report then.
            let _ = tx.send(source.read_all());
        })
        .map_err(|e| PipelineError::stdin_failed(format!("failed to spawn reader: {}", e)))?;

    match rx.recv_timeout(timeout) {
        Ok(Ok(text)) => {
            tracing::debug!(bytes = text.len(), "read stdin");
            Ok(text)
        }
        Ok(Err(e)) => Err(PipelineError::stdin_failed(e.to_string())),
        Err(RecvTimeoutError::Timeout) => {
            let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(timeout_ms = ms, "stdin read timed out");
            Err(PipelineError::stdin_timeout(ms))
        }
        Err(RecvTimeoutError::Disconnected) => Err(PipelineError::stdin_failed(
            "reader thread exited without a result",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Instant;

    /// Blocks in `read` until the paired sender is dropped.
    struct BlockingReader(mpsc::Receiver<()>);

    impl Read for BlockingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    fn policy(timeout_ms: u64) -> StdinPolicy {
        StdinPolicy {
            skip: false,
            explicit: true,
            implicit_read: true,
            has_input_file: false,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    #[test]
    fn test_reads_piped_text() {
        let source = ReaderSource::piped(Cursor::new("hello\nworld\n"));
        let text = process_stdin(source, &policy(1000)).unwrap();
        assert_eq!(text, "hello\nworld\n");
    }

    #[test]
    fn test_empty_input_is_empty_string() {
        let source = ReaderSource::piped(Cursor::new(""));
        assert_eq!(process_stdin(source, &policy(1000)).unwrap(), "");
    }

    #[test]
    fn test_skip_returns_immediately() {
        let (_keep, rx) = mpsc::channel::<()>();
        let source = ReaderSource::piped(BlockingReader(rx));
        let mut p = policy(5_000);
        p.skip = true;

        let start = Instant::now();
        assert_eq!(process_stdin(source, &p).unwrap(), "");
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_timeout_on_blocked_source() {
        let (keep, rx) = mpsc::channel::<()>();
        let source = ReaderSource::piped(BlockingReader(rx));

        let start = Instant::now();
        let err = process_stdin(source, &policy(50)).unwrap_err();
        let elapsed = start.elapsed();

        assert_eq!(err, PipelineError::stdin_timeout(50));
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);

        // Unblock the detached reader.
        drop(keep);
    }

    #[test]
    fn test_read_failure_carries_message() {
        let source = ReaderSource::piped(FailingReader);
        let err = process_stdin(source, &policy(1000)).unwrap_err();
        match err {
            PipelineError::StdinReadError {
                timeout_ms: None,
                message: Some(message),
            } => assert!(message.contains("pipe closed")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let source = ReaderSource::piped(Cursor::new(vec![0xff, 0xfe, 0xfd]));
        let err = process_stdin(source, &policy(1000)).unwrap_err();
        assert_eq!(err.kind(), "StdinReadError");
    }

    #[test]
    fn test_should_read_policy() {
        let base = StdinPolicy {
            skip: false,
            explicit: false,
            implicit_read: true,
            has_input_file: false,
            timeout: Duration::from_millis(100),
        };

        // Implicit read only for piped input.
        assert!(base.should_read(false));
        assert!(!base.should_read(true));

        // An input file turns implicit reads off.
        let with_file = StdinPolicy {
            has_input_file: true,
            ..base
        };
        assert!(!with_file.should_read(false));

        // Explicit marker reads even from a terminal.
        let explicit = StdinPolicy {
            explicit: true,
            ..base
        };
        assert!(explicit.should_read(true));

        // Skip wins over everything.
        let skipped = StdinPolicy {
            skip: true,
            ..explicit
        };
        assert!(!skipped.should_read(false));

        let no_implicit = StdinPolicy {
            implicit_read: false,
            ..base
        };
        assert!(!no_implicit.should_read(false));
    }

    #[test]
    fn test_policy_from_options_and_config() {
        let mut config = Config::default();
        config.stdin.timeout_ms = 300;

        let options = PipelineOptions {
            from_file: Some("-".to_string()),
            ..PipelineOptions::default()
        };
        let p = StdinPolicy::new(&options, &config);
        assert!(p.explicit);
        assert!(!p.has_input_file);
        assert_eq!(p.timeout, Duration::from_millis(300));

        let options = PipelineOptions {
            from_file: Some("notes.md".to_string()),
            stdin_timeout_ms: Some(20),
            ..PipelineOptions::default()
        };
        let p = StdinPolicy::new(&options, &config);
        assert!(!p.explicit);
        assert!(p.has_input_file);
        assert_eq!(p.timeout, Duration::from_millis(20));
    }
}
