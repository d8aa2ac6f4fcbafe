//! Sink trait for log output destinations

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Final byte destination for rendered records.
///
/// Errors are returned as `io::Error` and reach callers of
/// `Logging::write` and `Logging::sync` unchanged.
pub trait Sink: Send {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
    fn sync(&mut self) -> io::Result<()>;

    fn name(&self) -> &str {
        "sink"
    }

    /// Write the whole buffer, retrying short writes
    fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.write(buf) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "sink accepted zero bytes",
                    ))
                }
                Ok(n) => buf = &buf[n..],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Sink handle shared between the core and its configuration
pub type SharedSink = Arc<Mutex<Box<dyn Sink>>>;

/// Wrap a sink for installation with `Logging::set_writer` or `Config::with_writer`
pub fn shared<S: Sink + 'static>(sink: S) -> SharedSink {
    Arc::new(Mutex::new(Box::new(sink)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most two bytes per call
    struct Trickle(Vec<u8>);

    impl Sink for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(2);
            self.0.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn sync(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Full;

    impl Sink for Full {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Ok(0)
        }

        fn sync(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_all_retries_short_writes() {
        let mut sink = Trickle(Vec::new());
        sink.write_all(b"hello").unwrap();
        assert_eq!(sink.0, b"hello");
    }

    #[test]
    fn test_write_all_zero_length_write() {
        let err = Full.write_all(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_default_name() {
        assert_eq!(Full.name(), "sink");
    }
}
