//! In-memory sink for capturing output

use crate::core::Sink;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Cloneable in-memory buffer.
///
/// Clones share one buffer, so a test can install one clone as the sink
/// and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far
    pub fn contents(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    /// Contents decoded as UTF-8, replacing invalid sequences
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// Contents split into lines
    pub fn lines(&self) -> Vec<String> {
        self.contents_string().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();

        writer.write_all(b"one\ntwo\n").unwrap();
        assert_eq!(sink.lines(), vec!["one", "two"]);

        sink.clear();
        assert!(writer.contents().is_empty());
    }
}
