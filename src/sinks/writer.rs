//! Adaptor from any `io::Write` to a sink

use crate::core::Sink;
use std::io::{self, Write};

/// Wraps an `io::Write`; `sync` maps to `flush`
pub struct WriterSink<W> {
    inner: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        "writer"
    }
}
