//! Console sink implementation

use crate::core::Sink;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    #[default]
    Stderr,
}

/// Writes to the process's stdout or stderr
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink {
    target: ConsoleTarget,
}

impl ConsoleSink {
    pub fn new(target: ConsoleTarget) -> Self {
        Self { target }
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleTarget::Stderr)
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleTarget::Stdout)
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.target {
            ConsoleTarget::Stdout => io::stdout().lock().write(buf),
            ConsoleTarget::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn sync(&mut self) -> io::Result<()> {
        match self.target {
            ConsoleTarget::Stdout => io::stdout().flush(),
            ConsoleTarget::Stderr => io::stderr().flush(),
        }
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "stdout",
            ConsoleTarget::Stderr => "stderr",
        }
    }
}
