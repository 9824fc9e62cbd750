//! Print handler for configurable output.
//!
//! `print` output goes to stdout by default; tests swap in a buffer
//! handler and assert on the captured text. Enum dispatch keeps the hot
//! path free of trait objects.

use std::sync::Arc;

use parking_lot::Mutex;

/// Print handler that writes to stdout.
#[derive(Clone, Default)]
pub struct StdoutPrintHandler;

impl StdoutPrintHandler {
    pub fn println(&self, msg: &str) {
        println!("{msg}");
    }
}

/// Print handler that captures output. Cloning shares the buffer, so a
/// test can keep one handle and hand the other to the interpreter.
#[derive(Clone, Default)]
pub struct BufferPrintHandler {
    buffer: Arc<Mutex<String>>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn println(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    /// All captured output so far.
    pub fn output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

/// Output destination for the `print` builtin.
#[derive(Clone)]
pub enum PrintHandler {
    Stdout(StdoutPrintHandler),
    Buffer(BufferPrintHandler),
}

impl PrintHandler {
    pub fn stdout() -> Self {
        PrintHandler::Stdout(StdoutPrintHandler)
    }

    pub fn buffer() -> Self {
        PrintHandler::Buffer(BufferPrintHandler::new())
    }

    pub fn println(&self, msg: &str) {
        match self {
            PrintHandler::Stdout(h) => h.println(msg),
            PrintHandler::Buffer(h) => h.println(msg),
        }
    }
}

impl Default for PrintHandler {
    fn default() -> Self {
        PrintHandler::stdout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_capture_is_shared() {
        let handler = BufferPrintHandler::new();
        let clone = handler.clone();
        clone.println("a");
        clone.println("b");
        assert_eq!(handler.output(), "a\nb\n");
        handler.clear();
        assert_eq!(handler.output(), "");
    }
}
