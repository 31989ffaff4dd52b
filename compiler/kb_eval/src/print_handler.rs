//! The Print capability.
//!
//! Natives never write to stdout directly; they go through the interpreter's
//! [`SharedPrintHandler`], so hosts and tests can capture or discard output.
//! Enum dispatch keeps the hot path free of vtable calls.

use std::sync::Arc;

use parking_lot::Mutex;

/// Where printed text goes.
pub enum PrintHandler {
    /// Writes to stdout (default).
    Stdout,
    /// Captures into a buffer (tests, embedding hosts).
    Buffer(Mutex<String>),
    /// Discards everything.
    Silent,
}

impl PrintHandler {
    /// Print without a newline.
    pub fn print(&self, text: &str) {
        match self {
            Self::Stdout => print!("{text}"),
            Self::Buffer(buffer) => buffer.lock().push_str(text),
            Self::Silent => {}
        }
    }

    /// Print followed by a newline.
    pub fn println(&self, text: &str) {
        match self {
            Self::Stdout => println!("{text}"),
            Self::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(text);
                buffer.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Captured output so far. Empty for handlers that don't capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buffer) => buffer.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    /// Drop captured output.
    pub fn clear(&self) {
        if let Self::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }
}

/// Print handler shared between the interpreter and its host.
pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}

#[cfg(test)]
mod tests;
