//! Rolling Logger
//!
//! A `tracing` layer that writes each event to the browser console (stderr
//! off the web) and keeps the newest lines in a circular buffer, so recent
//! activity can be shown inside the app.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
pub use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// Buffer size used by the app
pub const DEFAULT_CAPACITY: usize = 500;

static GLOBAL_BUFFER: OnceLock<Arc<RingBuffer>> = OnceLock::new();

// ========================
// Circular buffer
// ========================

/// Fixed-capacity line buffer; the oldest line is evicted first
#[derive(Debug)]
pub struct RingBuffer {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lines: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    pub fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// Oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }
}

// ========================
// Layer
// ========================

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// `12:00:01.250 WARN  app::api: request failed path=/rutas`
pub fn format_line(time: &str, level: &Level, target: &str, message: &str, fields: &str) -> String {
    format!("{} {:<5} {}: {}{}", time, level.as_str(), target, message, fields)
}

pub struct RollingLayer {
    buffer: Arc<RingBuffer>,
}

impl RollingLayer {
    pub fn new(buffer: Arc<RingBuffer>) -> Self {
        Self { buffer }
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let time = Local::now().format("%H:%M:%S%.3f").to_string();
        let line = format_line(&time, meta.level(), meta.target(), &visitor.message, &visitor.fields);

        emit(meta.level(), &line);
        self.buffer.push(line);
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: &Level, line: &str) {
    use wasm_bindgen::JsValue;
    let value = JsValue::from_str(line);
    if *level == Level::ERROR {
        web_sys::console::error_1(&value);
    } else if *level == Level::WARN {
        web_sys::console::warn_1(&value);
    } else if *level == Level::INFO {
        web_sys::console::info_1(&value);
    } else {
        web_sys::console::debug_1(&value);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: &Level, line: &str) {
    eprintln!("{}", line);
}

// ========================
// Initialization
// ========================

/// Install the global subscriber. `log` records from dependencies are
/// forwarded into it as well. Fails if a subscriber is already set.
pub fn init_logger(level: LevelFilter, capacity: usize) -> Result<(), String> {
    let buffer = GLOBAL_BUFFER
        .get_or_init(|| Arc::new(RingBuffer::new(capacity)))
        .clone();

    tracing_subscriber::registry()
        .with(level)
        .with(RollingLayer::new(buffer))
        .try_init()
        .map_err(|e| e.to_string())
}

/// Newest lines captured by the global logger, oldest first
pub fn recent_lines() -> Vec<String> {
    GLOBAL_BUFFER.get().map(|b| b.lines()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_keeps_newest() {
        let buffer = RingBuffer::new(3);
        for i in 1..=5 {
            buffer.push(format!("line {}", i));
        }
        assert_eq!(buffer.lines(), vec!["line 3", "line 4", "line 5"]);
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("08:00:00.000", &Level::INFO, "waste_admin_ui::session", "signed in", " user_id=3"),
            "08:00:00.000 INFO  waste_admin_ui::session: signed in user_id=3"
        );
    }

    #[test]
    fn test_layer_captures_message_and_fields() {
        let buffer = Arc::new(RingBuffer::new(10));
        let subscriber = tracing_subscriber::registry().with(RollingLayer::new(buffer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(path = "/rutas", status = 500, "api request rejected");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN  "), "{}", lines[0]);
        assert!(lines[0].ends_with("api request rejected path=/rutas status=500"), "{}", lines[0]);
    }
}
