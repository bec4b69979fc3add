//! Structured JSON logging used by the engine and its diagnostics observer.

mod core;
mod sink;

pub use self::core::{
    LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    event_with_fields, json_kv, json_str,
};
pub use sink::{FileSink, MemorySink};
