#![deny(missing_docs)]
//! Shared logging utilities for the harvester workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. While an item is
//! being harvested, the orchestrator sets the item context on its thread and
//! every macro prefixes the message with `[item N]`.

use std::cell::Cell;

thread_local! {
    /// Ordinal of the item currently processed on this thread, 0 when none.
    static ITEM_CONTEXT: Cell<u32> = const { Cell::new(0) };
}

/// Marks `ordinal` as the item being processed on the current thread.
pub fn set_item_context(ordinal: u32) {
    ITEM_CONTEXT.with(|v| v.set(ordinal));
}

/// Clears the item context for the current thread.
pub fn clear_item_context() {
    ITEM_CONTEXT.with(|v| v.set(0));
}

/// Returns the item ordinal set for the current thread, if any.
pub fn item_context() -> Option<u32> {
    match ITEM_CONTEXT.with(|v| v.get()) {
        0 => None,
        ordinal => Some(ordinal),
    }
}

/// Log level re-export so macro callers need not depend on `log`.
#[doc(hidden)]
pub use log::Level as __Level;

/// Forwards a formatted record to the `log` facade, prefixed with the
/// current item context when one is set. Used by the `engine_*` macros.
#[doc(hidden)]
pub fn __log(level: log::Level, args: std::fmt::Arguments<'_>) {
    match item_context() {
        Some(ordinal) => log::log!(level, "[item {}] {}", ordinal, args),
        None => log::log!(level, "{}", args),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        $crate::__log($crate::__Level::Trace, format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        $crate::__log($crate::__Level::Info, format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        $crate::__log($crate::__Level::Debug, format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        $crate::__log($crate::__Level::Warn, format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        $crate::__log($crate::__Level::Error, format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
