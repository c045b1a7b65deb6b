//! Human-readable views of processed flights.
pub mod trace;

pub use trace::format_trace;
