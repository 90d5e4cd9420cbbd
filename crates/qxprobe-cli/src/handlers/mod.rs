//! Command handlers - extracted from main.rs for testability
//!
//! Each handler builds a serializable report from its arguments and returns
//! whether the command found what it was asked for.

pub mod locate;
pub mod parse;

pub use locate::{enabled_report, execute_enabled, execute_locate, locate_report};
pub use parse::{classify_steps, execute_parse};
