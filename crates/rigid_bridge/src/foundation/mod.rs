//! Foundation module - Core utilities and types
//!
//! - Math types and operations
//! - Step timing
//! - Logging utilities

pub mod logging;
pub mod math;
pub mod time;
