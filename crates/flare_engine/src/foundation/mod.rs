//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types used as pin values
//! - Generational handles for graph-owned storage
//! - Logging utilities

pub mod collections;
pub mod logging;
pub mod math;
