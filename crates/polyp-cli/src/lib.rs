//! CLI library components for the polyp counter.

pub mod config;
pub mod logging;
pub mod panel;
pub mod script;
pub mod summary;
