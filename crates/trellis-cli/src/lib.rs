//! CLI library components for the cognostics writer.

pub mod logging;
pub mod pipeline;
pub mod types;
