//! Handlers 模块

pub mod samples;
pub mod system;

pub use samples::*;
pub use system::*;
