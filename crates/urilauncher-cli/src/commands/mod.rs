//! CLI command implementations.

pub mod dispatch;
pub mod register;
