//! Market-structure tools: Fibonacci levels and time zones

pub mod fibonacci;

pub use fibonacci::*;
