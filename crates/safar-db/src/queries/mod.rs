//! Database query implementations.

pub mod drivers;
pub mod owners;
pub mod trips;
