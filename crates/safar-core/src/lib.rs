//! SAFAR Core Library
//!
//! Domain models and business logic for the SAFAR fleet dashboard: owner
//! profile, drivers, trips and the trip broadcast flow.

pub mod broadcast;
pub mod config;
pub mod dashboard;
pub mod driver;
pub mod error;
pub mod notifier;
pub mod owner;
pub mod trip;

pub use config::SafarConfig;
pub use error::{SafarError, SafarResult};
