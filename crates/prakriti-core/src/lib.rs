pub mod artifacts;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod logging;
pub mod params;
pub mod profile;
pub mod types;

pub use error::{Error, Result};
