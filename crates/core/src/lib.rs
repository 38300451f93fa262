//! Core types, limits, and validation for the Canopy identify proxy.

pub mod error;
pub mod limits;
pub mod normalize;
pub mod results;
pub mod upload;

pub use error::{Error, Result};
pub use normalize::normalize;
pub use results::*;
pub use upload::*;
