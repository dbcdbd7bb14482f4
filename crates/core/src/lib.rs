#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod progress;
pub mod time;

pub use error::{DataIntegrityWarning, NotFound};
pub use time::Clock;
