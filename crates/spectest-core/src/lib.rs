pub mod completion;
pub mod config;
pub mod discovery;
pub mod error;
pub mod io;
pub mod paths;

pub use error::{Result, SpectestError};
