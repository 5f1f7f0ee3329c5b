pub mod approval;
pub mod config;
pub mod error;
pub mod patch;
pub mod pipeline;
pub mod registry;
pub mod tools;
pub mod ui;
pub mod version;
pub mod workdir;

pub use error::{ReleaseError, Result};
