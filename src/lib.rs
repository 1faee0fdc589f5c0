pub mod annotations;
pub mod core;
pub mod decoder;
pub mod error;
pub mod shared;
pub mod utils;

pub use crate::error::ToolError;
pub use crate::shared::config::Config;
