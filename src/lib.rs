//! Named entity highlighting, tabulation and visualisation as a small web tool.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod nlp;
pub mod pipeline;
pub mod present;
pub mod viz;

pub use error::{AppError, InputSource};
