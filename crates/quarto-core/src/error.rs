//! Error types for quarto-core

use std::path::PathBuf;

use quarto_system_runtime::RuntimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuartoError {
    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("Failed to parse {}: {message}", path.display())]
    Yaml { path: PathBuf, message: String },

    #[error("Invalid settings: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, QuartoError>;
