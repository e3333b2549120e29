//! Error types for gastoweb-store

use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid key: {key:?}")]
    InvalidKey { key: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}
