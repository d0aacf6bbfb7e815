//! CLI command handlers
//!
//! Each handler reads its input file and returns pretty-printed JSON (or
//! plain text for prompts) ready to print.

pub mod meeting;
pub mod sales;

use crate::error::{AppError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

async fn read_input(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
    })
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_input(path).await?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::InvalidInput(format!("Invalid JSON in {}: {}", path.display(), e))
    })
}
