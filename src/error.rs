//! Error types for Coin Rush
//!
//! The simulation itself never fails; these cover the host boundaries
//! (render surface, storage, persisted blobs, user input).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Storage unavailable")]
    StorageUnavailable,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Room name must be at least {min} characters, got {got:?}")]
    InvalidRoomName { min: usize, got: String },

    #[error("Nickname must be at least {min} characters, got {got:?}")]
    InvalidNickname { min: usize, got: String },
}

pub type Result<T> = std::result::Result<T, GameError>;
