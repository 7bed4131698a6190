use std::io;

use thiserror::Error;

use crate::canvas::CanvasError;
use crate::config::ConfigPathError;
use crate::session::SessionError;
use crate::storage::StorageError;
use crate::tools::{GestureError, SettingsError, ToolError};

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Gesture(#[from] GestureError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    ConfigPath(#[from] ConfigPathError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_layer_errors_convert_and_keep_their_message() {
        let err: AppError = ToolError::UnknownTool("Spray".to_string()).into();
        assert!(matches!(err, AppError::Tool(_)));
        assert_eq!(err.to_string(), "tool not found: Spray");

        let err: AppError = ConfigPathError::MissingHomeDirectory.into();
        assert_eq!(err.to_string(), "neither XDG_CONFIG_HOME nor HOME is set");
    }

    #[test]
    fn session_errors_wrap_transparently() {
        let err: AppError = SessionError::from(ToolError::UnknownTool("X".to_string())).into();
        assert_eq!(err.to_string(), "tool not found: X");
    }
}
