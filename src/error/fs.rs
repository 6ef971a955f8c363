//! File system errors

use super::BuildpathError;

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> BuildpathError {
    BuildpathError::IoError {
        message: message.into(),
    }
}
