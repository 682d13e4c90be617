use crate::error::{ErrorKind, ExportError};
use serde::Serialize;

/// Terminal outcome of one operation, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Notification {
    Success(String),
    /// Missing configuration
    Warning(String),
    /// Filesystem failure
    Error(String),
}

impl Notification {
    pub fn from_result<T>(result: &Result<T, ExportError>, on_success: impl FnOnce(&T) -> String) -> Self {
        match result {
            Ok(value) => Notification::Success(on_success(value)),
            Err(e) => Notification::from(e),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Success(m) | Notification::Warning(m) | Notification::Error(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success(_))
    }
}

impl From<&ExportError> for Notification {
    fn from(error: &ExportError) -> Self {
        match error.kind() {
            ErrorKind::Configuration => Notification::Warning(error.to_string()),
            ErrorKind::NotFound | ErrorKind::Io => Notification::Error(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_configuration_maps_to_warning() {
        let err = ExportError::Configuration("cut photos path is not set".to_string());
        let note = Notification::from(&err);
        assert!(matches!(note, Notification::Warning(_)));
        assert!(note.message().contains("cut photos path"));
    }

    #[test]
    fn test_not_found_maps_to_error() {
        let result: Result<(), _> = Err(ExportError::NotFound(PathBuf::from("/missing")));
        let note = Notification::from_result(&result, |_| "done".to_string());
        assert!(matches!(note, Notification::Error(_)));
    }

    #[test]
    fn test_success_serializes_with_level() {
        let note = Notification::Success("packed".to_string());
        let json = serde_json::to_string(&note).unwrap();
        assert_eq!(json, r#"{"level":"success","message":"packed"}"#);
    }
}
