pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::{ErrorKind, ExportError, Result};
pub use models::{extract_index, ChannelLayout, ItemFolder, Notification, PathConfig};
pub use services::{pack_photos, reorganize, PackReport, ProcessedItem, ReorganizeReport};

/// One user-triggered action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Reorganize,
    Pack,
}

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub operation: Operation,
    pub paths: PathConfig,
    pub log_level: String,
    pub json_output: bool,
}

/// Outcome of an operation: the notification for the user plus the
/// serialized report when the operation succeeded
#[derive(Debug, Clone, serde::Serialize)]
pub struct Outcome {
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<serde_json::Value>,
}

/// Run `operation` to completion and turn its result into a notification
pub fn run_operation(operation: Operation, paths: &PathConfig) -> Outcome {
    match operation {
        Operation::Reorganize => outcome(reorganize(paths), ReorganizeReport::summary),
        Operation::Pack => outcome(pack_photos(paths), PackReport::summary),
    }
}

fn outcome<T: serde::Serialize>(result: Result<T>, summary: fn(&T) -> String) -> Outcome {
    let notification = Notification::from_result(&result, summary);
    let error_kind = result.as_ref().err().map(ExportError::kind);
    let report = result
        .ok()
        .and_then(|report| serde_json::to_value(report).ok());

    Outcome {
        notification,
        error_kind,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_operation_warns_on_missing_paths() {
        let outcome = run_operation(Operation::Reorganize, &PathConfig::default());
        assert!(matches!(outcome.notification, Notification::Warning(_)));
        assert!(outcome.report.is_none());
        assert_eq!(outcome.error_kind, Some(ErrorKind::Configuration));

        let outcome = run_operation(Operation::Pack, &PathConfig::default());
        assert!(matches!(outcome.notification, Notification::Warning(_)));
    }

    #[test]
    fn test_run_operation_reports_pack() {
        let tmp = tempfile::TempDir::new().unwrap();
        let paths = PathConfig::from_optional(tmp.path().to_str(), None);

        let outcome = run_operation(Operation::Pack, &paths);

        assert!(outcome.notification.is_success());
        assert!(outcome.notification.message().contains("Zdjęcia.zip"));
        let report = outcome.report.unwrap();
        assert_eq!(report["entries"].as_u64(), Some(0));
    }

    #[test]
    fn test_run_operation_errors_on_missing_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("gone");
        let paths = PathConfig::from_optional(missing.to_str(), tmp.path().to_str());

        let outcome = run_operation(Operation::Reorganize, &paths);

        assert!(matches!(outcome.notification, Notification::Error(_)));
        assert_eq!(outcome.error_kind, Some(ErrorKind::NotFound));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["error_kind"], "not_found");
        assert_eq!(json["notification"]["level"], "error");
    }
}
