//! Shared helpers for command handlers.

use std::path::Path;

use serde::de::DeserializeOwned;

use crudboard_core::{CoreError, RecordId, Resource};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

/// Read and decode a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

/// Error mapper for operations on one record: any flavor of "not found"
/// names the record the user asked for.
pub fn record_error(resource: Resource, id: RecordId) -> impl Fn(CoreError) -> CliError {
    move |err| {
        if err.is_not_found() {
            CliError::NotFound {
                resource_type: resource.singular().into(),
                identifier: id.to_string(),
                list_command: format!("{resource} list"),
            }
        } else {
            err.into()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn remote_404_names_the_record() {
        let map = record_error(Resource::Users, RecordId::new(12));
        let err = map(CoreError::HttpStatus {
            resource: Resource::Users,
            status: 404,
        });
        assert_eq!(err.to_string(), "user '12' not found");
    }

    #[test]
    fn json_file_errors_are_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json_file::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Delete?", true).unwrap());
    }
}
