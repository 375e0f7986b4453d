use crate::dtos::CheckFileParams;
use crate::services::ObjectLookup;
use crate::startup::AppState;
use axum::extract::{Query, State};
use metrics::counter;
use service_core::error::AppError;

/// `GET /check-file?fileName=<key>`: report whether the key exists in the
/// configured bucket using a metadata-only lookup.
#[tracing::instrument(skip_all, fields(file_name = params.file_name.as_deref().unwrap_or_default()))]
pub async fn check_file(
    State(state): State<AppState>,
    Query(params): Query<CheckFileParams>,
) -> Result<String, AppError> {
    let file_name = params
        .file_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("Please provide a file name.".to_string()))?;

    match state.storage.head_object(&file_name).await {
        ObjectLookup::Found(metadata) => {
            counter!("file_check_lookups_total", "outcome" => "found").increment(1);
            tracing::debug!(
                size = ?metadata.content_length,
                last_modified = ?metadata.last_modified,
                "Object found"
            );
            Ok(format!("The file \"{}\" exists in the bucket.", file_name))
        }
        ObjectLookup::NotFound => {
            counter!("file_check_lookups_total", "outcome" => "not_found").increment(1);
            Err(AppError::NotFound(format!(
                "The file \"{}\" does not exist in the bucket.",
                file_name
            )))
        }
        ObjectLookup::Failed(err) => {
            counter!("file_check_lookups_total", "outcome" => "failed").increment(1);
            tracing::error!(
                bucket = %state.storage.bucket(),
                error = %format!("{:#}", err),
                "Failed to check file"
            );
            Err(AppError::LookupFailed(err))
        }
    }
}
