//! Multipart form parsing shared by upload endpoints.

use axum::extract::Multipart;
use folio_common::{AppError, AppResult};
use folio_core::FileUpload;

/// Fields of an upload form.
pub struct UploadForm {
    pub file: FileUpload,
    pub folder: Option<String>,
}

fn bad_request(e: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(e.to_string())
}

/// Read the `file` part and the optional `folder` field.
pub async fn read_upload_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut file: Option<FileUpload> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map_or_else(|| "upload".to_string(), std::string::ToString::to_string);
                let content_type = field
                    .content_type()
                    .map_or_else(|| "application/octet-stream".to_string(), ToString::to_string);
                let data = field.bytes().await.map_err(bad_request)?.to_vec();
                file = Some(FileUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            "folder" => {
                let text = field.text().await.map_err(bad_request)?;
                if !text.trim().is_empty() {
                    folder = Some(text);
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    Ok(UploadForm { file, folder })
}
