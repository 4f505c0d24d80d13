use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::info;

use crate::{ApiClient, ApiError};

/// 5 MB cap, checked before any request is formed.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Field names the backend has been observed to return the stored file's
/// URL under, in the order they are probed.
const URL_FIELDS: &[&str] = &[
    "fileUrl",
    "url",
    "path",
    "filename",
    "imagePath",
    "imageUrl",
    "file",
    "location",
];

/// A file picked by the shell, ready for client-side checks.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}

/// Validation outcome in the shape the forms render: every failed rule,
/// not just the first.
pub fn validate_image(file: &UploadFile) -> Vec<String> {
    let mut errors = Vec::new();

    if file.bytes.len() > MAX_UPLOAD_BYTES {
        errors.push("File size must be less than 5MB".to_string());
    }
    if !ALLOWED_IMAGE_TYPES.contains(&file.mime.as_str()) {
        errors.push("Only JPEG, PNG, GIF, and WebP images are allowed".to_string());
    }

    errors
}

/// Find the stored-file URL in whatever shape the backend answered with:
/// the prioritized field list, the same fields nested under `data`, or a
/// bare string body.
pub fn extract_file_url(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => {
            if let Some(inner) = map.get("data") {
                if let Some(url) = extract_file_url(inner) {
                    return Some(url);
                }
            }
            for field in URL_FIELDS {
                if let Some(Value::String(s)) = map.get(*field) {
                    if !s.is_empty() {
                        return Some(s.clone());
                    }
                }
            }
            None
        }
        _ => None,
    }
}

/// Human-readable size, matching what the file picker displays.
pub fn format_file_size(bytes: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];
    let exponent = (bytes as f64).log(1024.0).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = format!("{:.2}", value);
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rounded, UNITS[exponent])
}

pub struct UploadsClient<'a> {
    pub(crate) api: &'a ApiClient,
}

impl UploadsClient<'_> {
    /// Validate locally, POST as multipart with the `image` field name,
    /// then extract the stored URL from whatever shape comes back. An
    /// unrecognized success shape is a decode error, not an empty URL.
    pub async fn upload_image(&self, file: UploadFile) -> Result<String, ApiError> {
        let errors = validate_image(&file);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors.join(", ")));
        }

        let part = Part::stream(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|e| ApiError::Validation(format!("unusable MIME type: {}", e)))?;
        let form = Form::new().part("image", part);

        let body = self.api.post_multipart("uploads/image", form).await?;
        let url = extract_file_url(&body).ok_or_else(|| {
            ApiError::Decode("upload succeeded but no file URL was found in the response".into())
        })?;

        info!("uploaded {} ({})", file.name, format_file_size(file.bytes.len()));
        Ok(url)
    }
}
