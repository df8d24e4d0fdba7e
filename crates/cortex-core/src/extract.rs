use std::collections::HashMap;

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ProxyError;

/// JSON body extractor whose rejection follows the `{"error": ...}` contract
///
/// Axum's stock `Json` rejection renders plain text; adapters use this
/// wrapper so a malformed body comes back as a 400 with the same shape as
/// every other gateway error.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ProxyError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| ProxyError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// One uploaded file from a multipart form
pub struct FilePart {
    pub bytes: Bytes,
    pub content_type: String,
}

/// A fully drained multipart form: the expected file part plus any text fields
pub struct UploadForm {
    pub file: Option<FilePart>,
    pub fields: HashMap<String, String>,
}

/// Drain a multipart form, capturing the file part named `file_field`
///
/// Unknown file parts are skipped; text parts are collected by name. Read
/// failures surface as validation errors since they indicate a malformed
/// client upload.
pub async fn read_upload(mut multipart: Multipart, file_field: &str) -> Result<UploadForm, ProxyError> {
    let mut file = None;
    let mut fields = HashMap::new();

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| ProxyError::Validation(format!("Failed to parse multipart form: {e}")))?
    {
        let name = part.name().unwrap_or("").to_owned();

        if name == file_field {
            let content_type = part.content_type().unwrap_or("application/octet-stream").to_owned();
            let bytes = part
                .bytes()
                .await
                .map_err(|e| ProxyError::Validation(format!("Failed to read '{name}' field: {e}")))?;
            file = Some(FilePart { bytes, content_type });
        } else if !name.is_empty() {
            let text = part
                .text()
                .await
                .map_err(|e| ProxyError::Validation(format!("Failed to read '{name}' field: {e}")))?;
            fields.insert(name, text);
        }
    }

    Ok(UploadForm { file, fields })
}
