use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use bytes::Bytes;
use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::AppError;
use crate::utils::random::generate_random_string;

const MATERIALS_DIR: &str = "materials";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Text fields and the (optional) file part of a multipart submission.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Reads every part of `multipart`. The part named `file_field` is kept as
/// bytes, everything else as text.
pub async fn read_multipart_form(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<MultipartForm, AppError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name == file_field {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {e}")))?;
            // browsers send an empty part when no file was picked
            if !file_name.is_empty() || !data.is_empty() {
                form.file = Some(UploadedFile { file_name, data });
            }
        } else {
            let value = field.text().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read {field_name} field: {e}"))
            })?;
            form.fields.insert(field_name, value);
        }
    }

    Ok(form)
}

/// Relative storage path `materials/YYYY/MM/DD/<prefix>_<name>` for an upload.
pub fn material_file_path(original_name: &str) -> String {
    let mut file_name = sanitize_filename::sanitize(original_name);
    if file_name.trim().is_empty() {
        file_name = "file".to_string().into();
    }
    let date = Utc::now().format("%Y/%m/%d");
    format!(
        "{MATERIALS_DIR}/{date}/{}_{}",
        generate_random_string(8),
        file_name
    )
}

/// Writes `data` under `upload_dir` and returns the relative path to store.
pub async fn store_material_file(
    upload_dir: &Path,
    original_name: &str,
    data: &[u8],
) -> std::io::Result<String> {
    let relative = material_file_path(original_name);
    let full_path = resolve_stored_path(upload_dir, &relative);

    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&full_path).await?;
    file.write_all(data).await?;
    file.flush().await?;

    Ok(relative)
}

pub fn resolve_stored_path(upload_dir: &Path, relative: &str) -> PathBuf {
    upload_dir.join(relative)
}

pub async fn remove_stored_file(upload_dir: &Path, relative: &str) -> std::io::Result<()> {
    fs::remove_file(resolve_stored_path(upload_dir, relative)).await
}

/// Name offered to the client when downloading a stored file.
pub fn download_name(relative: &str) -> &str {
    let base = relative.rsplit('/').next().unwrap_or(relative);
    base.split_once('_').map(|(_, name)| name).unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_file_path_is_dated_and_sanitized() {
        let path = material_file_path("week1/notes?.pdf");
        assert!(path.starts_with("materials/"));
        assert_eq!(path.split('/').count(), 5);
        assert_eq!(download_name(&path), "week1notes.pdf");
    }

    #[test]
    fn test_download_name_strips_random_prefix() {
        assert_eq!(
            download_name("materials/2025/09/01/Ab12Cd34_lecture_1.pdf"),
            "lecture_1.pdf"
        );
    }

    #[tokio::test]
    async fn test_store_and_remove_file() {
        let dir = tempfile::tempdir().unwrap();

        let relative = store_material_file(dir.path(), "notes.pdf", b"%PDF-1.4")
            .await
            .unwrap();
        let stored = resolve_stored_path(dir.path(), &relative);
        assert_eq!(std::fs::read(&stored).unwrap(), b"%PDF-1.4");

        remove_stored_file(dir.path(), &relative).await.unwrap();
        assert!(!stored.exists());
    }
}
