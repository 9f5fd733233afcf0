use std::path::{Path, PathBuf};

use anyhow::Context as _;
use uuid::Uuid;

use crate::error::AssociationError;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

// ── StoreImage ───────────────────────────────────────────────────────────────

pub struct StoreImageUseCase {
    pub uploads_dir: PathBuf,
}

impl StoreImageUseCase {
    /// Store an uploaded image and return its public URL path.
    pub async fn execute(
        &self,
        original_filename: &str,
        data: &[u8],
    ) -> Result<String, AssociationError> {
        if original_filename.trim().is_empty() || data.is_empty() {
            return Err(AssociationError::EmptyFile);
        }
        let extension = extension_of(original_filename)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or(AssociationError::UnsupportedFileType)?;

        let stem = sanitize_stem(original_filename);
        let stored_name = format!("{}_{stem}.{extension}", Uuid::new_v4().simple());

        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .context("create uploads dir")?;
        tokio::fs::write(self.uploads_dir.join(&stored_name), data)
            .await
            .context("write uploaded image")?;

        Ok(format!("/static/uploads/{stored_name}"))
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Reduce the file stem to a safe ASCII token. Path separators and anything
/// outside `[A-Za-z0-9._-]` are replaced so the name cannot escape the
/// uploads directory.
fn sanitize_stem(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches(['_', '.']);
    if trimmed.is_empty() {
        "upload".to_owned()
    } else {
        trimmed.to_owned()
    }
}
