use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::error::AssociationError;
use crate::session::Session;
use crate::state::AppState;
use crate::usecase::upload::StoreImageUseCase;

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub url: String,
}

// ── POST /api/upload/image ───────────────────────────────────────────────────

pub async fn upload_image(
    session: Session,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AssociationError> {
    session.require_admin()?;

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AssociationError::InvalidRequest)?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_owned();
            let data = field
                .bytes()
                .await
                .map_err(|_| AssociationError::InvalidRequest)?;
            file = Some((filename, data.to_vec()));
            break;
        }
    }
    let (filename, data) = file.ok_or(AssociationError::EmptyFile)?;

    let uc = StoreImageUseCase {
        uploads_dir: state.uploads_dir(),
    };
    let url = uc.execute(&filename, &data).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            message: "上传成功".to_owned(),
            url,
        }),
    ))
}
