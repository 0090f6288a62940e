//! File uploads for form fields and area images

use reporta_forms::{FieldType, Preview, UploadError, UploadSlot};
use reporta_store::{from_row, Filter, Row};
use serde_json::Value;
use uuid::Uuid;

use super::{catalog, tables};
use crate::error::{ApiError, ApiResult};
use crate::models::{AreaDto, UploadResponse};
use crate::ApiState;

/// File name safe to use as the last path segment.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "archivo".to_string()
    } else {
        cleaned.to_string()
    }
}

fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Store a file for a `file` or `image` field of `area_id`. The returned
/// URL is what the form keeps as the field value.
pub async fn upload_field_file(
    state: &ApiState,
    area_id: i64,
    field: &str,
    filename: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> ApiResult<UploadResponse> {
    let form = catalog::load_form(state, area_id).await?;
    let descriptor = form
        .field(field)
        .ok_or_else(|| ApiError::NotFound(format!("field {field} of area {area_id}")))?;
    if !descriptor.field_type.is_upload() {
        return Err(UploadError::NotUploadField(descriptor.name.clone()).into());
    }
    state.config.upload.check(descriptor.field_type, content_type, bytes.len())?;

    let path = format!("areas/{area_id}/{field}/{}-{}", Uuid::new_v4(), sanitize_filename(filename));
    let size = bytes.len();
    let content_type = media_type(content_type);
    let url = state
        .storage
        .upload(&path, bytes, &content_type)
        .await
        .map_err(|e| UploadError::Storage(e.to_string()))?;
    tracing::info!(area_id, field, %path, size, "file uploaded");

    Ok(UploadResponse { url, path, content_type, size })
}

/// Replace the image of an area.
///
/// The new image is staged, uploaded, then committed onto the area row. If
/// the upload or the row update fails the area keeps its previous image.
pub async fn set_area_image(
    state: &ApiState,
    area_id: i64,
    filename: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> ApiResult<AreaDto> {
    let area = catalog::get_area(state, area_id).await?;
    let mut slot = UploadSlot::new(area.image_url.clone());
    let preview = Preview {
        filename: sanitize_filename(filename),
        content_type: media_type(content_type),
        size: bytes.len(),
    };
    slot.stage(&state.config.upload, FieldType::Image, preview.clone())?;

    let path = format!("areas/{area_id}/imagen/{}-{}", Uuid::new_v4(), preview.filename);
    let url = match state.storage.upload(&path, bytes, &preview.content_type).await {
        Ok(url) => url,
        Err(e) => {
            let kept = slot.rollback().map(str::to_string);
            tracing::warn!(area_id, error = %e, kept = ?kept, "area image upload failed");
            return Err(UploadError::Storage(e.to_string()).into());
        }
    };

    let mut patch = Row::new();
    patch.insert("image_url".into(), Value::from(url.clone()));
    let updated = state
        .store
        .update(tables::AREAS, patch, &Filter::new().eq("id", area_id))
        .await;
    let row = match updated {
        Ok(rows) if !rows.is_empty() => rows.into_iter().next(),
        Ok(_) => None,
        Err(e) => {
            slot.rollback();
            if let Err(cleanup) = state.storage.delete(&path).await {
                tracing::warn!(%path, error = %cleanup, "could not remove orphaned image");
            }
            return Err(e.into());
        }
    };
    let previous = slot.commit(url);
    tracing::info!(area_id, previous = ?previous, image = ?slot.committed(), "area image replaced");

    match row {
        Some(row) => Ok(AreaDto::from(from_row::<reporta_forms::Area>(row)?)),
        None => Err(ApiError::NotFound(format!("area {area_id}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{demo_parts, demo_state};
    use reporta_workflow::WorkflowFlavor;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("C:\\fotos\\mi foto.png"), "mi_foto.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("año.jpg"), "a_o.jpg");
        assert_eq!(sanitize_filename(".."), "archivo");
    }

    #[tokio::test]
    async fn test_upload_field_file() {
        let (state, _, storage) = demo_parts(WorkflowFlavor::Tracking);
        let response = upload_field_file(&state, 1, "foto", "foto.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert!(response.url.ends_with("-foto.png"));
        assert_eq!(response.size, 3);
        assert_eq!(storage.get(&response.path).unwrap().1, "image/png");
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let state = demo_state();
        let err = upload_field_file(&state, 1, "foto", "doc.pdf", "application/pdf", vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upload(UploadError::UnsupportedType(_))));

        let err = upload_field_file(&state, 1, "descripcion", "a.png", "image/png", vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upload(UploadError::NotUploadField(_))));

        let err = upload_field_file(&state, 1, "nope", "a.png", "image/png", vec![1])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let too_big = vec![0u8; state.config.upload.max_bytes + 1];
        let err = upload_field_file(&state, 2, "evidencia", "a.pdf", "application/pdf", too_big)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upload(UploadError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn test_area_image_commit() {
        let state = demo_state();
        let area = set_area_image(&state, 1, "portada.png", "image/png", vec![1, 2]).await.unwrap();
        assert!(area.image_url.unwrap().ends_with("-portada.png"));
    }

    #[tokio::test]
    async fn test_failed_area_image_keeps_previous() {
        let (state, _, storage) = demo_parts(WorkflowFlavor::Tracking);
        let first = set_area_image(&state, 1, "uno.png", "image/png", vec![1]).await.unwrap();

        storage.set_unavailable(true);
        let err = set_area_image(&state, 1, "dos.png", "image/png", vec![2]).await.unwrap_err();
        assert!(matches!(err, ApiError::Upload(UploadError::Storage(_))));

        let area = catalog::get_area(&state, 1).await.unwrap();
        assert_eq!(area.image_url, first.image_url);
    }

    #[tokio::test]
    async fn test_rejected_area_image_never_uploads() {
        let (state, _, storage) = demo_parts(WorkflowFlavor::Tracking);
        let err = set_area_image(&state, 1, "doc.pdf", "application/pdf", vec![1]).await.unwrap_err();
        assert!(matches!(err, ApiError::Upload(UploadError::UnsupportedType(_))));
        assert!(storage.is_empty());
    }
}
