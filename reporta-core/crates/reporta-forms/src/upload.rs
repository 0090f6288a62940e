//! Upload policy and two-phase upload slots
use serde::Serialize;
use thiserror::Error;

use crate::field::FieldType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("file type {0} is not allowed")]
    UnsupportedType(String),

    #[error("file is {size} bytes, the maximum is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("file is empty")]
    Empty,

    #[error("field \"{0}\" does not accept uploads")]
    NotUploadField(String),

    #[error("upload failed: {0}")]
    Storage(String),
}

impl UploadError {
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::UnsupportedType(_) => "unsupported_type",
            UploadError::TooLarge { .. } => "too_large",
            UploadError::Empty => "empty_file",
            UploadError::NotUploadField(_) => "not_upload_field",
            UploadError::Storage(_) => "upload_failed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            allowed_mime_types: ["image/jpeg", "image/png", "image/webp", "image/gif", "application/pdf"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl UploadPolicy {
    /// Image fields take `image/*` only; both upload types must also be on
    /// the allow list.
    pub fn check(&self, field_type: FieldType, content_type: &str, size: usize) -> Result<(), UploadError> {
        let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        if !field_type.is_upload() {
            return Err(UploadError::NotUploadField(field_type.as_str().to_string()));
        }
        if field_type == FieldType::Image && !mime.starts_with("image/") {
            return Err(UploadError::UnsupportedType(mime));
        }
        if !self.allowed_mime_types.iter().any(|allowed| allowed.eq_ignore_ascii_case(&mime)) {
            return Err(UploadError::UnsupportedType(mime));
        }
        if size == 0 {
            return Err(UploadError::Empty);
        }
        if size > self.max_bytes {
            return Err(UploadError::TooLarge { size, max: self.max_bytes });
        }
        Ok(())
    }
}

/// Locally staged file shown before the upload completes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub filename: String,
    pub content_type: String,
    pub size: usize,
}

/// Holds the committed URL of an upload target plus at most one pending
/// preview. The preview is never reported as the committed value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadSlot {
    committed: Option<String>,
    pending: Option<Preview>,
}

impl UploadSlot {
    pub fn new(committed: Option<String>) -> Self {
        Self { committed, pending: None }
    }

    pub fn committed(&self) -> Option<&str> { self.committed.as_deref() }

    pub fn preview(&self) -> Option<&Preview> { self.pending.as_ref() }

    pub fn is_pending(&self) -> bool { self.pending.is_some() }

    /// Stage `preview` after checking it against `policy`. A rejected file
    /// leaves the slot untouched.
    pub fn stage(&mut self, policy: &UploadPolicy, field_type: FieldType, preview: Preview) -> Result<(), UploadError> {
        policy.check(field_type, &preview.content_type, preview.size)?;
        self.pending = Some(preview);
        Ok(())
    }

    /// The upload succeeded: `url` becomes the committed value.
    pub fn commit(&mut self, url: impl Into<String>) -> Option<String> {
        self.pending = None;
        self.committed.replace(url.into())
    }

    /// The upload failed: drop the preview and fall back to the committed value.
    pub fn rollback(&mut self) -> Option<&str> {
        self.pending = None;
        self.committed.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview(content_type: &str, size: usize) -> Preview {
        Preview { filename: "foto.png".into(), content_type: content_type.into(), size }
    }

    #[test]
    fn test_policy_checks() {
        let policy = UploadPolicy { max_bytes: 100, ..UploadPolicy::default() };
        assert!(policy.check(FieldType::Image, "image/png", 10).is_ok());
        assert!(policy.check(FieldType::File, "application/pdf; charset=binary", 10).is_ok());
        assert_eq!(
            policy.check(FieldType::Image, "application/pdf", 10),
            Err(UploadError::UnsupportedType("application/pdf".into()))
        );
        assert_eq!(policy.check(FieldType::File, "image/png", 101), Err(UploadError::TooLarge { size: 101, max: 100 }));
        assert_eq!(policy.check(FieldType::File, "image/png", 0), Err(UploadError::Empty));
        assert!(matches!(policy.check(FieldType::Text, "image/png", 1), Err(UploadError::NotUploadField(_))));
    }

    #[test]
    fn test_failed_upload_rolls_back_to_committed() {
        let mut slot = UploadSlot::new(Some("https://cdn/old.png".into()));
        slot.stage(&UploadPolicy::default(), FieldType::Image, preview("image/png", 10)).unwrap();
        assert!(slot.is_pending());
        assert_eq!(slot.committed(), Some("https://cdn/old.png"));
        assert_eq!(slot.rollback(), Some("https://cdn/old.png"));
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_commit_replaces_value() {
        let mut slot = UploadSlot::new(None);
        slot.stage(&UploadPolicy::default(), FieldType::Image, preview("image/jpeg", 10)).unwrap();
        assert_eq!(slot.commit("https://cdn/new.jpg"), None);
        assert_eq!(slot.committed(), Some("https://cdn/new.jpg"));
    }

    #[test]
    fn test_rejected_stage_leaves_slot_untouched() {
        let mut slot = UploadSlot::new(Some("https://cdn/old.png".into()));
        assert!(slot.stage(&UploadPolicy::default(), FieldType::Image, preview("text/html", 10)).is_err());
        assert!(!slot.is_pending());
    }
}
