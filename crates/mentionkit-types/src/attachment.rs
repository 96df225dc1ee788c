use serde::{Deserialize, Serialize};

/// Metadata of a file the user attached to a message.
///
/// The bytes live in the upload directory under `{id}.{ext}`; this record is
/// what the thread store persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub kind: AttachmentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    File,
    Image,
}

impl Attachment {
    /// Build an attachment, classifying it as an image from its mime type.
    pub fn new(id: impl Into<String>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        let kind = if mime_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        };
        Self {
            id: id.into(),
            name: name.into(),
            mime_type,
            kind,
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind == AttachmentKind::Image || self.mime_type.starts_with("image/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mime() {
        assert!(Attachment::new("file_1", "cat.png", "image/png").is_image());
        assert!(!Attachment::new("file_2", "notes.txt", "text/plain").is_image());
    }

    #[test]
    fn test_explicit_image_kind_wins() {
        let att = Attachment {
            id: "file_3".to_string(),
            name: "scan".to_string(),
            mime_type: "application/octet-stream".to_string(),
            kind: AttachmentKind::Image,
        };
        assert!(att.is_image());
    }
}
