//! Upload store trait.
//!
//! Read access to the bytes of uploaded attachments. Writing uploads is the
//! upload endpoint's concern and lives outside this crate.

/// Trait for locating uploaded attachment bytes by attachment id.
pub trait UploadStore: Send + Sync {
    /// Read the bytes stored for `attachment_id`, or `None` if no upload matches.
    fn read_upload(
        &self,
        attachment_id: &str,
    ) -> impl std::future::Future<Output = Option<Vec<u8>>> + Send;
}
