//! Thread store trait.
//!
//! Defines the narrow interface the chat service uses to persist threads,
//! thread items and attachment metadata. Every call is scoped to a user id;
//! another user's thread behaves as if it did not exist.
//! Implementations live in mentionkit-infra.

use mentionkit_types::attachment::Attachment;
use mentionkit_types::error::RepositoryError;
use mentionkit_types::thread::{SortOrder, ThreadItem, ThreadMetadata};

/// Trait for user-scoped thread persistence.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait ThreadStore: Send + Sync {
    /// Insert or replace a thread. The owner is `thread.user_id`.
    fn save_thread(
        &self,
        thread: &ThreadMetadata,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Load a thread. Returns `RepositoryError::NotFound` if it does not
    /// exist or belongs to another user.
    fn load_thread(
        &self,
        user_id: &str,
        thread_id: &str,
    ) -> impl std::future::Future<Output = Result<ThreadMetadata, RepositoryError>> + Send;

    /// List a user's threads, newest first.
    fn list_threads(
        &self,
        user_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ThreadMetadata>, RepositoryError>> + Send;

    /// Delete a thread and all of its items. No-op if it does not exist.
    fn delete_thread(
        &self,
        user_id: &str,
        thread_id: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append an item to a thread the user owns.
    fn add_item(
        &self,
        user_id: &str,
        item: &ThreadItem,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Load up to `limit` items of a thread in creation order.
    fn load_items(
        &self,
        user_id: &str,
        thread_id: &str,
        limit: u32,
        order: SortOrder,
    ) -> impl std::future::Future<Output = Result<Vec<ThreadItem>, RepositoryError>> + Send;

    /// Insert or replace attachment metadata.
    fn save_attachment(
        &self,
        user_id: &str,
        attachment: &Attachment,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Load attachment metadata. `RepositoryError::NotFound` if unknown.
    fn load_attachment(
        &self,
        user_id: &str,
        attachment_id: &str,
    ) -> impl std::future::Future<Output = Result<Attachment, RepositoryError>> + Send;
}
