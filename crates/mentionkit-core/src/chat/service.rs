//! Chat service tying the context pipeline and action bridge to thread storage.
//!
//! ChatService is the entry point the application layer uses per request:
//! composing a user message (mentions + attachments), persisting it, and
//! dispatching UI actions whose replies are appended to the thread.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use mentionkit_types::action::{ActionRequest, ActionResult};
use mentionkit_types::error::{ChatError, RepositoryError};
use mentionkit_types::mention::ComposedMessage;
use mentionkit_types::thread::{ItemRole, SortOrder, ThreadItem, ThreadMetadata};

use crate::action::bridge::ActionBridge;
use crate::attachment::{AttachmentContent, attachment_context};
use crate::mention::pipeline::ContextPipeline;
use crate::storage::thread_store::ThreadStore;
use crate::storage::upload_store::UploadStore;

/// A user message after composition and persistence.
#[derive(Debug, Clone, Serialize)]
pub struct PostedMessage {
    pub item: ThreadItem,
    pub composed: ComposedMessage,
}

/// Orchestrates message composition, action dispatch and thread persistence.
///
/// Generic over `ThreadStore` and `UploadStore` to maintain clean
/// architecture (mentionkit-core never depends on mentionkit-infra).
pub struct ChatService<S: ThreadStore, U: UploadStore> {
    store: S,
    uploads: U,
    pipeline: ContextPipeline,
    bridge: ActionBridge,
}

impl<S: ThreadStore, U: UploadStore> ChatService<S, U> {
    pub fn new(store: S, uploads: U, pipeline: ContextPipeline, bridge: ActionBridge) -> Self {
        Self {
            store,
            uploads,
            pipeline,
            bridge,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn uploads(&self) -> &U {
        &self.uploads
    }

    pub fn pipeline(&self) -> &ContextPipeline {
        &self.pipeline
    }

    pub fn bridge(&self) -> &ActionBridge {
        &self.bridge
    }

    // --- Threads ---

    /// Load the user's thread, creating it on first use.
    pub async fn ensure_thread(
        &self,
        user_id: &str,
        thread_id: &str,
    ) -> Result<ThreadMetadata, RepositoryError> {
        match self.store.load_thread(user_id, thread_id).await {
            Ok(thread) => Ok(thread),
            Err(RepositoryError::NotFound) => {
                let thread = ThreadMetadata::new(thread_id, user_id);
                self.store.save_thread(&thread).await?;
                info!(thread_id, user_id, "thread created");
                Ok(thread)
            }
            Err(e) => Err(e),
        }
    }

    /// Rename a thread. The first user message is used as a fallback title.
    pub async fn set_title(
        &self,
        user_id: &str,
        thread_id: &str,
        title: String,
    ) -> Result<(), RepositoryError> {
        let mut thread = self.store.load_thread(user_id, thread_id).await?;
        thread.title = Some(title);
        self.store.save_thread(&thread).await
    }

    pub async fn list_threads(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ThreadMetadata>, RepositoryError> {
        self.store.list_threads(user_id, limit).await
    }

    pub async fn delete_thread(&self, user_id: &str, thread_id: &str) -> Result<(), RepositoryError> {
        self.store.delete_thread(user_id, thread_id).await?;
        info!(thread_id, user_id, "thread deleted");
        Ok(())
    }

    pub async fn history(
        &self,
        user_id: &str,
        thread_id: &str,
        limit: u32,
        order: SortOrder,
    ) -> Result<Vec<ThreadItem>, RepositoryError> {
        self.store.load_thread(user_id, thread_id).await?;
        self.store.load_items(user_id, thread_id, limit, order).await
    }

    // --- Messages ---

    /// Compose the runtime payload for a message without persisting anything.
    pub async fn compose(
        &self,
        user_id: &str,
        text: &str,
        attachment_ids: &[String],
    ) -> ComposedMessage {
        let mut contents = Vec::with_capacity(attachment_ids.len());
        for id in attachment_ids {
            contents.push(self.attachment_content(user_id, id).await);
        }
        self.pipeline.process_with_attachments(text, contents)
    }

    /// Compose a user message and append it to the thread.
    ///
    /// The stored item keeps the verbatim text and the composed payload.
    /// Threads without a title take the first message as title. Blank text
    /// without attachments is rejected before anything is stored.
    pub async fn post_message(
        &self,
        user_id: &str,
        thread_id: &str,
        text: &str,
        attachment_ids: &[String],
    ) -> Result<PostedMessage, ChatError> {
        if text.trim().is_empty() && attachment_ids.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let thread = self.ensure_thread(user_id, thread_id).await?;
        let composed = self.compose(user_id, text, attachment_ids).await;

        let item = ThreadItem {
            id: new_item_id(),
            thread_id: thread_id.to_owned(),
            role: ItemRole::User,
            text: text.to_owned(),
            composed_payload: Some(composed.to_payload()),
            attachment_ids: attachment_ids.to_vec(),
            created_at: Utc::now(),
        };
        self.store.add_item(user_id, &item).await?;

        if thread.title.is_none() {
            self.set_title(user_id, thread_id, fallback_title(text)).await?;
        }

        Ok(PostedMessage { item, composed })
    }

    // --- Actions ---

    /// Dispatch a UI action for a thread. An applied action with a reply
    /// appends that reply as an assistant item.
    pub async fn dispatch_action(
        &self,
        user_id: &str,
        thread_id: &str,
        request: &ActionRequest,
    ) -> Result<ActionResult, RepositoryError> {
        self.ensure_thread(user_id, thread_id).await?;
        let result = self.bridge.dispatch(request);

        if let Some(reply) = result.effect.as_ref().and_then(|e| e.reply.clone()) {
            let item = ThreadItem {
                id: new_item_id(),
                thread_id: thread_id.to_owned(),
                role: ItemRole::Assistant,
                text: reply,
                composed_payload: None,
                attachment_ids: Vec::new(),
                created_at: Utc::now(),
            };
            self.store.add_item(user_id, &item).await?;
        }

        Ok(result)
    }

    async fn attachment_content(&self, user_id: &str, attachment_id: &str) -> AttachmentContent {
        let attachment = match self.store.load_attachment(user_id, attachment_id).await {
            Ok(attachment) => attachment,
            Err(e) => {
                warn!(attachment_id, error = %e, "attachment metadata unavailable");
                return AttachmentContent::Text(format!("[File not found: {attachment_id}]"));
            }
        };
        let bytes = self.uploads.read_upload(attachment_id).await;
        attachment_context(&attachment, bytes.as_deref())
    }
}

fn new_item_id() -> String {
    format!("msg_{}", Uuid::now_v7().simple())
}

/// First line of the message, capped at 48 characters.
fn fallback_title(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default().trim();
    if first_line.is_empty() {
        return "New Conversation".to_string();
    }
    let mut title: String = first_line.chars().take(48).collect();
    if first_line.chars().count() > 48 {
        title.push_str("...");
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use mentionkit_types::attachment::Attachment;

    use crate::entity::registry::EntityRegistry;
    use crate::mention::scanner::MentionScanner;

    #[derive(Default)]
    struct MemoryThreadStore {
        threads: Mutex<HashMap<String, ThreadMetadata>>,
        items: Mutex<Vec<ThreadItem>>,
        attachments: Mutex<HashMap<String, Attachment>>,
    }

    impl ThreadStore for MemoryThreadStore {
        async fn save_thread(&self, thread: &ThreadMetadata) -> Result<(), RepositoryError> {
            self.threads
                .lock()
                .unwrap()
                .insert(thread.id.clone(), thread.clone());
            Ok(())
        }

        async fn load_thread(
            &self,
            user_id: &str,
            thread_id: &str,
        ) -> Result<ThreadMetadata, RepositoryError> {
            self.threads
                .lock()
                .unwrap()
                .get(thread_id)
                .filter(|t| t.user_id == user_id)
                .cloned()
                .ok_or(RepositoryError::NotFound)
        }

        async fn list_threads(
            &self,
            user_id: &str,
            _limit: u32,
        ) -> Result<Vec<ThreadMetadata>, RepositoryError> {
            Ok(self
                .threads
                .lock()
                .unwrap()
                .values()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn delete_thread(&self, _user_id: &str, thread_id: &str) -> Result<(), RepositoryError> {
            self.threads.lock().unwrap().remove(thread_id);
            self.items.lock().unwrap().retain(|i| i.thread_id != thread_id);
            Ok(())
        }

        async fn add_item(&self, _user_id: &str, item: &ThreadItem) -> Result<(), RepositoryError> {
            self.items.lock().unwrap().push(item.clone());
            Ok(())
        }

        async fn load_items(
            &self,
            _user_id: &str,
            thread_id: &str,
            limit: u32,
            order: SortOrder,
        ) -> Result<Vec<ThreadItem>, RepositoryError> {
            let mut items: Vec<ThreadItem> = self
                .items
                .lock()
                .unwrap()
                .iter()
                .filter(|i| i.thread_id == thread_id)
                .cloned()
                .collect();
            if order == SortOrder::Desc {
                items.reverse();
            }
            items.truncate(limit as usize);
            Ok(items)
        }

        async fn save_attachment(
            &self,
            _user_id: &str,
            attachment: &Attachment,
        ) -> Result<(), RepositoryError> {
            self.attachments
                .lock()
                .unwrap()
                .insert(attachment.id.clone(), attachment.clone());
            Ok(())
        }

        async fn load_attachment(
            &self,
            _user_id: &str,
            attachment_id: &str,
        ) -> Result<Attachment, RepositoryError> {
            self.attachments
                .lock()
                .unwrap()
                .get(attachment_id)
                .cloned()
                .ok_or(RepositoryError::NotFound)
        }
    }

    #[derive(Default)]
    struct MemoryUploads(HashMap<String, Vec<u8>>);

    impl UploadStore for MemoryUploads {
        async fn read_upload(&self, attachment_id: &str) -> Option<Vec<u8>> {
            self.0.get(attachment_id).cloned()
        }
    }

    fn service(uploads: MemoryUploads) -> ChatService<MemoryThreadStore, MemoryUploads> {
        let pipeline = ContextPipeline::new(
            Arc::new(EntityRegistry::with_demo_entities()),
            MentionScanner::new(),
        );
        ChatService::new(
            MemoryThreadStore::default(),
            uploads,
            pipeline,
            ActionBridge::with_builtin_handlers(),
        )
    }

    #[tokio::test]
    async fn post_message_persists_text_and_payload() {
        let svc = service(MemoryUploads::default());
        let posted = svc
            .post_message("alice", "thr_1", "Where is @order_123?", &[])
            .await
            .unwrap();

        assert_eq!(posted.item.text, "Where is @order_123?");
        assert_eq!(posted.composed.injected_blocks.len(), 1);
        let payload = posted.item.composed_payload.as_deref().unwrap();
        assert!(payload.starts_with("Where is @order_123?\n<ORDER_CONTEXT>"));

        let items = svc.history("alice", "thr_1", 20, SortOrder::Asc).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].role, ItemRole::User);
    }

    #[tokio::test]
    async fn first_message_titles_thread() {
        let svc = service(MemoryUploads::default());
        svc.post_message("alice", "thr_1", "Track @order_456\nplease", &[])
            .await
            .unwrap();
        svc.post_message("alice", "thr_1", "second", &[]).await.unwrap();

        let thread = svc.store().load_thread("alice", "thr_1").await.unwrap();
        assert_eq!(thread.title.as_deref(), Some("Track @order_456"));
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_creating_thread() {
        let svc = service(MemoryUploads::default());

        let err = svc.post_message("alice", "thr_1", "  \n", &[]).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));

        let err = svc.store().load_thread("alice", "thr_1").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn attachment_only_message_is_accepted() {
        let svc = service(MemoryUploads::default());
        let posted = svc
            .post_message("alice", "thr_1", "", &["file_1".to_string()])
            .await
            .unwrap();
        assert_eq!(posted.item.attachment_ids, vec!["file_1"]);
        assert_eq!(posted.composed.injected_blocks, vec!["[File not found: file_1]"]);
    }

    #[tokio::test]
    async fn other_users_cannot_read_history() {
        let svc = service(MemoryUploads::default());
        svc.post_message("alice", "thr_1", "hi", &[]).await.unwrap();

        let err = svc
            .history("mallory", "thr_1", 20, SortOrder::Asc)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn attachments_are_composed_after_mentions() {
        let mut uploads = MemoryUploads::default();
        uploads
            .0
            .insert("file_1".to_string(), b"quarterly numbers".to_vec());
        let svc = service(uploads);
        svc.store()
            .save_attachment("alice", &Attachment::new("file_1", "q3.txt", "text/plain"))
            .await
            .unwrap();

        let composed = svc
            .compose(
                "alice",
                "@order_123 vs file",
                &["file_1".to_string(), "file_missing".to_string()],
            )
            .await;

        assert_eq!(composed.injected_blocks.len(), 3);
        assert!(composed.injected_blocks[0].starts_with("<ORDER_CONTEXT>"));
        assert!(composed.injected_blocks[1].contains("quarterly numbers"));
        assert_eq!(composed.injected_blocks[2], "[File not found: file_missing]");
    }

    #[tokio::test]
    async fn applied_action_reply_is_persisted() {
        let svc = service(MemoryUploads::default());
        let request = ActionRequest::new("submit_feedback", serde_json::json!({"rating": 4}));

        let result = svc.dispatch_action("alice", "thr_1", &request).await.unwrap();
        assert!(result.is_applied());

        let items = svc.history("alice", "thr_1", 20, SortOrder::Asc).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].role, ItemRole::Assistant);
        assert_eq!(items[0].text, "Feedback received. Thank you!");
    }

    #[tokio::test]
    async fn rejected_action_adds_no_items() {
        let svc = service(MemoryUploads::default());
        let request = ActionRequest::new("nonexistent", serde_json::json!({}));

        let result = svc.dispatch_action("alice", "thr_1", &request).await.unwrap();
        assert!(!result.is_applied());

        let items = svc.history("alice", "thr_1", 20, SortOrder::Asc).await.unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn fallback_title_truncates() {
        assert_eq!(fallback_title(""), "New Conversation");
        assert_eq!(fallback_title("short"), "short");
        let long = "x".repeat(60);
        assert_eq!(fallback_title(&long), format!("{}...", "x".repeat(48)));
    }
}
