//! One-call scan -> resolve -> compose.

use std::sync::Arc;

use tracing::debug;

use mentionkit_types::mention::ComposedMessage;

use crate::attachment::AttachmentContent;
use crate::entity::registry::EntityRegistry;
use crate::mention::composer::compose;
use crate::mention::resolver::resolve_all;
use crate::mention::scanner::MentionScanner;

/// Context injection pipeline bound to a shared registry.
///
/// Holds no per-message state: one pipeline serves every conversation, and
/// `Clone` only bumps the registry refcount.
#[derive(Debug, Clone)]
pub struct ContextPipeline {
    registry: Arc<EntityRegistry>,
    scanner: MentionScanner,
}

impl ContextPipeline {
    pub fn new(registry: Arc<EntityRegistry>, scanner: MentionScanner) -> Self {
        Self { registry, scanner }
    }

    pub fn registry(&self) -> &Arc<EntityRegistry> {
        &self.registry
    }

    pub fn scanner(&self) -> MentionScanner {
        self.scanner
    }

    /// Compose the agent payload for a user message.
    pub fn process(&self, text: &str) -> ComposedMessage {
        let resolved = resolve_all(self.scanner.scan(text), &self.registry);
        let found = resolved.iter().filter(|c| c.is_found()).count();
        debug!(
            mentions = resolved.len(),
            found,
            missing = resolved.len() - found,
            "composed message context"
        );
        compose(text, &resolved)
    }

    /// Like [`process`](Self::process), then append attachment context after
    /// the mention blocks.
    pub fn process_with_attachments(
        &self,
        text: &str,
        attachments: impl IntoIterator<Item = AttachmentContent>,
    ) -> ComposedMessage {
        let mut message = self.process(text);
        for content in attachments {
            match content {
                AttachmentContent::Text(block) => message.injected_blocks.push(block),
                AttachmentContent::Image(image) => message.images.push(image),
            }
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentionkit_types::mention::ImageInput;

    fn pipeline() -> ContextPipeline {
        ContextPipeline::new(
            Arc::new(EntityRegistry::with_demo_entities()),
            MentionScanner::new(),
        )
    }

    #[test]
    fn process_injects_demo_order() {
        let msg = pipeline().process("What is the status of @order_123?");
        assert_eq!(msg.visible_text, "What is the status of @order_123?");
        assert_eq!(msg.injected_blocks.len(), 1);
        assert!(msg.injected_blocks[0].contains("status=shipped"));
    }

    #[test]
    fn process_plain_text_has_no_blocks() {
        let msg = pipeline().process("hello there");
        assert!(msg.injected_blocks.is_empty());
        assert_eq!(msg.to_payload(), "hello there");
    }

    #[test]
    fn attachments_follow_mention_blocks() {
        let msg = pipeline().process_with_attachments(
            "compare @order_456 with the file",
            vec![
                AttachmentContent::Text("[File not found: a.txt]".to_string()),
                AttachmentContent::Image(ImageInput {
                    name: "shot.png".to_string(),
                    data_url: "data:image/png;base64,AA==".to_string(),
                }),
            ],
        );

        assert_eq!(msg.injected_blocks.len(), 2);
        assert!(msg.injected_blocks[0].contains("id=order_456"));
        assert_eq!(msg.injected_blocks[1], "[File not found: a.txt]");
        assert_eq!(msg.images.len(), 1);
    }

    #[test]
    fn pipeline_sees_later_registrations() {
        let pipeline = pipeline();
        assert!(pipeline.process("@doc_1").injected_blocks[0].starts_with("<ENTITY_NOT_FOUND>"));

        pipeline
            .registry()
            .register(mentionkit_types::entity::EntityRecord::new(
                "doc_1",
                mentionkit_types::entity::EntityKind::Document,
            ))
            .unwrap();
        assert!(pipeline.process("@doc_1").injected_blocks[0].starts_with("<DOCUMENT_CONTEXT>"));
    }
}
