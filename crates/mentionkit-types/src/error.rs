use thiserror::Error;

/// Errors raised when registering entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("entity id '{0}' already registered")]
    DuplicateId(String),

    #[error("invalid entity id: '{0}'")]
    InvalidId(String),
}

/// Errors that end a single action invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("action '{action}' failed: {reason}")]
    Execution { action: String, reason: String },
}

/// Errors loading the entity seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(String),

    #[error("failed to parse seed file: {0}")]
    Parse(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors from chat service operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message needs text or at least one attachment")]
    EmptyMessage,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors from repository operations (used by trait definitions in mentionkit-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::DuplicateId("order_123".to_string());
        assert_eq!(err.to_string(), "entity id 'order_123' already registered");
    }

    #[test]
    fn test_action_error_display() {
        let err = ActionError::Execution {
            action: "apply_theme".to_string(),
            reason: "missing colorScheme".to_string(),
        };
        assert!(err.to_string().contains("apply_theme"));
        assert!(err.to_string().contains("missing colorScheme"));
    }

    #[test]
    fn test_seed_error_wraps_registry_error() {
        let err: SeedError = RegistryError::DuplicateId("doc_1".to_string()).into();
        assert_eq!(err.to_string(), "entity id 'doc_1' already registered");
    }

    #[test]
    fn test_chat_error_wraps_repository_error() {
        let err: ChatError = RepositoryError::NotFound.into();
        assert!(matches!(err, ChatError::Repository(RepositoryError::NotFound)));
        assert_eq!(
            ChatError::EmptyMessage.to_string(),
            "message needs text or at least one attachment"
        );
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
