//! SQLite thread store implementation.
//!
//! Implements `ThreadStore` from `mentionkit-core` using sqlx with split
//! read/write pools. Every query is filtered by the owning user id, so a
//! thread of another user reads as missing.

use chrono::{DateTime, Utc};
use sqlx::Row;

use mentionkit_core::storage::thread_store::ThreadStore;
use mentionkit_types::attachment::{Attachment, AttachmentKind};
use mentionkit_types::error::RepositoryError;
use mentionkit_types::thread::{ItemRole, SortOrder, ThreadItem, ThreadMetadata};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ThreadStore`.
pub struct SqliteThreadStore {
    pool: DatabasePool,
}

impl SqliteThreadStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ThreadRow {
    id: String,
    user_id: String,
    title: Option<String>,
    created_at: String,
}

impl ThreadRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_thread(self) -> Result<ThreadMetadata, RepositoryError> {
        Ok(ThreadMetadata {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct ItemRow {
    id: String,
    thread_id: String,
    role: String,
    text: String,
    composed_payload: Option<String>,
    attachment_ids: String,
    created_at: String,
}

impl ItemRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            thread_id: row.try_get("thread_id")?,
            role: row.try_get("role")?,
            text: row.try_get("text")?,
            composed_payload: row.try_get("composed_payload")?,
            attachment_ids: row.try_get("attachment_ids")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_item(self) -> Result<ThreadItem, RepositoryError> {
        let role: ItemRole = self.role.parse().map_err(RepositoryError::Query)?;
        let attachment_ids: Vec<String> = serde_json::from_str(&self.attachment_ids)
            .map_err(|e| RepositoryError::Query(format!("invalid attachment_ids: {e}")))?;

        Ok(ThreadItem {
            id: self.id,
            thread_id: self.thread_id,
            role,
            text: self.text,
            composed_payload: self.composed_payload,
            attachment_ids,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct AttachmentRow {
    id: String,
    name: String,
    mime_type: String,
    kind: String,
}

impl AttachmentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            mime_type: row.try_get("mime_type")?,
            kind: row.try_get("kind")?,
        })
    }

    fn into_attachment(self) -> Result<Attachment, RepositoryError> {
        let kind = match self.kind.as_str() {
            "file" => AttachmentKind::File,
            "image" => AttachmentKind::Image,
            other => {
                return Err(RepositoryError::Query(format!(
                    "invalid attachment kind: '{other}'"
                )));
            }
        };
        Ok(Attachment {
            id: self.id,
            name: self.name,
            mime_type: self.mime_type,
            kind,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn attachment_kind_str(kind: AttachmentKind) -> &'static str {
    match kind {
        AttachmentKind::File => "file",
        AttachmentKind::Image => "image",
    }
}

// ---------------------------------------------------------------------------
// ThreadStore implementation
// ---------------------------------------------------------------------------

impl ThreadStore for SqliteThreadStore {
    async fn save_thread(&self, thread: &ThreadMetadata) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO threads (id, user_id, title, created_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (id) DO UPDATE SET title = excluded.title
               WHERE threads.user_id = excluded.user_id"#,
        )
        .bind(&thread.id)
        .bind(&thread.user_id)
        .bind(&thread.title)
        .bind(format_datetime(&thread.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(format!(
                "thread '{}' belongs to another user",
                thread.id
            )));
        }
        Ok(())
    }

    async fn load_thread(
        &self,
        user_id: &str,
        thread_id: &str,
    ) -> Result<ThreadMetadata, RepositoryError> {
        let row = sqlx::query("SELECT * FROM threads WHERE id = ? AND user_id = ?")
            .bind(thread_id)
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => ThreadRow::from_row(&row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_thread(),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn list_threads(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ThreadMetadata>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM threads WHERE user_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                ThreadRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_thread()
            })
            .collect()
    }

    async fn delete_thread(&self, user_id: &str, thread_id: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM threads WHERE id = ? AND user_id = ?")
            .bind(thread_id)
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn add_item(&self, user_id: &str, item: &ThreadItem) -> Result<(), RepositoryError> {
        let attachment_ids = serde_json::to_string(&item.attachment_ids)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize attachment_ids: {e}")))?;

        let result = sqlx::query(
            r#"INSERT INTO thread_items
                   (id, thread_id, role, text, composed_payload, attachment_ids, created_at)
               SELECT ?, ?, ?, ?, ?, ?, ?
               WHERE EXISTS (SELECT 1 FROM threads WHERE id = ? AND user_id = ?)"#,
        )
        .bind(&item.id)
        .bind(&item.thread_id)
        .bind(item.role.to_string())
        .bind(&item.text)
        .bind(&item.composed_payload)
        .bind(&attachment_ids)
        .bind(format_datetime(&item.created_at))
        .bind(&item.thread_id)
        .bind(user_id)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("item '{}' already exists", item.id))
            }
            _ => RepositoryError::Query(e.to_string()),
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn load_items(
        &self,
        user_id: &str,
        thread_id: &str,
        limit: u32,
        order: SortOrder,
    ) -> Result<Vec<ThreadItem>, RepositoryError> {
        let query = format!(
            r#"SELECT i.* FROM thread_items i
               JOIN threads t ON t.id = i.thread_id
               WHERE i.thread_id = ? AND t.user_id = ?
               ORDER BY i.seq {}
               LIMIT ?"#,
            order.as_sql()
        );

        let rows = sqlx::query(&query)
            .bind(thread_id)
            .bind(user_id)
            .bind(i64::from(limit))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                ItemRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_item()
            })
            .collect()
    }

    async fn save_attachment(
        &self,
        user_id: &str,
        attachment: &Attachment,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO attachments (id, user_id, name, mime_type, kind, created_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT (id) DO UPDATE SET
                   name = excluded.name,
                   mime_type = excluded.mime_type,
                   kind = excluded.kind
               WHERE attachments.user_id = excluded.user_id"#,
        )
        .bind(&attachment.id)
        .bind(user_id)
        .bind(&attachment.name)
        .bind(&attachment.mime_type)
        .bind(attachment_kind_str(attachment.kind))
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(format!(
                "attachment '{}' belongs to another user",
                attachment.id
            )));
        }
        Ok(())
    }

    async fn load_attachment(
        &self,
        user_id: &str,
        attachment_id: &str,
    ) -> Result<Attachment, RepositoryError> {
        let row = sqlx::query("SELECT * FROM attachments WHERE id = ? AND user_id = ?")
            .bind(attachment_id)
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => AttachmentRow::from_row(&row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_attachment(),
            None => Err(RepositoryError::NotFound),
        }
    }
}
