use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// The only room in scope.
pub const GENERAL_ROOM: &str = "general";
/// Replayed to each new connection, oldest first.
pub const HISTORY_LIMIT: i64 = 50;

/// A persisted message with the author's display name resolved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MessageView {
    pub message_id: String,
    pub user_id: String,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Inbound socket frames.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    SendMessage { content: String },
}

/// Outbound socket frames.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    LoadMessages { messages: Vec<MessageView> },
    NewMessage { message: MessageView },
}

impl MessageView {
    /// Persists one message and resolves the author name in the same
    /// round-trip. The author must exist; the FK enforces it at write time.
    pub async fn create(
        pool: &PgPool,
        room: &str,
        user_id: &str,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        let message_id = Uuid::new_v4().to_string();

        let message = sqlx::query_as::<_, MessageView>(
            r#"
            WITH inserted AS (
                INSERT INTO messages (message_id, room, user_id, content, created_at)
                VALUES ($1, $2, $3, $4, NOW())
                RETURNING message_id, user_id, content, created_at
            )
            SELECT i.message_id, i.user_id, u.name, i.content, i.created_at
            FROM inserted i
            JOIN users u ON i.user_id = u.user_id
            "#,
        )
        .bind(&message_id)
        .bind(room)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    /// The most recent messages of a room in chronological order: fetched
    /// newest-first with the limit, then reversed.
    pub async fn recent(pool: &PgPool, room: &str) -> Result<Vec<Self>, sqlx::Error> {
        let mut messages = sqlx::query_as::<_, MessageView>(
            r#"
            SELECT m.message_id, m.user_id, u.name, m.content, m.created_at
            FROM messages m
            JOIN users u ON m.user_id = u.user_id
            WHERE m.room = $1
            ORDER BY m.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(room)
        .bind(HISTORY_LIMIT)
        .fetch_all(pool)
        .await?;

        messages.reverse();
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(n: u32) -> MessageView {
        MessageView {
            message_id: format!("m-{}", n),
            user_id: "U1".into(),
            name: "Asha".into(),
            content: "hello".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_client_event_parse() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"send_message","content":"hello"}"#).unwrap();
        let ClientEvent::SendMessage { content } = event;
        assert_eq!(content, "hello");
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!(serde_json::from_str::<ClientEvent>(r#"{"event":"typing"}"#).is_err());
    }

    #[test]
    fn test_new_message_shape() {
        let json =
            serde_json::to_value(ServerEvent::NewMessage { message: message(1) }).unwrap();
        assert_eq!(json["event"], "new_message");
        assert_eq!(json["message"]["content"], "hello");
        assert_eq!(json["message"]["name"], "Asha");
        assert!(json["message"]["created_at"].is_string());
    }

    #[test]
    fn test_load_messages_shape() {
        let json = serde_json::to_value(ServerEvent::LoadMessages {
            messages: vec![message(1), message(2)],
        })
        .unwrap();
        assert_eq!(json["event"], "load_messages");
        assert_eq!(json["messages"].as_array().map(Vec::len), Some(2));
    }
}
