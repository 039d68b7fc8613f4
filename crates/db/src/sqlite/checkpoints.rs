//! SQLite-Implementierung des CheckpointRepository

use chrono::Utc;
use tandem_core::RoomId;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{CheckpointRecord, NeuerCheckpoint};
use crate::repository::{CheckpointRepository, DbResult};
use crate::sqlite::pool::SqliteDb;

impl CheckpointRepository for SqliteDb {
    async fn hinterlegen(&self, daten: NeuerCheckpoint<'_>) -> DbResult<CheckpointRecord> {
        let ticket = Uuid::new_v4();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        sqlx::query(
            "INSERT INTO checkpoints (ticket, room_id, display_name, mute_audio, mute_video, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(ticket.to_string())
        .bind(daten.room_id.as_str())
        .bind(daten.display_name)
        .bind(daten.mute_audio as i64)
        .bind(daten.mute_video as i64)
        .bind(&now_str)
        .execute(&self.pool)
        .await?;

        Ok(CheckpointRecord {
            ticket,
            room_id: daten.room_id.clone(),
            display_name: daten.display_name.to_string(),
            mute_audio: daten.mute_audio,
            mute_video: daten.mute_video,
            created_at: now,
        })
    }

    async fn laden(&self, ticket: Uuid) -> DbResult<Option<CheckpointRecord>> {
        let row = sqlx::query(
            "SELECT ticket, room_id, display_name, mute_audio, mute_video, created_at
             FROM checkpoints WHERE ticket = ?",
        )
        .bind(ticket.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_checkpoint(&r)).transpose()
    }

    async fn entfernen(&self, ticket: Uuid) -> DbResult<bool> {
        let affected = sqlx::query("DELETE FROM checkpoints WHERE ticket = ?")
            .bind(ticket.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

pub(crate) fn row_to_checkpoint(row: &sqlx::sqlite::SqliteRow) -> DbResult<CheckpointRecord> {
    use sqlx::Row as _;

    let ticket_str: String = row.try_get("ticket")?;
    let ticket = Uuid::parse_str(&ticket_str)
        .map_err(|e| DbError::intern(format!("Ungueltiges Ticket '{ticket_str}': {e}")))?;

    let room_id: String = row.try_get("room_id")?;

    let created_at_str: String = row.try_get("created_at")?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| DbError::intern(format!("Ungueltige created_at '{created_at_str}': {e}")))?
        .with_timezone(&Utc);

    let mute_audio: i64 = row.try_get("mute_audio")?;
    let mute_video: i64 = row.try_get("mute_video")?;

    Ok(CheckpointRecord {
        ticket,
        room_id: RoomId(room_id),
        display_name: row.try_get("display_name")?,
        mute_audio: mute_audio != 0,
        mute_video: mute_video != 0,
        created_at,
    })
}
