//! SQLite-Implementierung des WaitingRepository

use chrono::{DateTime, Utc};
use tandem_core::{Language, RoomId};

use crate::error::DbError;
use crate::models::{NeuerWartender, WartenderEintrag};
use crate::repository::{DbResult, WaitingRepository};
use crate::sqlite::pool::SqliteDb;

impl WaitingRepository for SqliteDb {
    async fn passenden_konsumieren(
        &self,
        language: Language,
        level: u8,
        mindest_erstellt: DateTime<Utc>,
    ) -> DbResult<Option<WartenderEintrag>> {
        // Auswahl und Loeschung in einer Anweisung: zwei gleichzeitige
        // Matcher koennen denselben Eintrag nicht beide konsumieren.
        let row = sqlx::query(
            "DELETE FROM waiting_entries
             WHERE room_id = (
                 SELECT room_id FROM waiting_entries
                  WHERE language = ? AND level = ? AND created_at >= ?
                  ORDER BY created_at, room_id
                  LIMIT 1)
             RETURNING room_id, display_name, language, level, created_at",
        )
        .bind(language.als_str())
        .bind(level as i64)
        .bind(mindest_erstellt.to_rfc3339())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_wartender(&r)).transpose()
    }

    async fn eintragen(&self, daten: NeuerWartender<'_>) -> DbResult<WartenderEintrag> {
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        sqlx::query(
            "INSERT INTO waiting_entries (room_id, display_name, language, level, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(daten.room_id.as_str())
        .bind(daten.display_name)
        .bind(daten.language.als_str())
        .bind(daten.level as i64)
        .bind(&now_str)
        .execute(&self.pool)
        .await?;

        Ok(WartenderEintrag {
            room_id: daten.room_id.clone(),
            display_name: daten.display_name.to_string(),
            language: daten.language,
            level: daten.level,
            created_at: now,
        })
    }

    async fn abgelaufene_entfernen(&self, stichtag: DateTime<Utc>) -> DbResult<u64> {
        let affected = sqlx::query("DELETE FROM waiting_entries WHERE created_at < ?")
            .bind(stichtag.to_rfc3339())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected)
    }

    async fn anzahl(&self) -> DbResult<u64> {
        use sqlx::Row as _;
        let row = sqlx::query("SELECT COUNT(*) AS n FROM waiting_entries")
            .fetch_one(&self.pool)
            .await?;
        let n: i64 = row.try_get("n")?;
        Ok(n as u64)
    }
}

pub(crate) fn row_to_wartender(row: &sqlx::sqlite::SqliteRow) -> DbResult<WartenderEintrag> {
    use sqlx::Row as _;

    let room_id: String = row.try_get("room_id")?;

    let sprache_str: String = row.try_get("language")?;
    let language = sprache_str
        .parse::<Language>()
        .map_err(DbError::intern)?;

    let level: i64 = row.try_get("level")?;

    let created_at_str: String = row.try_get("created_at")?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| DbError::intern(format!("Ungueltige created_at '{created_at_str}': {e}")))?
        .with_timezone(&Utc);

    Ok(WartenderEintrag {
        room_id: RoomId(room_id),
        display_name: row.try_get("display_name")?,
        language,
        level: level as u8,
        created_at,
    })
}
