//! Integrationstests fuer den Checkpoint-Bestand (In-Memory-SQLite)

use tandem_core::RoomId;
use tandem_db::models::NeuerCheckpoint;
use tandem_db::{CheckpointRepository, SqliteDb};
use uuid::Uuid;

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory-Datenbank konnte nicht erstellt werden")
}

#[tokio::test]
async fn hinterlegen_und_laden() {
    let db = db().await;
    let room_id = RoomId::generieren();

    let record = db
        .hinterlegen(NeuerCheckpoint {
            room_id: &room_id,
            display_name: "Aruzhan",
            mute_audio: true,
            mute_video: false,
        })
        .await
        .expect("Hinterlegen fehlgeschlagen");

    assert_eq!(record.room_id, room_id);
    assert!(record.mute_audio);
    assert!(!record.mute_video);

    let geladen = db
        .laden(record.ticket)
        .await
        .expect("Laden fehlgeschlagen")
        .expect("Checkpoint sollte existieren");
    assert_eq!(geladen.ticket, record.ticket);
    assert_eq!(geladen.display_name, "Aruzhan");
    assert_eq!(geladen.room_id, room_id);
}

#[tokio::test]
async fn zwei_checkpoints_pro_raum() {
    let db = db().await;
    let room_id = RoomId::generieren();

    let erste = db
        .hinterlegen(NeuerCheckpoint {
            room_id: &room_id,
            display_name: "Erste",
            mute_audio: false,
            mute_video: false,
        })
        .await
        .unwrap();
    let zweite = db
        .hinterlegen(NeuerCheckpoint {
            room_id: &room_id,
            display_name: "Zweite",
            mute_audio: false,
            mute_video: true,
        })
        .await
        .unwrap();

    // Tickets unterscheiden die beiden Nutzer desselben Raums
    assert_ne!(erste.ticket, zweite.ticket);

    let geladen = db.laden(zweite.ticket).await.unwrap().unwrap();
    assert_eq!(geladen.display_name, "Zweite");
}

#[tokio::test]
async fn entfernen_ist_idempotent() {
    let db = db().await;
    let room_id = RoomId::generieren();

    let record = db
        .hinterlegen(NeuerCheckpoint {
            room_id: &room_id,
            display_name: "Miras",
            mute_audio: false,
            mute_video: false,
        })
        .await
        .unwrap();

    assert!(db.entfernen(record.ticket).await.unwrap());
    assert!(!db.entfernen(record.ticket).await.unwrap());
    assert!(db.laden(record.ticket).await.unwrap().is_none());
}

#[tokio::test]
async fn unbekanntes_ticket_liefert_none() {
    let db = db().await;
    let geladen = db.laden(Uuid::new_v4()).await.unwrap();
    assert!(geladen.is_none());
}
