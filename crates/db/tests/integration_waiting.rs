//! Integrationstests fuer die Warteliste (In-Memory-SQLite)

use chrono::{Duration, Utc};
use tandem_core::{Language, RoomId};
use tandem_db::models::NeuerWartender;
use tandem_db::{SqliteDb, WaitingRepository};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory-Datenbank konnte nicht erstellt werden")
}

fn wartender<'a>(room_id: &'a RoomId, name: &'a str, language: Language, level: u8) -> NeuerWartender<'a> {
    NeuerWartender {
        room_id,
        display_name: name,
        language,
        level,
    }
}

#[tokio::test]
async fn eintragen_und_konsumieren() {
    let db = db().await;
    let room_id = RoomId::generieren();

    db.eintragen(wartender(&room_id, "Aigerim", Language::Kaz, 2))
        .await
        .expect("Eintragen fehlgeschlagen");

    let stichtag = Utc::now() - Duration::minutes(5);
    let gefunden = db
        .passenden_konsumieren(Language::Kaz, 2, stichtag)
        .await
        .expect("Konsumieren fehlgeschlagen")
        .expect("Eintrag sollte gefunden werden");

    assert_eq!(gefunden.room_id, room_id);
    assert_eq!(gefunden.display_name, "Aigerim");
    assert_eq!(gefunden.language, Language::Kaz);
    assert_eq!(gefunden.level, 2);

    // Konsumieren entfernt den Eintrag
    let leer = db
        .passenden_konsumieren(Language::Kaz, 2, stichtag)
        .await
        .expect("Konsumieren fehlgeschlagen");
    assert!(leer.is_none());
    assert_eq!(db.anzahl().await.unwrap(), 0);
}

#[tokio::test]
async fn konsumieren_beachtet_sprache_und_level() {
    let db = db().await;
    let stichtag = Utc::now() - Duration::minutes(5);

    let r1 = RoomId::generieren();
    db.eintragen(wartender(&r1, "Dana", Language::Eng, 1))
        .await
        .unwrap();

    // Falsche Sprache
    assert!(db
        .passenden_konsumieren(Language::Kaz, 1, stichtag)
        .await
        .unwrap()
        .is_none());

    // Falsches Level
    assert!(db
        .passenden_konsumieren(Language::Eng, 3, stichtag)
        .await
        .unwrap()
        .is_none());

    // Exakte Uebereinstimmung
    assert!(db
        .passenden_konsumieren(Language::Eng, 1, stichtag)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn konsumieren_nimmt_aeltesten_eintrag() {
    let db = db().await;
    let stichtag = Utc::now() - Duration::minutes(5);

    let erster = RoomId::generieren();
    db.eintragen(wartender(&erster, "Alt", Language::Kaz, 1))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let zweiter = RoomId::generieren();
    db.eintragen(wartender(&zweiter, "Neu", Language::Kaz, 1))
        .await
        .unwrap();

    let gefunden = db
        .passenden_konsumieren(Language::Kaz, 1, stichtag)
        .await
        .unwrap()
        .expect("Eintrag sollte gefunden werden");
    assert_eq!(gefunden.room_id, erster);
}

#[tokio::test]
async fn abgelaufene_eintraege_werden_ignoriert_und_entfernt() {
    let db = db().await;
    let room_id = RoomId::generieren();
    db.eintragen(wartender(&room_id, "Saule", Language::Kaz, 2))
        .await
        .unwrap();

    // Stichtag in der Zukunft: der frische Eintrag gilt als abgelaufen
    let zukunft = Utc::now() + Duration::minutes(1);
    assert!(db
        .passenden_konsumieren(Language::Kaz, 2, zukunft)
        .await
        .unwrap()
        .is_none());
    // Der Eintrag liegt aber noch in der Tabelle
    assert_eq!(db.anzahl().await.unwrap(), 1);

    let entfernt = db.abgelaufene_entfernen(zukunft).await.unwrap();
    assert_eq!(entfernt, 1);
    assert_eq!(db.anzahl().await.unwrap(), 0);
}

#[tokio::test]
async fn doppelte_room_id_wird_abgelehnt() {
    let db = db().await;
    let room_id = RoomId::generieren();
    db.eintragen(wartender(&room_id, "Erste", Language::Eng, 2))
        .await
        .unwrap();

    let ergebnis = db
        .eintragen(wartender(&room_id, "Zweite", Language::Eng, 2))
        .await;
    assert!(ergebnis.is_err());
}
