//! tandem-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;

use anyhow::{Context, Result};
use config::ServerConfig;
use std::net::SocketAddr;
use tandem_db::{DatabaseConfig, SqliteDb};
use tandem_matching::{AblaufWaechter, Matcher};
use tandem_signaling::{SignalingConfig, SignalingServer, SignalingState};
use tokio::sync::watch;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen (Migrationen laufen dabei)
    /// 2. Matcher und Ablauf-Waechter starten
    /// 3. TCP-Listener starten (Signaling-Protokoll)
    /// 4. Auf Ctrl-C warten, dann alle Subsysteme herunterfahren
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            tcp = %self.config.tcp_bind_adresse(),
            "Server startet"
        );

        let db = SqliteDb::oeffnen(&DatabaseConfig {
            url: self.config.datenbank.url.clone(),
            max_verbindungen: self.config.datenbank.max_verbindungen,
            sqlite_wal: self.config.datenbank.sqlite_wal,
        })
        .await
        .context("Datenbankverbindung fehlgeschlagen")?;

        let matcher = Matcher::neu(db.clone(), &self.config.vermittlung);

        let signaling_config = SignalingConfig {
            max_clients: self.config.server.max_clients,
            keepalive_sek: self.config.netzwerk.keepalive_sek,
            verbindungs_timeout_sek: self.config.netzwerk.verbindungs_timeout_sek,
            max_raum_groesse: self.config.server.max_raum_groesse,
        };
        let state = SignalingState::neu(signaling_config, matcher.clone(), db);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Ablauf-Waechter fuer veraltete Warteeintraege
        let waechter = AblaufWaechter::neu(matcher, &self.config.vermittlung);
        let waechter_handle = tokio::spawn(waechter.laufen(shutdown_rx.clone()));

        let bind_addr: SocketAddr = self
            .config
            .tcp_bind_adresse()
            .parse()
            .context("Ungueltige Bind-Adresse")?;
        let signaling_server = SignalingServer::neu(state, bind_addr);

        let mut server_fut = std::pin::pin!(signaling_server.starten(shutdown_rx));

        tracing::info!("Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        tokio::select! {
            ergebnis = &mut server_fut => {
                ergebnis.context("Signaling-Server beendet sich mit Fehler")?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
                let _ = shutdown_tx.send(true);
                server_fut
                    .await
                    .context("Signaling-Server beendet sich mit Fehler")?;
            }
        }

        let _ = waechter_handle.await;
        tracing::info!("Server beendet");
        Ok(())
    }
}
