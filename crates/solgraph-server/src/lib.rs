//! HTTP + WebSocket server for a resolved solution

pub mod router;
pub mod handlers;
pub mod websocket;

use std::sync::Arc;

use solgraph_core::SolutionReport;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};

use crate::websocket::WsMessage;

/// Capacity of the update channel; slower clients see `Lagged`.
const UPDATE_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 7890,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// State shared by every handler and the watcher.
pub struct ServerState {
    pub report: Arc<RwLock<SolutionReport>>,
    pub updates_tx: broadcast::Sender<String>,
}

impl ServerState {
    pub fn new(report: SolutionReport) -> Self {
        let (updates_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        ServerState {
            report: Arc::new(RwLock::new(report)),
            updates_tx,
        }
    }

    /// Send a raw message to every connected client.
    pub fn broadcast(&self, message: String) -> Result<usize, broadcast::error::SendError<String>> {
        self.updates_tx.send(message)
    }

    /// Replace the current report and push it to connected clients.
    pub async fn publish(&self, report: SolutionReport) -> anyhow::Result<()> {
        let message = serde_json::to_string(&WsMessage::ReportUpdated {
            report: report.clone(),
        })?;
        *self.report.write().await = report;

        match self.broadcast(message) {
            Ok(receivers) => debug!("Sent report update to {} clients", receivers),
            Err(_) => debug!("No clients connected, report update not sent"),
        }
        Ok(())
    }
}

pub struct SolgraphServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl SolgraphServer {
    pub fn new(report: SolutionReport, config: ServerConfig) -> Self {
        SolgraphServer {
            state: Arc::new(ServerState::new(report)),
            config,
        }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let app = router::create_router(Arc::clone(&self.state));
        let listener = tokio::net::TcpListener::bind(self.config.address()).await?;

        info!("Listening on http://{}", listener.local_addr()?);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_report() -> SolutionReport {
    use solgraph_core::{LevelReport, ProjectReport};

    SolutionReport {
        name: "Sample.sln".to_string(),
        path: "/repo/Sample.sln".to_string(),
        directory: Some("/repo".to_string()),
        project_count: 2,
        problems: Vec::new(),
        levels: vec![
            LevelReport {
                level: 1,
                projects: vec![ProjectReport {
                    name: "App".to_string(),
                    path: "/repo/App/App.csproj".to_string(),
                    depends_on: vec!["Core".to_string()],
                    referenced_by: Vec::new(),
                }],
            },
            LevelReport {
                level: 2,
                projects: vec![ProjectReport {
                    name: "Core".to_string(),
                    path: "/repo/Core/Core.csproj".to_string(),
                    depends_on: Vec::new(),
                    referenced_by: vec!["App".to_string()],
                }],
            },
        ],
        orphans: Vec::new(),
        unplaced: Vec::new(),
        generated_at: "2024-01-01T00:00:00+00:00".to_string(),
    }
}
