//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port, backed by a
//! `MockAiProvider`, so endpoint tests go through HTTP end to end.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use pallas::PromptClientBuilder;
use pallas_server::{router, state::AppState};
use pallas_test_utils::MockAiProvider;
use reqwest::Client;
use std::{net::SocketAddr, time::Duration};
use tokio::{net::TcpListener, task::JoinHandle};

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock: MockAiProvider,
    pub app_state: AppState,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with the bundled catalog and the given mock provider.
    pub async fn spawn(mock: MockAiProvider) -> Result<Self> {
        Self::spawn_with_timeout(mock, Duration::from_secs(5)).await
    }

    pub async fn spawn_with_timeout(mock: MockAiProvider, timeout: Duration) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let prompt_client = PromptClientBuilder::new()
            .ai_provider(Box::new(mock.clone()))
            .timeout(timeout)
            .build()?;
        let app_state = AppState::new(prompt_client);
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock,
            app_state: app_state_for_harness,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
