//! Loopback callback server for the login flow
//!
//! Serves a single route, `/callback`, on an OS-assigned port. The first
//! request carrying a token fires a oneshot channel exactly once; the
//! sender sits behind a mutex so a duplicate valid request after completion
//! is answered politely instead of panicking. Shutdown is graceful and
//! idempotent: signalling it twice is a no-op.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use log::debug;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::{AuthError, Result};

const SUCCESS_BODY: &str = "Login successful! You may close this window.";
const MISSING_TOKEN_BODY: &str = "Missing token";

/// Shared handler state: the single-use completion slot
#[derive(Clone)]
struct CallbackState {
    token_tx: Arc<Mutex<Option<oneshot::Sender<String>>>>,
}

/// JSON body accepted on POST callbacks
#[derive(Debug, Deserialize)]
struct TokenBody {
    token: String,
}

/// The ephemeral loopback server owning the callback port for the duration
/// of one login flow.
#[derive(Debug)]
pub struct CallbackServer {
    addr: SocketAddr,
    token_rx: oneshot::Receiver<String>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl CallbackServer {
    /// Bind `127.0.0.1:0` and start serving `/callback`
    pub async fn bind() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(AuthError::Transport)?;
        let addr = listener.local_addr().map_err(AuthError::Transport)?;

        let (token_tx, token_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let state = CallbackState {
            token_tx: Arc::new(Mutex::new(Some(token_tx))),
        };
        let router = Router::new()
            .route("/callback", get(handle_callback).post(handle_callback))
            .with_state(state);

        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, router).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                debug!("callback server exited with error: {e}");
            }
        });

        Ok(Self {
            addr,
            token_rx,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }

    /// The bound loopback address
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Await the first valid token, then shut the listener down.
    ///
    /// This is the flow's single suspension point. Returns
    /// [`AuthError::Timeout`] when a bound is given and exceeded, and
    /// [`AuthError::Interrupted`] if the server task dies before a token
    /// arrives.
    pub async fn wait_for_token(mut self, timeout: Option<Duration>) -> Result<String> {
        let received = match timeout {
            Some(bound) => match tokio::time::timeout(bound, &mut self.token_rx).await {
                Ok(result) => result,
                Err(_) => {
                    self.shutdown().await;
                    return Err(AuthError::Timeout(bound.as_secs()).into());
                }
            },
            None => (&mut self.token_rx).await,
        };

        self.shutdown().await;

        match received {
            Ok(token) => Ok(token),
            Err(_) => Err(AuthError::Interrupted.into()),
        }
    }

    /// Stop accepting connections. Safe to call more than once.
    async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Wait for in-flight responses to flush so the port is actually
        // closed when we report success to the caller.
        if let Err(e) = (&mut self.task).await {
            if !e.is_cancelled() {
                debug!("callback server task failed: {e}");
            }
        }
    }
}

/// Handles both GET and POST callbacks. The token comes from the `token`
/// query parameter, or failing that from a JSON `{"token": ...}` body.
async fn handle_callback(
    State(state): State<CallbackState>,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> (StatusCode, &'static str) {
    let token = params
        .get("token")
        .filter(|t| !t.is_empty())
        .cloned()
        .or_else(|| {
            serde_json::from_str::<TokenBody>(&body)
                .ok()
                .map(|b| b.token)
                .filter(|t| !t.is_empty())
        });

    let Some(token) = token else {
        // Not fatal: the user can retry from the browser
        return (StatusCode::BAD_REQUEST, MISSING_TOKEN_BODY);
    };

    // First valid callback takes the sender; any later one finds the slot
    // empty and just gets the success page.
    let sender = state.token_tx.lock().expect("token slot poisoned").take();
    if let Some(tx) = sender {
        let _ = tx.send(token);
    }

    (StatusCode::OK, SUCCESS_BODY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_assigns_loopback_port() {
        let server = CallbackServer::bind().await.unwrap();
        let addr = server.local_addr();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_two_servers_get_distinct_ports() {
        let a = CallbackServer::bind().await.unwrap();
        let b = CallbackServer::bind().await.unwrap();
        assert_ne!(a.local_addr().port(), b.local_addr().port());
    }

    #[tokio::test]
    async fn test_empty_token_param_is_rejected() {
        let server = CallbackServer::bind().await.unwrap();
        let url = format!("http://{}/callback?token=", server.local_addr());

        let driver = tokio::spawn(async move {
            let response = reqwest::get(&url).await.unwrap();
            assert_eq!(response.status(), 400);

            let retry = format!("{}&token=real", url);
            let response = reqwest::get(&retry).await.unwrap();
            assert_eq!(response.status(), 200);
        });

        let token = server.wait_for_token(None).await.unwrap();
        assert_eq!(token, "real");
        driver.await.unwrap();
    }

    #[tokio::test]
    async fn test_query_param_wins_over_body() {
        let server = CallbackServer::bind().await.unwrap();
        let url = format!("http://{}/callback?token=from-query", server.local_addr());

        tokio::spawn(async move {
            reqwest::Client::new()
                .post(&url)
                .header("content-type", "application/json")
                .body(r#"{"token":"from-body"}"#)
                .send()
                .await
                .unwrap()
        });

        let token = server.wait_for_token(None).await.unwrap();
        assert_eq!(token, "from-query");
    }

    #[tokio::test]
    async fn test_malformed_json_body_is_rejected() {
        let server = CallbackServer::bind().await.unwrap();
        let url = format!("http://{}/callback", server.local_addr());

        let driver = tokio::spawn(async move {
            let response = reqwest::Client::new()
                .post(&url)
                .body("not json")
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 400);

            let response = reqwest::Client::new()
                .post(&url)
                .header("content-type", "application/json")
                .body(r#"{"token":"ok"}"#)
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 200);
        });

        let token = server.wait_for_token(None).await.unwrap();
        assert_eq!(token, "ok");
        driver.await.unwrap();
    }

    #[tokio::test]
    async fn test_success_body_text() {
        let server = CallbackServer::bind().await.unwrap();
        let url = format!("http://{}/callback?token=t", server.local_addr());

        let driver =
            tokio::spawn(async move { reqwest::get(&url).await.unwrap().text().await.unwrap() });

        server.wait_for_token(None).await.unwrap();
        assert_eq!(driver.await.unwrap(), SUCCESS_BODY);
    }
}
