//! Browser-based token login
//!
//! `snapshell login` never asks the user to paste a secret into the
//! terminal. Instead it binds an ephemeral loopback HTTP server, sends the
//! browser to `<api>/api/token?callback=<local url>`, and waits for the web
//! app to deliver the token back to the callback endpoint. The wait is a
//! single-use handoff: a oneshot channel fired by the first valid callback,
//! after which the server is shut down and stops accepting connections.
//!
//! Requests without a token get a 400 and the server keeps listening, so a
//! browser preflight or a stray refresh never wedges the flow.

mod browser;
mod server;

use std::time::Duration;

use colored::Colorize;
use log::debug;
use url::Url;

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};

use server::CallbackServer;

/// A login flow that has bound its callback server but not yet received a
/// token. At most one exists per invocation; consumed by [`finish`].
///
/// [`finish`]: PendingLogin::finish
#[derive(Debug)]
pub struct PendingLogin {
    api_url: String,
    authorize_url: Url,
    server: CallbackServer,
}

impl PendingLogin {
    /// The URL the user's browser must visit to approve the login
    pub fn authorize_url(&self) -> &Url {
        &self.authorize_url
    }

    /// The loopback URL the web app will deliver the token to
    pub fn callback_url(&self) -> String {
        format!("http://{}/callback", self.server.local_addr())
    }

    /// Block until the callback delivers a token, then shut the server down
    /// and return the new credential.
    ///
    /// With `timeout` set, an exchange that does not complete in time fails
    /// with [`AuthError::Timeout`]; without one the wait is unbounded and
    /// only process interruption cancels it.
    pub async fn finish(self, timeout: Option<Duration>) -> Result<AuthConfig> {
        let token = self.server.wait_for_token(timeout).await?;
        debug!("received token via callback");

        Ok(AuthConfig {
            token,
            api_url: self.api_url,
        })
    }
}

/// Bind the callback server and construct the authorization URL.
///
/// Failing to bind the loopback listener is fatal and happens before any
/// browser interaction.
pub async fn begin_login(api_url: &str) -> Result<PendingLogin> {
    let server = CallbackServer::bind().await?;
    let callback_url = format!("http://{}/callback", server.local_addr());
    debug!("callback server listening on {}", server.local_addr());

    let mut authorize_url = Url::parse(&format!("{}/api/token", api_url.trim_end_matches('/')))
        .map_err(|e| AuthError::InvalidApiUrl {
            url: api_url.to_string(),
            reason: e.to_string(),
        })?;
    authorize_url
        .query_pairs_mut()
        .append_pair("callback", &callback_url);

    Ok(PendingLogin {
        api_url: api_url.to_string(),
        authorize_url,
        server,
    })
}

/// Run the full browser login flow against `api_url` and return the new
/// credential. Persisting it is the caller's job.
pub async fn perform_login(api_url: &str, timeout: Option<Duration>) -> Result<AuthConfig> {
    let pending = begin_login(api_url).await?;

    println!("Opening browser to complete login:");
    println!("  {}", pending.authorize_url().as_str().cyan());
    println!("If the browser doesn't open automatically, please visit the URL above.");

    // Best-effort: a machine without a browser still completes the flow by
    // manual navigation.
    if let Err(e) = browser::open(pending.authorize_url().as_str()) {
        eprintln!(
            "{} Could not open browser automatically: {}",
            "!".yellow(),
            e
        );
    }

    pending.finish(timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_completes_on_token_query_param() {
        let pending = begin_login("https://snapshell.dev").await.unwrap();
        let callback = pending.callback_url();

        let poster = tokio::spawn(async move {
            reqwest::get(format!("{callback}?token=abc"))
                .await
                .unwrap()
        });

        let credential = pending.finish(None).await.unwrap();
        assert_eq!(credential.token, "abc");
        assert_eq!(credential.api_url, "https://snapshell.dev");

        let response = poster.await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_login_completes_on_json_body() {
        let pending = begin_login("https://snapshell.dev").await.unwrap();
        let callback = pending.callback_url();

        tokio::spawn(async move {
            reqwest::Client::new()
                .post(&callback)
                .header("content-type", "application/json")
                .body(r#"{"token":"from-body"}"#)
                .send()
                .await
                .unwrap()
        });

        let credential = pending.finish(None).await.unwrap();
        assert_eq!(credential.token, "from-body");
    }

    #[tokio::test]
    async fn test_tokenless_callback_keeps_listening() {
        let pending = begin_login("https://snapshell.dev").await.unwrap();
        let callback = pending.callback_url();

        let driver = tokio::spawn(async move {
            // First request carries no token: rejected, flow stays open
            let bad = reqwest::get(&callback).await.unwrap();
            assert_eq!(bad.status(), 400);

            // A valid retry still succeeds
            let good = reqwest::get(format!("{callback}?token=retry-ok"))
                .await
                .unwrap();
            assert_eq!(good.status(), 200);
        });

        let credential = pending.finish(None).await.unwrap();
        assert_eq!(credential.token, "retry-ok");
        driver.await.unwrap();
    }

    #[tokio::test]
    async fn test_listener_closed_after_completion() {
        let pending = begin_login("https://snapshell.dev").await.unwrap();
        let callback = pending.callback_url();

        let post_login = callback.clone();
        tokio::spawn(async move {
            reqwest::get(format!("{callback}?token=abc"))
                .await
                .unwrap()
        });

        pending.finish(None).await.unwrap();

        // The ephemeral port no longer accepts connections
        let late = reqwest::Client::new().get(&post_login).send().await;
        assert!(late.is_err());
    }

    // Timeout support is an improvement over the original unbounded wait,
    // not a behavior change: without --timeout the flow still blocks until
    // a token arrives.
    #[tokio::test]
    async fn test_timeout_without_callback() {
        let pending = begin_login("https://snapshell.dev").await.unwrap();

        let err = pending
            .finish(Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Auth(AuthError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_authorize_url_embeds_encoded_callback() {
        let pending = begin_login("https://snapshell.dev/").await.unwrap();
        let url = pending.authorize_url();

        assert!(url.as_str().starts_with("https://snapshell.dev/api/token?"));
        let encoded = url.query().unwrap();
        assert!(encoded.contains("callback=http%3A%2F%2F127.0.0.1%3A"));
    }

    #[tokio::test]
    async fn test_begin_login_rejects_bad_api_url() {
        let err = begin_login("not a url").await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Auth(AuthError::InvalidApiUrl { .. })
        ));
    }
}
