// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with bearer authentication and fault classification.

use calsync_core::{Fault, RemoteError};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::config::GoogleConfig;
use crate::error::GoogleError;
use crate::types::TokenResponse;

/// HTTP client for Calendar v3 calls.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: GoogleConfig,
    token: RwLock<Option<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: GoogleConfig) -> Result<Self, GoogleError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        let token = RwLock::new(config.auth.access_token.clone().filter(|t| !t.is_empty()));
        Ok(Self {
            client,
            config,
            token,
        })
    }

    /// Builds a request carrying the current bearer token, if any.
    ///
    /// Without a token the remote answers 401, which triggers a refresh.
    pub async fn build_request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.client.request(method, url);
        match self.token.read().await.as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Sends a request and classifies any failure.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] tagged with the fault class of the failure.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, RemoteError> {
        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());
        let fault = classify(status, &text);
        tracing::debug!(%status, ?fault, body = %text, "request failed");
        Err(RemoteError::new(fault, format!("{status}: {text}")))
    }

    /// Sends a request and decodes a JSON response body.
    ///
    /// # Errors
    ///
    /// Returns the classified failure, or `Rejected` if the body cannot be decoded.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let resp = self.execute(req).await?;
        let text = resp.text().await.map_err(transport_error)?;
        serde_json::from_str(&text)
            .map_err(|e| GoogleError::InvalidResponse(e.to_string()).into())
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthExpired` when no refresh token is configured, otherwise the
    /// classified failure of the token endpoint.
    pub async fn refresh_token(&self) -> Result<(), RemoteError> {
        let auth = &self.config.auth;
        if auth.refresh_token.is_empty() {
            return Err(RemoteError::new(
                Fault::AuthExpired,
                "no refresh token configured",
            ));
        }

        let req = self.client.post(&self.config.token_url).form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", auth.refresh_token.as_str()),
            ("client_id", auth.client_id.as_str()),
            ("client_secret", auth.client_secret.as_str()),
        ]);
        let token: TokenResponse = self.execute_json(req).await?;
        tracing::info!(expires_in = ?token.expires_in, "refreshed access token");
        *self.token.write().await = Some(token.access_token);
        Ok(())
    }
}

/// Maps a non-success status to a fault class.
#[must_use]
pub fn classify(status: StatusCode, body: &str) -> Fault {
    match status {
        StatusCode::UNAUTHORIZED => Fault::AuthExpired,
        StatusCode::TOO_MANY_REQUESTS => Fault::RateLimited,
        StatusCode::FORBIDDEN
            if body.contains("rateLimitExceeded") || body.contains("userRateLimitExceeded") =>
        {
            Fault::RateLimited
        }
        StatusCode::NOT_FOUND | StatusCode::GONE => Fault::NotFound,
        s if s.is_server_error() => Fault::Unavailable,
        _ => Fault::Rejected,
    }
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    let fault = if e.is_builder() {
        Fault::Rejected
    } else {
        Fault::Unavailable
    };
    RemoteError::new(fault, e.to_string())
}
