//! Thin `reqwest` wrapper carrying base URL, timeout and credentials.

use super::BackendError;
use crate::config::BackendConfig;
use reqwest::{Method, RequestBuilder, Response, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};

/// Shared HTTP client for the backend REST API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl BackendClient {
    /// Builds a client from backend settings.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Transport`] when the underlying client cannot
    /// be constructed (for example, TLS initialisation failure).
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("homestead/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim().trim_end_matches('/').to_owned(),
            api_token: config.api_token.clone(),
        })
    }

    /// Returns the normalised base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Starts a request with credentials attached.
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        if let Some(token) = &self.api_token {
            return builder.bearer_auth(token);
        }
        builder
    }

    /// Sends a prepared request and checks the response status.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on transport failure or non-success status.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder.send().await?;
        check_response(response).await
    }

    /// Issues a `GET` and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on transport failure, non-success status, or
    /// an undecodable body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        tracing::debug!(path, "backend GET");
        let response = self
            .execute(self.request(Method::GET, path).query(query))
            .await?;
        Ok(response.json().await?)
    }

    /// Sends a JSON body and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on transport failure, non-success status, or
    /// an undecodable body.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(%method, path, "backend request");
        let response = self.execute(self.request(method, path).json(body)).await?;
        Ok(response.json().await?)
    }

    /// Sends a request whose response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on transport failure or non-success status.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(), BackendError> {
        tracing::debug!(%method, path, "backend request");
        let mut builder = self.request(method, path);
        if let Some(json) = body {
            builder = builder.json(json);
        }
        self.execute(builder).await?;
        Ok(())
    }

    /// Posts a multipart form and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on transport failure, non-success status, or
    /// an undecodable body.
    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, BackendError> {
        tracing::debug!(path, "backend multipart upload");
        let response = self
            .execute(self.request(Method::POST, path).multipart(form))
            .await?;
        Ok(response.json().await?)
    }
}

/// Converts a non-success response into a [`BackendError`].
///
/// # Errors
///
/// Returns the mapped [`BackendError`] when the status is not 2xx.
pub async fn check_response(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = BackendError::from_status(status.as_u16(), &body);
    tracing::warn!(status = status.as_u16(), error = %err, "backend returned an error");
    Err(err)
}
