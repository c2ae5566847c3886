//! Distribution API interaction module
//!
//! This module provides the core functionality for talking to a JFrog
//! Distribution instance: credential resolution, the HTTP client, and the
//! endpoint builders used by the resource lifecycles.
//!
//! # Module Structure
//!
//! - [`auth`] - Credential resolution (flags, environment, config file)
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use distctl::client::DistClient;
//!
//! async fn example() -> Result<(), distctl::error::DistError> {
//!     let client = DistClient::new("https://myinstance.jfrog.io", "token")?;
//!     let url = client.permission_url("my-permission");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod http;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::DistError;
use auth::Credentials;
use http::HttpClient;

/// Main client for the Distribution API
#[derive(Clone)]
pub struct DistClient {
    http: HttpClient,
    base_url: String,
    access_token: String,
}

impl DistClient {
    /// Create a new client for the given platform URL and access token
    pub fn new(base_url: &str, access_token: &str) -> Result<Self, DistError> {
        // Parse up front so a malformed URL fails here, not on first request
        let parsed = Url::parse(base_url)?;

        Ok(Self {
            http: HttpClient::new()?,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    pub fn from_credentials(credentials: &Credentials) -> Result<Self, DistError> {
        Self::new(&credentials.url, &credentials.access_token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Distribution API endpoint builders
    // =========================================================================

    /// Build a Distribution API v1 URL
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/distribution/api/v1/{}", self.base_url, path)
    }

    /// Permission target URL, keyed by name
    pub fn permission_url(&self, name: &str) -> String {
        self.api_url(&format!(
            "security/permissions/{}",
            urlencoding::encode(name)
        ))
    }

    /// Release bundle collection URL (create)
    pub fn release_bundles_url(&self) -> String {
        self.api_url("release_bundle")
    }

    /// Release bundle URL, keyed by name and version
    pub fn release_bundle_url(&self, name: &str, version: &str) -> String {
        self.api_url(&format!(
            "release_bundle/{}/{}",
            urlencoding::encode(name),
            urlencoding::encode(version)
        ))
    }

    /// Signing key collection URL for a protocol (create)
    pub fn signing_keys_url(&self, protocol: &str) -> String {
        self.api_url(&format!("keys/{}", urlencoding::encode(protocol)))
    }

    /// Signing key URL, keyed by protocol and alias
    pub fn signing_key_url(&self, protocol: &str, alias: &str) -> String {
        self.api_url(&format!(
            "keys/{}/{}",
            urlencoding::encode(protocol),
            urlencoding::encode(alias)
        ))
    }

    /// Usage telemetry endpoint (Artifactory-side)
    pub fn usage_url(&self) -> String {
        format!("{}/artifactory/api/system/usage", self.base_url)
    }

    // =========================================================================
    // Typed verbs
    // =========================================================================

    /// GET a JSON resource
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DistError> {
        let value = self
            .http
            .send(Method::GET, url, &self.access_token, None, &[])
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST a JSON body and parse the JSON response
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<T, DistError> {
        self.send_json(Method::POST, url, body, headers).await
    }

    /// PUT a JSON body and parse the JSON response
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<T, DistError> {
        self.send_json(Method::PUT, url, body, headers).await
    }

    /// PUT a JSON body, ignoring any response body
    pub async fn put(
        &self,
        url: &str,
        body: &impl Serialize,
        headers: &[(&str, &str)],
    ) -> Result<(), DistError> {
        let body = serde_json::to_value(body)?;
        self.http
            .send(Method::PUT, url, &self.access_token, Some(&body), headers)
            .await?;
        Ok(())
    }

    /// DELETE a resource, ignoring any response body
    pub async fn delete(&self, url: &str) -> Result<(), DistError> {
        self.http
            .send(Method::DELETE, url, &self.access_token, None, &[])
            .await?;
        Ok(())
    }

    /// POST a JSON body, ignoring any response body. Used by telemetry.
    pub async fn post(&self, url: &str, body: &Value) -> Result<(), DistError> {
        self.http
            .send(Method::POST, url, &self.access_token, Some(body), &[])
            .await?;
        Ok(())
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<T, DistError> {
        let body = serde_json::to_value(body)?;
        let value = self
            .http
            .send(method, url, &self.access_token, Some(&body), headers)
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DistClient {
        DistClient::new("https://myinstance.jfrog.io/", "token").unwrap()
    }

    #[test]
    fn api_url_joins_without_double_slash() {
        assert_eq!(
            client().api_url("release_bundle"),
            "https://myinstance.jfrog.io/distribution/api/v1/release_bundle"
        );
    }

    #[test]
    fn permission_url_encodes_name() {
        assert_eq!(
            client().permission_url("my perm"),
            "https://myinstance.jfrog.io/distribution/api/v1/security/permissions/my%20perm"
        );
    }

    #[test]
    fn release_bundle_url_has_name_and_version() {
        assert_eq!(
            client().release_bundle_url("bundle", "1.0.0"),
            "https://myinstance.jfrog.io/distribution/api/v1/release_bundle/bundle/1.0.0"
        );
    }

    #[test]
    fn signing_key_urls() {
        assert_eq!(
            client().signing_keys_url("gpg"),
            "https://myinstance.jfrog.io/distribution/api/v1/keys/gpg"
        );
        assert_eq!(
            client().signing_key_url("gpg", "my-alias"),
            "https://myinstance.jfrog.io/distribution/api/v1/keys/gpg/my-alias"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(DistClient::new("not a url", "token").is_err());
    }
}
