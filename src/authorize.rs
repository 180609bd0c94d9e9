use std::time::Instant;

use log::debug;
use reqwest::blocking::{Client, Request, RequestBuilder};
use serde::Deserialize;
use thiserror::Error;

use crate::authorization_endpoint;

/// Seconds shaved off the advertised lifetime so a token is never used right
/// at its expiry.
const EXPIRY_MARGIN_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        ClientCredentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    fn access_token_request(&self, client: &Client) -> Result<Request, AuthorizeError> {
        Ok(client
            .post(authorization_endpoint!("/api/token"))
            .form(&[("grant_type", "client_credentials")])
            .basic_auth(self.client_id.as_str(), Some(self.client_secret.as_str()))
            .build()?)
    }
}

#[derive(Debug, Deserialize)]
pub struct Access {
    access_token: String,
    token_type: String,
    expires_in: u64,
    #[serde(skip, default = "Instant::now")]
    received_at: Instant,
}

impl Access {
    pub fn is_expired(&self) -> bool {
        self.received_at.elapsed().as_secs() + EXPIRY_MARGIN_SECS > self.expires_in
    }

    pub fn authorize(&self, request_builder: RequestBuilder) -> RequestBuilder {
        request_builder.bearer_auth(self.access_token.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AuthorizeError {
    #[error("Request error: {0}")]
    RequestError(reqwest::Error),
    #[error("Unexpected token type \"{0}\".")]
    UnexpectedTokenType(String),
}

impl From<reqwest::Error> for AuthorizeError {
    fn from(err: reqwest::Error) -> Self {
        AuthorizeError::RequestError(err)
    }
}

/// Returns `old_access` while it is still valid, otherwise requests a new
/// token with the client-credentials grant.
pub fn try_get_access_token(
    client: &Client,
    credentials: &ClientCredentials,
    old_access: Option<Access>,
) -> Result<Access, AuthorizeError> {
    if let Some(access) = old_access {
        if !access.is_expired() {
            return Ok(access);
        }
        debug!("Access token expired, requesting a new one");
    }
    let request = credentials.access_token_request(client)?;
    let resp = client.execute(request)?.error_for_status()?;
    let access = resp.json::<Access>()?;
    if !access.token_type.eq_ignore_ascii_case("bearer") {
        return Err(AuthorizeError::UnexpectedTokenType(access.token_type));
    }
    debug!("Received access token valid for {}s", access.expires_in);
    Ok(access)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access(expires_in: u64) -> Access {
        serde_json::from_str(&format!(
            r#"{{"access_token":"token","token_type":"Bearer","expires_in":{expires_in}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn fresh_token_is_valid() {
        assert!(!access(3600).is_expired());
    }

    #[test]
    fn short_lived_token_counts_as_expired() {
        assert!(access(EXPIRY_MARGIN_SECS - 1).is_expired());
    }

    #[test]
    fn valid_token_is_reused_without_a_request() {
        let client = Client::new();
        let credentials = ClientCredentials::new("id", "secret");
        let reused = try_get_access_token(&client, &credentials, Some(access(3600))).unwrap();
        assert_eq!(reused.access_token, "token");
    }

    #[test]
    fn token_request_uses_basic_auth_and_form() {
        let client = Client::new();
        let request = ClientCredentials::new("id", "secret")
            .access_token_request(&client)
            .unwrap();
        assert_eq!(request.url().as_str(), "https://accounts.spotify.com/api/token");
        assert!(request.headers().contains_key(reqwest::header::AUTHORIZATION));
        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
    }
}
