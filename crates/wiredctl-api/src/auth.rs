use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::types::TokenResponse;

/// Path of the token endpoint, relative to the controller root.
pub const TOKEN_PATH: &str = "dna/system/api/v1/auth/token";

/// Username/password pair exchanged for an `X-Auth-Token`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Exchange basic-auth credentials for a session token.
///
/// The controller answers `{"Token": "..."}` on success and 401 on bad
/// credentials. The token is returned wrapped so it never hits a log line.
pub async fn fetch_token(
    http: &reqwest::Client,
    base_url: &Url,
    credentials: &Credentials,
) -> Result<SecretString, Error> {
    let url = base_url.join(TOKEN_PATH)?;
    debug!("POST {url}");

    let resp = http
        .post(url)
        .basic_auth(
            &credentials.username,
            Some(credentials.password.expose_secret()),
        )
        .send()
        .await?;

    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Authentication {
            message: format!("controller rejected credentials for '{}'", credentials.username),
        });
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Authentication {
            message: format!("HTTP {status}: {}", crate::client::preview(&body)),
        });
    }

    let body = resp.text().await?;
    let token: TokenResponse = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("token response: {e}"),
        body: body.clone(),
    })?;

    Ok(SecretString::from(token.token))
}
