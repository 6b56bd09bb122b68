//! API client for communicating with the Worth REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the point-of-sale backend: signing in, refreshing the
//! token pair after a 401, and the typed endpoint wrappers the register UI
//! calls.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{Credential, CredentialStore};
use crate::config::Config;
use crate::models::{
    BalanceTransactionRequest, CustomerAccount, CustomerDetail, CustomerHistory, NewCard,
    NewCustomer, RewardTransactionRequest,
};

use super::request::{Envelope, Request, RequestBody};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Sign-in endpoint; takes username + password, returns the session token
const SIGN_IN_PATH: &str = "/auth/sign-in";

/// Refresh endpoint; takes the refresh token, returns a new token pair
const REFRESH_PATH: &str = "/auth/refresh";

/// Response header carrying the session token on sign-in
const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Session cookie name with the secure prefix; preferred when present
const SECURE_SESSION_COOKIE: &str = "__Secure-worth-session";

/// Session cookie name without the secure prefix
const SESSION_COOKIE: &str = "worth-session";

/// API client for the Worth backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: Config,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Create a new API client over the given endpoint configuration and
    /// credential store.
    pub fn new(config: Config, credentials: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    /// Perform one logical exchange, refreshing the credential at most once.
    ///
    /// The request is sent with the latest stored access token. On a 401 the
    /// client runs the refresh sub-protocol and, if it succeeds, resends the
    /// request once with the new token; if it fails, the original 401
    /// envelope is returned unchanged. Statuses other than 401 are returned
    /// as-is; interpreting them is the caller's responsibility. Transport
    /// errors are never retried.
    ///
    /// Dropping the returned future leaves the credential store untouched:
    /// every store write happens only after the response that justified it
    /// has arrived.
    pub async fn execute(&self, request: &Request) -> Result<Envelope, ApiError> {
        let mut refresh_attempted = false;
        loop {
            let envelope = self.send(request).await?;
            if envelope.status == StatusCode::UNAUTHORIZED && !refresh_attempted {
                refresh_attempted = true;
                if self.refresh().await? {
                    debug!(path = %request.path(), "credential refreshed, retrying request");
                    continue;
                }
            }
            return Ok(envelope);
        }
    }

    /// Perform one logical exchange and decode the JSON body.
    ///
    /// Non-2xx statuses (after the single 401 refresh pass) become typed
    /// errors; decoding failures surface as [`ApiError::Decoding`].
    pub async fn fetch<R: DeserializeOwned>(&self, request: &Request) -> Result<R, ApiError> {
        let envelope = self.execute(request).await?;
        if !envelope.is_success() {
            return Err(ApiError::from_status(envelope.status, &envelope.body_text()));
        }
        envelope.decode()
    }

    /// Run the refresh sub-protocol: trade the stored refresh token for a
    /// new token pair.
    ///
    /// Returns `Ok(false)` without any network call when no refresh token is
    /// stored. A rejected or malformed refresh response also yields
    /// `Ok(false)`; refresh failure is non-fatal and the triggering request
    /// degrades to its original 401. Only credential-store failures while
    /// persisting a successful result are hard errors.
    pub async fn refresh(&self) -> Result<bool, ApiError> {
        let Some(refresh_token) = self.credentials.refresh_token()? else {
            debug!("no refresh token stored, skipping refresh");
            return Ok(false);
        };

        let request = Request::post(REFRESH_PATH).json(&RefreshRequest {
            refresh_token: &refresh_token,
        })?;
        let envelope = match self.send(&request).await {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(error = %err, "token refresh attempt failed to complete");
                return Ok(false);
            }
        };
        if !envelope.is_success() {
            warn!(status = %envelope.status, "token refresh rejected");
            return Ok(false);
        }

        let Ok(response) = serde_json::from_slice::<RefreshResponse>(&envelope.body) else {
            warn!("token refresh response did not decode");
            return Ok(false);
        };
        match (response.access_token, response.refresh_token) {
            (Some(access), Some(refresh)) => {
                self.credentials.store_pair(&access, &refresh)?;
                debug!("token pair refreshed");
                Ok(true)
            }
            _ => {
                warn!("token refresh response missing token pair");
                Ok(false)
            }
        }
    }

    /// Sign in with username and password, storing the resulting credential.
    ///
    /// The username is lowercased before sending. The access token is taken
    /// from the first source that yields one: the dedicated response header,
    /// the secure-prefixed session cookie, the unprefixed session cookie,
    /// then the JSON body. A refresh token is only ever carried in the body;
    /// when present it is stored together with the access token.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Credential, ApiError> {
        let username = username.to_lowercase();
        let request = Request::post(SIGN_IN_PATH).json(&SignInRequest {
            username: &username,
            password,
        })?;

        let envelope = self.send(&request).await?;
        if !envelope.is_success() {
            return Err(ApiError::InvalidResponse(format!(
                "sign-in returned status {}",
                envelope.status
            )));
        }

        let body: Option<SignInBody> = serde_json::from_slice(&envelope.body).ok();
        let access_token = session_token_from_headers(&envelope.headers)
            .or_else(|| body.as_ref().and_then(|body| body.access_token.clone()))
            .ok_or(ApiError::MissingToken)?;
        let refresh_token = body.and_then(|body| body.refresh_token);

        match refresh_token.as_deref() {
            Some(refresh) => self.credentials.store_pair(&access_token, refresh)?,
            None => self.credentials.set_access_token(&access_token)?,
        }
        debug!(has_refresh = refresh_token.is_some(), "signed in");

        Ok(Credential {
            access_token,
            refresh_token,
        })
    }

    /// Clear the stored credential.
    pub fn sign_out(&self) -> Result<(), ApiError> {
        self.credentials.clear()?;
        Ok(())
    }

    /// Send a request exactly once, attaching the latest stored access token.
    async fn send(&self, request: &Request) -> Result<Envelope, ApiError> {
        let url = request_url(&self.config, &request.path, &request.query)?;
        let mut builder = self.http.request(request.method.clone(), url);
        if let RequestBody::Json(value) = &request.body {
            builder = builder.json(value);
        }
        if let Some(token) = self.credentials.access_token()? {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        debug!(%status, path = %request.path, "response received");

        Ok(Envelope {
            status,
            headers,
            body,
        })
    }

    // ===== Endpoint Wrappers =====

    /// Search customers by name, phone, card number, or `@id`
    pub async fn search_customers(&self, query: &str) -> Result<Vec<CustomerDetail>, ApiError> {
        let request = Request::get("/search").query("q", query);
        self.fetch(&request).await
    }

    /// Create a customer record, returning the new account id
    pub async fn create_customer(
        &self,
        customer: &NewCustomer,
    ) -> Result<CustomerAccount, ApiError> {
        let request = Request::post("/customer").json(customer)?;
        self.fetch(&request).await
    }

    /// Register a loyalty card, returning the owning account id
    pub async fn create_card(&self, card: &NewCard) -> Result<CustomerAccount, ApiError> {
        let request = Request::post("/card").json(card)?;
        self.fetch(&request).await
    }

    /// Credit or debit a customer's cash balance
    pub async fn submit_balance_transaction(
        &self,
        transaction: &BalanceTransactionRequest,
    ) -> Result<CustomerDetail, ApiError> {
        let request = Request::post("/transaction").json(transaction)?;
        self.fetch(&request).await
    }

    /// Redeem reward points against a customer's balance
    pub async fn redeem_reward(
        &self,
        transaction: &RewardTransactionRequest,
    ) -> Result<CustomerDetail, ApiError> {
        let request = Request::post("/transaction/reward").json(transaction)?;
        self.fetch(&request).await
    }

    /// Fetch a customer's credit and reward transaction history
    pub async fn customer_history(&self, customer_id: u64) -> Result<CustomerHistory, ApiError> {
        let request = Request::get(format!("/customer/{customer_id}/history"));
        self.fetch(&request).await
    }
}

/// Build the target URL from the fixed endpoint configuration plus the
/// request path (normalized to begin with `/`) and its query parameters
/// (omitted entirely when empty).
fn request_url(
    config: &Config,
    path: &str,
    query: &[(String, String)],
) -> Result<Url, ApiError> {
    let origin = match config.port {
        Some(port) => format!("{}://{}:{}", config.scheme, config.host, port),
        None => format!("{}://{}", config.scheme, config.host),
    };
    let mut url =
        Url::parse(&origin).map_err(|err| ApiError::BadUrl(format!("{origin}: {err}")))?;

    let mut full_path =
        String::with_capacity(config.base_path.len() + path.len() + 1);
    full_path.push_str(&config.base_path);
    if !path.starts_with('/') {
        full_path.push('/');
    }
    full_path.push_str(path);
    url.set_path(&full_path);

    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(name, value)| (name.as_str(), value.as_str())));
    }
    Ok(url)
}

/// Extract the session token from a sign-in response's headers: the
/// dedicated header first, then the session cookie, preferring the
/// secure-prefixed cookie name over the unprefixed one. All `Set-Cookie`
/// occurrences are scanned and cookie names compared case-insensitively.
fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        return Some(token.to_string());
    }
    cookie_value(headers, SECURE_SESSION_COOKIE).or_else(|| cookie_value(headers, SESSION_COOKIE))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            // Only the name=value segment matters; attributes follow the ';'.
            let (cookie_name, value) = cookie.split(';').next()?.split_once('=')?;
            cookie_name
                .trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
}

// Internal wire types for the auth endpoints

#[derive(Serialize)]
struct SignInRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SignInBody {
    #[serde(rename = "accessToken", alias = "token")]
    access_token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
}
