//! reqwest client for the FPL web API.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::api::FplApi;
use super::types::{
    is_entry_denied, player_id_of, retain_ids, BootstrapStatic, ElementSummary,
};
use crate::config::ClientConfig;
use crate::{FplError, GameWeekId, PlayerId, Result, TeamId, UserId};


const USER_AGENT: &str = concat!("fpl-tables/", env!("CARGO_PKG_VERSION"));

/// Form fields the account service expects besides the credentials.
const LOGIN_APP: &str = "plfpl-web";
const LOGIN_REDIRECT_URI: &str = "https://fantasy.premierleague.com/a/login";

/// Element summaries fetched at once by `get_players`.
const SUMMARY_CONCURRENCY: usize = 8;

/// Async FPL client. Keeps the login session in reqwest's cookie store.
#[derive(Debug)]
pub struct FplClient {
    http: Client,
    config: ClientConfig,
    logged_in: AtomicBool,
}

impl FplClient {
    /// Client for the endpoints in `FPL_API_URL` / `FPL_LOGIN_URL`, or the
    /// public service when those are unset.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            config,
            logged_in: AtomicBool::new(false),
        })
    }

    /// Client for an API rooted at `api_url` (e.g. a local mock server).
    pub fn with_base_url(api_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::default().with_api_url(api_url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn send(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        debug!(%url, "GET");
        Ok(self.http.get(&url).send().await?)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self
            .send(path)
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(value)
    }

    /// Fetch an entry-scoped endpoint, turning the "cannot view this entry"
    /// answer into [`FplError::EntryMismatch`].
    async fn fetch_entry(&self, path: &str) -> Result<Value> {
        if !self.is_logged_in() {
            return Err(FplError::NotLoggedIn);
        }

        let response = self.send(path).await?;
        let status_error = response.error_for_status_ref().err();
        let body = response.json::<Value>().await;

        if let Ok(value) = &body {
            if is_entry_denied(value) {
                return Err(FplError::EntryMismatch);
            }
        }
        if let Some(err) = status_error {
            return Err(err.into());
        }
        Ok(body?)
    }

    async fn bootstrap(&self) -> Result<BootstrapStatic> {
        self.fetch("bootstrap-static/").await
    }

    async fn element_summary(&self, id: PlayerId) -> Result<ElementSummary> {
        let response = self.send(&format!("element-summary/{id}/")).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(FplError::PlayerNotFound { id: id.as_u32() });
        }
        Ok(response.error_for_status()?.json().await?)
    }

    async fn with_summaries(&self, mut players: Vec<Value>) -> Result<Vec<Value>> {
        let ids = players
            .iter()
            .map(|p| player_id_of(p).ok_or_else(|| FplError::unexpected("player without id")))
            .collect::<Result<Vec<_>>>()?;

        let summaries: Vec<ElementSummary> = stream::iter(ids)
            .map(|id| self.element_summary(id))
            .buffered(SUMMARY_CONCURRENCY)
            .try_collect()
            .await?;

        for (player, summary) in players.iter_mut().zip(summaries) {
            summary.merge_into(player);
        }
        Ok(players)
    }
}

#[async_trait]
impl FplApi for FplClient {
    async fn get_teams(&self, ids: Option<Vec<TeamId>>) -> Result<Vec<Value>> {
        let bootstrap = self.bootstrap().await?;
        Ok(retain_ids(bootstrap.teams, ids.as_deref()))
    }

    async fn get_game_weeks(&self, ids: Option<Vec<GameWeekId>>) -> Result<Vec<Value>> {
        let bootstrap = self.bootstrap().await?;
        Ok(retain_ids(bootstrap.events, ids.as_deref()))
    }

    async fn get_player(&self, id: PlayerId, include_summary: bool) -> Result<Value> {
        let bootstrap = self.bootstrap().await?;
        let mut player = bootstrap
            .elements
            .into_iter()
            .find(|p| player_id_of(p) == Some(id))
            .ok_or(FplError::PlayerNotFound { id: id.as_u32() })?;

        if include_summary {
            self.element_summary(id).await?.merge_into(&mut player);
        }
        Ok(player)
    }

    async fn get_players(
        &self,
        ids: Option<Vec<PlayerId>>,
        include_summary: bool,
    ) -> Result<Vec<Value>> {
        let bootstrap = self.bootstrap().await?;
        let players = retain_ids(bootstrap.elements, ids.as_deref());
        debug!(count = players.len(), include_summary, "players selected");

        if include_summary {
            self.with_summaries(players).await
        } else {
            Ok(players)
        }
    }

    async fn get_fixtures(&self) -> Result<Vec<Value>> {
        self.fetch("fixtures/").await
    }

    async fn get_user_team(&self, user_id: UserId) -> Result<Value> {
        self.fetch_entry(&format!("my-team/{user_id}/")).await
    }

    async fn get_user_info(&self) -> Result<Value> {
        self.fetch_entry("me/").await
    }

    async fn login(&self, email: &str, password: &str) -> Result<()> {
        let form = [
            ("login", email),
            ("password", password),
            ("app", LOGIN_APP),
            ("redirect_uri", LOGIN_REDIRECT_URI),
        ];
        debug!(url = %self.config.login_url, "POST login");

        let response = self
            .http
            .post(&self.config.login_url)
            .form(&form)
            .send()
            .await?;

        let state = query_value(&response, "state");
        if state.as_deref() == Some("fail") {
            self.logged_in.store(false, Ordering::SeqCst);
            let reason = query_value(&response, "reason").unwrap_or_else(|| "unknown".to_string());
            warn!(%reason, "login rejected");
            return Err(FplError::LoginRejected { message: reason });
        }
        if !response.status().is_success() {
            self.logged_in.store(false, Ordering::SeqCst);
            return Err(FplError::LoginRejected {
                message: format!("login endpoint answered {}", response.status()),
            });
        }

        self.logged_in.store(true, Ordering::SeqCst);
        info!("logged in");
        Ok(())
    }
}

/// Query parameter of the final (post-redirect) response URL.
fn query_value(response: &Response, key: &str) -> Option<String> {
    response
        .url()
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
