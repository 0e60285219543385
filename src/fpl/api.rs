use async_trait::async_trait;
use serde_json::Value;

use crate::{GameWeekId, PlayerId, Result, TeamId, UserId};

/// Asynchronous Fantasy Premier League API.
///
/// [`crate::fpl::http::FplClient`] talks to the real service. The façade only
/// depends on this trait, so tests and callers can plug in their own source.
/// Every operation returns the raw JSON records; shaping them into tables is
/// the façade's job.
#[async_trait]
pub trait FplApi: Send + Sync {
    /// All teams, or only those in `ids`. `None` and an empty list mean all.
    async fn get_teams(&self, ids: Option<Vec<TeamId>>) -> Result<Vec<Value>>;

    /// All game weeks, or only those in `ids`. `None` and an empty list mean all.
    async fn get_game_weeks(&self, ids: Option<Vec<GameWeekId>>) -> Result<Vec<Value>>;

    /// One player. With `include_summary` the record also carries
    /// `history_past`, `history` and `fixtures`.
    async fn get_player(&self, id: PlayerId, include_summary: bool) -> Result<Value>;

    async fn get_players(
        &self,
        ids: Option<Vec<PlayerId>>,
        include_summary: bool,
    ) -> Result<Vec<Value>>;

    async fn get_fixtures(&self) -> Result<Vec<Value>>;

    /// Current picks, chips and transfer state. Requires login.
    async fn get_user_team(&self, user_id: UserId) -> Result<Value>;

    /// Profile of the logged-in user. Requires login.
    async fn get_user_info(&self) -> Result<Value>;

    async fn login(&self, email: &str, password: &str) -> Result<()>;
}
