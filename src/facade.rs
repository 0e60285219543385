//! Synchronous, table-returning façade over [`FplApi`].

use std::future::Future;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::debug;

use crate::bridge::Worker;
use crate::config::Credentials;
use crate::fpl::types::{MyTeam, UserProfile};
use crate::fpl::{FplApi, FplClient};
use crate::frame::Table;
use crate::{FplError, GameWeekId, PlayerId, Result, TeamId, UserId};


/// Child collections of a player record: field name and the natural key of
/// its rows.
const PLAYER_CHILDREN: [(&str, &str); 3] = [
    ("history_past", "season_name"),
    ("history", "fixture"),
    ("fixtures", "event"),
];

/// A player (or several) and the tables exploded from their summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTables {
    /// Indexed by `player_id`. The child collections are not kept as cells
    /// here; they are the three tables below.
    pub player: Table,
    /// Past seasons, indexed by `(player_id, season_name)`.
    pub history_past: Table,
    /// Completed games this season, indexed by `(player_id, fixture)`.
    pub history: Table,
    /// Upcoming fixtures, indexed by `(player_id, event)`.
    pub fixtures: Table,
}

impl PlayerTables {
    pub fn from_records(players: &[Value]) -> Result<Self> {
        let child_fields: Vec<&str> = PLAYER_CHILDREN.iter().map(|(f, _)| *f).collect();
        let player =
            Table::from_records(players, &["id"], &child_fields)?.rename_index("id", "player_id");

        let [history_past, history, fixtures] = PLAYER_CHILDREN
            .map(|(field, key)| Table::explode(players, "id", field, "player_id", key));

        Ok(Self {
            player,
            history_past: history_past?,
            history: history?,
            fixtures: fixtures?,
        })
    }
}

/// Picks, chips and transfer state of a manager's current squad.
#[derive(Debug, Clone, PartialEq)]
pub struct UserTeamTables {
    /// Indexed by `element` (the player id).
    pub picks: Table,
    pub chips: Table,
    /// Single row.
    pub transfers: Table,
}

impl UserTeamTables {
    pub fn from_team(team: MyTeam) -> Result<Self> {
        let transfers = match &team.transfers {
            Value::Null => Table::default(),
            transfers => Table::from_record(transfers, &[])?,
        };
        Ok(Self {
            picks: Table::from_records(&team.picks, &["element"], &[])?,
            chips: Table::from_records(&team.chips, &[], &[])?,
            transfers,
        })
    }
}

/// Blocking access to the FPL API with results shaped as [`Table`]s.
///
/// Owns one background thread running an async runtime; every method submits
/// its request there and waits for the answer, so calls never overlap even
/// when the façade is shared between threads. Do not call it from inside an
/// async runtime.
///
/// ```rust,no_run
/// use fpl_tables::{Credentials, FplTables};
///
/// # fn example() -> fpl_tables::Result<()> {
/// let fpl = FplTables::new(Credentials::default())?;
/// let teams = fpl.get_teams(None)?;
/// println!("{teams}");
/// # Ok(())
/// # }
/// ```
pub struct FplTables {
    worker: Worker,
    api: Arc<dyn FplApi>,
    credentials: Credentials,
    user_id: Arc<OnceCell<UserId>>,
}

impl FplTables {
    /// Façade over the real FPL service (see [`FplClient::new`]).
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_api(credentials, Arc::new(FplClient::new()?))
    }

    /// Façade over any [`FplApi`] implementation.
    pub fn with_api(credentials: Credentials, api: Arc<dyn FplApi>) -> Result<Self> {
        Ok(Self {
            worker: Worker::spawn()?,
            api,
            credentials,
            user_id: Arc::new(OnceCell::new()),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Replace the credentials. Does not log in; forgets any user id that was
    /// looked up for the previous account.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
        self.user_id = Arc::new(OnceCell::new());
    }

    fn call<F, Fut, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(Arc<dyn FplApi>) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        self.worker.run(op(Arc::clone(&self.api)))
    }

    /// Like `call`, but checks the credentials first and logs in on the
    /// worker before running `op`.
    fn call_logged_in<F, Fut, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(Arc<dyn FplApi>, Arc<OnceCell<UserId>>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let (email, password) = self.credentials.require_login()?;
        let api = Arc::clone(&self.api);
        let memo = Arc::clone(&self.user_id);

        self.worker.run(async move {
            api.login(&email, &password).await?;
            op(api, memo).await
        })
    }

    /// All teams, or those in `ids`, indexed by `id`. An empty `ids` means all.
    pub fn get_teams(&self, ids: Option<&[TeamId]>) -> Result<Table> {
        let ids = ids.map(<[TeamId]>::to_vec);
        debug!(?ids, "get_teams");
        let records = self.call(move |api| async move { api.get_teams(ids).await })?;
        Table::from_records(&records, &["id"], &[])
    }

    /// All game weeks, or those in `ids`, indexed by `id`. An empty `ids` means all.
    pub fn get_game_weeks(&self, ids: Option<&[GameWeekId]>) -> Result<Table> {
        let ids = ids.map(<[GameWeekId]>::to_vec);
        debug!(?ids, "get_game_weeks");
        let records = self.call(move |api| async move { api.get_game_weeks(ids).await })?;
        Table::from_records(&records, &["id"], &[])
    }

    /// One player with past seasons, played games and upcoming fixtures.
    pub fn get_player(&self, id: PlayerId) -> Result<PlayerTables> {
        debug!(%id, "get_player");
        let record = self.call(move |api| async move { api.get_player(id, true).await })?;
        PlayerTables::from_records(std::slice::from_ref(&record))
    }

    /// All players, or those in `ids`, with their summaries. An empty `ids`
    /// means all.
    pub fn get_players(&self, ids: Option<&[PlayerId]>) -> Result<PlayerTables> {
        let ids = ids.map(<[PlayerId]>::to_vec);
        debug!(?ids, "get_players");
        let records = self.call(move |api| async move { api.get_players(ids, true).await })?;
        PlayerTables::from_records(&records)
    }

    /// Every fixture of the season, indexed by `id`.
    pub fn get_fixtures(&self) -> Result<Table> {
        debug!("get_fixtures");
        let records = self.call(|api| async move { api.get_fixtures().await })?;
        Table::from_records(&records, &["id"], &[])
    }

    /// Current squad, chips and transfer state. Requires email and password.
    ///
    /// `user_id` defaults to the configured one, then to the id of the
    /// logged-in account.
    pub fn get_user_team(&self, user_id: Option<UserId>) -> Result<UserTeamTables> {
        let explicit = user_id.or(self.credentials.user_id);
        debug!(user_id = ?explicit, "get_user_team");

        let team = self.call_logged_in(move |api, memo| async move {
            let user_id = match explicit {
                Some(id) => id,
                None => resolve_user_id(api.as_ref(), &memo).await?,
            };
            api.get_user_team(user_id).await
        })?;

        UserTeamTables::from_team(serde_json::from_value(team)?)
    }

    /// Profile of the logged-in account as a one-row table. Requires email
    /// and password.
    pub fn get_user_info(&self) -> Result<Table> {
        debug!("get_user_info");
        let profile = self.call_logged_in(|api, memo| async move {
            let profile: UserProfile = serde_json::from_value(api.get_user_info().await?)?;
            if let Some(id) = profile.entry() {
                let _ = memo.set(id);
            }
            Ok::<_, FplError>(profile)
        })?;

        match &profile.player {
            Value::Null => Err(FplError::unexpected("user profile has no player")),
            player => Table::from_record(player, &[]),
        }
    }

    /// The user id: configured, or looked up once through the profile of the
    /// logged-in account and remembered.
    pub fn user_id(&self) -> Result<UserId> {
        if let Some(id) = self.credentials.user_id.or_else(|| self.user_id.get().copied()) {
            return Ok(id);
        }
        self.call_logged_in(|api, memo| async move { resolve_user_id(api.as_ref(), &memo).await })
    }
}

async fn resolve_user_id(api: &dyn FplApi, memo: &OnceCell<UserId>) -> Result<UserId> {
    if let Some(id) = memo.get() {
        return Ok(*id);
    }

    let profile: UserProfile = serde_json::from_value(api.get_user_info().await?)?;
    let id = profile.entry().ok_or(FplError::MissingUserId)?;
    debug!(%id, "resolved user id from profile");
    let _ = memo.set(id);
    Ok(id)
}
