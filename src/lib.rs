//! Fantasy Premier League data as tables, without async.
//!
//! A synchronous layer over an asynchronous FPL API client that returns every
//! response as a [`Table`] indexed by its natural key (team id, player id,
//! fixture id, ...). Child collections such as a player's past seasons are
//! flattened into their own tables keyed by `(player_id, child key)`.
//!
//! ## Features
//!
//! - **No async at the call site**: [`FplTables`] runs the async client on a
//!   dedicated background thread and blocks until each call is done
//! - **Tables keyed by natural ids**: look rows up by `id`, `(player_id, fixture)`, ...
//! - **Pluggable API**: anything implementing [`FplApi`] can back the façade
//! - **User data**: current squad, chips and transfers after login
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fpl_tables::{Credentials, FplTables, PlayerId};
//!
//! # fn example() -> fpl_tables::Result<()> {
//! let fpl = FplTables::new(Credentials::from_env()?)?;
//!
//! let tables = fpl.get_player(PlayerId::new(1))?;
//! println!("{}", tables.history);
//!
//! let squad = fpl.get_user_team(None)?;
//! println!("{}", squad.picks);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export FPL_EMAIL=me@example.com
//! export FPL_PASSWORD=...
//! export FPL_USER_ID=91928   # optional, looked up after login otherwise
//! ```

pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod facade;
pub mod fpl;
pub mod frame;

// Re-export commonly used types
pub use cli::types::ids::{GameWeekId, PlayerId, TeamId, UserId};
pub use config::{ClientConfig, Credentials};
pub use error::{FplError, Result};
pub use facade::{FplTables, PlayerTables, UserTeamTables};
pub use fpl::{FplApi, FplClient};
pub use frame::Table;
