//! CLI argument definitions, parsing and table rendering.

pub mod types;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use types::ids::{GameWeekId, PlayerId, TeamId, UserId};

use crate::{Credentials, PlayerTables, Result, Table, UserTeamTables};

/// Account options for commands that need login. Each falls back to its
/// environment variable.
#[derive(Debug, Args)]
pub struct CredentialArgs {
    /// Login email (or set `FPL_EMAIL`).
    #[clap(long)]
    pub email: Option<String>,

    /// Login password (or set `FPL_PASSWORD`).
    #[clap(long)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerTable {
    Player,
    HistoryPast,
    History,
    Fixtures,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UserTeamTable {
    Picks,
    Chips,
    Transfers,
    All,
}

#[derive(Debug, Subcommand)]
pub enum GetCmd {
    /// Premier League teams, indexed by id.
    Teams {
        /// Only these team ids (repeatable): `--id 1 --id 14`.
        #[clap(long = "id")]
        ids: Vec<TeamId>,
    },

    /// Game weeks (events), indexed by id.
    GameWeeks {
        /// Only these game weeks (repeatable).
        #[clap(long = "id")]
        ids: Vec<GameWeekId>,
    },

    /// One player with history and upcoming fixtures.
    Player {
        /// Player id.
        id: PlayerId,

        /// Which of the player tables to print.
        #[clap(long, value_enum, default_value_t = PlayerTable::All)]
        table: PlayerTable,
    },

    /// All players, or the given ones, with history and upcoming fixtures.
    ///
    /// Fetches one summary per player; without `--id` this is several hundred
    /// requests.
    Players {
        /// Only these player ids (repeatable).
        #[clap(long = "id")]
        ids: Vec<PlayerId>,

        #[clap(long, value_enum, default_value_t = PlayerTable::Player)]
        table: PlayerTable,
    },

    /// All fixtures of the season, indexed by id.
    Fixtures,

    /// Current squad, chips and transfers of a manager (requires login).
    UserTeam {
        /// Entry id (or set `FPL_USER_ID`); looked up from the profile if absent.
        #[clap(long)]
        user_id: Option<UserId>,

        #[clap(long, value_enum, default_value_t = UserTeamTable::All)]
        table: UserTeamTable,

        #[clap(flatten)]
        credentials: CredentialArgs,
    },

    /// Profile of the logged-in account (requires login).
    UserInfo {
        #[clap(flatten)]
        credentials: CredentialArgs,
    },
}

#[derive(Debug, Parser)]
#[clap(name = "fpl-tables", about = "Fantasy Premier League data as tables")]
pub struct Fpl {
    /// Output tables as JSON records instead of text.
    #[clap(long, global = true)]
    pub json: bool,

    /// Log requests and worker activity to stderr.
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Get data from the Fantasy Premier League API
    Get {
        #[clap(subcommand)]
        cmd: GetCmd,
    },
}

impl CredentialArgs {
    /// Credentials from the environment, overridden by the flags given.
    pub fn resolve(&self, user_id: Option<UserId>) -> Result<Credentials> {
        Ok(Credentials::from_env()?.overridden_by(Credentials::new(
            user_id,
            self.email.clone(),
            self.password.clone(),
        )))
    }
}

impl GetCmd {
    /// Credentials the command runs with: flags and environment for the
    /// account commands, none for the public data.
    pub fn credentials(&self) -> Result<Credentials> {
        match self {
            GetCmd::UserTeam {
                user_id,
                credentials,
                ..
            } => credentials.resolve(*user_id),
            GetCmd::UserInfo { credentials } => credentials.resolve(None),
            _ => Ok(Credentials::default()),
        }
    }
}

pub fn select_player_tables(tables: &PlayerTables, which: PlayerTable) -> Vec<(&'static str, &Table)> {
    let all = [
        ("player", &tables.player),
        ("history_past", &tables.history_past),
        ("history", &tables.history),
        ("fixtures", &tables.fixtures),
    ];
    let wanted = match which {
        PlayerTable::All => return all.to_vec(),
        PlayerTable::Player => "player",
        PlayerTable::HistoryPast => "history_past",
        PlayerTable::History => "history",
        PlayerTable::Fixtures => "fixtures",
    };
    all.into_iter().filter(|(name, _)| *name == wanted).collect()
}

pub fn select_user_team_tables(
    tables: &UserTeamTables,
    which: UserTeamTable,
) -> Vec<(&'static str, &Table)> {
    let all = [
        ("picks", &tables.picks),
        ("chips", &tables.chips),
        ("transfers", &tables.transfers),
    ];
    let wanted = match which {
        UserTeamTable::All => return all.to_vec(),
        UserTeamTable::Picks => "picks",
        UserTeamTable::Chips => "chips",
        UserTeamTable::Transfers => "transfers",
    };
    all.into_iter().filter(|(name, _)| *name == wanted).collect()
}

/// Render named tables for the terminal.
///
/// A single table prints bare; several get a `== name ==` heading each. With
/// `json`, a single table is a JSON array of records and several are an object
/// keyed by table name.
pub fn render(tables: &[(&str, &Table)], json: bool) -> Result<String> {
    if json {
        let value = match tables {
            [(_, table)] => serde_json::to_value(table)?,
            _ => {
                let mut obj = Map::new();
                for (name, table) in tables {
                    obj.insert(name.to_string(), serde_json::to_value(table)?);
                }
                Value::Object(obj)
            }
        };
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut out = String::new();
    for (i, (name, table)) in tables.iter().enumerate() {
        if tables.len() > 1 {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("== {name} ({} rows) ==\n", table.len()));
        }
        out.push_str(&table.to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_tables() -> (Table, Table) {
        let teams = Table::from_records(
            &[json!({"id": 1, "name": "Arsenal"})],
            &["id"],
            &[],
        )
        .unwrap();
        let chips = Table::from_records(&[json!({"name": "wildcard"})], &[], &[]).unwrap();
        (teams, chips)
    }

    #[test]
    fn test_parse_get_teams_with_ids() {
        let app = Fpl::parse_from(["fpl-tables", "get", "teams", "--id", "1", "--id", "14", "--json"]);
        assert!(app.json);
        match app.command {
            Commands::Get {
                cmd: GetCmd::Teams { ids },
            } => assert_eq!(ids, vec![TeamId::new(1), TeamId::new(14)]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_player_defaults_to_all_tables() {
        let app = Fpl::parse_from(["fpl-tables", "get", "player", "233"]);
        match app.command {
            Commands::Get {
                cmd: GetCmd::Player { id, table },
            } => {
                assert_eq!(id, PlayerId::new(233));
                assert_eq!(table, PlayerTable::All);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_user_team_credentials() {
        let app = Fpl::parse_from([
            "fpl-tables",
            "get",
            "user-team",
            "--user-id",
            "91928",
            "--email",
            "me@example.com",
            "--table",
            "picks",
        ]);
        match app.command {
            Commands::Get {
                cmd:
                    GetCmd::UserTeam {
                        user_id,
                        table,
                        credentials,
                    },
            } => {
                assert_eq!(user_id, Some(UserId::new(91928)));
                assert_eq!(table, UserTeamTable::Picks);
                assert_eq!(credentials.email.as_deref(), Some("me@example.com"));
                assert_eq!(credentials.password, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_id() {
        assert!(Fpl::try_parse_from(["fpl-tables", "get", "player", "abc"]).is_err());
    }

    #[test]
    fn test_public_commands_need_no_credentials() {
        let app = Fpl::parse_from(["fpl-tables", "get", "fixtures"]);
        let Commands::Get { cmd } = app.command;

        assert_eq!(cmd.credentials().unwrap(), Credentials::default());
    }

    #[test]
    fn test_select_player_tables() {
        let empty = Table::default();
        let tables = PlayerTables {
            player: empty.clone(),
            history_past: empty.clone(),
            history: empty.clone(),
            fixtures: empty,
        };

        let names = |which| -> Vec<&'static str> {
            select_player_tables(&tables, which)
                .into_iter()
                .map(|(n, _)| n)
                .collect()
        };
        assert_eq!(names(PlayerTable::All).len(), 4);
        assert_eq!(names(PlayerTable::History), vec!["history"]);
    }

    #[test]
    fn test_render_single_table_text() {
        let (teams, _) = two_tables();
        let out = render(&[("teams", &teams)], false).unwrap();
        assert_eq!(out, "id  name\n1   Arsenal\n");
    }

    #[test]
    fn test_render_several_tables_text_has_headings() {
        let (teams, chips) = two_tables();
        let out = render(&[("teams", &teams), ("chips", &chips)], false).unwrap();
        assert!(out.starts_with("== teams (1 rows) ==\n"));
        assert!(out.contains("\n\n== chips (1 rows) ==\nname\nwildcard\n"));
    }

    #[test]
    fn test_render_json() {
        let (teams, chips) = two_tables();

        let single: Value = serde_json::from_str(&render(&[("teams", &teams)], true).unwrap()).unwrap();
        assert_eq!(single, json!([{"id": 1, "name": "Arsenal"}]));

        let several: Value =
            serde_json::from_str(&render(&[("teams", &teams), ("chips", &chips)], true).unwrap())
                .unwrap();
        assert_eq!(several["chips"], json!([{"name": "wildcard"}]));
    }
}
