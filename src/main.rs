//! Entry point: parse CLI and print the requested tables.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use fpl_tables::{
    cli::{render, select_player_tables, select_user_team_tables, Commands, Fpl, GetCmd},
    FplTables,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "fpl_tables=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(app: Fpl) -> anyhow::Result<()> {
    let Commands::Get { cmd } = app.command;
    let fpl = FplTables::new(cmd.credentials()?)?;

    let output = match cmd {
        GetCmd::Teams { ids } => {
            let teams = fpl.get_teams(Some(ids.as_slice()))?;
            render(&[("teams", &teams)], app.json)?
        }

        GetCmd::GameWeeks { ids } => {
            let weeks = fpl.get_game_weeks(Some(ids.as_slice()))?;
            render(&[("game_weeks", &weeks)], app.json)?
        }

        GetCmd::Player { id, table } => {
            let tables = fpl
                .get_player(id)
                .with_context(|| format!("fetching player {id}"))?;
            render(&select_player_tables(&tables, table), app.json)?
        }

        GetCmd::Players { ids, table } => {
            let tables = fpl.get_players(Some(ids.as_slice()))?;
            render(&select_player_tables(&tables, table), app.json)?
        }

        GetCmd::Fixtures => render(&[("fixtures", &fpl.get_fixtures()?)], app.json)?,

        GetCmd::UserTeam { table, .. } => {
            let tables = fpl.get_user_team(None).context("fetching user team")?;
            render(&select_user_team_tables(&tables, table), app.json)?
        }

        GetCmd::UserInfo { .. } => {
            let info = fpl.get_user_info().context("fetching user info")?;
            render(&[("user_info", &info)], app.json)?
        }
    };

    print!("{output}");
    if app.json {
        println!();
    }
    Ok(())
}

/// Run the CLI.
fn main() -> ExitCode {
    let app = Fpl::parse();
    init_tracing(app.verbose);

    match run(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
