//! This crate contains the source code for the binary of the maze game.

#![expect(
    clippy::cargo_common_metadata,
    reason = "The crate is not published, so it carries no repository or readme."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use std::io::stdout;

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use mazeforge::{config::Cli, engine::MazeEngine, logging, print_solution, run_guarded, App};
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        logging::init(path, cli.log_level)?;
    }
    let settings = cli.settings();

    if cli.headless {
        return print_solution(&mut MazeEngine::new(settings), &mut stdout().lock());
    }

    let mut terminal = ratatui::init();
    run_guarded(
        || Ok(execute!(stdout(), EnableMouseCapture)?),
        || App::new(settings).run(&mut terminal),
        || {
            let released = execute!(stdout(), DisableMouseCapture);
            ratatui::restore();
            Ok(released?)
        },
    )
}
