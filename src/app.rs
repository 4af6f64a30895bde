//! Core application state and logic for the maze game.

use std::io::Write;

use color_eyre::eyre::Result;
use ratatui::{layout::Rect, DefaultTerminal};

use crate::{
    engine::{EngineSettings, MazeEngine},
    events,
    raster::Raster,
    types::{MainMenuItem, Screen},
    ui,
};

/// Application state container for the maze game.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    ///
    /// This field holds the current screen of the game. It is used to determine which screen to
    /// render and what actions to take based on user input.
    pub(crate) screen: Screen,
    /// Maze engine driving the game.
    ///
    /// This field owns the labyrinth, the solving animation and the path traced by hand. Every
    /// key and mouse event that changes the maze goes through it.
    pub(crate) engine: MazeEngine,
    /// Area the maze raster occupied during the last redraw.
    ///
    /// This field maps mouse coordinates back onto raster tiles, and from there onto cells. It is
    /// empty until the in-game screen has been drawn once.
    pub(crate) maze_area: Rect,
}

impl Default for App {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl App {
    /// Creates a new instance of the App structure from the engine settings.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::StartGame),
            engine: MazeEngine::new(settings),
            maze_area: Rect::default(),
        }
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }
}

/// Solves the engine's maze and prints the result without a terminal interface.
///
/// The output holds the seed and size, the maze raster with the path marked, and the solve report.
///
/// # Errors
///
/// This function may return errors if writing to `out` fails.
pub fn print_solution<W: Write>(engine: &mut MazeEngine, out: &mut W) -> Result<()> {
    let report = engine.solve(engine.algorithm())?;
    engine.fast_forward();

    writeln!(
        out,
        "seed {}, {}x{} maze",
        engine.seed(),
        engine.size(),
        engine.size()
    )?;
    write!(
        out,
        "{}",
        Raster::from_maze(engine.maze()).render(engine.animation().path())
    )?;
    writeln!(out, "{report}")?;

    Ok(())
}

/// Runs `body` between `enter` and `leave`, calling `leave` even when `enter` or `body` fails.
///
/// This function wraps the terminal session so a failed setup step never leaves the terminal in
/// raw mode. `body` only runs once `enter` succeeded. The first error wins: a failure in `enter` or
/// `body` is returned over one in `leave`.
///
/// # Errors
///
/// This function returns the first error raised by `enter`, `body` or `leave`.
pub fn run_guarded<T, E, B, L>(enter: E, body: B, leave: L) -> Result<T>
where
    E: FnOnce() -> Result<()>,
    B: FnOnce() -> Result<T>,
    L: FnOnce() -> Result<()>,
{
    let outcome = enter().and_then(|()| body());
    let left = leave();

    let value = outcome?;
    left?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::Algorithm;
    use color_eyre::eyre::eyre;
    use std::cell::Cell;

    #[test]
    fn test_new_app_starts_on_main_menu() {
        let app = App::default();

        assert!(!app.exit);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));
        assert_eq!(app.maze_area, Rect::default());
    }

    #[test]
    fn test_print_solution_output() {
        let mut engine = MazeEngine::new(EngineSettings {
            size: 5,
            seed: 3,
            algorithm: Algorithm::AStar,
            ..EngineSettings::default()
        });
        let mut out = Vec::new();

        print_solution(&mut engine, &mut out).expect("printing should succeed");
        let text = String::from_utf8(out).expect("output should be utf-8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.first(), Some(&"seed 3, 5x5 maze"));
        assert_eq!(lines.len(), 1 + 11 + 1);
        assert!(text.contains('S'));
        assert!(text.contains('E'));
        assert!(lines.last().is_some_and(|line| line.starts_with("A*: ")));
    }

    #[test]
    fn test_run_guarded_leaves_after_failed_enter() {
        let ran_body = Cell::new(false);
        let left = Cell::new(false);

        let result = run_guarded(
            || Err(eyre!("mouse capture unavailable")),
            || {
                ran_body.set(true);
                Ok(())
            },
            || {
                left.set(true);
                Ok(())
            },
        );

        assert!(result.is_err());
        assert!(!ran_body.get());
        assert!(left.get());
    }

    #[test]
    fn test_run_guarded_prefers_body_error() {
        let left = Cell::new(false);

        let result: Result<()> = run_guarded(
            || Ok(()),
            || Err(eyre!("draw failed")),
            || {
                left.set(true);
                Err(eyre!("restore failed"))
            },
        );

        assert!(left.get());
        assert_eq!(
            result.map_err(|err| err.to_string()),
            Err("draw failed".to_owned())
        );
    }

    #[test]
    fn test_run_guarded_returns_body_value() {
        let value = run_guarded(|| Ok(()), || Ok(7), || Ok(()));

        assert_eq!(value.ok(), Some(7));
    }

    #[test]
    fn test_print_solution_refused_in_draw_mode() {
        let mut engine = MazeEngine::default();
        engine.toggle_draw_mode(Some(true));
        let mut out = Vec::new();

        assert!(print_solution(&mut engine, &mut out).is_err());
        assert!(out.is_empty());
    }
}
