//! Event handling functions for user input and application state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};

use crate::{
    config,
    maze::Position,
    raster,
    types::{MainMenuItem, OptionsMenuItem, Screen},
    App,
};

/// Longest time the event loop blocks waiting for input.
///
/// This keeps the animation moving while the user is idle; the actual reveal pace is decided by
/// the animation's own frame delay.
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard and mouse events and dispatches them to the appropriate
/// handler functions. It uses a timeout to avoid blocking the UI, then advances the solving
/// animation when the maze is on screen.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    let timeout = app
        .engine
        .animation()
        .frame_delay()
        .clamp(Duration::from_millis(1), MAX_POLL_INTERVAL);

    if event::poll(timeout)? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
            Event::Mouse(mouse) => handle_mouse_event(app, mouse),
            _ => {}
        }
    }

    if matches!(app.screen, Screen::InGame) {
        let _ = app.engine.tick();
    }

    Ok(())
}

/// Dispatches a key press to the handler of the current screen.
pub(crate) fn handle_key_event(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.exit = true,
        KeyCode::Char('j') => handle_j_events(app),
        KeyCode::Char('k') => handle_k_events(app),
        KeyCode::Char('l') => handle_l_events(app),
        KeyCode::Char('h') => handle_h_events(app),
        KeyCode::Char(other) if matches!(app.screen, Screen::InGame) => {
            handle_in_game_key(app, other);
        }
        _ => {}
    }
}

/// Handles 'j' key press events for downward navigation.
///
/// This function processes the 'j' key press which is used for moving down in menus.
pub(crate) fn handle_j_events(app: &mut App) {
    app.screen = match app.screen {
        Screen::MainMenu(MainMenuItem::StartGame) => Screen::MainMenu(MainMenuItem::Options),
        Screen::MainMenu(MainMenuItem::Options) => Screen::MainMenu(MainMenuItem::Quit),
        Screen::OptionsMenu(OptionsMenuItem::Size) => {
            Screen::OptionsMenu(OptionsMenuItem::Algorithm)
        }
        Screen::OptionsMenu(OptionsMenuItem::Algorithm) => {
            Screen::OptionsMenu(OptionsMenuItem::Back)
        }
        _ => return,
    };
}

/// Handles 'k' key press events for upward navigation.
///
/// This function processes the 'k' key press which is used for moving up in menus.
pub(crate) fn handle_k_events(app: &mut App) {
    app.screen = match app.screen {
        Screen::MainMenu(MainMenuItem::Quit) => Screen::MainMenu(MainMenuItem::Options),
        Screen::MainMenu(MainMenuItem::Options) => Screen::MainMenu(MainMenuItem::StartGame),
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            Screen::OptionsMenu(OptionsMenuItem::Algorithm)
        }
        Screen::OptionsMenu(OptionsMenuItem::Algorithm) => {
            Screen::OptionsMenu(OptionsMenuItem::Size)
        }
        _ => return,
    };
}

/// Handles 'l' key press events for selection and forward navigation.
///
/// This function processes the 'l' key press which is used for selecting menu items and moving
/// forward in the application flow. In the options menu it changes the selected setting in place.
pub(crate) fn handle_l_events(app: &mut App) {
    match app.screen {
        Screen::MainMenu(MainMenuItem::StartGame) => {
            app.screen = Screen::InGame;
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Size);
        }
        Screen::MainMenu(MainMenuItem::Quit) => {
            app.exit = true;
        }
        Screen::OptionsMenu(OptionsMenuItem::Size) => {
            let next = config::next_size_preset(app.engine.size());
            app.engine.set_size(next);
        }
        Screen::OptionsMenu(OptionsMenuItem::Algorithm) => {
            app.engine.set_algorithm(app.engine.algorithm().toggled());
        }
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        Screen::InGame => {}
    }
}

/// Handles 'h' key press events for backward navigation.
///
/// This function processes the 'h' key press which is used for moving back or returning to
/// previous screens. Leaving the in-game screen drops any solution or traced path on display.
pub(crate) fn handle_h_events(app: &mut App) {
    match app.screen {
        Screen::InGame => {
            app.engine.toggle_draw_mode(Some(false));
            app.engine.clear_path();
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        Screen::OptionsMenu(_) => {
            app.screen = Screen::MainMenu(MainMenuItem::Options);
        }
        Screen::MainMenu(_) => {}
    }
}

/// Handles the maze commands available on the in-game screen.
pub(crate) fn handle_in_game_key(app: &mut App, key: char) {
    match key {
        'g' => app.engine.generate(),
        's' => {
            // A refusal is already reflected in the engine status line.
            if let Err(err) = app.engine.solve(app.engine.algorithm()) {
                log::debug!("solve refused: {err}");
            }
        }
        'a' => app.engine.set_algorithm(app.engine.algorithm().toggled()),
        'c' => app.engine.clear_path(),
        'd' => app.engine.toggle_draw_mode(None),
        'f' => app.engine.fast_forward(),
        '+' | '=' => app.engine.set_size(app.engine.size() + 1),
        '-' => app.engine.set_size(app.engine.size().saturating_sub(1)),
        _ => {}
    }
}

/// Feeds left-button mouse events to the path tracer while the maze is on screen.
pub(crate) fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if !matches!(app.screen, Screen::InGame) {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(cell) = cell_at(app, mouse.column, mouse.row) {
                app.engine.pointer_down(cell);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(cell) = cell_at(app, mouse.column, mouse.row) {
                let _ = app.engine.pointer_move(cell);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let _ = app.engine.pointer_up();
        }
        _ => {}
    }
}

/// Maps a terminal coordinate to the maze cell drawn there.
///
/// Coordinates outside the last drawn maze area, or on a wall slot between cells, map to nothing.
pub(crate) fn cell_at(app: &App, column: u16, row: u16) -> Option<Position> {
    let area = app.maze_area;
    if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
        return None;
    }

    let cell = raster::raster_to_cell(usize::from(column - area.x), usize::from(row - area.y))?;

    app.engine.maze().contains(cell).then_some(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::EngineSettings, pathfinding::Algorithm};
    use ratatui::{crossterm::event::KeyModifiers, layout::Rect};

    /// Creates an app already on the in-game screen with a small maze.
    fn in_game_app() -> App {
        let mut app = App::new(EngineSettings {
            size: 5,
            seed: 8,
            algorithm: Algorithm::Bfs,
            frame_delay: Duration::ZERO,
        });
        app.screen = Screen::InGame;
        app.maze_area = Rect::new(10, 4, 11, 11);
        app
    }

    /// Builds a left-button mouse event at a terminal coordinate.
    const fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Builds a key press event for a character key.
    const fn key(character: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(character), KeyModifiers::NONE)
    }

    #[test]
    fn test_main_menu_navigation() {
        let mut app = App::default();

        handle_key_event(&mut app, key('j'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Options));
        handle_key_event(&mut app, key('j'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Quit));
        handle_key_event(&mut app, key('j'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Quit));
        handle_key_event(&mut app, key('k'));
        handle_key_event(&mut app, key('k'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));

        handle_key_event(&mut app, key('l'));
        assert_eq!(app.screen, Screen::InGame);
    }

    #[test]
    fn test_quit_from_menu() {
        let mut app = App::default();
        app.screen = Screen::MainMenu(MainMenuItem::Quit);

        handle_key_event(&mut app, key('l'));

        assert!(app.exit);
    }

    #[test]
    fn test_options_menu_changes_settings() {
        let mut app = App::default();
        app.screen = Screen::MainMenu(MainMenuItem::Options);

        handle_key_event(&mut app, key('l'));
        assert_eq!(app.screen, Screen::OptionsMenu(OptionsMenuItem::Size));

        handle_key_event(&mut app, key('l'));
        assert_eq!(app.engine.size(), 20);

        handle_key_event(&mut app, key('j'));
        handle_key_event(&mut app, key('l'));
        assert_eq!(app.engine.algorithm(), Algorithm::AStar);

        handle_key_event(&mut app, key('j'));
        handle_key_event(&mut app, key('l'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));
    }

    #[test]
    fn test_in_game_solve_and_clear() {
        let mut app = in_game_app();

        handle_key_event(&mut app, key('s'));
        assert!(app.engine.last_report().is_some());

        handle_key_event(&mut app, key('f'));
        assert!(!app.engine.animation().path().is_empty());

        handle_key_event(&mut app, key('c'));
        assert!(app.engine.animation().path().is_empty());
    }

    #[test]
    fn test_in_game_resize_keys() {
        let mut app = in_game_app();

        handle_key_event(&mut app, key('+'));
        assert_eq!(app.engine.size(), 6);
        handle_key_event(&mut app, key('-'));
        handle_key_event(&mut app, key('-'));
        assert_eq!(app.engine.size(), config::MIN_SIZE);
    }

    #[test]
    fn test_grow_key_at_largest_size_keeps_solution() {
        let mut app = in_game_app();
        app.engine.set_size(config::MAX_SIZE);
        handle_key_event(&mut app, key('s'));
        handle_key_event(&mut app, key('f'));
        let path = app.engine.animation().path().to_vec();

        handle_key_event(&mut app, key('+'));

        assert_eq!(app.engine.size(), config::MAX_SIZE);
        assert_eq!(app.engine.animation().path(), path.as_slice());
        assert!(matches!(
            app.engine.status(),
            crate::engine::Status::Rejected(crate::engine::UsageError::SizeAtLimit { .. })
        ));
    }

    #[test]
    fn test_return_from_game_leaves_draw_mode() {
        let mut app = in_game_app();
        handle_key_event(&mut app, key('d'));
        assert!(app.engine.draw_mode());

        handle_key_event(&mut app, key('h'));

        assert!(!app.engine.draw_mode());
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));
    }

    #[test]
    fn test_cell_at_maps_raster_cells() {
        let app = in_game_app();

        assert_eq!(cell_at(&app, 11, 5), Some(Position::new(0, 0)));
        assert_eq!(cell_at(&app, 13, 7), Some(Position::new(1, 1)));
        assert_eq!(cell_at(&app, 19, 13), Some(Position::new(4, 4)));
        assert_eq!(cell_at(&app, 12, 5), None);
        assert_eq!(cell_at(&app, 9, 5), None);
        assert_eq!(cell_at(&app, 11, 15), None);
    }

    #[test]
    fn test_mouse_drag_traces_path() {
        let mut app = in_game_app();
        let path = crate::pathfinding::bfs(app.engine.maze()).path;
        handle_key_event(&mut app, key('d'));

        for (idx, cell) in path.iter().enumerate() {
            let (col, row) = raster::cell_to_raster(*cell);
            let column = 10 + u16::try_from(col).expect("column fits");
            let row = 4 + u16::try_from(row).expect("row fits");
            let kind = if idx == 0 {
                MouseEventKind::Down(MouseButton::Left)
            } else {
                MouseEventKind::Drag(MouseButton::Left)
            };
            handle_mouse_event(&mut app, mouse(kind, column, row));
        }
        handle_mouse_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 0, 0));

        assert_eq!(app.engine.drawn_path(), path.as_slice());
        assert!(matches!(
            app.engine.status(),
            crate::engine::Status::PathValid { .. }
        ));
    }

    #[test]
    fn test_mouse_ignored_on_menus() {
        let mut app = App::default();
        app.engine.toggle_draw_mode(Some(true));
        app.maze_area = Rect::new(0, 0, 31, 31);

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 1, 1));

        assert!(app.engine.drawn_path().is_empty());
    }
}
