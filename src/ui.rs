//! User interface rendering functions for all application screens.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    engine::MazeEngine,
    raster::{self, Raster},
    types::{MainMenuItem, MenuType, OptionsMenuItem, Screen},
    App,
};

/// Key help shown above the in-game status line.
const IN_GAME_HELP: &str =
    "(g) generate / (s) solve / (a) algorithm / (f) skip / (c) clear / (d) draw / (+/-) size / (h) return";

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from drawing operations or data conversion failures.
pub(crate) fn draw(app: &mut App, frame: &mut Frame) -> Result<()> {
    match app.screen {
        Screen::MainMenu(item) => main_menu(frame, item),
        Screen::OptionsMenu(item) => options_menu(frame, item, &app.engine),
        Screen::InGame => in_game(app, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
}

/// Renders the generic layout structure for the main and options menus.
///
/// This function creates the common layout and block structure used by both main and options menus.
/// The generic part includes the centered positioning and border styling, while the specific menu
/// content is handled by the caller using the [`MenuType`] parameter.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn init_menu(frame: &mut Frame, menu: &MenuType) -> Rc<[Rect]> {
    let space = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(40),
    ])
    .split(frame.area())[1];
    let space = Layout::horizontal([
        Constraint::Percentage(35),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
    ])
    .split(space)[1];

    let layout = Layout::vertical([Constraint::Max(u16::from(menu.value()) + 2)])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(menu.repr())
        .title_bottom("(j) down / (k) up / (l) select")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); usize::from(menu.value())]).split(inner_space)
}

/// Renders a list of menu entries, highlighting the selected one.
///
/// This function pairs each entry with a row from [`init_menu`], so it never draws more entries
/// than there are rows.
fn render_entries(frame: &mut Frame, rows: &[Rect], entries: Vec<(String, bool)>) {
    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    for ((label, selected), row) in entries.into_iter().zip(rows) {
        let style = if selected {
            active_content_style
        } else {
            content_style
        };
        frame.render_widget(Line::styled(label, style).centered(), *row);
    }
}

/// Renders the main menu screen with navigation options.
///
/// This function displays the main menu with options for "Start Game", "Options", and "Quit". It
/// highlights the currently selected option and provides visual feedback for user navigation.
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let inner_layout = init_menu(frame, &MenuType::MainMenu(3));

    render_entries(
        frame,
        &inner_layout,
        vec![
            ("Start Game".to_owned(), item == MainMenuItem::StartGame),
            ("Options".to_owned(), item == MainMenuItem::Options),
            ("Quit".to_owned(), item == MainMenuItem::Quit),
        ],
    );
}

/// Renders the options menu screen with configuration choices.
///
/// This function displays the current maze size and solving algorithm next to a "Return" entry.
/// Selecting a setting changes it in place, so the labels are read from the engine on every
/// redraw.
pub(crate) fn options_menu(frame: &mut Frame, item: OptionsMenuItem, engine: &MazeEngine) {
    clear(frame);

    let inner_layout = init_menu(frame, &MenuType::OptionsMenu(3));

    render_entries(
        frame,
        &inner_layout,
        vec![
            (
                format!("Size: {}", engine.size()),
                item == OptionsMenuItem::Size,
            ),
            (
                format!("Algorithm: {}", engine.algorithm()),
                item == OptionsMenuItem::Algorithm,
            ),
            ("Return".to_owned(), item == OptionsMenuItem::Back),
        ],
    );
}

/// Renders the in-game screen with the maze, the solving animation and the traced path.
///
/// This function lays the maze raster out one tile per terminal cell, centred in the frame, and
/// draws it on a [`Canvas`] in layers: walls, explored cells, the traced path, the solution path,
/// and finally the entrance and exit. The area the raster took is stored back into the [`App`] so
/// that mouse events can be mapped onto cells; when the terminal is too small to hold the raster
/// the area is left empty and pointer input is ignored.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations or layout lookups.
pub(crate) fn in_game(app: &mut App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let engine = &app.engine;
    let raster = Raster::from_maze(engine.maze());
    let side = raster.side();
    let side_len = u16::try_from(side)?;

    let overall_layout = Layout::vertical([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());
    let maze_content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get maze content area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    let row_space = *Layout::vertical([Constraint::Length(side_len)])
        .flex(Flex::Center)
        .split(maze_content_area)
        .first()
        .ok_or_eyre("failed to get maze rows from layout")?;
    let space = *Layout::horizontal([Constraint::Length(side_len)])
        .flex(Flex::Center)
        .split(row_space)
        .first()
        .ok_or_eyre("failed to get maze space from layout")?;

    let fits = space.width == side_len && space.height == side_len;

    // Pre-compute screen coordinates to handle errors before closures
    let layers = canvas_layers(engine, &raster)?;

    let half = f64::from(rounded_div::i32(i32::from(side_len) - 1, 2));
    let maze = Canvas::default()
        .x_bounds([-half, half])
        .y_bounds([-half, half])
        .marker(Marker::Dot)
        .paint(|ctx| {
            for (coords, color) in &layers {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
            }
        });

    frame.render_widget(maze, space);

    let status_block = Block::bordered()
        .title(IN_GAME_HELP)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let status_line = status_text(engine, fits);
    let status_inner = status_block.inner(status_area);

    frame.render_widget(status_block, status_area);
    frame.render_widget(Line::raw(status_line).centered(), status_inner);

    app.maze_area = if fits { space } else { Rect::default() };

    Ok(())
}

/// Computes the canvas points of every layer of the maze, bottom layer first.
///
/// This function returns the walls, the cells explored so far by the animation, the path traced by
/// hand, the revealed part of the solution path, and the entrance and exit markers, each paired with
/// the color it is painted in.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
fn canvas_layers(engine: &MazeEngine, raster: &Raster) -> Result<Vec<(Vec<(f64, f64)>, Color)>> {
    let side = raster.side();
    let explored: Vec<(usize, usize)> = engine
        .animation()
        .explored()
        .iter()
        .copied()
        .map(raster::cell_to_raster)
        .collect();
    let ends = [
        raster::cell_to_raster(engine.maze().entrance()),
        raster::cell_to_raster(engine.maze().exit()),
    ];

    Ok(vec![
        (
            raster::transform_raster_to_screen_coords(&raster.wall_coords(), side)?,
            Color::Green,
        ),
        (
            raster::transform_raster_to_screen_coords(&explored, side)?,
            Color::Blue,
        ),
        (
            raster::transform_raster_to_screen_coords(
                &raster::trail_coords(engine.drawn_path()),
                side,
            )?,
            Color::Yellow,
        ),
        (
            raster::transform_raster_to_screen_coords(
                &raster::trail_coords(engine.animation().path()),
                side,
            )?,
            Color::Red,
        ),
        (
            raster::transform_raster_to_screen_coords(&ends, side)?,
            Color::Cyan,
        ),
    ])
}

/// Builds the text of the in-game status line.
fn status_text(engine: &MazeEngine, fits: bool) -> String {
    let (revealed, total) = engine.animation().progress();
    let size = engine.size();
    let mut parts = vec![
        engine.status().to_string(),
        format!("{size}x{size}"),
        engine.algorithm().to_string(),
        format!(
            "draw mode {}",
            if engine.draw_mode() { "on" } else { "off" }
        ),
    ];

    if revealed < total {
        parts.push(format!("solving {revealed}/{total}"));
    }
    if !fits {
        parts.push("enlarge the terminal to trace paths".to_owned());
    }

    parts.join(" | ")
}
