//! Terminal-based world explorer using ratatui
//!
//! Roguelike-style interface for walking the generated world. Presentation
//! and input sit behind [`FrameSink`] and [`CommandSource`] so the session
//! loop runs the same against the terminal or a scripted driver.

use std::error::Error;
use std::io::{stdout, Stdout};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::Direction as Axis,
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ascii::{
    export_frame_file, stage_char, stage_color, stage_map, tile_bg_color, tile_fg_color, AsciiMode,
};
use crate::config::ExplorerConfig;
use crate::export::export_frame_png;
use crate::frame::{Frame, FrameGenerator};
use crate::terrain::TileOrigin;
use crate::tile::Tile;
use crate::tilemap::Tilemap;
use crate::viewport::{Command, Direction, Viewport};

/// Pixel scale used for PNG exports from the explorer
const EXPORT_SCALE: u32 = 4;

/// Everything needed to draw one screen
pub struct Screen<'a> {
    pub frame: &'a Frame,
    /// Stage of every tile, present in the stage view
    pub stages: Option<&'a Tilemap<TileOrigin>>,
    pub status: String,
    /// Info panel lines, when the panel is shown
    pub panel: Option<Vec<String>>,
    pub show_help: bool,
}

/// Presents screens to the user
pub trait FrameSink {
    fn draw_frame(&mut self, screen: &Screen) -> Result<(), Box<dyn Error>>;
}

/// Supplies user commands
pub trait CommandSource {
    /// Block until input arrives. `None` means "redraw, nothing to do".
    fn read_command(&mut self) -> Result<Option<Command>, Box<dyn Error>>;
}

/// Explorer state
pub struct Explorer {
    viewport: Viewport,
    frames: FrameGenerator,
    mode: AsciiMode,
    show_help: bool,
    show_panel: bool,
    /// Message to display temporarily
    message: Option<String>,
}

impl Explorer {
    pub fn new(config: &ExplorerConfig) -> Self {
        Explorer {
            viewport: config.viewport(),
            frames: FrameGenerator::new(config.world_seed, config.parallel, config.cache_chunks),
            mode: AsciiMode::Tiles,
            show_help: false,
            show_panel: true,
            message: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mode(&self) -> AsciiMode {
        self.mode
    }

    /// Apply a command. Returns false when the session should end.
    pub fn handle(&mut self, command: Command, frame: &Frame) -> bool {
        if self.viewport.apply(command) {
            return true;
        }

        match command {
            Command::Quit => return false,
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::TogglePanel => {
                self.show_panel = !self.show_panel;
                self.message = Some(if self.show_panel {
                    "Panel: ON".to_string()
                } else {
                    "Panel: OFF".to_string()
                });
            }
            Command::ToggleView => {
                self.mode = self.mode.next();
                self.message = Some(format!("View: {}", self.mode.name()));
            }
            Command::ExportAscii => {
                let filename = format!("map_{}_{}.txt", frame.viewport.x, frame.viewport.y);
                self.message = Some(match export_frame_file(frame, self.mode, &filename, false) {
                    Ok(_) => format!("Exported: {}", filename),
                    Err(e) => format!("Export failed: {}", e),
                });
            }
            Command::ExportPng => {
                let filename = format!("map_{}_{}.png", frame.viewport.x, frame.viewport.y);
                self.message = Some(match export_frame_png(frame, self.mode, EXPORT_SCALE, &filename) {
                    Ok(_) => format!("Exported: {}", filename),
                    Err(e) => format!("Export failed: {}", e),
                });
            }
            Command::Step(_) | Command::Page(_) => {}
        }
        true
    }

    /// Status line shown under the map
    fn status_line(&self, frame: &Frame) -> String {
        let msg_str = self.message.as_ref().map(|m| format!(" | {}", m)).unwrap_or_default();
        format!(
            " Generating map at {},{} took: {} ms | {}{} | yubnhjkl:Move  YUBNHJKL:Page  ?:Help  q:Quit",
            frame.viewport.x,
            frame.viewport.y,
            frame.elapsed_ms(),
            self.mode.name(),
            msg_str,
        )
    }

    /// Details of the tile at the center of the window
    fn panel_lines(&self) -> Vec<String> {
        let center = self.viewport.center();
        let sample = self.frames.terrain().sample(center);

        let mut lines = vec![
            format!("Center: {},{}", center.x, center.y),
            format!("Tile:   {}", sample.tile.display_name()),
            format!("Stage:  {}", sample.origin.name()),
            format!("Macro:  {}", sample.macro_draw),
        ];

        if let TileOrigin::Vegetation { dense, edge } = sample.origin {
            lines.push(format!("Grove:  {}{}", if dense { "dense" } else { "sparse" }, if edge { ", edge" } else { "" }));
        }

        if let Some(hood) = sample.neighborhood {
            lines.push(String::new());
            lines.push("Plots:".to_string());
            for row in hood.cells.chunks(3) {
                let marks: String = row
                    .iter()
                    .map(|cell| if *cell == Tile::Claim { 'c' } else { '.' })
                    .collect();
                lines.push(format!("  {}", marks));
            }
            lines.push(format!("Neighbours claimed: {}", hood.house_count));
            lines.push(format!(
                "Footprint: start {} size {}",
                hood.footprint.start, hood.footprint.size
            ));
        }

        lines.push(String::new());
        lines.push(format!("World seed: {}", self.frames.world_seed()));
        lines.push(format!("Strategy: {}", self.frames.strategy_name()));
        if let Some(stats) = self.frames.cache_stats() {
            lines.push(format!("Cache: {}/{} chunks", stats.cached_count, stats.max_capacity));
            lines.push(format!("Hit rate: {:.0}%", stats.hit_rate() * 100.0));
        }
        lines
    }

    /// Generate the current frame
    pub fn render(&mut self) -> Frame {
        self.frames.render(self.viewport)
    }
}

/// Drive an explorer until the command source asks to quit.
///
/// Returns the number of screens drawn.
pub fn run_session<U>(ui: &mut U, explorer: &mut Explorer) -> Result<usize, Box<dyn Error>>
where
    U: FrameSink + CommandSource,
{
    let mut drawn = 0;
    loop {
        let frame = explorer.render();
        let stages = match explorer.mode {
            AsciiMode::Stages => Some(stage_map(frame.viewport, frame.world_seed)),
            AsciiMode::Tiles => None,
        };

        let screen = Screen {
            frame: &frame,
            stages: stages.as_ref(),
            status: explorer.status_line(&frame),
            panel: if explorer.show_panel { Some(explorer.panel_lines()) } else { None },
            show_help: explorer.show_help,
        };
        ui.draw_frame(&screen)?;
        drawn += 1;

        // Clear message after display
        explorer.message = None;

        if let Some(command) = ui.read_command()? {
            if !explorer.handle(command, &frame) {
                break;
            }
        }
    }
    Ok(drawn)
}

/// Map a key press to an explorer command
fn key_command(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char(ch) => Command::from_char(ch),
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Tab => Some(Command::TogglePanel),
        KeyCode::Up => Some(Command::Step(Direction::North)),
        KeyCode::Down => Some(Command::Step(Direction::South)),
        KeyCode::Left => Some(Command::Step(Direction::West)),
        KeyCode::Right => Some(Command::Step(Direction::East)),
        KeyCode::PageUp => Some(Command::Page(Direction::North)),
        KeyCode::PageDown => Some(Command::Page(Direction::South)),
        KeyCode::Home => Some(Command::Page(Direction::West)),
        KeyCode::End => Some(Command::Page(Direction::East)),
        _ => None,
    }
}

/// Raw-mode terminal front end
pub struct TerminalUi {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl TerminalUi {
    /// Enter raw mode and the alternate screen
    pub fn new() -> Result<Self, Box<dyn Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(TerminalUi {
            terminal,
            restored: false,
        })
    }

    /// Leave raw mode and the alternate screen
    pub fn restore(&mut self) -> Result<(), Box<dyn Error>> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        terminal::disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl CommandSource for TerminalUi {
    fn read_command(&mut self) -> Result<Option<Command>, Box<dyn Error>> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = key_command(key.code, key.modifiers) {
                        return Ok(Some(command));
                    }
                }
                Event::Resize(_, _) => return Ok(None),
                _ => {}
            }
        }
    }
}

impl FrameSink for TerminalUi {
    fn draw_frame(&mut self, screen: &Screen) -> Result<(), Box<dyn Error>> {
        self.terminal.draw(|f| {
            let size = f.area();

            // Main layout: content area + status bar
            let main_chunks = Layout::default()
                .direction(Axis::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            let content_area = main_chunks[0];
            let status_area = main_chunks[1];

            let map_area = if let Some(lines) = &screen.panel {
                let content_chunks = Layout::default()
                    .direction(Axis::Horizontal)
                    .constraints([Constraint::Min(1), Constraint::Length(30)])
                    .split(content_area);
                render_panel(lines, content_chunks[1], f.buffer_mut());
                content_chunks[0]
            } else {
                content_area
            };

            render_map(screen, map_area, f.buffer_mut());

            let status_para = Paragraph::new(screen.status.as_str())
                .style(Style::default().bg(Color::DarkGray).fg(Color::White));
            f.render_widget(status_para, status_area);

            if screen.show_help {
                render_help(map_area, f.buffer_mut());
            }
        })?;
        Ok(())
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Draw the frame, clipped to the available area
fn render_map(screen: &Screen, area: Rect, buf: &mut Buffer) {
    let frame = screen.frame;
    for (dx, dy, tile) in frame.tiles.iter() {
        if dx >= area.width as usize || dy >= area.height as usize {
            continue;
        }

        let (ch, style) = match screen.stages {
            Some(stages) => {
                let origin = stages.get(dx, dy);
                let fg = if tile.is_structure() { Color::White } else { Color::Black };
                (stage_char(origin), Style::default().fg(fg).bg(rgb(stage_color(origin))))
            }
            None => (
                tile.glyph(),
                Style::default().fg(rgb(tile_fg_color(tile))).bg(rgb(tile_bg_color(tile))),
            ),
        };

        let position = (area.x + dx as u16, area.y + dy as u16);
        if let Some(cell) = buf.cell_mut(position) {
            cell.set_char(ch).set_style(style);
        }
    }
}

fn render_panel(lines: &[String], area: Rect, buf: &mut Buffer) {
    let text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
    let panel = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Tile ")
            .title_style(Style::default().add_modifier(Modifier::BOLD)),
    );
    panel.render(area, buf);
}

fn render_help(area: Rect, buf: &mut Buffer) {
    let help = vec![
        Line::from("y k u    step NW N NE"),
        Line::from("h   l    step W E"),
        Line::from("b j n    step SW S SE"),
        Line::from("Y..N     move a full window"),
        Line::from("arrows   step, PgUp/PgDn/Home/End page"),
        Line::from("v        tile / stage view"),
        Line::from("i, Tab   toggle info panel"),
        Line::from("e        export window as text"),
        Line::from("p        export window as PNG"),
        Line::from("q, Esc   quit"),
        Line::from(""),
        Line::from("Press ? to close"),
    ];
    let width = 44.min(area.width);
    let height = (help.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    Clear.render(popup, buf);
    Paragraph::new(help)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .render(popup, buf);
}

/// Run the explorer on the terminal
pub fn run_explorer(config: &ExplorerConfig) -> Result<(), Box<dyn Error>> {
    let mut explorer = Explorer::new(config);
    let mut ui = TerminalUi::new()?;
    let result = run_session(&mut ui, &mut explorer);
    ui.restore()?;
    result.map(|_| ())
}
