//! Terminal host for the fault diagram.
//!
//! Owns the session [`AppState`], shows the rasterized figure with a legend and
//! the toggle button, and re-renders after every state change or resize.

use crate::fault::{Displacement, FaultPlane};
use crate::figure::{render, Figure, LegendMarker};
use crate::graphics::{rasterize, Canvas, Viewport};
use crate::scene::{Rgb, SceneConfig};
use crate::state::AppState;
use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{self, Write};

/// Columns reserved right of the diagram for the legend
const LEGEND_COLS: u16 = 18;
const HINT: &str = "space/enter/click: toggle  r: reset  d: debug  q: quit";

/// What the event loop should do after an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Ignore,
    Redraw,
    Quit,
}

/// Screen regions in terminal cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub diagram_cols: u16,
    pub diagram_rows: u16,
    /// First row of the diagram, below the title
    pub diagram_top: u16,
    pub legend_col: u16,
    /// Column, row, and width of the button
    pub button: (u16, u16, u16),
    pub hint_row: u16,
}

impl Layout {
    /// Splits the terminal into title, diagram, legend, button, and hint rows.
    /// Returns `None` when the terminal is too small to hold them.
    pub fn compute(cols: u16, rows: u16, button_label: &str) -> Option<Layout> {
        let button_width = button_label.chars().count() as u16 + 4;
        if cols < LEGEND_COLS + button_width.max(16) || rows < 6 {
            return None;
        }
        let diagram_cols = cols - LEGEND_COLS;
        let diagram_rows = rows - 4;
        Some(Layout {
            diagram_cols,
            diagram_rows,
            diagram_top: 1,
            legend_col: diagram_cols + 1,
            button: (
                diagram_cols.saturating_sub(button_width) / 2,
                1 + diagram_rows,
                button_width,
            ),
            hint_row: rows - 1,
        })
    }

    /// Pixel size of the diagram; each cell holds two vertically stacked pixels
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.diagram_cols as usize, self.diagram_rows as usize * 2)
    }

    pub fn button_contains(&self, column: u16, row: u16) -> bool {
        let (col, button_row, width) = self.button;
        row == button_row && column >= col && column < col + width
    }
}

/// Fault diagram widget
pub struct FaultWidget {
    scene: SceneConfig,
    /// Terminal size in cells
    size: (u16, u16),
    /// Layout of the last paint, used to hit-test clicks
    layout: Option<Layout>,
}

impl FaultWidget {
    pub fn new(scene: SceneConfig, size: (u16, u16)) -> Self {
        let layout = Layout::compute(size.0, size.1, scene.button_label);
        FaultWidget {
            scene,
            size,
            layout,
        }
    }

    /// Handle events for the fault widget
    pub fn event(&mut self, event: &Event, data: &mut AppState) -> Action {
        match event {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                if key_event.modifiers.contains(KeyModifiers::CONTROL)
                    && key_event.code == KeyCode::Char('c')
                {
                    return Action::Quit;
                }
                match key_event.code {
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        data.toggle();
                        Action::Redraw
                    }
                    KeyCode::Char('d') | KeyCode::Char('D') => {
                        data.debug = !data.debug;
                        Action::Redraw
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        data.reset();
                        Action::Redraw
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
                    _ => Action::Ignore,
                }
            }
            Event::Mouse(mouse_event) => match mouse_event.kind {
                MouseEventKind::Down(MouseButton::Left)
                    if self
                        .layout
                        .is_some_and(|l| l.button_contains(mouse_event.column, mouse_event.row)) =>
                {
                    data.toggle();
                    Action::Redraw
                }
                _ => Action::Ignore,
            },
            Event::Resize(cols, rows) => {
                log::debug!("terminal resized to {cols}x{rows}");
                self.size = (*cols, *rows);
                self.layout = Layout::compute(*cols, *rows, self.scene.button_label);
                Action::Redraw
            }
            _ => Action::Ignore,
        }
    }

    /// Paint the whole screen for the current state
    pub fn paint<W: Write>(&mut self, out: &mut W, data: &AppState) -> io::Result<()> {
        queue!(out, ResetColor, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        let Some(layout) = self.layout else {
            queue!(
                out,
                Print(format!(
                    "Terminal too small ({}x{}), resize or press q",
                    self.size.0, self.size.1
                ))
            )?;
            return out.flush();
        };

        queue!(
            out,
            SetForegroundColor(to_color(self.scene.legend_text_color)),
            Print(self.scene.title),
            ResetColor
        )?;

        let figure = render(&self.scene, data.fault);
        let (width, height) = layout.pixel_size();
        let viewport = Viewport::fit(figure.width, figure.height, width, height);
        let mut canvas = Canvas::new(width, height, Rgb::WHITE);
        rasterize(&figure, &viewport, &mut canvas);

        paint_canvas(out, &canvas, layout.diagram_top)?;
        self.paint_legend(out, &figure, &layout)?;

        let (col, row, _) = layout.button;
        queue!(
            out,
            cursor::MoveTo(col, row),
            SetBackgroundColor(to_color(self.scene.legend_fault_color)),
            SetForegroundColor(Color::White),
            Print(format!("[ {} ]", self.scene.button_label)),
            ResetColor,
            cursor::MoveTo(0, layout.hint_row),
            Print(HINT)
        )?;

        if data.debug {
            self.paint_debug(out, data, &layout, &viewport)?;
        }

        out.flush()
    }

    fn paint_legend<W: Write>(&self, out: &mut W, figure: &Figure, layout: &Layout) -> io::Result<()> {
        let entries = figure.legend.len() as u16;
        let first_row = layout.diagram_top + layout.diagram_rows.saturating_sub(entries) / 2;
        for (i, entry) in figure.legend.iter().enumerate() {
            let (marker, color) = match entry.marker {
                LegendMarker::Swatch(color) => ("██", color),
                LegendMarker::DashedLine(color) => ("╌╌", color),
            };
            queue!(
                out,
                cursor::MoveTo(layout.legend_col, first_row + i as u16),
                SetForegroundColor(to_color(color)),
                Print(marker),
                SetForegroundColor(to_color(figure.legend_text_color)),
                Print(format!(" {}", entry.label)),
                ResetColor
            )?;
        }
        Ok(())
    }

    fn paint_debug<W: Write>(
        &self,
        out: &mut W,
        data: &AppState,
        layout: &Layout,
        viewport: &Viewport,
    ) -> io::Result<()> {
        let fault = FaultPlane::from_scene(&self.scene);
        let offset = Displacement::for_state(&self.scene, data.fault);
        let lines = [
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("State: {}", data.fault),
            format!(
                "Fault: ({:.2}, {:.2}) -> ({:.2}, {:.2})",
                fault.top.x, fault.top.y, fault.bottom.x, fault.bottom.y
            ),
            format!("Offset: dx {:.4}, dy {:.4}", offset.dx, offset.dy),
            format!("Scale: {:.2} px/unit, {}x{} cells", viewport.scale, self.size.0, self.size.1),
        ];
        for (i, line) in lines.iter().enumerate() {
            queue!(
                out,
                cursor::MoveTo(1, layout.diagram_top + i as u16),
                SetBackgroundColor(Color::Black),
                SetForegroundColor(Color::White),
                Print(line),
                ResetColor
            )?;
        }
        Ok(())
    }
}

/// Draws the canvas with upper-half blocks: foreground is the top pixel,
/// background the bottom one.
fn paint_canvas<W: Write>(out: &mut W, canvas: &Canvas, top_row: u16) -> io::Result<()> {
    for cell_row in 0..canvas.height() / 2 {
        queue!(out, cursor::MoveTo(0, top_row + cell_row as u16))?;
        let mut last: Option<(Rgb, Rgb)> = None;
        for x in 0..canvas.width() {
            let upper = canvas.pixel(x, cell_row * 2).unwrap_or(Rgb::WHITE);
            let lower = canvas.pixel(x, cell_row * 2 + 1).unwrap_or(Rgb::WHITE);
            if last != Some((upper, lower)) {
                queue!(
                    out,
                    SetForegroundColor(to_color(upper)),
                    SetBackgroundColor(to_color(lower))
                )?;
                last = Some((upper, lower));
            }
            queue!(out, Print('▀'))?;
        }
        queue!(out, ResetColor)?;
    }
    Ok(())
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Current terminal size in cells
fn terminal_size() -> Result<(u16, u16)> {
    match termsize::get() {
        Some(size) => Ok((size.cols, size.rows)),
        None => terminal::size().context("failed to query terminal size"),
    }
}

/// Run the interactive diagram until the user quits.
///
/// The terminal is restored even when the event loop fails.
pub fn run(scene: SceneConfig, mut data: AppState) -> Result<()> {
    let size = terminal_size()?;
    log::debug!("starting terminal host at {}x{} in {} state", size.0, size.1, data.fault);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    enter_screen(&mut stdout)?;

    let mut widget = FaultWidget::new(scene, size);
    let result = event_loop(&mut widget, &mut stdout, &mut data);

    let restored = execute!(stdout, cursor::Show, DisableMouseCapture, LeaveAlternateScreen)
        .and_then(|_| terminal::disable_raw_mode());
    result?;
    restored.context("failed to restore terminal")?;
    log::debug!("terminal host exited in {} state", data.fault);
    Ok(())
}

/// Switches to the alternate screen; leaves raw mode again if that fails
fn enter_screen<W: Write>(out: &mut W) -> Result<()> {
    if let Err(err) = execute!(out, EnterAlternateScreen, EnableMouseCapture, cursor::Hide) {
        if let Err(restore) = terminal::disable_raw_mode() {
            log::warn!("failed to disable raw mode: {restore}");
        }
        return Err(err).context("failed to enter alternate screen");
    }
    Ok(())
}

fn event_loop<W: Write>(widget: &mut FaultWidget, out: &mut W, data: &mut AppState) -> Result<()> {
    widget.paint(out, data).context("failed to paint")?;
    loop {
        let event = event::read().context("failed to read terminal event")?;
        match widget.event(&event, data) {
            Action::Quit => return Ok(()),
            Action::Redraw => widget.paint(out, data).context("failed to paint")?,
            Action::Ignore => {}
        }
    }
}
