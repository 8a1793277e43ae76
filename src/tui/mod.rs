pub mod widgets;

use std::sync::mpsc::Receiver;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use tracing::warn;

use crate::store::PaletteStore;
use crate::theme::{ColorPaletteData, PaletteKey};
use widgets::PaletteWidget;

const HELP: &str = "←/→ select  r regenerate  g algorithmic  q quit";

/// State for the interactive preview.
pub struct TuiApp {
    store: PaletteStore,
    updates: Receiver<ColorPaletteData>,
    palette: ColorPaletteData,
    selected: usize,
    status: String,
}

impl TuiApp {
    pub fn new(mut store: PaletteStore) -> Self {
        let updates = store.subscribe();
        let palette = store.current();
        Self {
            store,
            updates,
            palette,
            selected: 0,
            status: String::new(),
        }
    }

    /// Pull the latest published palette, if any.
    fn sync(&mut self) {
        while let Ok(palette) = self.updates.try_recv() {
            self.palette = palette;
        }
    }

    /// Apply a key press. Returns `false` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('r') => match self.store.regenerate() {
                Ok(_) => self.status = "regenerated".to_string(),
                Err(err) => {
                    warn!("regenerate failed: {err:#}");
                    self.status = format!("error: {err:#}");
                }
            },
            KeyCode::Char('g') => {
                self.store.generate();
                self.status = "algorithmic palette".to_string();
            }
            KeyCode::Right => self.selected = (self.selected + 1) % PaletteKey::ALL.len(),
            KeyCode::Left => {
                self.selected = (self.selected + PaletteKey::ALL.len() - 1) % PaletteKey::ALL.len()
            }
            _ => {}
        }
        self.sync();
        true
    }

    fn draw(&self, frame: &mut Frame) {
        let [main, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(PaletteWidget::new(&self.palette, Some(self.selected)), main);

        let footer_text = if self.status.is_empty() {
            HELP.to_string()
        } else {
            format!("{HELP}  |  {}", self.status)
        };
        frame.render_widget(
            Paragraph::new(Line::from(footer_text)).style(Style::default().fg(Color::DarkGray)),
            footer,
        );
    }
}

/// Launch the TUI application.
pub fn run(app: TuiApp) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, app);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, mut app: TuiApp) -> Result<()> {
    loop {
        app.sync();
        terminal.draw(|frame| app.draw(frame))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && !app.handle_key(key.code) {
                return Ok(());
            }
        }
    }
}
