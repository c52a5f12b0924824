//! Story Weaver terminal client
//!
//! Hosts a story session in the terminal and talks to a running proxy.
//!
//! Keys: Enter sends, Ctrl-E exports `story.md`, Ctrl-R starts over,
//! Esc or Ctrl-C quits.

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    DefaultTerminal, Frame,
};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use story_weaver::client::{DriverError, HttpTransport, SessionDriver, DEFAULT_SERVER_URL};
use story_weaver::message::{Message, Role};
use story_weaver::session::{SessionState, TransitionError, EMPTY_TRANSCRIPT_HINT, TICK_INTERVAL};

struct App {
    driver: SessionDriver<HttpTransport>,
    server_url: String,
    input_focused: bool,
    status: Option<String>,
}

impl App {
    /// Handle a key press. Returns false when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('c') if ctrl => return false,
            KeyCode::Char('r') if ctrl => {
                self.driver.reset();
                self.status = None;
            }
            KeyCode::Char('e') if ctrl => self.export(),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace if self.input_enabled() => {
                let mut text = self.driver.session().input.clone();
                text.pop();
                self.driver.set_input(text);
            }
            KeyCode::Char(c) if !ctrl && self.input_enabled() => {
                let mut text = self.driver.session().input.clone();
                text.push(c);
                self.driver.set_input(text);
            }
            _ => {}
        }
        true
    }

    fn input_enabled(&self) -> bool {
        !self.driver.session().processing()
    }

    fn submit(&mut self) {
        match self.driver.submit_input() {
            Ok(()) => self.status = None,
            Err(DriverError::Transition(TransitionError::EmptyInput | TransitionError::Busy)) => {}
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn export(&mut self) {
        match self.driver.export() {
            Ok(()) => {
                self.status = self
                    .driver
                    .last_export()
                    .map(|path| format!("Saved {}", path.display()));
            }
            Err(DriverError::Transition(TransitionError::ExportUnavailable)) => {}
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn sync_focus(&mut self) {
        if self.driver.take_focus_request() {
            self.input_focused = true;
        }
        if self.driver.session().processing() {
            self.input_focused = false;
        }
    }
}

fn main() -> io::Result<()> {
    init_logging()?;

    let server_url =
        std::env::var("STORY_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let export_dir = std::env::var("STORY_EXPORT_DIR").map_or_else(|_| PathBuf::from("."), PathBuf::from);

    tracing::info!(server = %server_url, export_dir = %export_dir.display(), "Starting story client");

    let mut app = App {
        driver: SessionDriver::new(HttpTransport::new(&server_url), export_dir),
        server_url,
        input_focused: true,
        status: None,
    };

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app);
    ratatui::restore();
    result
}

/// Log to `STORY_LOG_FILE` when set; the terminal belongs to the UI
fn init_logging() -> io::Result<()> {
    let Ok(path) = std::env::var("STORY_LOG_FILE") else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "story_weaver=info,story_tui=info".into()),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        app.driver.pump();
        app.sync_focus();
        terminal.draw(|frame| draw(frame, app))?;

        let timeout = TICK_INTERVAL.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key) {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= TICK_INTERVAL {
            app.driver.tick();
            last_tick = Instant::now();
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn draw(frame: &mut Frame, app: &App) {
    let [transcript_area, input_area, footer_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_transcript(frame, app, transcript_area);
    draw_input(frame, app, input_area);
    draw_footer(frame, app, footer_area);
}

fn draw_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.driver.session();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Story - {} ", app.server_url));

    let mut lines: Vec<Line> = Vec::new();
    let mut rows = 0usize;
    let width = usize::from(area.width.saturating_sub(2)).max(1);

    if session.history.is_empty() {
        lines.push(Line::from(EMPTY_TRANSCRIPT_HINT));
    }
    for line in session.visible_messages().filter_map(transcript_line) {
        rows += line.width().div_ceil(width).max(1) + 1;
        lines.push(line);
        lines.push(Line::default());
    }

    // Keep the newest turn in view
    let height = usize::from(area.height.saturating_sub(2));
    let scroll = u16::try_from(rows.saturating_sub(height)).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// One transcript row: bold speaker label followed by the message text
fn transcript_line(message: &Message) -> Option<Line<'_>> {
    let speaker = message.role.speaker_label()?;
    let color = match message.role {
        Role::User => Color::Cyan,
        Role::Assistant | Role::System => Color::Yellow,
    };
    Some(Line::from(vec![
        Span::styled(
            format!("{speaker}: "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(message.content.as_str()),
    ]))
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.driver.session();
    let border = if session.processing() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", session.send_label()));

    let content = if session.input.is_empty() {
        Line::from(Span::styled(
            session.placeholder(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(session.input.as_str())
    };
    frame.render_widget(Paragraph::new(content).block(block), area);

    if app.input_focused && !session.processing() {
        let offset = u16::try_from(session.input.chars().count()).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(offset)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.driver.session();
    let line = if let Some(status) = &app.status {
        Line::from(Span::styled(status.as_str(), Style::default().fg(Color::Green)))
    } else if let Some(error) = &session.last_error {
        Line::from(Span::styled(
            format!("Last turn failed: {error}"),
            Style::default().fg(Color::Red),
        ))
    } else if session.state == SessionState::HistoryFull {
        Line::from(Span::styled(
            session.placeholder(),
            Style::default().fg(Color::Red),
        ))
    } else {
        let export = if session.can_export() {
            "Ctrl-E export"
        } else {
            "Ctrl-E export (unavailable)"
        };
        Line::from(Span::styled(
            format!("Enter send | {export} | Ctrl-R reset | Esc quit"),
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}
