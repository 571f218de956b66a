use std::{
    env,
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use jot_tui::config::{Config, DEFAULT_LOG_FILTER};
use jot_tui::document::Document;
use jot_tui::editor::{Command, DocumentEditor};
use jot_tui::interchange::{DocumentFormat, parse_document, write_document};
use jot_tui::render::{RenderOptions, RenderResult, render_document};
use jot_tui::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let config = Config::from_env();
    init_tracing(&config)?;

    let path = env::args().nth(1).map(PathBuf::from);
    let (document, initial_status) = match &path {
        Some(path) => load_document(path)?,
        None => (Document::new(), Some("Scratch document, not saved".to_string())),
    };
    let mut app = App::new(document, path, &config, initial_status);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

/// Logs go to a file because the terminal belongs to the UI.
fn init_tracing(config: &Config) -> Result<()> {
    let Some(log_file) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;
    let filter = EnvFilter::try_new(&config.log_filter)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("failed to build log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn load_document(path: &Path) -> Result<(Document, Option<String>)> {
    if !path.exists() {
        return Ok((Document::new(), Some("New document".to_string())));
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match parse_document(content, DocumentFormat::from_path(path)) {
        Ok(document) => {
            info!(path = %path.display(), "loaded document");
            Ok((document, None))
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to parse document");
            let message = format!("Parse error: {err}. Starting with empty document.");
            Ok((Document::new(), Some(message)))
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    while !app.should_quit() {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt)?;
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Keys that map onto list commands. Everything else is plain editing.
fn command_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    match code {
        KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => Some(Command::Unindent),
        KeyCode::Tab => Some(Command::Indent),
        KeyCode::BackTab => Some(Command::Unindent),
        KeyCode::Enter if modifiers.contains(KeyModifiers::ALT) => Some(Command::Split),
        KeyCode::Enter => Some(Command::ExitOrNewline),
        KeyCode::Backspace => Some(Command::DeleteBackward),
        KeyCode::Char(' ')
            if !modifiers.contains(KeyModifiers::CONTROL)
                && !modifiers.contains(KeyModifiers::ALT) =>
        {
            Some(Command::ConvertTrigger)
        }
        _ => None,
    }
}

struct App {
    editor: DocumentEditor,
    file_path: Option<PathBuf>,
    render_options: RenderOptions,
    theme: Theme,
    scroll_top: usize,
    last_view_height: usize,
    should_quit: bool,
    dirty: bool,
    status_message: Option<(String, Instant)>,
}

impl App {
    fn new(
        document: Document,
        file_path: Option<PathBuf>,
        config: &Config,
        initial_status: Option<String>,
    ) -> Self {
        Self {
            editor: DocumentEditor::new(document),
            file_path,
            render_options: config.render_options(),
            theme: Theme::default(),
            scroll_top: 0,
            last_view_height: 1,
            should_quit: false,
            dirty: false,
            status_message: initial_status.map(|msg| (msg, Instant::now())),
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let editor_area = vertical[0];
        let status_area = vertical[1];

        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(editor_area);
        let text_area = horizontal[0];
        let scrollbar_area = horizontal[1];

        let render = render_document(
            self.editor.document(),
            Some(self.editor.cursor()),
            text_area.width.max(1) as usize,
            &self.render_options,
            &self.theme,
        );

        let viewport_height = text_area.height as usize;
        self.last_view_height = viewport_height.max(1);
        self.adjust_scroll(&render, viewport_height);

        let paragraph = Paragraph::new(Text::from(render.lines.clone()))
            .style(self.theme.editor_style())
            .block(Block::default().borders(Borders::NONE))
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, text_area);

        let mut scrollbar_state = ScrollbarState::new(render.total_lines).position(self.scroll_top);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);

        if let Some(cursor) = render.cursor {
            if cursor.line >= self.scroll_top
                && cursor.line < self.scroll_top + viewport_height
                && text_area.width > 0
            {
                let cursor_y = text_area.y + (cursor.line - self.scroll_top) as u16;
                let cursor_x = text_area.x + cursor.column.min(text_area.width - 1);
                frame.set_cursor_position(Position::new(cursor_x, cursor_y));
            }
        }

        let status_widget =
            Paragraph::new(self.status_line()).style(self.theme.status_bar_style());
        frame.render_widget(status_widget, status_area);
    }

    fn status_line(&mut self) -> Line<'static> {
        self.prune_status_message();
        let name = self
            .file_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "[scratch]".to_string());
        let marker = if self.dirty { "*" } else { "" };
        let mut spans = vec![Span::styled(
            format!(" {name}{marker} "),
            self.theme.filename_style(),
        )];
        if let Some(labels) = self.editor.cursor_breadcrumbs() {
            spans.push(Span::styled(
                format!("| {} ", labels.join(" > ")),
                self.theme.breadcrumb_style(),
            ));
        }
        let tail = match &self.status_message {
            Some((message, _)) => format!("| {message}"),
            None => "| Tab indent | Shift-Tab unindent | Ctrl-S save | Ctrl-Q quit".to_string(),
        };
        spans.push(Span::raw(tail));
        Line::from(spans)
    }

    fn prune_status_message(&mut self) {
        if let Some((_, instant)) = &self.status_message {
            if instant.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
            }
        }
    }

    fn adjust_scroll(&mut self, render: &RenderResult, viewport_height: usize) {
        let viewport = viewport_height.max(1);
        let max_scroll = render.total_lines.saturating_sub(viewport);
        if let Some(cursor) = &render.cursor {
            if cursor.line < self.scroll_top {
                self.scroll_top = cursor.line;
            } else if cursor.line >= self.scroll_top + viewport {
                self.scroll_top = cursor.line.saturating_add(1).saturating_sub(viewport);
            }
        }
        if self.scroll_top > max_scroll {
            self.scroll_top = max_scroll;
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return Ok(());
        };

        if let Some(command) = command_for_key(code, modifiers) {
            if self.editor.apply(command) {
                self.mark_dirty();
            }
            return Ok(());
        }

        match (code, modifiers) {
            (KeyCode::Char('q'), m) | (KeyCode::Char('c'), m)
                if m.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
            }
            (KeyCode::Char('s'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.save()?;
            }
            (KeyCode::Left, _) => {
                self.editor.move_left();
            }
            (KeyCode::Right, _) => {
                self.editor.move_right();
            }
            (KeyCode::Up, _) => {
                self.editor.move_up();
            }
            (KeyCode::Down, _) => {
                self.editor.move_down();
            }
            (KeyCode::Home, _) => self.editor.move_to_node_start(),
            (KeyCode::End, _) => self.editor.move_to_node_end(),
            (KeyCode::Char('a'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.editor.move_to_node_start();
            }
            (KeyCode::Char('e'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.editor.move_to_node_end();
            }
            (KeyCode::PageUp, _) => {
                self.scroll_top = self.scroll_top.saturating_sub(self.last_view_height);
            }
            (KeyCode::PageDown, _) => {
                self.scroll_top += self.last_view_height;
            }
            (KeyCode::Char(ch), m)
                if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
            {
                if self.editor.insert_char(ch) {
                    self.mark_dirty();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn on_tick(&mut self) {
        self.prune_status_message();
    }

    fn save(&mut self) -> Result<()> {
        let Some(path) = &self.file_path else {
            self.set_status("No file name: start jot with a path to save");
            return Ok(());
        };
        let contents = write_document(self.editor.document(), DocumentFormat::from_path(path))?;
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "saved document");

        self.dirty = false;
        self.set_status("Saved");
        Ok(())
    }

    fn set_status(&mut self, message: &str) {
        self.status_message = Some((message.to_string(), Instant::now()));
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
