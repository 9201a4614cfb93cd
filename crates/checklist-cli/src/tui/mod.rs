use std::{io, time::Duration};

use checklist_core::{month::DAYS_IN_MONTH, tasks::DayStatus};
use checklist_grid::ChecklistGrid;
use color_eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame, Terminal,
};
use uuid::Uuid;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const TITLE_WIDTH: usize = 22;

/// What keyboard input currently drives.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    /// Cursor movement and cell toggling.
    Browse,
    /// Collecting a new task title.
    AddTask { buffer: String },
    /// Collecting a replacement title for one task.
    RenameTask { id: Uuid, buffer: String },
    /// Choosing a month within the viewed year.
    PickMonth { pending: u32 },
}

struct App {
    grid: ChecklistGrid,
    row: usize,
    day: u32,
    mode: Mode,
}

impl App {
    fn new(grid: ChecklistGrid) -> Self {
        Self {
            grid,
            row: 0,
            day: 1,
            mode: Mode::Browse,
        }
    }

    fn current_task_id(&self) -> Option<Uuid> {
        self.grid.tasks().get(self.row).map(|task| task.id)
    }

    fn clamp_row(&mut self) {
        let len = self.grid.tasks().len();
        if len == 0 {
            self.row = 0;
        } else if self.row >= len {
            self.row = len - 1;
        }
    }

    /// Apply one key press. Returns true when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.mode.clone() {
            Mode::Browse => return self.handle_browse_key(code),
            Mode::AddTask { mut buffer } => match code {
                KeyCode::Esc => self.mode = Mode::Browse,
                KeyCode::Enter => {
                    // Blank input is the engine's no-op.
                    self.grid.add_task(&buffer);
                    self.mode = Mode::Browse;
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    self.mode = Mode::AddTask { buffer };
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.mode = Mode::AddTask { buffer };
                }
                _ => {}
            },
            Mode::RenameTask { id, mut buffer } => match code {
                KeyCode::Esc => self.mode = Mode::Browse,
                KeyCode::Enter => {
                    // A blank buffer cancels the edit; the title stays.
                    self.grid.rename_task(id, &buffer);
                    self.mode = Mode::Browse;
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    self.mode = Mode::RenameTask { id, buffer };
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.mode = Mode::RenameTask { id, buffer };
                }
                _ => {}
            },
            Mode::PickMonth { pending } => match code {
                KeyCode::Esc => self.mode = Mode::Browse,
                KeyCode::Left | KeyCode::Char('h') => {
                    self.mode = Mode::PickMonth {
                        pending: (pending + 11) % 12,
                    };
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.mode = Mode::PickMonth {
                        pending: (pending + 1) % 12,
                    };
                }
                KeyCode::Enter => {
                    self.grid.set_month(pending);
                    self.mode = Mode::Browse;
                }
                _ => {}
            },
        }
        false
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left | KeyCode::Char('h') => {
                if self.day > 1 {
                    self.day -= 1;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.day < DAYS_IN_MONTH {
                    self.day += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.row = self.row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.row += 1;
                self.clamp_row();
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.current_task_id() {
                    self.grid.toggle_day(id, self.day);
                }
            }
            KeyCode::Char('a') => {
                self.mode = Mode::AddTask {
                    buffer: String::new(),
                };
            }
            KeyCode::Char('r') => {
                if let Some(task) = self.grid.tasks().get(self.row).cloned() {
                    self.mode = Mode::RenameTask {
                        id: task.id,
                        buffer: task.title,
                    };
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.current_task_id() {
                    self.grid.delete_task(id);
                    self.clamp_row();
                }
            }
            KeyCode::Char('[') | KeyCode::Char('p') => self.grid.shift_month(-1),
            KeyCode::Char(']') | KeyCode::Char('n') => self.grid.shift_month(1),
            KeyCode::Char('m') => {
                self.mode = Mode::PickMonth {
                    pending: self.grid.viewed_month().month(),
                };
            }
            _ => {}
        }
        false
    }
}

/// Run the interactive grid until the user quits.
pub fn launch(grid: ChecklistGrid) -> Result<()> {
    // Guard restores the terminal even if we early-return.
    let _guard = TerminalGuard::enter()?;
    let mut terminal = _guard.terminal()?;
    let mut app = App::new(grid);

    loop {
        terminal.draw(|frame| draw(frame, &app))?;

        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                if app.handle_key(key.code) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new(month_tabs(app)), chunks[0]);

    let mut lines = vec![day_header(app)];
    let tasks = app.grid.tasks();
    for (index, task) in tasks.iter().enumerate() {
        let selected = matches!(app.mode, Mode::Browse) && index == app.row;
        let mut spans = vec![Span::styled(
            padded_title(&task.title),
            if selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            },
        )];
        for day in 1..=DAYS_IN_MONTH {
            let status = task.status(&app.grid.viewed_month().date_key(day));
            let mut style = Style::default().fg(status_color(status));
            if app.grid.is_today(day) {
                style = style.bg(Color::DarkGray);
            }
            if selected && day == app.day {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!(" {} ", status_glyph(status)), style));
        }
        let score = app.grid.completion_percentage(task);
        spans.push(Span::styled(format!("{score:>4}%"), score_style(score)));
        lines.push(Line::from(spans));
    }
    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            "No tasks yet. Press a to add one.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Span::styled(
                month_label(app),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(body, chunks[1]);

    frame.render_widget(footer(app), chunks[2]);
}

fn month_tabs(app: &App) -> Line<'static> {
    let viewed = app.grid.viewed_month().month();
    let mut spans = Vec::with_capacity(MONTHS.len() * 2);
    for (index, name) in MONTHS.iter().enumerate() {
        let style = if index as u32 == viewed {
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(&name[..3], style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn day_header(app: &App) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:<TITLE_WIDTH$}", "Tasks"),
        Style::default().fg(Color::DarkGray),
    )];
    for day in 1..=DAYS_IN_MONTH {
        let style = if app.grid.is_today(day) {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{day:>2} "), style));
    }
    spans.push(Span::styled(
        "Score",
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    ));
    Line::from(spans)
}

fn footer(app: &App) -> Paragraph<'static> {
    let line = match &app.mode {
        Mode::Browse => Line::from(vec![
            Span::raw("arrows move  "),
            Span::styled("space", Style::default().fg(Color::Cyan)),
            Span::raw(" toggle  "),
            Span::styled("a", Style::default().fg(Color::Cyan)),
            Span::raw(" add  "),
            Span::styled("r", Style::default().fg(Color::Cyan)),
            Span::raw(" rename  "),
            Span::styled("d", Style::default().fg(Color::Cyan)),
            Span::raw(" delete  "),
            Span::styled("[ ]", Style::default().fg(Color::Cyan)),
            Span::raw(" month  "),
            Span::styled("m", Style::default().fg(Color::Cyan)),
            Span::raw(" pick  "),
            Span::styled("q", Style::default().fg(Color::Cyan)),
            Span::raw(" quit"),
        ]),
        Mode::AddTask { buffer } => Line::from(vec![
            Span::raw("New task: "),
            Span::styled(buffer.clone(), Style::default().fg(Color::Green)),
            Span::raw("_  (Enter to add, Esc to cancel)"),
        ]),
        Mode::RenameTask { buffer, .. } => Line::from(vec![
            Span::raw("Rename to: "),
            Span::styled(buffer.clone(), Style::default().fg(Color::Yellow)),
            Span::raw("_  (Enter to save, Esc to keep the old title)"),
        ]),
        Mode::PickMonth { pending } => Line::from(vec![
            Span::raw("Jump to: "),
            Span::styled(
                format!(
                    "{} {}",
                    MONTHS[*pending as usize],
                    app.grid.viewed_month().year()
                ),
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  (arrows change, Enter to jump, Esc to cancel)"),
        ]),
    };
    Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Controls"))
}

fn month_label(app: &App) -> String {
    let viewed = app.grid.viewed_month();
    format!("{} {}", MONTHS[viewed.month() as usize], viewed.year())
}

fn status_glyph(status: Option<DayStatus>) -> &'static str {
    match status {
        Some(DayStatus::Done) => "✓",
        Some(DayStatus::Missed) => "✗",
        None => "·",
    }
}

fn status_color(status: Option<DayStatus>) -> Color {
    match status {
        Some(DayStatus::Done) => Color::Green,
        Some(DayStatus::Missed) => Color::Red,
        None => Color::DarkGray,
    }
}

fn score_style(score: u8) -> Style {
    if score == 100 {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else if score > 0 {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn padded_title(title: &str) -> String {
    let truncated: String = title.chars().take(TITLE_WIDTH - 2).collect();
    format!("{truncated:<TITLE_WIDTH$}")
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // Enter alternate screen to avoid polluting the shell buffer.
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }

    fn terminal(&self) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
        let backend = CrosstermBackend::new(io::stdout());
        Ok(Terminal::new(backend)?)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best-effort cleanup; errors are logged but not propagated from Drop.
        if let Err(err) = disable_raw_mode() {
            eprintln!("failed to disable raw mode: {err}");
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture) {
            eprintln!("failed to restore terminal: {err}");
        }
    }
}
