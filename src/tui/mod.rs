//! Ratatui-based terminal UI.
//!
//! A small form (number of children and one age per child) on the left, the
//! report of the last calculation on the right. Results are computed once per
//! calculate action and kept until the next one.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::pipeline::{Evaluation, EvaluationRequest, evaluate};
use crate::cli::SourceArgs;
use crate::data::{DataSource, ReferenceStore};
use crate::domain::{AgeBand, MAX_CHILDREN};
use crate::error::AppError;
use crate::report::NO_CHILDREN_WARNING;

/// Oldest age the form offers.
const MAX_FORM_AGE: u8 = AgeBand::MAX_AGE as u8;

/// Start the TUI.
pub fn run(args: SourceArgs) -> Result<(), AppError> {
    let store = crate::app::build_store(&args)?;
    let template = crate::app::request_from(&args, Vec::new())?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| terminal_error(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(store, template);
    app.event_loop(&mut terminal)
}

fn terminal_error(message: String) -> AppError {
    AppError::io(message).with_exit_code(4)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| terminal_error(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(terminal_error(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Form state: field 0 is the child count, fields 1..=count are the ages.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Form {
    ages: Vec<u8>,
    selected: usize,
}

impl Form {
    fn new() -> Self {
        Self {
            ages: vec![0],
            selected: 0,
        }
    }

    fn field_count(&self) -> usize {
        self.ages.len() + 1
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.field_count() {
            self.selected += 1;
        }
    }

    fn adjust(&mut self, delta: i32) {
        if self.selected == 0 {
            let count = (self.ages.len() as i32 + delta).clamp(0, MAX_CHILDREN as i32) as usize;
            self.ages.resize(count, 0);
            self.selected = self.selected.min(self.ages.len());
        } else if let Some(age) = self.ages.get_mut(self.selected - 1) {
            *age = (*age as i32 + delta).clamp(0, MAX_FORM_AGE as i32) as u8;
        }
    }

    fn ages(&self) -> Vec<f64> {
        self.ages.iter().map(|&a| f64::from(a)).collect()
    }
}

struct App<S: DataSource> {
    store: ReferenceStore<S>,
    template: EvaluationRequest,
    form: Form,
    breakdown: bool,
    scroll: u16,
    /// Set by the calculate key; the calculation runs after the next draw so
    /// the status line shows progress first.
    pending: bool,
    status: String,
    evaluation: Option<Evaluation>,
}

impl<S: DataSource> App<S> {
    fn new(store: ReferenceStore<S>, template: EvaluationRequest) -> Self {
        Self {
            store,
            template,
            form: Form::new(),
            breakdown: false,
            scroll: 0,
            pending: false,
            status: "Set the ages and press Enter to calculate.".to_string(),
            evaluation: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| terminal_error(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if self.pending {
                self.pending = false;
                self.calculate();
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| terminal_error(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| terminal_error(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.form.select_prev(),
            KeyCode::Down => self.form.select_next(),
            KeyCode::Left | KeyCode::Char('-') => self.form.adjust(-1),
            KeyCode::Right | KeyCode::Char('+') => self.form.adjust(1),
            KeyCode::Enter | KeyCode::Char('c') => {
                self.pending = true;
                self.status = "Loading reference data...".to_string();
            }
            KeyCode::Char('b') => {
                self.breakdown = !self.breakdown;
                self.status = if self.breakdown {
                    "Showing goods and care-time comparison.".to_string()
                } else {
                    "Showing total comparison only.".to_string()
                };
            }
            KeyCode::Char('r') => {
                self.store.clear();
                self.status = "Reference data will be downloaded again on the next calculation.".to_string();
            }
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            _ => {}
        }
        false
    }

    fn calculate(&mut self) {
        let ages = self.form.ages();
        if ages.is_empty() {
            self.evaluation = None;
            self.status = NO_CHILDREN_WARNING.to_string();
            return;
        }

        let request = EvaluationRequest {
            ages,
            ..self.template.clone()
        };
        match evaluate(&mut self.store, &request) {
            Ok(eval) => {
                self.status = format!(
                    "Monthly household cost: {}",
                    crate::report::format_currency(eval.household.total)
                );
                self.evaluation = Some(eval);
                self.scroll = 0;
            }
            Err(err) => {
                self.status = format!("Error: {err}");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(26), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_form(frame, body[0]);
        self.draw_results(frame, body[1]);

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("crianza", Style::default().fg(Color::Cyan)),
            Span::raw(" - monthly cost of raising children"),
            Span::styled(
                format!(
                    "   multiplier {} | adult equivalent {}",
                    self.template.params.price_multiplier,
                    self.template.params.equivalence_adult,
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::with_capacity(self.form.field_count());
        items.push(ListItem::new(format!("Children: {}", self.form.ages.len())));
        for (i, age) in self.form.ages.iter().enumerate() {
            items.push(ListItem::new(format!("Child {}: {age} y", i + 1)));
        }

        let list = List::new(items)
            .block(Block::default().title("Household").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.form.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Results").borders(Borders::ALL);

        let Some(eval) = &self.evaluation else {
            let msg = Paragraph::new("No results yet.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let text = crate::report::format_evaluation(eval, self.breakdown);
        let p = Paragraph::new(Text::from(text))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter calculate  b breakdown  r reload  PgUp/PgDn scroll  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(
                &self.status,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
