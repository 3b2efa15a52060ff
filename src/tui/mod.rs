//! Ratatui-based terminal UI.
//!
//! The left side holds the twelve-field form (four rows of three) and either
//! the input summary or the usage notes. The right side shows the latest
//! prediction: cost, band, a health score gauge, the risk radar and the
//! session's history chart.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::Rng;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};
use tracing::info;

use crate::app::pipeline::{PipelineError, PredictionOutcome, run_prediction};
use crate::domain::{CostBand, Field};
use crate::error::{AppError, EXIT_IO};
use crate::predictor::{GatewayError, PredictionGateway};
use crate::report::format_inr;
use crate::session::Session;

mod form;
mod plotters_chart;
mod radar;

use form::{COLUMNS, FormState};
use plotters_chart::{HistoryChart, history_bounds};
use radar::RiskRadar;

const HEALTH_TIP: &str = "Drinking enough water supports heart health, improves digestion, \
                          and keeps your body energized throughout the day.";

/// Start the TUI.
pub fn run(gateway: PredictionGateway, session: Session) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(gateway, session);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_IO, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_IO, format!("Failed to enter alternate screen: {e}")));
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

/// Decorative health score in [60, 95].
///
/// Presentation only: it is random, not derived from the inputs or the
/// model, and must never be used as a metric.
fn decorative_health_score() -> u16 {
    rand::thread_rng().gen_range(60..=95)
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Predict,
    Quit,
}

struct LastPrediction {
    outcome: PredictionOutcome,
    health_score: u16,
}

struct App {
    form: FormState,
    gateway: PredictionGateway,
    session: Session,
    last: Option<LastPrediction>,
    invalid: Vec<Field>,
    show_summary: bool,
    status: String,
}

impl App {
    fn new(gateway: PredictionGateway, session: Session) -> Self {
        let status = format!("Model: {}", gateway.describe());
        Self {
            form: FormState::new(),
            gateway,
            session,
            last: None,
            invalid: Vec::new(),
            show_summary: false,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.redraw(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_IO, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_IO, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.handle_key(key.code) {
                        Action::Quit => break,
                        Action::Predict => {
                            // Show the pending state before the blocking call.
                            self.status = "Predicting...".to_string();
                            self.redraw(terminal)?;
                            self.predict();
                        }
                        Action::None => {}
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

    fn redraw<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map_err(|e| AppError::new(EXIT_IO, format!("Terminal draw error: {e}")))?;
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Enter | KeyCode::Char('p') => return Action::Predict,
            KeyCode::Up => self.form.move_up(),
            KeyCode::Down => self.form.move_down(),
            KeyCode::Left => self.form.move_left(),
            KeyCode::Right => self.form.move_right(),
            KeyCode::Tab => self.form.next_field(),
            KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(' ') => self.form.adjust(1),
            KeyCode::Char('-') => self.form.adjust(-1),
            KeyCode::PageUp => self.form.adjust(10),
            KeyCode::PageDown => self.form.adjust(-10),
            KeyCode::Char('s') => self.show_summary = !self.show_summary,
            _ => {}
        }
        Action::None
    }

    /// One user action, one pipeline run.
    fn predict(&mut self) {
        let raw = self.form.to_raw();
        match run_prediction(&self.gateway, &mut self.session, &raw) {
            Ok(outcome) => {
                self.invalid.clear();
                self.status = format!(
                    "Prediction complete: {} ({})",
                    format_inr(outcome.prediction.value()),
                    outcome.metrics.cost_band.label()
                );
                self.last = Some(LastPrediction {
                    outcome,
                    health_score: decorative_health_score(),
                });
            }
            Err(PipelineError::Invalid(errors)) => {
                self.last = None;
                self.invalid = Field::ALL.into_iter().filter(|f| errors.touches(*f)).collect();
                self.status = format!("Invalid input: {errors}");
            }
            Err(PipelineError::Gateway(err)) => {
                // Never leave a stale result on screen as if it answered this request.
                self.last = None;
                self.status = match &err {
                    GatewayError::PredictionUnavailable { .. } => format!("{err} Press Enter to retry."),
                    GatewayError::ModelContractViolation { .. } => err.to_string(),
                };
                info!(history = self.session.history.len(), "prediction failed, history unchanged");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    "Health Insurance Cost Predictor",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                format!(
                    "Estimate your expected insurance cost from personal and medical factors | predictions this session: {}",
                    self.session.history.total_recorded()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let form_height = (self.form.rows() as u16) * 3 + 2;
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(form_height), Constraint::Min(0)])
            .split(cols[0]);

        self.draw_form(frame, left[0]);
        if self.show_summary {
            self.draw_summary(frame, left[1]);
        } else {
            self.draw_help(frame, left[1]);
        }
        self.draw_results(frame, cols[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Your details").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); self.form.rows()])
            .split(inner);

        for (row_idx, row_area) in rows.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
                .split(*row_area);

            for (col_idx, cell) in cells.iter().enumerate() {
                let Some(field) = Field::ALL.get(row_idx * COLUMNS + col_idx).copied() else {
                    continue;
                };
                self.draw_cell(frame, *cell, field);
            }
        }
    }

    fn draw_cell(&self, frame: &mut ratatui::Frame<'_>, area: Rect, field: Field) {
        let selected = self.form.selected() == field;
        let invalid = self.invalid.contains(&field);

        let border = if invalid {
            Style::default().fg(Color::Red)
        } else if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value_style = if selected {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default()
        };

        let value = self.form.display_value(field);
        let text = if selected { format!("‹ {value} ›") } else { value };
        let p = Paragraph::new(Span::styled(text, value_style))
            .block(
                Block::default()
                    .title(field.spec().label)
                    .borders(Borders::ALL)
                    .border_style(border),
            );
        frame.render_widget(p, area);
    }

    fn draw_summary(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = vec![Line::from("{")];
        let summary = self.form.summary_lines();
        let last = summary.len().saturating_sub(1);
        for (i, line) in summary.into_iter().enumerate() {
            let sep = if i == last { "" } else { "," };
            lines.push(Line::from(format!("  {line}{sep}")));
        }
        lines.push(Line::from("}"));

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Input summary").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_help(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from("1. Fill in your details across age, lifestyle, and medical background."),
            Line::from("2. Press Enter to estimate your health insurance cost."),
            Line::from("3. Results appear on the right; press s to review your inputs."),
            Line::from(""),
            Line::from(Span::styled(
                "Your inputs are not stored or shared.",
                Style::default().fg(Color::Blue),
            )),
            Line::from(""),
            Line::from(Span::styled("Health tip of the day", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(HEALTH_TIP),
        ];
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("How to use").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Percentage(50),
                Constraint::Min(8),
            ])
            .split(area);

        self.draw_cost(frame, chunks[0]);
        self.draw_health_score(frame, chunks[1]);
        self.draw_radar(frame, chunks[2]);
        self.draw_history(frame, chunks[3]);
    }

    fn draw_cost(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Predicted insurance cost").borders(Borders::ALL);
        let Some(last) = &self.last else {
            let msg = Paragraph::new("Press Enter to predict.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let band = last.outcome.metrics.cost_band;
        let band_color = match band {
            CostBand::Affordable => Color::Green,
            CostBand::High => Color::Yellow,
        };
        let lines = vec![
            Line::from(Span::styled(
                format_inr(last.outcome.prediction.value()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::from(Span::styled(band.message(), Style::default().fg(band_color))),
        ];
        let p = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true }).block(block);
        frame.render_widget(p, area);
    }

    fn draw_health_score(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Estimated health score (illustrative)")
            .borders(Borders::ALL);
        let Some(last) = &self.last else {
            frame.render_widget(block, area);
            return;
        };
        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .percent(last.health_score);
        frame.render_widget(gauge, area);
    }

    fn draw_radar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Health risk radar").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        match &self.last {
            Some(last) => frame.render_widget(RiskRadar { risk: &last.outcome.metrics.risk_vector }, inner),
            None => frame.render_widget(Paragraph::new("No prediction yet.").style(Style::default().fg(Color::Gray)), inner),
        }
    }

    fn draw_history(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Prediction history").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let points = self.session.history.series();
        if points.is_empty() {
            let msg = Paragraph::new("Tracks how your predicted cost changes each time you predict.")
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(msg, inner);
            return;
        }

        let (x_bounds, y_bounds) = history_bounds(&points);
        let widget = HistoryChart {
            points: &points,
            x_bounds,
            y_bounds,
            fmt_y: fmt_axis_cost,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "arrows move  +/- change  PgUp/PgDn ±10  Enter predict  s summary  q quit";
        let status_color = if self.invalid.is_empty() { Color::Yellow } else { Color::Red };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(status_color)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn fmt_axis_cost(v: f64) -> String {
    if v >= 100_000.0 {
        format!("{:.1}L", v / 100_000.0)
    } else if v >= 1_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}
