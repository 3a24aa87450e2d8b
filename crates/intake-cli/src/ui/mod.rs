//! TUI rendering: orchestrates all views.

pub mod form;
pub mod records;
pub mod submitted;

use chrono::Local;
use intake_core::{bridge::Route, session::Phase, slot::Slot};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::App;

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: Slot>(f: &mut Frame, app: &App<S>) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  if app.confirm_delete.is_some() {
    draw_confirm(f, area, app);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let tab = |label: &str, active: bool| {
    let style = if active {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::White)
    };
    Span::styled(format!(" {label} "), style)
  };

  let left = vec![
    Span::styled(
      " intake ",
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    tab("F1 Form", app.view == Route::Form),
    Span::raw(" "),
    tab(
      &format!("F2 Records ({})", app.store.len()),
      app.view == Route::Records,
    ),
  ];
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );

  // Simple left-right header: pad the middle.
  let left_width: usize = left.iter().map(|s| s.content.chars().count()).sum();
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right.content.len());

  let mut spans = left;
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  match app.view {
    Route::Form => match app.session.submission() {
      Some(submission) if app.session.phase() == Phase::Submitted => {
        submitted::draw(f, area, submission);
      }
      _ => form::draw(f, area, app),
    },
    Route::Records => records::draw(f, area, app),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match app.view {
    _ if app.confirm_delete.is_some() => ("CONFIRM", "y delete  n/Esc cancel"),
    Route::Form if app.session.phase() == Phase::Submitted => (
      "DONE",
      "e edit again  n new  F2 records  q quit",
    ),
    Route::Form if app.session.is_editing() => (
      "EDIT",
      "Tab/↑↓ move  ←→ choose  Space toggle  Enter next/submit  Esc discard  F2 records",
    ),
    Route::Form => (
      "FORM",
      "Tab/↑↓ move  ←→ choose  Space toggle  Enter next/submit  Esc clear  F2 records",
    ),
    Route::Records => (
      "DATA",
      "↑↓/jk navigate  e/Enter edit  d delete  n new  F1 form  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Delete confirmation ──────────────────────────────────────────────────────

fn draw_confirm<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  let name = app
    .confirm_delete
    .as_deref()
    .and_then(|id| app.store.get(id))
    .map(|r| r.full_name.as_str())
    .unwrap_or("this record");

  let popup = centered(area, 48, 5);
  let block = Block::default()
    .title(" Delete record ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let inner = block.inner(popup);

  f.render_widget(Clear, popup);
  f.render_widget(block, popup);
  f.render_widget(
    Paragraph::new(vec![
      Line::from(format!("Delete {name}?")),
      Line::from(""),
      Line::from(Span::styled(
        "[y] yes   [n] no",
        Style::default().fg(Color::DarkGray),
      )),
    ]),
    inner,
  );
}

/// A `width` × `height` rect centred in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
    .flex(Flex::Center)
    .areas(row);
  cell
}
