//! Records view: the submissions table.

use chrono::NaiveDateTime;
use intake_core::{
  record::{Field, Skill},
  slot::Slot,
};
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::App;

/// Country prefix shown in front of stored contact numbers.
const CONTACT_PREFIX: &str = "+91";

/// Render the records table into `area`.
pub fn draw<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  let records = app.store.records();

  let block = Block::default()
    .title(format!(" Submissions ({}) ", records.len()))
    .title_bottom(Line::from(format!(" Showing {} records ", records.len())))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if records.is_empty() {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(vec![
        Line::from("No Submissions Yet"),
        Line::from(""),
        Line::from("Press n or F1 to fill in the form."),
      ])
      .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let header = Row::new([
    "Name", "Email", "Contact", "Skills", "Date", "Address", "Gender", "Service",
  ])
  .style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let rows = records.iter().map(|r| {
    Row::new([
      Cell::from(r.full_name.clone()),
      Cell::from(r.email.clone()),
      Cell::from(format_contact(&r.contact_number)),
      Cell::from(format_skills(&r.skills)),
      Cell::from(format_date(&r.date_time)),
      Cell::from(r.address.clone()),
      Cell::from(r.value(Field::Gender)),
      Cell::from(r.value(Field::ServiceType)),
    ])
  });

  let widths = [
    Constraint::Percentage(14),
    Constraint::Percentage(18),
    Constraint::Length(15),
    Constraint::Percentage(20),
    Constraint::Length(18),
    Constraint::Percentage(14),
    Constraint::Length(7),
    Constraint::Length(12),
  ];

  let mut state = TableState::default();
  state.select(Some(app.table_cursor.min(records.len() - 1)));

  f.render_stateful_widget(
    Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}

// ─── Cell formatting ──────────────────────────────────────────────────────────

fn format_contact(number: &str) -> String {
  format!("{CONTACT_PREFIX} {number}")
}

/// First two skills, then a count of the rest.
fn format_skills(skills: &[Skill]) -> String {
  let mut shown: Vec<String> = skills.iter().take(2).map(Skill::to_string).collect();
  if skills.len() > 2 {
    shown.push(format!("+{}", skills.len() - 2));
  }
  shown.join(", ")
}

/// `2024-07-09T11:00` → `09 Jul 2024, 11:00`. Unparseable values are shown
/// as stored.
fn format_date(raw: &str) -> String {
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
    .map(|dt| dt.format("%d %b %Y, %H:%M").to_string())
    .unwrap_or_else(|_| raw.to_owned())
}
