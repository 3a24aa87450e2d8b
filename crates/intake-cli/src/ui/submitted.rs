//! Confirmation view shown after a successful submit.

use intake_core::{
  record::Field,
  session::{Outcome, Submission},
};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

/// Render the committed record into `area`.
pub fn draw(f: &mut Frame, area: Rect, submission: &Submission) {
  let (title, colour) = headline(submission.outcome);

  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(colour));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let record = &submission.record;
  let mut lines = vec![
    Line::from(Span::styled(
      title,
      Style::default().fg(colour).add_modifier(Modifier::BOLD),
    )),
    Line::from(Span::styled(
      format!("Reference: {}", record.id.as_deref().unwrap_or("—")),
      Style::default().fg(Color::DarkGray),
    )),
    Line::from(""),
  ];

  for field in Field::all() {
    lines.push(Line::from(vec![
      Span::styled(
        format!("{:<16}", field.label()),
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      ),
      Span::raw(record.value(field)),
    ]));
  }

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    "[e] edit again   [n] new submission",
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines), inner);
}

fn headline(outcome: Outcome) -> (&'static str, Color) {
  match outcome {
    Outcome::Created => ("Application Received", Color::Green),
    Outcome::Updated => ("Update Successful", Color::Green),
    Outcome::UpdateMissed => ("Record No Longer Exists", Color::Yellow),
  }
}
