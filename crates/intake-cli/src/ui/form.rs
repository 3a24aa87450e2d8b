//! Form view: one row per field with its inline error.

use intake_core::{
  record::{Field, Gender, ServiceType, Skill},
  slot::Slot,
};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use strum::IntoEnumIterator;

use crate::app::{App, Focus, InputKind, input_kind};

const LABEL_WIDTH: usize = 16;

/// Render the form into `area`.
pub fn draw<S: Slot>(f: &mut Frame, area: Rect, app: &App<S>) {
  let session = &app.session;
  let title = if session.is_editing() {
    " Edit Submission "
  } else {
    " New Submission "
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let focus = app.focus();
  let mut lines: Vec<Line> = Vec::new();

  for field in Field::all() {
    let focused = focus == Focus::Field(field);
    let label_style = if focused {
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };

    let mut spans = vec![
      Span::styled(if focused { "▸ " } else { "  " }, label_style),
      Span::styled(
        format!("{:<LABEL_WIDTH$}", format!("{} *", field.label())),
        label_style,
      ),
    ];
    spans.extend(value_spans(app, field, focused));
    lines.push(Line::from(spans));

    if let Some(message) = session.error(field) {
      lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH + 2)),
        Span::styled(message.to_owned(), Style::default().fg(Color::Red)),
      ]));
    }
  }

  lines.push(Line::from(""));
  let button = if session.is_editing() {
    "[ Update ]"
  } else {
    "[ Submit ]"
  };
  let button_style = if focus == Focus::Submit {
    Style::default()
      .fg(Color::Black)
      .bg(Color::Green)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Green)
  };
  lines.push(Line::from(vec![
    Span::raw(" ".repeat(LABEL_WIDTH + 2)),
    Span::styled(button, button_style),
  ]));

  f.render_widget(Paragraph::new(lines), inner);
}

fn value_spans<S: Slot>(app: &App<S>, field: Field, focused: bool) -> Vec<Span<'static>> {
  let draft = app.session.draft();
  match input_kind(field) {
    InputKind::Text => {
      let mut value = draft.value(field);
      if focused {
        value.push('_');
      }
      vec![Span::raw(value)]
    }
    InputKind::Skills => Skill::iter()
      .enumerate()
      .map(|(i, skill)| {
        let selected = draft.skills.contains(&skill);
        let mut style = if selected {
          Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
          Style::default().fg(Color::DarkGray)
        };
        if focused && i == app.skill_cursor {
          style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }
        Span::styled(format!(" {skill} "), style)
      })
      .flat_map(|chip| [chip, Span::raw(" ")])
      .collect(),
    InputKind::Choice => {
      let current = draft.value(field);
      let shown = if current.is_empty() {
        match field {
          Field::Gender => "Select gender",
          _ => "Select service",
        }
        .to_owned()
      } else {
        current
      };
      let options = match field {
        Field::Gender => Gender::iter().count(),
        _ => ServiceType::iter().count(),
      };
      let style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      vec![
        Span::styled(format!("‹ {shown} ›"), style),
        Span::styled(
          format!("  ({options} options)"),
          Style::default().fg(Color::DarkGray),
        ),
      ]
    }
  }
}
