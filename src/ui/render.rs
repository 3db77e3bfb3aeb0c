//! Draws a [`Container`] with ratatui.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::ui::{Container, InputKind, Node, TextField, Tone};

/// Common colors/styles.
const BG: Color = Color::Rgb(0, 0, 0);
const FG: Color = Color::Rgb(255, 255, 255);
const FOCUS_FG: Color = Color::Rgb(120, 200, 255);
const DISABLED_FG: Color = Color::Rgb(70, 70, 70);
const HELP_FG: Color = Color::Rgb(100, 100, 100);
const SUCCESS_FG: Color = Color::Rgb(80, 220, 120);
const ERROR_FG: Color = Color::Rgb(255, 90, 90);
const PENDING_FG: Color = Color::Rgb(240, 200, 80);

const HELP_TEXT: &str = "tab/↑↓ move, ↵ activate, esc quit";

fn node_height(node: &Node) -> u16 {
    match node {
        Node::Field { .. } => 3,
        Node::Button { .. } => 1,
        Node::Status { .. } => 2,
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Info => FG,
        Tone::Pending => PENDING_FG,
        Tone::Success => SUCCESS_FG,
        Tone::Error => ERROR_FG,
    }
}

/// Text shown inside an input box; masked inputs never reveal their value.
pub fn display_value(field: &TextField) -> String {
    let value = field.input.value();
    match field.kind {
        InputKind::Text => value.to_string(),
        InputKind::Masked => "•".repeat(value.chars().count()),
    }
}

/// Renders the whole screen: header, the container's widgets and a help line.
pub fn draw(frame: &mut Frame, title: &str, container: &Container) {
    let area = frame.area();

    let padding_block = Block::default()
        .padding(Padding::uniform(1))
        .style(Style::default().bg(BG));
    frame.render_widget(&padding_block, area);
    let padded_area = padding_block.inner(area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(padded_area);

    let header = Paragraph::new(Line::from(Span::styled(
        format!(" tokbar · {title}"),
        Style::default().fg(FG).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(header, layout[0]);

    draw_nodes(frame, layout[1], container);

    let help = Paragraph::new(HELP_TEXT)
        .alignment(Alignment::Center)
        .style(Style::default().fg(HELP_FG));
    frame.render_widget(help, layout[2]);
}

fn draw_nodes(frame: &mut Frame, area: Rect, container: &Container) {
    let nodes = container.nodes();
    let mut constraints: Vec<Constraint> = nodes
        .iter()
        .map(|node| Constraint::Length(node_height(node)))
        .collect();
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, (node, row)) in nodes.iter().zip(rows.iter()).enumerate() {
        let focused = container.focus_index() == Some(idx);
        match node {
            Node::Field { label, field } => draw_field(frame, *row, &label.text, field, focused),
            Node::Button { label, enabled, .. } => {
                let style = if !enabled {
                    Style::default().fg(DISABLED_FG)
                } else if focused {
                    Style::default().fg(BG).bg(FOCUS_FG)
                } else {
                    Style::default().fg(FG)
                };
                frame.render_widget(
                    Paragraph::new(Span::styled(format!("[ {label} ]"), style)),
                    *row,
                );
            }
            Node::Status { text, tone } => {
                let status = Paragraph::new(text.as_str())
                    .style(Style::default().fg(tone_color(*tone)))
                    .wrap(Wrap { trim: true });
                frame.render_widget(status, *row);
            }
        }
    }
}

fn draw_field(frame: &mut Frame, area: Rect, label: &str, field: &TextField, focused: bool) {
    let border = if focused { FOCUS_FG } else { HELP_FG };
    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    frame.render_widget(&block, area);
    let inner = block.inner(area);

    let text = display_value(field);
    let paragraph = if text.is_empty() {
        Paragraph::new(field.placeholder.as_str()).style(Style::default().fg(HELP_FG))
    } else {
        Paragraph::new(text).style(Style::default().fg(FG))
    };
    frame.render_widget(paragraph, inner);

    if focused {
        let cursor_x = inner.x + field.input.cursor() as u16;
        frame.set_cursor_position(Position::new(cursor_x, inner.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_input::Input;

    #[test]
    fn masked_values_render_as_bullets() {
        let field = TextField {
            id: "pw".to_string(),
            placeholder: String::new(),
            kind: InputKind::Masked,
            input: Input::new("héllo".to_string()),
        };
        assert_eq!(display_value(&field), "•••••");

        let plain = TextField {
            kind: InputKind::Text,
            ..field
        };
        assert_eq!(display_value(&plain), "héllo");
    }

    #[test]
    fn draws_without_panicking_on_small_terminal() {
        use crate::ui::Surface;
        use crate::views::field::{labeled_input, FieldSpec};
        use ratatui::backend::TestBackend;

        let mut container = Container::new("app");
        labeled_input(&mut container, FieldSpec::masked("Password", "pw", ""));
        container.append_button("go", "Go");
        let status = container.append_status();
        container.set_status(status, Tone::Error, "nope");

        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal
            .draw(|frame| draw(frame, "test", &container))
            .unwrap();
    }
}
