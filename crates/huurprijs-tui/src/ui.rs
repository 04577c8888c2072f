use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use huurprijs_core::{FieldId, Role};
use crate::app::{App, ServiceStatus};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let [chat_area, form_area] = Layout::horizontal([
        Constraint::Percentage(60),
        Constraint::Percentage(40),
    ])
    .areas(body_area);

    render_chat(app, frame, chat_area);
    render_form(app, frame, form_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let (status_text, status_color) = match app.service_status {
        ServiceStatus::Unknown => ("checking", Color::DarkGray),
        ServiceStatus::Online => ("online", Color::Green),
        ServiceStatus::Offline => ("offline", Color::Red),
    };

    let title = Line::from(vec![
        Span::styled(" Huurprijs voorspeller (Amsterdam) ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(app.client.base_url().to_string(), Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(format!("[{}]", status_text), Style::default().fg(status_color)),
    ]);

    frame.render_widget(Paragraph::new(title), area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let submitting = app.controller.state().is_submitting();

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ");

    // Remember inner size for scroll calculations
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let mut lines: Vec<Line> = Vec::new();

    for msg in app.controller.transcript().iter() {
        match msg.role() {
            Role::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
            }
            Role::Assistant => {
                lines.push(Line::from(Span::styled(
                    "Assistant:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
            }
        }
        for line in msg.content().lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::default());
    }

    if submitting {
        lines.push(Line::from(Span::styled(
            "Assistant:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_form(app: &App, frame: &mut Frame, area: Rect) {
    let error_height = if app.visible_error().is_some() { 4 } else { 0 };

    let mut constraints: Vec<Constraint> = FieldId::ALL.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(error_height));
    constraints.push(Constraint::Min(0));
    let rows = Layout::vertical(constraints).split(area);

    for (i, field) in FieldId::ALL.iter().enumerate() {
        render_field(app, frame, rows[i], *field);
    }

    if let Some(error) = app.visible_error() {
        let banner = Paragraph::new(error.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to hide, Enter to retry) "),
            );
        frame.render_widget(banner, rows[FieldId::ALL.len()]);
    }
}

fn render_field(app: &App, frame: &mut Frame, area: Rect, field: FieldId) {
    let focused = app.focused_field() == field;
    let invalid = app.controller.invalid_fields().contains(&field);

    let border_color = if invalid {
        Color::Red
    } else if focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let title = match field.unit() {
        Some(unit) => format!(" {} ({}) ", field.label(), unit),
        None => format!(" {} ", field.label()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let value = app.controller.fields().get(field);

    // Horizontal scrolling keeps the cursor visible in narrow inputs
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = if focused { app.cursor } else { 0 };
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = value.chars().skip(scroll_offset).take(inner_width).collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(if invalid { Color::Red } else { Color::Cyan }))
        .block(block);

    frame.render_widget(input, area);

    if focused && area.height > 2 {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mode = if app.controller.state().is_submitting() {
        Span::styled(" WAITING ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        Span::styled(" FORM ", Style::default().bg(Color::Blue).fg(Color::White))
    };

    let hints = vec![
        mode,
        Span::raw(" "),
        Span::styled(" Tab ", key_style),
        Span::styled(" next field ", label_style),
        Span::styled(" Enter ", key_style),
        Span::styled(" predict ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(if app.visible_error().is_some() { " hide error " } else { " quit " }, label_style),
    ];

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use huurprijs_core::client::DEFAULT_TIMEOUT;
    use huurprijs_core::PredictionClient;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn app() -> App {
        App::with_client(PredictionClient::new("http://127.0.0.1:1", DEFAULT_TIMEOUT).unwrap())
    }

    #[test]
    fn test_renders_welcome_and_fields() {
        let mut app = app();
        let text = screen_text(&mut app);
        assert!(text.contains("Assistant:"));
        assert!(text.contains("Living area (m²)"));
        assert!(text.contains("Floors"));
    }

    #[test]
    fn test_renders_thinking_while_submitting() {
        let mut app = app();
        app.controller.submit();
        let text = screen_text(&mut app);
        assert!(text.contains("You:"));
        assert!(text.contains("Thinking."));
        assert!(text.contains("WAITING"));
    }

    #[test]
    fn test_renders_error_banner() {
        let mut app = app();
        app.controller.submit();
        app.finish_prediction(Err(huurprijs_core::PredictError::Timeout));
        let text = screen_text(&mut app);
        assert!(text.contains("prediction service"));
        assert!(text.contains("Error (Esc to hide"));
        assert!(text.contains("hide error"));
    }
}
