//! Rendering routines for the infobuddy TUI.

use crate::app::{App, FeedbackStage, Focus, LoginField, Screen};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

const PRIMARY: Color = Color::Rgb(86, 156, 214);
const TEXT: Color = Color::Rgb(238, 238, 238);
const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);
const BORDER: Color = Color::Rgb(60, 60, 60);
const BORDER_ACTIVE: Color = Color::Rgb(86, 156, 214);
const YELLOW: Color = Color::Rgb(229, 192, 123);
const RED: Color = Color::Rgb(255, 110, 110);
const GREEN: Color = Color::Rgb(121, 184, 130);

const SIDEBAR_WIDTH: u16 = 26;
const HEADER_HEIGHT: u16 = 4;

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    match app.screen {
        Screen::Login => draw_login(frame, app),
        Screen::Chat => draw_chat_screen(frame, app),
    }
}

/// Draw the credential gate. Nothing else renders until it passes.
fn draw_login(frame: &mut Frame<'_>, app: &App) {
    let area = centered_rect(frame.area(), 46, 11);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_ACTIVE))
        .title(Span::styled(
            format!(" {} — Log in ", app.title),
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let field_style = |field: LoginField| {
        if app.login_field == field {
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_MUTED)
        }
    };
    let masked: String = "•".repeat(app.password_input.chars().count());

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Username ", field_style(LoginField::Username)),
            Span::styled(app.username_input.as_str(), Style::default().fg(TEXT)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Password ", field_style(LoginField::Password)),
            Span::styled(masked.as_str(), Style::default().fg(TEXT)),
        ]),
        Line::from(""),
    ];
    if let Some(error) = &app.login_error {
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(RED),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Tab switch field · Enter log in · Esc quit",
        Style::default().fg(TEXT_MUTED),
    )));

    frame.render_widget(Paragraph::new(lines), inner);

    // Cursor at the end of the focused field.
    let (row, len) = match app.login_field {
        LoginField::Username => (1, app.username_input.chars().count()),
        LoginField::Password => (3, app.password_input.chars().count()),
    };
    frame.set_cursor_position((inner.x + 10 + len as u16, inner.y + row));
}

/// Draw the chat screen: sidebar plus main panel.
fn draw_chat_screen(frame: &mut Frame<'_>, app: &mut App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(frame.area());

    draw_sidebar(frame, app, cols[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(cols[1]);

    draw_header(frame, app, rows[0]);
    draw_transcript(frame, app, rows[1]);
    draw_input(frame, app, rows[2]);
    draw_status_bar(frame, app, rows[3]);
}

/// Draw the sidebar: optional logo banner, chat history, shortcut hints.
fn draw_sidebar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let focused = app.focus == Focus::Sidebar;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { BORDER_ACTIVE } else { BORDER }))
        .title(Span::styled(" Chat History ", Style::default().fg(TEXT_MUTED)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line<'_>> = Vec::new();

    if let Some(logo) = &app.logo {
        for logo_line in logo.lines() {
            lines.push(Line::from(Span::styled(
                logo_line.to_string(),
                Style::default().fg(PRIMARY),
            )));
        }
        lines.push(Line::from(""));
    }

    if app.session.chats().is_empty() {
        lines.push(Line::from(Span::styled(
            " no chats yet",
            Style::default().fg(TEXT_MUTED),
        )));
    }
    for (idx, chat) in app.session.chats().iter().enumerate() {
        let selected = idx == app.selected_chat;
        let active = app.session.current_chat.as_ref() == Some(&chat.id);
        let marker = if active { "●" } else { " " };
        let style = if selected && focused {
            Style::default()
                .fg(Color::Rgb(10, 10, 10))
                .bg(PRIMARY)
                .add_modifier(Modifier::BOLD)
        } else if active {
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT)
        };
        lines.push(Line::from(Span::styled(
            format!(" {marker} {}", chat.alias),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Ctrl+N new chat",
        Style::default().fg(TEXT_MUTED),
    )));
    lines.push(Line::from(Span::styled(
        " Ctrl+D delete chat",
        Style::default().fg(TEXT_MUTED),
    )));
    lines.push(Line::from(Span::styled(
        " Tab focus chats",
        Style::default().fg(TEXT_MUTED),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Draw the title and tagline header.
fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active = app
        .session
        .active_alias()
        .map(|alias| format!("  ·  {alias}"))
        .unwrap_or_default();
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}", app.title),
                Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled(active, Style::default().fg(TEXT_MUTED)),
        ]),
        Line::from(Span::styled(
            format!(" {}", app.tagline),
            Style::default()
                .fg(TEXT_MUTED)
                .add_modifier(Modifier::ITALIC),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Draw the chat transcript with border and scrollbar.
fn draw_transcript(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let lines = app.render_lines();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER));

    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1); // -1 for scrollbar
    let content_height = inner.height as usize;

    // ratatui's own line_count gives the exact wrapped total, avoiding any
    // mismatch with a hand-written wrap estimator.
    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);

    let max_scroll = total_lines.saturating_sub(content_height) as u16;
    app.update_scroll_bounds(max_scroll);
    let scroll = app.scroll;

    let transcript_inner = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };

    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(block, area);
    frame.render_widget(transcript, transcript_inner);

    if total_lines > content_height {
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines)
            .position(scroll as usize)
            .viewport_content_length(content_height);
        let scrollbar_area = Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: inner.height,
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(BORDER))
                .thumb_style(Style::default().fg(TEXT_MUTED)),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

/// Draw the input box. It doubles as the explanation field while feedback
/// text is being collected.
fn draw_input(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let collecting_explanation = matches!(
        app.pending_feedback.as_ref().map(|pending| pending.stage),
        Some(FeedbackStage::Explain)
    );
    let is_active = !app.thinking && app.focus == Focus::Input;

    let (title, buffer, placeholder) = if collecting_explanation {
        (
            " Explanation (optional) — Enter save · Esc discard ",
            app.pending_feedback
                .as_ref()
                .map(|pending| pending.text.as_str())
                .unwrap_or(""),
            "Why this rating?",
        )
    } else if app.thinking {
        (" Input ", app.input.as_str(), "waiting for the reply...")
    } else {
        (" Input ", app.input.as_str(), "Questions go here")
    };

    let border_color = if collecting_explanation {
        YELLOW
    } else if is_active {
        BORDER_ACTIVE
    } else {
        BORDER
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(title, Style::default().fg(TEXT_MUTED)));
    let inner = block.inner(area);

    let input_text = if buffer.is_empty() {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(placeholder, Style::default().fg(TEXT_MUTED)),
        ])
    } else {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(buffer, Style::default().fg(TEXT)),
        ])
    };

    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(input_text), inner);

    if is_active || collecting_explanation {
        frame.set_cursor_position((inner.x + 1 + buffer.chars().count() as u16, inner.y));
    }
}

/// Draw the status bar: shortcuts on the left, status (and spinner) on the
/// right, rating prompt while feedback is pending.
fn draw_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rating_pending = matches!(
        app.pending_feedback.as_ref().map(|pending| pending.stage),
        Some(FeedbackStage::Rate)
    );

    let shortcuts = if rating_pending {
        vec![
            Span::styled(" Rate this reply:", Style::default().fg(YELLOW)),
            Span::styled("  Ctrl+Y", Style::default().fg(GREEN)),
            Span::styled(" helpful", Style::default().fg(TEXT_MUTED)),
            Span::styled("  Ctrl+B", Style::default().fg(RED)),
            Span::styled(" not helpful", Style::default().fg(TEXT_MUTED)),
        ]
    } else {
        vec![
            Span::styled(" Ctrl+C", Style::default().fg(TEXT_MUTED)),
            Span::styled(" quit", Style::default().fg(BORDER)),
            Span::styled("  Ctrl+N", Style::default().fg(TEXT_MUTED)),
            Span::styled(" new", Style::default().fg(BORDER)),
            Span::styled("  Ctrl+D", Style::default().fg(TEXT_MUTED)),
            Span::styled(" delete", Style::default().fg(BORDER)),
            Span::styled("  PgUp/PgDn", Style::default().fg(TEXT_MUTED)),
            Span::styled(" scroll", Style::default().fg(BORDER)),
        ]
    };

    let right_text = if app.thinking {
        format!(" {} {} ", app.spinner(), app.status)
    } else {
        format!(" {} ", app.status)
    };
    let status_color = if app.thinking {
        PRIMARY
    } else if app.status == "idle" {
        TEXT_MUTED
    } else {
        YELLOW
    };

    let right_len = right_text.chars().count() as u16;
    let left_area = Rect {
        width: area.width.saturating_sub(right_len),
        ..area
    };
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_len),
        width: right_len,
        ..area
    };

    frame.render_widget(Paragraph::new(Line::from(shortcuts)), left_area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right_text,
            Style::default().fg(status_color),
        ))),
        right_area,
    );
}

/// Center a fixed-size rect inside an area, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
