use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};
use roast_core::history::MAX_SAVED;
use roast_core::snippets::{endpoint_line, Language, REQUEST_SCHEMA, RESPONSE_SCHEMA};
use roast_core::submission::SubmissionState;
use textwrap::wrap;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, DocsState, Focus};
use crate::strings::{
    build_status_line, format_timestamp, help_lines_ascii, title_saved_view, INPUT_HINT,
    RESPONSE_EMPTY, SAVED_EMPTY, TITLE_APP, TITLE_DOCS, TITLE_HELP, TITLE_INPUT, TITLE_RESPONSE,
    TITLE_SAVED,
};
use crate::theme::{self, Theme};

pub fn draw(f: &mut Frame, app: &mut App) {
    let th = theme::for_mode(app.dark);
    f.render_widget(
        Block::default().style(Style::default().bg(th.bg).fg(th.text)),
        f.area(),
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(f.area());
    draw_header(f, rows[0], app, th);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(36)])
        .split(rows[1]);
    draw_main(f, cols[0], app, th);
    draw_saved(f, cols[1], app, th);
    draw_status(f, rows[2], app, th);

    if let Some(docs) = &app.docs {
        draw_docs(f, f.area(), docs, &app.endpoint, th);
    }
    if app.show_help {
        draw_help(f, f.area(), th);
    }
}

fn border(focused: bool, th: &Theme) -> Style {
    if focused {
        Style::default().fg(th.border_focus)
    } else {
        Style::default().fg(th.border_inactive)
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, th: &Theme) {
    let line = Line::from(vec![
        Span::styled(
            TITLE_APP,
            Style::default().fg(th.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(endpoint_line(&app.endpoint), Style::default().fg(th.muted)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &mut App, th: &Theme) {
    let inner_width = area.width.saturating_sub(2);
    let wanted = measure_total_lines(app.controller.content(), inner_width).max(1) as u16;
    app.input_visible_lines = wanted.clamp(3, app.input_max_lines);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(app.input_visible_lines + 2),
            Constraint::Min(3),
        ])
        .split(area);
    draw_input(f, chunks[0], app, th);
    app.response_area = Some(chunks[1]);
    draw_response(f, chunks[1], app, th);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App, th: &Theme) {
    let focused = matches!(app.focus, Focus::Input) && app.docs.is_none() && !app.show_help;
    let block = Block::default()
        .title(TITLE_INPUT)
        .borders(Borders::ALL)
        .border_style(border(focused, th));
    let inner_width = area.width.saturating_sub(2);
    let content = app.controller.content();
    let graphemes: Vec<&str> = content.graphemes(true).collect();
    let upto = app.input_cursor.min(graphemes.len());
    let (line_idx, col) = measure_prefix_line_col(&graphemes, upto, inner_width);
    let offset_y = line_idx.saturating_sub(app.input_visible_lines.saturating_sub(1));

    let para = if content.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            INPUT_HINT,
            Style::default().fg(th.muted),
        )))
        .block(block)
    } else {
        Paragraph::new(content.to_string())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((offset_y, 0))
    };
    f.render_widget(para, area);

    if focused {
        f.set_cursor_position(Position::new(
            area.x + 1 + col,
            area.y + 1 + line_idx.saturating_sub(offset_y),
        ));
    }
}

fn draw_response(f: &mut Frame, area: Rect, app: &mut App, th: &Theme) {
    let (title, text, style) = if let Some(entry) = app.viewed_entry() {
        (
            title_saved_view(&format_timestamp(entry.timestamp)),
            entry.response.clone(),
            Style::default().fg(th.text),
        )
    } else {
        let state = app.controller.state();
        let title = match state {
            SubmissionState::Pending => format!("{}({}) ", TITLE_RESPONSE, state.label()),
            _ => TITLE_RESPONSE.to_string(),
        };
        match app.controller.response() {
            Some(r) => {
                let style = if state == SubmissionState::Failed {
                    Style::default().fg(th.error)
                } else {
                    Style::default().fg(th.text)
                };
                (title, r.to_string(), style)
            }
            None => (title, RESPONSE_EMPTY.to_string(), Style::default().fg(th.muted)),
        }
    };

    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(th.accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(border(false, th));
    let inner_w = area.width.saturating_sub(2);
    let inner_h = area.height.saturating_sub(2);
    let para = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: false });
    // measured before the block is attached so borders are not counted
    let total = para.line_count(inner_w);
    let max_scroll = total.saturating_sub(inner_h as usize) as u16;
    app.response_viewport = inner_h;
    app.response_scroll = app.response_scroll.min(max_scroll);

    let para = para.block(block).scroll((app.response_scroll, 0));
    f.render_widget(para, area);

    if total > inner_h as usize {
        let inner = Rect {
            x: area.x.saturating_add(1),
            y: area.y.saturating_add(1),
            width: inner_w,
            height: inner_h,
        };
        let mut sb_state =
            ScrollbarState::new(max_scroll as usize + 1).position(app.response_scroll as usize);
        let sb = Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(sb, inner, &mut sb_state);
    }
}

fn draw_saved(f: &mut Frame, area: Rect, app: &App, th: &Theme) {
    let focused = matches!(app.focus, Focus::Saved);
    let block = Block::default()
        .title(Span::styled(
            format!("{}{}/{} ", TITLE_SAVED, app.saved.len(), MAX_SAVED),
            Style::default().fg(th.accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(border(focused, th));
    // room for borders, marker and a trailing "..."
    let width = area.width.saturating_sub(7) as usize;
    let mut lines: Vec<Line> = Vec::new();
    if app.saved.is_empty() {
        lines.push(Line::from(Span::styled(
            SAVED_EMPTY,
            Style::default().fg(th.muted),
        )));
    }
    for (i, e) in app.saved.entries().iter().enumerate() {
        let selected = i == app.saved_selected;
        let marker = if selected && focused { "> " } else { "  " };
        let style = if selected && focused {
            Style::default()
                .fg(th.selected_fg)
                .bg(th.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else if app.viewing.as_deref() == Some(e.id.as_str()) {
            Style::default().fg(th.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(th.text)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", marker, format_timestamp(e.timestamp)),
            Style::default().fg(th.muted),
        )));
        for l in preview_lines(&e.content, width, 2) {
            lines.push(Line::from(Span::styled(format!("{}{}", marker, l), style)));
        }
        lines.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App, th: &Theme) {
    let focus = match app.focus {
        Focus::Input => "Input",
        Focus::Saved => "Saved",
    };
    let notice = app.notice.as_ref().map(|(n, _)| n);
    let text = build_status_line(
        app.controller.state().label(),
        focus,
        (app.saved.len(), MAX_SAVED),
        notice.map(|n| n.text.as_str()),
        app.controller.is_pending(),
        area.width,
    );
    let style = match notice {
        Some(n) if n.is_error() => Style::default().fg(th.error),
        Some(_) => Style::default().fg(th.success),
        None => Style::default().fg(th.muted),
    };
    f.render_widget(Paragraph::new(Span::styled(text, style)), area);
}

fn draw_docs(f: &mut Frame, area: Rect, docs: &DocsState, endpoint: &str, th: &Theme) {
    let popup_area = centered_rect(80, 85, area);
    let heading = Style::default().fg(th.accent).add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Endpoint", heading)),
        Line::from(endpoint_line(endpoint)),
        Line::from(""),
        Line::from(Span::styled("Request Body", heading)),
    ];
    lines.extend(REQUEST_SCHEMA.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Response", heading)));
    lines.extend(RESPONSE_SCHEMA.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));

    let mut tabs: Vec<Span> = Vec::new();
    for lang in Language::ALL {
        let style = if lang == docs.language {
            Style::default()
                .fg(th.selected_fg)
                .bg(th.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(th.muted)
        };
        tabs.push(Span::styled(format!(" {} ", lang.label()), style));
        tabs.push(Span::raw(" "));
    }
    lines.push(Line::from(tabs));
    lines.push(Line::from(Span::styled(
        "Left/Right: language    Up/Down: scroll    Esc: close",
        Style::default().fg(th.muted),
    )));
    lines.push(Line::from(""));
    lines.extend(
        docs.language
            .snippet(endpoint)
            .lines()
            .map(|l| Line::from(l.to_string())),
    );

    let block = Block::default()
        .title(Span::styled(TITLE_DOCS, heading))
        .borders(Borders::ALL)
        .style(Style::default().bg(th.bg).fg(th.text));
    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((docs.scroll, 0));
    f.render_widget(Clear, popup_area);
    f.render_widget(para, popup_area);
}

fn draw_help(f: &mut Frame, area: Rect, th: &Theme) {
    let popup_area = centered_rect(70, 70, area);
    let block = Block::default()
        .title(Span::styled(
            TITLE_HELP,
            Style::default().fg(th.accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .style(Style::default().bg(th.bg).fg(th.text));
    let lines = help_lines_ascii()
        .iter()
        .map(|s| Line::from(*s))
        .collect::<Vec<Line>>();
    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, popup_area);
    f.render_widget(para, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1]);
    horiz[1]
}

/// First `max_lines` wrapped lines of `s`, with "..." when something was cut.
fn preview_lines(s: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = wrap(s.trim(), width.max(1))
        .into_iter()
        .map(|c| c.into_owned())
        .collect();
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push_str("...");
        }
    }
    lines
}

fn measure_total_lines(s: &str, width: u16) -> usize {
    if width == 0 {
        return 1;
    }
    let mut lines = 1usize;
    let mut col = 0usize;
    for g in s.graphemes(true) {
        if g == "\n" {
            lines += 1;
            col = 0;
            continue;
        }
        let w = UnicodeWidthStr::width(g);
        if col + w > width as usize {
            lines += 1;
            col = 0;
        }
        col += w;
    }
    lines
}

fn measure_prefix_line_col(graphemes: &[&str], upto: usize, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }
    let mut line = 0usize;
    let mut col = 0usize;
    for g in graphemes.iter().take(upto) {
        if *g == "\n" {
            line += 1;
            col = 0;
            continue;
        }
        let w = UnicodeWidthStr::width(*g);
        if col + w > width as usize {
            line += 1;
            col = 0;
        }
        col += w;
    }
    (line as u16, col as u16)
}
