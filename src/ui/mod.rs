use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::{
    app::{App, ConversionMode, Focus, UiState, detail_fields},
    service::{ConversionResult, ResultKind},
    theme::Palette,
};

const TITLE: &str = concat!("magnetbit - Torrent ⇄ Magnet v", env!("CARGO_PKG_VERSION"));

pub fn draw(frame: &mut Frame, app: &App) {
    let p = app.palette();
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(p.bg)), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(area);

    draw_top_bar(frame, layout[0], app, &p);
    draw_mode_tabs(frame, layout[1], app.mode(), &p);
    draw_input(frame, layout[2], app, &p);
    match app.ui_state() {
        UiState::Idle => draw_idle(frame, layout[3], app.mode(), &p),
        UiState::Loading => draw_loading(frame, layout[3], app.mode(), &p),
        UiState::Success => {
            if let Some(result) = app.result() {
                draw_result(frame, layout[3], app, result, &p);
            }
        }
        UiState::Error => draw_error(frame, layout[3], app.error_message().unwrap_or(""), &p),
    }
    draw_hints(frame, layout[4], app, &p);

    if let Some(toast) = app.toast() {
        draw_toast(frame, &toast.message, &p);
    }
    if app.show_help() {
        draw_help_modal(frame, app.help_scroll(), &p);
    }
}

fn draw_top_bar(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let block = Block::default().style(Style::default().bg(p.accent).fg(p.on_accent));
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(TITLE))
            .style(Style::default().fg(p.on_accent))
            .alignment(Alignment::Left),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(format!("[theme: {}] [?: Help]", app.theme())))
            .style(Style::default().fg(p.on_accent))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_mode_tabs(frame: &mut Frame, area: Rect, mode: ConversionMode, p: &Palette) {
    let tab = |m: ConversionMode, key: &str| {
        let label = format!(" [{key}] {} ", m.title());
        if m == mode {
            Span::styled(label, Style::default().bg(p.accent).fg(p.on_accent))
        } else {
            Span::styled(label, Style::default().fg(p.muted))
        }
    };
    let line = Line::from(vec![
        tab(ConversionMode::TorrentToMagnet, "1"),
        Span::raw("  "),
        tab(ConversionMode::MagnetToTorrent, "2"),
    ]);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(p.border))
        .style(Style::default().bg(p.bg));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let focused = app.focus() == Focus::Input;
    let border = if focused { p.accent } else { p.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(p.panel))
        .title(Span::styled(
            app.mode().input_label(),
            Style::default().fg(border),
        ));
    let inner = block.inner(area);

    if app.input().is_empty() {
        let hint = Paragraph::new(app.mode().placeholder())
            .block(block)
            .style(Style::default().fg(p.muted));
        frame.render_widget(hint, area);
        if focused {
            frame.set_cursor_position((inner.x, inner.y));
        }
        return;
    }

    let (visible, cursor_x) = visible_input(app.input(), app.input_cursor(), inner.width);
    frame.render_widget(
        Paragraph::new(visible)
            .block(block)
            .style(Style::default().fg(p.text)),
        area,
    );
    if focused {
        if let Some(x) = cursor_x {
            frame.set_cursor_position((inner.x + x.saturating_sub(1), inner.y));
        }
    }
}

fn draw_idle(frame: &mut Frame, area: Rect, mode: ConversionMode, p: &Palette) {
    let what = match mode {
        ConversionMode::TorrentToMagnet => "Paste a link to a .torrent file and press Enter.",
        ConversionMode::MagnetToTorrent => "Paste a magnet link and press Enter.",
    };
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(what, Style::default().fg(p.text))),
    ]);
    frame.render_widget(
        Paragraph::new(text)
            .block(Block::default().style(Style::default().bg(p.bg)))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_loading(frame: &mut Frame, area: Rect, mode: ConversionMode, p: &Palette) {
    let what = match mode {
        ConversionMode::TorrentToMagnet => "Converting torrent to magnet link...",
        ConversionMode::MagnetToTorrent => "Building torrent link...",
    };
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            what,
            Style::default().fg(p.highlight).add_modifier(Modifier::BOLD),
        )),
    ]);
    frame.render_widget(
        Paragraph::new(text).block(Block::default().style(Style::default().bg(p.bg))),
        area,
    );
}

fn draw_error(frame: &mut Frame, area: Rect, message: &str, p: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.error))
        .style(Style::default().bg(p.bg))
        .title(Span::styled("Error", Style::default().fg(p.error)));
    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(p.text))),
        Line::from(""),
        Line::from(Span::styled(
            "Edit the input and press Enter to try again",
            Style::default().fg(p.muted),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_result(frame: &mut Frame, area: Rect, app: &App, result: &ConversionResult, p: &Palette) {
    let title = match result.kind {
        ResultKind::MagnetUri => "Magnet link",
        ResultKind::TorrentLink => "Torrent link",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent))
        .style(Style::default().bg(p.bg))
        .title(Span::styled(title, Style::default().fg(p.accent)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let value_height =
        wrapped_height(&result.value, inner.width).min(inner.height.saturating_sub(2));
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(value_height),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(result.value.as_str())
            .style(Style::default().fg(p.highlight))
            .wrap(Wrap { trim: false }),
        sections[0],
    );
    draw_result_actions(frame, sections[1], app, p);

    if let Some(meta) = result.metadata.as_ref() {
        let rows: Vec<Row> = detail_fields(meta)
            .into_iter()
            .map(|field| {
                Row::new(vec![
                    Cell::from(Span::styled(field.label, Style::default().fg(p.muted))),
                    Cell::from(Span::styled(field.value, Style::default().fg(p.text))),
                ])
            })
            .collect();
        let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(10)])
            .block(Block::default().title(Span::styled(
                "Torrent details",
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            )))
            .column_spacing(1);
        frame.render_widget(table, sections[2]);
    }
}

fn draw_result_actions(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let key_style = Style::default().fg(p.highlight);
    let label_style = Style::default().fg(p.text);
    let copy = if app.copied() {
        Span::styled(
            "Copied!",
            Style::default().fg(p.on_accent).bg(p.accent),
        )
    } else {
        Span::styled("Copy", label_style)
    };
    let line = Line::from(vec![
        Span::styled("[c] ", key_style),
        copy,
        Span::raw("   "),
        Span::styled("[o] ", key_style),
        Span::styled(app.mode().open_label(), label_style),
        Span::raw("   "),
        Span::styled("[r] ", key_style),
        Span::styled("Reset", label_style),
    ]);
    frame.render_widget(Paragraph::new(vec![Line::from(""), line]), area);
}

fn draw_hints(frame: &mut Frame, area: Rect, app: &App, p: &Palette) {
    let hint = match app.focus() {
        Focus::Input => "[Enter] Convert  [Tab/Esc] Actions  [Ctrl+C] Quit",
        Focus::Actions => {
            "[c] Copy  [o] Open  [r] Reset  [m] Mode  [t] Theme  [i] Input  [q] Quit"
        }
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(p.muted).bg(p.bg)),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(app.status())
            .style(Style::default().fg(p.accent).bg(p.bg))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_toast(frame: &mut Frame, message: &str, p: &Palette) {
    let area = frame.area();
    let width = (message.chars().count() as u16 + 4).min(area.width);
    let rect = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + 1,
        width,
        3.min(area.height),
    );
    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent))
        .style(Style::default().bg(p.panel));
    frame.render_widget(
        Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(p.accent))
            .alignment(Alignment::Center),
        rect,
    );
}

fn draw_help_modal(frame: &mut Frame, scroll: u16, p: &Palette) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(""),
        Line::from("Input"),
        Line::from("  [Enter]      Convert"),
        Line::from("  [Tab/Esc]    Go to actions"),
        Line::from("  [←/→/Home/End]  Move cursor"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  [c]  Copy result"),
        Line::from("  [o]  Open magnet in torrent client / download .torrent"),
        Line::from("  [r]  Reset"),
        Line::from("  [m]  Switch mode (or [1] / [2])"),
        Line::from("  [t]  Cycle theme"),
        Line::from("  [i]  Back to input"),
        Line::from(""),
        Line::from("Exit"),
        Line::from("  [q] / [Ctrl+C]  Quit"),
        Line::from(""),
        Line::from("Magnet → torrent links are built locally from the info hash"),
        Line::from("and point at a third-party cache; they may not resolve."),
        Line::from(""),
        Line::from("Press ? / x / Esc to close"),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.highlight))
        .style(Style::default().bg(p.bg).fg(p.text))
        .title(Span::styled("Help", Style::default().fg(p.highlight)));
    let inner = block.inner(area);
    let view_height = inner.height.saturating_sub(1) as usize;
    let max_scroll = lines.len().saturating_sub(view_height) as u16;
    let scroll = scroll.min(max_scroll);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(block).scroll((scroll, 0)),
        area,
    );
    if max_scroll > 0 {
        let indicator_area = Rect::new(
            inner.x,
            inner.y + inner.height.saturating_sub(1),
            inner.width,
            1,
        );
        frame.render_widget(
            Paragraph::new(format!("Scroll {scroll}/{max_scroll}"))
                .style(Style::default().fg(p.muted))
                .alignment(Alignment::Right),
            indicator_area,
        );
    }
}

fn wrapped_height(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    let chars = text.chars().count().max(1);
    chars.div_ceil(width as usize).min(u16::MAX as usize) as u16
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Window of `input` that keeps the cursor visible, plus the cursor column
/// (1-based) inside that window.
fn visible_input(input: &str, cursor: usize, area_width: u16) -> (String, Option<u16>) {
    let content_width = area_width as usize;
    if content_width == 0 {
        return (String::new(), None);
    }
    let chars: Vec<char> = input.chars().collect();
    let start = cursor
        .saturating_sub(content_width - 1)
        .min(chars.len());
    let end = (start + content_width).min(chars.len());
    let visible: String = chars[start..end].iter().collect();
    let cursor_x = (cursor.saturating_sub(start) as u16).min(content_width as u16);
    (visible, Some(cursor_x + 1))
}
