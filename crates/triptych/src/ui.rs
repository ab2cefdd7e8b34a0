use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use pagecore::SourceKind;

use crate::app::App;
use crate::ui_state::{Mode, StatusLevel};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Panes
            Constraint::Length(2), // Status bar
        ])
        .split(f.size());

    draw_title_bar(f, app, chunks[0]);

    if matches!(app.ui_state.mode, Mode::Help) {
        draw_help(f, chunks[1]);
    } else {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        draw_editor_pane(f, app, panes[0]);
        draw_preview_pane(f, app, panes[1]);
    }

    draw_status_bar(f, app, chunks[2]);
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        "  Triptych -- preview: {}",
        app.sandbox.page_path().display()
    );
    let style = Style::default()
        .bg(parse_hex_color(app.config.theme.status_background.as_deref())
            .unwrap_or(Color::Blue))
        .fg(Color::White);
    let title_bar = Paragraph::new(title)
        .style(style)
        .alignment(Alignment::Left);
    f.render_widget(title_bar, area);
}

fn draw_editor_pane(f: &mut Frame, app: &mut App, area: Rect) {
    let accent =
        parse_hex_color(app.config.theme.accent_color.as_deref()).unwrap_or(Color::Yellow);

    // Tab strip with the active pane highlighted.
    let mut tabs: Vec<Span> = vec![Span::raw(" ")];
    for kind in SourceKind::ALL {
        let style = if kind == app.ui_state.active() {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tabs.push(Span::styled(format!(" {} ", kind.label()), style));
        tabs.push(Span::raw(" "));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Line::from(tabs));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let active = app.ui_state.active();
    let line_numbers = app.config.editor.line_numbers;
    let highlight_line = app.config.editor.highlight_current_line;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(if line_numbers { 5 } else { 0 }),
            Constraint::Min(0),
        ])
        .split(inner);

    app.panes
        .get_mut(active)
        .set_viewport_height(inner.height as usize);
    let editor = app.panes.get(active);
    let lines = editor.viewport_lines();
    let offset = editor.viewport_offset();
    let (cursor_line, _) = editor.cursor_position();

    if line_numbers {
        let numbers: Vec<Line> = (0..lines.len())
            .map(|i| Line::from(format!("{:>4} ", offset + i + 1)))
            .collect();
        let widget = Paragraph::new(numbers)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::NONE));
        f.render_widget(widget, chunks[0]);
    }

    let syntax = app.highlighter.syntax_for_kind(active);
    let mut text = app.highlighter.highlight_lines_to_ratatui(&lines, syntax);
    if highlight_line && cursor_line >= offset {
        if let Some(line) = text.get_mut(cursor_line - offset) {
            *line = std::mem::take(line).patch_style(Style::default().bg(Color::Rgb(40, 40, 40)));
        }
    }
    let content = Paragraph::new(text).block(Block::default().borders(Borders::NONE));
    f.render_widget(content, chunks[1]);

    // Cursor
    let editor = app.panes.get(active);
    let x = chunks[1].x + editor.cursor_display_col() as u16;
    let y = chunks[1].y + (cursor_line.saturating_sub(offset)) as u16;
    if x < chunks[1].x + chunks[1].width && y < chunks[1].y + chunks[1].height {
        f.set_cursor(x, y);
    }
}

fn draw_preview_pane(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" RESULT (render #{}) ", app.sandbox.render_count()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<String> = app
        .preview_doc()
        .lines()
        .take(inner.height as usize)
        .map(|l| l.to_string())
        .collect();
    let syntax = app.highlighter.syntax_for_preview();
    let text = app.highlighter.highlight_lines_to_ratatui(&lines, syntax);
    let widget = Paragraph::new(text).block(Block::default().borders(Borders::NONE));
    f.render_widget(widget, inner);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let shortcuts = vec![
        Span::styled("F1-F3", bold()),
        Span::raw(" Pane  "),
        Span::styled("^R", bold()),
        Span::raw(" Run  "),
        Span::styled("^S", bold()),
        Span::raw(" Export  "),
        Span::styled("^O", bold()),
        Span::raw(" Browser  "),
        Span::styled("^N", bold()),
        Span::raw(" Reset  "),
        Span::styled("^G", bold()),
        Span::raw(" Help  "),
        Span::styled("^Q", bold()),
        Span::raw(" Quit"),
    ];
    let shortcut_bar =
        Paragraph::new(Line::from(shortcuts)).style(Style::default().bg(Color::DarkGray));
    f.render_widget(shortcut_bar, chunks[0]);

    let (content, color) = match app.ui_state.status() {
        Some(status) => {
            let color = match status.level {
                StatusLevel::Info => Color::Cyan,
                StatusLevel::Success => Color::Green,
                StatusLevel::Warning => Color::Yellow,
                StatusLevel::Error => Color::Red,
            };
            (status.content.clone(), color)
        }
        None => (String::new(), Color::White),
    };
    let status = Paragraph::new(content).style(Style::default().fg(color));
    f.render_widget(status, chunks[1]);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            " HELP -- Triptych Key Bindings",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(" Panes:"),
        Line::from("  F1 / F2 / F3           - Edit HTML, CSS or JS"),
        Line::from("  Shift+Tab              - Cycle through panes"),
        Line::from(""),
        Line::from(" Preview:"),
        Line::from("  (automatic)            - Re-renders ~500ms after you stop typing"),
        Line::from("  Ctrl+R  Run            - Render immediately"),
        Line::from("  Ctrl+O  Browser        - Open the sandboxed preview page"),
        Line::from(""),
        Line::from(" Project:"),
        Line::from("  Ctrl+S  Export         - Save everything as project.html"),
        Line::from("  Ctrl+N  Reset          - Replace all panes with placeholders"),
        Line::from(""),
        Line::from(" Editing:"),
        Line::from("  Ctrl+Z / Ctrl+Y        - Undo / Redo in the active pane"),
        Line::from("  Arrows, Home, End,     - Move around"),
        Line::from("  PageUp, PageDown"),
        Line::from(""),
        Line::from("  Ctrl+Q                 - Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Press Esc or Ctrl+G to close help",
            Style::default().add_modifier(Modifier::ITALIC),
        )]),
    ];

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Left);

    f.render_widget(help, area);
}

fn bold() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Parses "#RRGGBB" theme values; anything else falls back to the caller's
/// default.
fn parse_hex_color(value: Option<&str>) -> Option<Color> {
    let hex = value?.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
