use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::layout::{centered, DashboardLayout};
use super::month_view::MonthView;
use super::theme::Theme;
use crate::app::{App, Focus};
use crate::day_view::{PanelRow, RowKind};
use crate::tabs::Tab;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.state().theme);
    let area = f.area();
    let layout = DashboardLayout::compute(area);

    // Fill background with theme color
    let bg_block = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg_block, area);

    draw_header(f, app, &layout, &theme);
    draw_calendar(f, app, &layout, &theme);
    draw_day_panel(f, app, &layout, &theme);
    draw_status_bar(f, app, layout.status, &theme);

    if let Some(message) = app.alert() {
        draw_alert(f, message, area, &theme);
    }
}

/// Month navigation, month heading and theme toggle
fn draw_header(f: &mut Frame, app: &App, layout: &DashboardLayout, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" darkwall-cal ")
        .style(Style::default().bg(theme.background));
    f.render_widget(block, layout.header);

    let button = Style::default().fg(theme.accent).bg(theme.background);
    f.render_widget(Paragraph::new(" ◀ ").style(button), layout.prev_button);
    f.render_widget(Paragraph::new(" ▶ ").style(button), layout.next_button);

    let label = app.formatter().month_label(app.grid().reference_month());
    let heading = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(theme.foreground)
                .bg(theme.background)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(heading, layout.month_label);

    let icon = Paragraph::new(app.theme_icon())
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.foreground).bg(theme.background));
    f.render_widget(icon, layout.theme_toggle);
}

fn draw_calendar(f: &mut Frame, app: &App, layout: &DashboardLayout, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed))
        .style(Style::default().bg(theme.background));
    f.render_widget(block, layout.calendar);

    let names = app.config().labels.weekday_names();
    let header: String = names
        .iter()
        .map(|name| format!("{:>3}  ", truncate(name, 3)))
        .collect();
    let weekdays = Paragraph::new(header.trim_end().to_string())
        .style(Style::default().fg(theme.dimmed).bg(theme.background));
    f.render_widget(weekdays, layout.weekdays);

    let cursor = match app.focus() {
        Focus::Grid => Some(app.cursor()),
        Focus::NoteInput => None,
    };
    f.render_widget(MonthView::new(app.grid(), theme).cursor(cursor), layout.cells);
}

/// Tab bar, date line, active panel and (on the notes tab) the note input
fn draw_day_panel(f: &mut Frame, app: &App, layout: &DashboardLayout, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed))
        .style(Style::default().bg(theme.background));
    f.render_widget(block, layout.day_panel);

    let labels = &app.config().labels;
    let active = app.state().active_tab;

    for tab in Tab::ALL {
        let style = if tab == active {
            Style::default()
                .fg(theme.accent)
                .bg(theme.background)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme.dimmed).bg(theme.background)
        };
        let title = Paragraph::new(tab.title(labels).to_string())
            .alignment(Alignment::Center)
            .style(style);
        f.render_widget(title, layout.tab_rect(tab));
    }

    if let Some(line) = app.date_line() {
        let date = Paragraph::new(line)
            .style(Style::default().fg(theme.foreground).bg(theme.background));
        f.render_widget(date, layout.date_line);
    }

    let rows = app.panel_rows();
    let bullet = match active {
        Tab::Schedule => "",
        Tab::Notes => "• ",
    };
    // One screen line per row so the scroll offset stays in rows
    let offset = app.panel_offset(usize::from(layout.panel_body.height));
    let lines: Vec<Line> = rows
        .iter()
        .skip(offset)
        .map(|row| panel_line(row, bullet, theme))
        .collect();
    let body = Paragraph::new(lines).style(Style::default().bg(theme.background));
    f.render_widget(body, layout.panel_body);

    if active == Tab::Notes {
        draw_note_input(f, app, layout.note_input, theme);
    }
}

fn panel_line<'a>(row: &'a PanelRow, bullet: &'a str, theme: &Theme) -> Line<'a> {
    match row.kind {
        RowKind::Entry => Line::from(vec![
            Span::styled(bullet, Style::default().fg(theme.accent)),
            Span::styled(row.text.as_str(), Style::default().fg(theme.foreground)),
        ]),
        RowKind::Placeholder => Line::from(Span::styled(
            row.text.as_str(),
            Style::default().fg(theme.dimmed).add_modifier(Modifier::ITALIC),
        )),
        RowKind::Error => Line::from(Span::styled(
            row.text.as_str(),
            Style::default().fg(theme.error),
        )),
    }
}

fn draw_note_input(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let focused = app.focus() == Focus::NoteInput;
    // Leave one column for the cursor after the text
    let visible = usize::from(area.width.saturating_sub(3));
    let text = tail(app.note_input(), visible);

    let (content, style) = if text.is_empty() && !focused {
        (
            app.config().labels.note_placeholder.clone(),
            Style::default().fg(theme.dimmed).bg(theme.background),
        )
    } else {
        (
            text.to_string(),
            Style::default().fg(theme.foreground).bg(theme.background),
        )
    };

    let border = if focused { theme.accent } else { theme.dimmed };
    let input = Paragraph::new(content).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(input, area);

    if focused && area.width > 2 && area.height > 2 {
        // Display width, not byte length; +1 for the border
        let max_x = area.x + area.width - 2;
        let text_width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        let cursor_x = area.x.saturating_add(1).saturating_add(text_width).min(max_x);
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let loading = if app.day_view().is_loading() {
        format!(" {} |", app.config().labels.loading)
    } else {
        String::new()
    };

    let hints = match app.focus() {
        Focus::Grid => {
            "←↑↓→/hjkl: move | Enter: select | [/]: month | Tab: panel | J/K: scroll | n: note | t: theme | q: quit"
        }
        Focus::NoteInput => "Enter: add note | ↑↓/PgUp/PgDn: scroll | Esc: back to calendar",
    };

    let status_bar = Paragraph::new(format!("{} {}", loading, hints))
        .style(Style::default().fg(theme.dimmed).bg(theme.background));
    f.render_widget(status_bar, area);
}

/// Blocking alert; input is swallowed until it is dismissed
fn draw_alert(f: &mut Frame, message: &str, area: Rect, theme: &Theme) {
    let width = (message.width() as u16 + 6).max(30);
    let popup = centered(area, width, 5);

    f.render_widget(Clear, popup);
    let alert = Paragraph::new(vec![
        Line::from(Span::styled(message, Style::default().fg(theme.error))),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: OK",
            Style::default().fg(theme.dimmed),
        )),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().bg(theme.background))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(alert, popup);
}

/// Truncate to at most `max_width` display columns
fn truncate(s: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out
}

/// Longest suffix of `s` that fits in `max_width` display columns
fn tail(s: &str, max_width: usize) -> &str {
    let mut width = 0;
    let mut start = s.len();
    for (i, c) in s.char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = i;
    }
    &s[start..]
}
