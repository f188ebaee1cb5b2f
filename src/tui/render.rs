use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::ansi::log_line;
use super::app::{TuiApp, View};
use crate::dispatch::REMOVE_CONFIRMATION;
use crate::status::{BadgeStyle, ControlStates, StatusRow};
use crate::toast::ToastKind;

/// Padding inside content area (1 cell on each side)
const CONTENT_PADDING: u16 = 1;

const TOAST_WIDTH: u16 = 46;
const TOAST_HEIGHT: u16 = 4;

const LIST_HELP: &str = concat!(
    " \u{2191}\u{2193} select  Enter details",
    "  s start  x stop  o open  r remove  R refresh  c clear  q quit"
);
const DETAIL_HELP: &str =
    " Esc back  s start  x stop  o open  r remove  R refresh  c clear  q quit";

/// Draw the UI. Returns the visible height of the log pane.
pub(super) fn draw_ui(f: &mut Frame, app: &TuiApp) -> usize {
    let size = f.area();
    f.render_widget(Clear, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Key help
        ])
        .split(size);

    draw_header(f, chunks[0], app);
    let page_height = match &app.view {
        View::List => {
            draw_project_list(f, chunks[1], app);
            0
        }
        View::Detail(id) => draw_detail(f, chunks[1], app, id),
    };
    draw_help(f, chunks[2], app);

    draw_toasts(f, size, app);

    if app.pending_confirm.is_some() {
        draw_confirm_modal(f, size);
    }

    page_height
}

fn draw_header(f: &mut Frame, area: Rect, app: &TuiApp) {
    let updated = match app.board.updated_at() {
        Some(at) => format!("updated {}", at.format("%H:%M:%S")),
        None => "waiting for first update".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(
            " devdash ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.backend_label.clone(), Style::default().fg(Color::White)),
        Span::styled(format!("  {}", updated), Style::default().fg(Color::DarkGray)),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn badge_span(style: BadgeStyle, label: &str) -> Span<'static> {
    let (fg, bg) = match style {
        BadgeStyle::Success => (Color::Black, Color::Green),
        BadgeStyle::Secondary => (Color::White, Color::DarkGray),
        BadgeStyle::Danger => (Color::White, Color::Red),
        BadgeStyle::Warning => (Color::Black, Color::Yellow),
    };
    Span::styled(
        format!(" {:<7} ", label),
        Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
    )
}

fn control_spans(controls: &ControlStates) -> Vec<Span<'static>> {
    let button = |key: char, label: &str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        Span::styled(format!("[{}]{} ", key, label), style)
    };
    vec![
        button('s', "tart", controls.start),
        button('o', "pen", controls.open),
        button('x', " stop", controls.stop),
        button('r', "emove", controls.remove),
    ]
}

fn row_line(row: &StatusRow, selected: bool) -> Line<'static> {
    let marker = if selected { "\u{25b6} " } else { "  " };
    let name_style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let port = row
        .project
        .port
        .map(|p| format!(":{}", p))
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(format!("{:<24} ", truncate(row.project.display_name(), 24)), name_style),
        badge_span(row.badge.style, row.badge.label),
        Span::styled(format!(" {:<7} ", port), Style::default().fg(Color::DarkGray)),
    ];
    spans.extend(control_spans(&row.controls));
    Line::from(spans)
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('\u{2026}');
        cut
    }
}

fn draw_project_list(f: &mut Frame, area: Rect, app: &TuiApp) {
    let rows = app.board.rows();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Projects ({}) ", rows.len()))
        .title_style(Style::default().fg(Color::White));

    let lines: Vec<Line> = if rows.is_empty() {
        let text = if app.board.is_loaded() {
            "No projects."
        } else {
            "Loading projects..."
        };
        vec![Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))]
    } else {
        // Keep the selection in view
        let inner_height = area.height.saturating_sub(2 + CONTENT_PADDING * 2) as usize;
        let skip = (app.selected + 1).saturating_sub(inner_height.max(1));
        rows.iter()
            .enumerate()
            .skip(skip)
            .map(|(idx, row)| row_line(row, idx == app.selected))
            .collect()
    };

    f.render_widget(block, area);
    let inner = area.inner(Margin {
        horizontal: CONTENT_PADDING + 1,
        vertical: CONTENT_PADDING + 1,
    });
    f.render_widget(Paragraph::new(lines), inner);
}

/// Draw the detail view. Returns the visible height of the log pane.
fn draw_detail(f: &mut Frame, area: Rect, app: &TuiApp, project_id: &str) -> usize {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let summary: Vec<Line> = match app.board.row(project_id) {
        Some(row) => {
            let project = &row.project;
            let mut first = vec![
                Span::styled(
                    format!("{}  ", project.display_name()),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                badge_span(row.badge.style, row.badge.label),
            ];
            if let Some(port) = project.port {
                first.push(Span::styled(
                    format!("  port {}", port),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            let location = format!(
                "{}{}",
                project.path.as_deref().unwrap_or(""),
                project
                    .entry_file
                    .as_deref()
                    .map(|e| format!("  ({})", e))
                    .unwrap_or_default()
            );
            vec![
                Line::from(first),
                Line::from(Span::styled(location, Style::default().fg(Color::DarkGray))),
                Line::from(control_spans(&row.controls)),
            ]
        }
        None => vec![Line::from(Span::styled(
            format!("{} (no status yet)", project_id),
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let summary_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Project {} ", project_id))
        .title_style(Style::default().fg(Color::White));
    f.render_widget(Paragraph::new(summary).block(summary_block), chunks[0]);

    draw_logs(f, chunks[1], app)
}

fn draw_logs(f: &mut Frame, area: Rect, app: &TuiApp) -> usize {
    let border_size: u16 = 2;
    let inner_width = area.width.saturating_sub(border_size + CONTENT_PADDING * 2) as usize;
    let inner_height = area
        .height
        .saturating_sub(border_size + CONTENT_PADDING * 2) as usize;

    let total = app.logs.lines().len();
    let title = format!(
        " Logs ({}/{}) [\u{2191}\u{2193} scroll, PgUp/PgDn, Home/End] ",
        total.saturating_sub(app.logs.scroll_offset()),
        total
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .title_style(Style::default().fg(Color::White));
    f.render_widget(block, area);

    if inner_height == 0 || inner_width == 0 {
        return 0;
    }

    let visible: Vec<Line> = app.logs.lines()[app.logs.visible_range(inner_height)]
        .iter()
        .map(|line| log_line(line, inner_width))
        .collect();

    let inner_area = area.inner(Margin {
        horizontal: CONTENT_PADDING + 1,
        vertical: CONTENT_PADDING + 1,
    });
    f.render_widget(Paragraph::new(visible), inner_area);

    inner_height
}

fn draw_help(f: &mut Frame, area: Rect, app: &TuiApp) {
    let help = match app.view {
        View::List => LIST_HELP,
        View::Detail(_) => DETAIL_HELP,
    };
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))),
        area,
    );
}

/// Draw toasts stacked from the top-right corner, oldest first.
fn draw_toasts(f: &mut Frame, area: Rect, app: &TuiApp) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.width.saturating_sub(width + 1);
    let mut y = 1u16;

    for toast in app.notifier.toasts() {
        if y + TOAST_HEIGHT > area.height {
            break;
        }
        let color = match toast.kind {
            ToastKind::Success => Color::Green,
            ToastKind::Danger => Color::Red,
            ToastKind::Info => Color::Cyan,
        };
        let toast_area = Rect::new(x, y, width, TOAST_HEIGHT);
        f.render_widget(Clear, toast_area);

        let body = Line::from(vec![
            Span::styled(
                format!("{}: ", toast.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(toast.body.clone(), Style::default().fg(Color::White)),
        ]);
        let widget = Paragraph::new(body).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(widget, toast_area);
        y += TOAST_HEIGHT;
    }
}

/// Draw the remove confirmation modal.
fn draw_confirm_modal(f: &mut Frame, area: Rect) {
    let modal_width = 52u16;
    let modal_height = 6u16;
    let x = (area.width.saturating_sub(modal_width)) / 2;
    let y = (area.height.saturating_sub(modal_height)) / 2;
    let modal_area = Rect::new(
        x,
        y,
        modal_width.min(area.width),
        modal_height.min(area.height),
    );

    f.render_widget(Clear, modal_area);

    let modal_text = vec![
        Line::from(""),
        Line::from(REMOVE_CONFIRMATION),
        Line::from(""),
        Line::from(Span::styled("[Y]es  [N]o", Style::default().fg(Color::Cyan))),
    ];

    let modal = Paragraph::new(modal_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Remove project? ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        );

    f.render_widget(modal, modal_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Project, ProjectStatus};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_row_line_shows_badge_and_port() {
        let project = Project::new("abc", ProjectStatus::Running)
            .with_name("Blog")
            .with_port(5001);
        let row = StatusRow::new(project);
        let rendered = text(&row_line(&row, true));
        assert!(rendered.starts_with("\u{25b6} Blog"));
        assert!(rendered.contains("Running"));
        assert!(rendered.contains(":5001"));
        assert!(rendered.contains("[x] stop"));
    }

    #[test]
    fn test_disabled_controls_are_dimmed() {
        let row = StatusRow::new(Project::new("abc", ProjectStatus::Stopped));
        let spans = control_spans(&row.controls);
        // start enabled, open and stop disabled
        assert_eq!(spans[0].style.fg, Some(Color::Cyan));
        assert_eq!(spans[1].style.fg, Some(Color::DarkGray));
        assert_eq!(spans[2].style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-name", 6), "a-ver\u{2026}");
    }
}
