use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Visible width of a tab in the log pane.
const TAB_WIDTH: usize = 4;

/// Convert a raw log line into a styled line, honoring SGR color escapes
/// and cutting it to `max_width` visible cells.
///
/// Other escape sequences, carriage returns, and control characters are
/// dropped; tabs are expanded.
pub(super) fn log_line(line: &str, max_width: usize) -> Line<'static> {
    let mut spans = Vec::new();
    let mut text = String::new();
    let mut style = Style::default();
    let mut visible = 0;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if visible >= max_width {
            break;
        }
        match c {
            '\x1b' => {
                if chars.peek() != Some(&'[') {
                    continue;
                }
                chars.next();
                let mut params = String::new();
                let mut terminator = None;
                for next in chars.by_ref() {
                    if next.is_ascii_alphabetic() {
                        terminator = Some(next);
                        break;
                    }
                    params.push(next);
                }
                if terminator == Some('m') {
                    if !text.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut text), style));
                    }
                    style = apply_sgr(&params, style);
                }
            }
            '\t' => {
                let pad = (TAB_WIDTH - visible % TAB_WIDTH).min(max_width - visible);
                text.extend(std::iter::repeat(' ').take(pad));
                visible += pad;
            }
            c if c.is_control() => {}
            c => {
                text.push(c);
                visible += 1;
            }
        }
    }

    if !text.is_empty() {
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

/// Apply a `;`-separated SGR parameter list to `style`.
fn apply_sgr(params: &str, mut style: Style) -> Style {
    for param in params.split(';') {
        let code: u8 = match param {
            "" => 0,
            p => match p.parse() {
                Ok(n) => n,
                Err(_) => continue,
            },
        };
        style = match code {
            0 => Style::default(),
            1 => style.add_modifier(Modifier::BOLD),
            2 => style.add_modifier(Modifier::DIM),
            3 => style.add_modifier(Modifier::ITALIC),
            4 => style.add_modifier(Modifier::UNDERLINED),
            22 => style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style.remove_modifier(Modifier::ITALIC),
            24 => style.remove_modifier(Modifier::UNDERLINED),
            30..=37 => style.fg(base_color(code - 30)),
            39 => style.fg(Color::Reset),
            40..=47 => style.bg(base_color(code - 40)),
            49 => style.bg(Color::Reset),
            90..=97 => style.fg(bright_color(code - 90)),
            _ => style,
        };
    }
    style
}

fn base_color(index: u8) -> Color {
    match index {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        _ => Color::Gray,
    }
}

fn bright_color(index: u8) -> Color {
    match index {
        0 => Color::DarkGray,
        1 => Color::LightRed,
        2 => Color::LightGreen,
        3 => Color::LightYellow,
        4 => Color::LightBlue,
        5 => Color::LightMagenta,
        6 => Color::LightCyan,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_plain_line() {
        let line = log_line(" * Running on http://127.0.0.1:5001", 80);
        assert_eq!(line.spans.len(), 1);
        assert_eq!(plain(&line), " * Running on http://127.0.0.1:5001");
    }

    #[test]
    fn test_colors_become_styles() {
        let line = log_line("\x1b[32mGET /\x1b[0m 200", 80);
        assert_eq!(plain(&line), "GET / 200");
        assert_eq!(line.spans[0].style.fg, Some(Color::Green));
        assert_eq!(line.spans[1].style, Style::default());
    }

    #[test]
    fn test_truncates_to_width() {
        let line = log_line("\x1b[1mabcdefghij\x1b[0m", 4);
        assert_eq!(plain(&line), "abcd");
    }

    #[test]
    fn test_tabs_and_controls() {
        let line = log_line("a\tb\r", 80);
        assert_eq!(plain(&line), "a   b");
    }

    #[test]
    fn test_non_sgr_escape_dropped() {
        let line = log_line("\x1b[2Kprogress", 80);
        assert_eq!(plain(&line), "progress");
    }

    #[test]
    fn test_sgr_bold_and_reset() {
        let style = apply_sgr("1;31", Style::default());
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(style.fg, Some(Color::Red));
        assert_eq!(apply_sgr("", style), Style::default());
    }
}
