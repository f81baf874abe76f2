//! Boxed text panels

/// Width of content inside a panel when no line is longer
const MIN_INNER_WIDTH: usize = 20;

/// Draws `body` inside a rounded box with `title` on the top border
///
/// Lines are never wrapped; the box grows to fit the longest line.
pub fn render_panel(title: &str, body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();
    let title_len = title.chars().count();

    let inner_width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(title_len + 2)
        .max(MIN_INNER_WIDTH);

    let mut out = String::new();

    // ╭─ Title ──────╮
    out.push_str("╭─");
    if title.is_empty() {
        out.push_str(&"─".repeat(inner_width + 1));
    } else {
        out.push(' ');
        out.push_str(title);
        out.push(' ');
        out.push_str(&"─".repeat(inner_width - title_len - 1));
    }
    out.push_str("╮\n");

    for line in &lines {
        let pad = inner_width - line.chars().count();
        out.push_str("│ ");
        out.push_str(line);
        out.push_str(&" ".repeat(pad));
        out.push_str(" │\n");
    }

    out.push('╰');
    out.push_str(&"─".repeat(inner_width + 2));
    out.push('╯');
    out
}
