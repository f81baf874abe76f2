//! Plain-text tables

/// Shortens `text` to `max` characters, marking the cut with `...`
pub fn truncate_display(text: &str, max: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let keep = max.saturating_sub(3);
    let mut out: String = single_line.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Renders rows under a header with columns padded to their widest cell
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(headers.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_display() {
        assert_eq!(truncate_display("short", 10), "short");
        assert_eq!(truncate_display("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate_display("multi\nline  text", 20), "multi line text");
    }

    #[test]
    fn test_render_table_alignment() {
        let table = render_table(
            &["ID", "Title"],
            &[
                vec!["1".to_string(), "First".to_string()],
                vec!["10".to_string(), "Second".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID │ Title");
        assert_eq!(lines[1], "───┼───────");
        assert_eq!(lines[2], "1  │ First");
        assert_eq!(lines[3], "10 │ Second");
    }
}
