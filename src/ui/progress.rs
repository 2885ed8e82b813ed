use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Settled steps (done or skipped) out of the whole flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub settled: usize,
    pub total: usize,
}

/// Renders `[████░░░░] 2/4` sized to `width` display columns.
pub fn progress_line(progress: &Progress, width: usize) -> String {
    let label = format!(" {}/{}", progress.settled, progress.total);
    let bar_width = width.saturating_sub(label.width() + 2).max(4);
    let filled = if progress.total == 0 {
        0
    } else {
        (bar_width * progress.settled.min(progress.total)) / progress.total
    };

    let mut line = String::with_capacity(bar_width + label.len() + 2);
    line.push('[');
    for _ in 0..filled {
        line.push('█');
    }
    for _ in filled..bar_width {
        line.push('░');
    }
    line.push(']');
    line.push_str(label.as_str());
    line
}

/// Step title plus optional description, truncated to `width` columns.
pub fn step_header(title: &str, description: Option<&str>, width: usize) -> Vec<String> {
    let mut lines = vec![truncate_to_width(title, width)];
    if let Some(description) = description {
        lines.push(truncate_to_width(description, width));
    }
    lines
}

pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let ellipsis = '…';
    let limit = width.saturating_sub(ellipsis.width().unwrap_or(1));
    let mut out = String::new();
    let mut used = 0usize;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > limit {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ellipsis);
    out
}

#[cfg(test)]
mod tests {
    use super::{Progress, progress_line, step_header, truncate_to_width};
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn bar_fills_proportionally() {
        let line = progress_line(&Progress { settled: 2, total: 4 }, 20);
        assert!(line.starts_with('['));
        assert!(line.ends_with(" 2/4"));
        let filled = line.chars().filter(|c| *c == '█').count();
        let empty = line.chars().filter(|c| *c == '░').count();
        assert_eq!(filled, empty);
    }

    #[test]
    fn empty_flow_renders_an_empty_bar() {
        let line = progress_line(&Progress { settled: 0, total: 0 }, 16);
        assert!(!line.contains('█'));
        assert!(line.ends_with(" 0/0"));
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        let truncated = truncate_to_width("a very long step title", 10);
        assert!(truncated.ends_with('…'));
        assert!(truncated.width() <= 10);
    }

    #[test]
    fn header_includes_description_when_present() {
        assert_eq!(step_header("Account", None, 40).len(), 1);
        assert_eq!(step_header("Account", Some("Who are you?"), 40).len(), 2);
    }
}
