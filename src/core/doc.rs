use std::sync::OnceLock;
use regex::Regex;

/// Leading run of spaces at the start of a line
fn indent_regex() -> &'static Regex {
    static INDENT: OnceLock<Regex> = OnceLock::new();
    INDENT.get_or_init(|| Regex::new(r"^ *").expect("Invalid indentation regex"))
}

/// Remove the indentation shared by every non-blank line after the first.
///
/// Multi-line doc strings are usually indented to the column of the opening
/// quote. The minimum leading-space run over the follow-on lines is stripped
/// from every line that starts with it, the first line included, so deeper
/// relative indentation survives.
pub fn normalize_doc(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let lines: Vec<&str> = raw.split('\n').collect();

    let indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_spaces(line))
        .min();

    match indent {
        Some(width) if width > 0 => {
            let stripped: Vec<&str> = lines
                .iter()
                .map(|line| strip_indent(*line, width))
                .collect();
            Some(stripped.join("\n"))
        }
        _ => Some(raw.to_string()),
    }
}

fn leading_spaces(line: &str) -> usize {
    indent_regex().find(line).map_or(0, |m| m.end())
}

/// Drop exactly `width` leading spaces; lines with a shorter run are kept as is
fn strip_indent(line: &str, width: usize) -> &str {
    if leading_spaces(line) >= width {
        &line[width..]
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_stays_none() {
        assert_eq!(normalize_doc(None), None);
    }

    #[test]
    fn test_strips_minimum_indent() {
        let raw = "Returns the sum.\n    Accepts numbers:\n      - ints\n    and more.";
        let cleaned = normalize_doc(Some(raw)).unwrap();
        assert_eq!(cleaned, "Returns the sum.\nAccepts numbers:\n  - ints\nand more.");
    }

    #[test]
    fn test_first_line_is_stripped_when_it_shares_the_indent() {
        let raw = "  First\n  second\n    third";
        assert_eq!(normalize_doc(Some(raw)).unwrap(), "First\nsecond\n  third");
    }

    #[test]
    fn test_blank_lines_do_not_count() {
        let raw = "Summary\n\n   \n    Body line\n      indented";
        assert_eq!(
            normalize_doc(Some(raw)).unwrap(),
            "Summary\n\n   \nBody line\n  indented"
        );
    }

    #[test]
    fn test_single_line_unchanged() {
        assert_eq!(normalize_doc(Some("   lonely")).unwrap(), "   lonely");
    }

    #[test]
    fn test_unindented_follow_on_lines_unchanged() {
        let raw = "First\nsecond\n  third";
        assert_eq!(normalize_doc(Some(raw)).unwrap(), raw);
    }

    #[test]
    fn test_trailing_newline_preserved() {
        let raw = "Doc\n  more\n";
        assert_eq!(normalize_doc(Some(raw)).unwrap(), "Doc\nmore\n");
    }

    #[test]
    fn test_very_deep_indent() {
        let width = 1_000_000;
        let raw = format!("Summary\n{}body\n{}  nested", " ".repeat(width), " ".repeat(width));
        assert_eq!(normalize_doc(Some(&raw)).unwrap(), "Summary\nbody\n  nested");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "one line",
            "a\n  b\n    c",
            "  a\n b\n   c\n",
            "x\n\t tabbed\n  spaced",
            "a\n\n\n   b\n  \n     c",
            "\n    only follow-on",
        ];

        for sample in samples {
            let once = normalize_doc(Some(sample));
            let twice = normalize_doc(once.as_deref());
            assert_eq!(once, twice, "normalization of {:?} is not idempotent", sample);
        }
    }
}
