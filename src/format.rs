//! Kleio source indentation.
//!
//! Every group keyword sits at a fixed depth in the source hierarchy:
//!
//! ```text
//! kleio$...                 0
//!    fonte$...              1
//!       bap$ cas$ obito$    2
//!          n$ noivo$        3
//!             pai$ mae$     4
//!                ppad$      5
//! ```
//!
//! `ls$` (attribute) lines are not levelled by keyword; they go one step
//! deeper than the last non-`ls$` line. Other lines are left as they are.

use std::sync::LazyLock;

use regex::Regex;

/// One indentation step
pub const INDENT: &str = "   ";

static GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([a-z0-9]+)\$").expect("group pattern is valid"));

static CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*ls\$").expect("continuation pattern is valid"));

static LEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+").expect("leading whitespace pattern is valid"));

/// Depth of a group keyword, `None` for keywords without a fixed place.
pub fn group_level(keyword: &str) -> Option<usize> {
    let level = match keyword {
        "kleio" => 0,
        "fonte" => 1,
        "bap" | "b" | "cas" | "obito" | "o" => 2,
        "n" | "noivo" | "noiva" | "test" => 3,
        "pai" | "pn" | "mae" | "mn" | "pad1" | "pad" | "mad1" | "mad" | "pnoivo" | "pnoiva" => 4,
        "ppad" | "pmad" => 5,
        _ => return None,
    };
    Some(level)
}

/// Re-indent a whole source text. Line endings are kept as they are.
pub fn format_source(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut previous: Option<String> = None;

    for raw in source.split_inclusive('\n') {
        let (line, ending) = split_ending(raw);

        let formatted = if line.contains("ls$")
            && let Some(prev) = previous.as_deref()
        {
            match LEADING.find(prev) {
                Some(leading) => continue_line(line, leading.as_str()),
                None => indent_group(line),
            }
        } else {
            let formatted = indent_group(line);
            previous = Some(formatted.clone());
            formatted
        };

        out.push_str(&formatted);
        out.push_str(ending);
    }
    out
}

/// Put a group line at its keyword's depth.
pub fn indent_group(line: &str) -> String {
    let level = GROUP
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|keyword| Some((keyword.start(), group_level(keyword.as_str())?)));

    match level {
        Some((start, level)) => format!("{}{}", INDENT.repeat(level), &line[start..]),
        None => line.to_string(),
    }
}

/// Indent an `ls$` line one step below a line starting with `leading`.
fn continue_line(line: &str, leading: &str) -> String {
    match CONTINUATION.find(line) {
        Some(m) => format!("{leading}{INDENT}ls${}", &line[m.end()..]),
        None => line.to_string(),
    }
}

fn split_ending(raw: &str) -> (&str, &str) {
    if let Some(line) = raw.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = raw.strip_suffix('\n') {
        (line, "\n")
    } else {
        (raw, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_levels() {
        assert_eq!(indent_group("  kleio$gacto2.str"), "kleio$gacto2.str");
        assert_eq!(indent_group("fonte$sample/data=1"), "   fonte$sample/data=1");
        assert_eq!(indent_group("bap$b1/1/1/1690"), "      bap$b1/1/1/1690");
        assert_eq!(indent_group("\tn$joao/m"), "         n$joao/m");
        assert_eq!(indent_group("pad1$manuel"), "            pad1$manuel");
        assert_eq!(indent_group(" pmad$ana"), "               pmad$ana");
    }

    #[test]
    fn test_unknown_lines_untouched() {
        assert_eq!(indent_group("   obs$nota"), "   obs$nota");
        assert_eq!(indent_group("xbap$b1"), "xbap$b1");
        assert_eq!(indent_group("  bap b1"), "  bap b1");
        assert_eq!(indent_group(""), "");
    }

    #[test]
    fn test_ls_follows_previous_line() {
        let source = "kleio$x\nfonte$f\nbap$b\nn$joao\nls$idade/12\n  ls$morada/porto\npai$manuel\nls$ocupacao/lavrador\n";
        let expected = "kleio$x\n   fonte$f\n      bap$b\n         n$joao\n            ls$idade/12\n            ls$morada/porto\n            pai$manuel\n               ls$ocupacao/lavrador\n";
        assert_eq!(format_source(source), expected);
    }

    #[test]
    fn test_ls_after_unindented_line() {
        // Nothing to indent relative to
        assert_eq!(format_source("kleio$x\n  ls$a/1\n"), "kleio$x\n  ls$a/1\n");
        assert_eq!(format_source("ls$a/1\n"), "ls$a/1\n");
    }

    #[test]
    fn test_line_endings_kept() {
        assert_eq!(format_source("kleio$x\r\nfonte$f"), "kleio$x\r\n   fonte$f");
    }

    #[test]
    fn test_idempotent() {
        let source = "kleio$x\nfonte$f\ncas$c\nnoivo$a\nls$b/1\npnoivo$c\n";
        let once = format_source(source);
        assert_eq!(format_source(&once), once);
    }
}
