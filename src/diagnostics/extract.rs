//! Report line parsing.
//!
//! A report is plain text; only lines starting with `ERROR:` or `WARNING:`
//! carry diagnostics, and the source line they refer to is the last
//! `" line <n> "` occurrence in the entry:
//!
//! ```text
//! ERROR: unexpected group in line 12 after fonte line 14 (ignored)
//!                                                  ^^ target
//! ```
//!
//! Extraction is pure: the same `(report, source)` pair always yields the
//! same diagnostics, and malformed entries are skipped one by one.

use std::sync::LazyLock;

use regex::Regex;

use super::{Diagnostic, Severity};

/// Matches ` line <digits>`; the trailing space is checked separately so
/// that adjacent occurrences sharing a space are all found.
static LINE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" line ([0-9]+)").expect("line number pattern is valid"));

/// How a reported line number is mapped onto the source document.
///
/// The server's numbering has shifted between versions, so the correction
/// is configurable rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorPolicy {
    /// Added to the reported number before anchoring
    pub line_offset: i64,
    /// Walk up past blank lines to the nearest non-blank one
    pub skip_blank_lines: bool,
}

impl Default for AnchorPolicy {
    fn default() -> Self {
        Self {
            line_offset: 0,
            skip_blank_lines: true,
        }
    }
}

/// Extract diagnostics with the default anchoring policy.
pub fn extract(report: &str, source: &str) -> Vec<Diagnostic> {
    extract_with(report, source, &AnchorPolicy::default())
}

/// Extract diagnostics from `report` anchored on lines of `source`.
///
/// An empty result means "no known problems" and should clear whatever the
/// document showed before.
pub fn extract_with(report: &str, source: &str, policy: &AnchorPolicy) -> Vec<Diagnostic> {
    let doc_lines = split_lines(source);
    split_lines(report)
        .into_iter()
        .filter_map(|entry| anchor(entry, &doc_lines, policy))
        .collect()
}

/// Split on `\n`, dropping a trailing `\r` from each line.
///
/// A trailing newline yields a final empty line, so a report pointing one
/// line past the last statement still lands inside the document.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Last ` line <n> ` occurrence in `entry`.
pub fn extract_line_number(entry: &str) -> Option<usize> {
    LINE_NUMBER
        .captures_iter(entry)
        .filter(|caps| {
            caps.get(0)
                .is_some_and(|m| entry[m.end()..].starts_with(' '))
        })
        .last()?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

fn anchor(entry: &str, doc_lines: &[&str], policy: &AnchorPolicy) -> Option<Diagnostic> {
    let severity = Severity::from_entry(entry)?;
    let reported = i64::try_from(extract_line_number(entry)?).ok()?;
    let mut line = usize::try_from(reported.checked_add(policy.line_offset)?).ok()?;

    // Out of range: skip this entry only
    if line == 0 || line > doc_lines.len() {
        return None;
    }

    if policy.skip_blank_lines {
        while line > 1 && doc_lines[line - 1].trim().is_empty() {
            line -= 1;
        }
    }

    let text = doc_lines[line - 1];
    let column_start = text.chars().take_while(|c| c.is_whitespace()).count();
    let column_end = text.chars().count();

    Some(Diagnostic {
        severity,
        line,
        column_start,
        column_end,
        message: entry.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_on_target_line() {
        let diags = extract("ERROR: bad token line 3 ", "\n\nfoo();\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(diags[0].line, 3);
        assert_eq!(diags[0].column_start, 0);
        assert_eq!(diags[0].column_end, 6);
        assert_eq!(diags[0].message, "ERROR: bad token line 3 ");
    }

    #[test]
    fn test_blank_line_walks_up_to_non_blank() {
        let source = "fonte$x\n  ref$y\n\n   \nend$\n";
        let diags = extract("WARNING: missing line 4 ", source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert_eq!(diags[0].line, 2);
        assert_eq!(diags[0].column_start, 2);
        assert_eq!(diags[0].column_end, 7);
    }

    #[test]
    fn test_blank_line_stops_at_line_one() {
        let diags = extract("ERROR: x line 2 ", "\n\nfoo();\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 1);
        assert_eq!(diags[0].column_start, 0);
        assert_eq!(diags[0].column_end, 0);
    }

    #[test]
    fn test_blank_line_one_is_kept() {
        let diags = extract("ERROR: x line 1 ", "   \nfoo\n");
        assert_eq!(diags[0].line, 1);
        assert_eq!(diags[0].column_start, 3);
        assert_eq!(diags[0].column_end, 3);
    }

    #[test]
    fn test_trailing_newline_line_anchors_on_last_statement() {
        // "line 3" is the empty line after the final newline
        let diags = extract("ERROR: eof line 3 ", "a$1\nb$2\n");
        assert_eq!(diags[0].line, 2);
    }

    #[test]
    fn test_last_match_wins() {
        let report = "ERROR: group at line 2 continues line 4 ";
        let diags = extract(report, "a\nb\nc\nd\n");
        assert_eq!(diags[0].line, 4);
    }

    #[test]
    fn test_adjacent_occurrences_share_space() {
        assert_eq!(extract_line_number("x line 2 line 3 "), Some(3));
    }

    #[test]
    fn test_line_number_needs_spaces() {
        assert_eq!(extract_line_number("ERROR: line 3"), None);
        assert_eq!(extract_line_number("ERROR:line 3 "), None);
        assert_eq!(extract_line_number("ERROR: line 3x "), None);
        assert_eq!(extract_line_number("ERROR: at line 12 in"), Some(12));
    }

    #[test]
    fn test_non_diagnostic_lines_ignored() {
        let report = "Kleio translation report\nINFO: line 1 ok\n  ERROR: indented line 1 \n";
        assert!(extract(report, "a\n").is_empty());
    }

    #[test]
    fn test_entry_without_line_number_skipped() {
        let report = "ERROR: no location here\nWARNING: w line 1 \n";
        let diags = extract(report, "abc\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn test_out_of_range_skipped() {
        let source = (1..=10).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let report = "ERROR: far line 9999 \nERROR: near line 10 \n";
        let diags = extract(report, &source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].line, 10);
    }

    #[test]
    fn test_line_zero_skipped() {
        assert!(extract("ERROR: x line 0 ", "a\n").is_empty());
    }

    #[test]
    fn test_crlf_matches_lf() {
        let lf = extract("ERROR: a line 2 \nWARNING: b line 3 \n", "x\n  y\n\nz\n");
        let crlf = extract(
            "ERROR: a line 2 \r\nWARNING: b line 3 \r\n",
            "x\r\n  y\r\n\r\nz\r\n",
        );
        assert_eq!(lf, crlf);
        assert_eq!(split_lines("a\r\nb\r\n").len(), split_lines("a\nb\n").len());
    }

    #[test]
    fn test_report_order_preserved() {
        let report = "WARNING: w line 3 \nERROR: e line 1 \n";
        let diags = extract(report, "a\nb\nc\n");
        assert_eq!(diags[0].line, 3);
        assert_eq!(diags[1].line, 1);
    }

    #[test]
    fn test_idempotent() {
        let report = "ERROR: a line 2 \nWARNING: b line 1 \n";
        let source = "x\n  y\n";
        assert_eq!(extract(report, source), extract(report, source));
    }

    #[test]
    fn test_unicode_columns_count_chars() {
        let diags = extract("ERROR: x line 1 ", "  São João\n");
        assert_eq!(diags[0].column_start, 2);
        assert_eq!(diags[0].column_end, 10);
    }

    #[test]
    fn test_policy_offset() {
        let policy = AnchorPolicy {
            line_offset: -1,
            skip_blank_lines: true,
        };
        let diags = extract_with("ERROR: x line 3 ", "a\nb\nc\n", &policy);
        assert_eq!(diags[0].line, 2);

        // Offset pushing below line 1 is a miss
        let diags = extract_with("ERROR: x line 1 ", "a\n", &policy);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_overflowing_last_line_number_is_a_miss() {
        let report = "ERROR: group at line 2 continues line 99999999999999999999999 ";
        assert_eq!(extract_line_number(report), None);
        assert!(extract(report, "a\nb\nc\n").is_empty());
    }

    #[test]
    fn test_policy_without_blank_skip() {
        let policy = AnchorPolicy {
            line_offset: 0,
            skip_blank_lines: false,
        };
        let diags = extract_with("ERROR: x line 2 ", "a\n\nb\n", &policy);
        assert_eq!(diags[0].line, 2);
        assert_eq!(diags[0].column_end, 0);
    }
}
