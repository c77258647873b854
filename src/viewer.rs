//! Smell overlay for the code viewer
//!
//! Takes the text of one file plus the smells the backend reported for it
//! and decides, line by line, what the viewer draws: which lines carry a
//! severity highlight, which line carries the smell's badge, and the line
//! number / text to show.
//!
//! Overlapping smells resolve last-write-wins per line, in input order. The
//! number of smells covering each line is still recorded so the viewer can
//! hint that something is hidden underneath.

use crate::api::{FileData, Smell};
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// A smell longer than this many lines past its start only highlights its
/// first `MAX_HIGHLIGHT_SPAN + 1` lines.
pub const MAX_HIGHLIGHT_SPAN: i64 = 3;

/// Smell types that count as high severity
const HIGH_SEVERITY: [&str; 3] = ["God class", "Long Method", "High Cyclomatic Complexity"];

/// Smell types that count as medium severity
const MEDIUM_SEVERITY: [&str; 2] = ["Too Many Methods", "Throwing Raw Exception Types"];

/// Three-tier severity derived from the smell's type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Substring match against the known smell names
    pub fn from_smell_type(smell_type: &str) -> Self {
        if HIGH_SEVERITY.iter().any(|k| smell_type.contains(k)) {
            Severity::High
        } else if MEDIUM_SEVERITY.iter().any(|k| smell_type.contains(k)) {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn weight(&self) -> u8 {
        match self {
            Severity::High => 4,
            Severity::Medium => 3,
            Severity::Low => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// The lines a smell lights up, before clipping to the file. Saturating so
/// extreme line numbers never overflow or produce a huge range.
pub fn highlight_range(smell: &Smell) -> RangeInclusive<i64> {
    let end = if smell.end_line.saturating_sub(smell.start_line) > MAX_HIGHLIGHT_SPAN {
        smell.start_line.saturating_add(MAX_HIGHLIGHT_SPAN)
    } else {
        smell.end_line
    };
    smell.start_line..=end
}

/// Smells reported against `file_name`, in the order the backend sent them
pub fn smells_for_file<'a>(smells: &'a [Smell], file_name: &str) -> Vec<&'a Smell> {
    smells.iter().filter(|s| s.file_name == file_name).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight<'a> {
    pub smell: &'a Smell,
    pub severity: Severity,
    /// First line of the owning smell's range
    pub is_start: bool,
    /// How many smells' ranges include this line (≥ 1)
    pub covering: usize,
}

/// Title badge anchored at a smell's start line. The text names the smell
/// that starts there; `severity` follows whichever smell owns the line's
/// highlight, so the badge always matches the line it sits on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Badge<'a> {
    pub smell: &'a Smell,
    pub severity: Severity,
}

/// What the viewer draws for one line of the file
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLine<'a> {
    /// 1-based
    pub number: usize,
    pub text: &'a str,
    pub highlight: Option<Highlight<'a>>,
    pub badge: Option<Badge<'a>>,
}

impl RenderedLine<'_> {
    /// Empty lines still occupy a row.
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            " "
        } else {
            self.text
        }
    }
}

/// Per-line annotation maps for one file
#[derive(Debug, Default)]
pub struct SmellOverlay<'a> {
    badges: HashMap<i64, &'a Smell>,
    highlights: HashMap<i64, (&'a Smell, bool)>,
    coverage: HashMap<i64, usize>,
}

impl<'a> SmellOverlay<'a> {
    pub fn build(smells: &[&'a Smell]) -> Self {
        let mut overlay = SmellOverlay::default();
        for &smell in smells {
            overlay.badges.insert(smell.start_line, smell);
            for line in highlight_range(smell) {
                overlay
                    .highlights
                    .insert(line, (smell, line == smell.start_line));
                *overlay.coverage.entry(line).or_insert(0) += 1;
            }
        }
        overlay
    }

    pub fn highlight(&self, line: usize) -> Option<Highlight<'a>> {
        let key = line as i64;
        self.highlights.get(&key).map(|&(smell, is_start)| Highlight {
            smell,
            severity: Severity::from_smell_type(&smell.smell_type),
            is_start,
            covering: self.coverage.get(&key).copied().unwrap_or(1),
        })
    }

    pub fn badge(&self, line: usize) -> Option<Badge<'a>> {
        let key = line as i64;
        self.badges.get(&key).map(|&smell| {
            let owner = self.highlights.get(&key).map_or(smell, |&(owner, _)| owner);
            Badge {
                smell,
                severity: Severity::from_smell_type(&owner.smell_type),
            }
        })
    }
}

/// Split a file into display lines
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Annotate every line of `content` with the given smells. Lines the smells
/// point at but the file doesn't have are simply never produced.
pub fn render_lines<'a>(content: &'a str, smells: &[&'a Smell]) -> Vec<RenderedLine<'a>> {
    let overlay = SmellOverlay::build(smells);
    split_lines(content)
        .enumerate()
        .map(|(idx, text)| {
            let number = idx + 1;
            RenderedLine {
                number,
                text,
                highlight: overlay.highlight(number),
                badge: overlay.badge(number),
            }
        })
        .collect()
}

/// File explorer entry: the file and how many smells point at it
pub fn file_smell_counts<'a>(files: &'a [FileData], smells: &[Smell]) -> Vec<(&'a FileData, usize)> {
    files
        .iter()
        .map(|f| {
            let count = smells.iter().filter(|s| s.file_name == f.file_name).count();
            (f, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smell(kind: &str, file: &str, start: i64, end: i64) -> Smell {
        Smell {
            smell_type: kind.to_string(),
            file_name: file.to_string(),
            file_path: format!("src/{}", file),
            start_line: start,
            end_line: end,
            category: "design".to_string(),
            weight: 1.0,
            id: None,
        }
    }

    fn numbered_file(lines: usize) -> String {
        (1..=lines)
            .map(|n| format!("line {}", n))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn highlighted(lines: &[RenderedLine]) -> Vec<usize> {
        lines
            .iter()
            .filter(|l| l.highlight.is_some())
            .map(|l| l.number)
            .collect()
    }

    #[test]
    fn test_no_smells_no_annotations() {
        let content = numbered_file(5);
        let lines = render_lines(&content, &[]);
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.highlight.is_none() && l.badge.is_none()));
    }

    #[test]
    fn test_short_smell_highlights_full_range() {
        let content = numbered_file(10);
        let s = smell("Feature Envy", "A.java", 2, 5);
        let lines = render_lines(&content, &[&s]);
        assert_eq!(highlighted(&lines), vec![2, 3, 4, 5]);
        assert!(lines[1].badge.is_some());
        assert!(lines[1].highlight.unwrap().is_start);
        assert!(!lines[2].highlight.unwrap().is_start);
    }

    #[test]
    fn test_long_smell_clamps_to_four_lines() {
        let content = numbered_file(200);
        let s = smell("Long Method", "A.java", 10, 150);
        let lines = render_lines(&content, &[&s]);
        assert_eq!(highlighted(&lines), vec![10, 11, 12, 13]);
        assert_eq!(lines.iter().filter(|l| l.badge.is_some()).count(), 1);
    }

    #[test]
    fn test_overlap_last_write_wins() {
        let content = numbered_file(10);
        let first = smell("God class", "A.java", 3, 6);
        let second = smell("Magic Number", "A.java", 5, 5);
        let lines = render_lines(&content, &[&first, &second]);

        let line5 = lines[4].highlight.unwrap();
        assert_eq!(line5.smell.smell_type, "Magic Number");
        assert_eq!(line5.severity, Severity::Low);
        assert_eq!(line5.covering, 2);
        assert_eq!(lines[4].badge.unwrap().smell.smell_type, "Magic Number");

        // untouched parts of the first smell keep its color
        assert_eq!(lines[3].highlight.unwrap().severity, Severity::High);
        assert_eq!(lines[5].highlight.unwrap().smell.smell_type, "God class");
    }

    #[test]
    fn test_same_start_line_keeps_later_badge() {
        let content = numbered_file(4);
        let a = smell("Long Method", "A.java", 1, 2);
        let b = smell("Too Many Methods", "A.java", 1, 1);
        let lines = render_lines(&content, &[&a, &b]);
        let badge = lines[0].badge.unwrap();
        assert_eq!(badge.smell.smell_type, "Too Many Methods");
        assert_eq!(badge.severity, Severity::Medium);
    }

    #[test]
    fn test_out_of_range_is_silent() {
        let content = numbered_file(3);
        let past_end = smell("Long Method", "A.java", 8, 20);
        let negative = smell("Long Method", "A.java", -4, -1);
        let inverted = smell("Long Method", "A.java", 3, 1);
        let lines = render_lines(&content, &[&past_end, &negative, &inverted]);
        assert_eq!(lines.len(), 3);
        assert!(highlighted(&lines).is_empty());
        // an inverted range still anchors its badge
        assert!(lines[2].badge.is_some());
    }

    #[test]
    fn test_extreme_line_numbers_do_not_overflow() {
        let content = "a\nb\nc";
        let from_min = smell("Long Method", "A.java", i64::MIN, 5);
        let to_max = smell("Long Method", "A.java", 2, i64::MAX);
        let at_max = smell("God class", "A.java", i64::MAX - 1, i64::MAX);
        let inverted = smell("God class", "A.java", i64::MAX, i64::MIN);

        assert_eq!(highlight_range(&from_min), i64::MIN..=i64::MIN + 3);
        assert_eq!(highlight_range(&to_max), 2..=5);
        assert_eq!(highlight_range(&at_max), i64::MAX - 1..=i64::MAX);
        assert!(highlight_range(&inverted).is_empty());

        let lines = render_lines(content, &[&from_min, &to_max, &at_max, &inverted]);
        assert_eq!(lines.len(), 3);
        assert_eq!(highlighted(&lines), vec![2, 3]);
    }

    #[test]
    fn test_badge_color_follows_line_owner() {
        let content = numbered_file(10);
        let god = smell("God class", "A.java", 5, 8);
        let magic = smell("Magic Number", "A.java", 3, 6);
        let lines = render_lines(&content, &[&god, &magic]);

        let line5 = &lines[4];
        let badge = line5.badge.unwrap();
        let highlight = line5.highlight.unwrap();
        assert_eq!(badge.smell.smell_type, "God class");
        assert_eq!(highlight.smell.smell_type, "Magic Number");
        assert_eq!(badge.severity, highlight.severity);
        assert_eq!(badge.severity, Severity::Low);

        // no highlight on the anchor: the badge keeps its own severity
        let inverted = smell("God class", "A.java", 9, 2);
        let lines = render_lines(&content, &[&inverted]);
        assert_eq!(lines[8].badge.unwrap().severity, Severity::High);
    }

    #[test]
    fn test_partially_out_of_range() {
        let content = numbered_file(3);
        let s = smell("Long Method", "A.java", 2, 9);
        let lines = render_lines(&content, &[&s]);
        assert_eq!(highlighted(&lines), vec![2, 3]);
    }

    #[test]
    fn test_severity_tiers() {
        assert_eq!(Severity::from_smell_type("God class"), Severity::High);
        assert_eq!(Severity::from_smell_type("Long Method (62 lines)"), Severity::High);
        assert_eq!(
            Severity::from_smell_type("High Cyclomatic Complexity"),
            Severity::High
        );
        assert_eq!(Severity::from_smell_type("Too Many Methods"), Severity::Medium);
        assert_eq!(
            Severity::from_smell_type("Throwing Raw Exception Types"),
            Severity::Medium
        );
        assert_eq!(Severity::from_smell_type("Magic Number"), Severity::Low);
        // matching is case-sensitive, like the backend's names
        assert_eq!(Severity::from_smell_type("god class"), Severity::Low);
        assert_eq!(Severity::High.weight(), 4);
        assert_eq!(Severity::Medium.weight(), 3);
        assert_eq!(Severity::Low.weight(), 1);
    }

    #[test]
    fn test_empty_line_display() {
        let content = "fn main() {\n\n}\r\n";
        let lines = render_lines(content, &[]);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].display_text(), " ");
        assert_eq!(lines[2].text, "}");
    }

    #[test]
    fn test_smells_for_file_filters_by_name() {
        let smells = vec![
            smell("Long Method", "A.java", 1, 2),
            smell("God class", "B.java", 1, 2),
            smell("Magic Number", "A.java", 3, 3),
        ];
        let for_a = smells_for_file(&smells, "A.java");
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[1].smell_type, "Magic Number");
        assert!(smells_for_file(&smells, "C.java").is_empty());
    }

    #[test]
    fn test_file_smell_counts() {
        let files = vec![
            FileData {
                file_name: "A.java".into(),
                content: String::new(),
                id: "f1".into(),
            },
            FileData {
                file_name: "B.java".into(),
                content: String::new(),
                id: "f2".into(),
            },
        ];
        let smells = vec![smell("Long Method", "A.java", 1, 2), smell("God class", "A.java", 4, 9)];
        let counts: Vec<usize> = file_smell_counts(&files, &smells).iter().map(|(_, c)| *c).collect();
        assert_eq!(counts, vec![2, 0]);
    }
}
