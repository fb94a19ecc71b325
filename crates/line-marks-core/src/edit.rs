/// Keeps bookmarked line numbers attached to their content across text edits.
use std::collections::BTreeSet;

use crate::position::TextRange;

/// One text replacement: the range being replaced and the text replacing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDescription {
    pub range: TextRange,
    pub text: String,
}

impl EditDescription {
    pub fn new(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Number of line breaks introduced by the replacement text.
    ///
    /// Only `'\n'` counts, so `"\r\n"` is one break.
    pub fn inserted_lines(&self) -> usize {
        self.text.bytes().filter(|&b| b == b'\n').count()
    }
}

/// Maps a single bookmarked line through `edit`.
///
/// Returns `None` when the line's content was consumed by the edit.
pub fn reconcile_line(line: usize, edit: &EditDescription) -> Option<usize> {
    let range = edit.range;
    debug_assert!(range.start() <= range.end());
    let start = range.start();
    let span = range.line_span();
    let inserted = edit.inserted_lines();

    if span == 0 {
        // The start line keeps its bookmark; new lines open below it.
        return Some(if line <= start.line {
            line
        } else {
            line + inserted
        });
    }

    if line < start.line || (line == start.line && start.col > 0) {
        Some(line)
    } else if line >= range.end().line {
        // line >= end.line >= span, so this never goes below zero.
        Some(line - span + inserted)
    } else {
        None
    }
}

/// Recomputes the marked lines of one file after `edit`.
///
/// Edits that cannot move a line start (empty set, or a single-line edit
/// without line breaks) return `lines` untouched.
pub fn reconcile(lines: BTreeSet<usize>, edit: &EditDescription) -> BTreeSet<usize> {
    if lines.is_empty() {
        return lines;
    }
    if edit.range.is_single_line() && edit.inserted_lines() == 0 {
        return lines;
    }
    lines
        .into_iter()
        .filter_map(|line| reconcile_line(line, edit))
        .collect()
}

/// Applies the edits of one change event in the order they were reported.
pub fn reconcile_all(lines: BTreeSet<usize>, edits: &[EditDescription]) -> BTreeSet<usize> {
    edits.iter().fold(lines, reconcile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn edit(start: (usize, usize), end: (usize, usize), text: &str) -> EditDescription {
        let range = TextRange::new(
            Position::new(start.0, start.1),
            Position::new(end.0, end.1),
        )
        .unwrap();
        EditDescription::new(range, text)
    }

    fn set(lines: &[usize]) -> BTreeSet<usize> {
        lines.iter().copied().collect()
    }

    #[test]
    fn test_inserted_lines_counts_line_feeds() {
        assert_eq!(edit((0, 0), (0, 0), "").inserted_lines(), 0);
        assert_eq!(edit((0, 0), (0, 0), "a\nb\n").inserted_lines(), 2);
        assert_eq!(edit((0, 0), (0, 0), "a\r\nb").inserted_lines(), 1);
        assert_eq!(edit((0, 0), (0, 0), "a\rb").inserted_lines(), 0);
    }

    #[test]
    fn test_empty_set_is_returned_as_is() {
        let result = reconcile(BTreeSet::new(), &edit((0, 0), (5, 0), "\n\n"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_typing_on_a_line_changes_nothing() {
        let lines = set(&[1, 4, 9]);
        let result = reconcile(lines.clone(), &edit((4, 2), (4, 6), "replacement"));
        assert_eq!(result, lines);
    }

    #[test]
    fn test_newline_on_bookmarked_line_keeps_it() {
        // Pressing Enter in the middle of line 4 splits it; the mark stays on
        // the first fragment and everything below moves down.
        let result = reconcile(set(&[2, 4, 7]), &edit((4, 3), (4, 3), "\n"));
        assert_eq!(result, set(&[2, 4, 8]));
    }

    #[test]
    fn test_paste_of_several_lines_shifts_following_marks() {
        let result = reconcile(set(&[0, 3, 10]), &edit((1, 0), (1, 0), "a\nb\nc\n"));
        assert_eq!(result, set(&[0, 3 + 3, 10 + 3]));
    }

    #[test]
    fn test_deletion_drops_enclosed_marks() {
        let result = reconcile(set(&[5, 7, 9]), &edit((6, 0), (9, 0), ""));
        assert_eq!(result, set(&[5, 6]));
    }

    #[test]
    fn test_deletion_from_line_start_drops_start_line() {
        let result = reconcile(set(&[3, 6]), &edit((3, 0), (5, 0), ""));
        assert_eq!(result, set(&[4]));
    }

    #[test]
    fn test_deletion_mid_line_keeps_start_line() {
        let result = reconcile(set(&[3, 4, 6]), &edit((3, 2), (5, 1), ""));
        assert_eq!(result, set(&[3, 4]));
    }

    #[test]
    fn test_marks_collapsing_onto_one_line_are_deduplicated() {
        // Joining line 3 (from col 5) with line 4: both marks land on line 3.
        let result = reconcile(set(&[3, 4]), &edit((3, 5), (4, 0), ""));
        assert_eq!(result, set(&[3]));
    }

    #[test]
    fn test_replacement_with_more_lines_than_removed() {
        // Lines 2..4 replaced by five lines worth of text: net +3.
        let result = reconcile(set(&[1, 4, 8]), &edit((2, 0), (4, 0), "1\n2\n3\n4\n5\n"));
        assert_eq!(result, set(&[1, 7, 11]));
    }

    #[test]
    fn test_marks_before_edit_never_move() {
        let result = reconcile(set(&[0, 1, 2]), &edit((10, 0), (20, 4), "x"));
        assert_eq!(result, set(&[0, 1, 2]));
    }

    #[test]
    fn test_reconcile_line_reports_consumed_lines() {
        let e = edit((6, 0), (9, 0), "");
        assert_eq!(reconcile_line(5, &e), Some(5));
        assert_eq!(reconcile_line(6, &e), None);
        assert_eq!(reconcile_line(8, &e), None);
        assert_eq!(reconcile_line(9, &e), Some(6));
    }

    #[test]
    fn test_reconcile_all_threads_results_in_order() {
        // Insert two lines at the top, then delete what is now lines 4..6.
        let edits = vec![edit((0, 0), (0, 0), "\n\n"), edit((4, 0), (6, 0), "")];
        let result = reconcile_all(set(&[1, 2, 5, 8]), &edits);
        // 1->3, 2->4 (consumed by the second edit), 5->7->5, 8->10->8
        assert_eq!(result, set(&[3, 5, 8]));
    }

    #[test]
    fn test_reconcile_all_without_edits_is_identity() {
        let lines = set(&[2, 3]);
        assert_eq!(reconcile_all(lines.clone(), &[]), lines);
    }
}
