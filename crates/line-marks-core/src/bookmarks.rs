/// Per-file bookmark store: marked lines, notes, and change notifications.
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use line_marks_config::{FileSnapshot, MarksSnapshot};

use crate::edit::{reconcile_all, reconcile_line, EditDescription};
use crate::events::{Listeners, MarkEvent, Subscription};
use crate::navigate::{next_line, prev_line};
use crate::position::Selection;

/// Bookmarks of a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMarks {
    /// Set of bookmarked line indices (0-indexed).
    lines: BTreeSet<usize>,
    /// Notes attached to bookmarked lines.
    notes: BTreeMap<usize, String>,
}

impl FileMarks {
    pub fn lines(&self) -> &BTreeSet<usize> {
        &self.lines
    }

    pub fn notes(&self) -> &BTreeMap<usize, String> {
        &self.notes
    }

    fn remove(&mut self, line: usize) -> bool {
        self.notes.remove(&line);
        self.lines.remove(&line)
    }

    /// Moves notes along with their lines after `edits`.
    fn carry_notes(&mut self, edits: &[EditDescription]) {
        if self.notes.is_empty() {
            return;
        }
        let mut notes = std::mem::take(&mut self.notes);
        for edit in edits {
            let mut moved = BTreeMap::new();
            for (line, note) in notes {
                if let Some(new_line) = reconcile_line(line, edit) {
                    // Ascending iteration: the lower original line wins.
                    moved.entry(new_line).or_insert(note);
                }
            }
            notes = moved;
        }
        notes.retain(|line, _| self.lines.contains(line));
        self.notes = notes;
    }
}

/// Bookmarks of every file, owned by whoever hosts the editor session.
#[derive(Debug, Default)]
pub struct MarkStore {
    files: BTreeMap<PathBuf, FileMarks>,
    listeners: Listeners,
}

impl MarkStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from persisted state, dropping notes on unmarked lines.
    pub fn from_snapshot(snapshot: MarksSnapshot) -> Self {
        let mut store = Self::new();
        store.replace_with(snapshot);
        store
    }

    /// Replaces all bookmarks with persisted state.
    pub fn load_snapshot(&mut self, snapshot: MarksSnapshot) {
        self.replace_with(snapshot);
        self.listeners.emit(&MarkEvent::Loaded);
    }

    fn replace_with(&mut self, snapshot: MarksSnapshot) {
        self.files.clear();
        for (path, file) in snapshot.files {
            let lines: BTreeSet<usize> = file.lines.into_iter().collect();
            if lines.is_empty() {
                continue;
            }
            let notes = file
                .notes
                .into_iter()
                .filter(|(line, note)| lines.contains(line) && !note.trim().is_empty())
                .collect();
            self.files
                .insert(PathBuf::from(path), FileMarks { lines, notes });
        }
    }

    /// Captures the current state for persistence.
    pub fn snapshot(&self) -> MarksSnapshot {
        let files = self
            .files
            .iter()
            .map(|(path, marks)| {
                (
                    path.to_string_lossy().into_owned(),
                    FileSnapshot {
                        lines: marks.lines.iter().copied().collect(),
                        notes: marks.notes.clone(),
                    },
                )
            })
            .collect();
        MarksSnapshot { files }
    }

    /// Registers a listener called after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&MarkEvent) + 'static) -> Subscription {
        self.listeners.add(Box::new(listener))
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.listeners.remove(subscription)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The marked lines of `path`, if it has any.
    pub fn marked_lines(&self, path: &Path) -> Option<&BTreeSet<usize>> {
        self.files.get(path).map(FileMarks::lines)
    }

    /// Returns the marked lines of `path`, ascending.
    pub fn lines(&self, path: &Path) -> Vec<usize> {
        self.marked_lines(path)
            .map(|lines| lines.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_marked(&self, path: &Path, line: usize) -> bool {
        self.marked_lines(path)
            .is_some_and(|lines| lines.contains(&line))
    }

    /// Files with at least one bookmark, sorted by path.
    pub fn files(&self) -> impl Iterator<Item = (&Path, &FileMarks)> {
        self.files.iter().map(|(path, marks)| (path.as_path(), marks))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of bookmarks across all files.
    pub fn total_count(&self) -> usize {
        self.files.values().map(|f| f.lines.len()).sum()
    }

    pub fn note(&self, path: &Path, line: usize) -> Option<&str> {
        self.files
            .get(path)
            .and_then(|f| f.notes.get(&line))
            .map(String::as_str)
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Line to jump to when moving forward from `current`.
    pub fn next(&self, path: &Path, current: usize) -> usize {
        let target = self
            .marked_lines(path)
            .map_or(current, |lines| next_line(lines, current));
        tracing::debug!("next bookmark in {}: {current} -> {target}", path.display());
        target
    }

    /// Line to jump to when moving backward from `current`.
    pub fn prev(&self, path: &Path, current: usize) -> usize {
        let target = self
            .marked_lines(path)
            .map_or(current, |lines| prev_line(lines, current));
        tracing::debug!("prev bookmark in {}: {current} -> {target}", path.display());
        target
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Toggles a bookmark on `line`. Returns whether the line is now marked.
    pub fn toggle(&mut self, path: &Path, line: usize) -> bool {
        let marks = self.files.entry(path.to_path_buf()).or_default();
        let marked = if marks.remove(line) {
            false
        } else {
            marks.lines.insert(line);
            true
        };
        self.prune(path);
        self.listeners.emit(&MarkEvent::Toggled {
            path: path.to_path_buf(),
        });
        marked
    }

    /// Toggles bookmarks for the cursors of an editor.
    ///
    /// A single selection covering several lines clears the bookmarks inside
    /// it, if there are any. Otherwise the cursor lines are marked, or all
    /// unmarked when every one of them is already marked.
    pub fn toggle_selections(&mut self, path: &Path, selections: &[Selection]) {
        if let [selection] = selections {
            if selection.spans_lines() {
                let inside: Vec<usize> = self
                    .marked_lines(path)
                    .map(|lines| {
                        lines
                            .range(selection.start().line..=selection.end().line)
                            .copied()
                            .collect()
                    })
                    .unwrap_or_default();
                if !inside.is_empty() {
                    self.remove_lines(path, &inside);
                    return;
                }
            }
        }

        let cursor_lines: BTreeSet<usize> = selections.iter().map(Selection::active_line).collect();
        if cursor_lines.is_empty() {
            return;
        }
        let fresh: Vec<usize> = cursor_lines
            .iter()
            .copied()
            .filter(|line| !self.is_marked(path, *line))
            .collect();

        if fresh.is_empty() {
            let lines: Vec<usize> = cursor_lines.into_iter().collect();
            self.remove_lines(path, &lines);
            return;
        }

        tracing::debug!("marking lines {fresh:?} in {}", path.display());
        let marks = self.files.entry(path.to_path_buf()).or_default();
        marks.lines.extend(fresh);
        self.listeners.emit(&MarkEvent::Toggled {
            path: path.to_path_buf(),
        });
    }

    /// Removes bookmarks (and their notes). Returns whether any was removed.
    pub fn remove_lines(&mut self, path: &Path, lines: &[usize]) -> bool {
        let Some(marks) = self.files.get_mut(path) else {
            return false;
        };
        let mut removed = false;
        for &line in lines {
            removed |= marks.remove(line);
        }
        if !removed {
            return false;
        }
        tracing::debug!("removed bookmarks {lines:?} from {}", path.display());
        self.prune(path);
        self.listeners.emit(&MarkEvent::Removed {
            path: path.to_path_buf(),
        });
        true
    }

    /// Removes every bookmark of `path`. Returns false if it had none.
    pub fn clear_file(&mut self, path: &Path) -> bool {
        if self.files.remove(path).is_none() {
            return false;
        }
        self.listeners.emit(&MarkEvent::FileCleared {
            path: path.to_path_buf(),
        });
        true
    }

    /// Removes every bookmark of every file.
    pub fn clear_all(&mut self) {
        self.files.clear();
        self.listeners.emit(&MarkEvent::AllCleared);
    }

    /// Follows one document change event of `path`, edits in reported order.
    pub fn apply_edits(&mut self, path: &Path, edits: &[EditDescription]) {
        if edits.is_empty() {
            return;
        }
        let Some(marks) = self.files.get_mut(path) else {
            return;
        };
        let before = marks.lines.clone();
        marks.lines = reconcile_all(std::mem::take(&mut marks.lines), edits);
        marks.carry_notes(edits);
        if marks.lines == before {
            return;
        }
        tracing::debug!(
            "reconciled {} after {} edit(s): {:?} -> {:?}",
            path.display(),
            edits.len(),
            before,
            marks.lines
        );
        self.prune(path);
        self.listeners.emit(&MarkEvent::Reconciled {
            path: path.to_path_buf(),
        });
    }

    /// Attaches a note to a marked line. Blank text deletes the note.
    pub fn set_note(&mut self, path: &Path, line: usize, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            self.delete_note(path, line);
            return Ok(());
        }
        let Some(marks) = self.files.get_mut(path).filter(|m| m.lines.contains(&line)) else {
            bail!("no bookmark on line {} of {}", line + 1, path.display());
        };
        marks.notes.insert(line, text.to_string());
        self.listeners.emit(&MarkEvent::NoteChanged {
            path: path.to_path_buf(),
            line,
        });
        Ok(())
    }

    /// Deletes the note on `line`. Returns false if there was none.
    pub fn delete_note(&mut self, path: &Path, line: usize) -> bool {
        let removed = self
            .files
            .get_mut(path)
            .and_then(|m| m.notes.remove(&line))
            .is_some();
        if removed {
            self.listeners.emit(&MarkEvent::NoteChanged {
                path: path.to_path_buf(),
                line,
            });
        }
        removed
    }

    /// Drops the record of `path` once its last bookmark is gone.
    fn prune(&mut self, path: &Path) {
        if self.files.get(path).is_some_and(|m| m.lines.is_empty()) {
            self.files.remove(path);
        }
    }
}
