/// Line bookmarks that stay attached to their content while a document is edited.
///
/// The reconciler (`edit`) and navigator (`navigate`) are pure functions over
/// sets of line numbers. `MarkStore` owns the per-file state, drives them on
/// behalf of a host editor and notifies subscribers after each change.
pub mod bookmarks;
pub mod edit;
pub mod events;
pub mod navigate;
pub mod position;
pub mod preview;

pub use bookmarks::{FileMarks, MarkStore};
pub use edit::{reconcile, reconcile_all, reconcile_line, EditDescription};
pub use events::{MarkEvent, Subscription};
pub use navigate::{next_line, prev_line};
pub use position::{Position, Selection, TextRange};
pub use preview::{display_path, line_preview};
