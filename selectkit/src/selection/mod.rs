//! Selection tracking - a list of selectable entries with a live view of
//! the selected values.
//!
//! - `config.rs` - ordering configuration
//! - `view.rs` - the derived view and its ordering algorithm
//! - `list.rs` - the list itself
//!
//! # Example
//!
//! ```
//! use selectkit::prelude::*;
//!
//! let entries: Vec<_> = ["A", "B", "C", "D"].into_iter().map(SelectableEntry::new).collect();
//! let list = SelectionTrackingList::with_entries(SelectionConfig::default(), entries.clone()).unwrap();
//!
//! entries[2].set_selected(true);
//! entries[0].set_selected(true);
//! assert_eq!(list.selected_values(), vec!["C", "A"]);
//!
//! list.set_maintain_order(true);
//! entries[3].set_selected(true);
//! entries[2].set_selected(false);
//! assert_eq!(list.selected_values(), vec!["A", "D"]);
//! ```

mod config;
mod list;
mod view;

pub use config::SelectionConfig;
pub use list::{ListId, SelectionTrackingList, WeakSelectionTrackingList};
pub use view::SelectedView;
