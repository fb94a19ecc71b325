pub mod config;
pub mod state;

pub use config::{resolve_data_dir, MarksConfig};
pub use state::{FileSnapshot, MarksSnapshot, MarksStateStore};
