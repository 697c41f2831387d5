//! Export and import of portable JSON snapshots
//!
//! An export bundle combines the value table, hyperparameters, statistics and
//! match history into one human-readable file that can be moved between
//! installations.

mod bundle;

pub use bundle::{ExportBundle, default_file_name};
