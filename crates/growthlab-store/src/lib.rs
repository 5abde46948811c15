//! File-backed collaborators: data directories, snapshots, saved reports and
//! platform payload import

mod io;
mod paths;
mod results;
mod snapshot;
pub mod youtube;

pub use io::{atomic_write, read_json, write_json_pretty};
pub use paths::Paths;
pub use results::ResultStore;
pub use snapshot::{Snapshot, SnapshotSource};
