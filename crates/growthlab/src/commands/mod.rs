pub mod analyze;
pub mod import;
pub mod results;
pub mod version;
