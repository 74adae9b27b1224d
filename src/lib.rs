pub mod api;
pub mod args;
pub mod browse;
pub mod errors;
pub mod format;
pub mod model;
pub mod severity;
pub mod style;
pub mod table;
pub mod terminal;
pub mod zip;
