//! Public library modules for the CLI crate
pub mod listing;
pub mod logging;
pub mod retag;
