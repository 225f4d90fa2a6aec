pub mod commands;
pub mod config;
pub mod settlement;

pub use commands::run;
pub use config::*;
pub use settlement::*;
