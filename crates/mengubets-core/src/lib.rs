//! mengubets-core: bet types, validation and scoring for MenguBets
//!
//! This crate holds the scoring engine shared between the `mengubets` CLI and
//! the browser client. Everything in here is pure: no I/O, no shared state.

pub mod display;
pub mod errors;
pub mod registry;
pub mod scoring;
pub mod standings;
pub mod types;
pub mod validation;

pub use display::*;
pub use errors::*;
pub use registry::*;
pub use scoring::*;
pub use standings::*;
pub use types::*;
pub use validation::*;
