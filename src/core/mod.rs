//! Core data types and models

pub mod history;
pub mod temporal;
pub mod version;

pub use history::*;
pub use temporal::*;
pub use version::*;
