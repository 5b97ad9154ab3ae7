//! # MODORDER
//!
//! Dependency ordering for modular model definition files.
//!
//! A modular file reuses code from other models by importing their modeling
//! modules. Before any file can be expanded, every model it imports from must
//! have been expanded first. MODORDER reads the imports of each file, maps
//! filenames and module paths onto model names, and peels the resulting graph
//! into dependency-respecting waves.
//!
//! ## Output Formats
//!
//! - **Plain**: one path per line, in generation order
//! - **Waves**: the same paths grouped by wave
//! - **JSON**: order, waves and the raw dependency map

pub mod core;
pub mod error;
pub mod formatters;
pub mod parsers;

pub use crate::core::{find_priority_list, DependencyResolver, Resolution};
pub use crate::error::{Error, Result};
