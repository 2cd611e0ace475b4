//! Catalog compilation and queries.
//!
//! License: MIT OR Apache-2.0

pub mod compiler;

pub use compiler::{compile_catalog, get_or_compile_catalog, CompiledCatalog, CompiledDetector};
