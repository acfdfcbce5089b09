//! Core compilation pipeline for cascade
//!
//! This crate contains the asset-compilation pipeline that powers the
//! cascade CLI: it orchestrates an external Sass transformer (and an
//! optional autoprefixing post-processor), normalizes the transformer's
//! diagnostics into line/column-addressable records, and re-anchors
//! relative `url(...)` references so compiled CSS stays valid after it
//! is persisted away from its source directory.
//!
//! # Architecture
//!
//! The pipeline is organized around these pieces:
//!
//! - [`config`] - the read-only [`CompilerOptions`] view and the
//!   per-call [`CompilationUnit`]
//! - [`compiler`] - subprocess orchestration ([`compile`]) and
//!   diagnostic normalization
//! - [`css`] - the purely textual URL rewriting composed over compiled
//!   output ([`rewrite_relative_urls`])
//!
//! # Example
//!
//! ```ignore
//! use cascade_core::{CompilationUnit, CompilerOptions, compile, rewrite_relative_urls};
//! use std::path::PathBuf;
//!
//! let unit = CompilationUnit {
//!     source: PathBuf::from("/project/styles/site.scss"),
//!     config_dir: PathBuf::from("/project"),
//!     output: PathBuf::from("/project/dist/site.css"),
//!     options: CompilerOptions::default(),
//! };
//!
//! let mut result = compile(&unit);
//! if !result.has_errors() {
//!     result.compiled_content = rewrite_relative_urls(
//!         &result.compiled_content,
//!         unit.source.parent().unwrap(),
//!         &unit.output,
//!     );
//! }
//! ```

pub mod compiler;
pub mod config;
pub mod css;
pub mod error;

// Re-export commonly used types
pub use compiler::{
    CompilationResult, CompilerError, Diagnostic, DiagnosticPayload, compile, parse_diagnostic,
};
pub use config::{CompilationUnit, CompilerOptions, OutputStyle, split_delimited_paths};
pub use css::rewrite_relative_urls;
pub use error::CompileError;
