/*
 * compiler/types.rs
 * Copyright (c) 2025 the cascade contributors
 *
 * Plain-data records produced by one compilation.
 */

//! Plain-data records produced by one compilation.
//!
//! These carry no registry or host lifecycle: each `CompilationResult`
//! is owned by the caller that issued the compile request, and its
//! `CompilerError` entries are never shared across results.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// One normalized diagnostic attached to a compilation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerError {
    /// Source file the diagnostic refers to.
    pub file_name: PathBuf,

    /// Normalized diagnostic message.
    pub message: String,

    /// 1-based line; 0 means the position is unknown and must never be
    /// treated as a real coordinate.
    pub line_number: u32,

    /// 1-based column; 0 means unknown.
    pub column_number: u32,

    /// Warnings accompany output; hard errors usually do not.
    pub is_warning: bool,
}

/// Output of one compilation unit.
#[derive(Debug, Clone, Serialize)]
pub struct CompilationResult {
    /// Source file this result was compiled from.
    pub file_name: PathBuf,

    /// Stylesheet source text as read before compilation.
    pub original_content: String,

    /// Compiled CSS; empty when compilation failed outright.
    pub compiled_content: String,

    /// Diagnostics attached to this unit, in the order they surfaced.
    pub errors: Vec<CompilerError>,
}

impl CompilationResult {
    /// Create an empty result for a source file.
    pub fn new(file_name: &Path, original_content: String) -> Self {
        Self {
            file_name: file_name.to_path_buf(),
            original_content,
            compiled_content: String::new(),
            errors: Vec::new(),
        }
    }

    /// Create a result that failed before the transformer could run.
    pub fn failed(file_name: &Path, message: String) -> Self {
        Self {
            file_name: file_name.to_path_buf(),
            original_content: String::new(),
            compiled_content: String::new(),
            errors: vec![CompilerError {
                file_name: file_name.to_path_buf(),
                message,
                line_number: 0,
                column_number: 0,
                is_warning: false,
            }],
        }
    }

    /// True when any attached diagnostic is a hard error.
    ///
    /// Severity drives this classification, never the presence or
    /// absence of compiled content alone.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| !e.is_warning)
    }

    /// True when any attached diagnostic is a warning.
    pub fn has_warnings(&self) -> bool {
        self.errors.iter().any(|e| e.is_warning)
    }
}
