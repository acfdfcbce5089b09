/*
 * error.rs
 * Copyright (c) 2025 the cascade contributors
 *
 * Error types for transformer orchestration.
 */

//! Error types for transformer orchestration.
//!
//! Nothing here crosses the orchestrator boundary: [`compile`] converts
//! every variant into a `CompilerError` record attached to the unit's
//! `CompilationResult`, and the caller decides what a failed build means.
//!
//! [`compile`]: crate::compiler::compile

use thiserror::Error;

/// Failures internal to driving the external transformer.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The transformer binary could not be found anywhere.
    #[error("{tool} not found: install it, add it to PATH, or set {env_hint}")]
    ToolNotFound {
        /// The binary that was searched for
        tool: &'static str,
        /// Environment variable that overrides discovery
        env_hint: &'static str,
    },

    /// The subprocess could not be started or awaited.
    #[error("Failed to run {tool}: {message}")]
    Subprocess {
        /// The binary involved
        tool: &'static str,
        /// Description of what went wrong
        message: String,
    },

    /// IO error while preparing the compilation.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Create a "tool not found" error.
    pub fn tool_not_found(tool: &'static str, env_hint: &'static str) -> Self {
        Self::ToolNotFound { tool, env_hint }
    }

    /// Create a subprocess error.
    pub fn subprocess(tool: &'static str, message: impl Into<String>) -> Self {
        Self::Subprocess {
            tool,
            message: message.into(),
        }
    }
}
