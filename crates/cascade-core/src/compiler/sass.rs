/*
 * compiler/sass.rs
 * Copyright (c) 2025 the cascade contributors
 *
 * External Sass transformer orchestration.
 */

//! External Sass transformer orchestration.
//!
//! This module drives one compilation unit end to end:
//! - Finding the `sass` binary (and `postcss` when autoprefixing)
//! - Building the transformer argument list from `CompilerOptions`
//! - Spawning the transformer with both output streams captured
//! - Normalizing the error stream into at most one `CompilerError`
//!
//! # Finding the transformer
//!
//! [`find_sass`] searches in this order:
//! 1. `CASCADE_SASS` environment variable (path to the binary or to a
//!    directory containing it)
//! 2. The configured tool directory (directly, then under
//!    `node_modules/.bin`)
//! 3. System PATH via `which`
//!
//! # Stream handling
//!
//! Both output streams are drained concurrently with the subprocess's
//! own execution. A child that fills one pipe while nobody reads it
//! stalls forever, so exit is only awaited alongside the reads.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::compiler::diagnostics::{DiagnosticPayload, parse_diagnostic};
use crate::compiler::types::{CompilationResult, CompilerError};
use crate::config::{CompilationUnit, CompilerOptions};
use crate::error::CompileError;

/// Environment variable overriding sass discovery.
pub const SASS_ENV_VAR: &str = "CASCADE_SASS";

/// Environment variable overriding postcss discovery.
pub const POSTCSS_ENV_VAR: &str = "CASCADE_POSTCSS";

/// Marker identifying an embedded source-map trailer.
const SOURCE_MAP_MARKER: &str = "sourceMappingURL=data:";

// ============================================================================
// Transformer Discovery
// ============================================================================

/// Find the sass binary.
pub fn find_sass(tool_dir: Option<&Path>) -> Option<PathBuf> {
    find_tool("sass", SASS_ENV_VAR, tool_dir)
}

/// Find the postcss binary.
pub fn find_postcss(tool_dir: Option<&Path>) -> Option<PathBuf> {
    find_tool("postcss", POSTCSS_ENV_VAR, tool_dir)
}

fn find_tool(name: &str, env_var: &str, tool_dir: Option<&Path>) -> Option<PathBuf> {
    if let Ok(configured) = std::env::var(env_var) {
        let configured = PathBuf::from(configured);
        if configured.is_file() {
            return Some(configured);
        }
        if configured.is_dir() {
            let in_dir = configured.join(binary_name(name));
            if in_dir.is_file() {
                return Some(in_dir);
            }
        }
    }

    if let Some(dir) = tool_dir {
        let direct = dir.join(binary_name(name));
        if direct.is_file() {
            return Some(direct);
        }

        // npm layouts place executables under node_modules/.bin
        let node_bin = dir.join("node_modules").join(".bin").join(binary_name(name));
        if node_bin.is_file() {
            return Some(node_bin);
        }
    }

    which::which(name).ok()
}

/// Get the platform-appropriate binary name.
fn binary_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.cmd")
    } else {
        name.to_string()
    }
}

// ============================================================================
// Argument Construction
// ============================================================================

/// Build the transformer argument list from compiler options.
pub fn build_sass_args(options: &CompilerOptions) -> Vec<String> {
    let mut args = Vec::new();

    if options.source_map {
        args.push("--embed-source-map".to_string());
    } else {
        args.push("--no-source-map".to_string());
    }

    if options.quiet {
        args.push("--quiet".to_string());
    }
    if options.quiet_deps {
        args.push("--quiet-deps".to_string());
    }

    if let Some(style) = options.output_style {
        args.push(format!("--style={}", style.as_str()));
    }

    for load_path in &options.load_paths {
        args.push(format!("--load-path={load_path}"));
    }

    args
}

/// Build the postcss argument list for the autoprefix chain.
fn build_postcss_args(options: &CompilerOptions) -> Vec<String> {
    let mut args = vec!["--use".to_string(), "autoprefixer".to_string()];
    if !options.source_map {
        args.push("--no-map".to_string());
    }
    args
}

/// Prepend the tool directory to the subprocess PATH so transformer
/// helpers (e.g. autoprefixer plugins) resolve from there first.
fn prepend_tool_dir(cmd: &mut Command, tool_dir: &Path) {
    let current = std::env::var_os("PATH").unwrap_or_default();
    let mut paths = vec![tool_dir.to_path_buf()];
    paths.extend(std::env::split_paths(&current));
    match std::env::join_paths(paths) {
        Ok(joined) => {
            cmd.env("PATH", joined);
        }
        Err(e) => {
            tracing::warn!("could not prepend {} to PATH: {e}", tool_dir.display());
        }
    }
}

// ============================================================================
// Subprocess Execution
// ============================================================================

/// Raw captured output of one transformer invocation.
struct RawOutput {
    stdout: String,
    stderr: String,
}

fn run_transformer(unit: &CompilationUnit) -> Result<RawOutput, CompileError> {
    let options = &unit.options;
    let sass = find_sass(options.tool_dir.as_deref())
        .ok_or(CompileError::tool_not_found("sass", SASS_ENV_VAR))?;

    let mut cmd = Command::new(&sass);
    cmd.args(build_sass_args(options))
        .arg(&unit.source)
        // Run from the configuration's directory so relative paths the
        // transformer emits (e.g. in embedded source maps) resolve.
        .current_dir(&unit.config_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(tool_dir) = options.tool_dir.as_deref() {
        prepend_tool_dir(&mut cmd, tool_dir);
    }

    match options.autoprefix_targets.as_deref() {
        Some(targets) => run_chained(unit, cmd, &sass, targets),
        None => run_single(cmd, &sass),
    }
}

fn run_single(mut cmd: Command, sass: &Path) -> Result<RawOutput, CompileError> {
    tracing::debug!(transformer = %sass.display(), "spawning sass");

    let child = cmd.spawn().map_err(|e| spawn_error("sass", sass, &e))?;

    // wait_with_output drains both pipes concurrently before reaping
    let output = child
        .wait_with_output()
        .map_err(|e| CompileError::subprocess("sass", e.to_string()))?;

    Ok(RawOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Chain the transformer's stdout directly into postcss's stdin.
///
/// Two independently spawned subprocesses, no shell in between. The
/// transformer's error stream is drained on a scoped thread while
/// `wait_with_output` drains postcss, so neither pipe can back up.
fn run_chained(
    unit: &CompilationUnit,
    mut sass_cmd: Command,
    sass: &Path,
    targets: &str,
) -> Result<RawOutput, CompileError> {
    let options = &unit.options;
    let postcss = find_postcss(options.tool_dir.as_deref())
        .ok_or(CompileError::tool_not_found("postcss", POSTCSS_ENV_VAR))?;

    let mut sass_child = sass_cmd.spawn().map_err(|e| spawn_error("sass", sass, &e))?;
    let sass_stdout = sass_child
        .stdout
        .take()
        .ok_or_else(|| CompileError::subprocess("sass", "stdout was not captured"))?;
    let mut sass_stderr = sass_child
        .stderr
        .take()
        .ok_or_else(|| CompileError::subprocess("sass", "stderr was not captured"))?;

    let mut postcss_cmd = Command::new(&postcss);
    postcss_cmd
        .args(build_postcss_args(options))
        .current_dir(&unit.config_dir)
        .env("BROWSERSLIST", targets)
        .stdin(Stdio::from(sass_stdout))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(tool_dir) = options.tool_dir.as_deref() {
        prepend_tool_dir(&mut postcss_cmd, tool_dir);
    }

    tracing::debug!(
        transformer = %sass.display(),
        post_processor = %postcss.display(),
        "spawning sass -> postcss chain"
    );
    let postcss_child = match postcss_cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            // Reap the transformer before surfacing the launch failure
            let _ = sass_child.kill();
            let _ = sass_child.wait();
            return Err(spawn_error("postcss", &postcss, &e));
        }
    };

    let (postcss_output, sass_stderr_bytes) = std::thread::scope(|scope| {
        let drain = scope.spawn(move || {
            let mut buf = Vec::new();
            let _ = sass_stderr.read_to_end(&mut buf);
            buf
        });
        let output = postcss_child.wait_with_output();
        let stderr_bytes = drain.join().unwrap_or_default();
        (output, stderr_bytes)
    });

    let _ = sass_child.wait();

    let postcss_output =
        postcss_output.map_err(|e| CompileError::subprocess("postcss", e.to_string()))?;

    let mut stderr = String::from_utf8_lossy(&sass_stderr_bytes).into_owned();
    let postcss_stderr = String::from_utf8_lossy(&postcss_output.stderr);
    if !postcss_stderr.is_empty() {
        if !stderr.is_empty() {
            stderr.push('\n');
        }
        stderr.push_str(&postcss_stderr);
    }

    Ok(RawOutput {
        stdout: String::from_utf8_lossy(&postcss_output.stdout).into_owned(),
        stderr,
    })
}

fn spawn_error(tool: &'static str, path: &Path, err: &std::io::Error) -> CompileError {
    CompileError::subprocess(tool, format!("could not start {}: {}", path.display(), err))
}

/// Truncate compiled output at the end of an embedded source-map trailer.
///
/// The transformer appends the source map as a final comment; compiled
/// content must end exactly at its closing marker.
fn truncate_after_source_map(output: String) -> String {
    if output.contains(SOURCE_MAP_MARKER) {
        if let Some(idx) = output.rfind("*/") {
            return output[..idx + 2].to_string();
        }
    }
    output
}

// ============================================================================
// Compilation
// ============================================================================

/// Compile one unit to completion and assemble its result.
///
/// Blocks until the transformer (and any chained post-processor) exits.
/// Every failure mode becomes a [`CompilerError`] on the result; nothing
/// escapes as a panic or error return.
pub fn compile(unit: &CompilationUnit) -> CompilationResult {
    let original_content = match std::fs::read_to_string(&unit.source) {
        Ok(content) => content,
        Err(e) => {
            let message = format!("Failed to read {}: {}", unit.source.display(), e);
            tracing::error!("{message}");
            return CompilationResult::failed(&unit.source, message);
        }
    };

    let mut result = CompilationResult::new(&unit.source, original_content);

    match run_transformer(unit) {
        Ok(raw) => {
            result.compiled_content = truncate_after_source_map(raw.stdout);
            if !raw.stderr.is_empty() {
                let has_output = !result.compiled_content.is_empty();
                result
                    .errors
                    .push(error_from_stderr(unit, &raw.stderr, has_output));
            }
        }
        Err(e) => {
            tracing::error!(source = %unit.source.display(), "{e}");
            result.errors.push(CompilerError {
                file_name: unit.source.clone(),
                message: e.to_string(),
                line_number: 0,
                column_number: 0,
                is_warning: false,
            });
        }
    }

    result
}

/// Convert a non-empty error stream into one `CompilerError`.
///
/// A recognized diagnostic alongside successfully produced output is a
/// warning; an unrecognized payload is always a hard error at 0/0.
fn error_from_stderr(unit: &CompilationUnit, stderr: &str, has_output: bool) -> CompilerError {
    match parse_diagnostic(stderr) {
        DiagnosticPayload::Structured(d) | DiagnosticPayload::Pattern(d) => CompilerError {
            file_name: unit.source.clone(),
            message: d.message,
            line_number: d.line,
            column_number: d.column,
            is_warning: has_output,
        },
        DiagnosticPayload::Unrecognized => CompilerError {
            file_name: unit.source.clone(),
            message: stderr.to_string(),
            line_number: 0,
            column_number: 0,
            is_warning: false,
        },
    }
}
