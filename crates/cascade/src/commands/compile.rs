//! Compile command implementation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cascade_core::{
    CompilationUnit, CompilerOptions, OutputStyle, compile, rewrite_relative_urls,
    split_delimited_paths,
};

/// Arguments collected from the command line.
pub struct CompileArgs {
    pub input: String,
    pub output: Option<String>,
    pub source_map: bool,
    pub quiet: bool,
    pub quiet_deps: bool,
    pub style: Option<String>,
    pub load_paths: Vec<String>,
    pub autoprefix: Option<String>,
    pub tool_dir: Option<String>,
    pub no_rewrite_urls: bool,
}

pub fn execute(args: CompileArgs) -> Result<()> {
    let source = std::fs::canonicalize(&args.input)
        .with_context(|| format!("input not found: {}", args.input))?;
    let config_dir = source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let output = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output(&source));

    let mut load_paths = Vec::new();
    for raw in &args.load_paths {
        load_paths.extend(split_delimited_paths(raw));
    }

    let output_style = match args.style.as_deref() {
        Some(raw) => {
            let parsed = OutputStyle::parse(raw);
            if parsed.is_none() {
                tracing::warn!("unrecognized output style {raw:?}, ignoring");
            }
            parsed
        }
        None => None,
    };

    let unit = CompilationUnit {
        source: source.clone(),
        config_dir,
        output: output.clone(),
        options: CompilerOptions {
            source_map: args.source_map,
            quiet: args.quiet,
            quiet_deps: args.quiet_deps,
            output_style,
            load_paths,
            autoprefix_targets: args.autoprefix.clone(),
            tool_dir: args.tool_dir.as_ref().map(PathBuf::from),
        },
    };

    let mut result = compile(&unit);

    for error in &result.errors {
        let position = if error.line_number > 0 {
            format!(
                "{}:{}:{}",
                error.file_name.display(),
                error.line_number,
                error.column_number
            )
        } else {
            error.file_name.display().to_string()
        };
        if error.is_warning {
            tracing::warn!("{position}: {}", error.message);
        } else {
            tracing::error!("{position}: {}", error.message);
        }
    }

    if result.has_errors() {
        bail!("compilation of {} failed", source.display());
    }

    if !args.no_rewrite_urls {
        if let Some(source_dir) = source.parent() {
            result.compiled_content =
                rewrite_relative_urls(&result.compiled_content, source_dir, &output);
        }
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }
    }
    std::fs::write(&output, &result.compiled_content)
        .with_context(|| format!("could not write {}", output.display()))?;

    tracing::info!("wrote {}", output.display());
    Ok(())
}

/// Default output path: the input with a `.css` extension.
fn default_output(source: &Path) -> PathBuf {
    source.with_extension("css")
}
