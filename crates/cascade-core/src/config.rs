/*
 * config.rs
 * Copyright (c) 2025 the cascade contributors
 *
 * Compiler options and compilation units.
 */

//! Configuration view consumed by the pipeline.
//!
//! Configuration *files* are an external collaborator's concern; this
//! module only defines the read-only view the orchestrator consumes,
//! plus the helpers for delimited fields that view is built from.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output style accepted by the transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    Expanded,
    Compact,
    Nested,
    Compressed,
}

impl OutputStyle {
    /// Parse a configuration string, case-insensitively.
    ///
    /// Unrecognized styles yield `None`; the style flag is then simply
    /// omitted from the argument list.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "expanded" => Some(Self::Expanded),
            "compact" => Some(Self::Compact),
            "nested" => Some(Self::Nested),
            "compressed" => Some(Self::Compressed),
            _ => None,
        }
    }

    /// The value the transformer's `--style=` flag expects.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expanded => "expanded",
            Self::Compact => "compact",
            Self::Nested => "nested",
            Self::Compressed => "compressed",
        }
    }
}

/// Recognized compiler options, derived from the enclosing project
/// configuration. Read-only to the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Embed a source map into the output rather than disabling maps.
    pub source_map: bool,

    /// Silence transformer warnings.
    pub quiet: bool,

    /// Silence warnings originating in dependency stylesheets.
    pub quiet_deps: bool,

    /// Omitted from the argument list when unset.
    pub output_style: Option<OutputStyle>,

    /// Extra `--load-path` entries, in configuration order.
    pub load_paths: Vec<String>,

    /// Browser-target query; setting it enables the autoprefix chain.
    pub autoprefix_targets: Option<String>,

    /// Directory holding the transformer binaries. Searched during
    /// discovery and prepended to the subprocess PATH.
    pub tool_dir: Option<PathBuf>,
}

/// One source file to compile, plus the configuration it belongs to.
///
/// Immutable for the duration of one compile call; created by the caller
/// per build request and never persisted.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    /// Absolute path of the stylesheet source.
    pub source: PathBuf,

    /// Directory of the owning configuration. The transformer runs with
    /// this as its working directory so relative paths it emits (e.g. in
    /// embedded source maps) resolve correctly.
    pub config_dir: PathBuf,

    /// Path the compiled CSS will be persisted to.
    pub output: PathBuf,

    /// Options derived from the owning configuration.
    pub options: CompilerOptions,
}

/// Split a `;`- or `,`-delimited configuration field into entries.
///
/// Entries are trimmed; empty entries are dropped.
pub fn split_delimited_paths(raw: &str) -> Vec<String> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // === OutputStyle ===

    #[test]
    fn test_output_style_parse() {
        assert_eq!(OutputStyle::parse("expanded"), Some(OutputStyle::Expanded));
        assert_eq!(OutputStyle::parse("compact"), Some(OutputStyle::Compact));
        assert_eq!(OutputStyle::parse("nested"), Some(OutputStyle::Nested));
        assert_eq!(
            OutputStyle::parse("compressed"),
            Some(OutputStyle::Compressed)
        );
    }

    #[test]
    fn test_output_style_parse_case_insensitive() {
        assert_eq!(OutputStyle::parse("Expanded"), Some(OutputStyle::Expanded));
        assert_eq!(
            OutputStyle::parse("COMPRESSED"),
            Some(OutputStyle::Compressed)
        );
    }

    #[test]
    fn test_output_style_parse_unrecognized() {
        assert_eq!(OutputStyle::parse("minified"), None);
        assert_eq!(OutputStyle::parse(""), None);
    }

    #[test]
    fn test_output_style_as_str_round_trips() {
        for style in [
            OutputStyle::Expanded,
            OutputStyle::Compact,
            OutputStyle::Nested,
            OutputStyle::Compressed,
        ] {
            assert_eq!(OutputStyle::parse(style.as_str()), Some(style));
        }
    }

    // === split_delimited_paths ===

    #[test]
    fn test_split_semicolons() {
        assert_eq!(
            split_delimited_paths("node_modules;vendor/css"),
            vec!["node_modules", "vendor/css"]
        );
    }

    #[test]
    fn test_split_commas() {
        assert_eq!(
            split_delimited_paths("a,b,c"),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_split_mixed_delimiters_and_whitespace() {
        assert_eq!(
            split_delimited_paths(" a ; b , c "),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_split_drops_empty_entries() {
        assert_eq!(split_delimited_paths("a;;b,"), vec!["a", "b"]);
        assert!(split_delimited_paths("").is_empty());
        assert!(split_delimited_paths(" ; , ").is_empty());
    }

    // === CompilerOptions ===

    #[test]
    fn test_options_default() {
        let options = CompilerOptions::default();
        assert!(!options.source_map);
        assert!(!options.quiet);
        assert!(!options.quiet_deps);
        assert!(options.output_style.is_none());
        assert!(options.load_paths.is_empty());
        assert!(options.autoprefix_targets.is_none());
        assert!(options.tool_dir.is_none());
    }

    #[test]
    fn test_options_deserialize_camel_case() {
        let options: CompilerOptions = serde_json::from_str(
            r#"{"sourceMap": true, "quietDeps": true, "outputStyle": "compressed"}"#,
        )
        .unwrap();
        assert!(options.source_map);
        assert!(options.quiet_deps);
        assert_eq!(options.output_style, Some(OutputStyle::Compressed));
    }
}
