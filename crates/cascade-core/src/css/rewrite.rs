//! Relative URL re-anchoring for compiled CSS.
//!
//! Copyright (c) 2025 the cascade contributors
//!
//! When compiled CSS is persisted somewhere other than its source
//! directory, every relative `url(...)` reference inside it goes stale.
//! [`rewrite_relative_urls`] re-anchors each reference so it stays valid
//! from the output file's directory.
//!
//! This is a regex-level substitution, not a CSS tokenizer: a `url(...)`
//! that happens to sit inside a comment or string literal is rewritten
//! too if it matches the pattern. References containing `:` (protocol
//! URLs, data URIs) never match the pattern at all; root-relative
//! references match but are left untouched.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use cascade_util::paths;

/// Matches `url(...)` with optional whitespace and an optional matching
/// quote, case-insensitively. The path body may not contain `:` or a
/// closing paren; three alternatives stand in for a quote backreference.
static URL_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)url\s*\(\s*(?:"(?P<dq>[^":)]+)"|'(?P<sq>[^':)]+)'|(?P<bare>[^"'\s:)][^:)]*?))\s*\)"#,
    )
    .unwrap()
});

/// Re-anchor every eligible relative `url(...)` reference.
///
/// `source_dir` is the directory the references currently resolve
/// against; `output_file` is where the CSS will be persisted. Returns
/// the input unchanged - without touching the file system at all - when
/// nothing matches, and keeps all text outside matched spans
/// byte-identical otherwise.
///
/// A reference that cannot be resolved (forbidden path characters) is
/// skipped on its own; it never aborts or alters other references.
pub fn rewrite_relative_urls(css: &str, source_dir: &Path, output_file: &Path) -> String {
    if !URL_RX.is_match(css) {
        return css.to_string();
    }

    // References resolve against the source directory; when it is gone
    // there is nothing meaningful to re-anchor.
    if source_dir.as_os_str().is_empty() || !source_dir.is_dir() {
        return css.to_string();
    }
    if output_file.as_os_str().is_empty() {
        return css.to_string();
    }
    let output_dir = match output_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => paths::normalize(parent),
        _ => return css.to_string(),
    };

    URL_RX
        .replace_all(css, |caps: &Captures<'_>| {
            let (quote, body) = quoted_body(caps);
            match rewrite_reference(body, source_dir, &output_dir) {
                Some(rewritten) => format!("url({quote}{rewritten}{quote})"),
                // Skipped references keep their exact original span
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Pull the quote style and path body out of one match.
fn quoted_body<'h>(caps: &Captures<'h>) -> (&'static str, &'h str) {
    if let Some(body) = caps.name("dq") {
        ("\"", body.as_str())
    } else if let Some(body) = caps.name("sq") {
        ("'", body.as_str())
    } else {
        ("", caps.name("bare").map_or("", |m| m.as_str()))
    }
}

/// Rewrite one reference body, or `None` to leave the match untouched.
fn rewrite_reference(body: &str, source_dir: &Path, output_dir: &Path) -> Option<String> {
    // Root-relative references resolve against a server root, not
    // against this stylesheet; never rewrite them.
    if body.starts_with('/') {
        return None;
    }

    // The query string is never part of the path; carry it verbatim.
    let (path_only, query) = match body.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (body, None),
    };

    let absolute = paths::resolve(source_dir, path_only)?;
    let mut rewritten = paths::make_relative(output_dir, &absolute);
    if let Some(query) = query {
        rewritten.push('?');
        rewritten.push_str(query);
    }
    Some(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// A real source directory plus an output file a directory away.
    fn fixture() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let root = tempfile::tempdir().unwrap();
        let source_dir = root.path().join("src");
        std::fs::create_dir_all(&source_dir).unwrap();
        let output_file = root.path().join("dist").join("out.css");
        (root, source_dir, output_file)
    }

    // === No-op inputs ===

    #[test]
    fn test_root_relative_references_are_untouched() {
        let (_root, source_dir, output_file) = fixture();
        let css = r#"body { background: url(/img/a.png); }"#;
        assert_eq!(rewrite_relative_urls(css, &source_dir, &output_file), css);
    }

    #[test]
    fn test_protocol_urls_never_match() {
        let (_root, source_dir, output_file) = fixture();
        let css = concat!(
            "a { background: url(https://cdn.example.com/a.png); }\n",
            "b { background: url('data:image/png;base64,iVBORw0='); }\n",
        );
        assert_eq!(rewrite_relative_urls(css, &source_dir, &output_file), css);
    }

    #[test]
    fn test_no_matches_returns_input_unchanged() {
        // Nonexistent source dir on purpose: with zero matches the file
        // system must not even be consulted.
        let css = "body { color: red; }";
        let result = rewrite_relative_urls(
            css,
            Path::new("/definitely/not/on/disk"),
            Path::new("/dist/out.css"),
        );
        assert_eq!(result, css);
    }

    #[test]
    fn test_missing_source_dir_skips_rewriting() {
        let css = r#"body { background: url("img/a.png"); }"#;
        let result = rewrite_relative_urls(
            css,
            Path::new("/definitely/not/on/disk"),
            Path::new("/dist/out.css"),
        );
        assert_eq!(result, css);
    }

    #[test]
    fn test_empty_source_dir_skips_rewriting() {
        let css = r#"body { background: url("img/a.png"); }"#;
        assert_eq!(
            rewrite_relative_urls(css, Path::new(""), Path::new("/dist/out.css")),
            css
        );
    }

    #[test]
    fn test_empty_output_file_skips_rewriting() {
        let (_root, source_dir, _) = fixture();
        let css = r#"body { background: url("img/a.png"); }"#;
        assert_eq!(rewrite_relative_urls(css, &source_dir, Path::new("")), css);
    }

    // === Rewriting ===

    #[test]
    fn test_rewrites_relative_reference() {
        let (_root, source_dir, output_file) = fixture();
        let css = r#"body { background: url("img/a.png"); }"#;
        let result = rewrite_relative_urls(css, &source_dir, &output_file);
        assert_eq!(result, r#"body { background: url("../src/img/a.png"); }"#);
    }

    #[test]
    fn test_query_string_is_preserved() {
        let (_root, source_dir, output_file) = fixture();
        let css = r#"@font-face { src: url("img/a.png?v=2"); }"#;
        let result = rewrite_relative_urls(css, &source_dir, &output_file);
        assert_eq!(result, r#"@font-face { src: url("../src/img/a.png?v=2"); }"#);
    }

    #[test]
    fn test_quote_styles_round_trip() {
        let (_root, source_dir, output_file) = fixture();

        let single = rewrite_relative_urls("url('a.css')", &source_dir, &output_file);
        assert_eq!(single, "url('../src/a.css')");

        let double = rewrite_relative_urls(r#"url("a.css")"#, &source_dir, &output_file);
        assert_eq!(double, r#"url("../src/a.css")"#);

        let bare = rewrite_relative_urls("url(a.css)", &source_dir, &output_file);
        assert_eq!(bare, "url(../src/a.css)");
    }

    #[test]
    fn test_url_token_is_case_insensitive() {
        let (_root, source_dir, output_file) = fixture();
        let result = rewrite_relative_urls("URL(a.css)", &source_dir, &output_file);
        assert_eq!(result, "url(../src/a.css)");
    }

    #[test]
    fn test_whitespace_inside_parens() {
        let (_root, source_dir, output_file) = fixture();
        let result = rewrite_relative_urls("url( a.css )", &source_dir, &output_file);
        assert_eq!(result, "url(../src/a.css)");
    }

    #[test]
    fn test_parent_traversal_in_reference() {
        let (_root, source_dir, output_file) = fixture();
        let css = r#"url("../shared/a.png")"#;
        let result = rewrite_relative_urls(css, &source_dir, &output_file);
        // src/../shared/a.png resolves next to dist, one level up
        assert_eq!(result, r#"url("../shared/a.png")"#);
    }

    #[test]
    fn test_invalid_reference_skips_only_itself() {
        let (_root, source_dir, output_file) = fixture();
        let css = r#"a { background: url("bad|name.png"); } b { background: url("a.png"); }"#;
        let result = rewrite_relative_urls(css, &source_dir, &output_file);
        assert!(result.contains(r#"url("bad|name.png")"#));
        assert!(result.contains(r#"url("../src/a.png")"#));
    }

    #[test]
    fn test_multiple_references_rewritten_in_order() {
        let (_root, source_dir, output_file) = fixture();
        let css = "a{background:url(one.png)}b{background:url(two.png)}";
        let result = rewrite_relative_urls(css, &source_dir, &output_file);
        assert_eq!(
            result,
            "a{background:url(../src/one.png)}b{background:url(../src/two.png)}"
        );
    }

    #[test]
    fn test_text_outside_matches_is_untouched() {
        let (_root, source_dir, output_file) = fixture();
        let css = "/* url: see docs */ a { background: url(a.png); } /* trailing */";
        let result = rewrite_relative_urls(css, &source_dir, &output_file);
        assert!(result.starts_with("/* url: see docs */ a { background: "));
        assert!(result.ends_with("} /* trailing */"));
    }

    #[test]
    fn test_output_next_to_source_keeps_short_paths() {
        let root = tempfile::tempdir().unwrap();
        let source_dir = root.path().join("src");
        std::fs::create_dir_all(&source_dir).unwrap();
        let output_file = source_dir.join("out.css");

        let result = rewrite_relative_urls("url(img/a.png)", &source_dir, &output_file);
        assert_eq!(result, "url(img/a.png)");
    }
}
