//! Layered ignore rules for a scan root.
//!
//! Rules are applied in gitignore order, so a later `!pattern` re-includes a
//! path an earlier rule excluded:
//!
//! 1. built-in defaults ([`DEFAULT_IGNORES`])
//! 2. caller-supplied patterns
//! 3. `<root>/.gitignore`
//! 4. `<root>/.ctxsyncignore`

use crate::error::CtxsyncError;
use globset::Glob;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Tool-specific ignore file read from the scan root.
pub const TOOL_IGNORE_FILE: &str = ".ctxsyncignore";
/// Project-local config file; never uploaded.
pub const LOCAL_CONFIG_FILE: &str = ".ctxsync.toml";

pub const DEFAULT_IGNORES: &[&str] = &[
    // Version control
    ".git/",
    ".svn/",
    ".hg/",
    // Dependencies
    "node_modules/",
    "bower_components/",
    "vendor/",
    ".venv/",
    "venv/",
    "__pycache__/",
    ".pnpm-store/",
    // Build output
    "target/",
    "dist/",
    "build/",
    "out/",
    ".next/",
    ".nuxt/",
    ".turbo/",
    ".cache/",
    "coverage/",
    // Lockfiles
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "poetry.lock",
    "Gemfile.lock",
    "composer.lock",
    // Binary and media
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.ico",
    "*.webp",
    "*.pdf",
    "*.zip",
    "*.tar",
    "*.gz",
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.woff",
    "*.woff2",
    "*.ttf",
    "*.mp3",
    "*.mp4",
    "*.sqlite",
    "*.pyc",
    "*.class",
    // Generated
    "*.map",
    "*.min.js",
    "*.min.css",
    // Secrets
    ".env",
    ".env.*",
    // Our own config
    LOCAL_CONFIG_FILE,
];

#[derive(Debug, Clone)]
pub struct IgnoreRules {
    gitignore: Gitignore,
}

impl IgnoreRules {
    /// Builds the rule set for `root`.
    ///
    /// A bad line inside an ignore file is logged and skipped; a bad entry in
    /// `extra_patterns` is an error since it came from the user directly.
    pub fn new(
        root: &Path,
        extra_patterns: &[String],
        respect_gitignore: bool,
    ) -> Result<Self, CtxsyncError> {
        let mut builder = GitignoreBuilder::new(root);

        for pattern in DEFAULT_IGNORES {
            builder
                .add_line(None, pattern)
                .map_err(|e| CtxsyncError::pattern(*pattern, e))?;
        }

        for pattern in extra_patterns {
            // The gitignore parser treats an unparseable glob as a literal,
            // so check the glob itself first.
            let glob = pattern.strip_prefix('!').unwrap_or(pattern);
            Glob::new(glob).map_err(|e| CtxsyncError::pattern(pattern.as_str(), e))?;
            builder
                .add_line(None, pattern)
                .map_err(|e| CtxsyncError::pattern(pattern.as_str(), e))?;
        }

        if respect_gitignore {
            add_file(&mut builder, &root.join(".gitignore"));
        }
        add_file(&mut builder, &root.join(TOOL_IGNORE_FILE));

        let gitignore = builder
            .build()
            .map_err(|e| CtxsyncError::Walk(format!("Failed to build ignore rules: {}", e)))?;
        Ok(Self { gitignore })
    }

    /// Whether `relative` (a path under the root) is excluded.
    ///
    /// `is_dir` must be true for directories so that `dir/`-style patterns
    /// apply to them.
    pub fn is_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        self.gitignore.matched(relative, is_dir).is_ignore()
    }
}

fn add_file(builder: &mut GitignoreBuilder, path: &Path) {
    if !path.is_file() {
        return;
    }
    if let Some(err) = builder.add(path) {
        tracing::warn!("Skipping unusable lines in {}: {}", path.display(), err);
    }
}
