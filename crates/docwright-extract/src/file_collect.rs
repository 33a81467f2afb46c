use docwright_core::Language;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Version control, build output, dependency, and IDE-metadata directories
/// excluded regardless of user configuration (spec.md §4.1 "a default-ignore
/// set").
const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/target/**",
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/.venv/**",
    "**/venv/**",
    "**/__pycache__/**",
    "**/.pytest_cache/**",
    "**/.idea/**",
    "**/.vscode/**",
    "**/vendor/**",
    "**/.next/**",
    "**/.nuxt/**",
    "**/coverage/**",
    "**/test/**",
    "**/tests/**",
    "**/__tests__/**",
];

pub struct FileCollectionConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

/// A file discovered for extraction, already mapped to its [`Language`].
pub struct DiscoveredFile {
    pub absolute_path: PathBuf,
    pub relative_path: String,
    pub language: Language,
}

fn build_glob_set(patterns: &[&str]) -> docwright_core::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| docwright_core::DocwrightError::Configuration(e.to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| docwright_core::DocwrightError::Configuration(e.to_string()))
}

/// Walks `root` with `ignore::WalkBuilder` (respecting `.gitignore`, never
/// following symlinks) and returns every file whose extension maps to a
/// supported [`Language`] and that survives both the default-ignore set and
/// the user's include/exclude globs.
pub fn collect_source_files(root: &Path, config: &FileCollectionConfig) -> docwright_core::Result<Vec<DiscoveredFile>> {
    let default_excludes = build_glob_set(DEFAULT_EXCLUDES)?;
    let user_excludes = build_glob_set(
        &config
            .exclude_patterns
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>(),
    )?;
    let user_includes = if config.include_patterns.is_empty() {
        None
    } else {
        Some(build_glob_set(
            &config.include_patterns.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        )?)
    };

    let mut walker = WalkBuilder::new(root);
    walker
        .hidden(false)
        .git_ignore(true)
        .git_exclude(true)
        .ignore(true)
        .follow_links(false);

    let mut out = Vec::new();
    for entry in walker.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if default_excludes.is_match(path) || user_excludes.is_match(path) {
            continue;
        }
        if let Some(includes) = &user_includes {
            if !includes.is_match(path) {
                continue;
            }
        }

        let Some(language) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
        else {
            continue;
        };

        if language == Language::Php && is_php_template(path) {
            continue;
        }

        let relative_path = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        out.push(DiscoveredFile {
            absolute_path: path.to_path_buf(),
            relative_path,
            language,
        });
    }

    Ok(out)
}

/// spec.md §4.1 PHP concern: "Skip files matching template patterns
/// (extensions `.blade.php`, `.phtml`, `.twig.php`; path contains `views/`,
/// `templates/`, or `resources/views/`)."
fn is_php_template(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".blade.php")
        || name.ends_with(".phtml")
        || name.ends_with(".twig.php")
        || path_str.contains("views/")
        || path_str.contains("templates/")
        || path_str.contains("resources/views/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn recognizes_php_template_paths() {
        assert!(is_php_template(Path::new("resources/views/home.blade.php")));
        assert!(is_php_template(Path::new("templates/page.phtml")));
        assert!(!is_php_template(Path::new("app/Services/Mailer.php")));
    }

    #[test]
    fn collects_only_supported_and_non_excluded_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "function f() {}").unwrap();
        fs::write(dir.path().join("main.py"), "def f(): pass").unwrap();
        fs::write(dir.path().join("readme.md"), "# hi").unwrap();

        let files = collect_source_files(
            dir.path(),
            &FileCollectionConfig {
                include_patterns: vec![],
                exclude_patterns: vec![],
            },
        )
        .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "main.py");
    }
}
