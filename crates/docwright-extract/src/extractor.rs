use crate::file_collect::{collect_source_files, FileCollectionConfig};
use crate::generic::{table_for, GenericExtractor};
use crate::language_registry::LanguageRegistry;
use crate::python::PythonExtractor;
use crate::vue::VueExtractor;
use docwright_core::{CallEdge, Component, Language};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;

/// Per-file extraction result (spec.md §4.1 contract: `(components, edges)`
/// per file, aggregated by the caller into the full-repository set).
#[derive(Debug, Default)]
pub struct ExtractedFile {
    pub relative_path: String,
    pub components: Vec<Component>,
    pub edges: Vec<CallEdge>,
}

/// Drives file discovery and per-file two-pass extraction across a worker
/// pool sized to the CPU count (spec.md §8: "executed across a worker pool
/// sized to the CPU count (with a fallback of 4)").
pub struct Extractor {
    registry: Arc<LanguageRegistry>,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(LanguageRegistry::new()),
        }
    }

    pub async fn extract_repository(
        &self,
        root: &Path,
        config: &FileCollectionConfig,
    ) -> docwright_core::Result<Vec<ExtractedFile>> {
        let files = collect_source_files(root, config)?;
        let worker_count = worker_pool_size();
        tracing::info!(files = files.len(), workers = worker_count, "starting component extraction");

        let registry = self.registry.clone();
        let results: Vec<ExtractedFile> = stream::iter(files)
            .map(move |file| {
                let registry = registry.clone();
                async move {
                    let relative_path = file.relative_path.clone();
                    tokio::task::spawn_blocking(move || {
                        extract_file(&registry, &file.absolute_path, &file.relative_path, file.language)
                    })
                    .await
                    .unwrap_or_else(|join_err| {
                        tracing::warn!(file = %relative_path, error = %join_err, "extraction task panicked");
                        ExtractedFile {
                            relative_path,
                            components: Vec::new(),
                            edges: Vec::new(),
                        }
                    })
                }
            })
            .buffer_unordered(worker_count)
            .collect()
            .await;

        Ok(results)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// `num_cpus::get()` never returns 0 in practice, but the fallback is kept
/// explicit to match the documented contract rather than rely on that.
fn worker_pool_size() -> usize {
    let count = num_cpus::get();
    if count == 0 {
        4
    } else {
        count
    }
}

/// Extracts a single file. Never panics on malformed input: every failure
/// path returns an `ExtractedFile` with empty `components`/`edges` and logs
/// a warning, matching spec.md §4.1's failure semantics.
fn extract_file(
    registry: &LanguageRegistry,
    absolute_path: &Path,
    relative_path: &str,
    language: Language,
) -> ExtractedFile {
    let file_path = absolute_path.to_string_lossy().to_string();
    let empty = || ExtractedFile {
        relative_path: relative_path.to_string(),
        components: Vec::new(),
        edges: Vec::new(),
    };

    let source = match std::fs::read_to_string(absolute_path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(file = %file_path, error = %e, "failed to read file, skipping");
            return empty();
        }
    };

    let (components, edges) = match language {
        Language::Python => {
            let mut extractor = match PythonExtractor::new() {
                Ok(e) => e,
                Err(e) => {
                    tracing::error!(error = %e, "python grammar failed to initialize");
                    return empty();
                }
            };
            match extractor.parse(&source) {
                Some(tree) => extractor.extract(&tree, &source, relative_path, &file_path),
                None => {
                    tracing::warn!(file = %file_path, "python parse failed, skipping");
                    (Vec::new(), Vec::new())
                }
            }
        }
        Language::Vue => VueExtractor::new(registry).extract(&source, relative_path, &file_path),
        other => {
            let Some(table) = table_for(other) else {
                tracing::warn!(language = %other, "no generic node-kind table, skipping");
                return empty();
            };
            let mut parser = match registry.create_parser(other) {
                Some(p) => p,
                None => {
                    tracing::error!(language = %other, "parser initialization failed");
                    return empty();
                }
            };
            match parser.parse(&source, None) {
                Some(tree) => {
                    let extractor = GenericExtractor::new(&table, source.as_bytes(), relative_path, &file_path);
                    extractor.extract(&tree)
                }
                None => {
                    tracing::warn!(file = %file_path, "parse failed, skipping");
                    (Vec::new(), Vec::new())
                }
            }
        }
    };

    ExtractedFile {
        relative_path: relative_path.to_string(),
        components,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn extracts_across_mixed_language_repository() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "def f():\n    pass\n").unwrap();
        fs::write(dir.path().join("b.go"), "package main\nfunc Do() {}\n").unwrap();

        let extractor = Extractor::new();
        let results = extractor
            .extract_repository(
                dir.path(),
                &FileCollectionConfig {
                    include_patterns: vec![],
                    exclude_patterns: vec![],
                },
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        let total_components: usize = results.iter().map(|r| r.components.len()).sum();
        assert!(total_components >= 2);
    }

    #[test]
    fn unreadable_file_degrades_to_empty_result_without_panic() {
        let registry = LanguageRegistry::new();
        let result = extract_file(&registry, Path::new("/nonexistent/path.py"), "path.py", Language::Python);
        assert!(result.components.is_empty());
        assert!(result.edges.is_empty());
    }
}
