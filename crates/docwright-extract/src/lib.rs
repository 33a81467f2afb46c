pub mod extractor;
pub mod file_collect;
pub mod generic;
pub mod language_registry;
pub mod php_namespace;
pub mod python;
pub mod vue;

pub use extractor::{ExtractedFile, Extractor};
pub use file_collect::{collect_source_files, DiscoveredFile, FileCollectionConfig};
pub use language_registry::LanguageRegistry;
