use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type ComponentId = String;

/// The kind of construct a [`Component`] was extracted from.
///
/// Unknown or language-framework-specific kinds are represented by
/// `Other(String)` so that future extractors never need to break this enum
/// to add a new construct; they serialize verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Class,
    Interface,
    Struct,
    Enum,
    Record,
    Annotation,
    Trait,
    Function,
    Method,
    Variable,
    TypeAlias,
    VueComponent,
    VueProps,
    VueEmits,
    Other(String),
}

impl ComponentKind {
    /// The kind set permitted as leaves by default (spec §4.2 "Leaf identification").
    pub fn is_default_leaf_kind(&self) -> bool {
        matches!(
            self,
            ComponentKind::Class | ComponentKind::Interface | ComponentKind::Struct
        )
    }

    pub fn is_function_like(&self) -> bool {
        matches!(self, ComponentKind::Function | ComponentKind::Method)
    }
}

/// A single extracted code element.
///
/// `id` is a stable string of the form `<dotted_module_path>.<name>` for
/// top-level elements, or `<dotted_module_path>.<class>.<name>` for members;
/// see [`crate::component::component_id`] for the derivation rule shared by
/// all extractor strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub kind: ComponentKind,
    pub file_path: String,
    pub relative_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub source_code: Option<String>,
    pub docstring: Option<String>,
    pub has_doc: bool,
    pub parameters: Option<Vec<String>>,
    pub base_types: Option<Vec<String>>,
    pub enclosing_class: Option<ComponentId>,
    pub depends_on: HashSet<ComponentId>,
    pub language: Language,
    /// Free-form attribute bag for language-specific extensions (e.g. Vue
    /// reactivity flavor, macro invocation kind). Unknown attributes never
    /// cause a parse failure; they round-trip through JSON untouched.
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Component {
    pub fn new(
        id: impl Into<ComponentId>,
        name: impl Into<String>,
        kind: ComponentKind,
        file_path: impl Into<String>,
        relative_path: impl Into<String>,
        start_line: u32,
        end_line: u32,
        language: Language,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            file_path: file_path.into(),
            relative_path: relative_path.into(),
            start_line,
            end_line,
            source_code: None,
            docstring: None,
            has_doc: false,
            parameters: None,
            base_types: None,
            enclosing_class: None,
            depends_on: HashSet::new(),
            language,
            extra: HashMap::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_code = Some(source.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.docstring = Some(doc.into());
        self.has_doc = true;
        self
    }
}

/// Derives a component id from a path relative to the repository root and a
/// dotted member path (e.g. `["MyClass", "method"]`).
///
/// The extension is stripped and path separators are mapped to `.`, matching
/// spec.md §3: "`<dotted_module_path>.<name>`...derived from path relative
/// to repository root (extension stripped, separators mapped to `.`)".
pub fn component_id(relative_path: &str, member_path: &[&str]) -> ComponentId {
    let module_path = relative_path
        .trim_end_matches(|_| false)
        .rsplit_once('.')
        .map(|(stem, _ext)| stem)
        .unwrap_or(relative_path)
        .replace(['/', '\\'], ".");

    if member_path.is_empty() {
        module_path
    } else {
        format!("{}.{}", module_path, member_path.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_top_level_id() {
        assert_eq!(component_id("a/b.py", &["f"]), "a.b.f");
    }

    #[test]
    fn derives_member_id() {
        assert_eq!(component_id("pkg/mod.go", &["S", "Do"]), "pkg.mod.S.Do");
    }

    #[test]
    fn strips_nested_extension() {
        assert_eq!(component_id("src/app.vue", &["App"]), "src.app.App");
    }
}
