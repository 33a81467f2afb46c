use docwright_core::Language;
use std::collections::HashMap;
use tree_sitter::Parser;

/// Maps a [`Language`] to its Tree-sitter grammar. `Vue` is intentionally
/// absent: it is a composite strategy that never gets its own parser (see
/// `crate::vue`), and `Python` is absent because it uses a dedicated
/// strategy module rather than the generic traversal engine (spec.md §4.1:
/// "Python uses a built-in syntactic analyzer; all other languages use a
/// grammar-driven incremental parser").
pub struct LanguageRegistry {
    grammars: HashMap<Language, tree_sitter::Language>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        let mut grammars = HashMap::new();
        grammars.insert(Language::JavaScript, tree_sitter_javascript::LANGUAGE.into());
        grammars.insert(
            Language::TypeScript,
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        );
        grammars.insert(Language::Java, tree_sitter_java::LANGUAGE.into());
        grammars.insert(Language::CSharp, tree_sitter_c_sharp::LANGUAGE.into());
        grammars.insert(Language::Cpp, tree_sitter_cpp::LANGUAGE.into());
        grammars.insert(Language::C, tree_sitter_cpp::LANGUAGE.into());
        grammars.insert(Language::Go, tree_sitter_go::LANGUAGE.into());
        grammars.insert(Language::Php, tree_sitter_php::LANGUAGE_PHP.into());
        Self { grammars }
    }

    pub fn create_parser(&self, language: Language) -> Option<Parser> {
        let grammar = self.grammars.get(&language)?;
        let mut parser = Parser::new();
        parser.set_language(grammar).ok()?;
        Some(parser)
    }

    pub fn supports(&self, language: Language) -> bool {
        self.grammars.contains_key(&language)
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
