use serde::{Deserialize, Serialize};
use std::fmt;

/// A source language recognized by the Component Extractor.
///
/// `Vue` is a composite strategy layered on top of `JavaScript`/`TypeScript`
/// (see [`crate::component::ComponentKind::VueComponent`]); it is still a
/// first-class language tag because the extractor dispatches on file
/// extension before delegating to the script-block strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    CSharp,
    C,
    Cpp,
    Php,
    Go,
    Vue,
}

impl Language {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "py" | "pyi" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "java" => Some(Language::Java),
            "cs" => Some(Language::CSharp),
            "c" | "h" => Some(Language::C),
            "cpp" | "cxx" | "cc" | "hpp" | "hxx" => Some(Language::Cpp),
            "php" | "phtml" | "php3" | "php4" | "php5" => Some(Language::Php),
            "go" => Some(Language::Go),
            "vue" => Some(Language::Vue),
            _ => None,
        }
    }

    pub fn is_c_family(self) -> bool {
        matches!(self, Language::C | Language::Cpp)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Php => "php",
            Language::Go => "go",
            Language::Vue => "vue",
        };
        write!(f, "{}", s)
    }
}
