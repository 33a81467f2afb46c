use docwright_core::{ComponentKind, Language};

/// Per-language parameterization of the generic traversal engine
/// (spec.md §4.1: "a single generic traversal engine parameterized by
/// language-specific node-kind names").
///
/// Every field is a Tree-sitter grammar node-kind string (`node.kind()`),
/// not a Rust type. A table says nothing about *how* to walk; the walk
/// itself lives in `crate::generic::engine` and is identical for every
/// language that has one of these tables — only the kind names vary.
pub struct NodeKindTable {
    pub language: Language,
    /// `(node_kind, ComponentKind)` pairs recognized as Pass 1 definitions.
    /// Every matched node also becomes an enclosing frame for its nested
    /// definitions and calls, so the engine needs no separate "container"
    /// classification.
    pub definitions: &'static [(&'static str, ComponentKind)],
    /// Node kinds that hold a function/method signature's parameter list.
    pub parameter_list_kinds: &'static [&'static str],
    /// Node kinds that introduce a comment immediately preceding a
    /// definition, treated as its doc comment.
    pub comment_kinds: &'static [&'static str],
    /// Node kinds representing a plain identifier (used for name extraction
    /// and reference-target scanning).
    pub identifier_kinds: &'static [&'static str],
    /// Call-expression node kinds (Pass 2).
    pub call_kinds: &'static [&'static str],
    /// Constructor/instantiation-expression node kinds, e.g. `new X()`.
    pub new_expression_kinds: &'static [&'static str],
    /// `extends`/superclass clause node kinds.
    pub extends_kinds: &'static [&'static str],
    /// `implements`/interface clause node kinds.
    pub implements_kinds: &'static [&'static str],
    /// Recursion depth cap for this language's traversal (spec.md §4.1:
    /// TypeScript caps at 500 to guard against pathological ASTs; other
    /// languages default to the same cap for uniformity).
    pub max_depth: usize,
}

const DEFAULT_MAX_DEPTH: usize = 500;

pub fn table_for(language: Language) -> Option<NodeKindTable> {
    match language {
        Language::JavaScript => Some(JAVASCRIPT),
        Language::TypeScript => Some(TYPESCRIPT),
        Language::Java => Some(JAVA),
        Language::CSharp => Some(CSHARP),
        Language::Cpp => Some(CPP),
        Language::C => Some(C),
        Language::Go => Some(GO),
        Language::Php => Some(PHP),
        Language::Python | Language::Vue => None,
    }
}

const JAVASCRIPT: NodeKindTable = NodeKindTable {
    language: Language::JavaScript,
    definitions: &[
        ("class_declaration", ComponentKind::Class),
        ("function_declaration", ComponentKind::Function),
        ("method_definition", ComponentKind::Method),
        ("generator_function_declaration", ComponentKind::Function),
    ],
    parameter_list_kinds: &["formal_parameters"],
    comment_kinds: &["comment"],
    identifier_kinds: &["identifier", "property_identifier"],
    call_kinds: &["call_expression"],
    new_expression_kinds: &["new_expression"],
    extends_kinds: &["class_heritage"],
    implements_kinds: &[],
    max_depth: DEFAULT_MAX_DEPTH,
};

const TYPESCRIPT: NodeKindTable = NodeKindTable {
    language: Language::TypeScript,
    definitions: &[
        ("class_declaration", ComponentKind::Class),
        ("interface_declaration", ComponentKind::Interface),
        ("function_declaration", ComponentKind::Function),
        ("method_definition", ComponentKind::Method),
        ("type_alias_declaration", ComponentKind::TypeAlias),
        ("enum_declaration", ComponentKind::Enum),
    ],
    parameter_list_kinds: &["formal_parameters"],
    comment_kinds: &["comment"],
    identifier_kinds: &["identifier", "property_identifier", "type_identifier"],
    call_kinds: &["call_expression"],
    new_expression_kinds: &["new_expression"],
    extends_kinds: &["class_heritage", "extends_clause"],
    implements_kinds: &["implements_clause"],
    max_depth: 500,
};

const JAVA: NodeKindTable = NodeKindTable {
    language: Language::Java,
    definitions: &[
        ("class_declaration", ComponentKind::Class),
        ("interface_declaration", ComponentKind::Interface),
        ("enum_declaration", ComponentKind::Enum),
        ("record_declaration", ComponentKind::Record),
        ("annotation_type_declaration", ComponentKind::Annotation),
        ("method_declaration", ComponentKind::Method),
        ("constructor_declaration", ComponentKind::Method),
    ],
    parameter_list_kinds: &["formal_parameters"],
    comment_kinds: &["line_comment", "block_comment"],
    identifier_kinds: &["identifier", "type_identifier"],
    call_kinds: &["method_invocation"],
    new_expression_kinds: &["object_creation_expression"],
    extends_kinds: &["superclass"],
    implements_kinds: &["super_interfaces"],
    max_depth: DEFAULT_MAX_DEPTH,
};

const CSHARP: NodeKindTable = NodeKindTable {
    language: Language::CSharp,
    definitions: &[
        ("class_declaration", ComponentKind::Class),
        ("interface_declaration", ComponentKind::Interface),
        ("struct_declaration", ComponentKind::Struct),
        ("enum_declaration", ComponentKind::Enum),
        ("record_declaration", ComponentKind::Record),
        ("method_declaration", ComponentKind::Method),
        ("constructor_declaration", ComponentKind::Method),
    ],
    parameter_list_kinds: &["parameter_list"],
    comment_kinds: &["comment"],
    identifier_kinds: &["identifier"],
    call_kinds: &["invocation_expression"],
    new_expression_kinds: &["object_creation_expression"],
    extends_kinds: &["base_list"],
    implements_kinds: &["base_list"],
    max_depth: DEFAULT_MAX_DEPTH,
};

const CPP: NodeKindTable = NodeKindTable {
    language: Language::Cpp,
    definitions: &[
        ("class_specifier", ComponentKind::Class),
        ("struct_specifier", ComponentKind::Struct),
        ("function_definition", ComponentKind::Function),
    ],
    parameter_list_kinds: &["parameter_list"],
    comment_kinds: &["comment"],
    identifier_kinds: &["identifier", "field_identifier", "type_identifier"],
    call_kinds: &["call_expression"],
    new_expression_kinds: &["new_expression"],
    extends_kinds: &["base_class_clause"],
    implements_kinds: &[],
    max_depth: DEFAULT_MAX_DEPTH,
};

const C: NodeKindTable = NodeKindTable {
    language: Language::C,
    definitions: &[("function_definition", ComponentKind::Function)],
    parameter_list_kinds: &["parameter_list"],
    comment_kinds: &["comment"],
    identifier_kinds: &["identifier"],
    call_kinds: &["call_expression"],
    new_expression_kinds: &[],
    extends_kinds: &[],
    implements_kinds: &[],
    max_depth: DEFAULT_MAX_DEPTH,
};

const GO: NodeKindTable = NodeKindTable {
    language: Language::Go,
    definitions: &[
        ("function_declaration", ComponentKind::Function),
        ("method_declaration", ComponentKind::Method),
        ("type_spec", ComponentKind::Struct),
    ],
    parameter_list_kinds: &["parameter_list"],
    comment_kinds: &["comment"],
    identifier_kinds: &["identifier", "type_identifier", "field_identifier"],
    call_kinds: &["call_expression"],
    new_expression_kinds: &[],
    extends_kinds: &[],
    implements_kinds: &[],
    max_depth: DEFAULT_MAX_DEPTH,
};

const PHP: NodeKindTable = NodeKindTable {
    language: Language::Php,
    definitions: &[
        ("class_declaration", ComponentKind::Class),
        ("interface_declaration", ComponentKind::Interface),
        ("trait_declaration", ComponentKind::Trait),
        ("enum_declaration", ComponentKind::Enum),
        ("function_definition", ComponentKind::Function),
        ("method_declaration", ComponentKind::Method),
    ],
    parameter_list_kinds: &["formal_parameters"],
    comment_kinds: &["comment"],
    identifier_kinds: &["name"],
    call_kinds: &["function_call_expression", "member_call_expression", "scoped_call_expression"],
    new_expression_kinds: &["object_creation_expression"],
    extends_kinds: &["base_clause"],
    implements_kinds: &["class_interface_clause"],
    max_depth: DEFAULT_MAX_DEPTH,
};
