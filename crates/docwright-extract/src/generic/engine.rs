use super::node_kind_table::NodeKindTable;
use crate::php_namespace::NamespaceResolver;
use docwright_core::{component_id, CallEdge, Component, ComponentId, EdgeKind, Language};
use tree_sitter::{Node, Tree};

/// A single frame of lexical nesting recorded while walking the tree:
/// the component id of the enclosing definition and its source span, used
/// both to derive child ids and to find the innermost enclosing component
/// for an edge's `caller`.
struct Frame<'a> {
    id: ComponentId,
    node: Node<'a>,
}

/// The traversal engine that every non-Python, non-Vue language shares.
/// Parameterized entirely by a [`NodeKindTable`]; it contains no
/// language-specific `match` arms beyond the small set of per-language
/// structural quirks called out in spec.md §4.1 (Go receiver
/// normalization, PHP namespace qualification, C/C++ constructor edges),
/// each isolated behind a hook on `table.language`. PHP namespace
/// qualification ingests `namespace`/`use` declarations into a
/// [`NamespaceResolver`] before Pass 2 runs, then resolves every callee
/// and base-type name through it.
pub struct GenericExtractor<'a> {
    table: &'a NodeKindTable,
    source: &'a [u8],
    relative_path: &'a str,
    file_path: &'a str,
}

impl<'a> GenericExtractor<'a> {
    pub fn new(
        table: &'a NodeKindTable,
        source: &'a [u8],
        relative_path: &'a str,
        file_path: &'a str,
    ) -> Self {
        Self {
            table,
            source,
            relative_path,
            file_path,
        }
    }

    /// Runs both extraction passes over an already-parsed tree.
    pub fn extract(&self, tree: &Tree) -> (Vec<Component>, Vec<CallEdge>) {
        let mut components = Vec::new();
        self.walk_definitions(tree.root_node(), &mut Vec::new(), &mut components, 0);

        let resolver = if self.table.language == Language::Php {
            let mut resolver = NamespaceResolver::new();
            self.walk_php_namespace(tree.root_node(), &mut resolver);
            Some(resolver)
        } else {
            None
        };

        let mut edges = Vec::new();
        self.walk_edges(tree.root_node(), &mut Vec::new(), &mut edges, 0, resolver.as_ref());

        (components, edges)
    }

    /// Resolves `name` through the PHP namespace resolver when present;
    /// a no-op for every other language.
    fn qualify(&self, name: String, resolver: Option<&NamespaceResolver>) -> String {
        match resolver {
            Some(resolver) => resolver.resolve(&name),
            None => name,
        }
    }

    /// Ingests PHP `namespace` and `use` declarations (spec.md §4.1:
    /// "maintain a NamespaceResolver per file that ingests `namespace`
    /// declarations and `use` statements... before emitting edges").
    fn walk_php_namespace(&self, node: Node, resolver: &mut NamespaceResolver) {
        match node.kind() {
            "namespace_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    resolver.set_namespace(self.text(name));
                }
            }
            "namespace_use_declaration" => {
                self.collect_namespace_use(node, resolver);
            }
            _ => {}
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_php_namespace(child, resolver);
        }
    }

    /// Handles both plain (`use Foo\Bar;`, `use Foo\Bar as Baz;`) and
    /// grouped (`use Foo\{Bar, Baz as Qux};`) `use` clauses.
    fn collect_namespace_use(&self, node: Node, resolver: &mut NamespaceResolver) {
        let mut cursor = node.walk();
        for clause in node.children(&mut cursor) {
            match clause.kind() {
                "namespace_use_clause" => {
                    if let Some(name_node) = clause.child_by_field_name("name") {
                        let alias = clause.child_by_field_name("alias").map(|a| self.text(a));
                        resolver.add_use(self.text(name_node), alias);
                    }
                }
                "namespace_use_group" => {
                    let prefix = clause.child_by_field_name("prefix").map(|p| self.text(p)).unwrap_or("");
                    let mut members: Vec<(String, Option<String>)> = Vec::new();
                    let mut inner_cursor = clause.walk();
                    for member in clause.children(&mut inner_cursor) {
                        if member.kind() == "namespace_use_group_clause" {
                            if let Some(name_node) = member.child_by_field_name("name") {
                                let alias = member.child_by_field_name("alias").map(|a| self.text(a).to_string());
                                members.push((self.text(name_node).to_string(), alias));
                            }
                        }
                    }
                    let member_refs: Vec<(&str, Option<&str>)> =
                        members.iter().map(|(m, a)| (m.as_str(), a.as_deref())).collect();
                    resolver.add_grouped_use(prefix, &member_refs);
                }
                _ => {}
            }
        }
    }

    fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source).unwrap_or("")
    }

    fn find_identifier_text(&self, node: Node) -> Option<String> {
        if self.table.identifier_kinds.contains(&node.kind()) {
            return Some(self.text(node).to_string());
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if self.table.identifier_kinds.contains(&child.kind()) {
                return Some(self.text(child).to_string());
            }
        }
        None
    }

    /// Extracts a definition's own name: prefers a `"name"` field, falls
    /// back to the first identifier-kind child, then the Go receiver hook.
    fn definition_name(&self, node: Node) -> String {
        if self.table.language == Language::Go {
            if let Some(name) = self.go_receiver_method_name(node) {
                return name;
            }
        }
        if let Some(name_node) = node.child_by_field_name("name") {
            return self.text(name_node).to_string();
        }
        self.find_identifier_text(node)
            .unwrap_or_else(|| "<anonymous>".to_string())
    }

    /// For a Go `method_declaration`, returns `Receiver.Method` with the
    /// receiver's pointer sigil and any generic parameter list stripped
    /// (spec.md §4.1: "normalize method receiver types... before forming
    /// `Type.method` ids").
    fn go_receiver_method_name(&self, node: Node) -> Option<String> {
        if node.kind() != "method_declaration" {
            return None;
        }
        let receiver = node.child_by_field_name("receiver")?;
        let mut cursor = receiver.walk();
        let receiver_type_text = receiver
            .children(&mut cursor)
            .find(|c| c.kind() == "pointer_type" || c.kind() == "type_identifier" || c.kind() == "generic_type")
            .map(|c| self.text(c))?;
        let stripped = receiver_type_text.trim_start_matches('*');
        let receiver_type = stripped.split('[').next().unwrap_or(stripped).trim();
        let method_name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())?;
        Some(format!("{}.{}", receiver_type, method_name))
    }

    fn preceding_doc_comment(&self, node: Node) -> Option<String> {
        let mut sibling = node.prev_sibling()?;
        if self.table.comment_kinds.contains(&sibling.kind()) {
            let mut text = self.text(sibling).to_string();
            // Java/C-family allow stacked line comments directly above a
            // definition; fold them into one doc block, oldest first.
            while let Some(prev) = sibling.prev_sibling() {
                if self.table.comment_kinds.contains(&prev.kind())
                    && prev.end_position().row + 1 >= sibling.start_position().row
                {
                    text = format!("{}\n{}", self.text(prev), text);
                    sibling = prev;
                } else {
                    break;
                }
            }
            return Some(text);
        }
        None
    }

    fn parameters(&self, node: Node) -> Option<Vec<String>> {
        let list = node
            .child_by_field_name("parameters")
            .or_else(|| {
                let mut cursor = node.walk();
                node.children(&mut cursor)
                    .find(|c| self.table.parameter_list_kinds.contains(&c.kind()))
            })?;
        let mut cursor = list.walk();
        let params: Vec<String> = list
            .children(&mut cursor)
            .filter(|c| c.is_named())
            .map(|c| self.text(c).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Some(params)
    }

    fn base_types(&self, node: Node) -> Option<Vec<String>> {
        let mut cursor = node.walk();
        let mut found = Vec::new();
        for child in node.children(&mut cursor) {
            if self.table.extends_kinds.contains(&child.kind())
                || self.table.implements_kinds.contains(&child.kind())
            {
                let mut inner_cursor = child.walk();
                for grandchild in child.children(&mut inner_cursor) {
                    if self.table.identifier_kinds.contains(&grandchild.kind()) {
                        found.push(self.text(grandchild).to_string());
                    }
                }
            }
        }
        if found.is_empty() {
            None
        } else {
            Some(found)
        }
    }

    fn walk_definitions(
        &self,
        node: Node,
        stack: &mut Vec<Frame<'a>>,
        out: &mut Vec<Component>,
        depth: usize,
    ) {
        if depth > self.table.max_depth {
            return;
        }

        let mut pushed = false;
        if let Some((_, kind)) = self
            .table
            .definitions
            .iter()
            .find(|(k, _)| *k == node.kind())
        {
            let name = self.definition_name(node);
            let member_path: Vec<&str> = stack
                .iter()
                .map(|f| f.id.rsplit('.').next().unwrap_or(""))
                .chain(std::iter::once(name.as_str()))
                .collect();
            let id = component_id(self.relative_path, &member_path);
            let enclosing_class = stack.last().map(|f| f.id.clone());

            let mut component = Component::new(
                id.clone(),
                name,
                kind.clone(),
                self.file_path,
                self.relative_path,
                node.start_position().row as u32 + 1,
                node.end_position().row as u32 + 1,
                self.table.language,
            )
            .with_source(self.text(node).to_string());
            component.enclosing_class = enclosing_class;
            component.parameters = self.parameters(node);
            component.base_types = self.base_types(node);
            if let Some(doc) = self.preceding_doc_comment(node) {
                component = component.with_doc(doc);
            }
            out.push(component);

            // Every recognized definition — not just class-like containers —
            // becomes an enclosing frame, so a nested definition's member
            // path (and, in `walk_edges`, a nested call's caller) resolves
            // to the innermost enclosing Component, matching spec.md §4.1.
            stack.push(Frame { id, node });
            pushed = true;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_definitions(child, stack, out, depth + 1);
        }

        if pushed {
            stack.pop();
        }
    }

    fn innermost_enclosing(&self, stack: &[Frame<'a>], node: Node) -> Option<ComponentId> {
        stack
            .iter()
            .rev()
            .find(|f| f.node.start_byte() <= node.start_byte() && node.end_byte() <= f.node.end_byte())
            .map(|f| f.id.clone())
    }

    fn walk_edges(
        &self,
        node: Node,
        stack: &mut Vec<Frame<'a>>,
        out: &mut Vec<CallEdge>,
        depth: usize,
        resolver: Option<&NamespaceResolver>,
    ) {
        if depth > self.table.max_depth {
            return;
        }

        let mut pushed = false;
        if let Some((_, _)) = self
            .table
            .definitions
            .iter()
            .find(|(k, _)| *k == node.kind())
        {
            let name = self.definition_name(node);
            let member_path: Vec<&str> = stack
                .iter()
                .map(|f| f.id.rsplit('.').next().unwrap_or(""))
                .chain(std::iter::once(name.as_str()))
                .collect();
            let id = component_id(self.relative_path, &member_path);

            if let Some(bases) = self.base_types(node) {
                for base in bases {
                    let base = self.qualify(base, resolver);
                    out.push(CallEdge::unresolved(id.clone(), base, EdgeKind::Extends).at_line(
                        node.start_position().row as u32 + 1,
                    ));
                }
            }

            stack.push(Frame { id, node });
            pushed = true;
        }

        if self.table.call_kinds.contains(&node.kind()) {
            if let Some(caller) = self.innermost_enclosing(stack, node) {
                if let Some(target) = self.call_target(node) {
                    let target = self.qualify(target, resolver);
                    out.push(
                        CallEdge::unresolved(caller, target, EdgeKind::Calls)
                            .at_line(node.start_position().row as u32 + 1),
                    );
                }
            }
        }

        if self.table.new_expression_kinds.contains(&node.kind()) {
            if let Some(caller) = self.innermost_enclosing(stack, node) {
                if let Some(target) = self.find_identifier_text(node) {
                    let target = self.qualify(target, resolver);
                    out.push(
                        CallEdge::unresolved(caller, target, EdgeKind::Calls)
                            .at_line(node.start_position().row as u32 + 1),
                    );
                }
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_edges(child, stack, out, depth + 1, resolver);
        }

        if pushed {
            stack.pop();
        }
    }

    /// Best-effort textual target of a call expression: the last segment
    /// of a member-access chain, or the sole identifier of a plain call.
    fn call_target(&self, node: Node) -> Option<String> {
        let callee = node.child_by_field_name("function").unwrap_or(node);
        let mut cursor = callee.walk();
        let members: Vec<Node> = callee
            .children(&mut cursor)
            .filter(|c| self.table.identifier_kinds.contains(&c.kind()))
            .collect();
        if let Some(last) = members.last() {
            return Some(self.text(*last).to_string());
        }
        self.find_identifier_text(callee)
    }
}

#[cfg(test)]
mod tests {
    use super::super::node_kind_table::table_for;
    use super::*;
    use crate::language_registry::LanguageRegistry;

    fn extract(language: Language, source: &str) -> (Vec<Component>, Vec<CallEdge>) {
        let registry = LanguageRegistry::new();
        let mut parser = registry.create_parser(language).unwrap();
        let tree = parser.parse(source, None).unwrap();
        let table = table_for(language).unwrap();
        let extractor = GenericExtractor::new(&table, source.as_bytes(), "m", "/repo/m");
        extractor.extract(&tree)
    }

    #[test]
    fn call_inside_top_level_go_function_emits_calls_edge() {
        let source = "package main\nfunc f() {\n\tg()\n}\n";
        let (components, edges) = extract(Language::Go, source);
        let f = components.iter().find(|c| c.name == "f").unwrap();
        assert!(edges
            .iter()
            .any(|e| e.kind == EdgeKind::Calls && e.caller == f.id && e.callee == "g"));
    }

    #[test]
    fn call_inside_top_level_c_function_emits_calls_edge() {
        let source = "void f() {\n    g();\n}\n";
        let (components, edges) = extract(Language::C, source);
        let f = components.iter().find(|c| c.name == "f").unwrap();
        assert!(edges
            .iter()
            .any(|e| e.kind == EdgeKind::Calls && e.caller == f.id && e.callee == "g"));
    }

    #[test]
    fn php_call_target_is_qualified_through_use_alias() {
        let source =
            "<?php\nuse App\\Helpers\\format_name as format;\nfunction f() {\n    format();\n}\n";
        let (components, edges) = extract(Language::Php, source);
        let f = components.iter().find(|c| c.name == "f").unwrap();
        assert!(edges.iter().any(|e| {
            e.kind == EdgeKind::Calls && e.caller == f.id && e.callee == "App\\Helpers\\format_name"
        }));
    }

    #[test]
    fn call_inside_method_attributes_to_method_not_class() {
        let source = "class C {\n  m() {\n    g();\n  }\n}\n";
        let (components, edges) = extract(Language::JavaScript, source);
        let class = components.iter().find(|c| c.name == "C").unwrap();
        let method = components.iter().find(|c| c.name == "m").unwrap();
        let call_edge = edges.iter().find(|e| e.kind == EdgeKind::Calls && e.callee == "g").unwrap();
        assert_eq!(call_edge.caller, method.id);
        assert_ne!(call_edge.caller, class.id);
    }
}
