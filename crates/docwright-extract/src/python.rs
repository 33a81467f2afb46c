//! The Python strategy, architecturally separate from the generic
//! traversal engine (spec.md §4.1: "Python uses a built-in syntactic
//! analyzer; all other languages use a grammar-driven incremental
//! parser"). It still walks a Tree-sitter parse tree — `tree-sitter-python`
//! is the closest thing to a "built-in syntactic analyzer" available to a
//! Rust implementation — but its node-kind vocabulary (docstring-as-first-
//! statement, decorators, `__init__` constructor folding) is Python-specific
//! enough that forcing it through the generic table would obscure more than
//! it shares.

use docwright_core::{component_id, CallEdge, Component, ComponentId, ComponentKind, EdgeKind, Language};
use tree_sitter::{Node, Parser, Tree};

pub struct PythonExtractor {
    parser: Parser,
}

impl PythonExtractor {
    pub fn new() -> docwright_core::Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| docwright_core::DocwrightError::Parse(e.to_string()))?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Option<Tree> {
        self.parser.parse(source, None)
    }

    pub fn extract(&self, tree: &Tree, source: &str, relative_path: &str, file_path: &str) -> (Vec<Component>, Vec<CallEdge>) {
        let mut ctx = Ctx {
            source: source.as_bytes(),
            relative_path,
            file_path,
            components: Vec::new(),
            edges: Vec::new(),
        };
        walk(tree.root_node(), &mut ctx, &mut Vec::new());
        (ctx.components, ctx.edges)
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new().expect("tree-sitter-python grammar failed to load")
    }
}

struct Ctx<'a> {
    source: &'a [u8],
    relative_path: &'a str,
    file_path: &'a str,
    components: Vec<Component>,
    edges: Vec<CallEdge>,
}

fn text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Unwraps `decorated_definition` to the underlying `function_definition`
/// or `class_definition`, returning the decorator names found along the way.
fn unwrap_decorated<'a>(node: Node<'a>, source: &[u8]) -> (Node<'a>, Vec<String>) {
    if node.kind() != "decorated_definition" {
        return (node, Vec::new());
    }
    let mut decorators = Vec::new();
    let mut cursor = node.walk();
    let mut inner = node;
    for child in node.children(&mut cursor) {
        match child.kind() {
            "decorator" => decorators.push(text(child, source).trim_start_matches('@').to_string()),
            "function_definition" | "class_definition" => inner = child,
            _ => {}
        }
    }
    (inner, decorators)
}

fn docstring(body: Node, source: &[u8]) -> Option<String> {
    let mut cursor = body.walk();
    let first_stmt = body.named_children(&mut cursor).next()?;
    if first_stmt.kind() != "expression_statement" {
        return None;
    }
    let expr = first_stmt.named_child(0)?;
    if expr.kind() == "string" {
        Some(text(expr, source).trim_matches(['"', '\''].as_ref()).trim().to_string())
    } else {
        None
    }
}

fn parameters(node: Node, source: &[u8]) -> Option<Vec<String>> {
    let params = node.child_by_field_name("parameters")?;
    let mut cursor = params.walk();
    let list: Vec<String> = params
        .named_children(&mut cursor)
        .map(|c| text(c, source).to_string())
        .collect();
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

fn base_classes(node: Node, source: &[u8]) -> Option<Vec<String>> {
    let superclasses = node.child_by_field_name("superclasses")?;
    let mut cursor = superclasses.walk();
    let bases: Vec<String> = superclasses
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "identifier" || c.kind() == "attribute")
        .map(|c| text(c, source).to_string())
        .collect();
    if bases.is_empty() {
        None
    } else {
        Some(bases)
    }
}

fn walk<'a>(node: Node<'a>, ctx: &mut Ctx, stack: &mut Vec<(ComponentId, Node<'a>)>) {
    let (def_node, decorators) = unwrap_decorated(node, ctx.source);

    let mut pushed = false;
    match def_node.kind() {
        "class_definition" | "function_definition" => {
            let name_node = def_node.child_by_field_name("name");
            let mut name = name_node
                .map(|n| text(n, ctx.source).to_string())
                .unwrap_or_else(|| "<anonymous>".to_string());

            // `__init__` folds into its enclosing class rather than
            // appearing as a sibling member (spec.md §4.2 "Normalize:
            // merge constructor entries... into their enclosing class").
            let is_constructor = name == "__init__";
            if is_constructor {
                name = "__init__".to_string();
            }

            let kind = if def_node.kind() == "class_definition" {
                ComponentKind::Class
            } else if stack.is_empty() {
                ComponentKind::Function
            } else {
                ComponentKind::Method
            };

            let member_path: Vec<&str> = stack
                .iter()
                .map(|(id, _)| id.rsplit('.').next().unwrap_or(""))
                .chain(std::iter::once(name.as_str()))
                .collect();
            let id = component_id(ctx.relative_path, &member_path);
            let enclosing_class = stack.last().map(|(id, _)| id.clone());

            let mut component = Component::new(
                id.clone(),
                name,
                kind,
                ctx.file_path,
                ctx.relative_path,
                def_node.start_position().row as u32 + 1,
                def_node.end_position().row as u32 + 1,
                Language::Python,
            )
            .with_source(text(def_node, ctx.source).to_string());
            component.enclosing_class = enclosing_class;
            component.parameters = parameters(def_node, ctx.source);
            component.base_types = base_classes(def_node, ctx.source);
            if !decorators.is_empty() {
                component.extra.insert(
                    "decorators".to_string(),
                    serde_json::Value::Array(decorators.into_iter().map(serde_json::Value::String).collect()),
                );
            }
            if let Some(body) = def_node.child_by_field_name("body") {
                if let Some(doc) = docstring(body, ctx.source) {
                    component = component.with_doc(doc);
                }
            }

            if let Some(bases) = component.base_types.clone() {
                for base in bases {
                    ctx.edges.push(
                        CallEdge::unresolved(id.clone(), base, EdgeKind::Extends)
                            .at_line(def_node.start_position().row as u32 + 1),
                    );
                }
            }

            ctx.components.push(component);

            // Push a frame for every definition, not just classes, so a
            // `call` node anywhere inside it attributes to the innermost
            // enclosing Component (spec.md §4.1 Pass 2) — including calls
            // inside a top-level function or a method body.
            stack.push((id, def_node));
            pushed = true;
        }
        "call" => {
            if let Some((caller, _)) = stack.last().cloned() {
                if let Some(target) = call_target(def_node, ctx.source) {
                    ctx.edges.push(
                        CallEdge::unresolved(caller, target, EdgeKind::Calls)
                            .at_line(def_node.start_position().row as u32 + 1),
                    );
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, ctx, stack);
    }

    if pushed {
        stack.pop();
    }
}

fn call_target(node: Node, source: &[u8]) -> Option<String> {
    let function = node.child_by_field_name("function")?;
    match function.kind() {
        "identifier" => Some(text(function, source).to_string()),
        "attribute" => function
            .child_by_field_name("attribute")
            .map(|n| text(n, source).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_class_and_method_with_constructor_folding() {
        let source = r#"
class Greeter:
    """Says hello."""
    def __init__(self, name):
        self.name = name

    def greet(self):
        print(self.name)
"#;
        let mut extractor = PythonExtractor::new().unwrap();
        let tree = extractor.parse(source).unwrap();
        let (components, _edges) = extractor.extract(&tree, source, "greeter.py", "/repo/greeter.py");

        let class = components.iter().find(|c| c.name == "Greeter").unwrap();
        assert_eq!(class.docstring.as_deref(), Some("Says hello."));

        let init = components.iter().find(|c| c.name == "__init__").unwrap();
        assert_eq!(init.enclosing_class.as_deref(), Some(class.id.as_str()));

        let greet = components.iter().find(|c| c.name == "greet").unwrap();
        assert_eq!(greet.kind, ComponentKind::Method);
    }

    #[test]
    fn call_inside_top_level_function_emits_calls_edge() {
        let source = "def f():\n    g()\n";
        let mut extractor = PythonExtractor::new().unwrap();
        let tree = extractor.parse(source).unwrap();
        let (components, edges) = extractor.extract(&tree, source, "a.py", "/repo/a.py");

        let f = components.iter().find(|c| c.name == "f").unwrap();
        assert!(edges
            .iter()
            .any(|e| e.kind == EdgeKind::Calls && e.caller == f.id && e.callee == "g"));
    }

    #[test]
    fn records_base_class_as_extends_edge() {
        let source = "class Child(Base):\n    pass\n";
        let mut extractor = PythonExtractor::new().unwrap();
        let tree = extractor.parse(source).unwrap();
        let (_components, edges) = extractor.extract(&tree, source, "m.py", "/repo/m.py");
        assert!(edges
            .iter()
            .any(|e| e.kind == EdgeKind::Extends && e.callee == "Base"));
    }
}
