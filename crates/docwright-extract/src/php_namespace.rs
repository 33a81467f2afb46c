//! PHP namespace resolution (spec.md §4.1): "maintain a NamespaceResolver
//! per file that ingests `namespace` declarations and `use` statements
//! (including grouped `use`) and converts short names to fully-qualified
//! names before emitting edges."

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct NamespaceResolver {
    current_namespace: Option<String>,
    /// short name -> fully-qualified name, populated by `use` statements.
    aliases: HashMap<String, String>,
}

impl NamespaceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.current_namespace = Some(namespace.into());
    }

    /// Registers a single `use Foo\Bar;` or `use Foo\Bar as Baz;` clause.
    pub fn add_use(&mut self, fully_qualified: &str, alias: Option<&str>) {
        let short = alias
            .map(|a| a.to_string())
            .unwrap_or_else(|| fully_qualified.rsplit('\\').next().unwrap_or(fully_qualified).to_string());
        self.aliases.insert(short, fully_qualified.trim_start_matches('\\').to_string());
    }

    /// Expands `use Foo\{Bar, Baz as Qux};` into individual `add_use` calls.
    pub fn add_grouped_use(&mut self, prefix: &str, members: &[(&str, Option<&str>)]) {
        for (member, alias) in members {
            let fully_qualified = format!("{}\\{}", prefix.trim_end_matches('\\'), member);
            self.add_use(&fully_qualified, *alias);
        }
    }

    /// Resolves a short name referenced in code to its fully-qualified form:
    /// an aliased `use` wins, otherwise the name is qualified under the
    /// current namespace, otherwise it is returned unchanged (global scope).
    pub fn resolve(&self, name: &str) -> String {
        if name.starts_with('\\') {
            return name.trim_start_matches('\\').to_string();
        }
        if let Some(fq) = self.aliases.get(name) {
            return fq.clone();
        }
        match &self.current_namespace {
            Some(ns) => format!("{}\\{}", ns, name),
            None => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plain_use() {
        let mut r = NamespaceResolver::new();
        r.add_use("App\\Services\\Mailer", None);
        assert_eq!(r.resolve("Mailer"), "App\\Services\\Mailer");
    }

    #[test]
    fn resolves_aliased_use() {
        let mut r = NamespaceResolver::new();
        r.add_use("App\\Services\\Mailer", Some("Mail"));
        assert_eq!(r.resolve("Mail"), "App\\Services\\Mailer");
    }

    #[test]
    fn falls_back_to_current_namespace() {
        let mut r = NamespaceResolver::new();
        r.set_namespace("App\\Http\\Controllers");
        assert_eq!(r.resolve("UserController"), "App\\Http\\Controllers\\UserController");
    }

    #[test]
    fn grouped_use_expands_each_member() {
        let mut r = NamespaceResolver::new();
        r.add_grouped_use("App\\Services", &[("Mailer", None), ("Logger", Some("Log"))]);
        assert_eq!(r.resolve("Mailer"), "App\\Services\\Mailer");
        assert_eq!(r.resolve("Log"), "App\\Services\\Logger");
    }

    #[test]
    fn fully_qualified_name_bypasses_resolution() {
        let r = NamespaceResolver::new();
        assert_eq!(r.resolve("\\App\\Foo"), "App\\Foo");
    }
}
