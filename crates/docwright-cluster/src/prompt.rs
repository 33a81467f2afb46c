use docwright_core::{ComponentId, ComponentRegistry};
use std::collections::BTreeMap;

/// Assembles the clustering prompt body: leaf ids grouped by file, each
/// with its display name (spec.md §4.3 step 1).
pub fn assemble_prompt_body(leaf_ids: &[ComponentId], registry: &ComponentRegistry) -> String {
    let mut by_file: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for id in leaf_ids {
        if let Some(component) = registry.get(id) {
            by_file
                .entry(component.relative_path.as_str())
                .or_default()
                .push((id.as_str(), component.name.as_str()));
        }
    }

    let mut out = String::new();
    for (file, members) in by_file {
        out.push_str(&format!("## {file}\n"));
        for (id, name) in members {
            out.push_str(&format!("- {name} ({id})\n"));
        }
    }
    out
}

pub const CLUSTER_PROMPT_PREAMBLE: &str = "\
You are partitioning the components below into coherent, named sub-modules. \
Respond ONLY with a document of this exact shape, using the component ids exactly as given:

<modules>
<module name=\"module-name\">
component.id.one
component.id.two
</module>
</modules>

Every id must be assigned to exactly one module. Choose module names that describe a cohesive \
responsibility, not a file name.";
