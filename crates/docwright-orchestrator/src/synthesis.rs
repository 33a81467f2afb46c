use docwright_agent::SharedContext;
use docwright_core::ModuleNode;

/// System prompt for a direct (non-agentic) model call that synthesizes a
/// parent module's overview from its children's already-written artifacts
/// (spec.md §4.5 "Non-leaf module").
pub fn module_overview_system_prompt(ctx: &SharedContext) -> String {
    format!(
        "You write a concise Markdown overview for a documentation module, given the \
         already-written documentation of its children. Do not repeat child content verbatim; \
         summarize what the module as a whole is responsible for and how its children relate. \
         {}",
        ctx.doc_type.prompt_fragment()
    )
}

pub fn module_overview_user_prompt(node: &ModuleNode, children_content: &str) -> String {
    format!(
        "Module: `{}`\n\nChild module documentation:\n\n{}",
        node.name, children_content
    )
}

/// System prompt for the root-level repository overview, synthesized once
/// every module has completed (spec.md §4.5 "Root").
pub fn repository_overview_system_prompt(ctx: &SharedContext) -> String {
    format!(
        "You write the top-level README-style overview for an entire repository's generated \
         documentation, given the already-written documentation of its top-level modules. \
         Describe the repository's overall purpose and how its modules fit together. {}",
        ctx.doc_type.prompt_fragment()
    )
}

pub fn repository_overview_user_prompt(children_content: &str) -> String {
    format!("Top-level module documentation:\n\n{children_content}")
}
