pub mod editor;
pub mod read_components;
pub mod submodule;

pub use editor::StrReplaceEditorTool;
pub use read_components::ReadCodeComponentsTool;
pub use submodule::GenerateSubModuleDocumentationTool;
