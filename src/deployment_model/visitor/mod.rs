mod component_visitor;
mod relation_visitor;
mod visitor_helper;

pub use component_visitor::ComponentVisitor;
pub use relation_visitor::RelationVisitor;
pub use visitor_helper::VisitorHelper;

/// Identity shared by component and relation visitors of one backend
pub trait BackendVisitor {
    /// Backend name used in diagnostics
    fn target_name(&self) -> &str;
}
