use super::BackendVisitor;
use crate::deployment_model::domain::{Component, ComponentId, ComponentKind};
use crate::shared::error::TransformError;
use crate::shared::Result;

/// Per-variant callbacks a backend implements for components
///
/// Every method defaults to the handler of the variant's supertype, ending
/// at [`visit_component`](Self::visit_component), which rejects the variant.
/// A backend overrides the most general handler that fits: overriding
/// `visit_software_component` alone covers DBMS, MySQL DBMS, web server and
/// Tomcat.
pub trait ComponentVisitor: BackendVisitor {
    fn visit_component(&mut self, _id: ComponentId, component: &Component) -> Result<()> {
        Err(TransformError::UnsupportedVariant {
            target: self.target_name().to_string(),
            variant: component.kind().to_string(),
            entity: component.name().to_string(),
        }
        .into())
    }

    fn visit_compute(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.visit_component(id, component)
    }

    fn visit_software_component(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.visit_component(id, component)
    }

    fn visit_dbms(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.visit_software_component(id, component)
    }

    fn visit_mysql_dbms(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.visit_dbms(id, component)
    }

    fn visit_database(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.visit_component(id, component)
    }

    fn visit_mysql_database(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.visit_database(id, component)
    }

    fn visit_web_server(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.visit_software_component(id, component)
    }

    fn visit_tomcat(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.visit_web_server(id, component)
    }

    fn visit_web_application(&mut self, id: ComponentId, component: &Component) -> Result<()> {
        self.visit_component(id, component)
    }
}

impl Component {
    /// Dispatches to the visitor method matching this component's variant
    pub fn accept<V: ComponentVisitor + ?Sized>(
        &self,
        id: ComponentId,
        visitor: &mut V,
    ) -> Result<()> {
        match self.kind() {
            ComponentKind::Generic => visitor.visit_component(id, self),
            ComponentKind::Compute => visitor.visit_compute(id, self),
            ComponentKind::SoftwareComponent => visitor.visit_software_component(id, self),
            ComponentKind::Dbms => visitor.visit_dbms(id, self),
            ComponentKind::MysqlDbms => visitor.visit_mysql_dbms(id, self),
            ComponentKind::Database => visitor.visit_database(id, self),
            ComponentKind::MysqlDatabase => visitor.visit_mysql_database(id, self),
            ComponentKind::WebServer => visitor.visit_web_server(id, self),
            ComponentKind::Tomcat => visitor.visit_tomcat(id, self),
            ComponentKind::WebApplication => visitor.visit_web_application(id, self),
        }
    }
}
