use super::model_entity::ModelEntity;
use super::operation::Operation;
use super::property::{Attribute, FromScalar, Property};
use crate::shared::Result;
use indexmap::IndexMap;
use std::fmt;

/// Closed set of component variants
///
/// The variant of an instance is the nearest type in its inheritance chain
/// whose name is a known variant; instances of unrelated types are `Generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Generic,
    Compute,
    SoftwareComponent,
    Dbms,
    MysqlDbms,
    Database,
    MysqlDatabase,
    WebServer,
    Tomcat,
    WebApplication,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::Generic,
        ComponentKind::Compute,
        ComponentKind::SoftwareComponent,
        ComponentKind::Dbms,
        ComponentKind::MysqlDbms,
        ComponentKind::Database,
        ComponentKind::MysqlDatabase,
        ComponentKind::WebServer,
        ComponentKind::Tomcat,
        ComponentKind::WebApplication,
    ];

    /// Type name used for this variant in model documents
    pub fn type_name(self) -> &'static str {
        match self {
            ComponentKind::Generic => "base",
            ComponentKind::Compute => "compute",
            ComponentKind::SoftwareComponent => "software_component",
            ComponentKind::Dbms => "dbms",
            ComponentKind::MysqlDbms => "mysql_dbms",
            ComponentKind::Database => "database",
            ComponentKind::MysqlDatabase => "mysql_database",
            ComponentKind::WebServer => "web_server",
            ComponentKind::Tomcat => "tomcat",
            ComponentKind::WebApplication => "web_application",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| *kind != ComponentKind::Generic && kind.type_name() == name)
    }

    /// Picks the variant of the nearest known type in a chain (nearest first)
    pub fn resolve<S: AsRef<str>>(chain: &[S]) -> Self {
        chain
            .iter()
            .find_map(|name| Self::from_type_name(name.as_ref()))
            .unwrap_or(ComponentKind::Generic)
    }

    /// Direct supertype in the variant hierarchy
    pub fn parent(self) -> Option<Self> {
        match self {
            ComponentKind::Generic => None,
            ComponentKind::Compute
            | ComponentKind::SoftwareComponent
            | ComponentKind::Database
            | ComponentKind::WebApplication => Some(ComponentKind::Generic),
            ComponentKind::Dbms | ComponentKind::WebServer => {
                Some(ComponentKind::SoftwareComponent)
            }
            ComponentKind::MysqlDbms => Some(ComponentKind::Dbms),
            ComponentKind::MysqlDatabase => Some(ComponentKind::Database),
            ComponentKind::Tomcat => Some(ComponentKind::WebServer),
        }
    }

    /// True when `self` is `other` or one of its refinements
    pub fn is_a(self, other: ComponentKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A component instance of the deployment model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    entity: ModelEntity,
    kind: ComponentKind,
}

impl Component {
    pub fn new(entity: ModelEntity, kind: ComponentKind) -> Self {
        Self { entity, kind }
    }

    /// Wraps an instance entity, deriving its variant from the type chain
    pub fn from_entity(entity: ModelEntity) -> Result<Self> {
        let kind = ComponentKind::resolve(&entity.type_chain_names()?);
        Ok(Self::new(entity, kind))
    }

    pub fn entity(&self) -> &ModelEntity {
        &self.entity
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn is_a(&self, kind: ComponentKind) -> bool {
        self.kind.is_a(kind)
    }

    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub fn normalized_name(&self) -> String {
        self.entity.normalized_name()
    }

    pub fn properties(&self) -> Result<IndexMap<String, Property>> {
        self.entity.properties()
    }

    pub fn property(&self, name: &str) -> Result<Option<Property>> {
        self.entity.property(name)
    }

    pub fn property_as<T: FromScalar>(&self, attribute: &Attribute<T>) -> Result<Option<T>> {
        self.entity.property_as(attribute)
    }

    pub fn property_values(&self) -> Result<IndexMap<String, String>> {
        self.entity.property_values()
    }

    pub fn operations(&self) -> Result<IndexMap<String, Operation>> {
        self.entity.operations()
    }

    pub fn ordered_operations(&self) -> Result<Vec<Operation>> {
        self.entity.ordered_operations()
    }

    pub fn as_compute(&self) -> Option<Compute<'_>> {
        self.is_a(ComponentKind::Compute).then_some(Compute(self))
    }

    pub fn as_dbms(&self) -> Option<Dbms<'_>> {
        self.is_a(ComponentKind::Dbms).then_some(Dbms(self))
    }

    pub fn as_database(&self) -> Option<Database<'_>> {
        self.is_a(ComponentKind::Database).then_some(Database(self))
    }

    pub fn as_web_server(&self) -> Option<WebServer<'_>> {
        self.is_a(ComponentKind::WebServer).then_some(WebServer(self))
    }
}

/// Compute view: a virtual or physical machine
#[derive(Debug, Clone, Copy)]
pub struct Compute<'a>(&'a Component);

impl Compute<'_> {
    pub const OS_FAMILY: Attribute<String> = Attribute::new("os_family");
    pub const MACHINE_IMAGE: Attribute<String> = Attribute::new("machine_image");
    pub const INSTANCE_TYPE: Attribute<String> = Attribute::new("instance_type");
    pub const KEY_NAME: Attribute<String> = Attribute::new("key_name");
    pub const PUBLIC_KEY: Attribute<String> = Attribute::new("public_key");

    pub fn os_family(&self) -> Result<Option<String>> {
        self.0.property_as(&Self::OS_FAMILY)
    }

    pub fn machine_image(&self) -> Result<Option<String>> {
        self.0.property_as(&Self::MACHINE_IMAGE)
    }

    pub fn instance_type(&self) -> Result<Option<String>> {
        self.0.property_as(&Self::INSTANCE_TYPE)
    }

    pub fn key_name(&self) -> Result<Option<String>> {
        self.0.property_as(&Self::KEY_NAME)
    }

    pub fn public_key(&self) -> Result<Option<String>> {
        self.0.property_as(&Self::PUBLIC_KEY)
    }
}

/// DBMS view (also MySQL DBMS)
#[derive(Debug, Clone, Copy)]
pub struct Dbms<'a>(&'a Component);

impl Dbms<'_> {
    pub const PORT: Attribute<u16> = Attribute::new("port");
    pub const ROOT_PASSWORD: Attribute<String> = Attribute::new("root_password");

    pub fn port(&self) -> Result<Option<u16>> {
        self.0.property_as(&Self::PORT)
    }

    pub fn root_password(&self) -> Result<Option<String>> {
        self.0.property_as(&Self::ROOT_PASSWORD)
    }
}

/// Database view (also MySQL database)
#[derive(Debug, Clone, Copy)]
pub struct Database<'a>(&'a Component);

impl Database<'_> {
    pub const SCHEMA_NAME: Attribute<String> = Attribute::new("schema_name");
    pub const USER: Attribute<String> = Attribute::new("user");
    pub const PASSWORD: Attribute<String> = Attribute::new("password");

    pub fn schema_name(&self) -> Result<Option<String>> {
        self.0.property_as(&Self::SCHEMA_NAME)
    }

    pub fn user(&self) -> Result<Option<String>> {
        self.0.property_as(&Self::USER)
    }

    pub fn password(&self) -> Result<Option<String>> {
        self.0.property_as(&Self::PASSWORD)
    }
}

/// Web server view (also Tomcat)
#[derive(Debug, Clone, Copy)]
pub struct WebServer<'a>(&'a Component);

impl WebServer<'_> {
    pub const PORT: Attribute<u16> = Attribute::new("port");

    pub fn port(&self) -> Result<Option<u16>> {
        self.0.property_as(&Self::PORT)
    }
}
