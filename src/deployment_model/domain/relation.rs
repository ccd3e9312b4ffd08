use super::model_entity::ModelEntity;
use crate::shared::Result;
use indexmap::IndexMap;
use std::fmt;

/// Closed set of relation variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    Generic,
    DependsOn,
    HostedOn,
    ConnectsTo,
}

impl RelationKind {
    pub const ALL: [RelationKind; 4] = [
        RelationKind::Generic,
        RelationKind::DependsOn,
        RelationKind::HostedOn,
        RelationKind::ConnectsTo,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            RelationKind::Generic => "root_relation",
            RelationKind::DependsOn => "depends_on",
            RelationKind::HostedOn => "hosted_on",
            RelationKind::ConnectsTo => "connects_to",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| *kind != RelationKind::Generic && kind.type_name() == name)
    }

    /// Picks the variant of the nearest known type in a chain (nearest first)
    pub fn resolve<S: AsRef<str>>(chain: &[S]) -> Self {
        chain
            .iter()
            .find_map(|name| Self::from_type_name(name.as_ref()))
            .unwrap_or(RelationKind::Generic)
    }

    pub fn parent(self) -> Option<Self> {
        match self {
            RelationKind::Generic => None,
            RelationKind::DependsOn => Some(RelationKind::Generic),
            RelationKind::HostedOn | RelationKind::ConnectsTo => Some(RelationKind::DependsOn),
        }
    }

    /// True when `self` is `other` or one of its refinements
    pub fn is_a(self, other: RelationKind) -> bool {
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

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A typed relation between two components
///
/// Owns no lifecycle of its own beyond the topology edge it labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    entity: ModelEntity,
    kind: RelationKind,
    source: String,
    target: String,
}

impl Relation {
    pub fn new(
        entity: ModelEntity,
        kind: RelationKind,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            entity,
            kind,
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn entity(&self) -> &ModelEntity {
        &self.entity
    }

    pub fn kind(&self) -> RelationKind {
        self.kind
    }

    pub fn is_a(&self, kind: RelationKind) -> bool {
        self.kind.is_a(kind)
    }

    /// Relation type name as written in the model (e.g. `hosted_on`)
    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn property_values(&self) -> Result<IndexMap<String, String>> {
        self.entity.property_values()
    }
}
