use crate::transformation::{OutputGraph, ResourceDescriptor};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

pub const TEMPLATE_VERSION: &str = "2018-08-31";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatParameter {
    #[serde(rename = "type")]
    pub parameter_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl HeatParameter {
    pub fn string() -> Self {
        Self {
            parameter_type: "string".to_string(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }
}

#[derive(Debug, Serialize)]
struct HeatResource {
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    properties: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,
}

/// HOT document as written to disk
#[derive(Debug, Serialize)]
pub struct HeatTemplate {
    heat_template_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    parameters: IndexMap<String, HeatParameter>,
    resources: IndexMap<String, HeatResource>,
}

impl HeatTemplate {
    /// Lays out the output graph; `depends_on` lists come from its edges
    pub fn from_graph(
        description: Option<String>,
        parameters: IndexMap<String, HeatParameter>,
        graph: &OutputGraph<ResourceDescriptor>,
    ) -> Self {
        let resources = graph
            .nodes()
            .map(|(id, node)| {
                (
                    node.name.clone(),
                    HeatResource {
                        resource_type: node.resource_type.clone(),
                        properties: node.properties.clone(),
                        depends_on: graph.dependency_names(id),
                    },
                )
            })
            .collect();
        Self {
            heat_template_version: TEMPLATE_VERSION.to_string(),
            description,
            parameters,
            resources,
        }
    }
}

/// `{ get_param: <name> }`
pub fn get_param(name: &str) -> Value {
    serde_json::json!({ "get_param": name })
}

/// `{ get_resource: <name> }`
pub fn get_resource(name: &str) -> Value {
    serde_json::json!({ "get_resource": name })
}
