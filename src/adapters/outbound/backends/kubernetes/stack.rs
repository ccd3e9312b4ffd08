use crate::deployment_model::domain::ComponentId;
use crate::transformation::OutputNode;
use indexmap::IndexMap;
use serde_json::{json, Value};

/// Everything hosted on one compute, packaged as one container image
#[derive(Debug, Clone)]
pub struct ComponentStack {
    name: String,
    compute: ComponentId,
    base_image: String,
    env_vars: IndexMap<String, String>,
    ports: Vec<u16>,
    instructions: Vec<String>,
    command: Option<String>,
}

impl ComponentStack {
    /// `name` must already be a valid DNS-1123 label
    pub fn new(name: impl Into<String>, compute: ComponentId, base_image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            compute,
            base_image: base_image.into(),
            env_vars: IndexMap::new(),
            ports: Vec::new(),
            instructions: Vec::new(),
            command: None,
        }
    }

    /// Stack name for a compute's normalized name: `web_vm` -> `web-vm`
    pub fn label(normalized: &str) -> String {
        normalized.replace('_', "-")
    }

    pub fn compute(&self) -> ComponentId {
        self.compute
    }

    pub fn env_vars(&self) -> &IndexMap<String, String> {
        &self.env_vars
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn set_base_image(&mut self, image: impl Into<String>) {
        self.base_image = image.into();
    }

    pub fn add_env_vars(&mut self, vars: IndexMap<String, String>) {
        self.env_vars.extend(vars);
    }

    pub fn add_port(&mut self, port: u16) {
        if !self.ports.contains(&port) {
            self.ports.push(port);
        }
    }

    /// Copies a script into the image and runs it at build time
    pub fn add_run_step(&mut self, source: &str, destination: &str) {
        self.instructions
            .push(format!("COPY {} {}", source, destination));
        self.instructions
            .push(format!("RUN chmod +x {} && {}", destination, destination));
    }

    /// Copies a script into the image and makes it the container command
    pub fn set_start_step(&mut self, source: &str, destination: &str) {
        self.instructions
            .push(format!("COPY {} {}", source, destination));
        self.command = Some(destination.to_string());
    }

    pub fn deployment_name(&self) -> String {
        format!("{}-deployment", self.name)
    }

    pub fn service_name(&self) -> String {
        format!("{}-service", self.name)
    }

    pub fn dockerfile(&self) -> String {
        let mut lines = vec![format!("FROM {}", self.base_image)];
        lines.extend(self.instructions.iter().cloned());
        lines.extend(self.ports.iter().map(|port| format!("EXPOSE {}", port)));
        if let Some(command) = &self.command {
            lines.push(format!("CMD [\"{}\"]", command));
        }
        let mut content = lines.join("\n");
        content.push('\n');
        content
    }

    /// Deployment manifest; `env` is the stack's resolved environment
    pub fn deployment_manifest(&self, env: &IndexMap<String, String>) -> Value {
        let env: Vec<Value> = env
            .iter()
            .map(|(name, value)| json!({ "name": name, "value": value }))
            .collect();
        let ports: Vec<Value> = self
            .ports
            .iter()
            .map(|port| json!({ "containerPort": port }))
            .collect();
        json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": self.deployment_name(), "labels": { "app": self.name } },
            "spec": {
                "replicas": 1,
                "selector": { "matchLabels": { "app": self.name } },
                "template": {
                    "metadata": { "labels": { "app": self.name } },
                    "spec": {
                        "containers": [{
                            "name": self.name,
                            "image": format!("{}:latest", self.name),
                            "imagePullPolicy": "Never",
                            "ports": ports,
                            "env": env,
                        }]
                    }
                }
            }
        })
    }

    pub fn service_manifest(&self) -> Value {
        let ports: Vec<Value> = self
            .ports
            .iter()
            .map(|port| json!({ "name": format!("port-{}", port), "port": port, "targetPort": port }))
            .collect();
        json!({
            "apiVersion": "v1",
            "kind": "Service",
            "metadata": { "name": self.service_name(), "labels": { "app": self.name } },
            "spec": {
                "type": "NodePort",
                "selector": { "app": self.name },
                "ports": ports,
            }
        })
    }
}

impl OutputNode for ComponentStack {
    fn name(&self) -> &str {
        &self.name
    }
}
