//! ARM resources and the values they require from the template
//!
//! A resource may nest others (a VM owns its NIC, the NIC its security group
//! and public IP). Nested resources are written before their parent and
//! their required parameters and variables are gathered recursively.

use crate::transformation::propagation::{collect_nested, DerivedValues};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

pub const SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2019-04-01/deploymentTemplate.json#";
pub const CONTENT_VERSION: &str = "1.0.0.0";

const NETWORK_API: &str = "2023-04-01";
const COMPUTE_API: &str = "2023-03-01";

pub const VIRTUAL_NETWORK: &str = "Microsoft.Network/virtualNetworks";
pub const SECURITY_GROUP: &str = "Microsoft.Network/networkSecurityGroups";
pub const PUBLIC_IP: &str = "Microsoft.Network/publicIPAddresses";
pub const NETWORK_INTERFACE: &str = "Microsoft.Network/networkInterfaces";
pub const VIRTUAL_MACHINE: &str = "Microsoft.Compute/virtualMachines";
pub const VM_EXTENSION: &str = "Microsoft.Compute/virtualMachines/extensions";

const SSH_PORT: u16 = 22;

/// A template-level value a resource depends on
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    Parameter(Value),
    Variable(Value),
}

#[derive(Debug, Clone)]
pub struct ArmResource {
    name: String,
    resource_type: &'static str,
    api_version: &'static str,
    properties: Value,
    depends_on: Vec<String>,
    requirements: IndexMap<String, Requirement>,
    nested: Vec<ArmResource>,
}

impl ArmResource {
    pub fn new(resource_type: &'static str, api_version: &'static str, name: impl Into<String>) -> Self {
        let mut requirements = IndexMap::new();
        requirements.insert(
            "location".to_string(),
            Requirement::Parameter(parameter("string", Some(json!("[resourceGroup().location]")))),
        );
        Self {
            name: name.into(),
            resource_type,
            api_version,
            properties: json!({}),
            depends_on: Vec::new(),
            requirements,
            nested: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_type(&self) -> &str {
        self.resource_type
    }

    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = properties;
        self
    }

    pub fn depends_on(mut self, resource_id: impl Into<String>) -> Self {
        self.depends_on.push(resource_id.into());
        self
    }

    pub fn require_parameter(mut self, name: &str, definition: Value) -> Self {
        self.requirements
            .insert(name.to_string(), Requirement::Parameter(definition));
        self
    }

    pub fn require_variable(mut self, name: &str, value: Value) -> Self {
        self.requirements
            .insert(name.to_string(), Requirement::Variable(value));
        self
    }

    pub fn nest(mut self, resource: ArmResource) -> Self {
        self.nested.push(resource);
        self
    }

    /// `[resourceId(...)]` expression for this resource
    pub fn resource_id(&self) -> String {
        let name = match self.name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
            Some(expression) => expression.to_string(),
            None => format!("'{}'", self.name),
        };
        format!("[resourceId('{}', {})]", self.resource_type, name)
    }

    /// This resource and everything nested in it, nested resources first
    pub fn flatten(mut self) -> Vec<ArmResource> {
        let nested = std::mem::take(&mut self.nested);
        let mut resources: Vec<ArmResource> =
            nested.into_iter().flat_map(ArmResource::flatten).collect();
        resources.push(self);
        resources
    }

    pub fn to_json(&self) -> Value {
        let mut resource = json!({
            "type": self.resource_type,
            "apiVersion": self.api_version,
            "name": self.name,
            "location": "[parameters('location')]",
            "properties": self.properties,
        });
        if !self.depends_on.is_empty() {
            resource["dependsOn"] = json!(self.depends_on);
        }
        resource
    }
}

impl DerivedValues<Requirement> for ArmResource {
    fn own_values(&self) -> IndexMap<String, Requirement> {
        self.requirements.clone()
    }

    fn nested_sources(&self) -> Vec<&dyn DerivedValues<Requirement>> {
        self.nested
            .iter()
            .map(|r| r as &dyn DerivedValues<Requirement>)
            .collect()
    }
}

/// `{ "type": ..., "defaultValue": ... }`
pub fn parameter(kind: &str, default: Option<Value>) -> Value {
    match default {
        Some(default) => json!({ "type": kind, "defaultValue": default }),
        None => json!({ "type": kind }),
    }
}

/// Deployment template as written to disk
#[derive(Debug, Serialize)]
pub struct ArmTemplate {
    #[serde(rename = "$schema")]
    schema: &'static str,
    #[serde(rename = "contentVersion")]
    content_version: &'static str,
    parameters: IndexMap<String, Value>,
    variables: IndexMap<String, Value>,
    resources: Vec<Value>,
}

impl ArmTemplate {
    /// Collects requirements from every root, then flattens the roots in order
    pub fn from_resources(roots: Vec<ArmResource>) -> Self {
        let mut parameters = IndexMap::new();
        let mut variables = IndexMap::new();
        for root in &roots {
            for (name, requirement) in collect_nested(root) {
                match requirement {
                    Requirement::Parameter(definition) => {
                        parameters.insert(name, definition);
                    }
                    Requirement::Variable(value) => {
                        variables.insert(name, value);
                    }
                }
            }
        }
        let resources = roots
            .into_iter()
            .flat_map(ArmResource::flatten)
            .map(|r| r.to_json())
            .collect();
        Self {
            schema: SCHEMA,
            content_version: CONTENT_VERSION,
            parameters,
            variables,
            resources,
        }
    }
}

/// Image and sizing shared by the virtual machines of one template
#[derive(Debug, Clone)]
pub struct VmProfile {
    pub size: String,
    pub admin_username: String,
    pub image_publisher: String,
    pub image_offer: String,
    pub image_sku: String,
}

pub fn virtual_network(name: &str) -> ArmResource {
    ArmResource::new(VIRTUAL_NETWORK, NETWORK_API, "[variables('vnetName')]")
        .require_variable("vnetName", json!(name))
        .require_variable("subnetName", json!("default"))
        .require_variable("addressPrefix", json!("10.0.0.0/16"))
        .require_variable("subnetPrefix", json!("10.0.0.0/24"))
        .with_properties(json!({
            "addressSpace": { "addressPrefixes": ["[variables('addressPrefix')]"] },
            "subnets": [{
                "name": "[variables('subnetName')]",
                "properties": { "addressPrefix": "[variables('subnetPrefix')]" }
            }]
        }))
}

/// Inbound TCP rules for SSH and every listed port
pub fn security_group(name: &str, ports: &[u16]) -> ArmResource {
    let mut all_ports = vec![SSH_PORT];
    all_ports.extend(ports.iter().copied().filter(|p| *p != SSH_PORT));
    let rules: Vec<Value> = all_ports
        .iter()
        .enumerate()
        .map(|(i, port)| {
            json!({
                "name": format!("allow-{}", port),
                "properties": {
                    "priority": 1000 + 10 * i,
                    "protocol": "Tcp",
                    "access": "Allow",
                    "direction": "Inbound",
                    "sourceAddressPrefix": "*",
                    "sourcePortRange": "*",
                    "destinationAddressPrefix": "*",
                    "destinationPortRange": port.to_string()
                }
            })
        })
        .collect();
    ArmResource::new(SECURITY_GROUP, NETWORK_API, name)
        .with_properties(json!({ "securityRules": rules }))
}

pub fn public_ip(name: &str) -> ArmResource {
    ArmResource::new(PUBLIC_IP, NETWORK_API, name).with_properties(json!({
        "publicIPAllocationMethod": "Dynamic",
        "dnsSettings": {
            "domainNameLabel": format!("[toLower(concat('{}-', uniqueString(resourceGroup().id)))]", name)
        }
    }))
}

pub fn network_interface(
    name: &str,
    security_group: ArmResource,
    public_ip: ArmResource,
    network_id: &str,
) -> ArmResource {
    ArmResource::new(NETWORK_INTERFACE, NETWORK_API, name)
        .require_variable(
            "subnetRef",
            json!("[resourceId('Microsoft.Network/virtualNetworks/subnets', variables('vnetName'), variables('subnetName'))]"),
        )
        .with_properties(json!({
            "ipConfigurations": [{
                "name": "ipconfig1",
                "properties": {
                    "privateIPAllocationMethod": "Dynamic",
                    "subnet": { "id": "[variables('subnetRef')]" },
                    "publicIPAddress": { "id": public_ip.resource_id() }
                }
            }],
            "networkSecurityGroup": { "id": security_group.resource_id() }
        }))
        .depends_on(network_id)
        .depends_on(security_group.resource_id())
        .depends_on(public_ip.resource_id())
        .nest(security_group)
        .nest(public_ip)
}

/// Linux VM with SSH key login; `public_key` becomes the key parameter's default
pub fn virtual_machine(
    name: &str,
    interface: ArmResource,
    profile: &VmProfile,
    public_key: Option<String>,
) -> ArmResource {
    ArmResource::new(VIRTUAL_MACHINE, COMPUTE_API, name)
        .require_parameter("vmSize", parameter("string", Some(json!(profile.size))))
        .require_parameter(
            "adminUsername",
            parameter("string", Some(json!(profile.admin_username))),
        )
        .require_parameter("adminPublicKey", parameter("securestring", public_key.map(Value::from)))
        .require_variable("imagePublisher", json!(profile.image_publisher))
        .require_variable("imageOffer", json!(profile.image_offer))
        .require_variable("imageSku", json!(profile.image_sku))
        .with_properties(json!({
            "hardwareProfile": { "vmSize": "[parameters('vmSize')]" },
            "osProfile": {
                "computerName": name,
                "adminUsername": "[parameters('adminUsername')]",
                "linuxConfiguration": {
                    "disablePasswordAuthentication": true,
                    "ssh": {
                        "publicKeys": [{
                            "path": "[concat('/home/', parameters('adminUsername'), '/.ssh/authorized_keys')]",
                            "keyData": "[parameters('adminPublicKey')]"
                        }]
                    }
                }
            },
            "storageProfile": {
                "imageReference": {
                    "publisher": "[variables('imagePublisher')]",
                    "offer": "[variables('imageOffer')]",
                    "sku": "[variables('imageSku')]",
                    "version": "latest"
                },
                "osDisk": { "createOption": "FromImage" }
            },
            "networkProfile": { "networkInterfaces": [{ "id": interface.resource_id() }] }
        }))
        .depends_on(interface.resource_id())
        .nest(interface)
}

/// CustomScript extension downloading `file_uris` and running `command`
pub fn custom_script(vm: &ArmResource, file_uris: &[String], command: &str) -> ArmResource {
    ArmResource::new(VM_EXTENSION, COMPUTE_API, format!("{}/deploy", vm.name()))
        .require_parameter("artifactsLocation", parameter("string", None))
        .with_properties(json!({
            "publisher": "Microsoft.Azure.Extensions",
            "type": "CustomScript",
            "typeHandlerVersion": "2.1",
            "autoUpgradeMinorVersion": true,
            "settings": { "fileUris": file_uris },
            "protectedSettings": { "commandToExecute": command }
        }))
        .depends_on(vm.resource_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> VmProfile {
        VmProfile {
            size: "Standard_B1s".to_string(),
            admin_username: "azureuser".to_string(),
            image_publisher: "Canonical".to_string(),
            image_offer: "ubuntu".to_string(),
            image_sku: "22_04-lts".to_string(),
        }
    }

    fn machine() -> ArmResource {
        let network = virtual_network("shop-vnet");
        let nic = network_interface(
            "vm-nic",
            security_group("vm-nsg", &[3306]),
            public_ip("vm-ip"),
            &network.resource_id(),
        );
        virtual_machine("vm", nic, &profile(), None)
    }

    #[test]
    fn test_resource_id_of_literal_and_expression_names() {
        assert_eq!(
            public_ip("vm-ip").resource_id(),
            "[resourceId('Microsoft.Network/publicIPAddresses', 'vm-ip')]"
        );
        assert_eq!(
            virtual_network("n").resource_id(),
            "[resourceId('Microsoft.Network/virtualNetworks', variables('vnetName'))]"
        );
    }

    #[test]
    fn test_flatten_writes_nested_before_parent() {
        let names: Vec<String> = machine()
            .flatten()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["vm-nsg", "vm-ip", "vm-nic", "vm"]);
    }

    #[test]
    fn test_requirements_collected_from_nested_resources() {
        let template = ArmTemplate::from_resources(vec![virtual_network("shop-vnet"), machine()]);
        let json = serde_json::to_value(&template).unwrap();

        assert_eq!(json["$schema"], SCHEMA);
        for parameter in ["location", "vmSize", "adminUsername", "adminPublicKey"] {
            assert!(json["parameters"].get(parameter).is_some(), "missing {}", parameter);
        }
        assert_eq!(json["parameters"]["adminPublicKey"]["type"], "securestring");
        assert!(json["parameters"]["adminPublicKey"].get("defaultValue").is_none());
        assert_eq!(json["variables"]["vnetName"], "shop-vnet");
        assert!(json["variables"].get("subnetRef").is_some());
        assert_eq!(json["resources"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_security_group_always_allows_ssh() {
        let group = security_group("vm-nsg", &[22, 8080]).to_json();
        let rules = group["properties"]["securityRules"].as_array().unwrap();
        let ports: Vec<&str> = rules
            .iter()
            .map(|r| r["properties"]["destinationPortRange"].as_str().unwrap())
            .collect();
        assert_eq!(ports, vec!["22", "8080"]);
    }

    #[test]
    fn test_custom_script_depends_on_vm() {
        let vm = machine();
        let extension = custom_script(&vm, &["a".to_string()], "sh a").to_json();
        assert_eq!(extension["name"], "vm/deploy");
        assert_eq!(extension["dependsOn"][0], vm.resource_id());
        assert_eq!(extension["properties"]["protectedSettings"]["commandToExecute"], "sh a");
    }
}
