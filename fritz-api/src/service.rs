//! Capability model: services, their actions and the arguments they take

use std::collections::BTreeMap;

use fritz_description::{ServiceDescription, ServiceEntry};

use crate::value::DataType;

/// Canonical registry key for a service name.
///
/// `WLANConfiguration:2` becomes `WLANConfiguration2` (colons are dropped),
/// `WLANConfiguration` becomes `WLANConfiguration1` (a missing instance number
/// defaults to 1), and a name already ending in a digit is returned unchanged.
/// Applying it twice gives the same result as applying it once.
pub fn normalize_name(name: &str) -> String {
    let name = name.replace(':', "");
    match name.chars().last() {
        Some(last) if last.is_ascii_digit() => name,
        _ => format!("{}1", name),
    }
}

/// Direction of an action argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    fn parse(direction: &str) -> Self {
        if direction.trim().eq_ignore_ascii_case("in") {
            Direction::In
        } else {
            Direction::Out
        }
    }
}

/// One declared argument of an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: String,
    pub direction: Direction,
    pub related_state_variable: String,
    pub data_type: DataType,
}

/// An action of a service with its arguments in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub name: String,
    pub arguments: Vec<ArgumentSpec>,
}

impl ActionDescriptor {
    pub fn in_arguments(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.arguments.iter().filter(|a| a.direction == Direction::In)
    }

    pub fn out_arguments(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.arguments.iter().filter(|a| a.direction == Direction::Out)
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

/// A state variable from a service's state table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateVariable {
    pub name: String,
    /// UPnP data type as declared, e.g. `ui4` or `dateTime`
    pub upnp_type: String,
    pub default_value: Option<String>,
    pub allowed_values: Vec<String>,
}

impl StateVariable {
    pub fn data_type(&self) -> DataType {
        DataType::from_upnp(&self.upnp_type)
    }
}

/// A callable service of the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    name: String,
    service_type: String,
    service_id: Option<String>,
    control_url: String,
    scpd_url: String,
    actions: BTreeMap<String, ActionDescriptor>,
    state_variables: BTreeMap<String, StateVariable>,
    loaded: bool,
}

impl ServiceDescriptor {
    /// Service advertised by a device description, without its schema yet
    pub fn from_entry(entry: &ServiceEntry) -> Self {
        Self {
            name: normalize_name(entry.short_name()),
            service_type: entry.service_type.clone(),
            service_id: entry.service_id.clone(),
            control_url: entry.control_url.clone(),
            scpd_url: entry.scpd_url.clone(),
            actions: BTreeMap::new(),
            state_variables: BTreeMap::new(),
            loaded: false,
        }
    }

    /// Normalized name, the registry key
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn service_id(&self) -> Option<&str> {
        self.service_id.as_deref()
    }

    /// Namespace of the action elements and of the `SOAPACTION` header
    pub fn namespace(&self) -> &str {
        &self.service_type
    }

    pub fn control_url(&self) -> &str {
        &self.control_url
    }

    pub fn scpd_url(&self) -> &str {
        &self.scpd_url
    }

    pub fn actions(&self) -> &BTreeMap<String, ActionDescriptor> {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.get(name)
    }

    pub fn state_variables(&self) -> &BTreeMap<String, StateVariable> {
        &self.state_variables
    }

    pub fn state_variable(&self, name: &str) -> Option<&StateVariable> {
        self.state_variables.get(name)
    }

    /// Whether the service description has been loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Populate actions and state variables from the service description.
    pub fn load(&mut self, description: &ServiceDescription) {
        self.state_variables = description
            .state_variables()
            .iter()
            .map(|v| {
                let variable = StateVariable {
                    name: v.name.clone(),
                    upnp_type: v.data_type.clone(),
                    default_value: v.default_value.clone(),
                    allowed_values: v.allowed_values().to_vec(),
                };
                (v.name.clone(), variable)
            })
            .collect();

        let mut actions = BTreeMap::new();
        for entry in description.actions() {
            let arguments = entry
                .arguments()
                .iter()
                .map(|a| ArgumentSpec {
                    name: a.name.clone(),
                    direction: Direction::parse(&a.direction),
                    related_state_variable: a.related_state_variable.clone(),
                    // Arguments referring to an undeclared variable are treated as text
                    data_type: self
                        .state_variables
                        .get(&a.related_state_variable)
                        .map(StateVariable::data_type)
                        .unwrap_or(DataType::String),
                })
                .collect();
            actions.insert(
                entry.name.clone(),
                ActionDescriptor {
                    name: entry.name.clone(),
                    arguments,
                },
            );
        }
        self.actions = actions;
        self.loaded = true;
    }
}
