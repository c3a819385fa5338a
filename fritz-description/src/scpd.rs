//! Service description (SCPD) parsing.

use crate::error::{DescriptionError, Result};
use serde::Deserialize;

/// A parsed service description: the actions of one service and the state
/// variables their arguments refer to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceDescription {
    #[serde(rename = "actionList", default)]
    action_list: ActionList,
    #[serde(rename = "serviceStateTable", default)]
    state_table: StateTable,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ActionList {
    #[serde(rename = "action", default)]
    actions: Vec<ActionEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StateTable {
    #[serde(rename = "stateVariable", default)]
    variables: Vec<StateVariableEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ArgumentList {
    #[serde(rename = "argument", default)]
    arguments: Vec<ArgumentEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct AllowedValueList {
    #[serde(rename = "allowedValue", default)]
    values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionEntry {
    pub name: String,
    #[serde(rename = "argumentList", default)]
    argument_list: ArgumentList,
}

impl ActionEntry {
    /// Arguments in declaration order
    pub fn arguments(&self) -> &[ArgumentEntry] {
        &self.argument_list.arguments
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArgumentEntry {
    pub name: String,
    /// `in` or `out`
    pub direction: String,
    #[serde(rename = "relatedStateVariable")]
    pub related_state_variable: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StateVariableEntry {
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: String,
    #[serde(rename = "defaultValue")]
    pub default_value: Option<String>,
    #[serde(rename = "@sendEvents")]
    pub send_events: Option<String>,
    #[serde(rename = "allowedValueList", default)]
    allowed_value_list: AllowedValueList,
}

impl StateVariableEntry {
    pub fn allowed_values(&self) -> &[String] {
        &self.allowed_value_list.values
    }
}

impl ServiceDescription {
    /// Parse an SCPD document.
    ///
    /// # Errors
    ///
    /// Returns `DescriptionError::ParseError` if the XML is malformed.
    pub fn from_xml(source: &str, xml: &str) -> Result<Self> {
        quick_xml::de::from_str(xml).map_err(|e| {
            DescriptionError::ParseError(format!("Failed to parse service description {}: {}", source, e))
        })
    }

    pub fn actions(&self) -> &[ActionEntry] {
        &self.action_list.actions
    }

    pub fn state_variables(&self) -> &[StateVariableEntry] {
        &self.state_table.variables
    }
}
