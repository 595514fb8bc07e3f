//! Authorization policies attached to controllers.

use serde::Serialize;

/// Abilities a generated policy may define, in output order
pub const SUPPORTED_ABILITIES: &[&str] = &["viewAny", "view", "create", "update", "delete"];

/// Policy ability guarding a controller method
pub fn ability_for_method(method: &str) -> Option<&'static str> {
    match method {
        "index" => Some("viewAny"),
        "show" => Some("view"),
        "create" | "store" => Some("create"),
        "edit" | "update" => Some("update"),
        "destroy" => Some("delete"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Policy {
    /// Model the policy guards (studly singular)
    pub model: String,
    pub abilities: Vec<String>,
    /// Authorize the whole resource in the controller constructor
    pub authorize_resource: bool,
}

impl Policy {
    /// Policy covering every supported ability
    pub fn for_resource(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            abilities: SUPPORTED_ABILITIES.iter().map(|a| a.to_string()).collect(),
            authorize_resource: true,
        }
    }

    /// Policy covering only the abilities behind the listed controller methods
    pub fn for_methods(model: impl Into<String>, methods: &[String]) -> Self {
        let mut abilities: Vec<String> = Vec::new();
        for ability in methods.iter().filter_map(|m| ability_for_method(m)) {
            if !abilities.iter().any(|a| a == ability) {
                abilities.push(ability.to_string());
            }
        }
        Self {
            model: model.into(),
            abilities,
            authorize_resource: false,
        }
    }

    pub fn class_name(&self) -> String {
        format!("{}Policy", self.model)
    }
}
