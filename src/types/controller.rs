//! Controllers built by the controller lexer.

use crate::config::Config;
use crate::types::policy::Policy;
use crate::types::statement::Statement;
use crate::utils::{class_basename, class_namespace, singularize, to_studly_case};
use indexmap::IndexMap;
use serde::Serialize;

/// Methods routed through a resource route declaration
pub const RESOURCE_METHODS: &[&str] = &["index", "create", "store", "show", "edit", "update", "destroy"];

/// Resource methods that receive a bound model instance
pub const MODEL_BOUND_METHODS: &[&str] = &["show", "edit", "update", "destroy"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Controller {
    name: String,
    methods: IndexMap<String, Vec<Statement>>,
    api_resource: bool,
    policy: Option<Policy>,
    parent: Option<String>,
}

impl Controller {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: IndexMap::new(),
            api_resource: false,
            policy: None,
            parent: None,
        }
    }

    /// Name without namespace or `Controller` suffix: `Post`
    pub fn name(&self) -> String {
        let base = to_studly_case(class_basename(&self.name));
        base.strip_suffix("Controller")
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or(base)
    }

    /// Class name: `PostController`
    pub fn class_name(&self) -> String {
        format!("{}Controller", self.name())
    }

    /// Sub-namespace below the controllers namespace, possibly empty
    pub fn namespace(&self) -> String {
        class_namespace(&self.name)
    }

    pub fn fully_qualified_namespace(&self, config: &Config) -> String {
        let namespace = self.namespace();
        if namespace.is_empty() {
            config.controllers_namespace()
        } else {
            format!("{}\\{}", config.controllers_namespace(), namespace)
        }
    }

    pub fn fully_qualified_class_name(&self, config: &Config) -> String {
        format!("{}\\{}", self.fully_qualified_namespace(config), self.class_name())
    }

    /// Model context the controller is about: `Posts` -> `Post`
    pub fn prefix(&self) -> String {
        singularize(&self.name())
    }

    pub fn methods(&self) -> &IndexMap<String, Vec<Statement>> {
        &self.methods
    }

    pub fn add_method(&mut self, name: impl Into<String>, statements: Vec<Statement>) {
        self.methods.insert(name.into(), statements);
    }

    pub fn is_api_resource(&self) -> bool {
        self.api_resource
    }

    pub fn set_api_resource(&mut self, api: bool) {
        self.api_resource = api;
    }

    pub fn policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }

    pub fn set_policy(&mut self, policy: Policy) {
        self.policy = Some(policy);
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn set_parent(&mut self, parent: impl Into<String>) {
        self.parent = Some(parent.into());
    }

    pub fn is_invokable(&self) -> bool {
        self.methods.len() == 1 && self.methods.contains_key("__invoke")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let controller = Controller::new("Admin/Posts");
        assert_eq!(controller.name(), "Posts");
        assert_eq!(controller.class_name(), "PostsController");
        assert_eq!(controller.prefix(), "Post");
        assert_eq!(
            controller.fully_qualified_class_name(&Config::default()),
            "App\\Http\\Controllers\\Admin\\PostsController"
        );
    }

    #[test]
    fn test_suffix_not_doubled() {
        let controller = Controller::new("UserController");
        assert_eq!(controller.class_name(), "UserController");
        assert_eq!(controller.prefix(), "User");
    }
}
