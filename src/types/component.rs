//! Livewire-style components built by the component lexer.

use crate::types::statement::Statement;
use crate::utils::{class_basename, class_namespace, to_kebab_case, to_studly_case};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    name: String,
    properties: Vec<String>,
    methods: IndexMap<String, Vec<Statement>>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            methods: IndexMap::new(),
        }
    }

    pub fn name(&self) -> String {
        to_studly_case(class_basename(&self.name))
    }

    pub fn namespace(&self) -> String {
        class_namespace(&self.name)
    }

    /// Dotted kebab view name: `Admin/CreatePost` -> `admin.create-post`
    pub fn view_name(&self) -> String {
        let namespace = self.namespace();
        let mut parts: Vec<String> = if namespace.is_empty() {
            Vec::new()
        } else {
            namespace.split('\\').map(to_kebab_case).collect()
        };
        parts.push(to_kebab_case(&self.name()));
        parts.join(".")
    }

    /// Public properties initialised from `mount`
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn add_properties(&mut self, properties: impl IntoIterator<Item = String>) {
        self.properties.extend(properties);
    }

    pub fn methods(&self) -> &IndexMap<String, Vec<Statement>> {
        &self.methods
    }

    pub fn add_method(&mut self, name: impl Into<String>, statements: Vec<Statement>) {
        self.methods.insert(name.into(), statements);
    }
}
