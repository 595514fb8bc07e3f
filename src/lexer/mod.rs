//! Lexers turning token subtrees into the intermediate representation.
//!
//! Each lexer is a pure function of the whole token tree producing a partial
//! [`Registry`]; partial registries are folded together with
//! [`Registry::merge`].

pub mod component;
pub mod config;
pub mod controller;
pub mod model;
pub mod seeder;
pub mod statement;

use crate::parser::TokenMap;
use crate::types::{Component, Controller, Model, Policy};
use indexmap::IndexMap;

pub use component::ComponentLexer;
pub use config::ConfigLexer;
pub use controller::ControllerLexer;
pub use model::ModelLexer;
pub use seeder::SeederLexer;
pub use statement::StatementLexer;

/// Everything the lexers extracted from one draft
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Models declared in this draft
    pub models: IndexMap<String, Model>,
    /// Models remembered from earlier builds
    pub cache: IndexMap<String, Model>,
    pub controllers: IndexMap<String, Controller>,
    pub components: IndexMap<String, Component>,
    pub policies: Vec<Policy>,
    /// Model names to seed, in order
    pub seeders: Vec<String>,
    /// Configuration overlay from the draft's `config` section
    pub config: TokenMap,
}

impl Registry {
    /// Fold another partial registry into this one; later entries win on key collisions
    pub fn merge(mut self, other: Registry) -> Registry {
        self.models.extend(other.models);
        self.cache.extend(other.cache);
        self.controllers.extend(other.controllers);
        self.components.extend(other.components);
        self.policies.extend(other.policies);
        self.seeders.extend(other.seeders);
        self.config.extend(other.config);
        self
    }
}

/// A lexer over the whole token tree
pub trait Lexer {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn analyze(&self, tokens: &TokenMap) -> Registry;
}

/// The default lexers, in the order they run
pub fn default_lexers() -> Vec<Box<dyn Lexer>> {
    vec![
        Box::new(ConfigLexer::new()),
        Box::new(ModelLexer::new()),
        Box::new(SeederLexer::new()),
        Box::new(ControllerLexer::new(StatementLexer::new())),
        Box::new(ComponentLexer::new(StatementLexer::new())),
    ]
}
