//! Read-only view over a lexed draft, with model lookup by context name.

use crate::config::Config;
use crate::error::{BlueprintError, Result};
use crate::lexer::Registry;
use crate::types::{Component, Controller, Model, Policy};
use crate::utils::{class_basename, pluralize, singularize, to_studly_case};
use indexmap::IndexMap;

/// Everything generators may read: the lexed registry plus configuration
#[derive(Debug, Clone)]
pub struct Tree {
    /// Models declared in the current draft
    models: IndexMap<String, Model>,
    /// Cached models overlaid by the current draft, used for lookups
    index: IndexMap<String, Model>,
    controllers: IndexMap<String, Controller>,
    components: IndexMap<String, Component>,
    policies: Vec<Policy>,
    seeders: Vec<String>,
    config: Config,
}

impl Tree {
    pub fn new(registry: Registry, config: Config) -> Self {
        let mut index = registry.cache;
        for (name, model) in &registry.models {
            index.insert(name.clone(), model.clone());
        }

        Self {
            models: registry.models,
            index,
            controllers: registry.controllers,
            components: registry.components,
            policies: registry.policies,
            seeders: registry.seeders,
            config,
        }
    }

    /// Tree holding only models, keyed however the caller likes
    pub fn from_models(models: IndexMap<String, Model>, config: Config) -> Self {
        Self::new(
            Registry {
                models,
                ..Default::default()
            },
            config,
        )
    }

    /// Models declared in the current draft (the ones to generate)
    pub fn models(&self) -> &IndexMap<String, Model> {
        &self.models
    }

    /// Cached and current models together
    pub fn all_models(&self) -> &IndexMap<String, Model> {
        &self.index
    }

    pub fn controllers(&self) -> &IndexMap<String, Controller> {
        &self.controllers
    }

    pub fn components(&self) -> &IndexMap<String, Component> {
        &self.components
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    pub fn seeders(&self) -> &[String] {
        &self.seeders
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a context name (`post`, `Posts`, `user`) to a model.
    ///
    /// Tries an exact studly singular key, then the studly plural key, then a
    /// suffix match on the last segment of every key. The suffix match only
    /// succeeds when exactly one model qualifies; it never guesses.
    pub fn model_for_context(&self, context: &str) -> Option<&Model> {
        let singular = to_studly_case(&singularize(context));
        let plural = to_studly_case(&pluralize(context));

        if let Some(model) = self.index.get(&singular) {
            return Some(model);
        }
        if let Some(model) = self.index.get(&plural) {
            return Some(model);
        }

        let mut matches = self.index.iter().filter(|(key, _)| {
            let segment = class_basename(key);
            segment.ends_with(&singular) || segment.ends_with(&plural)
        });

        match (matches.next(), matches.next()) {
            (Some((_, model)), None) => Some(model),
            _ => None,
        }
    }

    /// Like [`model_for_context`](Self::model_for_context), but a miss is an error
    /// naming the class the context was expected to resolve to
    pub fn model_for_context_strict(&self, context: &str) -> Result<&Model> {
        self.model_for_context(context)
            .ok_or_else(|| BlueprintError::ModelNotFound {
                fqcn: self.fqcn_for_context(context),
            })
    }

    /// Fully qualified class name a context refers to, or the conventional guess
    pub fn fqcn_for_context(&self, context: &str) -> String {
        if let Some(model) = self.index.get(context) {
            return model.fully_qualified_class_name(&self.config);
        }

        let studly = to_studly_case(context);
        let suffix = format!("\\{}", studly);
        let mut matches = self
            .index
            .iter()
            .filter(|(key, _)| key.replace('/', "\\").ends_with(&suffix));
        if let (Some((_, model)), None) = (matches.next(), matches.next()) {
            return model.fully_qualified_class_name(&self.config);
        }

        format!("{}\\{}", self.config.models_namespace(), studly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(names: &[&str]) -> Tree {
        let models = names
            .iter()
            .map(|name| (name.to_string(), Model::new(*name)))
            .collect();
        Tree::from_models(models, Config::default())
    }

    #[test]
    fn test_exact_singular_and_plural() {
        let tree = tree(&["Post", "Comment"]);
        assert_eq!(tree.model_for_context("post").unwrap().name(), "Post");
        assert_eq!(tree.model_for_context("posts").unwrap().name(), "Post");
        assert_eq!(tree.model_for_context("Comments").unwrap().name(), "Comment");
    }

    #[test]
    fn test_namespaced_suffix_match() {
        let tree = tree(&["App\\Models\\Post", "App\\Models\\Admin\\User"]);
        let user = tree.model_for_context("user").unwrap();
        assert_eq!(user.draft_name(), "App\\Models\\Admin\\User");
        assert_eq!(tree.model_for_context("posts").unwrap().name(), "Post");
    }

    #[test]
    fn test_slash_namespaces() {
        let tree = tree(&["Admin/User"]);
        assert_eq!(tree.model_for_context("user").unwrap().draft_name(), "Admin/User");
    }

    #[test]
    fn test_ambiguous_suffix_yields_none() {
        let tree = tree(&["Admin/User", "Billing/User"]);
        assert!(tree.model_for_context("user").is_none());
    }

    #[test]
    fn test_strict_miss_names_guess() {
        let tree = tree(&["App\\Models\\Post", "App\\Models\\Admin\\User"]);
        let err = tree.model_for_context_strict("Unknown").unwrap_err();
        match err {
            BlueprintError::ModelNotFound { fqcn } => assert_eq!(fqcn, "App\\Models\\Unknown"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_current_models_shadow_cache() {
        let mut cached = Model::new("Post");
        cached.disable_timestamps();
        let mut registry = Registry::default();
        registry.cache.insert("Post".to_string(), cached);
        registry.cache.insert("User".to_string(), Model::new("User"));
        registry.models.insert("Post".to_string(), Model::new("Post"));

        let tree = Tree::new(registry, Config::default());
        assert!(tree.model_for_context("post").unwrap().uses_timestamps());
        assert!(tree.model_for_context("user").is_some());
        assert_eq!(tree.models().len(), 1);
        assert_eq!(tree.all_models().len(), 2);
    }
}
