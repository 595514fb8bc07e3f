//! Build orchestration: draft text in, generated files and a ledger out.
//!
//! [`Blueprint`] owns the lexers and generators, threads the configuration
//! through both, and persists a [`BuildCache`] after every build so later
//! runs can resolve models declared by earlier drafts.

use crate::config::Config;
use crate::error::{BlueprintError, Result};
use crate::filesystem::Filesystem;
use crate::generators::{default_generators, should_generate, GenerateOptions, Generator};
use crate::ledger::{BuildCache, Ledger};
use crate::lexer::{default_lexers, Lexer, Registry};
use crate::parser::{self, Token, TokenMap};
use crate::tree::Tree;
use std::path::PathBuf;

/// The draft pipeline: parse, analyze, generate
pub struct Blueprint {
    lexers: Vec<Box<dyn Lexer>>,
    generators: Vec<Box<dyn Generator>>,
    config: Config,
}

impl Blueprint {
    /// Pipeline with the default lexers and generators
    pub fn new(config: Config) -> Self {
        Self {
            lexers: default_lexers(),
            generators: default_generators(),
            config,
        }
    }

    /// Pipeline with nothing registered
    pub fn empty(config: Config) -> Self {
        Self {
            lexers: Vec::new(),
            generators: Vec::new(),
            config,
        }
    }

    pub fn register_lexer(&mut self, lexer: Box<dyn Lexer>) {
        self.lexers.push(lexer);
    }

    pub fn register_generator(&mut self, generator: Box<dyn Generator>) {
        self.generators.push(generator);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn parse(&self, content: &str) -> Result<TokenMap> {
        parser::parse(content)
    }

    /// Run every lexer over the tokens and assemble the tree.
    ///
    /// The draft's `config` section is merged over the pipeline configuration
    /// for this tree only.
    pub fn analyze(&self, tokens: &TokenMap) -> Result<Tree> {
        let registry = self
            .lexers
            .iter()
            .fold(Registry::default(), |registry, lexer| {
                tracing::debug!(lexer = lexer.name(), "analyzing");
                registry.merge(lexer.analyze(tokens))
            });

        let config = self.config.clone().merge_overlay(&registry.config)?;
        tracing::info!(
            models = registry.models.len(),
            controllers = registry.controllers.len(),
            components = registry.components.len(),
            "draft analyzed"
        );
        Ok(Tree::new(registry, config))
    }

    /// Run the generators selected by `only`/`skip` and merge their ledgers
    pub fn generate(
        &self,
        tree: &Tree,
        fs: &mut dyn Filesystem,
        only: &[String],
        skip: &[String],
        options: &GenerateOptions,
    ) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        for generator in &self.generators {
            if !should_generate(generator.types(), only, skip) {
                tracing::debug!(generator = generator.name(), "filtered out");
                continue;
            }
            tracing::debug!(generator = generator.name(), "generating");
            ledger = ledger.merge(generator.output(tree, fs, options)?);
        }
        Ok(ledger)
    }

    /// Build a draft file and persist the ledger.
    ///
    /// Models remembered by the previous ledger are visible to context
    /// lookups; the persisted model snapshot is the previous one overlaid by
    /// this draft's models.
    pub fn execute(
        &self,
        fs: &mut dyn Filesystem,
        draft: &str,
        only: &[String],
        skip: &[String],
        options: &GenerateOptions,
    ) -> Result<Ledger> {
        if !fs.exists(draft) {
            return Err(BlueprintError::MissingDraft(PathBuf::from(draft)));
        }

        let mut tokens = self.parse(&fs.get(draft)?)?;
        let cache = self.load_cache(fs)?;
        if !cache.models.is_empty() {
            tokens.insert("cache".to_string(), Token::Map(cache.models.clone()));
        }

        let tree = self.analyze(&tokens)?;
        let ledger = self.generate(&tree, fs, only, skip, options)?;

        let mut models = cache.models;
        if let Some(fresh) = parser::section(&tokens, "models") {
            models.extend(fresh.clone());
        }
        let persisted = BuildCache {
            ledger: ledger.clone(),
            models,
        };
        fs.put(&self.config.ledger_path, &persisted.dump()?)?;

        tracing::info!(
            created = ledger.created.len(),
            updated = ledger.updated.len(),
            skipped = ledger.skipped.len(),
            "build finished"
        );
        Ok(ledger)
    }

    /// Delete what the last build created.
    ///
    /// Updated files are reported but left alone since they held content of
    /// their own. The ledger keeps its model snapshot.
    pub fn erase(&self, fs: &mut dyn Filesystem) -> Result<Ledger> {
        let path = &self.config.ledger_path;
        if !fs.exists(path) {
            return Err(BlueprintError::MissingLedger(PathBuf::from(path)));
        }

        let cache = BuildCache::parse(&fs.get(path)?)?;
        fs.delete(&cache.ledger.created)?;
        tracing::info!(deleted = cache.ledger.created.len(), "erased previous build");

        let remaining = BuildCache {
            ledger: Ledger::new(),
            models: cache.models,
        };
        fs.put(path, &remaining.dump()?)?;

        Ok(Ledger {
            deleted: cache.ledger.created,
            updated: cache.ledger.updated,
            ..Ledger::default()
        })
    }

    fn load_cache(&self, fs: &dyn Filesystem) -> Result<BuildCache> {
        let path = &self.config.ledger_path;
        if !fs.exists(path) {
            return Ok(BuildCache::default());
        }
        BuildCache::parse(&fs.get(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFilesystem;
    use crate::types::Statement;

    fn options() -> GenerateOptions {
        GenerateOptions {
            overwrite_migrations: false,
            timestamp: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
                .and_then(|d| d.and_hms_opt(3, 4, 5))
                .unwrap(),
        }
    }

    #[test]
    fn test_analyze_builds_tree() {
        let blueprint = Blueprint::new(Config::default());
        let tokens = blueprint
            .parse("models:\n  Post:\n    title: string\n    content: longtext\ncontrollers:\n  Post:\n    store:\n      validate: title, content\n      save: post\n")
            .unwrap();
        let tree = blueprint.analyze(&tokens).unwrap();

        let post = &tree.models()["Post"];
        let columns: Vec<&String> = post.columns().keys().collect();
        assert_eq!(columns, vec!["id", "title", "content"]);
        assert!(post.uses_timestamps());

        let store = &tree.controllers()["Post"].methods()["store"];
        assert!(matches!(store[0], Statement::Validate(_)));
        assert!(matches!(store[1], Statement::Eloquent(_)));
    }

    #[test]
    fn test_draft_config_overlays_tree_only() {
        let blueprint = Blueprint::new(Config::default());
        let tokens = blueprint.parse("config:\n  use_guarded: true\n").unwrap();
        let tree = blueprint.analyze(&tokens).unwrap();
        assert!(tree.config().use_guarded);
        assert!(!blueprint.config().use_guarded);
    }

    #[test]
    fn test_generate_respects_filters() {
        let blueprint = Blueprint::new(Config::default());
        let tokens = blueprint.parse("models:\n  Post:\n    title: string\n").unwrap();
        let tree = blueprint.analyze(&tokens).unwrap();
        let mut fs = MemoryFilesystem::new();

        let only = vec!["models".to_string()];
        let ledger = blueprint.generate(&tree, &mut fs, &only, &[], &options()).unwrap();
        assert_eq!(ledger.created, vec!["app/Models/Post.php"]);
    }

    #[test]
    fn test_execute_missing_draft() {
        let blueprint = Blueprint::new(Config::default());
        let mut fs = MemoryFilesystem::new();
        let err = blueprint
            .execute(&mut fs, "draft.yaml", &[], &[], &options())
            .unwrap_err();
        assert!(matches!(err, BlueprintError::MissingDraft(_)));
    }

    #[test]
    fn test_execute_persists_ledger_and_models() {
        let blueprint = Blueprint::new(Config::default());
        let mut fs = MemoryFilesystem::new().with_file("draft.yaml", "models:\n  Post:\n    title: string\n");

        let ledger = blueprint.execute(&mut fs, "draft.yaml", &[], &[], &options()).unwrap();
        assert!(ledger.created.contains(&"app/Models/Post.php".to_string()));

        let cache = BuildCache::parse(&fs.get(".blueprint").unwrap()).unwrap();
        assert_eq!(cache.ledger, ledger);
        assert!(cache.models.contains_key("Post"));
    }

    #[test]
    fn test_cached_models_resolve_in_later_builds() {
        let blueprint = Blueprint::new(Config::default());
        let mut fs = MemoryFilesystem::new()
            .with_file("draft.yaml", "models:\n  Admin/User:\n    name: string\n");
        blueprint.execute(&mut fs, "draft.yaml", &[], &[], &options()).unwrap();

        fs.put("draft.yaml", "seeders: User\n").unwrap();
        blueprint.execute(&mut fs, "draft.yaml", &[], &[], &options()).unwrap();

        let seeder = fs.get("database/seeders/UserSeeder.php").unwrap();
        assert!(seeder.contains("use App\\Models\\Admin\\User;"));
        let cache = BuildCache::parse(&fs.get(".blueprint").unwrap()).unwrap();
        assert!(cache.models.contains_key("Admin/User"));
    }

    #[test]
    fn test_erase_deletes_created_files() {
        let blueprint = Blueprint::new(Config::default());
        let mut fs = MemoryFilesystem::new()
            .with_file("draft.yaml", "models:\n  Post:\n    title: string\ncontrollers:\n  Post:\n    resource: web\n")
            .with_file("routes/web.php", "<?php\n");
        let built = blueprint.execute(&mut fs, "draft.yaml", &[], &[], &options()).unwrap();
        assert_eq!(built.updated, vec!["routes/web.php"]);

        let erased = blueprint.erase(&mut fs).unwrap();
        assert_eq!(erased.deleted, built.created);
        assert_eq!(erased.updated, vec!["routes/web.php"]);
        assert!(!fs.exists("app/Models/Post.php"));
        assert!(fs.exists("routes/web.php"));

        let cache = BuildCache::parse(&fs.get(".blueprint").unwrap()).unwrap();
        assert!(cache.ledger.is_empty());
        assert!(cache.models.contains_key("Post"));
    }

    #[test]
    fn test_erase_without_ledger() {
        let blueprint = Blueprint::new(Config::default());
        let mut fs = MemoryFilesystem::new();
        assert!(matches!(
            blueprint.erase(&mut fs),
            Err(BlueprintError::MissingLedger(_))
        ));
    }
}
