//! Database seeders for the models listed under `seeders`.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{php, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::utils::populate_stub;

const SEEDERS_NAMESPACE: &str = "Database\\Seeders";

pub struct SeederGenerator;

impl Generator for SeederGenerator {
    fn name(&self) -> &'static str {
        "seeder"
    }

    fn types(&self) -> &'static [&'static str] {
        &["seeders"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        if tree.seeders().is_empty() {
            return Ok(ledger);
        }
        let stub = fs.stub("seeder.stub")?;

        for name in tree.seeders() {
            let fqcn = tree
                .model_for_context(name)
                .map(|model| model.fully_qualified_class_name(tree.config()))
                .unwrap_or_else(|| tree.fqcn_for_context(name));
            let model = php::short_name(&fqcn).to_string();
            let class = format!("{}Seeder", model);

            let mut imports = php::Imports::new(SEEDERS_NAMESPACE);
            imports.add("Illuminate\\Database\\Seeder");
            imports.add(&fqcn);

            let body = format!("        {}::factory()->count(5)->create();\n", model);
            let contents = populate_stub(
                &stub,
                &[("imports", &imports.render()), ("class", &class), ("body", &body)],
            );
            write_new(fs, &mut ledger, &format!("database/seeders/{}.php", class), &contents)?;
        }

        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::lexer::Registry;
    use crate::filesystem::MemoryFilesystem;
    use crate::types::Model;

    #[test]
    fn test_seeder_per_listed_model() {
        let mut registry = Registry::default();
        registry.models.insert("Post".to_string(), Model::new("Post"));
        registry.models.insert("Admin/User".to_string(), Model::new("Admin/User"));
        registry.seeders = vec!["Post".to_string(), "User".to_string()];
        let tree = Tree::new(registry, Config::default());
        let mut fs = MemoryFilesystem::new();

        let ledger = SeederGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(
            ledger.created,
            vec!["database/seeders/PostSeeder.php", "database/seeders/UserSeeder.php"]
        );

        let users = fs.get("database/seeders/UserSeeder.php").unwrap();
        assert!(users.contains("use App\\Models\\Admin\\User;"));
        assert!(users.contains("        User::factory()->count(5)->create();\n"));
    }

    #[test]
    fn test_no_seeders_no_files() {
        let tree = Tree::new(Registry::default(), Config::default());
        let mut fs = MemoryFilesystem::new();
        let ledger = SeederGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert!(ledger.is_empty());
    }
}
