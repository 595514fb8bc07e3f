//! API resources and resource collections for `resource` statements.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::statements::context_model_name;
use crate::generators::{all_statements, php, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::{Model, Statement};
use crate::utils::populate_stub;
use std::collections::HashSet;
use std::fmt::Write;

/// Columns a resource never exposes
const HIDDEN_COLUMNS: &[&str] = &["password", "remember_token"];

pub struct ResourceGenerator;

impl Generator for ResourceGenerator {
    fn name(&self) -> &'static str {
        "resource"
    }

    fn types(&self) -> &'static [&'static str] {
        &["controllers", "resources"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let mut seen = HashSet::new();

        for statement in all_statements(tree) {
            let Statement::Resource(resource) = statement else {
                continue;
            };
            let model_name = context_model_name(tree, &resource.reference);
            let class = resource.name(&model_name);
            if !seen.insert(class.clone()) {
                continue;
            }

            let fqcn = php::app_class(tree.config(), "Http\\Resources", &class);
            let contents = if resource.is_collection {
                let stub = fs.stub("resource.collection.stub")?;
                populate_stub(&stub, &[("namespace", php::namespace_of(&fqcn)), ("class", &class)])
            } else {
                let stub = fs.stub("resource.stub")?;
                let head = resource.reference.split('.').next().unwrap_or(&resource.reference);
                let attributes = attributes(tree.model_for_context(head));
                populate_stub(
                    &stub,
                    &[
                        ("namespace", php::namespace_of(&fqcn)),
                        ("class", &class),
                        ("attributes", &attributes),
                    ],
                )
            };
            write_new(fs, &mut ledger, &php::class_path(tree.config(), &fqcn), &contents)?;
        }

        Ok(ledger)
    }
}

/// `'column' => $this->column,` lines for every visible column
fn attributes(model: Option<&Model>) -> String {
    let mut out = String::new();
    let Some(model) = model else {
        let _ = writeln!(out, "            'id' => $this->id,");
        return out;
    };

    for column in model.columns().values() {
        if HIDDEN_COLUMNS.contains(&column.name()) {
            continue;
        }
        let _ = writeln!(out, "            '{0}' => $this->{0},", column.name());
    }
    if model.uses_timestamps() {
        let _ = writeln!(out, "            'created_at' => $this->created_at,");
        let _ = writeln!(out, "            'updated_at' => $this->updated_at,");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::filesystem::MemoryFilesystem;
    use crate::lexer::{ControllerLexer, Lexer, ModelLexer, StatementLexer};
    use crate::parser;

    #[test]
    fn test_resource_and_collection() {
        let draft = "models:\n  User:\n    name: string\n    password: string\ncontrollers:\n  User:\n    index:\n      resource: collection:users\n    show:\n      resource: user\n";
        let tokens = parser::parse(draft).unwrap();
        let registry = ModelLexer::new()
            .analyze(&tokens)
            .merge(ControllerLexer::new(StatementLexer::new()).analyze(&tokens));
        let tree = Tree::new(registry, Config::default());
        let mut fs = MemoryFilesystem::new();

        let ledger = ResourceGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(
            ledger.created,
            vec!["app/Http/Resources/UserCollection.php", "app/Http/Resources/UserResource.php"]
        );

        let collection = fs.get("app/Http/Resources/UserCollection.php").unwrap();
        assert!(collection.contains("class UserCollection extends ResourceCollection"));

        let resource = fs.get("app/Http/Resources/UserResource.php").unwrap();
        assert!(resource.contains(
            "            'id' => $this->id,\n            'name' => $this->name,\n            'created_at' => $this->created_at,\n"
        ));
        assert!(!resource.contains("password"));
    }
}
