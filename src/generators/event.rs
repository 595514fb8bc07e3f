//! Event classes for `fire` statements naming a class.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{all_statements, constructor_properties, php, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::Statement;
use crate::utils::populate_stub;
use std::collections::HashSet;

pub struct EventGenerator;

impl Generator for EventGenerator {
    fn name(&self) -> &'static str {
        "event"
    }

    fn types(&self) -> &'static [&'static str] {
        &["controllers", "events"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let mut seen = HashSet::new();

        for statement in all_statements(tree) {
            let Statement::Fire(fire) = statement else {
                continue;
            };
            if fire.is_named_event() || !seen.insert(fire.event.clone()) {
                continue;
            }

            let stub = fs.stub("event.stub")?;
            let fqcn = php::app_class(tree.config(), "Events", &fire.event);
            let mut imports = php::Imports::new(php::namespace_of(&fqcn));
            imports.add("Illuminate\\Foundation\\Events\\Dispatchable");
            imports.add("Illuminate\\Queue\\SerializesModels");
            let properties = constructor_properties(&fire.data, tree, &mut imports);

            let contents = populate_stub(
                &stub,
                &[
                    ("namespace", php::namespace_of(&fqcn)),
                    ("imports", &imports.render()),
                    ("class", php::short_name(&fqcn)),
                    ("properties", &properties),
                ],
            );
            write_new(fs, &mut ledger, &php::class_path(tree.config(), &fqcn), &contents)?;
        }

        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::filesystem::MemoryFilesystem;
    use crate::lexer::{ControllerLexer, Lexer, ModelLexer, StatementLexer};
    use crate::parser;

    fn tree(draft: &str) -> Tree {
        let tokens = parser::parse(draft).unwrap();
        let registry = ModelLexer::new()
            .analyze(&tokens)
            .merge(ControllerLexer::new(StatementLexer::new()).analyze(&tokens));
        Tree::new(registry, Config::default())
    }

    #[test]
    fn test_event_class_per_fired_class() {
        let draft = "models:\n  Post:\n    title: string\ncontrollers:\n  Post:\n    store:\n      fire: NewPost with:post, total\n      fire-created: post.created\n    update:\n      fire: NewPost with:post\n";
        let tree = tree(draft);
        let mut fs = MemoryFilesystem::new();

        let ledger = EventGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(ledger.created, vec!["app/Events/NewPost.php"]);

        let event = fs.get("app/Events/NewPost.php").unwrap();
        assert!(event.contains("namespace App\\Events;"));
        assert!(event.contains("use App\\Models\\Post;\nuse Illuminate\\Foundation\\Events\\Dispatchable;\nuse Illuminate\\Queue\\SerializesModels;\n"));
        assert!(event.contains("public function __construct(public Post $post, public $total)"));
    }

    #[test]
    fn test_existing_event_is_skipped() {
        let draft = "controllers:\n  Post:\n    store:\n      fire: NewPost\n";
        let tree = tree(draft);
        let mut fs = MemoryFilesystem::new().with_file("app/Events/NewPost.php", "<?php\n");

        let ledger = EventGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(ledger.skipped, vec!["app/Events/NewPost.php"]);
        assert_eq!(fs.get("app/Events/NewPost.php").unwrap(), "<?php\n");
    }
}
