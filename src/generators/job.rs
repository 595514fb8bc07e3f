//! Queued job classes for `dispatch` statements.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{all_statements, constructor_properties, php, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::Statement;
use crate::utils::populate_stub;
use std::collections::HashSet;

const JOB_IMPORTS: &[&str] = &[
    "Illuminate\\Bus\\Queueable",
    "Illuminate\\Contracts\\Queue\\ShouldQueue",
    "Illuminate\\Foundation\\Bus\\Dispatchable",
    "Illuminate\\Queue\\InteractsWithQueue",
    "Illuminate\\Queue\\SerializesModels",
];

pub struct JobGenerator;

impl Generator for JobGenerator {
    fn name(&self) -> &'static str {
        "job"
    }

    fn types(&self) -> &'static [&'static str] {
        &["controllers", "jobs"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let mut seen = HashSet::new();

        for statement in all_statements(tree) {
            let Statement::Dispatch(dispatch) = statement else {
                continue;
            };
            if !seen.insert(dispatch.job.clone()) {
                continue;
            }

            let stub = fs.stub("job.stub")?;
            let fqcn = php::app_class(tree.config(), "Jobs", &dispatch.job);
            let mut imports = php::Imports::new(php::namespace_of(&fqcn));
            for import in JOB_IMPORTS {
                imports.add(import);
            }
            let properties = constructor_properties(&dispatch.data, tree, &mut imports);

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

    #[test]
    fn test_job_class() {
        let draft = "models:\n  Post:\n    title: string\ncontrollers:\n  Post:\n    store:\n      dispatch: SyncMedia with:post\n";
        let tokens = parser::parse(draft).unwrap();
        let registry = ModelLexer::new()
            .analyze(&tokens)
            .merge(ControllerLexer::new(StatementLexer::new()).analyze(&tokens));
        let tree = Tree::new(registry, Config::default());
        let mut fs = MemoryFilesystem::new();

        let ledger = JobGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(ledger.created, vec!["app/Jobs/SyncMedia.php"]);

        let job = fs.get("app/Jobs/SyncMedia.php").unwrap();
        assert!(job.contains("class SyncMedia implements ShouldQueue"));
        assert!(job.contains("use App\\Models\\Post;\nuse Illuminate\\Bus\\Queueable;\n"));
        assert!(job.contains("public function __construct(public Post $post)"));
    }
}
