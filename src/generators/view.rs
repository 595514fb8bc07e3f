//! Blade view placeholders for every rendered view.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{all_statements, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::Statement;
use crate::utils::populate_stub;
use std::collections::HashSet;

pub struct ViewGenerator;

impl Generator for ViewGenerator {
    fn name(&self) -> &'static str {
        "view"
    }

    fn types(&self) -> &'static [&'static str] {
        &["controllers", "views"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let mut seen = HashSet::new();

        for statement in all_statements(tree) {
            let Statement::Render(render) = statement else {
                continue;
            };
            if !seen.insert(render.view.clone()) {
                continue;
            }

            let stub = fs.stub("view.stub")?;
            let path = format!("resources/views/{}.blade.php", render.view_path());
            let contents = populate_stub(&stub, &[("view", &render.view)]);
            write_new(fs, &mut ledger, &path, &contents)?;
        }

        Ok(ledger)
    }
}
