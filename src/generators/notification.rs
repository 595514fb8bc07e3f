//! Notification classes for `notify` and notification `send` statements.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{all_statements, constructor_properties, php, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::Statement;
use crate::utils::populate_stub;
use std::collections::HashSet;

pub struct NotificationGenerator;

impl Generator for NotificationGenerator {
    fn name(&self) -> &'static str {
        "notification"
    }

    fn types(&self) -> &'static [&'static str] {
        &["controllers", "notifications"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let mut seen = HashSet::new();

        for statement in all_statements(tree) {
            let Statement::Send(send) = statement else {
                continue;
            };
            if !send.is_notification() || !seen.insert(send.target.clone()) {
                continue;
            }

            let stub = fs.stub("notification.stub")?;
            let fqcn = php::app_class(tree.config(), "Notification", &send.target);
            let mut imports = php::Imports::new(php::namespace_of(&fqcn));
            imports.add("Illuminate\\Bus\\Queueable");
            imports.add("Illuminate\\Notifications\\Messages\\MailMessage");
            imports.add("Illuminate\\Notifications\\Notification");
            let properties = constructor_properties(&send.data, tree, &mut imports);

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
