//! Mailables and their Blade views for `send` statements.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{all_statements, constructor_properties, php, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::{SendType, Statement};
use crate::utils::{populate_stub, to_title_case};
use std::collections::HashSet;

const MAIL_IMPORTS: &[&str] = &[
    "Illuminate\\Bus\\Queueable",
    "Illuminate\\Mail\\Mailable",
    "Illuminate\\Mail\\Mailables\\Content",
    "Illuminate\\Mail\\Mailables\\Envelope",
    "Illuminate\\Queue\\SerializesModels",
];

pub struct MailGenerator;

impl Generator for MailGenerator {
    fn name(&self) -> &'static str {
        "mail"
    }

    fn types(&self) -> &'static [&'static str] {
        &["controllers", "mails"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let mut seen = HashSet::new();

        for statement in all_statements(tree) {
            let Statement::Send(send) = statement else {
                continue;
            };
            if send.send_type != SendType::Mail || !seen.insert(send.target.clone()) {
                continue;
            }

            let stub = fs.stub("mail.stub")?;
            let fqcn = php::app_class(tree.config(), "Mail", &send.target);
            let class = php::short_name(&fqcn);
            let subject = to_title_case(class);
            let view = send.view();

            let mut imports = php::Imports::new(php::namespace_of(&fqcn));
            for import in MAIL_IMPORTS {
                imports.add(import);
            }
            let properties = constructor_properties(&send.data, tree, &mut imports);

            let contents = populate_stub(
                &stub,
                &[
                    ("namespace", php::namespace_of(&fqcn)),
                    ("imports", &imports.render()),
                    ("class", class),
                    ("properties", &properties),
                    ("subject", &subject),
                    ("view", &view),
                ],
            );
            write_new(fs, &mut ledger, &php::class_path(tree.config(), &fqcn), &contents)?;

            let view_stub = fs.stub("mail.view.stub")?;
            let view_path = format!("resources/views/{}.blade.php", view.replace('.', "/"));
            let view_contents = populate_stub(&view_stub, &[("subject", &subject)]);
            write_new(fs, &mut ledger, &view_path, &view_contents)?;
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
    fn test_mailable_and_view() {
        let draft = "models:\n  Post:\n    title: string\ncontrollers:\n  Post:\n    store:\n      send: ReviewPost to:post.author with:post\n";
        let tree = tree(draft);
        let mut fs = MemoryFilesystem::new();

        let ledger = MailGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(
            ledger.created,
            vec!["app/Mail/ReviewPost.php", "resources/views/emails/review-post.blade.php"]
        );

        let mail = fs.get("app/Mail/ReviewPost.php").unwrap();
        assert!(mail.contains("class ReviewPost extends Mailable"));
        assert!(mail.contains("public function __construct(public Post $post)"));
        assert!(mail.contains("subject: 'Review Post',"));
        assert!(mail.contains("view: 'emails.review-post',"));

        let view = fs.get("resources/views/emails/review-post.blade.php").unwrap();
        assert!(view.contains("# Review Post"));
    }

    #[test]
    fn test_notifications_are_not_mailables() {
        let draft = "controllers:\n  Post:\n    store:\n      notify: post.author ReviewNotification\n";
        let tree = tree(draft);
        let mut fs = MemoryFilesystem::new();

        let ledger = MailGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert!(ledger.is_empty());
    }
}
