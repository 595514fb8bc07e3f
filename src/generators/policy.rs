//! Authorization policy classes for controllers with `meta.policies`.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{php, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::policy::SUPPORTED_ABILITIES;
use crate::types::Policy;
use crate::utils::{populate_stub, to_camel_case};
use std::collections::HashSet;
use std::fmt::Write;

/// Abilities checked against an existing model instance
const INSTANCE_ABILITIES: &[&str] = &["view", "update", "delete"];

pub struct PolicyGenerator;

impl Generator for PolicyGenerator {
    fn name(&self) -> &'static str {
        "policy"
    }

    fn types(&self) -> &'static [&'static str] {
        &["policies"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let mut seen = HashSet::new();

        for policy in tree.policies() {
            if !seen.insert(policy.model.clone()) {
                continue;
            }
            let stub = fs.stub("policy.class.stub")?;
            let fqcn = php::app_class(tree.config(), "Policies", &policy.class_name());
            let contents = render(&stub, policy, &fqcn, tree);
            write_new(fs, &mut ledger, &php::class_path(tree.config(), &fqcn), &contents)?;
        }

        Ok(ledger)
    }
}

/// Resolve a context to its class, falling back to the conventional name
fn class_for(tree: &Tree, context: &str) -> String {
    tree.model_for_context(context)
        .map(|model| model.fully_qualified_class_name(tree.config()))
        .unwrap_or_else(|| tree.fqcn_for_context(context))
}

fn render(stub: &str, policy: &Policy, fqcn: &str, tree: &Tree) -> String {
    let mut imports = php::Imports::new(php::namespace_of(fqcn));
    let model = class_for(tree, &policy.model);
    let user = class_for(tree, "User");
    imports.add(&model);
    imports.add(&user);

    let model_class = php::short_name(&model);
    let variable = to_camel_case(model_class);
    // a User policy would otherwise declare `$user` twice
    let variable = if variable == "user" { "model".to_string() } else { variable };

    let mut methods = Vec::new();
    for ability in SUPPORTED_ABILITIES
        .iter()
        .filter(|ability| policy.abilities.iter().any(|a| a == *ability))
    {
        let mut method = String::new();
        let parameters = if INSTANCE_ABILITIES.contains(ability) {
            format!("User $user, {} ${}", model_class, variable)
        } else {
            "User $user".to_string()
        };
        let _ = writeln!(method, "    public function {}({}): bool\n    {{", ability, parameters);
        let _ = writeln!(method, "        return false;\n    }}");
        methods.push(method);
    }

    populate_stub(
        stub,
        &[
            ("namespace", php::namespace_of(fqcn)),
            ("imports", &imports.render()),
            ("class", php::short_name(fqcn)),
            ("methods", &methods.join("\n")),
        ],
    )
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
    fn test_policy_methods_follow_abilities() {
        let draft = "models:\n  Post:\n    title: string\ncontrollers:\n  Post:\n    resource: web\n    meta:\n      policies: show, index\n";
        let tree = tree(draft);
        let mut fs = MemoryFilesystem::new();

        let ledger = PolicyGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(ledger.created, vec!["app/Policies/PostPolicy.php"]);

        let policy = fs.get("app/Policies/PostPolicy.php").unwrap();
        assert!(policy.contains("namespace App\\Policies;\n\nuse App\\Models\\Post;\nuse App\\Models\\User;\n"));
        assert!(policy.contains("    public function viewAny(User $user): bool\n    {\n        return false;\n    }\n"));
        assert!(policy.contains("    public function view(User $user, Post $post): bool\n"));
        assert!(!policy.contains("function create"));
        assert!(policy.find("viewAny").unwrap() < policy.find("function view(").unwrap());
    }

    #[test]
    fn test_user_policy_renames_subject() {
        let draft = "controllers:\n  User:\n    resource: web\n    meta:\n      policies: true\n";
        let tree = tree(draft);
        let mut fs = MemoryFilesystem::new();

        PolicyGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        let policy = fs.get("app/Policies/UserPolicy.php").unwrap();
        assert!(policy.contains("public function delete(User $user, User $model): bool"));
    }
}
