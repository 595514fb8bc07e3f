//! Form request classes for controller methods that validate input.

use crate::config::Config;
use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{php, rules, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::{Controller, Model, Statement, ValidateStatement};
use crate::utils::{populate_stub, to_studly_case};
use std::fmt::Write;

/// Columns never accepted from user input
const SYSTEM_COLUMNS: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

pub struct FormRequestGenerator;

impl Generator for FormRequestGenerator {
    fn name(&self) -> &'static str {
        "form_request"
    }

    fn types(&self) -> &'static [&'static str] {
        &["controllers", "requests"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let stub = fs.stub("request.stub")?;

        for controller in tree.controllers().values() {
            for (method, statements) in controller.methods() {
                let Some(validate) = validate_statement(statements) else {
                    continue;
                };
                let fqcn = form_request_class(controller, method, tree.config());
                let path = php::class_path(tree.config(), &fqcn);
                let body = render_rules(validate, controller, tree);
                let contents = populate_stub(
                    &stub,
                    &[
                        ("namespace", php::namespace_of(&fqcn)),
                        ("class", php::short_name(&fqcn)),
                        ("rules", &body),
                    ],
                );
                write_new(fs, &mut ledger, &path, &contents)?;
            }
        }

        Ok(ledger)
    }
}

/// The first validate statement of a method body
pub fn validate_statement(statements: &[Statement]) -> Option<&ValidateStatement> {
    statements.iter().find_map(|statement| match statement {
        Statement::Validate(validate) => Some(validate),
        _ => None,
    })
}

/// `App\Http\Requests\<Ns>\<Prefix><Method>Request`
pub fn form_request_class(controller: &Controller, method: &str, config: &Config) -> String {
    let name = format!("{}{}Request", controller.prefix(), to_studly_case(method));
    let namespace = controller.namespace();
    if namespace.is_empty() {
        php::app_class(config, "Http\\Requests", &name)
    } else {
        php::app_class(config, "Http\\Requests", &format!("{}\\{}", namespace, name))
    }
}

/// Rule lines for every validated field
fn render_rules(validate: &ValidateStatement, controller: &Controller, tree: &Tree) -> String {
    let mut out = String::new();
    let context_model = tree.model_for_context(&controller.prefix());

    for field in &validate.fields {
        for (name, field_rules) in field_rules(field, context_model, tree) {
            let quoted: Vec<String> = field_rules.iter().map(|r| php::quote(r)).collect();
            let _ = writeln!(out, "            '{}' => [{}],", name, quoted.join(", "));
        }
    }

    out
}

/// Rules for one validated field.
///
/// A field naming a model expands to all of its user-editable columns;
/// `context.column` and bare columns use the matching column definition; an
/// unknown field is simply `required`.
fn field_rules(field: &str, context_model: Option<&Model>, tree: &Tree) -> Vec<(String, Vec<String>)> {
    if let Some((context, column)) = field.split_once('.') {
        let rules = tree
            .model_for_context(context)
            .and_then(|model| model.column(column).map(|c| rules::for_column(c, &model.table_name())))
            .unwrap_or_else(|| vec!["required".to_string()]);
        return vec![(column.to_string(), rules)];
    }

    if let Some(column) = context_model.and_then(|model| model.column(field)) {
        let table = context_model.map(Model::table_name).unwrap_or_default();
        return vec![(field.to_string(), rules::for_column(column, &table))];
    }

    if let Some(model) = tree.model_for_context(field) {
        let table = model.table_name();
        return model
            .columns()
            .values()
            .filter(|column| !SYSTEM_COLUMNS.contains(&column.name()))
            .map(|column| (column.name().to_string(), rules::for_column(column, &table)))
            .collect();
    }

    vec![(field.to_string(), vec!["required".to_string()])]
}
