//! Model factories with fake attribute data.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{faker, php, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::{Column, Model};
use crate::utils::{class_basename, populate_stub, singularize, to_studly_case};
use std::fmt::Write;

const FACTORIES_NAMESPACE: &str = "Database\\Factories";

pub struct FactoryGenerator;

impl Generator for FactoryGenerator {
    fn name(&self) -> &'static str {
        "factory"
    }

    fn types(&self) -> &'static [&'static str] {
        &["factories"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let stub = fs.stub("factory.stub")?;

        for model in tree.models().values() {
            let namespace = factory_namespace(model);
            let path = format!(
                "database/factories/{}{}Factory.php",
                namespace_path(model),
                model.name()
            );
            let contents = render(&stub, model, &namespace, tree);
            write_new(fs, &mut ledger, &path, &contents)?;
        }

        Ok(ledger)
    }
}

fn factory_namespace(model: &Model) -> String {
    let namespace = model.namespace();
    if namespace.is_empty() {
        FACTORIES_NAMESPACE.to_string()
    } else {
        format!("{}\\{}", FACTORIES_NAMESPACE, namespace)
    }
}

fn namespace_path(model: &Model) -> String {
    let namespace = model.namespace();
    if namespace.is_empty() {
        String::new()
    } else {
        format!("{}/", namespace.replace('\\', "/"))
    }
}

fn render(stub: &str, model: &Model, namespace: &str, tree: &Tree) -> String {
    let config = tree.config();
    let mut imports = php::Imports::new(namespace);
    imports.add("Illuminate\\Database\\Eloquent\\Factories\\Factory");
    imports.add(model.fully_qualified_class_name(config));

    let mut definition = String::new();
    for column in model.columns().values() {
        if column.name() == "id" {
            continue;
        }
        if column.is_nullable() && !config.fake_nullables {
            continue;
        }

        if column.is_morph() {
            let _ = writeln!(definition, "            '{}_id' => fake()->randomDigitNotNull(),", column.name());
            let _ = writeln!(definition, "            '{}_type' => fake()->word(),", column.name());
            continue;
        }

        let expression = if column.is_foreign_key() {
            let fqcn = related_model_class(column, tree);
            imports.add(&fqcn);
            format!("{}::factory()", php::short_name(&fqcn))
        } else {
            faker::for_column(column)
        };
        if expression.starts_with("Str::") {
            imports.add("Illuminate\\Support\\Str");
        }

        let name = if column.data_type() == "rememberToken" {
            "remember_token"
        } else {
            column.name()
        };
        let _ = writeln!(definition, "            '{}' => {},", name, expression);
    }

    populate_stub(
        stub,
        &[
            ("namespace", namespace),
            ("imports", &imports.render()),
            ("factory", &format!("{}Factory", model.name())),
            ("model", &model.name()),
            ("definition", &definition),
        ],
    )
}

/// Model class a foreign key column belongs to
fn related_model_class(column: &Column, tree: &Tree) -> String {
    let context = column
        .attributes()
        .first()
        .cloned()
        .unwrap_or_else(|| match column.modifier_value("foreign") {
            Some(target) => singularize(target.split('.').next().unwrap_or(target)),
            None => column.name().strip_suffix("_id").unwrap_or(column.name()).to_string(),
        });

    match tree.model_for_context(class_basename(&context)) {
        Some(model) => model.fully_qualified_class_name(tree.config()),
        None => format!(
            "{}\\{}",
            tree.config().models_namespace(),
            to_studly_case(&singularize(class_basename(&context)))
        ),
    }
}
