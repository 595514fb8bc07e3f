//! Create-table migrations for models and their pivot tables.

use crate::config::Config;
use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{php, GenerateOptions, Generator};
use crate::ledger::{Action, Ledger};
use crate::tree::Tree;
use crate::types::{Column, Modifier, Model, RelationshipKind};
use crate::utils::{pluralize, populate_stub, singularize, to_snake_case};
use chrono::Duration;
use std::fmt::Write;

const MIGRATIONS_PATH: &str = "database/migrations";

/// Modifiers rendered by the foreign key constraint rather than as calls
const CONSTRAINT_MODIFIERS: &[&str] = &["foreign", "onDelete", "onUpdate"];

pub struct MigrationGenerator;

impl Generator for MigrationGenerator {
    fn name(&self) -> &'static str {
        "migration"
    }

    fn types(&self) -> &'static [&'static str] {
        &["migrations"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let stub = fs.stub("migration.stub")?;
        let existing = fs.files(MIGRATIONS_PATH);
        let config = tree.config();
        let mut sequence = 0;
        let mut pivots: Vec<String> = Vec::new();

        let mut tables: Vec<(String, String)> = Vec::new();
        for model in tree.models().values() {
            tables.push((model.table_name(), schema(model, config)));

            for relationship in model.relationships_of(RelationshipKind::BelongsToMany) {
                let related = relationship.related_class();
                let table = pivot_table_name(&model.name(), &related);
                if pivots.contains(&table) {
                    continue;
                }
                pivots.push(table.clone());

                let related_model = tree.model_for_context(&related);
                tables.push((table, pivot_schema(model, &related, related_model, config)));
            }
        }

        for (table, schema) in tables {
            let contents = populate_stub(&stub, &[("table", &table), ("schema", &schema)]);
            let suffix = format!("_create_{}_table.php", table);

            if let Some(name) = existing.iter().find(|name| name.ends_with(&suffix)) {
                let path = format!("{}/{}", MIGRATIONS_PATH, name);
                if options.overwrite_migrations {
                    fs.put(&path, &contents)?;
                    ledger.record(Action::Updated, path);
                } else {
                    ledger.record(Action::Skipped, path);
                }
                continue;
            }

            let timestamp = options.timestamp + Duration::seconds(sequence);
            sequence += 1;
            let path = format!(
                "{}/{}{}",
                MIGRATIONS_PATH,
                timestamp.format("%Y_%m_%d_%H%M%S"),
                suffix
            );
            fs.put(&path, &contents)?;
            ledger.record(Action::Created, path);
        }

        Ok(ledger)
    }
}

/// Pivot table joining two models: singular snake names in alphabetical order
pub fn pivot_table_name(first: &str, second: &str) -> String {
    let mut segments = [
        to_snake_case(&singularize(first)),
        to_snake_case(&singularize(second)),
    ];
    segments.sort();
    segments.join("_")
}

/// Body of the `Schema::create` closure for a model
pub fn schema(model: &Model, config: &Config) -> String {
    let mut out = String::new();

    for column in model.columns().values() {
        let _ = writeln!(out, "            {};", column_definition(column, config));
    }

    for index in model.indexes() {
        let _ = writeln!(
            out,
            "            $table->{}({});",
            index.kind,
            php::quoted_list(&index.columns)
        );
    }

    if model.uses_soft_deletes() {
        let method = if model.uses_soft_deletes_tz() { "softDeletesTz" } else { "softDeletes" };
        let _ = writeln!(out, "            $table->{}();", method);
    }

    if model.uses_timestamps() {
        let method = if model.uses_timestamps_tz() { "timestampsTz" } else { "timestamps" };
        let _ = writeln!(out, "            $table->{}();", method);
    }

    out
}

fn pivot_schema(model: &Model, related: &str, related_model: Option<&Model>, config: &Config) -> String {
    let mut columns = vec![
        (to_snake_case(&model.name()), model.primary_key().map(|c| c.data_type().to_string())),
        (
            to_snake_case(related),
            related_model.and_then(|m| m.primary_key()).map(|c| c.data_type().to_string()),
        ),
    ];
    columns.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();
    for (segment, key_type) in columns {
        let name = format!("{}_id", segment);
        let method = foreign_method(key_type.as_deref().unwrap_or("id"));
        let mut line = format!("$table->{}('{}')", method, name);
        if config.use_constraints {
            line.push_str(&constraint(&pluralize(&segment), "id", &name, None, None, config));
        }
        let _ = writeln!(out, "            {};", line);
    }
    out
}

fn foreign_method(data_type: &str) -> &'static str {
    match data_type {
        "uuid" => "foreignUuid",
        "ulid" => "foreignUlid",
        _ => "foreignId",
    }
}

/// One `$table->...` chain, without the trailing semicolon
pub fn column_definition(column: &Column, config: &Config) -> String {
    let name = column.name();
    let data_type = column.data_type();

    if name == "id" {
        return match data_type {
            "id" => "$table->id()".to_string(),
            "uuid" | "ulid" => format!("$table->{}('id')->primary()", data_type),
            other => format!("$table->{}('id')", other),
        };
    }

    let foreign_shaped = column.is_foreign_key() && matches!(data_type, "id" | "uuid" | "ulid");

    let mut line = if foreign_shaped {
        format!("$table->{}('{}')", foreign_method(data_type), name)
    } else if data_type == "rememberToken" {
        "$table->rememberToken()".to_string()
    } else {
        format!("$table->{}('{}'{})", data_type, name, attribute_arguments(column))
    };

    for modifier in column.modifiers() {
        if CONSTRAINT_MODIFIERS.contains(&modifier.name()) {
            continue;
        }
        if foreign_shaped && modifier.name() == "primary" {
            continue;
        }
        match modifier {
            Modifier::Flag(name) => {
                let _ = write!(line, "->{}()", name);
            }
            Modifier::Value(name, value) => {
                let _ = write!(line, "->{}({})", name, php::literal(value));
            }
        }
    }

    if foreign_shaped && (config.use_constraints || column.has_modifier("foreign")) {
        let (table, key) = column.references();
        line.push_str(&constraint(
            &table,
            &key,
            name,
            column.modifier_value("onDelete"),
            column.modifier_value("onUpdate"),
            config,
        ));
    }

    line
}

fn attribute_arguments(column: &Column) -> String {
    let attributes = column.attributes();
    if attributes.is_empty() {
        return String::new();
    }
    match column.data_type() {
        "enum" | "set" => format!(", {}", php::quoted_list(attributes)),
        _ => attributes
            .iter()
            .map(|a| format!(", {}", php::literal(a.trim())))
            .collect(),
    }
}

/// `->constrained(...)` followed by the delete/update actions
fn constraint(
    table: &str,
    key: &str,
    column: &str,
    on_delete: Option<&str>,
    on_update: Option<&str>,
    config: &Config,
) -> String {
    let conventional = column
        .strip_suffix("_id")
        .map(|base| pluralize(base) == table)
        .unwrap_or(false);

    let mut out = if conventional && key == "id" {
        "->constrained()".to_string()
    } else if key == "id" {
        format!("->constrained('{}')", table)
    } else {
        format!("->constrained('{}', '{}')", table, key)
    };

    let on_delete = on_delete.unwrap_or(&config.on_delete);
    match on_delete.to_lowercase().as_str() {
        "cascade" => out.push_str("->cascadeOnDelete()"),
        "restrict" => out.push_str("->restrictOnDelete()"),
        "null" => out.push_str("->nullOnDelete()"),
        "no_action" => out.push_str("->noActionOnDelete()"),
        _ => {}
    }

    let on_update = on_update.unwrap_or(&config.on_update);
    match on_update.to_lowercase().as_str() {
        "cascade" => out.push_str("->cascadeOnUpdate()"),
        "restrict" => out.push_str("->restrictOnUpdate()"),
        "no_action" => out.push_str("->noActionOnUpdate()"),
        _ => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFilesystem;
    use crate::lexer::model::{build_column, build_model};
    use crate::parser;
    use chrono::NaiveDate;
    use indexmap::IndexMap;

    fn options(overwrite: bool) -> GenerateOptions {
        GenerateOptions {
            overwrite_migrations: overwrite,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
        }
    }

    fn tree(draft: &str, config: Config) -> Tree {
        let tokens = parser::parse(draft).unwrap();
        let models: IndexMap<String, Model> = parser::section(&tokens, "models")
            .unwrap()
            .iter()
            .map(|(name, definition)| (name.clone(), build_model(name, definition.as_map().unwrap())))
            .collect();
        Tree::from_models(models, config)
    }

    #[test]
    fn test_column_definitions() {
        let config = Config::default();
        assert_eq!(
            column_definition(&build_column("title", "string:400"), &config),
            "$table->string('title', 400)"
        );
        assert_eq!(
            column_definition(&build_column("price", "decimal:8,2 nullable default:0"), &config),
            "$table->decimal('price', 8, 2)->nullable()->default(0)"
        );
        assert_eq!(
            column_definition(&build_column("status", "enum:draft,published default:draft"), &config),
            "$table->enum('status', ['draft', 'published'])->default('draft')"
        );
        assert_eq!(
            column_definition(&build_column("author_id", "id:user"), &config),
            "$table->foreignId('author_id')"
        );
    }

    #[test]
    fn test_constrained_foreign_keys() {
        let config = Config {
            use_constraints: true,
            ..Config::default()
        };
        assert_eq!(
            column_definition(&build_column("user_id", "id"), &config),
            "$table->foreignId('user_id')->constrained()->cascadeOnDelete()->cascadeOnUpdate()"
        );
        assert_eq!(
            column_definition(&build_column("author_id", "id:user nullable onDelete:null"), &config),
            "$table->foreignId('author_id')->nullable()->constrained('users')->nullOnDelete()->cascadeOnUpdate()"
        );
    }

    #[test]
    fn test_creates_model_and_pivot_migrations() {
        let draft = "models:\n  Post:\n    title: string\n    softdeletes\n    relationships:\n      belongsToMany: Tag\n  Tag:\n    name: string\n    relationships:\n      belongsToMany: Post\n";
        let tree = tree(draft, Config::default());
        let mut fs = MemoryFilesystem::new();

        let ledger = MigrationGenerator.output(&tree, &mut fs, &options(false)).unwrap();
        assert_eq!(
            ledger.created,
            vec![
                "database/migrations/2024_01_02_030405_create_posts_table.php",
                "database/migrations/2024_01_02_030406_create_post_tag_table.php",
                "database/migrations/2024_01_02_030407_create_tags_table.php",
            ]
        );

        let posts = fs.get(&ledger.created[0]).unwrap();
        assert!(posts.contains("Schema::create('posts'"));
        assert!(posts.contains("            $table->id();\n            $table->string('title');\n"));
        assert!(posts.contains("$table->softDeletes();\n            $table->timestamps();"));

        let pivot = fs.get(&ledger.created[1]).unwrap();
        assert!(pivot.contains("$table->foreignId('post_id');\n            $table->foreignId('tag_id');"));
    }

    #[test]
    fn test_existing_migration_skipped_or_overwritten() {
        let tree = tree("models:\n  Post:\n    title: string\n", Config::default());
        let existing = "database/migrations/2020_01_01_000000_create_posts_table.php";

        let mut fs = MemoryFilesystem::new().with_file(existing, "old");
        let ledger = MigrationGenerator.output(&tree, &mut fs, &options(false)).unwrap();
        assert_eq!(ledger.skipped, vec![existing]);
        assert_eq!(fs.get(existing).unwrap(), "old");

        let ledger = MigrationGenerator.output(&tree, &mut fs, &options(true)).unwrap();
        assert_eq!(ledger.updated, vec![existing]);
        assert!(fs.get(existing).unwrap().contains("Schema::create('posts'"));
    }
}
