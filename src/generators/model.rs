//! Eloquent model classes.

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{php, write_new, GenerateOptions, Generator};
use crate::ledger::Ledger;
use crate::tree::Tree;
use crate::types::{Column, Model, Relationship, RelationshipKind};
use crate::utils::{class_namespace, populate_stub, to_snake_case, to_studly_case};
use std::fmt::Write;

const HIDDEN_COLUMNS: &[&str] = &["password", "remember_token"];

pub struct ModelGenerator;

impl Generator for ModelGenerator {
    fn name(&self) -> &'static str {
        "model"
    }

    fn types(&self) -> &'static [&'static str] {
        &["models"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let stub = fs.stub("model.class.stub")?;

        for model in tree.models().values() {
            let fqcn = model.fully_qualified_class_name(tree.config());
            let path = php::class_path(tree.config(), &fqcn);
            let contents = render(&stub, model, tree);
            write_new(fs, &mut ledger, &path, &contents)?;
        }

        Ok(ledger)
    }
}

/// Columns filled by mass assignment; morphs expand to their id/type pair
pub fn fillable_columns(model: &Model) -> Vec<String> {
    let mut columns = Vec::new();
    for column in model.columns().values() {
        if column.name() == "id" {
            continue;
        }
        if column.is_morph() {
            columns.push(format!("{}_id", column.name()));
            columns.push(format!("{}_type", column.name()));
        } else if column.data_type() == "rememberToken" {
            continue;
        } else {
            columns.push(column.name().to_string());
        }
    }
    columns
}

fn render(stub: &str, model: &Model, tree: &Tree) -> String {
    let config = tree.config();
    let namespace = model.fully_qualified_namespace(config);
    let mut imports = php::Imports::new(namespace.clone());
    imports.add("Illuminate\\Database\\Eloquent\\Factories\\HasFactory");
    imports.add("Illuminate\\Database\\Eloquent\\Model");

    let mut traits = vec!["HasFactory"];
    if model.uses_soft_deletes() {
        imports.add("Illuminate\\Database\\Eloquent\\SoftDeletes");
        traits.push("SoftDeletes");
    }
    match model.primary_key().map(Column::data_type) {
        Some("uuid") => {
            imports.add("Illuminate\\Database\\Eloquent\\Concerns\\HasUuids");
            traits.push("HasUuids");
        }
        Some("ulid") => {
            imports.add("Illuminate\\Database\\Eloquent\\Concerns\\HasUlids");
            traits.push("HasUlids");
        }
        _ => {}
    }
    traits.sort();

    let mut sections: Vec<String> = vec![format!("    use {};\n", traits.join(", "))];

    if !model.uses_primary_key() {
        sections.push(
            "    protected $primaryKey = null;\n\n    public $incrementing = false;\n".to_string(),
        );
    }

    if !model.uses_timestamps() {
        sections.push("    public $timestamps = false;\n".to_string());
    }

    if config.use_guarded {
        sections.push(array_property(
            "The attributes that aren't mass assignable.",
            "guarded",
            &["id".to_string()],
        ));
    } else {
        sections.push(array_property(
            "The attributes that are mass assignable.",
            "fillable",
            &fillable_columns(model),
        ));
    }

    let hidden: Vec<String> = model
        .columns()
        .values()
        .filter(|c| HIDDEN_COLUMNS.contains(&c.name()) || c.data_type() == "rememberToken")
        .map(|c| {
            if c.data_type() == "rememberToken" {
                "remember_token".to_string()
            } else {
                c.name().to_string()
            }
        })
        .collect();
    if !hidden.is_empty() {
        sections.push(array_property(
            "The attributes that should be hidden for serialization.",
            "hidden",
            &hidden,
        ));
    }

    let casts: Vec<(String, String)> = model
        .columns()
        .values()
        .filter_map(|c| cast_for(c).map(|cast| (c.name().to_string(), cast)))
        .collect();
    if !casts.is_empty() {
        let mut section = String::new();
        section.push_str("    /**\n     * The attributes that should be cast to native types.\n     *\n     * @var array\n     */\n");
        section.push_str("    protected $casts = [\n");
        for (column, cast) in &casts {
            let _ = writeln!(section, "        '{}' => '{}',", column, cast);
        }
        section.push_str("    ];\n");
        sections.push(section);
    }

    for relationship in model.relationships() {
        sections.push(relationship_method(relationship, tree, &mut imports));
    }

    let body = sections.join("\n");
    populate_stub(
        stub,
        &[
            ("namespace", &namespace),
            ("imports", &imports.render()),
            ("class", &model.name()),
            ("body", &body),
        ],
    )
}

fn array_property(description: &str, property: &str, items: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "    /**\n     * {}\n     *\n     * @var array\n     */", description);
    let _ = writeln!(out, "    protected ${} = [", property);
    for item in items {
        let _ = writeln!(out, "        '{}',", item);
    }
    out.push_str("    ];\n");
    out
}

/// Attribute cast for a column, if it needs one
pub fn cast_for(column: &Column) -> Option<String> {
    if column.name() == "id" && column.data_type() == "id" {
        return Some("integer".to_string());
    }
    if column.is_foreign_key() && column.data_type() == "id" {
        return Some("integer".to_string());
    }

    let cast = match column.data_type() {
        "boolean" => "boolean".to_string(),
        "decimal" | "unsignedDecimal" => {
            let scale = column.attributes().get(1).map(|s| s.trim()).unwrap_or("2");
            format!("decimal:{}", scale)
        }
        "double" | "float" => "double".to_string(),
        "date" => "date".to_string(),
        "dateTime" | "dateTimeTz" | "timestamp" | "timestampTz" => "datetime".to_string(),
        "json" | "jsonb" => "array".to_string(),
        "bigInteger" | "integer" | "mediumInteger" | "smallInteger" | "tinyInteger" | "unsignedBigInteger"
        | "unsignedInteger" | "unsignedMediumInteger" | "unsignedSmallInteger" | "unsignedTinyInteger" => {
            "integer".to_string()
        }
        _ => return None,
    };
    Some(cast)
}

/// Class a relationship points at, resolved through the tree when possible
pub fn related_fqcn(relationship: &Relationship, tree: &Tree) -> String {
    let config = tree.config();
    let related = relationship.related();
    let namespace = class_namespace(related);

    if namespace.is_empty() {
        if let Some(model) = tree.model_for_context(related) {
            return model.fully_qualified_class_name(config);
        }
        return format!("{}\\{}", config.models_namespace(), relationship.related_class());
    }

    let wanted = format!("{}\\{}", namespace, relationship.related_class());
    tree.all_models()
        .values()
        .find(|model| format!("{}\\{}", model.namespace(), model.name()).eq_ignore_ascii_case(&wanted))
        .map(|model| model.fully_qualified_class_name(config))
        .unwrap_or_else(|| format!("{}\\{}", config.models_namespace(), wanted))
}

fn relationship_method(
    relationship: &Relationship,
    tree: &Tree,
    imports: &mut php::Imports,
) -> String {
    let kind = relationship.kind;
    let return_type = to_studly_case(kind.method());
    imports.add(format!("Illuminate\\Database\\Eloquent\\Relations\\{}", return_type));

    let arguments = if kind == RelationshipKind::MorphTo {
        String::new()
    } else {
        let fqcn = related_fqcn(relationship, tree);
        imports.add(&fqcn);
        let class = format!("{}::class", php::short_name(&fqcn));

        match kind {
            RelationshipKind::BelongsTo => {
                let mut args = vec![class];
                let foreign = relationship
                    .foreign_key()
                    .map(str::to_string)
                    .or_else(|| {
                        relationship
                            .owner_key()
                            .map(|_| format!("{}_id", to_snake_case(relationship.related())))
                    });
                if let Some(foreign) = foreign {
                    args.push(php::quote(&foreign));
                }
                if let Some(owner) = relationship.owner_key() {
                    args.push(php::quote(owner));
                }
                args.join(", ")
            }
            RelationshipKind::MorphOne | RelationshipKind::MorphMany => {
                let morph_name = relationship
                    .foreign_key()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}able", to_snake_case(&relationship.related_class())));
                format!("{}, {}", class, php::quote(&morph_name))
            }
            _ => class,
        }
    };

    format!(
        "    public function {}(): {}\n    {{\n        return $this->{}({});\n    }}\n",
        relationship.method_name(),
        return_type,
        kind.method(),
        arguments
    )
}
