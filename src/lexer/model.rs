//! Model lexer.
//!
//! Builds [`Model`] entities from the `models` section of the draft and from
//! the `cache` section carrying models of earlier builds.

use crate::lexer::{Lexer, Registry};
use crate::parser::{section, Token, TokenMap};
use crate::types::column::{lookup_data_type, lookup_modifier};
use crate::types::{Column, Index, Model, Modifier, RelationshipKind};
use crate::utils::{singularize, split_list};
use indexmap::IndexMap;

/// Lexer for `models` and `cache`
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelLexer;

impl ModelLexer {
    pub fn new() -> Self {
        Self
    }

    fn analyze_section(&self, tokens: &TokenMap, name: &str) -> IndexMap<String, Model> {
        let mut models = IndexMap::new();
        let Some(definitions) = section(tokens, name) else {
            return models;
        };

        for (model_name, definition) in definitions {
            let empty = TokenMap::new();
            let columns = definition.as_map().unwrap_or(&empty);
            let model = build_model(model_name, columns);
            tracing::debug!(
                section = name,
                model = %model_name,
                columns = model.columns().len(),
                "lexed model"
            );
            models.insert(model_name.clone(), model);
        }

        models
    }
}

impl Lexer for ModelLexer {
    fn name(&self) -> &'static str {
        "models"
    }

    fn analyze(&self, tokens: &TokenMap) -> Registry {
        Registry {
            models: self.analyze_section(tokens, "models"),
            cache: self.analyze_section(tokens, "cache"),
            ..Default::default()
        }
    }
}

/// Remove a reserved key, matching it case-insensitively
fn take_reserved(columns: &mut TokenMap, key: &str) -> Option<Token> {
    let found = columns.keys().find(|k| k.eq_ignore_ascii_case(key)).cloned()?;
    columns.shift_remove(&found)
}

/// Build one model from its column token map
pub fn build_model(name: &str, definition: &TokenMap) -> Model {
    let mut model = Model::new(name);
    let mut columns = definition.clone();

    if columns.get("id").map(Token::is_false).unwrap_or(false) {
        model.disable_primary_key();
        columns.shift_remove("id");
    }

    if let Some(timestamps) = take_reserved(&mut columns, "timestamps") {
        if timestamps.is_false() {
            model.disable_timestamps();
        }
    } else if take_reserved(&mut columns, "timestampstz").is_some() {
        model.enable_timestamps(true);
    }
    // a leftover timestampsTz after an explicit `timestamps` is still reserved
    take_reserved(&mut columns, "timestampstz");

    if take_reserved(&mut columns, "softdeletes").is_some() {
        model.enable_soft_deletes(false);
    } else if take_reserved(&mut columns, "softdeletestz").is_some() {
        model.enable_soft_deletes(true);
    }
    take_reserved(&mut columns, "softdeletestz");

    if let Some(relationships) = take_reserved(&mut columns, "relationships") {
        add_declared_relationships(&mut model, &relationships);
    }

    if let Some(indexes) = take_reserved(&mut columns, "indexes") {
        add_indexes(&mut model, &indexes);
    }

    if !columns.contains_key("id") && model.uses_primary_key() {
        model.add_column(build_column("id", "id"));
    }

    for (column_name, value) in &columns {
        let definition = match value {
            Token::Scalar(_) | Token::Bool(_) => value.text(),
            Token::Null => String::new(),
            Token::List(_) | Token::Map(_) => {
                tracing::warn!(
                    model = %name,
                    column = %column_name,
                    "skipping column with a nested definition"
                );
                continue;
            }
        };

        let column = build_column(column_name, &definition);
        infer_relationships(&mut model, &column);
        model.add_column(column);
    }

    model
}

fn add_declared_relationships(model: &mut Model, relationships: &Token) {
    let Some(map) = relationships.as_map() else {
        tracing::warn!(model = %model.draft_name(), "relationships must be a mapping");
        return;
    };

    for (kind, references) in map {
        let Some(kind_value) = RelationshipKind::parse(kind) else {
            tracing::warn!(
                model = %model.draft_name(),
                relationship = %kind,
                "unknown relationship type"
            );
            continue;
        };

        let references: Vec<String> = match references {
            Token::List(items) => items.iter().filter_map(Token::as_str).flat_map(split_list).collect(),
            other => split_list(&other.text()),
        };
        for reference in references {
            model.add_relationship(kind_value, reference);
        }
    }
}

fn add_indexes(model: &mut Model, indexes: &Token) {
    let Some(entries) = indexes.as_list() else {
        tracing::warn!(model = %model.draft_name(), "indexes must be a list");
        return;
    };

    for entry in entries.iter().filter_map(Token::as_map) {
        for (kind, columns) in entry {
            let kind = match kind.to_lowercase().as_str() {
                "index" => "index",
                "unique" => "unique",
                "primary" => "primary",
                "fulltext" => "fullText",
                _ => {
                    tracing::warn!(model = %model.draft_name(), index = %kind, "unknown index type");
                    continue;
                }
            };
            model.add_index(Index {
                kind: kind.to_string(),
                columns: split_list(&columns.text()),
            });
        }
    }
}

/// Register the implicit relationships a column carries
fn infer_relationships(model: &mut Model, column: &Column) {
    if column.is_foreign_key() {
        let foreign = column
            .modifiers()
            .iter()
            .find(|m| m.name() == "foreign")
            .and_then(Modifier::value);

        let reference = if let Some(foreign) = foreign {
            let (table, key) = foreign.split_once('.').unwrap_or((foreign, "id"));
            if key == "id" {
                format!("{}:{}", singularize(table), column.name())
            } else {
                format!("{}.{}:{}", singularize(table), key, column.name())
            }
        } else if let Some(related) = column.attributes().first() {
            format!("{}:{}", related, column.name())
        } else {
            column.name().to_string()
        };

        model.add_relationship(RelationshipKind::BelongsTo, reference);
    }

    if column.is_morph() {
        model.add_relationship(RelationshipKind::MorphTo, column.name());
    }
}

/// Split a column definition on whitespace, keeping quoted runs together
fn split_definition(definition: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in definition.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                current.push(c);
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parse a column definition string.
///
/// The first data type keyword wins (`id` always forces type `id`), every
/// modifier keyword is collected, anything else is ignored. Without a data
/// type the column is a `string`, or an `id` when it carries `foreign`.
pub fn build_column(name: &str, definition: &str) -> Column {
    let mut data_type: Option<&'static str> = None;
    let mut attributes: Vec<String> = Vec::new();
    let mut modifiers: Vec<Modifier> = Vec::new();

    for token in split_definition(definition) {
        let (keyword, parameters) = match token.split_once(':') {
            Some((keyword, parameters)) => (keyword, Some(parameters)),
            None => (token.as_str(), None),
        };

        if keyword == "id" {
            data_type = Some("id");
            attributes = parameters
                .filter(|p| !p.is_empty())
                .map(|p| vec![p.to_string()])
                .unwrap_or_default();
        } else if data_type.is_none() {
            if let Some(canonical) = lookup_data_type(keyword) {
                data_type = Some(canonical);
                attributes = parameters
                    .filter(|p| !p.is_empty())
                    .map(|p| p.split(',').map(|a| a.trim().to_string()).collect())
                    .unwrap_or_default();
            }
        }

        if let Some(modifier) = lookup_modifier(keyword) {
            let modifier = match parameters {
                Some(value) => Modifier::Value(modifier.to_string(), strip_quotes(value).to_string()),
                None => Modifier::Flag(modifier.to_string()),
            };
            modifiers.push(modifier);
        }
    }

    let data_type = data_type.unwrap_or_else(|| {
        if modifiers.iter().any(|m| m.name() == "foreign") {
            "id"
        } else {
            "string"
        }
    });

    Column::new(name, data_type, modifiers, attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn model_from(draft: &str, name: &str) -> Model {
        let tokens = parse(draft).unwrap();
        let registry = ModelLexer::new().analyze(&tokens);
        registry.models.get(name).cloned().expect("model lexed")
    }

    #[test]
    fn test_column_defaults_to_string() {
        let column = build_column("nickname", "nullable");
        assert_eq!(column.data_type(), "string");
        assert_eq!(column.modifiers(), &[Modifier::Flag("nullable".to_string())]);
        assert!(column.attributes().is_empty());
    }

    #[test]
    fn test_column_attributes_and_modifiers() {
        let price = build_column("price", "decimal:8,2 default:0 unsigned");
        assert_eq!(price.data_type(), "decimal");
        assert_eq!(price.attributes(), &["8".to_string(), "2".to_string()]);
        assert_eq!(
            price.modifiers(),
            &[
                Modifier::Value("default".to_string(), "0".to_string()),
                Modifier::Flag("unsigned".to_string()),
            ]
        );

        let status = build_column("status", "enum:pending,successful,failed default:'pending'");
        assert_eq!(status.data_type(), "enum");
        assert_eq!(status.attributes().len(), 3);
        assert_eq!(status.modifier_value("default"), Some("pending"));
    }

    #[test]
    fn test_column_quoted_value_with_spaces() {
        let column = build_column("greeting", "string:100 default:'hello world' nullable");
        assert_eq!(column.modifier_value("default"), Some("hello world"));
        assert!(column.is_nullable());
        assert_eq!(column.attributes(), &["100".to_string()]);
    }

    #[test]
    fn test_first_data_type_wins_but_id_forces() {
        assert_eq!(build_column("body", "text string").data_type(), "text");
        assert_eq!(build_column("owner_id", "string id:user").data_type(), "id");
        assert_eq!(build_column("owner_id", "string id:user").attributes(), &["user".to_string()]);
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let column = build_column("content", "LONGTEXT Nullable");
        assert_eq!(column.data_type(), "longText");
        assert!(column.is_nullable());
    }

    #[test]
    fn test_foreign_modifier_defaults_to_id() {
        let column = build_column("owner", "foreign:users");
        assert_eq!(column.data_type(), "id");
    }

    #[test]
    fn test_implicit_primary_key_is_first() {
        let model = model_from("models:\n  Post:\n    title: string\n", "Post");
        let first = model.columns().values().next().unwrap();
        assert_eq!(first.name(), "id");
        assert_eq!(first.data_type(), "id");
        assert!(model.uses_primary_key());
        assert!(model.uses_timestamps());
    }

    #[test]
    fn test_disabled_primary_key() {
        let model = model_from("models:\n  Post:\n    id: false\n    title: string\n", "Post");
        assert!(!model.uses_primary_key());
        assert!(!model.has_column("id"));
        assert_eq!(model.columns().len(), 1);
    }

    #[test]
    fn test_explicit_uuid_primary_key() {
        let model = model_from("models:\n  Post:\n    uuid\n    title: string\n", "Post");
        let id = model.column("id").unwrap();
        assert_eq!(id.data_type(), "uuid");
        assert!(id.has_modifier("primary"));
        assert!(model.uses_string_key());
        assert!(model.relationships().is_empty());
    }

    #[test]
    fn test_timestamp_and_soft_delete_flags() {
        let plain = model_from(
            "models:\n  Post:\n    title: string\n    timestamps: false\n    softDeletes\n",
            "Post",
        );
        assert!(!plain.uses_timestamps());
        assert!(plain.uses_soft_deletes());
        assert!(!plain.uses_soft_deletes_tz());
        assert!(!plain.has_column("softdeletes"));
        assert!(!plain.has_column("timestamps"));

        let tz = model_from(
            "models:\n  Post:\n    title: string\n    timestampsTz\n    softDeletesTz\n",
            "Post",
        );
        assert!(tz.uses_timestamps_tz());
        assert!(tz.uses_soft_deletes_tz());
        assert_eq!(tz.columns().len(), 2);
    }

    #[test]
    fn test_foreign_key_inference() {
        let model = model_from(
            "models:\n  Post:\n    author_id: id\n    editor_id: id:user\n    owner: foreign:teams.uuid\n",
            "Post",
        );
        let relationships = model.relationships();
        assert_eq!(relationships.len(), 3);
        assert_eq!(relationships[0].kind, RelationshipKind::BelongsTo);
        assert_eq!(relationships[0].related(), "author");
        assert_eq!(relationships[1].related(), "user");
        assert_eq!(relationships[1].reference, "user:editor_id");
        assert_eq!(relationships[2].reference, "team.uuid:owner");
    }

    #[test]
    fn test_declared_relationships_are_reserved() {
        let model = model_from(
            "models:\n  Post:\n    title: string\n    relationships:\n      hasMany: Comment, Like\n      belongsToMany: Tag\n      hasSomething: Nope\n",
            "Post",
        );
        assert!(!model.has_column("relationships"));
        let kinds: Vec<RelationshipKind> = model.relationships().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RelationshipKind::HasMany, RelationshipKind::HasMany, RelationshipKind::BelongsToMany]
        );
        assert_eq!(model.relationships()[1].reference, "Like");
    }

    #[test]
    fn test_morph_columns() {
        let model = model_from("models:\n  Comment:\n    commentable: morphs\n", "Comment");
        assert_eq!(model.relationships()[0].kind, RelationshipKind::MorphTo);
        assert_eq!(model.relationships()[0].reference, "commentable");
    }

    #[test]
    fn test_indexes() {
        let model = model_from(
            "models:\n  Post:\n    title: string\n    slug: string\n    indexes:\n      - unique: title, slug\n      - index: slug\n",
            "Post",
        );
        assert_eq!(model.indexes().len(), 2);
        assert_eq!(model.indexes()[0].kind, "unique");
        assert_eq!(model.indexes()[0].columns, vec!["title", "slug"]);
        assert!(!model.has_column("indexes"));
    }

    #[test]
    fn test_empty_model_definition() {
        let model = model_from("models:\n  Tag:\n", "Tag");
        assert_eq!(model.columns().len(), 1);
    }

    #[test]
    fn test_cache_section() {
        let tokens = parse("cache:\n  User:\n    name: string\n").unwrap();
        let registry = ModelLexer::new().analyze(&tokens);
        assert!(registry.models.is_empty());
        assert!(registry.cache.contains_key("User"));
    }
}
