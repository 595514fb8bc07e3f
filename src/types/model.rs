//! Model entities built by the model lexer.

use crate::config::Config;
use crate::types::column::Column;
use crate::utils::{class_basename, class_namespace, pluralize, singularize, to_camel_case, to_snake_case, to_studly_case};
use indexmap::IndexMap;
use serde::Serialize;

/// Kind of relationship between two models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    BelongsTo,
    HasOne,
    HasMany,
    BelongsToMany,
    MorphTo,
    MorphOne,
    MorphMany,
}

impl RelationshipKind {
    /// Parse a draft keyword, ignoring case
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_lowercase().as_str() {
            "belongsto" => Some(Self::BelongsTo),
            "hasone" => Some(Self::HasOne),
            "hasmany" => Some(Self::HasMany),
            "belongstomany" => Some(Self::BelongsToMany),
            "morphto" => Some(Self::MorphTo),
            "morphone" => Some(Self::MorphOne),
            "morphmany" => Some(Self::MorphMany),
            _ => None,
        }
    }

    /// Eloquent method name for this relationship
    pub fn method(&self) -> &'static str {
        match self {
            Self::BelongsTo => "belongsTo",
            Self::HasOne => "hasOne",
            Self::HasMany => "hasMany",
            Self::BelongsToMany => "belongsToMany",
            Self::MorphTo => "morphTo",
            Self::MorphOne => "morphOne",
            Self::MorphMany => "morphMany",
        }
    }

    pub fn is_plural(&self) -> bool {
        matches!(self, Self::HasMany | Self::BelongsToMany | Self::MorphMany)
    }
}

/// A relationship declared in the draft or inferred from a column.
///
/// The reference has the shape `related[.ownerKey][:foreignColumn]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub reference: String,
}

impl Relationship {
    pub fn new(kind: RelationshipKind, reference: impl Into<String>) -> Self {
        Self {
            kind,
            reference: reference.into(),
        }
    }

    fn target(&self) -> &str {
        self.reference.split(':').next().unwrap_or(&self.reference)
    }

    /// Related model name: `user:author_id` -> `user`, `author_id` -> `author`
    pub fn related(&self) -> &str {
        let target = self.target();
        let target = target.split('.').next().unwrap_or(target);
        target.strip_suffix("_id").unwrap_or(target)
    }

    /// Explicit owner key on the related model: `user.uuid:author_id` -> `uuid`
    pub fn owner_key(&self) -> Option<&str> {
        self.target().split_once('.').map(|(_, key)| key)
    }

    /// Foreign key column when it differs from the conventional `<related>_id`
    pub fn foreign_key(&self) -> Option<&str> {
        self.reference.split_once(':').map(|(_, column)| column)
    }

    /// Name of the relationship method on the owning model
    pub fn method_name(&self) -> String {
        let base = match (self.kind, self.foreign_key()) {
            (RelationshipKind::BelongsTo, Some(column)) => {
                column.strip_suffix("_id").unwrap_or(column).to_string()
            }
            _ => class_basename(self.related()).to_string(),
        };
        let name = to_camel_case(&base);
        if self.kind.is_plural() {
            pluralize(&name)
        } else {
            name
        }
    }

    /// Studly class name of the related model
    pub fn related_class(&self) -> String {
        to_studly_case(&singularize(class_basename(self.related())))
    }
}

/// Index declared under a model's `indexes` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Index {
    /// `index`, `unique`, `primary` or `fullText`
    pub kind: String,
    pub columns: Vec<String>,
}

/// A model declared in the draft (or restored from the build ledger)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    name: String,
    columns: IndexMap<String, Column>,
    uses_timestamps: bool,
    timestamps_tz: bool,
    uses_soft_deletes: bool,
    soft_deletes_tz: bool,
    uses_primary_key: bool,
    relationships: Vec<Relationship>,
    indexes: Vec<Index>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
            uses_timestamps: true,
            timestamps_tz: false,
            uses_soft_deletes: false,
            soft_deletes_tz: false,
            uses_primary_key: true,
            relationships: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Name as written in the draft, namespace included (`Admin/User`)
    pub fn draft_name(&self) -> &str {
        &self.name
    }

    /// Class name without namespace
    pub fn name(&self) -> String {
        to_studly_case(class_basename(&self.name))
    }

    /// Sub-namespace below the models namespace (`Admin`), possibly empty
    pub fn namespace(&self) -> String {
        class_namespace(&self.name)
    }

    pub fn fully_qualified_namespace(&self, config: &Config) -> String {
        let namespace = self.namespace();
        let root = config.models_namespace();
        if namespace.is_empty() {
            root
        } else if namespace == root || namespace.starts_with(&format!("{}\\", root)) {
            namespace
        } else {
            format!("{}\\{}", root, namespace)
        }
    }

    pub fn fully_qualified_class_name(&self, config: &Config) -> String {
        format!("{}\\{}", self.fully_qualified_namespace(config), self.name())
    }

    /// Table name: snake plural of the class name
    pub fn table_name(&self) -> String {
        pluralize(&to_snake_case(&self.name()))
    }

    /// Variable name used for a single instance: `$blogPost`
    pub fn variable(&self) -> String {
        to_camel_case(&self.name())
    }

    pub fn columns(&self) -> &IndexMap<String, Column> {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.insert(column.name().to_string(), column);
    }

    pub fn uses_timestamps(&self) -> bool {
        self.uses_timestamps
    }

    pub fn uses_timestamps_tz(&self) -> bool {
        self.uses_timestamps && self.timestamps_tz
    }

    pub fn disable_timestamps(&mut self) {
        self.uses_timestamps = false;
    }

    pub fn enable_timestamps(&mut self, tz: bool) {
        self.uses_timestamps = true;
        self.timestamps_tz = tz;
    }

    pub fn uses_soft_deletes(&self) -> bool {
        self.uses_soft_deletes
    }

    pub fn uses_soft_deletes_tz(&self) -> bool {
        self.uses_soft_deletes && self.soft_deletes_tz
    }

    pub fn enable_soft_deletes(&mut self, tz: bool) {
        self.uses_soft_deletes = true;
        self.soft_deletes_tz = tz;
    }

    pub fn uses_primary_key(&self) -> bool {
        self.uses_primary_key
    }

    pub fn disable_primary_key(&mut self) {
        self.uses_primary_key = false;
    }

    /// Primary key column when the model has one
    pub fn primary_key(&self) -> Option<&Column> {
        if !self.uses_primary_key {
            return None;
        }
        self.columns.get("id")
    }

    /// Primary key stored as a uuid or ulid string rather than an integer
    pub fn uses_string_key(&self) -> bool {
        self.primary_key()
            .map(|c| matches!(c.data_type(), "uuid" | "ulid"))
            .unwrap_or(false)
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn relationships_of(&self, kind: RelationshipKind) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(move |r| r.kind == kind)
    }

    pub fn add_relationship(&mut self, kind: RelationshipKind, reference: impl Into<String>) {
        self.relationships.push(Relationship::new(kind, reference));
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    pub fn add_index(&mut self, index: Index) {
        self.indexes.push(index);
    }
}
