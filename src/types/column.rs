//! Column definitions and the closed data type / modifier vocabularies.

use crate::utils::{class_basename, pluralize, to_snake_case};
use serde::Serialize;

/// Every data type a column may carry, keyed by lowercase spelling
pub const DATA_TYPES: &[(&str, &str)] = &[
    ("bigincrements", "bigIncrements"),
    ("biginteger", "bigInteger"),
    ("binary", "binary"),
    ("boolean", "boolean"),
    ("char", "char"),
    ("date", "date"),
    ("datetime", "dateTime"),
    ("datetimetz", "dateTimeTz"),
    ("decimal", "decimal"),
    ("double", "double"),
    ("enum", "enum"),
    ("float", "float"),
    ("fulltext", "fullText"),
    ("geometry", "geometry"),
    ("geometrycollection", "geometryCollection"),
    ("id", "id"),
    ("increments", "increments"),
    ("integer", "integer"),
    ("ipaddress", "ipAddress"),
    ("json", "json"),
    ("jsonb", "jsonb"),
    ("linestring", "lineString"),
    ("longtext", "longText"),
    ("macaddress", "macAddress"),
    ("mediumincrements", "mediumIncrements"),
    ("mediuminteger", "mediumInteger"),
    ("mediumtext", "mediumText"),
    ("morphs", "morphs"),
    ("multilinestring", "multiLineString"),
    ("multipoint", "multiPoint"),
    ("multipolygon", "multiPolygon"),
    ("nullablemorphs", "nullableMorphs"),
    ("nullabletimestamps", "nullableTimestamps"),
    ("nullableulidmorphs", "nullableUlidMorphs"),
    ("nullableuuidmorphs", "nullableUuidMorphs"),
    ("point", "point"),
    ("polygon", "polygon"),
    ("remembertoken", "rememberToken"),
    ("set", "set"),
    ("smallincrements", "smallIncrements"),
    ("smallinteger", "smallInteger"),
    ("softdeletes", "softDeletes"),
    ("softdeletestz", "softDeletesTz"),
    ("string", "string"),
    ("text", "text"),
    ("time", "time"),
    ("timestamp", "timestamp"),
    ("timestamps", "timestamps"),
    ("timestampstz", "timestampsTz"),
    ("timestamptz", "timestampTz"),
    ("timetz", "timeTz"),
    ("tinyincrements", "tinyIncrements"),
    ("tinyinteger", "tinyInteger"),
    ("ulid", "ulid"),
    ("ulidmorphs", "ulidMorphs"),
    ("unsignedbiginteger", "unsignedBigInteger"),
    ("unsigneddecimal", "unsignedDecimal"),
    ("unsignedinteger", "unsignedInteger"),
    ("unsignedmediuminteger", "unsignedMediumInteger"),
    ("unsignedsmallinteger", "unsignedSmallInteger"),
    ("unsignedtinyinteger", "unsignedTinyInteger"),
    ("uuid", "uuid"),
    ("uuidmorphs", "uuidMorphs"),
    ("year", "year"),
];

/// Every column modifier, keyed by lowercase spelling
pub const MODIFIERS: &[(&str, &str)] = &[
    ("always", "always"),
    ("autoincrement", "autoIncrement"),
    ("charset", "charset"),
    ("collation", "collation"),
    ("comment", "comment"),
    ("default", "default"),
    ("foreign", "foreign"),
    ("index", "index"),
    ("nullable", "nullable"),
    ("ondelete", "onDelete"),
    ("onupdate", "onUpdate"),
    ("primary", "primary"),
    ("unique", "unique"),
    ("unsigned", "unsigned"),
    ("usecurrent", "useCurrent"),
    ("usecurrentonupdate", "useCurrentOnUpdate"),
];

/// Data types that make a column reference another model
pub const FOREIGN_KEY_TYPES: &[&str] = &["id", "uuid", "ulid"];

/// Data types that make a column a polymorphic reference
pub const MORPH_TYPES: &[&str] = &[
    "morphs",
    "nullableMorphs",
    "uuidMorphs",
    "nullableUuidMorphs",
    "ulidMorphs",
    "nullableUlidMorphs",
];

/// Canonical spelling of a data type keyword, if it is one
pub fn lookup_data_type(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    DATA_TYPES
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, canonical)| *canonical)
}

/// Canonical spelling of a modifier keyword, if it is one
pub fn lookup_modifier(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    MODIFIERS
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, canonical)| *canonical)
}

/// A column modifier: a bare flag or a single key/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Modifier {
    Flag(String),
    Value(String, String),
}

impl Modifier {
    pub fn name(&self) -> &str {
        match self {
            Modifier::Flag(name) | Modifier::Value(name, _) => name,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Modifier::Flag(_) => None,
            Modifier::Value(_, value) => Some(value),
        }
    }
}

/// One column of a model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    data_type: String,
    modifiers: Vec<Modifier>,
    attributes: Vec<String>,
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        data_type: &'static str,
        modifiers: Vec<Modifier>,
        attributes: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.to_string(),
            modifiers,
            attributes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Type parameters: length, precision/scale, enum options...
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m.name() == name)
    }

    pub fn modifier_value(&self, name: &str) -> Option<&str> {
        self.modifiers
            .iter()
            .find(|m| m.name() == name)
            .and_then(Modifier::value)
    }

    pub fn is_nullable(&self) -> bool {
        self.has_modifier("nullable")
    }

    /// Type `id`/`uuid`/`ulid` or an explicit `foreign` modifier, excluding the key itself
    pub fn is_foreign_key(&self) -> bool {
        self.name != "id"
            && (FOREIGN_KEY_TYPES.contains(&self.data_type.as_str()) || self.has_modifier("foreign"))
    }

    pub fn is_morph(&self) -> bool {
        MORPH_TYPES.contains(&self.data_type.as_str())
    }

    /// Table and key a foreign key column points at.
    ///
    /// `foreign:users.uuid` names both; `id:user` names the related model;
    /// otherwise the column name without `_id` is used.
    pub fn references(&self) -> (String, String) {
        if let Some(target) = self.modifier_value("foreign") {
            return match target.split_once('.') {
                Some((table, key)) => (table.to_string(), key.to_string()),
                None => (target.to_string(), "id".to_string()),
            };
        }

        let related = self
            .attributes
            .first()
            .map(String::as_str)
            .unwrap_or_else(|| self.name.strip_suffix("_id").unwrap_or(&self.name));
        let related = class_basename(related);
        (pluralize(&to_snake_case(related)), "id".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup_data_type("LongText"), Some("longText"));
        assert_eq!(lookup_data_type("unsignedbiginteger"), Some("unsignedBigInteger"));
        assert_eq!(lookup_data_type("nonsense"), None);
        assert_eq!(lookup_modifier("NULLABLE"), Some("nullable"));
        assert_eq!(lookup_modifier("onDelete"), Some("onDelete"));
    }

    #[test]
    fn test_foreign_key_shape() {
        let key = Column::new("id", "id", vec![], vec![]);
        assert!(!key.is_foreign_key());

        let author = Column::new("author_id", "id", vec![], vec![]);
        assert!(author.is_foreign_key());

        let explicit = Column::new(
            "owner",
            "string",
            vec![Modifier::Value("foreign".to_string(), "users".to_string())],
            vec![],
        );
        assert!(explicit.is_foreign_key());
        assert_eq!(explicit.modifier_value("foreign"), Some("users"));
        assert_eq!(explicit.references(), ("users".to_string(), "id".to_string()));
    }

    #[test]
    fn test_references() {
        let inferred = Column::new("author_id", "id", vec![], vec![]);
        assert_eq!(inferred.references(), ("authors".to_string(), "id".to_string()));

        let attribute = Column::new("author_id", "id", vec![], vec!["user".to_string()]);
        assert_eq!(attribute.references().0, "users");

        let keyed = Column::new(
            "owner_uuid",
            "uuid",
            vec![Modifier::Value("foreign".to_string(), "accounts.uuid".to_string())],
            vec![],
        );
        assert_eq!(keyed.references(), ("accounts".to_string(), "uuid".to_string()));
    }
}
