//! Draft parser.
//!
//! Turns draft text into a [`TokenMap`]: an ordered, loosely typed tree of
//! mappings, lists and scalars. No validation happens here beyond expanding
//! the shorthand keyword lines that the YAML decoder would otherwise reject
//! (or read as plain scalars).

use crate::error::{BlueprintError, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Ordered mapping of keys to tokens
pub type TokenMap = IndexMap<String, Token>;

/// A node of the parsed draft
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Token {
    Null,
    Bool(bool),
    Scalar(String),
    List(Vec<Token>),
    Map(TokenMap),
}

impl Token {
    /// Scalar text; booleans render as `true`/`false`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Token::Scalar(s) => Some(s),
            Token::Bool(true) => Some("true"),
            Token::Bool(false) => Some("false"),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&TokenMap> {
        match self {
            Token::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Token]> {
        match self {
            Token::List(items) => Some(items),
            _ => None,
        }
    }

    /// True only for a literal YAML `false`
    pub fn is_false(&self) -> bool {
        matches!(self, Token::Bool(false))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Token::Bool(true))
    }

    /// Text of a scalar, or an empty string for anything else
    pub fn text(&self) -> String {
        self.as_str().unwrap_or_default().to_string()
    }
}

impl From<serde_yaml::Value> for Token {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Token::Null,
            serde_yaml::Value::Bool(b) => Token::Bool(b),
            serde_yaml::Value::Number(n) => Token::Scalar(n.to_string()),
            serde_yaml::Value::String(s) => Token::Scalar(s),
            serde_yaml::Value::Sequence(items) => {
                Token::List(items.into_iter().map(Token::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => Token::Map(mapping_to_tokens(mapping)),
            serde_yaml::Value::Tagged(tagged) => Token::from(tagged.value),
        }
    }
}

fn mapping_to_tokens(mapping: serde_yaml::Mapping) -> TokenMap {
    mapping
        .into_iter()
        .map(|(key, value)| (key_text(key), Token::from(value)))
        .collect()
}

fn key_text(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn keyword_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?mi)^([ \t]+)(id|timestamps(?:tz)?|softdeletes(?:tz)?)[ \t]*(\r?)$")
            .expect("valid keyword pattern")
    })
}

fn resource_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?mi)^([ \t]+)resource[ \t]*(\r?)$").expect("valid resource pattern")
    })
}

fn uuid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?mi)^([ \t]+)uuid[ \t]*(\r?)$").expect("valid uuid pattern")
    })
}

/// Rewrite bare keyword lines (`  id`, `  softDeletes`, ...) into key/value pairs.
///
/// The key is lowercased and the value keeps the author's casing. Lines that
/// already carry a value are left untouched, so the transform is idempotent.
pub fn expand_shorthands(content: &str) -> String {
    let content = keyword_pattern().replace_all(content, |caps: &regex::Captures| {
        format!(
            "{}{}: {}{}",
            &caps[1],
            caps[2].to_lowercase(),
            &caps[2],
            &caps[3]
        )
    });
    let content = resource_pattern().replace_all(&content, "${1}resource: web${2}");
    uuid_pattern()
        .replace_all(&content, "${1}id: uuid primary${2}")
        .into_owned()
}

/// Parse draft text into a token tree.
///
/// An empty document, or one whose top level is not a mapping, yields an
/// empty tree.
pub fn parse(content: &str) -> Result<TokenMap> {
    let expanded = expand_shorthands(content);
    let value: serde_yaml::Value = serde_yaml::from_str(&expanded)?;

    match Token::from(value) {
        Token::Map(map) => Ok(map),
        Token::Null => Ok(TokenMap::new()),
        _ => {
            tracing::warn!("draft top level is not a mapping; treating it as empty");
            Ok(TokenMap::new())
        }
    }
}

/// Serialize a token tree back to draft text
pub fn dump(tokens: &TokenMap) -> Result<String> {
    serde_yaml::to_string(tokens).map_err(BlueprintError::Dump)
}

/// Fetch a section as a map, treating anything else as empty
pub fn section<'a>(tokens: &'a TokenMap, name: &str) -> Option<&'a TokenMap> {
    tokens.get(name).and_then(Token::as_map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id_matches_explicit() {
        let bare = parse("models:\n  Post:\n    id\n    title: string\n").unwrap();
        let explicit = parse("models:\n  Post:\n    id: id\n    title: string\n").unwrap();
        assert_eq!(bare, explicit);
    }

    #[test]
    fn test_shorthand_keeps_casing_in_value() {
        let expanded = expand_shorthands("  softDeletes\n  timestampsTz\n");
        assert_eq!(expanded, "  softdeletes: softDeletes\n  timestampstz: timestampsTz\n");
    }

    #[test]
    fn test_shorthand_is_idempotent() {
        let once = expand_shorthands("models:\n  Post:\n    id\n    timestamps\n");
        let twice = expand_shorthands(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_shorthand_ignores_explicit_values_and_top_level() {
        let content = "id\n  id: uuid\n  timestamps: false\n";
        assert_eq!(expand_shorthands(content), content);
    }

    #[test]
    fn test_resource_and_uuid_shorthands() {
        let expanded = expand_shorthands("  resource\n  uuid\n");
        assert_eq!(expanded, "  resource: web\n  id: uuid primary\n");
    }

    #[test]
    fn test_scalars_and_booleans() {
        let tokens = parse("models:\n  Post:\n    id: false\n    views: 5\n").unwrap();
        let post = section(&tokens, "models").unwrap()["Post"].as_map().unwrap();
        assert!(post["id"].is_false());
        assert_eq!(post["views"], Token::Scalar("5".to_string()));
    }

    #[test]
    fn test_preserves_declaration_order() {
        let tokens = parse("models:\n  Post:\n    zeta: string\n    alpha: string\n").unwrap();
        let post = section(&tokens, "models").unwrap()["Post"].as_map().unwrap();
        let keys: Vec<&str> = post.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_empty_and_scalar_documents() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("just a string").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = parse("models:\n  Post: [unclosed\n").unwrap_err();
        assert!(matches!(err, BlueprintError::Parse(_)));
    }

    #[test]
    fn test_dump_round_trip() {
        let tokens = parse("models:\n  Post:\n    title: string:400\n    id: false\n").unwrap();
        let text = dump(&tokens).unwrap();
        assert_eq!(parse(&text).unwrap(), tokens);
    }
}
