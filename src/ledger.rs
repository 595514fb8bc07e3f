//! Build ledger: which files a run created, updated, deleted or skipped.
//!
//! The ledger is persisted together with a snapshot of the draft's model
//! tokens so later runs (and `erase`) know what earlier runs produced.

use crate::error::Result;
use crate::parser::{self, Token, TokenMap};
use serde::{Deserialize, Serialize};

/// What a generator did to a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Updated,
    Deleted,
    Skipped,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Created => "created",
            Action::Updated => "updated",
            Action::Deleted => "deleted",
            Action::Skipped => "skipped",
        }
    }
}

/// Paths grouped by action, in the order they were recorded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub created: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updated: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: Action, path: impl Into<String>) {
        let path = path.into();
        tracing::debug!(action = action.as_str(), path = %path, "recorded");
        self.paths_mut(action).push(path);
    }

    pub fn paths(&self, action: Action) -> &[String] {
        match action {
            Action::Created => &self.created,
            Action::Updated => &self.updated,
            Action::Deleted => &self.deleted,
            Action::Skipped => &self.skipped,
        }
    }

    fn paths_mut(&mut self, action: Action) -> &mut Vec<String> {
        match action {
            Action::Created => &mut self.created,
            Action::Updated => &mut self.updated,
            Action::Deleted => &mut self.deleted,
            Action::Skipped => &mut self.skipped,
        }
    }

    /// Append another ledger's paths after this one's
    pub fn merge(mut self, other: Ledger) -> Ledger {
        self.created.extend(other.created);
        self.updated.extend(other.updated);
        self.deleted.extend(other.deleted);
        self.skipped.extend(other.skipped);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
            && self.updated.is_empty()
            && self.deleted.is_empty()
            && self.skipped.is_empty()
    }

    /// Non-empty actions with their paths, in display order
    pub fn entries(&self) -> impl Iterator<Item = (Action, &[String])> {
        [Action::Created, Action::Updated, Action::Deleted, Action::Skipped]
            .into_iter()
            .map(move |action| (action, self.paths(action)))
            .filter(|(_, paths)| !paths.is_empty())
    }
}

/// Persisted state of the last build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildCache {
    pub ledger: Ledger,
    /// Model token maps in draft shape, keyed by model name
    pub models: TokenMap,
}

impl BuildCache {
    /// Read a persisted cache; unknown keys are ignored and missing ones default to empty
    pub fn parse(content: &str) -> Result<Self> {
        let tokens = parser::parse(content)?;

        let paths = |key: &str| -> Vec<String> {
            tokens
                .get(key)
                .and_then(Token::as_list)
                .map(|items| items.iter().filter_map(Token::as_str).map(str::to_string).collect())
                .unwrap_or_default()
        };

        Ok(Self {
            ledger: Ledger {
                created: paths("created"),
                updated: paths("updated"),
                deleted: paths("deleted"),
                skipped: paths("skipped"),
            },
            models: parser::section(&tokens, "models").cloned().unwrap_or_default(),
        })
    }

    /// Serialize in the draft format
    pub fn dump(&self) -> Result<String> {
        let mut tokens = TokenMap::new();
        for (action, paths) in self.ledger.entries() {
            tokens.insert(
                action.as_str().to_string(),
                Token::List(paths.iter().cloned().map(Token::Scalar).collect()),
            );
        }
        if !self.models.is_empty() {
            tokens.insert("models".to_string(), Token::Map(self.models.clone()));
        }
        if tokens.is_empty() {
            return Ok(String::new());
        }
        parser::dump(&tokens)
    }
}
