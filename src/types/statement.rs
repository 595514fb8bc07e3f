//! Typed statements making up a controller or component method body.

use crate::utils::{to_camel_case, to_snake_case};
use serde::Serialize;

/// One action inside a controller/component method
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Query(QueryStatement),
    Render(RenderStatement),
    Fire(FireStatement),
    Dispatch(DispatchStatement),
    Send(SendStatement),
    Validate(ValidateStatement),
    Redirect(RedirectStatement),
    Respond(RespondStatement),
    Resource(ResourceStatement),
    Eloquent(EloquentStatement),
    Session(SessionStatement),
}

/// Query operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryOperation {
    All,
    Get,
    Pluck,
    Count,
    Exists,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryStatement {
    pub operation: QueryOperation,
    /// For `all` the optional table/model hint; otherwise `where:`, `order:`,
    /// `limit:`, `pluck:` clauses
    pub clauses: Vec<String>,
}

impl QueryStatement {
    pub fn new(operation: QueryOperation, clauses: Vec<String>) -> Self {
        Self { operation, clauses }
    }

    /// Context the query targets when the statement names one.
    ///
    /// `all:posts` names `posts`; `where:post.title` names `post`.
    pub fn model(&self) -> Option<&str> {
        if self.operation == QueryOperation::All {
            return self.clauses.first().map(String::as_str);
        }
        self.clauses.iter().find_map(|clause| {
            let (_, value) = clause.split_once(':')?;
            value.split_once('.').map(|(context, _)| context)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderStatement {
    pub view: String,
    pub data: Vec<String>,
}

impl RenderStatement {
    /// View path on disk, relative to the views directory: `post/index`
    pub fn view_path(&self) -> String {
        self.view.replace('.', "/")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FireStatement {
    pub event: String,
    pub data: Vec<String>,
}

impl FireStatement {
    /// String events (`user.created`) are fired by name and need no class
    pub fn is_named_event(&self) -> bool {
        self.event.to_lowercase() == self.event
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchStatement {
    pub job: String,
    pub data: Vec<String>,
}

/// How a `send`/`notify` statement is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendType {
    Mail,
    NotificationWithFacade,
    NotificationWithModel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendStatement {
    /// Mailable or notification class
    pub target: String,
    /// Recipient reference: `post.author`
    pub to: Option<String>,
    pub data: Vec<String>,
    pub send_type: SendType,
    /// Custom view for the mailable
    pub view: Option<String>,
}

impl SendStatement {
    pub fn is_notification(&self) -> bool {
        self.send_type != SendType::Mail
    }

    /// View backing a mailable, defaulting to `emails.<snake-name>`
    pub fn view(&self) -> String {
        self.view
            .clone()
            .unwrap_or_else(|| format!("emails.{}", to_snake_case(&self.target).replace('_', "-")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidateStatement {
    /// `column` or `context.column`, or a bare context naming a whole model
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedirectStatement {
    pub route: String,
    pub data: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RespondStatement {
    /// Status code (`204`) or an expression to return (`post`)
    pub content: String,
}

impl RespondStatement {
    pub fn status(&self) -> Option<u16> {
        self.content.trim().parse().ok()
    }

    pub fn is_status(&self) -> bool {
        self.status().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceStatement {
    pub reference: String,
    pub is_collection: bool,
    pub is_paginated: bool,
}

impl ResourceStatement {
    /// Resource class name: `PostResource` or `PostCollection`
    pub fn name(&self, model: &str) -> String {
        if self.is_collection {
            format!("{}Collection", model)
        } else {
            format!("{}Resource", model)
        }
    }
}

/// Persistence verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EloquentVerb {
    Save,
    Delete,
    Find,
    Update,
}

impl EloquentVerb {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "save" => Some(Self::Save),
            "delete" => Some(Self::Delete),
            "find" => Some(Self::Find),
            "update" => Some(Self::Update),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EloquentStatement {
    pub verb: EloquentVerb,
    /// Model variable or `context.column` reference
    pub reference: Option<String>,
    /// Explicit column list for `update: a, b`
    pub columns: Vec<String>,
}

impl EloquentStatement {
    /// Context the statement acts upon: `post.id` -> `post`
    pub fn context(&self) -> Option<String> {
        self.reference.as_ref().map(|reference| {
            let context = reference.split('.').next().unwrap_or(reference);
            to_camel_case(context)
        })
    }
}

/// Session verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionVerb {
    Flash,
    Store,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatement {
    pub verb: SessionVerb,
    /// Reference stored in the session: `post.title`
    pub reference: String,
}
