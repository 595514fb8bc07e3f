//! Statement lexer.
//!
//! Interprets one method body (an ordered map of command -> argument) into a
//! list of typed [`Statement`]s. Unknown commands are dropped so the draft
//! language stays permissive.

use crate::parser::{Token, TokenMap};
use crate::types::{
    DispatchStatement, EloquentStatement, EloquentVerb, FireStatement, QueryOperation,
    QueryStatement, RedirectStatement, RenderStatement, ResourceStatement, RespondStatement,
    SendStatement, SendType, SessionStatement, SessionVerb, Statement, ValidateStatement,
};
use crate::utils::split_list;
use regex::Regex;
use std::sync::OnceLock;

/// Every command the statement lexer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Query,
    Render,
    Fire,
    Dispatch,
    Find,
    Delete,
    Save,
    Update,
    Flash,
    Store,
    Send,
    Notify,
    Validate,
    Redirect,
    Respond,
    Resource,
}

impl Command {
    /// Exact keyword lookup
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "query" => Some(Self::Query),
            "render" => Some(Self::Render),
            "fire" => Some(Self::Fire),
            "dispatch" => Some(Self::Dispatch),
            "find" => Some(Self::Find),
            "delete" => Some(Self::Delete),
            "save" => Some(Self::Save),
            "update" => Some(Self::Update),
            "flash" => Some(Self::Flash),
            "store" => Some(Self::Store),
            "send" => Some(Self::Send),
            "notify" => Some(Self::Notify),
            "validate" => Some(Self::Validate),
            "redirect" => Some(Self::Redirect),
            "respond" => Some(Self::Respond),
            "resource" => Some(Self::Resource),
            _ => None,
        }
    }

    /// Wildcard families letting several statements of one kind share a method:
    /// `fire-welcome`, `dispatch-sync`, `send-review`, `notify-author`
    pub fn from_prefix(keyword: &str) -> Option<Self> {
        if keyword.starts_with("fire-") {
            Some(Self::Fire)
        } else if keyword.starts_with("dispatch-") {
            Some(Self::Dispatch)
        } else if keyword.starts_with("send-") {
            Some(Self::Send)
        } else if keyword.starts_with("notify-") {
            Some(Self::Notify)
        } else {
            None
        }
    }

    /// Exact keyword first, wildcard prefix second
    pub fn parse(keyword: &str) -> Option<Self> {
        Self::from_keyword(keyword).or_else(|| Self::from_prefix(keyword))
    }
}

fn all_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^all:(\S+)$").expect("valid all pattern"))
}

fn aggregate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b(count|exists)\b").expect("valid aggregate pattern"))
}

fn to_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+to:(\S+)").expect("valid to pattern"))
}

fn view_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+view:(\S+)").expect("valid view pattern"))
}

/// Argument text of a command: scalars as-is, lists joined with `, `
fn statement_text(value: &Token) -> Option<String> {
    match value {
        Token::Scalar(_) | Token::Bool(_) => value.as_str().map(str::to_string),
        Token::List(items) => Some(
            items
                .iter()
                .filter_map(Token::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Token::Null | Token::Map(_) => None,
    }
}

/// Split `"<subject> <remainder>"` on the first run of whitespace
fn split_subject(statement: &str) -> (String, Option<String>) {
    let trimmed = statement.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((subject, rest)) => (subject.to_string(), Some(rest.trim_start().to_string())),
        None => (trimmed.to_string(), None),
    }
}

/// Parse the shared `"<subject> [with:a, b]"` grammar
pub fn parse_with_statement(statement: &str) -> (String, Vec<String>) {
    let (subject, remainder) = split_subject(statement);
    let data = remainder
        .as_deref()
        .and_then(|rest| rest.strip_prefix("with:"))
        .map(split_list)
        .unwrap_or_default();
    (subject, data)
}

/// Stateless interpreter for method bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementLexer;

impl StatementLexer {
    pub fn new() -> Self {
        Self
    }

    /// Interpret every command of a method body, in declaration order
    pub fn analyze(&self, tokens: &TokenMap) -> Vec<Statement> {
        tokens
            .iter()
            .filter_map(|(command, value)| {
                let statement = self.analyze_command(command, value);
                if statement.is_none() {
                    tracing::debug!(command = %command, "dropping unrecognized statement");
                }
                statement
            })
            .collect()
    }

    /// Interpret a single command; `None` for unknown commands or empty arguments
    pub fn analyze_command(&self, command: &str, value: &Token) -> Option<Statement> {
        let kind = Command::parse(command)?;
        let statement = statement_text(value)?;

        match kind {
            Command::Query => Some(analyze_query(&statement)),
            Command::Render => {
                let (view, data) = parse_with_statement(&statement);
                Some(Statement::Render(RenderStatement { view, data }))
            }
            Command::Fire => {
                let (event, data) = parse_with_statement(&statement);
                Some(Statement::Fire(FireStatement { event, data }))
            }
            Command::Dispatch => {
                let (job, data) = parse_with_statement(&statement);
                Some(Statement::Dispatch(DispatchStatement { job, data }))
            }
            Command::Find | Command::Delete | Command::Save => {
                let verb = match kind {
                    Command::Find => EloquentVerb::Find,
                    Command::Delete => EloquentVerb::Delete,
                    _ => EloquentVerb::Save,
                };
                Some(Statement::Eloquent(EloquentStatement {
                    verb,
                    reference: Some(statement.trim().to_string()),
                    columns: Vec::new(),
                }))
            }
            Command::Update => Some(analyze_update(&statement)),
            Command::Flash | Command::Store => {
                let verb = if kind == Command::Flash {
                    SessionVerb::Flash
                } else {
                    SessionVerb::Store
                };
                Some(Statement::Session(SessionStatement {
                    verb,
                    reference: statement.trim().to_string(),
                }))
            }
            Command::Send => Some(analyze_mail(&statement)),
            Command::Notify => analyze_notification(&statement),
            Command::Validate => Some(Statement::Validate(ValidateStatement {
                fields: split_list(&statement),
            })),
            Command::Redirect => {
                let (route, data) = parse_with_statement(&statement);
                Some(Statement::Redirect(RedirectStatement { route, data }))
            }
            Command::Respond => Some(Statement::Respond(RespondStatement {
                content: statement.trim().to_string(),
            })),
            Command::Resource => Some(analyze_resource(&statement)),
        }
    }
}

fn tokens(statement: &str) -> Vec<String> {
    statement.split_whitespace().map(str::to_string).collect()
}

fn analyze_query(statement: &str) -> Statement {
    let statement = statement.trim();

    let query = if statement == "all" {
        QueryStatement::new(QueryOperation::All, Vec::new())
    } else if let Some(caps) = all_pattern().captures(statement) {
        QueryStatement::new(QueryOperation::All, vec![caps[1].to_string()])
    } else if statement.contains("pluck:") {
        QueryStatement::new(QueryOperation::Pluck, tokens(statement))
    } else if let Some(caps) = aggregate_pattern().captures(statement) {
        let keyword = &caps[1];
        let operation = if keyword == "count" {
            QueryOperation::Count
        } else {
            QueryOperation::Exists
        };
        let clauses = statement
            .split_whitespace()
            .filter(|token| *token != keyword)
            .map(str::to_string)
            .collect();
        QueryStatement::new(operation, clauses)
    } else {
        QueryStatement::new(QueryOperation::Get, tokens(statement))
    };

    Statement::Query(query)
}

fn analyze_update(statement: &str) -> Statement {
    let eloquent = if statement.contains(',') {
        EloquentStatement {
            verb: EloquentVerb::Update,
            reference: None,
            columns: split_list(statement),
        }
    } else {
        EloquentStatement {
            verb: EloquentVerb::Update,
            reference: Some(statement.trim().to_string()),
            columns: Vec::new(),
        }
    };
    Statement::Eloquent(eloquent)
}

fn analyze_mail(statement: &str) -> Statement {
    let mut statement = statement.to_string();

    let to = to_pattern().captures(&statement).map(|caps| {
        (caps[0].to_string(), caps[1].to_string())
    });
    let to = to.map(|(matched, value)| {
        statement = statement.replacen(&matched, "", 1);
        value
    });

    let view = view_pattern().captures(&statement).map(|caps| {
        (caps[0].to_string(), caps[1].to_string())
    });
    let view = view.map(|(matched, value)| {
        statement = statement.replacen(&matched, "", 1);
        value
    });

    let (target, data) = parse_with_statement(&statement);
    let send_type = if target.ends_with("Notification") {
        SendType::NotificationWithFacade
    } else {
        SendType::Mail
    };

    Statement::Send(SendStatement {
        target,
        to,
        data,
        send_type,
        view,
    })
}

fn analyze_notification(statement: &str) -> Option<Statement> {
    let (to, remainder) = split_subject(statement);
    let remainder = remainder?;
    let (target, data) = parse_with_statement(&remainder);
    if to.is_empty() || target.is_empty() {
        return None;
    }

    Some(Statement::Send(SendStatement {
        target,
        to: Some(to),
        data,
        send_type: SendType::NotificationWithModel,
        view: None,
    }))
}

fn analyze_resource(statement: &str) -> Statement {
    let statement = statement.trim();
    let (collection, reference) = match statement.split_once(':') {
        Some((kind, reference)) => (Some(kind), reference),
        None => (None, statement),
    };

    Statement::Resource(ResourceStatement {
        reference: reference.to_string(),
        is_collection: collection.is_some(),
        is_paginated: collection == Some("paginate"),
    })
}
