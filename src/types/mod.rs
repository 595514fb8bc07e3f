//! Intermediate representation produced by the lexers.
//!
//! These values are built once per draft and are read-only afterwards; every
//! generator consumes them through the [`Tree`](crate::tree::Tree).

pub mod column;
pub mod component;
pub mod controller;
pub mod model;
pub mod policy;
pub mod statement;

pub use column::{Column, Modifier};
pub use component::Component;
pub use controller::Controller;
pub use model::{Index, Model, Relationship, RelationshipKind};
pub use policy::Policy;
pub use statement::{
    DispatchStatement, EloquentStatement, EloquentVerb, FireStatement, QueryOperation,
    QueryStatement, RedirectStatement, RenderStatement, ResourceStatement, RespondStatement,
    SendStatement, SendType, SessionStatement, SessionVerb, Statement, ValidateStatement,
};
