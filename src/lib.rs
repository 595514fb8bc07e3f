//! # Blueprint: Draft-Driven Application Scaffolding
//!
//! Blueprint reads a YAML draft describing models, controllers and components
//! and generates the matching application source: migrations, model classes,
//! factories, seeders, controllers, form requests, events, jobs, mailables,
//! notifications, views, resources, policies, routes and HTTP tests.
//!
//! ## Features
//!
//! - **Shorthand-aware parser**: bare `id`, `timestamps`, `softDeletes`, `resource` and `uuid` lines expand before decoding
//! - **Lexers**: models, controllers, components, seeders and config each lex into a shared registry
//! - **Context resolution**: `post`, `posts` or `Post` resolve to one model, never a guess
//! - **Generators**: one per artifact, filtered by `--only`/`--skip`, idempotent across runs
//! - **Ledger**: every build records what it created so `erase` can undo it
//!
//! ## Example draft
//!
//! ```yaml
//! models:
//!   Post:
//!     title: string:400
//!     content: longtext
//!     published_at: nullable timestamp
//!     author_id: id:user
//!
//! controllers:
//!   Post:
//!     index:
//!       query: all
//!       render: post.index with:posts
//!     store:
//!       validate: title, content, author_id
//!       save: post
//!       send: ReviewPost to:post.author with:post
//!       redirect: posts.index
//! ```
//!
//! ## Example build
//!
//! ```no_run
//! use blueprint::{Blueprint, Config, DiskFilesystem, GenerateOptions};
//!
//! let blueprint = Blueprint::new(Config::default());
//! let mut fs = DiskFilesystem::new(".");
//! let ledger = blueprint.execute(&mut fs, "draft.yaml", &[], &[], &GenerateOptions::default())?;
//! for path in &ledger.created {
//!     println!("created {}", path);
//! }
//! # Ok::<(), blueprint::BlueprintError>(())
//! ```

// Pipeline
pub mod builder;
pub mod parser;
pub mod lexer;
pub mod tree;
pub mod types;

// Output
pub mod generators;
pub mod ledger;
pub mod stubs;

// Collaborators
pub mod config;
pub mod error;
pub mod filesystem;
pub mod utils;

pub use builder::Blueprint;
pub use config::Config;
pub use error::{BlueprintError, Result};
pub use filesystem::{DiskFilesystem, Filesystem, MemoryFilesystem};
pub use generators::{GenerateOptions, Generator};
pub use ledger::{Action, BuildCache, Ledger};
pub use lexer::{Lexer, Registry};
pub use parser::{Token, TokenMap};
pub use tree::Tree;
pub use types::{Column, Component, Controller, Model, Policy, Statement};
