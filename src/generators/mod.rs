//! Generators turning a [`Tree`] into application files.
//!
//! Every generator renders through named stubs and reports what it did in a
//! [`Ledger`]. Targets that already exist are skipped, never overwritten;
//! migrations (with `overwrite_migrations`) and route files are the only
//! artifacts that update existing content.

pub mod component;
pub mod controller;
pub mod event;
pub mod factory;
pub mod faker;
pub mod form_request;
pub mod job;
pub mod mail;
pub mod migration;
pub mod model;
pub mod notification;
pub mod php;
pub mod policy;
pub mod resource;
pub mod route;
pub mod rules;
pub mod seeder;
pub mod statements;
pub mod view;

use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::ledger::{Action, Ledger};
use crate::tree::Tree;
use crate::types::Statement;
use crate::utils::to_camel_case;
use chrono::NaiveDateTime;

pub use component::ComponentGenerator;
pub use controller::ControllerGenerator;
pub use event::EventGenerator;
pub use factory::FactoryGenerator;
pub use form_request::FormRequestGenerator;
pub use job::JobGenerator;
pub use mail::MailGenerator;
pub use migration::MigrationGenerator;
pub use model::ModelGenerator;
pub use notification::NotificationGenerator;
pub use policy::PolicyGenerator;
pub use resource::ResourceGenerator;
pub use route::RouteGenerator;
pub use seeder::SeederGenerator;
pub use test::TestGenerator;
pub use view::ViewGenerator;

/// Per-run options shared by every generator
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Rewrite migrations whose table already has one
    pub overwrite_migrations: bool,
    /// Timestamp of the first new migration; later ones count up by a second
    pub timestamp: NaiveDateTime,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            overwrite_migrations: false,
            timestamp: chrono::Utc::now().naive_utc(),
        }
    }
}

/// One kind of generated artifact
pub trait Generator {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Categories matched against the `only`/`skip` filters
    fn types(&self) -> &'static [&'static str];

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, options: &GenerateOptions) -> Result<Ledger>;
}

/// The default generators, in the order they run
pub fn default_generators() -> Vec<Box<dyn Generator>> {
    vec![
        Box::new(MigrationGenerator),
        Box::new(ModelGenerator),
        Box::new(FactoryGenerator),
        Box::new(SeederGenerator),
        Box::new(ControllerGenerator),
        Box::new(FormRequestGenerator),
        Box::new(EventGenerator),
        Box::new(JobGenerator),
        Box::new(MailGenerator),
        Box::new(NotificationGenerator),
        Box::new(ViewGenerator),
        Box::new(ResourceGenerator),
        Box::new(PolicyGenerator),
        Box::new(ComponentGenerator),
        Box::new(RouteGenerator),
        Box::new(TestGenerator),
    ]
}

/// Whether a generator with these types runs under the `only`/`skip` filters.
///
/// A non-empty `only` wins: the generator runs when it shares a type with it.
/// Otherwise the generator runs unless `skip` covers every one of its types.
pub fn should_generate(types: &[&str], only: &[String], skip: &[String]) -> bool {
    if !only.is_empty() {
        return types.iter().any(|t| only.iter().any(|o| o == t));
    }
    if !skip.is_empty() {
        return types.iter().any(|t| !skip.iter().any(|s| s == t));
    }
    true
}

/// Every statement of every controller and component method, in draft order
pub(crate) fn all_statements(tree: &Tree) -> impl Iterator<Item = &Statement> {
    let controllers = tree.controllers().values().flat_map(|c| c.methods().values());
    let components = tree.components().values().flat_map(|c| c.methods().values());
    controllers.chain(components).flatten()
}

/// Promoted constructor properties for a data list: `public Post $post, public $total`
pub(crate) fn constructor_properties(data: &[String], tree: &Tree, imports: &mut php::Imports) -> String {
    data.iter()
        .map(|datum| {
            let name = datum.split('.').next().unwrap_or(datum);
            let variable = to_camel_case(name);
            match tree.model_for_context(name) {
                Some(model) if !datum.contains('.') => {
                    imports.add(model.fully_qualified_class_name(tree.config()));
                    format!("public {} ${}", model.name(), variable)
                }
                _ => format!("public ${}", variable),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write a new file, or record it as skipped when it already exists
pub(crate) fn write_new(
    fs: &mut dyn Filesystem,
    ledger: &mut Ledger,
    path: &str,
    contents: &str,
) -> Result<()> {
    if fs.exists(path) {
        ledger.record(Action::Skipped, path);
        return Ok(());
    }
    fs.put(path, contents)?;
    ledger.record(Action::Created, path);
    Ok(())
}
