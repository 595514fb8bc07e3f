//! Route declarations appended to `routes/web.php` and `routes/api.php`.
//!
//! Route files are shared with hand-written routes, so existing content is
//! kept and only lines not already present are appended.

use crate::config::Config;
use crate::error::Result;
use crate::filesystem::Filesystem;
use crate::generators::{GenerateOptions, Generator};
use crate::ledger::{Action, Ledger};
use crate::tree::Tree;
use crate::types::controller::RESOURCE_METHODS;
use crate::types::Controller;
use crate::utils::{pluralize, to_kebab_case};
use indexmap::IndexMap;

const ROUTES_HEADER: &str = "<?php\n\nuse Illuminate\\Support\\Facades\\Route;\n\n";

const API_RESOURCE_METHODS: &[&str] = &["index", "store", "show", "update", "destroy"];

pub struct RouteGenerator;

impl Generator for RouteGenerator {
    fn name(&self) -> &'static str {
        "route"
    }

    fn types(&self) -> &'static [&'static str] {
        &["routes"]
    }

    fn output(&self, tree: &Tree, fs: &mut dyn Filesystem, _options: &GenerateOptions) -> Result<Ledger> {
        let mut ledger = Ledger::new();
        let mut files: IndexMap<&'static str, Vec<String>> = IndexMap::new();

        for controller in tree.controllers().values() {
            let file = if controller.is_api_resource() { "routes/api.php" } else { "routes/web.php" };
            files
                .entry(file)
                .or_default()
                .extend(route_lines(controller, tree.config()));
        }

        for (path, lines) in files {
            if lines.is_empty() {
                continue;
            }
            write_routes(fs, &mut ledger, path, &lines)?;
        }

        Ok(ledger)
    }
}

/// Append the missing lines, creating the file with its header when absent
fn write_routes(fs: &mut dyn Filesystem, ledger: &mut Ledger, path: &str, lines: &[String]) -> Result<()> {
    if !fs.exists(path) {
        let mut contents = ROUTES_HEADER.to_string();
        for line in lines {
            contents.push_str(line);
            contents.push('\n');
        }
        fs.put(path, &contents)?;
        ledger.record(Action::Created, path);
        return Ok(());
    }

    let existing = fs.get(path)?;
    let mut missing: Vec<&String> = Vec::new();
    for line in lines {
        if !existing.contains(line.as_str()) && !missing.contains(&line) {
            missing.push(line);
        }
    }
    if missing.is_empty() {
        tracing::debug!(path, "routes already present");
        ledger.record(Action::Skipped, path);
        return Ok(());
    }

    let mut block = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') {
        block.push('\n');
    }
    block.push('\n');
    for line in missing {
        block.push_str(line);
        block.push('\n');
    }
    fs.append(path, &block)?;
    ledger.record(Action::Updated, path);
    Ok(())
}

/// Route declarations for one controller: custom methods first so they are
/// matched before the resource's wildcard routes
pub fn route_lines(controller: &Controller, config: &Config) -> Vec<String> {
    let class = format!(
        "{}{}::class",
        if config.generate_fqcn_route { "\\" } else { "" },
        controller.fully_qualified_class_name(config)
    );
    let slug = route_slug(controller, config);

    if controller.is_invokable() {
        return vec![format!("Route::get('{}', {});", slug, class)];
    }

    let mut lines = Vec::new();
    let name_prefix = to_kebab_case(&controller.prefix());

    for method in controller.methods().keys() {
        if RESOURCE_METHODS.contains(&method.as_str()) {
            continue;
        }
        lines.push(format!(
            "Route::get('{}/{}', [{}, '{}'])->name('{}.{}');",
            slug,
            to_kebab_case(method),
            class,
            method,
            name_prefix,
            method
        ));
    }

    let (declaration, complete) = if controller.is_api_resource() {
        ("apiResource", API_RESOURCE_METHODS)
    } else {
        ("resource", RESOURCE_METHODS)
    };
    let present: Vec<&str> = RESOURCE_METHODS
        .iter()
        .copied()
        .filter(|m| controller.methods().contains_key(*m))
        .collect();

    if !present.is_empty() {
        let name = match controller.parent() {
            Some(parent) => format!("{}.{}", resource_segment(parent, config), slug),
            None => slug.clone(),
        };
        let mut line = format!("Route::{}('{}', {})", declaration, name, class);
        if present.len() != complete.len() || !complete.iter().all(|m| present.contains(m)) {
            let only: Vec<String> = present.iter().map(|m| format!("'{}'", m)).collect();
            line.push_str(&format!("->only([{}])", only.join(", ")));
        }
        line.push(';');
        lines.push(line);
    }

    lines
}

/// `posts`, or `post` with `singular_routes`
fn route_slug(controller: &Controller, config: &Config) -> String {
    if controller.is_invokable() {
        return to_kebab_case(&controller.name());
    }
    resource_segment(&controller.prefix(), config)
}

fn resource_segment(name: &str, config: &Config) -> String {
    if config.singular_routes {
        to_kebab_case(name)
    } else {
        to_kebab_case(&pluralize(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFilesystem;
    use crate::lexer::{ControllerLexer, Lexer, StatementLexer};
    use crate::parser;

    fn tree_with(draft: &str, config: Config) -> Tree {
        let tokens = parser::parse(draft).unwrap();
        let registry = ControllerLexer::new(StatementLexer::new()).analyze(&tokens);
        Tree::new(registry, config)
    }

    fn tree(draft: &str) -> Tree {
        tree_with(draft, Config::default())
    }

    #[test]
    fn test_resource_and_custom_routes() {
        let tree = tree("controllers:\n  Post:\n    resource: web\n    publish:\n      redirect: posts.index\n");
        let lines = route_lines(&tree.controllers()["Post"], tree.config());
        assert_eq!(
            lines,
            vec![
                "Route::get('posts/publish', [App\\Http\\Controllers\\PostController::class, 'publish'])->name('post.publish');",
                "Route::resource('posts', App\\Http\\Controllers\\PostController::class);",
            ]
        );
    }

    #[test]
    fn test_partial_and_api_resources() {
        let tree = tree("controllers:\n  BlogPost:\n    index:\n      render: blog.index\n    show:\n      render: blog.show\n  Api/Comment:\n    resource: api\n");
        assert_eq!(
            route_lines(&tree.controllers()["BlogPost"], tree.config()),
            vec!["Route::resource('blog-posts', App\\Http\\Controllers\\BlogPostController::class)->only(['index', 'show']);"]
        );
        assert_eq!(
            route_lines(&tree.controllers()["Api/Comment"], tree.config()),
            vec!["Route::apiResource('comments', App\\Http\\Controllers\\Api\\CommentController::class);"]
        );
    }

    #[test]
    fn test_invokable_parent_and_options() {
        let config = Config {
            generate_fqcn_route: true,
            singular_routes: true,
            ..Config::default()
        };
        let tree = tree_with(
            "controllers:\n  Report:\n    invokable: true\n  Comment:\n    index:\n      render: comment.index\n    meta:\n      parent: post\n",
            config,
        );
        assert_eq!(
            route_lines(&tree.controllers()["Report"], tree.config()),
            vec!["Route::get('report', \\App\\Http\\Controllers\\ReportController::class);"]
        );
        assert_eq!(
            route_lines(&tree.controllers()["Comment"], tree.config()),
            vec!["Route::resource('post.comment', \\App\\Http\\Controllers\\CommentController::class)->only(['index']);"]
        );
    }

    #[test]
    fn test_creates_then_appends_only_missing_lines() {
        let tree = tree("controllers:\n  Post:\n    resource: web\n  Api/Comment:\n    resource: api\n");
        let mut fs = MemoryFilesystem::new();

        let ledger = RouteGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(ledger.created, vec!["routes/web.php", "routes/api.php"]);
        assert_eq!(
            fs.get("routes/web.php").unwrap(),
            "<?php\n\nuse Illuminate\\Support\\Facades\\Route;\n\nRoute::resource('posts', App\\Http\\Controllers\\PostController::class);\n"
        );

        let ledger = RouteGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(ledger.skipped, vec!["routes/web.php", "routes/api.php"]);

        let mut fs = MemoryFilesystem::new().with_file("routes/web.php", "<?php\n\nRoute::get('/', fn () => 'ok');");
        let ledger = RouteGenerator.output(&tree, &mut fs, &GenerateOptions::default()).unwrap();
        assert_eq!(ledger.updated, vec!["routes/web.php"]);
        assert_eq!(
            fs.get("routes/web.php").unwrap(),
            "<?php\n\nRoute::get('/', fn () => 'ok');\n\nRoute::resource('posts', App\\Http\\Controllers\\PostController::class);\n"
        );
    }
}
