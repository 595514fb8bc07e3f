//! Controller lexer.
//!
//! Expands `resource`, `invokable` and `meta` shorthands into plain method
//! bodies, then hands every method body to the [`StatementLexer`].

use crate::lexer::{Lexer, Registry, StatementLexer};
use crate::parser::{section, Token, TokenMap};
use crate::types::{Controller, Policy};
use crate::utils::{pluralize, split_list, to_camel_case};

const WEB_METHODS: &[&str] = &["index", "create", "store", "show", "edit", "update", "destroy"];
const API_METHODS: &[&str] = &["api.index", "api.store", "api.show", "api.update", "api.destroy"];

/// Preset bodies for resource methods; `[singular]`/`[plural]` name the model
const RESOURCE_TOKENS: &[(&str, &[(&str, &str)])] = &[
    ("index", &[("query", "all:[plural]"), ("render", "[singular].index with:[plural]")]),
    ("create", &[("render", "[singular].create")]),
    (
        "store",
        &[
            ("validate", "[singular]"),
            ("save", "[singular]"),
            ("flash", "[singular].id"),
            ("redirect", "[plural].index"),
        ],
    ),
    ("show", &[("render", "[singular].show with:[singular]")]),
    ("edit", &[("render", "[singular].edit with:[singular]")]),
    (
        "update",
        &[
            ("validate", "[singular]"),
            ("update", "[singular]"),
            ("flash", "[singular].id"),
            ("redirect", "[plural].index"),
        ],
    ),
    ("destroy", &[("delete", "[singular]"), ("redirect", "[plural].index")]),
    ("api.index", &[("query", "all:[plural]"), ("resource", "collection:[plural]")]),
    (
        "api.store",
        &[("validate", "[singular]"), ("save", "[singular]"), ("resource", "[singular]")],
    ),
    ("api.show", &[("resource", "[singular]")]),
    (
        "api.update",
        &[("validate", "[singular]"), ("update", "[singular]"), ("resource", "[singular]")],
    ),
    ("api.destroy", &[("delete", "[singular]"), ("respond", "204")]),
];

/// Resource method names selected by a `resource:` value
fn methods_for_resource(kind: &str) -> Vec<String> {
    match kind.trim() {
        "api" => API_METHODS.iter().map(|m| m.to_string()).collect(),
        "web" | "" | "true" => WEB_METHODS.iter().map(|m| m.to_string()).collect(),
        other => split_list(&other.to_lowercase()),
    }
}

fn resource_tokens(controller: &Controller, methods: &[String]) -> TokenMap {
    let singular = to_camel_case(&controller.prefix());
    let plural = to_camel_case(&pluralize(&controller.prefix()));

    RESOURCE_TOKENS
        .iter()
        .filter(|(method, _)| methods.iter().any(|m| m.as_str() == *method))
        .map(|(method, statements)| {
            let body: TokenMap = statements
                .iter()
                .map(|(command, template)| {
                    let value = template
                        .replace("[singular]", &singular)
                        .replace("[plural]", &plural);
                    (command.to_string(), Token::Scalar(value))
                })
                .collect();
            (method.trim_start_matches("api.").to_string(), Token::Map(body))
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ControllerLexer {
    statements: StatementLexer,
}

impl ControllerLexer {
    pub fn new(statements: StatementLexer) -> Self {
        Self { statements }
    }

    /// Build a controller and, when `meta.policies` is set, its policy
    pub fn build(&self, name: &str, definition: &TokenMap) -> Controller {
        let mut controller = Controller::new(name);
        let mut definition = definition.clone();

        if let Some(resource) = definition.shift_remove("resource") {
            let methods = methods_for_resource(&resource.text());
            let mut expanded = resource_tokens(&controller, &methods);
            if !methods.is_empty() && methods.iter().all(|m| m.starts_with("api.")) {
                controller.set_api_resource(true);
            }
            expanded.extend(definition);
            definition = expanded;
        }

        if let Some(invokable) = definition.shift_remove("invokable") {
            let body = match invokable {
                Token::Map(body) => Token::Map(body),
                _ => Token::Map(TokenMap::new()),
            };
            definition.insert("__invoke".to_string(), body);
        }

        if let Some(meta) = definition.shift_remove("meta") {
            self.apply_meta(&mut controller, &meta);
        }

        for (method, body) in &definition {
            let statements = body
                .as_map()
                .map(|body| self.statements.analyze(body))
                .unwrap_or_default();
            controller.add_method(method.clone(), statements);
        }

        controller
    }

    fn apply_meta(&self, controller: &mut Controller, meta: &Token) {
        let Some(meta) = meta.as_map() else {
            return;
        };

        if let Some(policies) = meta.get("policies") {
            let policy = match policies {
                Token::Bool(false) => None,
                Token::Bool(true) | Token::Null => Some(Policy::for_resource(controller.prefix())),
                other => {
                    let methods = split_list(&other.text().to_lowercase());
                    Some(Policy::for_methods(controller.prefix(), &methods))
                }
            };
            if let Some(policy) = policy {
                controller.set_policy(policy);
            }
        }

        if let Some(parent) = meta.get("parent").and_then(Token::as_str) {
            controller.set_parent(parent);
        }
    }
}

impl Lexer for ControllerLexer {
    fn name(&self) -> &'static str {
        "controllers"
    }

    fn analyze(&self, tokens: &TokenMap) -> Registry {
        let mut registry = Registry::default();
        let Some(controllers) = section(tokens, "controllers") else {
            return registry;
        };

        for (name, definition) in controllers {
            let empty = TokenMap::new();
            let controller = self.build(name, definition.as_map().unwrap_or(&empty));
            tracing::debug!(
                controller = %name,
                methods = controller.methods().len(),
                "lexed controller"
            );
            if let Some(policy) = controller.policy() {
                registry.policies.push(policy.clone());
            }
            registry.controllers.insert(name.clone(), controller);
        }

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::{EloquentVerb, Statement};

    fn lex(draft: &str) -> Registry {
        ControllerLexer::new(StatementLexer::new()).analyze(&parse(draft).unwrap())
    }

    fn method_names(controller: &Controller) -> Vec<&str> {
        controller.methods().keys().map(String::as_str).collect()
    }

    #[test]
    fn test_methods_keep_declaration_order() {
        let registry = lex(
            "controllers:\n  Post:\n    show:\n      render: post.show with:post\n    index:\n      query: all\n      render: post.index with:posts\n",
        );
        let controller = &registry.controllers["Post"];
        assert_eq!(method_names(controller), vec!["show", "index"]);
        assert_eq!(controller.methods()["index"].len(), 2);
    }

    #[test]
    fn test_web_resource_expansion() {
        let registry = lex("controllers:\n  Post:\n    resource\n");
        let controller = &registry.controllers["Post"];
        assert_eq!(
            method_names(controller),
            vec!["index", "create", "store", "show", "edit", "update", "destroy"]
        );
        assert!(!controller.is_api_resource());
        match &controller.methods()["index"][0] {
            Statement::Query(q) => assert_eq!(q.clauses, vec!["posts"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_api_resource_expansion() {
        let registry = lex("controllers:\n  Api/Post:\n    resource: api\n");
        let controller = &registry.controllers["Api/Post"];
        assert!(controller.is_api_resource());
        assert_eq!(method_names(controller), vec!["index", "store", "show", "update", "destroy"]);
        match controller.methods()["destroy"].last().unwrap() {
            Statement::Respond(r) => assert_eq!(r.status(), Some(204)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_partial_resource_with_override() {
        let registry = lex(
            "controllers:\n  Post:\n    resource: index, show\n    show:\n      render: posts.detail\n    publish:\n      save: post\n",
        );
        let controller = &registry.controllers["Post"];
        assert_eq!(method_names(controller), vec!["index", "show", "publish"]);
        match &controller.methods()["show"][0] {
            Statement::Render(r) => assert_eq!(r.view, "posts.detail"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            &controller.methods()["publish"][0],
            Statement::Eloquent(e) if e.verb == EloquentVerb::Save
        ));
    }

    #[test]
    fn test_invokable() {
        let registry = lex("controllers:\n  Report:\n    invokable: true\n");
        let controller = &registry.controllers["Report"];
        assert!(controller.is_invokable());
        assert!(controller.methods()["__invoke"].is_empty());
    }

    #[test]
    fn test_meta_policies_and_parent() {
        let registry = lex(
            "controllers:\n  Comment:\n    resource: web\n    meta:\n      policies: index, show\n      parent: post\n",
        );
        let controller = &registry.controllers["Comment"];
        assert_eq!(controller.parent(), Some("post"));
        assert_eq!(registry.policies.len(), 1);
        assert_eq!(registry.policies[0].abilities, vec!["viewAny", "view"]);
        assert!(!controller.methods().contains_key("meta"));
    }

    #[test]
    fn test_policy_for_whole_resource() {
        let registry = lex("controllers:\n  Post:\n    resource: web\n    meta:\n      policies: true\n");
        assert!(registry.policies[0].authorize_resource);
        assert_eq!(registry.policies[0].model, "Post");
    }
}
