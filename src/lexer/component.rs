//! Component lexer.
//!
//! Works like the controller lexer, plus a `mount` property list and a
//! synthesized `render` method pointing at the component's view.

use crate::lexer::{Lexer, Registry, StatementLexer};
use crate::parser::{section, Token, TokenMap};
use crate::types::Component;
use crate::utils::split_list;

#[derive(Debug, Clone, Default)]
pub struct ComponentLexer {
    statements: StatementLexer,
}

impl ComponentLexer {
    pub fn new(statements: StatementLexer) -> Self {
        Self { statements }
    }

    fn build(&self, name: &str, definition: &TokenMap) -> Component {
        let mut component = Component::new(name);
        let mut definition = definition.clone();

        if let Some(mount) = definition.shift_remove("mount") {
            component.add_properties(split_list(&mount.text()));
        }

        let mut render = TokenMap::new();
        render.insert(
            "render".to_string(),
            Token::Scalar(format!("livewire.{}", component.view_name())),
        );
        let mut methods = TokenMap::new();
        methods.insert("render".to_string(), Token::Map(render));
        methods.extend(definition);

        for (method, body) in &methods {
            let statements = body
                .as_map()
                .map(|body| self.statements.analyze(body))
                .unwrap_or_default();
            component.add_method(method.clone(), statements);
        }

        component
    }
}

impl Lexer for ComponentLexer {
    fn name(&self) -> &'static str {
        "components"
    }

    fn analyze(&self, tokens: &TokenMap) -> Registry {
        let mut registry = Registry::default();
        let Some(components) = section(tokens, "components") else {
            return registry;
        };

        for (name, definition) in components {
            let empty = TokenMap::new();
            let component = self.build(name, definition.as_map().unwrap_or(&empty));
            tracing::debug!(component = %name, methods = component.methods().len(), "lexed component");
            registry.components.insert(name.clone(), component);
        }

        registry
    }
}
