//! Config lexer: lifts the draft's `config` section into a configuration overlay.

use crate::lexer::{Lexer, Registry};
use crate::parser::{section, TokenMap};

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLexer;

impl ConfigLexer {
    pub fn new() -> Self {
        Self
    }
}

impl Lexer for ConfigLexer {
    fn name(&self) -> &'static str {
        "config"
    }

    fn analyze(&self, tokens: &TokenMap) -> Registry {
        Registry {
            config: section(tokens, "config").cloned().unwrap_or_default(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Token};

    #[test]
    fn test_overlay() {
        let tokens = parse("config:\n  namespace: Acme\n  use_guarded: true\n").unwrap();
        let registry = ConfigLexer::new().analyze(&tokens);
        assert_eq!(registry.config["namespace"], Token::Scalar("Acme".to_string()));
        assert_eq!(registry.config["use_guarded"], Token::Bool(true));
    }
}
