//! Seeder lexer: `seeders: Post, Comment`.

use crate::lexer::{Lexer, Registry};
use crate::parser::{Token, TokenMap};
use crate::utils::split_list;

#[derive(Debug, Clone, Copy, Default)]
pub struct SeederLexer;

impl SeederLexer {
    pub fn new() -> Self {
        Self
    }
}

impl Lexer for SeederLexer {
    fn name(&self) -> &'static str {
        "seeders"
    }

    fn analyze(&self, tokens: &TokenMap) -> Registry {
        let seeders = match tokens.get("seeders") {
            Some(Token::List(items)) => items
                .iter()
                .filter_map(Token::as_str)
                .flat_map(split_list)
                .collect(),
            Some(token) => split_list(&token.text()),
            None => Vec::new(),
        };

        Registry {
            seeders,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_comma_separated() {
        let tokens = parse("seeders: Post, Comment,User\n").unwrap();
        assert_eq!(SeederLexer::new().analyze(&tokens).seeders, vec!["Post", "Comment", "User"]);
    }

    #[test]
    fn test_missing_section() {
        let tokens = parse("models: {}\n").unwrap();
        assert!(SeederLexer::new().analyze(&tokens).seeders.is_empty());
    }
}
