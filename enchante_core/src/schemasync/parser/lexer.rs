//! Field-statement lexer using the logos crate.
//!
//! Only the structured portion of a field declaration (target, colon, type
//! annotation) is tokenized; default expressions are carried as raw text and
//! never pass through here.

use logos::Logos;

/// Tokens for annotated field declarations.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip(r"#[^\n]*", allow_greedy = true))]
#[logos(skip r"\\\n")]
pub enum Token {
    // Punctuation
    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("...")]
    Ellipsis,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("|")]
    Pipe,

    // Operators that may appear inside bracketed annotation arguments,
    // e.g. `Annotated[int, Field(ge=0)]`. Lexed so they never abort a
    // parse; the annotation parser treats them as unstructured text.
    #[regex(r"==|!=|<=|>=|->|\*\*|//|[=<>+\-*/%@&^~;]", |lex| lex.slice().to_string())]
    Operator(String),

    // Literals
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    #[regex(r#"'([^'\\\n]|\\.)*'"#, |lex| lex.slice().to_string())]
    StringLiteral(String),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    IntegerLiteral(i64),

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
}

/// A token with its span in the source.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: std::ops::Range<usize>,
}

/// Tokenize the structured head of a field statement.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(SpannedToken {
                token,
                span: lexer.span(),
            }),
            Err(()) => {
                return Err(LexError {
                    span: lexer.span(),
                    message: format!(
                        "unexpected character '{}'",
                        &source[lexer.span().start..lexer.span().end.min(source.len())]
                    ),
                });
            }
        }
    }

    Ok(tokens)
}

/// Lexer error.
#[derive(Debug, Clone)]
pub struct LexError {
    pub span: std::ops::Range<usize>,
    pub message: String,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lex error at {:?}: {}", self.span, self.message)
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_field_head() {
        let tokens = tokenize("uid: uuid.UUID").unwrap();
        assert!(
            tokens
                .iter()
                .any(|t| matches!(&t.token, Token::Identifier(s) if s == "uid"))
        );
        assert!(tokens.iter().any(|t| matches!(&t.token, Token::Colon)));
        assert!(tokens.iter().any(|t| matches!(&t.token, Token::Dot)));
    }

    #[test]
    fn test_tokenize_parametrized_annotation() {
        let tokens = tokenize("tags: List[str]").unwrap();
        assert!(tokens.iter().any(|t| matches!(&t.token, Token::LBracket)));
        assert!(tokens.iter().any(|t| matches!(&t.token, Token::RBracket)));
    }

    #[test]
    fn test_tokenize_forward_reference() {
        let tokens = tokenize(r#"owner: "User""#).unwrap();
        assert!(
            tokens
                .iter()
                .any(|t| matches!(&t.token, Token::StringLiteral(s) if s == "\"User\""))
        );
    }

    #[test]
    fn test_tokenize_skips_trailing_comment() {
        let tokens = tokenize("uid: int  # primary key").unwrap();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_tokenize_keyword_arguments_in_annotation() {
        let tokens = tokenize("age: Annotated[int, Field(ge=0)]").unwrap();
        assert!(
            tokens
                .iter()
                .any(|t| matches!(&t.token, Token::Operator(s) if s == "="))
        );
    }

    #[test]
    fn test_tokenize_rejects_unknown_character() {
        let err = tokenize("uid: in?t").unwrap_err();
        assert!(err.message.contains("unexpected character"));
    }
}
