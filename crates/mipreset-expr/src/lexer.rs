//! Tokenizer.

use crate::error::ExprError;

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    Comma,
    Dot,
    Question,
    Colon,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Bang,
    AndAnd,
    OrOr,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Eof,
}

/// A token with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Splits `source` into tokens, ending with [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) {
            let (value, end) = lex_number(source, i)?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                offset: start,
            });
            i = end;
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(source[start..i].to_string()),
                offset: start,
            });
            continue;
        }

        if c == b'"' || c == b'\'' {
            let (text, end) = lex_string(source, i)?;
            tokens.push(Token {
                kind: TokenKind::Str(text),
                offset: start,
            });
            i = end;
            continue;
        }

        let next = bytes.get(i + 1).copied();
        let (kind, len) = match (c, next) {
            (b'&', Some(b'&')) => (TokenKind::AndAnd, 2),
            (b'|', Some(b'|')) => (TokenKind::OrOr, 2),
            (b'=', Some(b'=')) => (TokenKind::EqEq, 2),
            (b'!', Some(b'=')) => (TokenKind::NotEq, 2),
            (b'<', Some(b'=')) => (TokenKind::Le, 2),
            (b'>', Some(b'=')) => (TokenKind::Ge, 2),
            (b'*', Some(b'*')) => (TokenKind::StarStar, 2),
            (b'(', _) => (TokenKind::LParen, 1),
            (b')', _) => (TokenKind::RParen, 1),
            (b',', _) => (TokenKind::Comma, 1),
            (b'.', _) => (TokenKind::Dot, 1),
            (b'?', _) => (TokenKind::Question, 1),
            (b':', _) => (TokenKind::Colon, 1),
            (b'+', _) => (TokenKind::Plus, 1),
            (b'-', _) => (TokenKind::Minus, 1),
            (b'*', _) => (TokenKind::Star, 1),
            (b'/', _) => (TokenKind::Slash, 1),
            (b'%', _) => (TokenKind::Percent, 1),
            (b'!', _) => (TokenKind::Bang, 1),
            (b'<', _) => (TokenKind::Lt, 1),
            (b'>', _) => (TokenKind::Gt, 1),
            (b'&', _) => {
                return Err(ExprError::syntax(
                    start,
                    "bitwise '&' is not supported, use '&&'",
                ))
            }
            (b'|', _) => {
                return Err(ExprError::syntax(
                    start,
                    "bitwise '|' is not supported, use '||'",
                ))
            }
            (b'=', _) => {
                return Err(ExprError::syntax(
                    start,
                    "assignment is not supported, use '=='",
                ))
            }
            _ => {
                let ch = source[start..].chars().next().unwrap_or('?');
                return Err(ExprError::syntax(start, format!("unexpected character '{}'", ch)));
            }
        };
        tokens.push(Token { kind, offset: start });
        i += len;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: source.len(),
    });
    Ok(tokens)
}

/// Lexes a number starting at `start`. Accepts `1`, `1.5`, `.5`, `1.`, `1e-3`,
/// and an HLSL-style trailing `f`.
fn lex_number(source: &str, start: usize) -> Result<(f64, usize), ExprError> {
    let bytes = source.as_bytes();
    let mut i = start;

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    // `1.r` is not a number followed by a member access; `1.` and `1.5` are numbers
    if i < bytes.len()
        && bytes[i] == b'.'
        && !bytes
            .get(i + 1)
            .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_')
    {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    let text = &source[start..i];
    let value = text
        .parse::<f64>()
        .map_err(|_| ExprError::syntax(start, format!("invalid number '{}'", text)))?;

    if i < bytes.len() && (bytes[i] == b'f' || bytes[i] == b'F') {
        let after = bytes.get(i + 1);
        if !after.is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_') {
            i += 1;
        }
    }
    Ok((value, i))
}

/// Lexes a quoted string starting at `start` (the opening quote).
fn lex_string(source: &str, start: usize) -> Result<(String, usize), ExprError> {
    let quote = source.as_bytes()[start] as char;
    let mut out = String::new();
    let mut chars = source[start + 1..].char_indices();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            c if c == quote => return Ok((out, start + 1 + idx + c.len_utf8())),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            other => out.push(other),
        }
    }
    Err(ExprError::syntax(start, "unterminated string literal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a && !b || c != 1"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::AndAnd,
                TokenKind::Bang,
                TokenKind::Ident("b".into()),
                TokenKind::OrOr,
                TokenKind::Ident("c".into()),
                TokenKind::NotEq,
                TokenKind::Number(1.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("0.5")[0], TokenKind::Number(0.5));
        assert_eq!(kinds(".25")[0], TokenKind::Number(0.25));
        assert_eq!(kinds("2.")[0], TokenKind::Number(2.0));
        assert_eq!(kinds("1e-3")[0], TokenKind::Number(0.001));
        assert_eq!(kinds("0.5f"), vec![TokenKind::Number(0.5), TokenKind::Eof]);
    }

    #[test]
    fn test_member_access_after_ident() {
        assert_eq!(
            kinds("tint.r"),
            vec![
                TokenKind::Ident("tint".into()),
                TokenKind::Dot,
                TokenKind::Ident("r".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(kinds("'/Game/T'")[0], TokenKind::Str("/Game/T".into()));
        assert_eq!(kinds(r#""a\"b""#)[0], TokenKind::Str("a\"b".into()));
        assert!(tokenize("'open").is_err());
    }

    #[test]
    fn test_rejected_characters() {
        assert_eq!(tokenize("a & b").unwrap_err().code(), "X001");
        assert!(tokenize("a = 1").is_err());
        assert!(tokenize("a # b").is_err());
    }
}
