//! Recursive-descent parser.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! conditional := or ( '?' conditional ':' conditional
//!                   | 'if' or 'else' conditional )?
//! or          := and ( ('||' | 'or') and )*
//! and         := compare ( ('&&' | 'and') compare )*
//! compare     := additive ( ('==' | '!=' | '<' | '<=' | '>' | '>=') additive )*
//! additive    := term ( ('+' | '-') term )*
//! term        := unary ( ('*' | '/' | '%') unary )*
//! unary       := ('-' | '+' | '!' | 'not') unary | power
//! power       := postfix ( '**' unary )?
//! postfix     := primary ( '.' ident )*
//! primary     := number | string | ident | ident '(' args ')' | '(' conditional ')'
//! ```

use crate::ast::{BinaryOp, CompareOp, Expr, LogicalOp, UnaryOp};
use crate::error::ExprError;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::value::Value;

/// Depth limit of the expression tree. Parentheses, unary operators, and
/// every link of a left-associative operator chain each count one level.
const MAX_DEPTH: usize = 64;

/// Token limit.
const MAX_TOKENS: usize = 4096;

/// Parses `source` into an expression tree.
pub fn parse(source: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(source)?;
    if tokens.len() > MAX_TOKENS {
        return Err(ExprError::syntax(
            0,
            format!("expression longer than {} tokens", MAX_TOKENS),
        ));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.conditional()?;
    let tok = parser.peek();
    if tok.kind != TokenKind::Eof {
        return Err(ExprError::syntax(
            tok.offset,
            format!("unexpected {} after expression", describe(&tok.kind)),
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // the token list always ends with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if matches!(&self.peek().kind, TokenKind::Ident(name) if name == word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            let tok = self.peek();
            Err(ExprError::syntax(
                tok.offset,
                format!("expected {}, found {}", describe(&kind), describe(&tok.kind)),
            ))
        }
    }

    fn enter(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(ExprError::syntax(
                self.peek().offset,
                format!("expression nested deeper than {} levels", MAX_DEPTH),
            ))
        } else {
            Ok(())
        }
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Runs a left-associative chain; each link calls `enter`, and the depth
    /// is restored once the chain ends.
    fn chain(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Expr, ExprError>,
    ) -> Result<Expr, ExprError> {
        let depth = self.depth;
        let result = parse(self);
        self.depth = depth;
        result
    }

    fn conditional(&mut self) -> Result<Expr, ExprError> {
        self.enter()?;
        let result = self.conditional_inner();
        self.leave();
        result
    }

    fn conditional_inner(&mut self) -> Result<Expr, ExprError> {
        let first = self.or()?;

        if self.eat(&TokenKind::Question) {
            let then_branch = self.conditional()?;
            self.expect(TokenKind::Colon)?;
            let else_branch = self.conditional()?;
            return Ok(Expr::Conditional {
                cond: Box::new(first),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }

        if self.eat_keyword("if") {
            let cond = self.or()?;
            if !self.eat_keyword("else") {
                let tok = self.peek();
                return Err(ExprError::syntax(
                    tok.offset,
                    format!("expected 'else', found {}", describe(&tok.kind)),
                ));
            }
            let else_branch = self.conditional()?;
            return Ok(Expr::Conditional {
                cond: Box::new(cond),
                then_branch: Box::new(first),
                else_branch: Box::new(else_branch),
            });
        }

        Ok(first)
    }

    fn or(&mut self) -> Result<Expr, ExprError> {
        self.chain(|p| {
            let mut left = p.and()?;
            while p.eat(&TokenKind::OrOr) || p.eat_keyword("or") {
                p.enter()?;
                let right = p.and()?;
                left = logical(LogicalOp::Or, left, right);
            }
            Ok(left)
        })
    }

    fn and(&mut self) -> Result<Expr, ExprError> {
        self.chain(|p| {
            let mut left = p.compare()?;
            while p.eat(&TokenKind::AndAnd) || p.eat_keyword("and") {
                p.enter()?;
                let right = p.compare()?;
                left = logical(LogicalOp::And, left, right);
            }
            Ok(left)
        })
    }

    fn compare(&mut self) -> Result<Expr, ExprError> {
        let first = self.additive()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => CompareOp::Eq,
                TokenKind::NotEq => CompareOp::Ne,
                TokenKind::Lt => CompareOp::Lt,
                TokenKind::Le => CompareOp::Le,
                TokenKind::Gt => CompareOp::Gt,
                TokenKind::Ge => CompareOp::Ge,
                _ => break,
            };
            self.advance();
            rest.push((op, self.additive()?));
        }
        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn additive(&mut self) -> Result<Expr, ExprError> {
        self.chain(|p| {
            let mut left = p.term()?;
            loop {
                let op = match p.peek().kind {
                    TokenKind::Plus => BinaryOp::Add,
                    TokenKind::Minus => BinaryOp::Sub,
                    _ => break,
                };
                p.advance();
                p.enter()?;
                let right = p.term()?;
                left = binary(op, left, right);
            }
            Ok(left)
        })
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        self.chain(|p| {
            let mut left = p.unary()?;
            loop {
                let op = match p.peek().kind {
                    TokenKind::Star => BinaryOp::Mul,
                    TokenKind::Slash => BinaryOp::Div,
                    TokenKind::Percent => BinaryOp::Rem,
                    _ => break,
                };
                p.advance();
                p.enter()?;
                let right = p.unary()?;
                left = binary(op, left, right);
            }
            Ok(left)
        })
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        let op = match &self.peek().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Ident(name) if name == "not" => Some(UnaryOp::Not),
            _ => None,
        };
        match op {
            Some(op) => {
                self.advance();
                self.enter()?;
                let operand = self.unary();
                self.leave();
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand?),
                })
            }
            None => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, ExprError> {
        let base = self.postfix()?;
        if self.eat(&TokenKind::StarStar) {
            self.enter()?;
            let exponent = self.unary();
            self.leave();
            return Ok(binary(BinaryOp::Pow, base, exponent?));
        }
        Ok(base)
    }

    fn postfix(&mut self) -> Result<Expr, ExprError> {
        self.chain(|p| {
            let mut expr = p.primary()?;
            while p.eat(&TokenKind::Dot) {
                p.enter()?;
                let tok = p.advance();
                match tok.kind {
                    TokenKind::Ident(field) => {
                        expr = Expr::Member {
                            expr: Box::new(expr),
                            field,
                        }
                    }
                    other => {
                        return Err(ExprError::syntax(
                            tok.offset,
                            format!(
                                "expected component name after '.', found {}",
                                describe(&other)
                            ),
                        ))
                    }
                }
            }
            Ok(expr)
        })
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(Value::Number(n))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::Text(s))),
            TokenKind::LParen => {
                let inner = self.conditional()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if self.eat(&TokenKind::LParen) {
                    let args = self.arguments()?;
                    return Ok(Expr::Call {
                        function: name,
                        args,
                    });
                }
                Ok(match name.as_str() {
                    "true" | "True" => Expr::Literal(Value::Bool(true)),
                    "false" | "False" => Expr::Literal(Value::Bool(false)),
                    "null" | "None" => Expr::Literal(Value::Null),
                    "and" | "or" | "not" | "if" | "else" => {
                        return Err(ExprError::syntax(
                            tok.offset,
                            format!("unexpected keyword '{}'", name),
                        ))
                    }
                    _ => Expr::Ident(name),
                })
            }
            other => Err(ExprError::syntax(
                tok.offset,
                format!("unexpected {}", describe(&other)),
            )),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.conditional()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(n) => format!("number {}", n),
        TokenKind::Str(_) => "string literal".to_string(),
        TokenKind::Ident(name) => format!("'{}'", name),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::Comma => "','".to_string(),
        TokenKind::Dot => "'.'".to_string(),
        TokenKind::Question => "'?'".to_string(),
        TokenKind::Colon => "':'".to_string(),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Star => "'*'".to_string(),
        TokenKind::StarStar => "'**'".to_string(),
        TokenKind::Slash => "'/'".to_string(),
        TokenKind::Percent => "'%'".to_string(),
        TokenKind::Bang => "'!'".to_string(),
        TokenKind::AndAnd => "'&&'".to_string(),
        TokenKind::OrOr => "'||'".to_string(),
        TokenKind::EqEq => "'=='".to_string(),
        TokenKind::NotEq => "'!='".to_string(),
        TokenKind::Lt => "'<'".to_string(),
        TokenKind::Le => "'<='".to_string(),
        TokenKind::Gt => "'>'".to_string(),
        TokenKind::Ge => "'>='".to_string(),
        TokenKind::Eof => "end of expression".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Expr {
        Expr::Literal(Value::Number(n))
    }

    fn ident(name: &str) -> Expr {
        Expr::Ident(name.to_string())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("1 + 2 * x").unwrap(),
            binary(BinaryOp::Add, num(1.0), binary(BinaryOp::Mul, num(2.0), ident("x")))
        );
    }

    #[test]
    fn test_power_binds_tighter_than_negation() {
        assert_eq!(
            parse("-x ** 2").unwrap(),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(binary(BinaryOp::Pow, ident("x"), num(2.0))),
            }
        );
    }

    #[test]
    fn test_hlsl_and_python_logic_parse_alike() {
        assert_eq!(parse("!a && b || c").unwrap(), parse("not a and b or c").unwrap());
    }

    #[test]
    fn test_both_conditional_forms() {
        assert_eq!(parse("c ? 1 : 2").unwrap(), parse("1 if c else 2").unwrap());
    }

    #[test]
    fn test_comparison_chain() {
        match parse("0 < x <= 1").unwrap() {
            Expr::Compare { rest, .. } => {
                assert_eq!(rest.len(), 2);
                assert_eq!(rest[0].0, CompareOp::Lt);
                assert_eq!(rest[1].0, CompareOp::Le);
            }
            other => panic!("expected comparison chain, got {:?}", other),
        }
    }

    #[test]
    fn test_call_and_member() {
        assert_eq!(
            parse("float4(tint.r, 0, 0, 1)").unwrap(),
            Expr::Call {
                function: "float4".to_string(),
                args: vec![
                    Expr::Member {
                        expr: Box::new(ident("tint")),
                        field: "r".to_string(),
                    },
                    num(0.0),
                    num(0.0),
                    num(1.0),
                ],
            }
        );
        assert_eq!(
            parse("min()").unwrap(),
            Expr::Call {
                function: "min".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_syntax_errors() {
        for source in ["", "1 +", "(1", "1 2", "a ? b", "1 if c", "f(1,", "x.", "and"] {
            let err = parse(source).unwrap_err();
            assert_eq!(err.code(), "X001", "source: {:?}", source);
        }
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let source = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(parse(&source).unwrap_err().code(), "X001");

        let source = format!("{}1", "-".repeat(200));
        assert_eq!(parse(&source).unwrap_err().code(), "X001");
    }

    #[test]
    fn test_long_operator_chains_are_rejected() {
        for op in ["+", "*", "&&", "||"] {
            let source = vec!["1"; 1000].join(op);
            assert_eq!(parse(&source).unwrap_err().code(), "X001", "chain of '{}'", op);
        }

        let source = format!("c{}", ".r".repeat(500));
        assert_eq!(parse(&source).unwrap_err().code(), "X001");
    }

    #[test]
    fn test_short_chains_still_parse() {
        assert!(parse(&vec!["1"; 40].join(" + ")).is_ok());
        assert!(parse(&vec!["(a + b)"; 20].join(" * ")).is_ok());
    }
}
