use crate::ast::{BinaryOp, Expr, Node, UnaryOp};
use crate::error::{Error, Result};
use crate::scanner::scan;
use crate::src::Src;
use crate::token::{Token, TokenType};

struct Parser<'p> {
    program: &'p str,
    tokens: &'p [Token],
}

impl<'p> Parser<'p> {
    // Each parsing function returns (remainder, node) where `remainder` is the index of the next
    // unconsumed token.

    /// Parse a primary (one-token) expression, or a parenthesized expression.
    fn parse_primary(&self, t: usize) -> Result<(usize, Node<Expr>)> {
        let Some(tok) = self.tokens.get(t) else {
            return Error::syntax("Expected expression, got end of input", self.eof());
        };
        fn strip_quotes(quoted: &str) -> &str {
            &quoted[1..quoted.len() - 1]
        }
        Ok((
            t + 1,
            match tok.ty {
                TokenType::String => Expr::string(tok.src, strip_quotes(tok.src_str(self.program))),
                TokenType::Number => {
                    let Ok(value) = tok.src_str(self.program).parse() else {
                        return Error::syntax("Invalid number", tok.src);
                    };
                    Expr::number(tok.src, value)
                }
                TokenType::True => Expr::boolean(tok.src, true),
                TokenType::False => Expr::boolean(tok.src, false),
                TokenType::Nil => Expr::nil(tok.src),
                TokenType::LeftParen => return self.parse_parenthesized(t + 1, tok.src),
                _ => return Error::syntax(format!("Expected expression, got {:?}", tok.ty), tok.src),
            },
        ))
    }

    /// Parse a parenthesized expression, where `t` indexes the token after the opening
    /// parenthesis. The resulting grouping node spans both parentheses.
    fn parse_parenthesized(&self, t: usize, lparen: Src) -> Result<(usize, Node<Expr>)> {
        let (t, inner) = self.parse_expression(t)?;
        let Some(tok) = self.tokens.get(t) else {
            return Error::syntax("Expected ')', got end of input", self.eof());
        };
        if tok.ty != TokenType::RightParen {
            return Error::syntax(format!("Expected ')', got {:?}", tok.ty), tok.src);
        }
        Ok((t + 1, Expr::grouping(lparen + tok.src, inner)))
    }

    fn parse_unary(&self, t: usize) -> Result<(usize, Node<Expr>)> {
        let op = match self.tokens.get(t) {
            Some(tok) => match UnaryOp::try_from(tok.ty) {
                Ok(op) => Node {
                    inner: op,
                    src: tok.src,
                },
                Err(()) => return self.parse_primary(t),
            },
            None => return self.parse_primary(t),
        };
        // Parse the unary expression following this operator.
        let (t, child) = self.parse_unary(t + 1)?;
        let src = op.src + child.src;
        Ok((t, Expr::unary(src, op, child)))
    }

    /// Parse a left-associative run of binary operators from `ops`, with operands parsed by
    /// `operand`.
    fn parse_left_assoc(
        &self,
        t: usize,
        ops: &[TokenType],
        operand: fn(&Self, usize) -> Result<(usize, Node<Expr>)>,
    ) -> Result<(usize, Node<Expr>)> {
        let (mut t, mut value) = operand(self, t)?;
        loop {
            let op = match self.tokens.get(t) {
                Some(tok) if ops.contains(&tok.ty) => match BinaryOp::try_from(tok.ty) {
                    Ok(op) => Node {
                        inner: op,
                        src: tok.src,
                    },
                    Err(()) => return Ok((t, value)),
                },
                _ => return Ok((t, value)),
            };
            t += 1;
            let rhs;
            (t, rhs) = operand(self, t)?;
            let src = value.src + rhs.src;
            value = Expr::binary(src, op, value, rhs);
        }
    }

    fn parse_factor(&self, t: usize) -> Result<(usize, Node<Expr>)> {
        self.parse_left_assoc(t, &[TokenType::Star, TokenType::Slash], Self::parse_unary)
    }

    fn parse_term(&self, t: usize) -> Result<(usize, Node<Expr>)> {
        self.parse_left_assoc(t, &[TokenType::Plus, TokenType::Minus], Self::parse_factor)
    }

    fn parse_comparison(&self, t: usize) -> Result<(usize, Node<Expr>)> {
        self.parse_left_assoc(
            t,
            &[
                TokenType::Greater,
                TokenType::GreaterEqual,
                TokenType::Less,
                TokenType::LessEqual,
            ],
            Self::parse_term,
        )
    }

    fn parse_equality(&self, t: usize) -> Result<(usize, Node<Expr>)> {
        self.parse_left_assoc(
            t,
            &[TokenType::BangEqual, TokenType::EqualEqual],
            Self::parse_comparison,
        )
    }

    fn parse_expression(&self, t: usize) -> Result<(usize, Node<Expr>)> {
        self.parse_equality(t)
    }

    /// A zero-length Src pointing at the end of the program.
    fn eof(&self) -> Src {
        Src {
            offset: self.program.len(),
            len: 0,
        }
    }
}

/// Parse the given program into an expression tree.
pub fn parse(program: &str) -> Result<Node<Expr>> {
    let tokens = scan(program)?;
    let parser = Parser {
        program,
        tokens: &tokens[..],
    };
    let (remainder, result) = parser.parse_expression(0)?;
    if remainder < tokens.len() {
        return Error::syntax("Extra tokens at end", tokens[remainder].src);
    }
    Ok(result)
}
