use crate::error::{Error, Result};
use crate::src::Src;
use crate::token::{ScannerError, Token, TokenType, Tokens};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alphanumeric1, char, digit1},
    combinator::{not, opt, recognize},
    sequence::{delimited, pair},
    IResult,
};

/// A piece of punctuation, which can be squished right up against other tokens.
fn punctuation(
    literal: &'static str,
    ty: TokenType,
) -> impl FnMut(&str) -> IResult<&str, (TokenType, &str)> {
    move |i| {
        let (i, val) = recognize(tag(literal))(i)?;
        Ok((i, (ty, val)))
    }
}

/// A keyword, which must be followed by a non-alphanumeric character.
fn keyword(
    literal: &'static str,
    ty: TokenType,
) -> impl FnMut(&str) -> IResult<&str, (TokenType, &str)> {
    move |i| {
        let (i, val) = recognize(pair(tag(literal), not(alphanumeric1)))(i)?;
        Ok((i, (ty, val)))
    }
}

/// A number literal: digits with an optional fractional part. A leading or trailing `.` is not
/// part of the number.
fn number(i: &str) -> IResult<&str, (TokenType, &str)> {
    let (i, val) = recognize(pair(digit1, opt(pair(char('.'), digit1))))(i)?;
    Ok((i, (TokenType::Number, val)))
}

/// A string literal. Strings may span lines and contain no escape sequences. The recognized
/// value includes the `"` delimiters.
fn string(i: &str) -> IResult<&str, (TokenType, &str)> {
    let (i, val) = recognize(delimited(char('"'), take_while(|c| c != '"'), char('"')))(i)?;
    Ok((i, (TokenType::String, val)))
}

fn token(i: &str) -> IResult<&str, (TokenType, &str)> {
    use TokenType::*;
    alt((
        alt((
            punctuation("(", LeftParen),
            punctuation(")", RightParen),
            punctuation("-", Minus),
            punctuation("+", Plus),
            punctuation("/", Slash),
            punctuation("*", Star),
            // For the remainder, the longer version must come first.
            punctuation("!=", BangEqual),
            punctuation("!", Bang),
            punctuation("==", EqualEqual),
            punctuation(">=", GreaterEqual),
            punctuation(">", Greater),
            punctuation("<=", LessEqual),
            punctuation("<", Less),
        )),
        alt((
            keyword("nil", Nil),
            keyword("true", True),
            keyword("false", False),
        )),
        number,
        string,
    ))(i)
}

/// Scan the given program into a sequence of tokens.
pub fn scan(program: &str) -> Result<Tokens> {
    let mut tokens = Tokens::new();
    let mut rest = program.trim_start();
    while !rest.is_empty() {
        let offset = program.len() - rest.len();
        let Ok((remaining, (ty, val))) = token(rest) else {
            let e = if rest.starts_with('"') {
                ScannerError::UnterminatedString
            } else {
                ScannerError::UnrecognizedInput
            };
            let len = rest.chars().next().map_or(1, |c| c.len_utf8());
            return Error::syntax(e.to_string(), Src { offset, len });
        };
        tokens.push(Token {
            ty,
            src: Src {
                offset,
                len: val.len(),
            },
        });
        rest = remaining.trim_start();
    }
    Ok(tokens)
}
