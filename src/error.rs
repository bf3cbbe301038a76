use crate::src::Src;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error: {0} at {1:?}")]
    SyntaxError(String, Src),
    #[error("Runtime error: {0} at {1:?}")]
    RuntimeError(String, Src),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn syntax<T>(message: impl Into<String>, src: Src) -> Result<T> {
        Err(Error::SyntaxError(message.into(), src))
    }

    pub fn runtime<T>(message: impl Into<String>, src: Src) -> Result<T> {
        Err(Error::RuntimeError(message.into(), src))
    }

    /// Return a two-line report highlighting this error's span in the line that contains it,
    /// preceded by a line number.
    // TODO: doesn't handle spans crossing a line boundary
    pub fn highlight_in_line(&self, program: &str) -> String {
        let (Error::SyntaxError(message, src) | Error::RuntimeError(message, src)) = self;
        let before = &program[..src.offset];
        // Calculate the line number of the span.
        let line_num = before.chars().filter(|c| *c == '\n').count() + 1;
        // Calculate the offsets of the beginning and end of the line containing it.
        let beginning_of_line = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_len = program[beginning_of_line..]
            .find('\n')
            .unwrap_or_else(|| program[beginning_of_line..].len());
        let line = &program[beginning_of_line..beginning_of_line + line_len];
        // Calculate the width (in terminal characters) of the text before the span.
        let terminal_offset = UnicodeWidthStr::width(&program[beginning_of_line..src.offset]);
        // Calculate the width of the span itself, keeping at least one caret even for
        // zero-length spans such as end-of-input.
        let end = (src.offset + src.len).min(program.len());
        let terminal_span_width = UnicodeWidthStr::width(&program[src.offset..end]).max(1);
        let line_num_str = format!("{}", line_num);
        let line_num_width = line_num_str.len();
        format!(
            "{}: {}\n{empty:line_num_width$}  {empty:terminal_offset$}{empty:^<terminal_span_width$} {}",
            line_num_str, line, message, empty = ""
        )
    }
}
