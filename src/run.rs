use crate::interpreter;
use crate::parser::parse;
use std::fs;
use std::io::{self, BufRead};

/// Run the given data as a calx program, writing the result to stdout.
///
/// Syntax and runtime errors are reported to stderr; only I/O failures propagate.
fn run(program: impl AsRef<str>) -> anyhow::Result<()> {
    let program = program.as_ref();
    match parse(program) {
        Ok(expr) => interpreter::run(program, &expr, &mut io::stdout())?,
        Err(e) => eprintln!("{}", e.highlight_in_line(program)),
    }
    Ok(())
}

/// Run a REPL until EOF. Each line is a single expression; errors do not end the session.
pub fn repl() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(line) = lines.next() {
        run(line?)?;
    }

    Ok(())
}

/// Run a calx program from a file.
pub fn file(filename: impl AsRef<std::path::Path>) -> anyhow::Result<()> {
    let program = fs::read_to_string(filename)?;
    run(program)?;
    Ok(())
}
