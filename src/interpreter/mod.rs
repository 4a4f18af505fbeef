mod config;
mod error;
mod eval;
mod value;

pub use config::Config;
pub use error::RuntimeError;
pub use eval::{EvalResult, Interpreter};
pub use value::{Builtin, Closure, RValue};

use std::io::Write;

use anyhow::bail;

use crate::lexer::{Token, strip_comments};
use crate::parser::{ParseState, parse};

/// Lex, parse and run `source`, writing program output to `out`.
///
/// Every parse error is reported, one per line. The finished interpreter is
/// returned so callers can inspect the global scope or the output.
pub fn execute<W: Write>(source: &str, config: Config, out: W) -> anyhow::Result<Interpreter<W>> {
    let source = strip_comments(source);
    let tokens = Token::lex(&source)?;
    let mut state = ParseState::new(tokens);

    let program = match parse(&mut state) {
        (Some(program), errors) if errors.is_empty() => program,
        (_, errors) => bail!(
            "{}",
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        ),
    };

    let mut interpreter = Interpreter::new(config, out);
    interpreter.run(&program)?;
    Ok(interpreter)
}
