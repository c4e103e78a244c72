use std::{env, fs};

use muf::{
    lang::compiler,
    runtime::{
        error::{self, ScriptError},
        interpreter::muf_interpreter::MufInterpreter,
    },
};

/// Compile the given script and run its main block.  The `MUF_COMMAND_MAXIMUM` environment
/// variable overrides the runaway protection ceiling, with zero disabling it.
fn main() -> error::Result<()> {
    let mut args = env::args();
    let program_name = args.next().unwrap_or_else(|| "muf".to_string());

    let script = match args.next() {
        Some(path) => path,

        None => {
            return Err(ScriptError::Type(format!(
                "Usage: {} <script-file>",
                program_name
            )));
        }
    };

    let source = fs::read_to_string(&script)?;
    let program = compiler::compile(&source)?;

    let mut interpreter = MufInterpreter::new();

    interpreter.register_program(&program);

    if let Ok(text) = env::var("MUF_COMMAND_MAXIMUM") {
        match text.trim().parse::<usize>() {
            Ok(maximum) => interpreter.set_command_maximum(maximum),

            Err(_) => {
                return Err(ScriptError::Type(format!(
                    "MUF_COMMAND_MAXIMUM must be a whole number, not '{}'.",
                    text
                )));
            }
        }
    }

    interpreter.call("main")?;

    Ok(())
}
