use crate::{add_native_word, runtime::{error, interpreter::Interpreter}};

fn word_print(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    println!("{}", value);
    Ok(())
}

/// Print the whole operand stack without disturbing it.  Handy when debugging a script.
fn word_print_stack(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rendered = interpreter
        .stack()
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<String>>()
        .join(", ");

    println!("[{}]", rendered);
    Ok(())
}

pub fn register_io_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "print", word_print, "Pop and print a value.");

    add_native_word!(
        interpreter,
        "_stack",
        word_print_stack,
        "Print the operand stack."
    );
}
