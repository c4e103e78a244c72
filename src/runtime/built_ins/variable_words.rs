use crate::{add_native_word, runtime::{error, interpreter::Interpreter}};

/// Store a value in a variable, ( value name -- ).  The variable's name sits on top of the
/// value it receives.
fn word_store(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = interpreter.pop_as_text()?;
    let value = interpreter.pop()?;

    interpreter.store_variable(&name, value);
    Ok(())
}

/// Fetch a variable's value, ( name -- value ).
fn word_fetch(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = interpreter.pop_as_text()?;
    let value = interpreter.fetch_variable(&name)?;

    interpreter.push(value);
    Ok(())
}

pub fn register_variable_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "!", word_store, "Store a value in a variable.");
    add_native_word!(interpreter, "@", word_fetch, "Fetch a variable's value.");
}
