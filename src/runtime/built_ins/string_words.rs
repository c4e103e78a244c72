use crate::{
    add_native_word,
    runtime::{data_structures::value::Value, error, interpreter::Interpreter},
};

/// Both operands are coerced to text, so numbers can be spliced into messages directly.
fn word_strcat(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop_as_text()?;
    let lhs = interpreter.pop_as_text()?;

    interpreter.push(Value::Text(lhs + &rhs));
    Ok(())
}

pub fn register_string_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        "strcat",
        word_strcat,
        "Concatenate two values as text."
    );
}
