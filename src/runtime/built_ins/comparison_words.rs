use crate::{
    add_native_word,
    runtime::{data_structures::value::Value, error, interpreter::Interpreter},
};

fn word_less(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop_as_number()?;
    let lhs = interpreter.pop_as_number()?;

    interpreter.push(Value::Bool(lhs < rhs));
    Ok(())
}

fn word_greater(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop_as_number()?;
    let lhs = interpreter.pop_as_number()?;

    interpreter.push(Value::Bool(lhs > rhs));
    Ok(())
}

fn word_less_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop_as_number()?;
    let lhs = interpreter.pop_as_number()?;

    interpreter.push(Value::Bool(lhs <= rhs));
    Ok(())
}

fn word_greater_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop_as_number()?;
    let lhs = interpreter.pop_as_number()?;

    interpreter.push(Value::Bool(lhs >= rhs));
    Ok(())
}

/// Equality compares values directly, so strings compare as strings instead of faulting on the
/// numeric coercion.
fn word_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop()?;
    let lhs = interpreter.pop()?;

    interpreter.push(Value::Bool(lhs == rhs));
    Ok(())
}

fn word_not(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop_as_bool()?;

    interpreter.push(Value::Bool(!value));
    Ok(())
}

pub fn register_comparison_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "<", word_less, "Numeric less than.");
    add_native_word!(interpreter, ">", word_greater, "Numeric greater than.");

    add_native_word!(
        interpreter,
        "<=",
        word_less_equal,
        "Numeric less than or equal."
    );

    add_native_word!(
        interpreter,
        ">=",
        word_greater_equal,
        "Numeric greater than or equal."
    );

    add_native_word!(interpreter, "=", word_equal, "Compare two values.");
    add_native_word!(interpreter, "not", word_not, "Invert a truth value.");
}
