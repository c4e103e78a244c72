use crate::{
    add_native_word,
    runtime::{
        data_structures::value::Value,
        error::{self, Fault},
        interpreter::Interpreter,
    },
};

/// The arithmetic operations work on integers.  Both operands are truncated towards zero
/// before the operation and the result is pushed back as a number.

fn word_add(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop_as_int()?;
    let lhs = interpreter.pop_as_int()?;

    interpreter.push(Value::Number(lhs.wrapping_add(rhs) as f64));
    Ok(())
}

fn word_subtract(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop_as_int()?;
    let lhs = interpreter.pop_as_int()?;

    interpreter.push(Value::Number(lhs.wrapping_sub(rhs) as f64));
    Ok(())
}

fn word_multiply(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop_as_int()?;
    let lhs = interpreter.pop_as_int()?;

    interpreter.push(Value::Number(lhs.wrapping_mul(rhs) as f64));
    Ok(())
}

fn word_divide(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop_as_int()?;
    let lhs = interpreter.pop_as_int()?;

    if rhs == 0 {
        return error::fault(Fault::DivideByZero);
    }

    interpreter.push(Value::Number(lhs.wrapping_div(rhs) as f64));
    Ok(())
}

fn word_modulo(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let rhs = interpreter.pop_as_int()?;
    let lhs = interpreter.pop_as_int()?;

    if rhs == 0 {
        return error::fault(Fault::DivideByZero);
    }

    interpreter.push(Value::Number(lhs.wrapping_rem(rhs) as f64));
    Ok(())
}

fn word_random(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.push(Value::Number(rand::random::<u32>() as f64));
    Ok(())
}

pub fn register_arithmetic_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "+", word_add, "Add two numbers.");
    add_native_word!(interpreter, "-", word_subtract, "Subtract two numbers.");
    add_native_word!(interpreter, "*", word_multiply, "Multiply two numbers.");

    add_native_word!(
        interpreter,
        "/",
        word_divide,
        "Divide two numbers, truncating towards zero."
    );

    add_native_word!(
        interpreter,
        "%",
        word_modulo,
        "The remainder of dividing two numbers."
    );

    add_native_word!(
        interpreter,
        "random",
        word_random,
        "Push a random 32 bit unsigned integer."
    );
}
