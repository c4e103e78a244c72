use crate::{add_native_word, runtime::{error, interpreter::Interpreter}};

/// The control-flow operations.  The compiler's resolver guarantees that every `if`, `else`
/// `jump`, and `while` instruction is preceded by the numeric literal holding its relative jump
/// distance, so at run time these operations only pop and go.

fn word_jump(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let offset = interpreter.pop_as_int()?;

    interpreter.jump_relative(offset)
}

fn word_if(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let false_jump = interpreter.pop_as_int()?;
    let condition = interpreter.pop_as_bool()?;

    if !condition {
        interpreter.jump_relative(false_jump)?;
    }

    Ok(())
}

/// `while` exits the enclosing loop when its condition holds, jumping past the loop's `then`
/// landing pad and retiring the recorded loop start.
fn word_while(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let exit_jump = interpreter.pop_as_int()?;
    let condition = interpreter.pop_as_bool()?;

    if condition {
        interpreter.jump_relative(exit_jump)?;
        interpreter.drop_loop_start()?;
    }

    Ok(())
}

fn word_begin(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.mark_loop_start();
    Ok(())
}

fn word_until(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let done = interpreter.pop_as_bool()?;

    if done {
        interpreter.drop_loop_start()
    } else {
        interpreter.jump_to_loop_start()
    }
}

fn word_repeat(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.jump_to_loop_start()
}

fn word_exit(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.request_halt();
    Ok(())
}

fn word_call(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = interpreter.pop_as_text()?;

    interpreter.call_block(&name)
}

fn word_return(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.return_to_caller()
}

fn word_nop(_interpreter: &mut dyn Interpreter) -> error::Result<()> {
    Ok(())
}

pub fn register_control_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        "jump",
        word_jump,
        "Jump by the popped relative distance."
    );

    add_native_word!(
        interpreter,
        "if",
        word_if,
        "Jump past the false branch when the condition is false."
    );

    add_native_word!(
        interpreter,
        "while",
        word_while,
        "Exit the enclosing loop when the condition is true."
    );

    add_native_word!(
        interpreter,
        "begin",
        word_begin,
        "Mark the start of a loop."
    );

    add_native_word!(
        interpreter,
        "until",
        word_until,
        "Loop back to the start until the condition is true."
    );

    add_native_word!(
        interpreter,
        "repeat",
        word_repeat,
        "Loop back to the start unconditionally."
    );

    add_native_word!(interpreter, "exit", word_exit, "Stop the execution.");
    add_native_word!(interpreter, "call", word_call, "Call a block by name.");

    add_native_word!(
        interpreter,
        "return",
        word_return,
        "Return to the calling block."
    );

    add_native_word!(interpreter, "nop", word_nop, "Do nothing.");

    // An unclaimed free then survives resolution and lands here.
    add_native_word!(interpreter, "then", word_nop, "Do nothing.");
    add_native_word!(interpreter, ";", word_nop, "Do nothing.");
}
