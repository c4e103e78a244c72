use crate::runtime::interpreter::Interpreter;

/// The arithmetic operations.
pub mod arithmetic_words;

/// The comparison and logic operations.
pub mod comparison_words;

/// The control-flow operations.
pub mod control_words;

/// The console output operations.
pub mod io_words;

/// The stack shuffling operations.
pub mod stack_words;

/// The string operations.
pub mod string_words;

/// The variable store and fetch operations.
pub mod variable_words;

/// Register the standard operation set with an interpreter.
pub fn register_builtin_words(interpreter: &mut dyn Interpreter) {
    arithmetic_words::register_arithmetic_words(interpreter);
    comparison_words::register_comparison_words(interpreter);
    control_words::register_control_words(interpreter);
    io_words::register_io_words(interpreter);
    stack_words::register_stack_words(interpreter);
    string_words::register_string_words(interpreter);
    variable_words::register_variable_words(interpreter);
}
