/// The value type that lives on the interpreter's operand stack and in its variable maps.
pub mod value;
