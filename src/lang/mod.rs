/// Module for managing the original source code.
pub mod source_buffer;

/// Module for managing the turning of the source code into a list of tokens for further processing.
pub mod tokenizing;

/// Module for validating the shape of the token stream before the blocks are built.
pub mod syntax;

/// Module for defining the instructions executed by the muf interpreter and the callable blocks
/// that hold them.
pub mod code;

/// Module for resolving the structured control constructs into jump distances the interpreter can
/// step through directly.
pub mod control_flow;

/// Module for compiling source text into a program of named callable blocks.
pub mod compiler;
