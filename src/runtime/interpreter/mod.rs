use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
    rc::Rc,
};

use crate::{
    lang::code::Callable,
    runtime::{data_structures::value::Value, error},
};

/// The concrete interpreter implementation.
pub mod muf_interpreter;

/// The signature all native operations implement.  An operation receives the interpreter it is
/// running in and manipulates its state directly.
pub type WordHandler = dyn Fn(&mut dyn Interpreter) -> error::Result<()>;

/// A registered native operation, its handler together with the bookkeeping that describes it.
#[derive(Clone)]
pub struct WordHandlerInfo {
    /// The name the operation is dispatched under.
    pub name: String,

    /// A short description of what the operation does.
    pub description: String,

    /// The function that implements the operation.
    pub handler: Rc<WordHandler>,
}

/// The interpreter's instruction pointer.  Either an index into the current callable's payload
/// or the halted state, which ends the run at the top of the next cycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pointer {
    /// Execution continues at the given payload index.
    At(usize),

    /// Execution has been asked to stop.
    Halted,
}

impl Display for Pointer {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Pointer::At(index) => write!(f, "{}", index),
            Pointer::Halted => write!(f, "<halted>"),
        }
    }
}

/// One saved call site.  Pushed when a block calls another block, popped when the callee runs
/// off the end of its payload or returns explicitly.
pub struct CallFrame {
    /// The callable to resume.
    pub(crate) callable: Rc<Callable>,

    /// The payload index of the call instruction itself.  Execution resumes just past it.
    pub(crate) return_pointer: usize,

    /// The caller's local variables, restored on return.
    pub(crate) local_variables: HashMap<String, Value>,
}

/// One per-instruction record of the interpreter's state, captured while stack debugging is
/// enabled and replayed in the fatal error reports.
#[derive(Clone)]
pub struct Snapshot {
    /// The operand stack before the instruction ran, bottom first.
    pub stack: Vec<Value>,

    /// The instruction pointer before the instruction ran.
    pub pointer: Pointer,

    /// The callable that was executing.
    pub callable: Rc<Callable>,
}

impl Snapshot {
    /// Render the snapshot as one line of the execution trace.
    pub fn render(&self, index: usize) -> String {
        let stack = self
            .stack
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<String>>()
            .join(", ");

        format!(
            "Frame {}, EIP {} in callable '{}': [{}]",
            index, self.pointer, self.callable.name, stack
        )
    }
}

/// Operations for accessing the interpreter's operand stack.
pub trait InterpreterStack {
    /// The operand stack, bottom first.
    fn stack(&self) -> &Vec<Value>;

    /// Push a value onto the stack.
    fn push(&mut self, value: Value);

    /// Pop the top value, faulting on an empty stack.
    fn pop(&mut self) -> error::Result<Value>;

    /// Pop the top value coerced to a number.
    fn pop_as_number(&mut self) -> error::Result<f64> {
        self.pop()?.as_number()
    }

    /// Pop the top value coerced to an integer.
    fn pop_as_int(&mut self) -> error::Result<i64> {
        self.pop()?.as_int()
    }

    /// Pop the top value coerced to its truthiness.
    fn pop_as_bool(&mut self) -> error::Result<bool> {
        Ok(self.pop()?.is_truthy())
    }

    /// Pop the top value coerced to text.
    fn pop_as_text(&mut self) -> error::Result<String> {
        Ok(self.pop()?.as_text())
    }
}

/// Operations for steering execution.  Everything the control-flow words need.
pub trait ExecutionControl {
    /// The current instruction pointer.
    fn instruction_pointer(&self) -> Pointer;

    /// Request a jump relative to the current instruction, taken when the current instruction
    /// finishes.  Faults if the target would land before the start of the payload.
    fn jump_relative(&mut self, offset: i64) -> error::Result<()>;

    /// Request an absolute jump within the current payload.
    fn jump_absolute(&mut self, target: usize);

    /// Ask the interpreter to stop at the top of the next cycle.
    fn request_halt(&mut self);

    /// Record the instruction after the current one as the innermost loop's start.
    fn mark_loop_start(&mut self);

    /// Discard the innermost loop start.
    fn drop_loop_start(&mut self) -> error::Result<()>;

    /// Jump back to the innermost loop's start, leaving it recorded.
    fn jump_to_loop_start(&mut self) -> error::Result<()>;

    /// Call a compiled block, saving the current site for the return.
    fn call_block(&mut self, name: &str) -> error::Result<()>;

    /// Return to the most recent caller.
    fn return_to_caller(&mut self) -> error::Result<()>;
}

/// Operations for reading and writing the interpreter's variables.
pub trait VariableAccess {
    /// Write a variable.  The scope is decided by the current callable's declarations.
    fn store_variable(&mut self, name: &str, value: Value);

    /// Read a variable, checking the local scope before the global one.
    fn fetch_variable(&self, name: &str) -> error::Result<Value>;
}

/// Operations for managing the native operation table.
pub trait WordManagement {
    /// Register a native operation, replacing any previous registration of the same name.
    fn add_word(&mut self, name: String, handler: Rc<WordHandler>, description: String);

    /// Look up a native operation by name.
    fn find_word(&self, name: &str) -> Option<WordHandlerInfo>;
}

/// The full interpreter interface the native operations are written against.
pub trait Interpreter: InterpreterStack + ExecutionControl + VariableAccess + WordManagement {}

/// Register a native operation with the interpreter.
#[macro_export]
macro_rules! add_native_word {
    ($interpreter:expr, $name:expr, $function:expr, $description:expr) => {
        $interpreter.add_word(
            $name.to_string(),
            std::rc::Rc::new($function),
            $description.to_string(),
        )
    };
}
