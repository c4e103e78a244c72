use std::{
    fmt::{self, Display, Formatter},
    process::{ExitCode, Termination},
};

use crate::{lang::source_buffer::SourceLocation, runtime::data_structures::value::Value};

/// A compile time diagnostic.  Carries the offending source line and a caret pointer when the
/// failing stage could attribute the problem to a specific token.
#[derive(Clone, PartialEq, Debug)]
pub struct CompileDiagnostic {
    /// The human readable description of what went wrong.
    pub message: String,

    /// Where in the source text the problem was found, if known.
    pub location: Option<SourceLocation>,

    /// The text of the offending source line, if available.
    pub source_line: Option<String>,

    /// The caret line that points at the offending token within the source line.
    pub pointer: Option<String>,
}

impl CompileDiagnostic {
    /// Create a fully positioned diagnostic.
    pub fn new(
        message: String,
        location: Option<SourceLocation>,
        source_line: Option<String>,
        pointer: Option<String>,
    ) -> CompileDiagnostic {
        CompileDiagnostic {
            message,
            location,
            source_line,
            pointer,
        }
    }

    /// Create a diagnostic with no source position.  Used by the stages that work on the
    /// instruction payload after the token positions have been dropped.
    pub fn bare(message: String) -> CompileDiagnostic {
        CompileDiagnostic {
            message,
            location: None,
            source_line: None,
            pointer: None,
        }
    }
}

impl Display for CompileDiagnostic {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "Compile error {}: {}", location, self.message)?,
            None => write!(f, "Compile error: {}", self.message)?,
        }

        if let Some(source_line) = &self.source_line {
            write!(f, "\n{}", source_line)?;
        }

        if let Some(pointer) = &self.pointer {
            write!(f, "\n{}", pointer)?;
        }

        Ok(())
    }
}

/// The recoverable runtime failures a native operation can raise.  A fault halts the current
/// execution but leaves the interpreter itself usable, so the faulting cycle can be wrapped up
/// into a full diagnostic report.
#[derive(Clone, PartialEq, Debug)]
pub enum Fault {
    /// An operation needed more operands than the stack held.
    StackUnderflow,

    /// A variable fetch or store named a variable that was never given a value.
    UnknownVariable(String),

    /// An instruction named an operation missing from the command table.
    UnknownOperation(String),

    /// A call named a block that was never compiled.
    UnknownCallable(String),

    /// An integer division or modulo by zero.
    DivideByZero,

    /// A loop operation ran with no enclosing loop.
    LoopStackUnderflow,

    /// A return ran with no caller to return to.
    CallStackUnderflow,

    /// A jump would have landed at a negative payload index.
    InvalidJumpTarget(i64),

    /// A string operand could not be coerced to a number.
    NotANumber(String),

    /// The command ceiling was reached, the program is assumed to be stuck.
    RunawayExecution(usize),
}

impl Display for Fault {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Fault::StackUnderflow => write!(f, "Stack underflow."),
            Fault::UnknownVariable(name) => write!(f, "Variable '{}' does not exist.", name),
            Fault::UnknownOperation(name) => write!(f, "Unknown operation '{}'.", name),
            Fault::UnknownCallable(name) => write!(f, "Unknown callable '{}'.", name),
            Fault::DivideByZero => write!(f, "Divide by zero."),
            Fault::LoopStackUnderflow => write!(f, "Loop operation outside of a loop."),
            Fault::CallStackUnderflow => write!(f, "Return without a caller."),
            Fault::InvalidJumpTarget(target) => write!(f, "Invalid jump target {}.", target),

            Fault::NotANumber(text) => {
                write!(f, "The value {:?} can not be used as a number.", text)
            }

            Fault::RunawayExecution(count) => {
                write!(f, "Execution exceeded the {} command ceiling.", count)
            }
        }
    }
}

/// Everything the interpreter could capture about a failed execution.  Built at the moment a
/// fault surfaces, before the interpreter's state is reset for the next call.
#[derive(Clone, PartialEq, Debug)]
pub struct RuntimeReport {
    /// The fault that halted the execution.
    pub fault: Fault,

    /// The operand stack at the time of the fault, bottom first.
    pub stack: Vec<Value>,

    /// The instruction pointer and the instruction it referred to, already rendered.
    pub pointer: String,

    /// The name of the callable that was executing.
    pub callable_name: String,

    /// Per-instruction stack snapshots leading up to the fault, already rendered.
    pub snapshots: Vec<String>,

    /// Disassembly of the faulting callable and of every caller on the call stack.
    pub disassembly: String,
}

impl Display for RuntimeReport {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(
            f,
            "Runtime error in callable '{}': {}",
            self.callable_name, self.fault
        )?;

        writeln!(f, "Instruction pointer: {}", self.pointer)?;

        write!(f, "Stack: [")?;

        for (index, value) in self.stack.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }

            write!(f, "{}", value)?;
        }

        writeln!(f, "]")?;

        if !self.snapshots.is_empty() {
            writeln!(f, "\nExecution trace:")?;

            for snapshot in &self.snapshots {
                writeln!(f, "{}", snapshot)?;
            }
        }

        write!(f, "\n{}", self.disassembly)
    }
}

/// The set of errors the compiler and interpreter can produce.
#[derive(Clone, PartialEq)]
pub enum ScriptError {
    /// The source text could not be compiled.
    Compile(CompileDiagnostic),

    /// The interpreter was used incorrectly from the host side.
    Type(String),

    /// A recoverable fault raised inside an executing operation.  The interpreter's update loop
    /// converts these into full fatal reports before they reach the caller.
    Runtime(Fault),

    /// A fault together with the diagnostic report captured at the moment it surfaced.
    Fatal(Box<RuntimeReport>),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ScriptError::Compile(diagnostic) => write!(f, "{}", diagnostic),
            ScriptError::Type(message) => write!(f, "{}", message),
            ScriptError::Runtime(fault) => write!(f, "{}", fault),
            ScriptError::Fatal(report) => write!(f, "{}", report),
        }
    }
}

/// Keep the Debug formatting identical to Display so that returning an error from main prints
/// the readable report instead of the structure dump.
impl fmt::Debug for ScriptError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Termination for ScriptError {
    fn report(self) -> ExitCode {
        eprintln!("{}", self);
        ExitCode::FAILURE
    }
}

impl From<std::io::Error> for ScriptError {
    fn from(error: std::io::Error) -> ScriptError {
        ScriptError::Type(error.to_string())
    }
}

impl ScriptError {
    /// The fault behind the error, if it was a runtime failure.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            ScriptError::Runtime(fault) => Some(fault),
            ScriptError::Fatal(report) => Some(&report.fault),
            _ => None,
        }
    }
}

/// Result type used throughout the compiler and interpreter.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Raise a recoverable runtime fault from inside an executing operation.
pub fn fault<T>(fault: Fault) -> Result<T> {
    Err(ScriptError::Runtime(fault))
}
