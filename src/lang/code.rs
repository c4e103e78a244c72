use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
    rc::Rc,
};

/// One instruction in a callable block's payload.  Due to the language's simplicity there are
/// only three possibilities.  A numeric literal, a string literal, or the name of an operation
/// to dispatch through the interpreter's command table.
///
/// Block markers like `if`, `else`, and `then` are ordinary operation names until the
/// control-flow resolver rewrites them.
#[derive(Clone, PartialEq, Debug)]
pub enum Instruction {
    /// A numeric literal, pushed onto the operand stack when stepped over.
    Number(f64),

    /// A string literal, pushed onto the operand stack when stepped over.
    Text(String),

    /// The name of an operation to look up in the command table and execute.
    Word(String),
}

/// Render the instruction as one line of disassembly.  String literals are rendered quoted,
/// numeric literals in decimal form, and operation names bare.
impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Instruction::Number(value) => {
                if value.is_finite() && value.fract() == 0.0 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{}", value)
                }
            }

            Instruction::Text(text) => write!(f, "{:?}", text),
            Instruction::Word(word) => write!(f, "{}", word),
        }
    }
}

impl Instruction {
    /// Check if the instruction is the named operation.
    pub fn is_word(&self, name: &str) -> bool {
        matches!(self, Instruction::Word(word) if word == name)
    }
}

/// One named, independently invocable instruction sequence.  Created once by the compiler and
/// immutable afterwards, which is why the interpreter can share callables freely between the
/// program map, the call stack, and the diagnostic snapshots.
#[derive(Clone, PartialEq, Debug)]
pub struct Callable {
    /// The name the block was declared under.
    pub name: String,

    /// The ordered instruction sequence, with all control-flow markers already resolved.
    pub payload: Vec<Instruction>,

    /// The variable names declared local to this block.
    pub local_variables: Vec<String>,

    /// The variable names declared global on this block.
    pub global_variables: Vec<String>,
}

impl Callable {
    /// Create a new callable block.
    pub fn new(
        name: String,
        payload: Vec<Instruction>,
        local_variables: Vec<String>,
        global_variables: Vec<String>,
    ) -> Callable {
        Callable {
            name,
            payload,
            local_variables,
            global_variables,
        }
    }

    /// Check if the given name was declared as a local variable on this block.
    pub fn declares_local(&self, name: &str) -> bool {
        self.local_variables.iter().any(|local| local == name)
    }

    /// Pretty print the payload for the diagnostic reports.  One line per instruction, prefixed
    /// with its payload index.
    pub fn disassemble(&self) -> String {
        use std::fmt::Write;

        let mut result = String::with_capacity(self.payload.len() * 16);

        for (index, instruction) in self.payload.iter().enumerate() {
            writeln!(&mut result, "{:4}: {}", index, instruction)
                .expect("Writing to String should never fail.");
        }

        result
    }
}

/// A compiled program.  A mapping from callable name to callable, owned by the compiler's output
/// and borrowed by the interpreter for the duration of a call.
#[derive(Clone, Default, Debug)]
pub struct Program {
    callables: HashMap<String, Rc<Callable>>,
}

impl Program {
    /// Create a new, empty program.
    pub fn new() -> Program {
        Program {
            callables: HashMap::new(),
        }
    }

    /// Publish a callable under its declared name.
    pub fn insert(&mut self, callable: Callable) {
        self.callables
            .insert(callable.name.clone(), Rc::new(callable));
    }

    /// Look up a callable by name.
    pub fn get(&self, name: &str) -> Option<Rc<Callable>> {
        self.callables.get(name).cloned()
    }

    /// Check if a callable name is already taken.
    pub fn contains(&self, name: &str) -> bool {
        self.callables.contains_key(name)
    }

    /// All of the program's callables, indexed by name.
    pub fn callables(&self) -> &HashMap<String, Rc<Callable>> {
        &self.callables
    }
}
