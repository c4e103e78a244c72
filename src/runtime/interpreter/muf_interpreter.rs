use std::{
    collections::HashMap,
    mem,
    rc::Rc,
    time::{Duration, Instant},
};

use crate::{
    lang::code::{Callable, Instruction, Program},
    runtime::{
        built_ins,
        data_structures::value::Value,
        error::{self, Fault, RuntimeReport, ScriptError},
        interpreter::{
            CallFrame, ExecutionControl, Interpreter, InterpreterStack, Pointer, Snapshot,
            VariableAccess, WordHandler, WordHandlerInfo, WordManagement,
        },
    },
};

/// How many commands an execution may run before it is presumed stuck.  A ceiling of zero
/// disables the check.
pub const DEFAULT_COMMAND_MAXIMUM: usize = 200;

/// The interpreter.  Holds the native operation table, the compiled callables, the operand
/// stack, the variable scopes, and all of the execution state for one run at a time.
///
/// An execution is started with `call` or `execute` and normally runs to completion inside that
/// call.  With a cycle quota or a cycle time configured the run instead pauses cooperatively,
/// and the host resumes it by calling `update` until it reports completion.
pub struct MufInterpreter {
    commands: HashMap<String, WordHandlerInfo>,
    callable_functions: HashMap<String, Rc<Callable>>,

    stack: Vec<Value>,
    global_variables: HashMap<String, Value>,
    local_variables: HashMap<String, Value>,

    callable: Option<Rc<Callable>>,
    instruction_pointer: Pointer,
    jump_target: Option<usize>,
    loop_starts: Vec<usize>,
    call_stack: Vec<CallFrame>,

    command_maximum: usize,
    command_count: usize,

    stack_debug: bool,
    frame_snapshots: Vec<Snapshot>,

    cycle_time: Option<Duration>,
    cycle_ops: Option<usize>,
    last_update_time: Instant,
}

impl Default for MufInterpreter {
    fn default() -> MufInterpreter {
        MufInterpreter::new()
    }
}

impl MufInterpreter {
    /// Create a new interpreter with the standard operation set registered.
    pub fn new() -> MufInterpreter {
        let mut interpreter = MufInterpreter {
            commands: HashMap::new(),
            callable_functions: HashMap::new(),

            stack: Vec::new(),
            global_variables: HashMap::new(),
            local_variables: HashMap::new(),

            callable: None,
            instruction_pointer: Pointer::At(0),
            jump_target: None,
            loop_starts: Vec::new(),
            call_stack: Vec::new(),

            command_maximum: DEFAULT_COMMAND_MAXIMUM,
            command_count: 0,

            stack_debug: true,
            frame_snapshots: Vec::new(),

            cycle_time: None,
            cycle_ops: None,
            last_update_time: Instant::now(),
        };

        built_ins::register_builtin_words(&mut interpreter);

        interpreter
    }

    /// Make a compiled program's callables available for calling.
    pub fn register_program(&mut self, program: &Program) {
        for (name, callable) in program.callables() {
            self.callable_functions
                .insert(name.clone(), callable.clone());
        }
    }

    /// Set the command ceiling.  Zero disables runaway protection entirely.
    pub fn set_command_maximum(&mut self, maximum: usize) {
        self.command_maximum = maximum;
    }

    /// How many commands the current execution has run so far.
    pub fn command_count(&self) -> usize {
        self.command_count
    }

    /// Limit how many commands one `update` call may run before pausing.
    pub fn set_cycle_ops(&mut self, ops: Option<usize>) {
        self.cycle_ops = ops;
    }

    /// Require a minimum delay between `update` calls doing any work.
    pub fn set_cycle_time(&mut self, time: Option<Duration>) {
        self.cycle_time = time;
    }

    /// Enable or disable the per-instruction snapshots used by the fatal error reports.
    pub fn set_stack_debug(&mut self, enabled: bool) {
        self.stack_debug = enabled;
    }

    /// The global variable scope.
    pub fn global_variables(&self) -> &HashMap<String, Value> {
        &self.global_variables
    }

    /// The snapshots captured so far for the current execution.
    pub fn frame_snapshots(&self) -> &Vec<Snapshot> {
        &self.frame_snapshots
    }

    /// Start executing a callable from the top, resetting all per-execution state.  Returns
    /// true when the run completed, or false when it paused cooperatively.
    pub fn execute(&mut self, callable: Rc<Callable>) -> error::Result<bool> {
        self.callable = Some(callable);
        self.local_variables.clear();
        self.instruction_pointer = Pointer::At(0);
        self.jump_target = None;
        self.loop_starts.clear();
        self.call_stack.clear();
        self.command_count = 0;
        self.frame_snapshots.clear();

        self.update()
    }

    /// Start executing a compiled callable by name.
    pub fn call(&mut self, name: &str) -> error::Result<bool> {
        match self.callable_functions.get(name).cloned() {
            Some(callable) => self.execute(callable),

            None => Err(ScriptError::Type(format!(
                "'{}' is not a compiled callable.",
                name
            ))),
        }
    }

    /// Run one cycle of the current execution, honoring the cycle time gate.  A recoverable
    /// fault raised during the cycle is wrapped up into a fatal report here, while the state it
    /// describes is still intact.
    pub fn update(&mut self) -> error::Result<bool> {
        if let Some(cycle_time) = self.cycle_time {
            if self.last_update_time.elapsed() < cycle_time {
                return Ok(false);
            }
        }

        self.last_update_time = Instant::now();

        match self.run_cycle() {
            Err(ScriptError::Runtime(fault)) => {
                Err(ScriptError::Fatal(Box::new(self.capture_report(fault))))
            }

            result => result,
        }
    }

    /// Run instructions until the execution completes, pauses on its cycle quota, or faults.
    /// Returns true on completion and false on a pause.
    fn run_cycle(&mut self) -> error::Result<bool> {
        let mut cycle_count = 0;

        loop {
            let callable = match self.callable.clone() {
                Some(callable) => callable,

                None => {
                    return Err(ScriptError::Type(
                        "No callable is currently executing.".to_string(),
                    ));
                }
            };

            let index = match self.instruction_pointer {
                Pointer::At(index) => index,
                Pointer::Halted => return Ok(true),
            };

            // Running off the end of the payload is an implicit return.
            if index >= callable.payload.len() {
                match self.call_stack.pop() {
                    Some(frame) => {
                        self.callable = Some(frame.callable);
                        self.local_variables = frame.local_variables;
                        self.instruction_pointer = Pointer::At(frame.return_pointer + 1);
                        continue;
                    }

                    None => return Ok(true),
                }
            }

            if let Some(quota) = self.cycle_ops {
                if cycle_count >= quota {
                    return Ok(false);
                }
            }

            if self.stack_debug {
                self.frame_snapshots.push(Snapshot {
                    stack: self.stack.clone(),
                    pointer: self.instruction_pointer,
                    callable: callable.clone(),
                });
            }

            match &callable.payload[index] {
                Instruction::Number(value) => self.push(Value::Number(*value)),
                Instruction::Text(text) => self.push(Value::Text(text.clone())),

                Instruction::Word(word) => match self.commands.get(word).cloned() {
                    Some(info) => (info.handler)(self)?,
                    None => return error::fault(Fault::UnknownOperation(word.clone())),
                },
            }

            if self.instruction_pointer == Pointer::Halted {
                return Ok(true);
            }

            self.instruction_pointer = match self.jump_target.take() {
                Some(target) => Pointer::At(target),
                None => Pointer::At(index + 1),
            };

            self.command_count += 1;
            cycle_count += 1;

            if self.command_maximum > 0 && self.command_count >= self.command_maximum {
                return error::fault(Fault::RunawayExecution(self.command_count));
            }
        }
    }

    /// Gather everything known about a faulted execution into a report, before the next call
    /// resets the state.
    fn capture_report(&self, fault: Fault) -> RuntimeReport {
        let callable_name = match &self.callable {
            Some(callable) => callable.name.clone(),
            None => "<none>".to_string(),
        };

        let pointer = match (self.instruction_pointer, &self.callable) {
            (Pointer::At(index), Some(callable)) if index < callable.payload.len() => {
                format!("{} ({})", index, callable.payload[index])
            }

            (Pointer::At(index), _) => format!("{} <out of bounds>", index),
            (Pointer::Halted, _) => "<halted>".to_string(),
        };

        let snapshots = self
            .frame_snapshots
            .iter()
            .enumerate()
            .map(|(index, snapshot)| snapshot.render(index))
            .collect();

        // Disassemble the faulting callable and then each distinct caller, innermost first.
        let mut disassembled: Vec<&Rc<Callable>> = Vec::new();

        if let Some(callable) = &self.callable {
            disassembled.push(callable);
        }

        for frame in self.call_stack.iter().rev() {
            if !disassembled
                .iter()
                .any(|seen| seen.name == frame.callable.name)
            {
                disassembled.push(&frame.callable);
            }
        }

        let disassembly = disassembled
            .iter()
            .map(|callable| {
                format!(
                    "Callable '{}'\nLength: {}\n{}",
                    callable.name,
                    callable.payload.len(),
                    callable.disassemble()
                )
            })
            .collect::<Vec<String>>()
            .join("\n");

        RuntimeReport {
            fault,
            stack: self.stack.clone(),
            pointer,
            callable_name,
            snapshots,
            disassembly,
        }
    }
}

impl InterpreterStack for MufInterpreter {
    fn stack(&self) -> &Vec<Value> {
        &self.stack
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> error::Result<Value> {
        match self.stack.pop() {
            Some(value) => Ok(value),
            None => error::fault(Fault::StackUnderflow),
        }
    }
}

impl ExecutionControl for MufInterpreter {
    fn instruction_pointer(&self) -> Pointer {
        self.instruction_pointer
    }

    fn jump_relative(&mut self, offset: i64) -> error::Result<()> {
        let Pointer::At(index) = self.instruction_pointer else {
            return Ok(());
        };

        let target = index as i64 + offset;

        if target < 0 {
            return error::fault(Fault::InvalidJumpTarget(target));
        }

        self.jump_target = Some(target as usize);
        Ok(())
    }

    fn jump_absolute(&mut self, target: usize) {
        self.jump_target = Some(target);
    }

    fn request_halt(&mut self) {
        self.instruction_pointer = Pointer::Halted;
    }

    fn mark_loop_start(&mut self) {
        if let Pointer::At(index) = self.instruction_pointer {
            self.loop_starts.push(index + 1);
        }
    }

    fn drop_loop_start(&mut self) -> error::Result<()> {
        match self.loop_starts.pop() {
            Some(_) => Ok(()),
            None => error::fault(Fault::LoopStackUnderflow),
        }
    }

    fn jump_to_loop_start(&mut self) -> error::Result<()> {
        match self.loop_starts.last() {
            Some(target) => {
                self.jump_target = Some(*target);
                Ok(())
            }

            None => error::fault(Fault::LoopStackUnderflow),
        }
    }

    fn call_block(&mut self, name: &str) -> error::Result<()> {
        let callee = match self.callable_functions.get(name).cloned() {
            Some(callable) => callable,
            None => return error::fault(Fault::UnknownCallable(name.to_string())),
        };

        let Pointer::At(index) = self.instruction_pointer else {
            return Ok(());
        };

        let caller = match self.callable.clone() {
            Some(callable) => callable,

            None => {
                return Err(ScriptError::Type(
                    "No callable is currently executing.".to_string(),
                ));
            }
        };

        self.call_stack.push(CallFrame {
            callable: caller,
            return_pointer: index,
            local_variables: mem::take(&mut self.local_variables),
        });

        self.callable = Some(callee);
        self.jump_target = Some(0);

        Ok(())
    }

    fn return_to_caller(&mut self) -> error::Result<()> {
        match self.call_stack.pop() {
            Some(frame) => {
                self.callable = Some(frame.callable);
                self.local_variables = frame.local_variables;
                self.jump_target = Some(frame.return_pointer + 1);
                Ok(())
            }

            None => error::fault(Fault::CallStackUnderflow),
        }
    }
}

impl VariableAccess for MufInterpreter {
    fn store_variable(&mut self, name: &str, value: Value) {
        let is_local = self.local_variables.contains_key(name)
            || self
                .callable
                .as_ref()
                .map(|callable| callable.declares_local(name))
                .unwrap_or(false);

        if is_local {
            self.local_variables.insert(name.to_string(), value);
        } else {
            self.global_variables.insert(name.to_string(), value);
        }
    }

    fn fetch_variable(&self, name: &str) -> error::Result<Value> {
        if let Some(value) = self.local_variables.get(name) {
            return Ok(value.clone());
        }

        // A declared local shadows any global of the same name, even before it is set.
        let declared_local = self
            .callable
            .as_ref()
            .map(|callable| callable.declares_local(name))
            .unwrap_or(false);

        if declared_local {
            return error::fault(Fault::UnknownVariable(name.to_string()));
        }

        match self.global_variables.get(name) {
            Some(value) => Ok(value.clone()),
            None => error::fault(Fault::UnknownVariable(name.to_string())),
        }
    }
}

impl WordManagement for MufInterpreter {
    fn add_word(&mut self, name: String, handler: Rc<WordHandler>, description: String) {
        self.commands.insert(
            name.clone(),
            WordHandlerInfo {
                name,
                description,
                handler,
            },
        );
    }

    fn find_word(&self, name: &str) -> Option<WordHandlerInfo> {
        self.commands.get(name).cloned()
    }
}

impl Interpreter for MufInterpreter {}
