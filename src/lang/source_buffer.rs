use std::fmt::{self, Display, Formatter};

/// The location in the source code where a token was found.  This structure is used all over the
/// compiler and interpreter to keep track of where important things were found in the source code.
/// This is used extensively in the error reporting.
///
/// This is a read-only structure.  Use the field accessor methods to get the values.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SourceLocation {
    /// The 1 based line number in the source code where the token was found.
    line: usize,

    /// The 1 based column number in the source code where the token was found.
    column: usize,
}

/// Used for error reporting to show where in the source code an error originated.
impl Display for SourceLocation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(formatter, "({}, {})", self.line, self.column)
    }
}

impl SourceLocation {
    /// Create a new SourceLocation with all of the needed information.
    pub fn new(line: usize, column: usize) -> SourceLocation {
        SourceLocation { line, column }
    }

    /// The 1 based line number in the source code.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The 1 based column number in the source code.
    pub fn column(&self) -> usize {
        self.column
    }
}

/// The comment-stripped source text, split into lines and kept around so that diagnostics can
/// reproduce the offending line underneath an error message.
///
/// The lines are owned by this structure, so it can outlive the string it was built from.
pub struct SourceLines {
    lines: Vec<String>,
}

impl SourceLines {
    /// Split the given source text into lines for later lookup.
    pub fn new(source: &str) -> SourceLines {
        SourceLines {
            lines: source.lines().map(|line| line.to_string()).collect(),
        }
    }

    /// Get the text of a 1 based line number, if the line exists.
    pub fn line(&self, number: usize) -> Option<&str> {
        if number == 0 {
            return None;
        }

        self.lines.get(number - 1).map(|line| line.as_str())
    }
}
