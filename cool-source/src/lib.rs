//! Source code representation and error management.

use std::{
    cell::{Ref, RefCell},
    fmt,
};

/// Represents source code of a single compilation unit.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Accumulated errors.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        !self.errors.had_error()
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// The compilation stage that produced a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized character or unterminated string.
    Lexical,
    /// Missing token, invalid assignment target, malformed declaration.
    Syntax,
    /// Too many parameters or arguments. Does not interrupt parsing.
    Capacity,
    /// The source file is missing, unreadable or has the wrong extension.
    File,
}

/// Where a [`Diagnostic`] points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// No position is known (e.g. driver errors).
    Unknown,
    Line(usize),
    /// The end of input on the given line.
    End(usize),
    /// A specific token.
    Lexeme { line: usize, lexeme: String },
}

impl Location {
    pub fn line(&self) -> Option<usize> {
        match self {
            Location::Unknown => None,
            Location::Line(line) | Location::End(line) | Location::Lexeme { line, .. } => {
                Some(*line)
            }
        }
    }
}

impl From<usize> for Location {
    fn from(line: usize) -> Self {
        Location::Line(line)
    }
}

/// A single recorded error.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic with the specified `kind`, `location` and `message`.
    pub fn new(kind: ErrorKind, location: impl Into<Location>, message: impl ToString) -> Self {
        Self {
            kind,
            location: location.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Location::Unknown => write!(f, "Error: {}", self.message),
            Location::Line(line) => write!(f, "[line {}] Error: {}", line, self.message),
            Location::End(line) => write!(f, "[line {}] at end: {}", line, self.message),
            Location::Lexeme { line, lexeme } => {
                write!(f, "[line {}] at '{}': {}", line, lexeme, self.message)
            }
        }
    }
}

/// Manages all the errors of a compilation unit.
pub struct ErrorReporter {
    errors: RefCell<Vec<Diagnostic>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Records an already built [`Diagnostic`].
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn report(&self, diagnostic: Diagnostic) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(diagnostic);
    }

    /// Formats and records an error at `location`.
    pub fn error(&self, kind: ErrorKind, location: impl Into<Location>, message: impl ToString) {
        self.report(Diagnostic::new(kind, location, message));
    }

    pub fn had_error(&self) -> bool {
        !self.errors.borrow().is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.borrow().len()
    }

    /// Returns all the recorded diagnostics in the order they were reported.
    pub fn diagnostics(&self) -> Ref<'_, [Diagnostic]> {
        Ref::map(self.errors.borrow(), |errors| errors.as_slice())
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.borrow();
        for error in errors.iter() {
            writeln!(f, "{}", error)?;
        }

        Ok(())
    }
}
