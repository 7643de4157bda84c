//! Compiler driver: checks and loads source files, runs the front end stage by stage and reports diagnostics.

use console::style;
use cool_parser::ast::Stmt;
use cool_parser::lexer::scan;
use cool_parser::parser::Parser;
use cool_parser::printer::AstPrinter;
use cool_parser::token::Token;
use cool_source::{Diagnostic, ErrorKind, Location, Source};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of cool source files.
pub const FILE_EXTENSION: &str = "cl";

/// Log the progress of each stage to stderr.
const DUMP_STAGES: bool = false;

pub const USAGE: &str = "Usage: coolc [--tokens] [--no-ast] [file.cl]";

/// Outcome of a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilationResult {
    Success,
    /// The file does not have the `.cl` extension.
    FileError,
    FileNotFound,
    LexicalError,
    SyntaxError,
}

impl CompilationResult {
    /// Process exit code for this result.
    pub fn exit_code(self) -> i32 {
        match self {
            CompilationResult::Success => 0,
            CompilationResult::FileError => 64,
            CompilationResult::FileNotFound => 66,
            CompilationResult::LexicalError | CompilationResult::SyntaxError => 65,
        }
    }
}

/// What the driver prints after each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Print the scanned tokens.
    pub dump_tokens: bool,
    /// Print the syntax tree.
    pub dump_ast: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dump_tokens: false,
            dump_ast: true,
        }
    }
}

impl Options {
    /// Parses command line arguments (without the program name).
    /// Returns the options and the positional arguments, or the first unknown flag.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<(Self, Vec<String>), String> {
        let mut options = Self::default();
        let mut positional = Vec::new();

        for arg in args {
            match arg.as_str() {
                "--tokens" => options.dump_tokens = true,
                "--no-ast" => options.dump_ast = false,
                flag if flag.starts_with("--") => return Err(arg),
                _ => positional.push(arg),
            }
        }

        Ok((options, positional))
    }
}

/// Scans `source`. Fails if any lexical error was reported.
pub fn lex(source: &Source) -> Result<Vec<Token>, CompilationResult> {
    let tokens = scan(source);
    if source.errors.had_error() {
        return Err(CompilationResult::LexicalError);
    }
    Ok(tokens)
}

/// Parses `tokens`. Fails if any syntax error was reported.
pub fn parse(tokens: Vec<Token>, source: &Source) -> Result<Vec<Stmt>, CompilationResult> {
    let ast = Parser::with_tokens(tokens, source).parse_program();
    if source.errors.had_error() {
        return Err(CompilationResult::SyntaxError);
    }
    Ok(ast)
}

/// Runs the lexer and the parser, stopping after the first stage that reports errors.
/// The diagnostics are left in `source.errors`.
pub fn front_end(source: &Source) -> Result<Vec<Stmt>, CompilationResult> {
    let tokens = lex(source)?;
    parse(tokens, source)
}

/// Runs the front end on `source` and prints what `options` asks for.
/// Diagnostics are not printed, see [`print_diagnostics`].
pub fn run(source: &Source, options: Options) -> CompilationResult {
    let tokens = match lex(source) {
        Ok(tokens) => tokens,
        Err(result) => return result,
    };
    if DUMP_STAGES {
        eprintln!("scanned {} tokens", tokens.len());
    }

    if options.dump_tokens {
        println!("Tokens:");
        for token in &tokens {
            println!("{}", token);
        }
    }

    let ast = match parse(tokens, source) {
        Ok(ast) => ast,
        Err(result) => return result,
    };
    if DUMP_STAGES {
        eprintln!("parsed {} statements", ast.len());
    }

    if options.dump_ast {
        print!("{}", AstPrinter::print(&ast));
    }

    CompilationResult::Success
}

/// Writes a diagnostic to stderr.
pub fn print_diagnostic(diagnostic: &Diagnostic) {
    eprintln!("{}", style(diagnostic).for_stderr().red());
}

/// Writes all diagnostics of `source` to stderr, one per line.
pub fn print_diagnostics(source: &Source) {
    for diagnostic in source.errors.diagnostics().iter() {
        print_diagnostic(diagnostic);
    }
}

/// Compiles a single source file.
pub struct Compiler {
    path: PathBuf,
    options: Options,
}

impl Compiler {
    pub fn new(path: impl Into<PathBuf>, options: Options) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Returns `true` if `path` has the `.cl` extension.
    pub fn check_file(path: &Path) -> bool {
        path.extension().map_or(false, |ext| ext == FILE_EXTENSION)
    }

    pub fn compile(&self) -> CompilationResult {
        if !Self::check_file(&self.path) {
            print_diagnostic(&Diagnostic::new(
                ErrorKind::File,
                Location::Unknown,
                "Unsupported file extension, please provide a .cl file",
            ));
            return CompilationResult::FileError;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                print_diagnostic(&Diagnostic::new(
                    ErrorKind::File,
                    Location::Unknown,
                    format!("Cannot read '{}': {}", self.path.display(), err),
                ));
                return CompilationResult::FileNotFound;
            }
        };

        let source = Source::new(&content);
        let result = run(&source, self.options);
        print_diagnostics(&source);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_options_from_args() {
        assert_eq!(
            Options::from_args(args(&["main.cl"])),
            Ok((Options::default(), args(&["main.cl"])))
        );
        assert_eq!(
            Options::from_args(args(&["--tokens", "--no-ast", "main.cl"])),
            Ok((
                Options {
                    dump_tokens: true,
                    dump_ast: false
                },
                args(&["main.cl"])
            ))
        );
        assert_eq!(
            Options::from_args(args(&["--verbose"])),
            Err("--verbose".to_string())
        );
    }

    #[test]
    fn test_check_file() {
        assert!(Compiler::check_file(Path::new("main.cl")));
        assert!(Compiler::check_file(Path::new("dir/main.cl")));
        assert!(!Compiler::check_file(Path::new("main.cool")));
        assert!(!Compiler::check_file(Path::new("main")));
        assert!(!Compiler::check_file(Path::new("cl")));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CompilationResult::Success.exit_code(), 0);
        assert_eq!(CompilationResult::FileError.exit_code(), 64);
        assert_eq!(CompilationResult::FileNotFound.exit_code(), 66);
        assert_eq!(CompilationResult::LexicalError.exit_code(), 65);
        assert_eq!(CompilationResult::SyntaxError.exit_code(), 65);
    }

    #[test]
    fn test_compile_rejects_extension() {
        let compiler = Compiler::new("missing.txt", Options::default());
        assert_eq!(compiler.compile(), CompilationResult::FileError);
    }

    #[test]
    fn test_compile_missing_file() {
        let compiler = Compiler::new("does/not/exist.cl", Options::default());
        assert_eq!(compiler.compile(), CompilationResult::FileNotFound);
    }
}
