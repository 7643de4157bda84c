use cool::{print_diagnostics, run, Compiler, Options, USAGE};
use cool_source::Source;
use std::env;
use std::io::{self, Write};
use std::process;

fn main() {
    let (options, files) = match Options::from_args(env::args().skip(1)) {
        Ok(parsed) => parsed,
        Err(flag) => {
            eprintln!("Unknown flag '{}'.", flag);
            usage();
        }
    };

    match files.as_slice() {
        [] => repl(options),
        [file] => {
            let result = Compiler::new(file, options).compile();
            process::exit(result.exit_code());
        }
        _ => usage(),
    }
}

fn usage() -> ! {
    eprintln!("{}", USAGE);
    process::exit(64);
}

/// Reads one line at a time and runs the front end on it until end of input.
fn repl(options: Options) {
    let mut stdout = io::stdout();
    let stdin = io::stdin();
    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }

        let source = Source::new(&input);
        run(&source, options);
        print_diagnostics(&source);
    }
}
