use std::io::{self, Write};

use nolang_core::{eval::prelude::Interpreter, lexer::prelude::scan, parser::prelude::parse};

const PROMPT: &str = ">>> ";
const CONTINUE_PROMPT: &str = "... ";
const UNIT: &str = "<stdin>";

/// The interactive shell. One interpreter lives for the whole session,
/// so bindings carry over from line to line; expression results echo.
pub fn start() -> io::Result<()> {
    let _ = ctrlc::set_handler(|| {
        println!();
        std::process::exit(0);
    });

    println!("nolang {}", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let mut interpreter = Interpreter::new();
    interpreter.echo = true;

    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            println!();
            return Ok(());
        }

        trim_newline(&mut input);

        // A trailing backslash asks for another line.
        while input.ends_with('\\') {
            input.pop();
            input.push('\n');

            print!("{CONTINUE_PROMPT}");
            io::stdout().flush()?;

            let mut next = String::new();
            if stdin.read_line(&mut next)? == 0 {
                break;
            }

            trim_newline(&mut next);
            input.push_str(&next);
        }

        match input.as_str() {
            "" => {}
            "exit" => return Ok(()),
            _ => run_line(&mut interpreter, &input),
        }
    }
}

fn run_line(interpreter: &mut Interpreter, input: &str) {
    // Interactive units end in a newline, exactly like a file would.
    let source = format!("{input}\n");

    let tokens = match scan(&source, UNIT) {
        Ok(tokens) => tokens,
        Err(errors) => return report(&errors),
    };

    let program = match parse(tokens, UNIT) {
        Ok(program) => program,
        Err(errors) => return report(&errors),
    };

    if let Err(error) = interpreter.explore(&program) {
        eprintln!("{error}");
    }
}

fn report<E: std::fmt::Display>(errors: &[E]) {
    for error in errors {
        eprintln!("{error}");
    }
}

fn trim_newline(input: &mut String) {
    while input.ends_with('\n') || input.ends_with('\r') {
        input.pop();
    }
}
