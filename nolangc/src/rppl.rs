use std::io::{self, Write};

use nolang_core::{lexer::prelude::scan, parser::prelude::parse};

const PROMPT: &str = ">> ";

/// Read Parse Print Loop: re-renders each input line from its parse.
pub fn start() -> io::Result<()> {
    let stdin = io::stdin();

    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            println!();
            return Ok(());
        }

        while input.ends_with('\n') || input.ends_with('\r') {
            input.pop();
        }

        match input.as_str() {
            "" => {}
            "exit" => return Ok(()),
            _ => {
                let source = format!("{input}\n");

                let tokens = match scan(&source, "<stdin>") {
                    Ok(tokens) => tokens,
                    Err(errors) => {
                        for error in errors {
                            eprintln!("{error}");
                        }
                        continue;
                    }
                };

                match parse(tokens, "<stdin>") {
                    Ok(program) => println!("{program}"),
                    Err(errors) => {
                        for error in errors {
                            eprintln!("{error}");
                        }
                    }
                }
            }
        }
    }
}
