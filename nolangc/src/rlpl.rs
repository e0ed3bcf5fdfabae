use std::io::{self, Write};

use nolang_core::lexer::prelude::scan;

const PROMPT: &str = ">> ";

/// Read Lex Print Loop: shows the token stream for each input line.
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

                match scan(&source, "<stdin>") {
                    Ok(tokens) => {
                        for token in tokens {
                            println!("{:?}", token.kind);
                        }
                    }
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
