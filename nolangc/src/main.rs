mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use nolang_core::{
    eval::prelude::Interpreter,
    lexer::prelude::scan,
    parser::prelude::parse,
    utils::prelude::Error,
};

#[derive(Parser)]
enum Command {
    /// Runs a script file
    Run {
        /// Path of the source file
        path: PathBuf,
        /// Print the parsed program before running it
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Starts the interactive shell
    Repl,
    /// Runs a Read Lex Print Loop
    Rlpl,
    /// Runs a Read Parse Print Loop
    Rppl,
}

fn main() {
    match Command::parse() {
        Command::Run { path, print_ast } => {
            if let Err(error) = run_file(&path, print_ast) {
                let buffer_writer = cli::stderr_buffer_writer();
                let mut buffer = buffer_writer.buffer();
                error.pretty(&mut buffer);
                buffer_writer
                    .print(&buffer)
                    .expect("Writing error to stderr");

                exit(1);
            }
        }
        Command::Repl => {
            let _ = repl::start();
        }
        Command::Rlpl => {
            let _ = rlpl::start();
        }
        Command::Rppl => {
            let _ = rppl::start();
        }
    }
}

fn run_file(path: &Path, print_ast: bool) -> Result<(), Error> {
    let unit = path.to_string_lossy();
    let src = std::fs::read_to_string(path).map_err(|error| Error::StdIo { err: error.kind() })?;

    cli::print_running(&unit);

    let tokens = scan(&src, &unit).map_err(|errors| Error::Lex {
        path: path.to_path_buf(),
        src: src.clone(),
        errors,
    })?;

    let program = parse(tokens, &unit).map_err(|errors| Error::Parse {
        path: path.to_path_buf(),
        src: src.clone(),
        errors,
    })?;

    if print_ast {
        println!("{program:#?}");
    }

    let mut interpreter = Interpreter::new();
    interpreter
        .explore(&program)
        .map_err(|error| Error::Runtime {
            path: path.to_path_buf(),
            src,
            error,
        })?;

    Ok(())
}
