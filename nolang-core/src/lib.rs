pub mod environment;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod utils;
