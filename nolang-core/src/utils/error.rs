use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::RuntimeError,
    lexer::prelude::LexicalError,
    parser::prelude::{ParseError, ParseErrorType},
    utils::prelude::SrcSpan,
};

use super::diagnostic::{Diagnostic, Label, Location};

/// Everything that can stop a source unit on its way through the
/// pipeline, bundled with the path and text needed to render a snippet.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to scan source code")]
    Lex {
        path: PathBuf,
        src: String,
        errors: Vec<LexicalError>,
    },
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        errors: Vec<ParseError>,
    },
    #[error("script evaluation failed")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError,
    },
    #[error("IO operation failed")]
    StdIo { err: std::io::ErrorKind },
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf);
            writeln!(buf).expect("write new line diagnostic");
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Lex { path, src, errors } => errors
                .iter()
                .map(|error| {
                    let (label, extra) = error.details();

                    Diagnostic {
                        title: "Lexical error".into(),
                        text: extra.join("\n"),
                        location: Some(Location {
                            src,
                            path: path.clone(),
                            label: Label {
                                text: Some(label.to_string()),
                                span: error.span,
                            },
                            extra_labels: vec![],
                        }),
                    }
                })
                .collect(),
            Error::Parse { path, src, errors } => errors
                .iter()
                .map(|error| {
                    let (label, extra) = error.details();

                    // Errors raised at end of input point past the last
                    // token; snap them to the end of the source text.
                    let adjusted_span = if matches!(error.error, ParseErrorType::UnexpectedEof) {
                        SrcSpan::new(src.len() as u32, src.len() as u32)
                    } else {
                        error.span
                    };

                    Diagnostic {
                        title: "Syntax error".into(),
                        text: extra.join("\n"),
                        location: Some(Location {
                            src,
                            path: path.clone(),
                            label: Label {
                                text: Some(label.to_string()),
                                span: adjusted_span,
                            },
                            extra_labels: vec![],
                        }),
                    }
                })
                .collect(),
            Error::Runtime { path, src, error } => {
                let (label, extra) = error.details();

                vec![Diagnostic {
                    title: "Runtime error".into(),
                    text: extra.join("\n"),
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: error.span,
                        },
                        extra_labels: vec![],
                    }),
                }]
            }
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    location: None,
                }]
            }
        }
    }
}
