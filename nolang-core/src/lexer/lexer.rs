use crate::{
    lexer::{
        error::{LexicalError, LexicalErrorType},
        token::{Token, TokenKind},
    },
    utils::prelude::SrcSpan,
};

const TAB_SIZE: u32 = 4;

pub fn str_to_keyword(word: &str) -> Option<TokenKind> {
    match word {
        "no" => Some(TokenKind::No),
        "greg" => Some(TokenKind::Greg),
        "if" => Some(TokenKind::If),
        "erm" => Some(TokenKind::Erm),
        "hermph" => Some(TokenKind::Hermph),
        "while" => Some(TokenKind::While),
        "for" => Some(TokenKind::For),
        "return" => Some(TokenKind::Return),
        "and" => Some(TokenKind::And),
        "or" => Some(TokenKind::Or),
        "not" => Some(TokenKind::Not),
        "nolin" => Some(TokenKind::Nolin),
        "True" => Some(TokenKind::True),
        "False" => Some(TokenKind::False),
        "nol" => Some(TokenKind::Nol),
        _ => None,
    }
}

/// Scans one source unit. All recorded defects are returned together;
/// a unit with any defect yields no tokens at all.
pub fn scan(source: &str, unit: &str) -> Result<Vec<Token>, Vec<LexicalError>> {
    Lexer::new(source, unit).scan()
}

pub struct Lexer {
    chars: Vec<(u32, char)>,
    src_len: u32,
    unit: String,
    start: usize,
    current: usize,
    line: u32,
    indent_stack: Vec<u32>,
    tokens: Vec<Token>,
    errors: Vec<LexicalError>,
}

impl Lexer {
    pub fn new(source: &str, unit: &str) -> Self {
        // A trailing newline terminates the last line even when the
        // source text lacks one.
        let mut chars: Vec<(u32, char)> = source
            .char_indices()
            .map(|(offset, ch)| (offset as u32, ch))
            .collect();
        chars.push((source.len() as u32, '\n'));

        Lexer {
            src_len: source.len() as u32,
            chars,
            unit: unit.to_string(),
            start: 0,
            current: 0,
            line: 0,
            indent_stack: vec![0],
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn scan(mut self) -> Result<Vec<Token>, Vec<LexicalError>> {
        while !self.at_end() {
            self.lex_line();
        }

        while self.indent_top() > 0 {
            self.indent_stack.pop();
            self.push_layout(TokenKind::Dedent);
        }
        self.push_layout(TokenKind::Eof);

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    /// Line-start phase: count leading blank lines, measure indentation,
    /// then hand over to the token phase until the line's newline.
    fn lex_line(&mut self) {
        self.line += 1;
        while self.next_is('\n') {
            self.line += 1;
        }

        self.start = self.current;
        let mut indentation = 0;
        while let Some(ch) = self.peek() {
            match ch {
                ' ' => indentation += 1,
                '\t' => indentation += TAB_SIZE - indentation % TAB_SIZE,
                '\r' => {}
                _ => break,
            }
            self.current += 1;
        }

        // Whitespace-only lines, including the implicit one at end of
        // input, contribute nothing and leave the indent stack alone.
        if self.at_end() || self.next_is('\n') {
            return;
        }
        if self.next_is('#') {
            self.goto_next('\n', true);
            return;
        }

        self.measure_indent(indentation);

        while !self.at_end() && !self.next_is('\n') {
            self.start = self.current;
            self.lex_token();
        }
        self.start = self.current;
        self.push_layout(TokenKind::Newline);
    }

    fn measure_indent(&mut self, indentation: u32) {
        let mut top = self.indent_top();

        if top < indentation {
            self.indent_stack.push(indentation);
            self.push_layout(TokenKind::Indent);
        } else if top != indentation {
            while top != indentation && top > 0 {
                self.indent_stack.pop();
                self.push_layout(TokenKind::Dedent);
                top = self.indent_top();
            }

            if top != indentation {
                self.record_error(LexicalErrorType::InconsistentIndentation);
            }
        }
    }

    fn lex_token(&mut self) {
        let Some(ch) = self.advance() else {
            return;
        };

        match ch {
            '(' => self.push_token(TokenKind::LParen),
            ')' => self.push_token(TokenKind::RParen),
            ',' => self.push_token(TokenKind::Comma),
            '+' => self.push_token(TokenKind::Plus),
            '-' => self.push_token(TokenKind::Minus),
            '/' => self.push_token(TokenKind::Div),
            '%' => self.push_token(TokenKind::Mod),
            '*' => {
                let kind = if self.next_is('*') {
                    TokenKind::Pow
                } else {
                    TokenKind::Mult
                };
                self.push_token(kind)
            }
            '<' => {
                let kind = if self.next_is('=') {
                    TokenKind::LessThanOrEqual
                } else {
                    TokenKind::LessThan
                };
                self.push_token(kind)
            }
            '>' => {
                let kind = if self.next_is('=') {
                    TokenKind::GreaterThanOrEqual
                } else {
                    TokenKind::GreaterThan
                };
                self.push_token(kind)
            }
            '=' => {
                let kind = if self.next_is('=') {
                    TokenKind::Equal
                } else {
                    TokenKind::Assign
                };
                self.push_token(kind)
            }
            '!' => {
                if self.next_is('=') {
                    self.push_token(TokenKind::NotEqual)
                } else {
                    self.record_error(LexicalErrorType::UnexpectedCharacter { ch })
                }
            }
            '#' => self.goto_next('\n', false),
            ' ' | '\t' | '\r' => {}
            '\'' | '"' => self.lex_string(ch),
            _ if ch.is_ascii_digit() => self.lex_number(),
            _ if ch.is_ascii_alphabetic() || ch == '_' => self.lex_ident(),
            _ => self.record_error(LexicalErrorType::UnexpectedCharacter { ch }),
        }
    }

    fn lex_string(&mut self, quote: char) {
        loop {
            match self.advance() {
                Some(ch) if ch == quote => break,
                Some('\n') => self.line += 1,
                Some(_) => {}
                None => {
                    self.record_error(LexicalErrorType::UnterminatedString);
                    return;
                }
            }
        }

        let lexeme = self.lexeme();
        let value = lexeme[1..lexeme.len() - 1]
            .replace("\\n", "\n")
            .replace("\\t", "\t")
            .replace("\\a", "\x07");
        self.push_token(TokenKind::Str(value));
    }

    fn lex_number(&mut self) {
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.current += 1;
        }

        let is_float = self.peek() == Some('.') && self.peek_next().is_some_and(|ch| ch.is_ascii_digit());
        if is_float {
            self.current += 1;
            while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                self.current += 1;
            }

            match self.lexeme().parse::<f64>() {
                Ok(value) => self.push_token(TokenKind::Float(value)),
                Err(_) => self.record_error(LexicalErrorType::IntegerOutOfRange),
            }
        } else {
            match self.lexeme().parse::<i64>() {
                Ok(value) => self.push_token(TokenKind::Int(value)),
                Err(_) => self.record_error(LexicalErrorType::IntegerOutOfRange),
            }
        }
    }

    fn lex_ident(&mut self) {
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            self.current += 1;
        }

        let word = self.lexeme();
        match str_to_keyword(&word) {
            Some(kind) => self.push_token(kind),
            None => self.push_token(TokenKind::Ident(word)),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.current).map(|(_, ch)| *ch)
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).map(|(_, ch)| *ch)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.current += 1;
        }
        ch
    }

    fn next_is(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn goto_next(&mut self, target: char, consume: bool) {
        while let Some(ch) = self.peek() {
            if ch == target {
                if consume {
                    self.current += 1;
                }
                return;
            }
            self.current += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn indent_top(&self) -> u32 {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    fn byte_at(&self, index: usize) -> u32 {
        match self.chars.get(index) {
            Some((offset, _)) => *offset,
            None => self.src_len,
        }
    }

    fn lexeme(&self) -> String {
        self.chars[self.start..self.current]
            .iter()
            .map(|(_, ch)| *ch)
            .collect()
    }

    fn push_token(&mut self, kind: TokenKind) {
        let span = SrcSpan::new(self.byte_at(self.start), self.byte_at(self.current));
        self.tokens.push(Token {
            kind,
            lexeme: self.lexeme(),
            line: self.line,
            unit: self.unit.clone(),
            span,
        });
    }

    fn push_layout(&mut self, kind: TokenKind) {
        let at = self.byte_at(self.current);
        self.tokens.push(Token {
            kind,
            lexeme: String::new(),
            line: self.line,
            unit: self.unit.clone(),
            span: SrcSpan::new(at, at),
        });
    }

    fn record_error(&mut self, error: LexicalErrorType) {
        let span = SrcSpan::new(self.byte_at(self.start), self.byte_at(self.current));
        self.errors.push(LexicalError {
            error,
            line: self.line,
            unit: self.unit.clone(),
            span,
        });
    }
}
