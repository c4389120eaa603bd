//! Lexer: turns source text into a token stream.

use crate::ast::BinOp;
use crate::frontend::{ParseError, SourceLocation};

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    // Literals
    Int(i64),
    Float(f64),
    Str(String),
    /// f'...' with its literal/expression segments
    FString(Vec<FStringSegment>),

    // Identifiers & keywords
    Name(String),
    And,
    Or,
    Not,
    In,
    Is,
    If,
    Else,
    For,
    Return,
    True,
    False,
    None,
    /// A keyword of the host language this subset doesn't support
    Reserved(&'static str),

    // Operators
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    LShift,
    RShift,
    EqEq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Assign,
    AugAssign(BinOp),

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Semicolon,

    /// Logical end of line (never emitted inside brackets)
    Newline,
    Eof,
}

/// A segment of an f-string body.
#[derive(Clone, Debug, PartialEq)]
pub enum FStringSegment {
    /// Literal text with escapes and `{{`/`}}` already resolved
    Literal(String),
    /// Source text of an embedded expression, without conversion/spec
    Expr(String),
}

/// Position of a token in the source (character offsets).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

const RESERVED: &[&str] = &[
    "lambda", "def", "class", "while", "import", "from", "as", "del", "pass", "yield", "async",
    "await", "global", "nonlocal", "assert", "break", "continue", "elif", "try", "except",
    "finally", "raise", "with",
];

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    depth: usize,
}

impl Lexer {
    pub fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
        }
    }

    /// Tokenize the whole input. The stream always ends with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let (tok, span) = self.next_token()?;
            let done = tok == Token::Eof;
            tokens.push((tok, span));
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn text(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn error(&self, message: impl Into<String>, start: usize, line: usize, column: usize) -> ParseError {
        let end = (start + 1).max(self.pos).min(self.chars.len());
        let snippet: String = self.chars[start.min(end)..end].iter().collect();
        ParseError::new(message)
            .with_location(SourceLocation::new(line, column))
            .with_snippet(snippet)
    }

    /// Skip spaces, comments and line continuations; stop at a newline.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\x0c' => {
                    self.bump();
                }
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.bump();
                    self.bump();
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                '\n' if self.depth > 0 => {
                    self.bump();
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<(Token, Span), ParseError> {
        self.skip_trivia();

        let start = self.pos;
        let (line, column) = (self.line, self.column);
        let tok = match self.peek() {
            None => Token::Eof,
            Some(c) => self.lex_token(c, start, line, column)?,
        };
        let span = Span {
            start,
            end: self.pos,
            line,
            column,
        };
        Ok((tok, span))
    }

    fn lex_token(
        &mut self,
        c: char,
        start: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, ParseError> {
        if c == '\n' {
            self.bump();
            return Ok(Token::Newline);
        }
        if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
        {
            return self.lex_number(start, line, column);
        }
        if c == '\'' || c == '"' {
            return self.lex_string(false, false, start, line, column);
        }
        if c.is_alphabetic() || c == '_' {
            if let Some((raw, fmt, len)) = self.string_prefix() {
                for _ in 0..len {
                    self.bump();
                }
                return self.lex_string(raw, fmt, start, line, column);
            }
            return Ok(self.lex_name(start));
        }

        self.bump();
        let tok = match c {
            '(' => {
                self.depth += 1;
                Token::LParen
            }
            '[' => {
                self.depth += 1;
                Token::LBracket
            }
            '{' => {
                self.depth += 1;
                Token::LBrace
            }
            ')' => {
                self.depth = self.depth.saturating_sub(1);
                Token::RParen
            }
            ']' => {
                self.depth = self.depth.saturating_sub(1);
                Token::RBracket
            }
            '}' => {
                self.depth = self.depth.saturating_sub(1);
                Token::RBrace
            }
            ',' => Token::Comma,
            '.' => Token::Dot,
            ';' => Token::Semicolon,
            '~' => Token::Tilde,
            ':' => {
                if self.peek() == Some('=') {
                    return Err(self.error("assignment expressions are not supported", start, line, column));
                }
                Token::Colon
            }
            '+' => self.with_aug(Token::Plus, BinOp::Add),
            '-' => self.with_aug(Token::Minus, BinOp::Sub),
            '%' => self.with_aug(Token::Percent, BinOp::Mod),
            '&' => self.with_aug(Token::Amp, BinOp::BitAnd),
            '|' => self.with_aug(Token::Pipe, BinOp::BitOr),
            '^' => self.with_aug(Token::Caret, BinOp::BitXor),
            '*' => {
                if self.eat('*') {
                    self.with_aug(Token::DoubleStar, BinOp::Pow)
                } else {
                    self.with_aug(Token::Star, BinOp::Mult)
                }
            }
            '/' => {
                if self.eat('/') {
                    self.with_aug(Token::DoubleSlash, BinOp::FloorDiv)
                } else {
                    self.with_aug(Token::Slash, BinOp::Div)
                }
            }
            '<' => {
                if self.eat('<') {
                    self.with_aug(Token::LShift, BinOp::LShift)
                } else if self.eat('=') {
                    Token::LtE
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if self.eat('>') {
                    self.with_aug(Token::RShift, BinOp::RShift)
                } else if self.eat('=') {
                    Token::GtE
                } else {
                    Token::Gt
                }
            }
            '=' => {
                if self.eat('=') {
                    Token::EqEq
                } else {
                    Token::Assign
                }
            }
            '!' => {
                if self.eat('=') {
                    Token::NotEq
                } else {
                    return Err(self.error("unexpected character", start, line, column));
                }
            }
            _ => return Err(self.error("unexpected character", start, line, column)),
        };
        Ok(tok)
    }

    fn with_aug(&mut self, plain: Token, op: BinOp) -> Token {
        if self.eat('=') {
            Token::AugAssign(op)
        } else {
            plain
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Names
    // ═══════════════════════════════════════════════════════════════════

    fn lex_name(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let word = self.text(start);
        match word.as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "in" => Token::In,
            "is" => Token::Is,
            "if" => Token::If,
            "else" => Token::Else,
            "for" => Token::For,
            "return" => Token::Return,
            "True" => Token::True,
            "False" => Token::False,
            "None" => Token::None,
            _ => match RESERVED.iter().find(|kw| **kw == word) {
                Some(kw) => Token::Reserved(kw),
                None => Token::Name(word),
            },
        }
    }

    /// Detect a string prefix (`f`, `r`, `rf`, `u`, `b`, ...) directly
    /// followed by a quote. Returns (raw, formatted, prefix length).
    fn string_prefix(&self) -> Option<(bool, bool, usize)> {
        let mut raw = false;
        let mut fmt = false;
        let mut bytes = false;
        let mut len = 0;
        while let Some(c) = self.peek_at(len) {
            match c.to_ascii_lowercase() {
                'r' if !raw => raw = true,
                'f' if !fmt => fmt = true,
                'b' if !bytes => bytes = true,
                'u' if len == 0 => {}
                '\'' | '"' if len > 0 => break,
                _ => return None,
            }
            len += 1;
            if len > 2 {
                return None;
            }
        }
        if !matches!(self.peek_at(len), Some('\'') | Some('"')) || (bytes && fmt) {
            return None;
        }
        // Byte strings are treated as text.
        Some((raw, fmt, len))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Numbers
    // ═══════════════════════════════════════════════════════════════════

    fn lex_number(&mut self, start: usize, line: usize, column: usize) -> Result<Token, ParseError> {
        if self.peek() == Some('0') {
            let radix = match self.peek_at(1).map(|c| c.to_ascii_lowercase()) {
                Some('x') => Some(16),
                Some('o') => Some(8),
                Some('b') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.bump();
                self.bump();
                let digits_start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_digit(radix) || c == '_' {
                        self.bump();
                    } else {
                        break;
                    }
                }
                let digits: String = self.text(digits_start).replace('_', "");
                return i64::from_str_radix(&digits, radix)
                    .map(Token::Int)
                    .map_err(|_| self.error("invalid integer literal", start, line, column));
            }
        }

        let mut is_float = false;
        self.eat_digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = matches!(self.peek_at(1), Some('+') | Some('-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                for _ in 0..digit_at {
                    self.bump();
                }
                self.eat_digits();
            }
        }
        if self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
            self.bump();
            return Err(self.error("invalid numeric literal", start, line, column));
        }

        let text = self.text(start).replace('_', "");
        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| self.error("invalid float literal", start, line, column))
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| self.error("integer literal too large", start, line, column))
        }
    }

    fn eat_digits(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Strings
    // ═══════════════════════════════════════════════════════════════════

    fn lex_string(
        &mut self,
        raw: bool,
        fmt: bool,
        start: usize,
        line: usize,
        column: usize,
    ) -> Result<Token, ParseError> {
        let quote = self.bump().unwrap_or('\'');
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.bump();
            self.bump();
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error("unterminated string literal", start, line, column));
            };

            if c == quote {
                if !triple {
                    self.bump();
                    break;
                }
                if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                    self.bump();
                    self.bump();
                    self.bump();
                    break;
                }
            }
            if c == '\n' && !triple {
                return Err(self.error("unterminated string literal", start, line, column));
            }

            if fmt && c == '{' {
                self.bump();
                if self.eat('{') {
                    literal.push('{');
                    continue;
                }
                if !literal.is_empty() {
                    segments.push(FStringSegment::Literal(std::mem::take(&mut literal)));
                }
                let expr = self.lex_fstring_expr(start, line, column)?;
                segments.push(FStringSegment::Expr(expr));
                continue;
            }
            if fmt && c == '}' {
                self.bump();
                if self.eat('}') {
                    literal.push('}');
                    continue;
                }
                return Err(self.error("single '}' is not allowed in f-string", start, line, column));
            }

            self.bump();
            if c == '\\' && !raw {
                self.lex_escape(&mut literal);
            } else {
                literal.push(c);
            }
        }

        if !fmt {
            return Ok(Token::Str(literal));
        }
        if !literal.is_empty() {
            segments.push(FStringSegment::Literal(literal));
        }
        Ok(Token::FString(segments))
    }

    /// Handle the character(s) after a backslash.
    fn lex_escape(&mut self, out: &mut String) {
        let Some(c) = self.bump() else {
            out.push('\\');
            return;
        };
        match c {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            'x' => self.lex_hex_escape(2, 'x', out),
            'u' => self.lex_hex_escape(4, 'u', out),
            'U' => self.lex_hex_escape(8, 'U', out),
            other => {
                // Unknown escapes are kept verbatim.
                out.push('\\');
                out.push(other);
            }
        }
    }

    fn lex_hex_escape(&mut self, len: usize, marker: char, out: &mut String) {
        let digits: String = (0..len).filter_map(|i| self.peek_at(i)).collect();
        let decoded = (digits.len() == len && digits.chars().all(|c| c.is_ascii_hexdigit()))
            .then(|| u32::from_str_radix(&digits, 16).ok())
            .flatten()
            .and_then(char::from_u32);
        match decoded {
            Some(ch) => {
                for _ in 0..len {
                    self.bump();
                }
                out.push(ch);
            }
            None => {
                out.push('\\');
                out.push(marker);
            }
        }
    }

    /// Read an embedded f-string expression up to its closing `}`.
    ///
    /// Nested brackets and quoted strings are skipped over; a top-level
    /// `!conv` or `:spec` suffix is consumed and dropped.
    fn lex_fstring_expr(&mut self, start: usize, line: usize, column: usize) -> Result<String, ParseError> {
        let expr_start = self.pos;
        let mut expr_end = None;
        let mut nesting = 0usize;
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error("expecting '}' in f-string", start, line, column));
            };
            match c {
                '(' | '[' | '{' => nesting += 1,
                ')' | ']' => nesting = nesting.saturating_sub(1),
                '}' if nesting > 0 => nesting -= 1,
                '}' => {
                    let end = expr_end.unwrap_or(self.pos);
                    self.bump();
                    let source: String = self.chars[expr_start..end].iter().collect();
                    if source.trim().is_empty() {
                        return Err(self.error("f-string: empty expression not allowed", start, line, column));
                    }
                    return Ok(source);
                }
                '\'' | '"' => {
                    self.bump();
                    while let Some(inner) = self.bump() {
                        if inner == c {
                            break;
                        }
                    }
                    continue;
                }
                '!' if nesting == 0 && expr_end.is_none() && self.peek_at(1) != Some('=') => {
                    expr_end = Some(self.pos);
                }
                ':' if nesting == 0 && expr_end.is_none() => {
                    expr_end = Some(self.pos);
                }
                '\n' => {
                    return Err(self.error("unterminated f-string expression", start, line, column));
                }
                _ => {}
            }
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Token> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            toks("a // b ** 2"),
            vec![
                Token::Name("a".into()),
                Token::DoubleSlash,
                Token::Name("b".into()),
                Token::DoubleStar,
                Token::Int(2),
                Token::Eof
            ]
        );
        assert_eq!(
            toks("x += 1"),
            vec![
                Token::Name("x".into()),
                Token::AugAssign(BinOp::Add),
                Token::Int(1),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(toks("0x1F 1_000 .5 1e3 2.")[..5], [
            Token::Int(31),
            Token::Int(1000),
            Token::Float(0.5),
            Token::Float(1000.0),
            Token::Float(2.0)
        ]);
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(toks(r#"'a\nb' "it's" r'\n'"#)[..3], [
            Token::Str("a\nb".into()),
            Token::Str("it's".into()),
            Token::Str("\\n".into())
        ]);
        assert_eq!(toks("'''multi\nline'''")[0], Token::Str("multi\nline".into()));
    }

    #[test]
    fn test_fstring_segments() {
        assert_eq!(
            toks("f'{a + 1:>4} items {{x}} {b!r}'")[0],
            Token::FString(vec![
                FStringSegment::Expr("a + 1".into()),
                FStringSegment::Literal(" items {x} ".into()),
                FStringSegment::Expr("b".into()),
            ])
        );
    }

    #[test]
    fn test_newlines_inside_brackets_are_ignored() {
        assert_eq!(
            toks("[1,\n 2]\nx"),
            vec![
                Token::LBracket,
                Token::Int(1),
                Token::Comma,
                Token::Int(2),
                Token::RBracket,
                Token::Newline,
                Token::Name("x".into()),
                Token::Eof
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(toks("1 # one\n"), vec![Token::Int(1), Token::Newline, Token::Eof]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("'abc").tokenize().unwrap_err();
        assert!(err.message.contains("unterminated"));
        assert_eq!(err.location.unwrap().column, 1);
    }

    #[test]
    fn test_reserved_keyword() {
        assert_eq!(toks("lambda")[0], Token::Reserved("lambda"));
    }
}
