//! SQL Tokenizer implementation.

use std::sync::Arc;
use std::time::Instant;

use tracing::trace;

use super::{Keyword, LexError, Token, TokenKind};
use crate::source::{File, Pos};

const BOM: char = '\u{FEFF}';

/// Callback receiving every lexical problem as it is found.
pub type ErrorHandler<'a> = Box<dyn FnMut(Pos, &str) + 'a>;

/// A pull-based lexer over the source of one registered file.
///
/// Each call to [`Lexer::scan`] returns the next token; once the input is
/// exhausted every further call returns EOF. Line starts are recorded in
/// the [`File`] as the lexer passes them.
pub struct Lexer<'a> {
    file: Arc<File>,
    src: &'a str,

    /// Current character, `None` at end of input.
    ch: Option<char>,
    /// Byte offset of `ch`.
    offset: usize,
    /// Byte offset of the character after `ch`.
    rd_offset: usize,

    /// Kind of the last non-comment token, used to tell a sign from an operator.
    prev: TokenKind,
    on_error: Option<ErrorHandler<'a>>,
    error_count: usize,
    deadline: Option<Instant>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer for `src`, which must be the full content of `file`.
    ///
    /// # Panics
    ///
    /// Panics if the size `file` was registered with differs from `src.len()`.
    #[must_use]
    pub fn new(file: Arc<File>, src: &'a str) -> Self {
        assert_eq!(
            file.size(),
            src.len(),
            "file size ({}) does not match source length ({})",
            file.size(),
            src.len()
        );
        let mut lexer = Self {
            file,
            src,
            ch: Some(' '),
            offset: 0,
            rd_offset: 0,
            prev: TokenKind::Eof,
            on_error: None,
            error_count: 0,
            deadline: None,
        };
        lexer.next();
        if lexer.ch == Some(BOM) {
            lexer.next();
        }
        lexer
    }

    /// Installs a callback that is told about every lexical problem.
    #[must_use]
    pub fn with_error_handler(mut self, handler: impl FnMut(Pos, &str) + 'a) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    /// Aborts scanning of strings, comments and numbers once `deadline` passes.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns the file being scanned.
    #[must_use]
    pub const fn file(&self) -> &Arc<File> {
        &self.file
    }

    /// Returns how many problems were reported to the error handler.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }

    /// Reads the next character into `ch`.
    fn next(&mut self) {
        if let Some(c) = self.src[self.rd_offset..].chars().next() {
            self.offset = self.rd_offset;
            if self.ch == Some('\n') {
                self.file.add_line(self.offset);
            }
            self.rd_offset += c.len_utf8();
            self.ch = Some(c);
        } else {
            self.offset = self.src.len();
            if self.ch == Some('\n') {
                self.file.add_line(self.offset);
            }
            self.ch = None;
        }
    }

    /// Returns the character after `ch` without consuming anything.
    fn peek(&self) -> Option<char> {
        self.src[self.rd_offset..].chars().next()
    }

    fn report(&mut self, pos: Pos, msg: &str) {
        self.error_count += 1;
        if let Some(handler) = self.on_error.as_mut() {
            handler(pos, msg);
        }
    }

    fn fatal(&mut self, err: LexError) -> LexError {
        trace!(file = self.file.name(), error = %err, "fatal lexical error");
        self.report(err.pos(), &err.to_string());
        err
    }

    fn check_deadline(&mut self, pos: Pos) -> Result<(), LexError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Err(self.fatal(LexError::DeadlineExceeded { pos }))
            }
            _ => Ok(()),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, Some(' ' | '\t' | '\n' | '\r')) {
            self.next();
        }
    }

    fn scan_identifier(&mut self) {
        while self.ch.is_some_and(|c| is_letter(c) || is_digit(c)) {
            self.next();
        }
    }

    /// Scans the digits of a number; any sign has already been consumed.
    fn scan_number(&mut self, pos: Pos, start: usize) -> Result<TokenKind, LexError> {
        let mut seen_dot = false;
        let mut seen_exp = false;
        loop {
            self.check_deadline(pos)?;
            match self.ch {
                Some(c) if c.is_ascii_digit() => self.next(),
                Some('.') => {
                    if seen_dot || seen_exp {
                        let reason = if seen_exp {
                            "decimal point after exponent"
                        } else {
                            "second decimal point"
                        };
                        return Err(self.malformed_number(pos, start, reason));
                    }
                    seen_dot = true;
                    self.next();
                }
                Some('e' | 'E') => {
                    if seen_exp {
                        return Err(self.malformed_number(pos, start, "second exponent marker"));
                    }
                    seen_exp = true;
                    self.next();
                    if matches!(self.ch, Some('+' | '-')) {
                        self.next();
                    }
                    if !self.ch.is_some_and(|c| c.is_ascii_digit()) {
                        return Err(self.malformed_number(pos, start, "exponent has no digits"));
                    }
                }
                _ => break,
            }
        }
        Ok(if seen_dot || seen_exp {
            TokenKind::Real
        } else {
            TokenKind::Int
        })
    }

    fn malformed_number(&mut self, pos: Pos, start: usize, reason: &'static str) -> LexError {
        // Include the offending character in the reported literal.
        let end = self.ch.map_or(self.offset, |c| self.offset + c.len_utf8());
        let literal = self.src[start..end].to_string();
        self.fatal(LexError::MalformedNumber {
            pos,
            literal,
            reason,
        })
    }

    /// Scans a string literal; `ch` is the opening quote.
    fn scan_string(&mut self, pos: Pos) -> Result<(), LexError> {
        self.next();
        loop {
            self.check_deadline(pos)?;
            match self.ch {
                Some('\'') => {
                    self.next();
                    return Ok(());
                }
                Some(_) => self.next(),
                None => return Err(self.fatal(LexError::UnterminatedString { pos })),
            }
        }
    }

    /// Skips to the end of the line, leaving the newline unconsumed.
    fn scan_line_comment(&mut self) {
        while self.ch.is_some_and(|c| c != '\n') {
            self.next();
        }
    }

    /// Scans a block comment; the opening `/*` has been consumed.
    fn scan_block_comment(&mut self, pos: Pos) -> Result<(), LexError> {
        loop {
            self.check_deadline(pos)?;
            match self.ch {
                Some('*') if self.peek() == Some('/') => {
                    self.next();
                    self.next();
                    return Ok(());
                }
                Some(_) => self.next(),
                None => return Err(self.fatal(LexError::UnterminatedComment { pos })),
            }
        }
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// Returns a `LexError` for an unterminated string or block comment, a
    /// malformed number, or an exceeded deadline. Illegal characters are
    /// not errors: they are reported to the error handler and returned as
    /// [`TokenKind::Illegal`].
    pub fn scan(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let start = self.offset;
        let pos = self.file.pos(start);

        let Some(ch) = self.ch else {
            return Ok(Token::new(pos, TokenKind::Eof, ""));
        };

        let kind = match ch {
            c if is_letter(c) => {
                self.scan_identifier();
                let lit = &self.src[start..self.offset];
                // Single characters are always identifiers.
                if lit.len() > 1 {
                    Keyword::lookup(lit).map_or(TokenKind::Ident, TokenKind::Keyword)
                } else {
                    TokenKind::Ident
                }
            }
            c if c.is_ascii_digit() => self.scan_number(pos, start)?,
            '\'' => {
                self.scan_string(pos)?;
                TokenKind::String
            }
            _ => {
                self.next();
                match ch {
                    '#' => {
                        self.scan_line_comment();
                        TokenKind::Comment
                    }
                    '-' => {
                        if self.ch == Some('-') && self.peek().is_none_or(char::is_whitespace) {
                            self.next();
                            self.scan_line_comment();
                            TokenKind::Comment
                        } else if self.ch.is_some_and(|c| c.is_ascii_digit())
                            && !self.prev.ends_operand()
                        {
                            self.scan_number(pos, start)?
                        } else {
                            TokenKind::Minus
                        }
                    }
                    '/' => {
                        if self.ch == Some('*') {
                            self.next();
                            self.scan_block_comment(pos)?;
                            TokenKind::Comment
                        } else {
                            TokenKind::Slash
                        }
                    }
                    '+' => TokenKind::Plus,
                    '*' => TokenKind::Star,
                    '%' => TokenKind::Percent,
                    '(' => TokenKind::LeftParen,
                    ')' => TokenKind::RightParen,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    '.' => TokenKind::Dot,
                    '=' => TokenKind::Eq,
                    '<' => match self.ch {
                        Some('=') => {
                            self.next();
                            TokenKind::LtEq
                        }
                        Some('>') => {
                            self.next();
                            TokenKind::NotEq
                        }
                        _ => TokenKind::Lt,
                    },
                    '>' => {
                        if self.ch == Some('=') {
                            self.next();
                            TokenKind::GtEq
                        } else {
                            TokenKind::Gt
                        }
                    }
                    '!' if self.ch == Some('=') => {
                        self.next();
                        TokenKind::NotEq
                    }
                    _ => {
                        self.report(pos, &format!("illegal character {ch:?}"));
                        TokenKind::Illegal
                    }
                }
            }
        };

        if kind != TokenKind::Comment {
            self.prev = kind;
        }
        Ok(Token::new(pos, kind, &self.src[start..self.offset]))
    }

    /// Scans the entire input and returns all tokens, EOF included.
    ///
    /// # Errors
    ///
    /// Returns the first fatal `LexError`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (!c.is_ascii() && c.is_alphabetic())
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || (!c.is_ascii() && c.is_numeric())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use super::*;
    use crate::source::FileSet;

    fn lexer(src: &str) -> Lexer<'_> {
        let fset = FileSet::new();
        let file = fset.register("test.sql", None, src.len());
        Lexer::new(file, src)
    }

    fn tokenize(src: &str) -> Vec<Token> {
        lexer(src).tokenize().unwrap()
    }

    fn scan_set(src: &str) -> Vec<(usize, TokenKind, String)> {
        tokenize(src)
            .into_iter()
            .filter(|t| !t.is_eof())
            .map(|t| (t.pos.get(), t.kind, t.lit))
            .collect()
    }

    fn token_kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
        assert_eq!(tokens[0].pos, Pos::new(1));
    }

    #[test]
    fn test_eof_repeats() {
        let mut lx = lexer("a");
        assert_eq!(lx.scan().unwrap().kind, TokenKind::Ident);
        for _ in 0..3 {
            let tok = lx.scan().unwrap();
            assert!(tok.is_eof());
            assert_eq!(tok.pos, Pos::new(2));
        }
    }

    #[test]
    fn test_integer_positions() {
        assert_eq!(
            scan_set("1 11"),
            vec![
                (1, TokenKind::Int, String::from("1")),
                (3, TokenKind::Int, String::from("11")),
            ]
        );
    }

    #[test]
    fn test_case_keywords() {
        let kw = |k| TokenKind::Keyword(k);
        assert_eq!(
            scan_set("CASE WHEN THEN ELSE END"),
            vec![
                (1, kw(Keyword::Case), String::from("CASE")),
                (6, kw(Keyword::When), String::from("WHEN")),
                (11, kw(Keyword::Then), String::from("THEN")),
                (16, kw(Keyword::Else), String::from("ELSE")),
                (21, kw(Keyword::End), String::from("END")),
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe and or"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Keyword(Keyword::And),
                TokenKind::Keyword(Keyword::Or),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_single_letter_is_identifier() {
        assert_eq!(
            scan_set("t.v"),
            vec![
                (1, TokenKind::Ident, String::from("t")),
                (2, TokenKind::Dot, String::from(".")),
                (3, TokenKind::Ident, String::from("v")),
            ]
        );
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            scan_set("tbl.col"),
            vec![
                (1, TokenKind::Ident, String::from("tbl")),
                (4, TokenKind::Dot, String::from(".")),
                (5, TokenKind::Ident, String::from("col")),
            ]
        );
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(
            scan_set("名前 x_1"),
            vec![
                (1, TokenKind::Ident, String::from("名前")),
                (8, TokenKind::Ident, String::from("x_1")),
            ]
        );
    }

    #[test]
    fn test_string_keeps_quotes() {
        assert_eq!(
            scan_set("'2015-11-11'"),
            vec![(1, TokenKind::String, String::from("'2015-11-11'"))]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = lexer("select 'abc").tokenize().unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { pos: Pos::new(8) });
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("+ - * / % = != <> < <= > >="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            scan_set("( ) , ; ."),
            vec![
                (1, TokenKind::LeftParen, String::from("(")),
                (3, TokenKind::RightParen, String::from(")")),
                (5, TokenKind::Comma, String::from(",")),
                (7, TokenKind::Semicolon, String::from(";")),
                (9, TokenKind::Dot, String::from(".")),
            ]
        );
    }

    #[test]
    fn test_gt_then_eq() {
        assert_eq!(
            scan_set("> ="),
            vec![
                (1, TokenKind::Gt, String::from(">")),
                (3, TokenKind::Eq, String::from("=")),
            ]
        );
    }

    #[test]
    fn test_reals() {
        assert_eq!(
            scan_set("3.14 1e10 2.5E-3 1."),
            vec![
                (1, TokenKind::Real, String::from("3.14")),
                (6, TokenKind::Real, String::from("1e10")),
                (11, TokenKind::Real, String::from("2.5E-3")),
                (18, TokenKind::Real, String::from("1.")),
            ]
        );
    }

    #[test]
    fn test_malformed_numbers() {
        for (src, reason) in [
            ("1.2.3", "second decimal point"),
            ("1e2e3", "second exponent marker"),
            ("1e5.0", "decimal point after exponent"),
            ("1e+", "exponent has no digits"),
        ] {
            match lexer(src).tokenize() {
                Err(LexError::MalformedNumber { pos, reason: r, .. }) => {
                    assert_eq!(pos, Pos::new(1), "{src}");
                    assert_eq!(r, reason, "{src}");
                }
                other => panic!("expected malformed number for {src}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_minus_disambiguation() {
        // After an operand, `-` is an operator.
        assert_eq!(
            token_kinds("a -1"),
            vec![
                TokenKind::Ident,
                TokenKind::Minus,
                TokenKind::Int,
                TokenKind::Eof
            ]
        );
        // Where an operand is expected, it is the sign of the literal.
        assert_eq!(
            scan_set("= -1.5"),
            vec![
                (1, TokenKind::Eq, String::from("=")),
                (3, TokenKind::Real, String::from("-1.5")),
            ]
        );
        assert_eq!(
            token_kinds("a - -2"),
            vec![
                TokenKind::Ident,
                TokenKind::Minus,
                TokenKind::Int,
                TokenKind::Eof
            ]
        );
        assert_eq!(
            token_kinds("- x"),
            vec![TokenKind::Minus, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn test_line_comments() {
        assert_eq!(
            scan_set("-- note\nselect # other\n"),
            vec![
                (1, TokenKind::Comment, String::from("-- note")),
                (9, TokenKind::Keyword(Keyword::Select), String::from("select")),
                (16, TokenKind::Comment, String::from("# other")),
            ]
        );
        // `--` needs trailing whitespace to start a comment.
        assert_eq!(
            token_kinds("a--b"),
            vec![
                TokenKind::Ident,
                TokenKind::Minus,
                TokenKind::Minus,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
        assert_eq!(token_kinds("--"), vec![TokenKind::Comment, TokenKind::Eof]);
    }

    #[test]
    fn test_block_comment() {
        assert_eq!(
            scan_set("a /* x /* y */ / b"),
            vec![
                (1, TokenKind::Ident, String::from("a")),
                (3, TokenKind::Comment, String::from("/* x /* y */")),
                (16, TokenKind::Slash, String::from("/")),
                (18, TokenKind::Ident, String::from("b")),
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = lexer("select /* never closed").tokenize().unwrap_err();
        assert_eq!(err, LexError::UnterminatedComment { pos: Pos::new(8) });
    }

    #[test]
    fn test_illegal_character_reported() {
        let reported = RefCell::new(Vec::new());
        let src = "a @ b";
        let fset = FileSet::new();
        let file = fset.register("test.sql", None, src.len());
        let mut lx = Lexer::new(file, src)
            .with_error_handler(|pos, msg| reported.borrow_mut().push((pos, msg.to_string())));
        let kinds: Vec<_> = lx.tokenize().unwrap().into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Illegal,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
        assert_eq!(lx.error_count(), 1);
        drop(lx);
        let reported = reported.into_inner();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].0, Pos::new(3));
    }

    #[test]
    fn test_line_starts_recorded() {
        let src = "select a,\n  b\nfrom t";
        let fset = FileSet::new();
        let file = fset.register("test.sql", None, src.len());
        let _ = Lexer::new(Arc::clone(&file), src).tokenize().unwrap();
        assert_eq!(file.lines(), vec![0, 10, 14]);
        let pos = fset.position(file.pos(12)).unwrap();
        assert_eq!((pos.line, pos.column), (2, 3));
    }

    #[test]
    fn test_bom_skipped() {
        let src = "\u{FEFF}select";
        let tokens = tokenize(src);
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Select));
        assert_eq!(tokens[0].pos, Pos::new(4));
    }

    #[test]
    fn test_deterministic() {
        let src = "select a.b, count(*) from t where x >= -1 -- c\n";
        assert_eq!(tokenize(src), tokenize(src));
    }

    #[test]
    fn test_deadline_exceeded() {
        let src = "'a long string";
        let past = Instant::now().checked_sub(Duration::from_secs(1)).unwrap();
        let err = lexer(src).with_deadline(past).tokenize().unwrap_err();
        assert_eq!(err, LexError::DeadlineExceeded { pos: Pos::new(1) });
    }

    #[test]
    #[should_panic(expected = "does not match source length")]
    fn test_size_mismatch_panics() {
        let fset = FileSet::new();
        let file = fset.register("test.sql", None, 3);
        let _ = Lexer::new(file, "select");
    }
}
