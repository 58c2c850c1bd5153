use std::ops::Range;

use crate::error::{Error, Result};

/// Lexical units of a SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Select,
    From,
    Where,
    And,
    Or,
    Order,
    By,
    Asc,
    Desc,
    Inner,
    Join,
    On,
    As,
    Is,
    Not,
    Null,

    /// Table, alias, column or function name.
    Ident(String),
    /// `"testmodell"`
    QuotedIdent(String),
    /// Kept as written so `12.50` keeps its scale.
    Number(String),
    /// Single-quoted literal with `''` already unescaped.
    String(String),

    LeftParen,
    RightParen,
    /// Opens ODBC escapes such as `{d '2016-05-15'}`.
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Star,
    Dot,
    Colon,
    Plus,
    Minus,
    Slash,
    Equal,
    /// `<>` or `!=`
    NotEqual,
    Lower,
    LowerEqual,
    Greater,
    GreaterEqual,

    Eof,
}

/// A token together with the byte range it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Range<usize>,
}

/// Splits SQL text into [Spanned] tokens.
pub struct Tokenizer {
    /// `(byte offset, char)` pairs of the input.
    input: Vec<(usize, char)>,
    len: usize,
    position: usize,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.char_indices().collect(),
            len: input.len(),
            position: 0,
        }
    }

    /// Tokenizes the whole input. The last token is always [Token::Eof],
    /// spanning the empty range at the end of the text.
    ///
    /// ```
    /// # use memquery::tokenizer::{Tokenizer, Token};
    /// let tokens = Tokenizer::new("SELECT *").tokenize().unwrap();
    /// assert_eq!(tokens[0].token, Token::Select);
    /// assert_eq!(tokens[1].span, 7..8);
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<Spanned>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            let start = self.offset();
            let token = self.next_token()?;
            tokens.push(Spanned {
                token,
                span: start..self.offset(),
            });
        }

        tokens.push(Spanned {
            token: Token::Eof,
            span: self.len..self.len,
        });
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        let ch = self.current_char();

        let token = match ch {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '*' => Token::Star,
            '.' => Token::Dot,
            ':' => Token::Colon,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '/' => Token::Slash,
            '=' => Token::Equal,
            '<' | '>' | '!' => return self.read_comparator(),
            '\'' => return self.read_string(),
            '"' => return self.read_quoted_identifier(),
            c if c.is_alphabetic() || c == '_' => return Ok(self.read_identifier()),
            c if c.is_ascii_digit() => return self.read_number(),
            _ => return Err(Error::parse(format!("character: {ch:?} is not supported"))),
        };
        self.advance();
        Ok(token)
    }

    // Navigation

    fn current_char(&self) -> char {
        self.input[self.position].1
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).map(|(_, c)| *c)
    }

    /// Byte offset of the current position.
    fn offset(&self) -> usize {
        self.input
            .get(self.position)
            .map_or(self.len, |(offset, _)| *offset)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    // Readers

    /// Reads `<`, `<=`, `<>`, `>`, `>=` and `!=`.
    fn read_comparator(&mut self) -> Result<Token> {
        let token = match (self.current_char(), self.peek_char()) {
            ('<', Some('=')) => Token::LowerEqual,
            ('<', Some('>')) => Token::NotEqual,
            ('>', Some('=')) => Token::GreaterEqual,
            ('!', Some('=')) => Token::NotEqual,
            ('<', _) => {
                self.advance();
                return Ok(Token::Lower);
            }
            ('>', _) => {
                self.advance();
                return Ok(Token::Greater);
            }
            (ch, _) => return Err(Error::parse(format!("character: {ch:?} is not supported"))),
        };
        self.advance();
        self.advance();
        Ok(token)
    }

    /// Keyword or identifier. `$` and `#` are allowed after the first char
    /// (`SEQ$ID`); keywords match in any case.
    fn read_identifier(&mut self) -> Token {
        let mut ident = String::new();

        while !self.is_at_end()
            && (self.current_char().is_alphanumeric() || matches!(self.current_char(), '_' | '$' | '#'))
        {
            ident.push(self.current_char());
            self.advance();
        }

        match ident.to_uppercase().as_str() {
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            "WHERE" => Token::Where,
            "AND" => Token::And,
            "OR" => Token::Or,
            "ORDER" => Token::Order,
            "BY" => Token::By,
            "ASC" => Token::Asc,
            "DESC" => Token::Desc,
            "INNER" => Token::Inner,
            "JOIN" => Token::Join,
            "ON" => Token::On,
            "AS" => Token::As,
            "IS" => Token::Is,
            "NOT" => Token::Not,
            "NULL" => Token::Null,
            _ => Token::Ident(ident),
        }
    }

    /// Reads a numeric literal with at most one decimal point.
    fn read_number(&mut self) -> Result<Token> {
        let mut number = String::new();
        let mut has_dot = false;

        while !self.is_at_end()
            && (self.current_char().is_ascii_digit() || (self.current_char() == '.' && !has_dot))
        {
            if self.current_char() == '.' {
                has_dot = true;
            }
            number.push(self.current_char());
            self.advance();
        }

        if !self.is_at_end() && self.current_char() == '.' {
            return Err(Error::parse("multiple dots are not allowed for a number"));
        }

        Ok(Token::Number(number))
    }

    /// Reads a string literal enclosed in single quotes. A doubled quote
    /// inside the literal stands for one quote.
    fn read_string(&mut self) -> Result<Token> {
        self.advance();

        let mut string = String::new();
        loop {
            if self.is_at_end() {
                return Err(Error::parse("Unterminated string"));
            }
            let ch = self.current_char();
            self.advance();
            if ch != '\'' {
                string.push(ch);
                continue;
            }
            if !self.is_at_end() && self.current_char() == '\'' {
                string.push('\'');
                self.advance();
                continue;
            }
            return Ok(Token::String(string));
        }
    }

    /// Reads a name enclosed in double quotes.
    fn read_quoted_identifier(&mut self) -> Result<Token> {
        self.advance();

        let mut ident = String::new();
        while !self.is_at_end() && self.current_char() != '"' {
            ident.push(self.current_char());
            self.advance();
        }

        if self.is_at_end() {
            return Err(Error::parse("Unterminated quoted identifier"));
        }

        self.advance();
        Ok(Token::QuotedIdent(ident))
    }
}
