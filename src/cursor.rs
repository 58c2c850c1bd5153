//! A window over the token stream of one statement.
//!
//! Clause parsers never do substring arithmetic on the statement. They split
//! cursors at keyword positions and read back the source text a cursor
//! covers, so literals keep their original spelling (`to_date('15.05.16','DD.MM.RR')`).

use crate::tokenizer::{Spanned, Token};

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    sql: &'a str,
    tokens: &'a [Spanned],
}

impl<'a> Cursor<'a> {
    /// Cursor over a whole statement. The trailing [Token::Eof] and any
    /// trailing semicolons are left out.
    pub fn new(sql: &'a str, tokens: &'a [Spanned]) -> Self {
        let mut end = tokens.len();
        while end > 0 && matches!(tokens[end - 1].token, Token::Eof | Token::Semicolon) {
            end -= 1;
        }
        Self {
            sql,
            tokens: &tokens[..end],
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, idx: usize) -> Option<&'a Token> {
        self.tokens.get(idx).map(|spanned| &spanned.token)
    }

    pub fn first(&self) -> Option<&'a Token> {
        self.token(0)
    }

    pub fn last(&self) -> Option<&'a Token> {
        self.tokens.last().map(|spanned| &spanned.token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &'a Token> + 'a {
        self.tokens.iter().map(|spanned| &spanned.token)
    }

    /// The statement text covered by this cursor, as written.
    pub fn text(&self) -> &'a str {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => &self.sql[first.span.start..last.span.end],
            _ => "",
        }
    }

    /// Tokens `[from, to)` of this cursor.
    pub fn slice(&self, from: usize, to: usize) -> Cursor<'a> {
        let to = to.min(self.tokens.len());
        let from = from.min(to);
        Cursor {
            sql: self.sql,
            tokens: &self.tokens[from..to],
        }
    }

    /// Everything from `idx` on.
    pub fn skip(&self, idx: usize) -> Cursor<'a> {
        self.slice(idx, self.tokens.len())
    }

    /// Splits around the `width` tokens starting at `idx`; those tokens belong
    /// to neither half.
    pub fn split_around(&self, idx: usize, width: usize) -> (Cursor<'a>, Cursor<'a>) {
        (self.slice(0, idx), self.skip(idx + width))
    }

    /// Indexes of tokens not nested in parentheses or braces.
    fn top_level(&self) -> Vec<usize> {
        let mut depth = 0usize;
        let mut positions = Vec::with_capacity(self.tokens.len());
        for (idx, spanned) in self.tokens.iter().enumerate() {
            if matches!(spanned.token, Token::RightParen | Token::RightBrace) {
                depth = depth.saturating_sub(1);
            }
            if depth == 0 {
                positions.push(idx);
            }
            if matches!(spanned.token, Token::LeftParen | Token::LeftBrace) {
                depth += 1;
            }
        }
        positions
    }

    /// First top-level position where `sequence` starts.
    pub fn find_first(&self, sequence: &[Token]) -> Option<usize> {
        self.top_level()
            .into_iter()
            .find(|&idx| self.matches_at(idx, sequence))
    }

    /// Last top-level position where `sequence` starts.
    pub fn find_last(&self, sequence: &[Token]) -> Option<usize> {
        self.top_level()
            .into_iter()
            .rev()
            .find(|&idx| self.matches_at(idx, sequence))
    }

    /// First top-level position of a token accepted by `predicate`.
    pub fn position(&self, predicate: impl Fn(&Token) -> bool) -> Option<usize> {
        self.top_level()
            .into_iter()
            .find(|&idx| predicate(&self.tokens[idx].token))
    }

    pub fn contains_top_level(&self, token: &Token) -> bool {
        self.find_first(std::slice::from_ref(token)).is_some()
    }

    fn matches_at(&self, idx: usize, sequence: &[Token]) -> bool {
        !sequence.is_empty()
            && self.tokens.len() >= idx + sequence.len()
            && self.tokens[idx..idx + sequence.len()]
                .iter()
                .zip(sequence)
                .all(|(spanned, expected)| spanned.token == *expected)
    }

    /// Splits at every top-level token accepted by `predicate`.
    pub fn split(&self, predicate: impl Fn(&Token) -> bool) -> Vec<Cursor<'a>> {
        let mut parts = Vec::new();
        let mut start = 0;
        for idx in self.top_level() {
            if predicate(&self.tokens[idx].token) {
                parts.push(self.slice(start, idx));
                start = idx + 1;
            }
        }
        parts.push(self.skip(start));
        parts
    }

    /// Removes parentheses that enclose the whole cursor, repeatedly.
    pub fn strip_parens(&self) -> Cursor<'a> {
        let mut cursor = *self;
        while cursor.len() >= 2
            && cursor.first() == Some(&Token::LeftParen)
            && cursor.last() == Some(&Token::RightParen)
            && cursor.closing_paren_of_first() == Some(cursor.len() - 1)
        {
            cursor = cursor.slice(1, cursor.len() - 1);
        }
        cursor
    }

    fn closing_paren_of_first(&self) -> Option<usize> {
        let mut depth = 0usize;
        for (idx, spanned) in self.tokens.iter().enumerate() {
            match spanned.token {
                Token::LeftParen => depth += 1,
                Token::RightParen => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                _ => {}
            }
        }
        None
    }
}
