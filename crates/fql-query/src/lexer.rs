//! Query lexer (tokenizer).
//!
//! Splits a query string on whitespace, keeping double-quoted runs and
//! bracketed range values together as single tokens.

use std::{fmt, iter::Peekable, str::Chars};

use serde::Serialize;

use crate::{
    ast::Occurrence,
    error::{QueryError, QueryErrorKind},
};

/// The lexical shape of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// An unquoted run of text. May contain `field:` prefixes and embedded
    /// quoted or bracketed segments, which are kept verbatim.
    Bare(String),

    /// A token that was entirely a `"..."` run (the quotes are stripped).
    Quoted(String),
}

/// A token together with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Byte offset of the first character of the token in the input.
    pub position: usize,
}

impl Token {
    /// Returns the token's text (without surrounding quotes for quoted tokens).
    pub fn text(&self) -> &str {
        match &self.kind {
            TokenKind::Bare(text) | TokenKind::Quoted(text) => text,
        }
    }

    /// Returns the connective this token stands for, if any.
    ///
    /// Only bare tokens without a `:` can be connectives.
    pub fn connective(&self) -> Option<Connective> {
        match &self.kind {
            TokenKind::Bare(text) if !text.contains(':') => Connective::from_keyword(text),
            _ => None,
        }
    }
}

/// A boolean connective keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connective {
    /// `AND`: the next clause must match.
    And,
    /// `OR`: the next clause should match.
    Or,
    /// `NOT`: the next clause must not match.
    Not,
}

impl Connective {
    /// Recognizes a connective keyword, case-insensitively.
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("AND") {
            Some(Self::And)
        } else if word.eq_ignore_ascii_case("OR") {
            Some(Self::Or)
        } else if word.eq_ignore_ascii_case("NOT") {
            Some(Self::Not)
        } else {
            None
        }
    }

    /// The occurrence this connective assigns to the clause after it.
    pub fn occurrence(self) -> Occurrence {
        match self {
            Self::And => Occurrence::Must,
            Self::Or => Occurrence::Should,
            Self::Not => Occurrence::MustNot,
        }
    }

    /// The canonical keyword spelling.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, QueryError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, QueryError> {
        self.skip_whitespace();

        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };
        let start = self.position;

        if ch == '"' {
            let content = self.read_quoted()?;
            if self.at_boundary() {
                return Ok(Some(Token {
                    kind: TokenKind::Quoted(content),
                    position: start,
                }));
            }
            // A quoted run glued to more text is part of a bare token.
            let word = format!("\"{content}\"");
            return self.read_bare(start, word).map(Some);
        }

        self.read_bare(start, String::new()).map(Some)
    }

    /// Reads a `"..."` run and returns its content without the quotes.
    fn read_quoted(&mut self) -> Result<String, QueryError> {
        let start = self.position;
        self.advance(); // consume opening quote

        let mut content = String::new();
        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance();
                    return Ok(content);
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => {
                    return Err(QueryError::new(QueryErrorKind::UnterminatedQuote).at(start));
                }
            }
        }
    }

    /// Returns true if the `[` under the cursor is closed by a `]` before any other `[`.
    fn bracket_closes(&self) -> bool {
        self.chars
            .clone()
            .skip(1)
            .find(|ch| matches!(ch, '[' | ']'))
            == Some(']')
    }

    /// Reads a closed `[...]` run, including both brackets.
    fn read_bracketed(&mut self) -> String {
        let mut content = String::new();

        while let Some(&ch) = self.chars.peek() {
            content.push(ch);
            self.advance();
            if ch == ']' {
                break;
            }
        }

        content
    }

    /// Reads the rest of a bare token, appending to `word`.
    ///
    /// Quoted runs keep their quotes so the clause builder can tell a quoted
    /// value from a plain one. A `[` directly after the first `:` that is closed
    /// later opens a range value that may contain spaces; an unclosed `[` is
    /// ordinary text.
    fn read_bare(&mut self, start: usize, mut word: String) -> Result<Token, QueryError> {
        let mut seen_colon = false;
        let mut value_start = false;

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                break;
            }

            match ch {
                '"' => {
                    let content = self.read_quoted()?;
                    word.push('"');
                    word.push_str(&content);
                    word.push('"');
                    value_start = false;
                }
                '[' if value_start && self.bracket_closes() => {
                    word.push_str(&self.read_bracketed());
                    value_start = false;
                }
                _ => {
                    value_start = ch == ':' && !seen_colon;
                    seen_colon |= ch == ':';
                    word.push(ch);
                    self.advance();
                }
            }
        }

        Ok(Token {
            kind: TokenKind::Bare(word),
            position: start,
        })
    }

    /// Returns true at end of input or before whitespace.
    fn at_boundary(&mut self) -> bool {
        self.chars.peek().is_none_or(|ch| ch.is_whitespace())
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Tokenizes a query string.
///
/// Empty or whitespace-only input yields no tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, QueryError> {
    Lexer::new(input)
        .tokenize()
        .map_err(|err| err.with_query(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn bare(s: &str) -> TokenKind {
        TokenKind::Bare(s.into())
    }

    fn quoted(s: &str) -> TokenKind {
        TokenKind::Quoted(s.into())
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(""), vec![]);
        assert_eq!(kinds("  \t "), vec![]);
    }

    #[test]
    fn bare_words() {
        assert_eq!(
            kinds("dracula OR nosferatu"),
            vec![bare("dracula"), bare("OR"), bare("nosferatu")]
        );
    }

    #[test]
    fn quoted_phrase_is_one_token() {
        assert_eq!(kinds("\"blade runner\""), vec![quoted("blade runner")]);
    }

    #[test]
    fn field_with_quoted_value_stays_bare() {
        assert_eq!(
            kinds("title:\"blade runner\" AND genres:scifi"),
            vec![
                bare("title:\"blade runner\""),
                bare("AND"),
                bare("genres:scifi")
            ]
        );
    }

    #[test]
    fn range_value_keeps_spaces() {
        assert_eq!(
            kinds("average_rating:[7 TO 9] horror"),
            vec![bare("average_rating:[7 TO 9]"), bare("horror")]
        );
    }

    #[test]
    fn bracket_outside_value_is_plain_text() {
        assert_eq!(kinds("[7 TO 9]"), vec![bare("[7"), bare("TO"), bare("9]")]);
    }

    #[test]
    fn quoted_run_glued_to_text() {
        assert_eq!(kinds("\"blade\"runner x"), vec![bare("\"blade\"runner"), bare("x")]);
    }

    #[test]
    fn positions_are_byte_offsets() {
        let tokens = tokenize("  café  \"x y\" z").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![2, 9, 15]);
    }

    #[test]
    fn unterminated_quote() {
        let err = tokenize("title:\"blade runner").unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::UnterminatedQuote);
        assert_eq!(err.position, Some(6));
        assert_eq!(err.query.as_deref(), Some("title:\"blade runner"));
    }

    #[test]
    fn unclosed_bracket_is_plain_text() {
        assert_eq!(
            kinds("rating:[7 TO 9"),
            vec![bare("rating:[7"), bare("TO"), bare("9")]
        );
        assert_eq!(kinds("title:[draft"), vec![bare("title:[draft")]);
    }

    #[test]
    fn bracket_run_stops_before_another_bracket() {
        assert_eq!(
            kinds("title:[draft genres:[1 TO 2]"),
            vec![bare("title:[draft"), bare("genres:[1 TO 2]")]
        );
    }

    #[test]
    fn connective_recognition() {
        let tokens = tokenize("and Or NOT \"OR\" or:x").unwrap();
        let connectives: Vec<Option<Connective>> =
            tokens.iter().map(Token::connective).collect();
        assert_eq!(
            connectives,
            vec![
                Some(Connective::And),
                Some(Connective::Or),
                Some(Connective::Not),
                None,
                None
            ]
        );
    }

    #[test]
    fn connective_occurrences() {
        assert_eq!(Connective::And.occurrence(), Occurrence::Must);
        assert_eq!(Connective::Or.occurrence(), Occurrence::Should);
        assert_eq!(Connective::Not.occurrence(), Occurrence::MustNot);
    }

    #[test]
    fn round_trips_non_whitespace_content() {
        let queries = [
            "title:\"blade runner\" AND genres:scifi",
            "release_year:>=2000",
            "average_rating:[7 TO 9]",
            "dracula OR nosferatu",
            "  \"the  thing\"   NOT  type:tv ",
        ];

        for query in queries {
            let strip = |s: &str| -> String {
                s.chars()
                    .filter(|c| !c.is_whitespace() && *c != '"')
                    .collect()
            };
            let joined: String = tokenize(query)
                .unwrap()
                .iter()
                .map(|t| strip(t.text()))
                .collect();
            assert_eq!(joined, strip(query), "content lost for {query:?}");
        }
    }
}
