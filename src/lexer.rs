use crate::ast::{Token, TokenKind};

/// Streaming tokenizer with one-token lookahead.
///
/// The lexer itself never reports errors: malformed input is emitted as an
/// [`TokenKind::Unrecognized`] token and rejected by the parser, which owns
/// all diagnostics. Cloning the lexer snapshots its state, which the parser
/// uses to backtrack between primary-value alternatives.
#[derive(Clone)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    peeked: Option<Token>,
    last: Option<Token>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            peeked: None,
            last: None,
        }
    }

    /// Consume and return the next token (or the EOF sentinel).
    pub fn next_token(&mut self) -> Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        };
        self.last = Some(token.clone());
        token
    }

    /// Return the next token without consuming it.
    ///
    /// Idempotent: repeated peeks return the same token until `next_token`
    /// is called.
    pub fn peek(&mut self) -> Token {
        if let Some(token) = &self.peeked {
            return token.clone();
        }
        let token = self.scan();
        self.peeked = Some(token.clone());
        token
    }

    /// Raw text of the most recently consumed token.
    ///
    /// A pending peek does not affect this; it keeps reporting what
    /// `next_token` last returned.
    pub fn text(&self) -> &str {
        self.last.as_ref().map(|t| t.text.as_str()).unwrap_or("")
    }

    /// 1-indexed column of the most recently consumed token.
    pub fn position(&self) -> usize {
        self.last.as_ref().map(|t| t.position).unwrap_or(1)
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_ident_start(ch: char) -> bool {
        ch.is_alphabetic() || ch == '_'
    }

    // `|` is a valid continuation character so that stage keywords glued to
    // other words ("a|filter") stay one identifier instead of mis-splitting.
    fn is_ident_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '|'
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_ident_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Read a quoted literal. Returns the unquoted content, or `None` when
    /// the closing quote is missing.
    fn read_quoted(&mut self, quote: char) -> Option<String> {
        let mut result = String::new();
        self.advance(); // consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Some(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some(other) => {
                            result.push('\\');
                            result.push(other);
                        }
                        None => return None,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        None
    }

    fn read_number(&mut self, column: usize) -> Token {
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if is_float {
            Token::new(TokenKind::Float, number, column)
        } else {
            Token::new(TokenKind::Integer, number, column)
        }
    }

    fn scan(&mut self) -> Token {
        self.skip_whitespace();
        let column = self.position + 1;

        match self.current_char() {
            None => Token::new(TokenKind::Eof, "", column),
            Some('|') => {
                self.advance();
                Token::new(TokenKind::Pipe, "|", column)
            }
            Some('(') => {
                self.advance();
                Token::new(TokenKind::LParen, "(", column)
            }
            Some(')') => {
                self.advance();
                Token::new(TokenKind::RParen, ")", column)
            }
            Some('[') => {
                self.advance();
                Token::new(TokenKind::LBracket, "[", column)
            }
            Some(']') => {
                self.advance();
                Token::new(TokenKind::RBracket, "]", column)
            }
            Some(',') => {
                self.advance();
                Token::new(TokenKind::Comma, ",", column)
            }
            Some('=') => {
                self.advance();
                Token::new(TokenKind::Equals, "=", column)
            }
            Some('>') => {
                self.advance();
                Token::new(TokenKind::GreaterThan, ">", column)
            }
            Some('+') => {
                self.advance();
                Token::new(TokenKind::Plus, "+", column)
            }
            Some('-') => {
                self.advance();
                Token::new(TokenKind::Minus, "-", column)
            }
            Some('*') => {
                self.advance();
                Token::new(TokenKind::Star, "*", column)
            }
            Some('/') => {
                self.advance();
                Token::new(TokenKind::Slash, "/", column)
            }
            Some('!') => {
                self.advance();
                if self.current_char().is_some_and(Self::is_ident_start) {
                    let word = self.read_identifier();
                    if word == "exists" {
                        Token::new(TokenKind::NotExists, "!exists", column)
                    } else {
                        Token::new(TokenKind::Unrecognized, format!("!{}", word), column)
                    }
                } else {
                    Token::new(TokenKind::Unrecognized, "!", column)
                }
            }
            Some('"') => match self.read_quoted('"') {
                Some(text) => Token::new(TokenKind::String, text, column),
                None => Token::new(TokenKind::Unrecognized, "\"", column),
            },
            Some('\'') => match self.read_quoted('\'') {
                Some(text) => Token::new(TokenKind::Char, text, column),
                None => Token::new(TokenKind::Unrecognized, "'", column),
            },
            Some('.') => {
                if self.peek_char(1).is_some_and(Self::is_ident_start) {
                    self.advance();
                    let name = self.read_identifier();
                    Token::new(TokenKind::Identifier, format!(".{}", name), column)
                } else {
                    self.advance();
                    Token::new(TokenKind::Unrecognized, ".", column)
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(column),
            Some(ch) if Self::is_ident_start(ch) => {
                let ident = self.read_identifier();

                let kind = match ident.as_str() {
                    "filter" => TokenKind::Filter,
                    "sort" => TokenKind::Sort,
                    "group" => TokenKind::Group,
                    "map" => TokenKind::Map,
                    "exists" => TokenKind::Exists,
                    "contains" => TokenKind::Contains,
                    "true" | "false" => TokenKind::Boolean,
                    "null" => TokenKind::Null,
                    _ => TokenKind::Identifier,
                };
                Token::new(kind, ident, column)
            }
            Some(ch) => {
                self.advance();
                Token::new(TokenKind::Unrecognized, ch.to_string(), column)
            }
        }
    }
}

#[test]
fn test_stage_keywords() {
    let mut lexer = Lexer::new("filter sort group map");
    assert_eq!(lexer.next_token().kind, TokenKind::Filter);
    assert_eq!(lexer.next_token().kind, TokenKind::Sort);
    assert_eq!(lexer.next_token().kind, TokenKind::Group);
    assert_eq!(lexer.next_token().kind, TokenKind::Map);
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
}

#[test]
fn test_peek_is_idempotent() {
    let mut lexer = Lexer::new("sort a");
    assert_eq!(lexer.peek().kind, TokenKind::Sort);
    assert_eq!(lexer.peek().kind, TokenKind::Sort);
    assert_eq!(lexer.next_token().kind, TokenKind::Sort);
    assert_eq!(lexer.peek().text, "a");
}

#[test]
fn test_text_tracks_consumed_not_peeked() {
    let mut lexer = Lexer::new("filter a");
    lexer.next_token();
    lexer.peek();
    assert_eq!(lexer.text(), "filter");
    assert_eq!(lexer.position(), 1);
}

#[test]
fn test_pipe_inside_identifier() {
    let mut lexer = Lexer::new("a|filter");
    let token = lexer.next_token();
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.text, "a|filter");
}
