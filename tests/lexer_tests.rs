#[cfg(test)]
mod tests {
    use breeze_lang::ast::TokenKind;
    use breeze_lang::Lexer;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut result = Vec::new();
        loop {
            let token = lexer.next_token();
            let kind = token.kind;
            result.push(kind);
            if kind == TokenKind::Eof {
                break;
            }
        }
        result
    }

    // ========================================================================
    // Token kinds
    // ========================================================================

    #[test]
    fn test_stage_keywords_and_pipe() {
        assert_eq!(
            kinds("filter | sort | group | map"),
            vec![
                TokenKind::Filter,
                TokenKind::Pipe,
                TokenKind::Sort,
                TokenKind::Pipe,
                TokenKind::Group,
                TokenKind::Pipe,
                TokenKind::Map,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("= > contains + - * / exists !exists"),
            vec![
                TokenKind::Equals,
                TokenKind::GreaterThan,
                TokenKind::Contains,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Exists,
                TokenKind::NotExists,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("( ) [ ] ,"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Comma,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_literals() {
        let mut lexer = Lexer::new("42 3.14 \"hi\" 'c' true false null");

        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Integer);
        assert_eq!(token.text, "42");

        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Float);
        assert_eq!(token.text, "3.14");

        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.text, "hi");

        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Char);
        assert_eq!(token.text, "c");

        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Boolean);
        assert_eq!(token.text, "true");

        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Boolean);
        assert_eq!(token.text, "false");

        assert_eq!(lexer.next_token().kind, TokenKind::Null);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_numbers_keep_raw_text() {
        let mut lexer = Lexer::new("007 1.50");
        assert_eq!(lexer.next_token().text, "007");
        assert_eq!(lexer.next_token().text, "1.50");
    }

    #[test]
    fn test_string_escapes() {
        let mut lexer = Lexer::new(r#""a\nb\tc\"d""#);
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.text, "a\nb\tc\"d");
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    #[test]
    fn test_field_reference_keeps_dot() {
        let mut lexer = Lexer::new(".price");
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.text, ".price");
    }

    #[test]
    fn test_identifier_with_digits_and_underscore() {
        let mut lexer = Lexer::new("user_id2");
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.text, "user_id2");
    }

    #[test]
    fn test_keyword_embedded_in_identifier_not_split() {
        let mut lexer = Lexer::new("a|filter b");
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.text, "a|filter");
        assert_eq!(lexer.next_token().text, "b");
    }

    #[test]
    fn test_digit_cannot_start_identifier() {
        let mut lexer = Lexer::new("2fast");
        assert_eq!(lexer.next_token().kind, TokenKind::Integer);
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
    }

    // ========================================================================
    // Lookahead contract
    // ========================================================================

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("sort a");
        assert_eq!(lexer.peek().kind, TokenKind::Sort);
        assert_eq!(lexer.peek().kind, TokenKind::Sort);
        assert_eq!(lexer.next_token().kind, TokenKind::Sort);
        assert_eq!(lexer.next_token().text, "a");
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_text_and_position_track_consumed_token() {
        let mut lexer = Lexer::new("filter price");
        lexer.next_token();
        assert_eq!(lexer.text(), "filter");
        assert_eq!(lexer.position(), 1);

        // A pending peek must not disturb either accessor.
        lexer.peek();
        assert_eq!(lexer.text(), "filter");
        assert_eq!(lexer.position(), 1);

        lexer.next_token();
        assert_eq!(lexer.text(), "price");
        assert_eq!(lexer.position(), 8);
    }

    #[test]
    fn test_positions_are_one_indexed_columns() {
        let mut lexer = Lexer::new("sort a desc");
        assert_eq!(lexer.next_token().position, 1);
        assert_eq!(lexer.next_token().position, 6);
        assert_eq!(lexer.next_token().position, 8);
    }

    // ========================================================================
    // Malformed input never errors
    // ========================================================================

    #[test]
    fn test_unknown_character_is_unrecognized() {
        let mut lexer = Lexer::new("%");
        let token = lexer.next_token();
        assert_eq!(token.kind, TokenKind::Unrecognized);
        assert_eq!(token.text, "%");
    }

    #[test]
    fn test_unterminated_string_is_unrecognized() {
        let mut lexer = Lexer::new("\"oops");
        assert_eq!(lexer.next_token().kind, TokenKind::Unrecognized);
    }

    #[test]
    fn test_bang_without_exists_is_unrecognized() {
        let mut lexer = Lexer::new("!missing");
        assert_eq!(lexer.next_token().kind, TokenKind::Unrecognized);
    }
}
