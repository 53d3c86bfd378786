use crate::aggregate::AggFunc;
use crate::ast::{
    ArithOp, BinaryCheck, CheckOp, Expr, FieldAssignment, ScalarKind, Stage, Token, TokenKind,
    UnaryCheck, UnaryOp,
};
use crate::functions::FunctionRegistry;
use crate::lexer::Lexer;

/// A parse failure with the position it occurred at.
///
/// `Display` draws the original query with a caret under the failing column
/// and the innermost failure message. Sub-parsers propagate their deepest
/// failure unchanged rather than stacking context strings, so the user sees
/// the most specific diagnosis.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub query: String,
    pub position: usize,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.message)?;
        writeln!(f, "{}", self.query)?;
        write!(f, "{}^", " ".repeat(self.position.saturating_sub(1)))
    }
}

impl std::error::Error for ParseError {}

/// Internal failure carried between sub-parsers; the public [`ParseError`]
/// adds the query text for rendering.
#[derive(Debug, Clone)]
struct Failure {
    position: usize,
    message: String,
}

impl Failure {
    fn new(position: usize, message: impl Into<String>) -> Self {
        Failure {
            position,
            message: message.into(),
        }
    }
}

type PResult<T> = Result<T, Failure>;

/// Parse a query string into its pipeline of stages.
///
/// The registry is consulted only to confirm that called function names
/// exist; arity and argument types are validated at execution time.
///
/// # Examples
///
/// ```
/// use breeze_lang::{FunctionRegistry, parse};
///
/// let registry = FunctionRegistry::new();
/// let stages = parse("filter status = \"error\" | sort latency desc", &registry).unwrap();
/// assert_eq!(stages.len(), 2);
/// ```
pub fn parse(input: &str, registry: &FunctionRegistry) -> Result<Vec<Stage>, ParseError> {
    let mut parser = Parser::new(Lexer::new(input), registry);
    parser.pipeline().map_err(|failure| ParseError {
        query: input.to_string(),
        position: failure.position,
        message: failure.message,
    })
}

/// Recursive-descent parser over the lexer's token stream.
pub struct Parser<'a> {
    lexer: Lexer,
    registry: &'a FunctionRegistry,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer, registry: &'a FunctionRegistry) -> Self {
        Parser { lexer, registry }
    }

    fn pipeline(&mut self) -> PResult<Vec<Stage>> {
        let mut stages = vec![self.stage()?];

        loop {
            let token = self.lexer.peek();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Pipe => {
                    self.lexer.next_token();
                    stages.push(self.stage()?);
                }
                _ => {
                    return Err(Failure::new(
                        token.position,
                        format!("expected '|' between stages, got {}", describe(&token)),
                    ));
                }
            }
        }

        Ok(stages)
    }

    fn stage(&mut self) -> PResult<Stage> {
        let token = self.lexer.next_token();
        match token.kind {
            TokenKind::Filter => self.filter_stage(),
            TokenKind::Sort => self.sort_stage(),
            TokenKind::Group => self.group_stage(),
            TokenKind::Map => self.map_stage(),
            TokenKind::Eof => Err(Failure::new(
                token.position,
                "unexpected end of input, expected a stage",
            )),
            _ => Err(Failure::new(
                token.position,
                format!("unrecognized stage keyword: {}", describe(&token)),
            )),
        }
    }

    /// `filter (check)*` - zero checks is legal and matches every document.
    fn filter_stage(&mut self) -> PResult<Stage> {
        let mut binary_checks = Vec::new();
        let mut unary_checks = Vec::new();

        while self.lexer.peek().kind == TokenKind::Identifier {
            let field = self.field_name()?;
            let op_token = self.lexer.peek();
            match op_token.kind {
                TokenKind::Exists => {
                    self.lexer.next_token();
                    unary_checks.push(UnaryCheck {
                        field,
                        op: UnaryOp::Exists,
                    });
                }
                TokenKind::NotExists => {
                    self.lexer.next_token();
                    unary_checks.push(UnaryCheck {
                        field,
                        op: UnaryOp::NotExists,
                    });
                }
                TokenKind::Equals | TokenKind::GreaterThan | TokenKind::Contains => {
                    let op = match self.lexer.next_token().kind {
                        TokenKind::Equals => CheckOp::Equal,
                        TokenKind::GreaterThan => CheckOp::Greater,
                        _ => CheckOp::Contains,
                    };
                    let expr = self.expression()?;
                    binary_checks.push(BinaryCheck { field, op, expr });
                }
                _ => {
                    return Err(Failure::new(
                        op_token.position,
                        format!(
                            "expected check operator ('=', '>', 'contains', 'exists' or \
                             '!exists'), got {}",
                            describe(&op_token)
                        ),
                    ));
                }
            }
        }

        Ok(Stage::Filter {
            binary_checks,
            unary_checks,
        })
    }

    /// `sort field (asc|desc)?` - direction words are only consumed when
    /// present; anything else is left for the next stage.
    fn sort_stage(&mut self) -> PResult<Stage> {
        let field = self.field_name()?;

        let next = self.lexer.peek();
        let descending = if next.kind == TokenKind::Identifier && next.text == "desc" {
            self.lexer.next_token();
            true
        } else {
            if next.kind == TokenKind::Identifier && next.text == "asc" {
                self.lexer.next_token();
            }
            false
        };

        Ok(Stage::Sort { field, descending })
    }

    /// `group func field ('by' field)?`
    fn group_stage(&mut self) -> PResult<Stage> {
        let func_token = self.lexer.next_token();
        if func_token.kind != TokenKind::Identifier {
            return Err(Failure::new(
                func_token.position,
                format!(
                    "expected aggregation function name, got {}",
                    describe(&func_token)
                ),
            ));
        }
        let func = AggFunc::from_name(&func_token.text).ok_or_else(|| {
            Failure::new(
                func_token.position,
                format!("unknown aggregation function: '{}'", func_token.text),
            )
        })?;

        let aggregate_field = self.field_name()?;

        let next = self.lexer.peek();
        let group_by_field = if next.kind == TokenKind::Identifier && next.text == "by" {
            self.lexer.next_token();
            Some(self.field_name()?)
        } else {
            None
        };

        Ok(Stage::Group {
            group_by_field,
            aggregate_field,
            func,
        })
    }

    /// `map (field '=' expr)+`
    fn map_stage(&mut self) -> PResult<Stage> {
        let mut assignments = Vec::new();

        loop {
            let field = self.field_name()?;
            self.expect(TokenKind::Equals, "'=' after field name")?;
            let assignment = self.expression()?;
            assignments.push(FieldAssignment { field, assignment });

            if self.lexer.peek().kind != TokenKind::Identifier {
                break;
            }
        }

        Ok(Stage::Map { assignments })
    }

    /// A bare field name (no leading dot), as used for check and assignment
    /// targets.
    fn field_name(&mut self) -> PResult<String> {
        let token = self.lexer.next_token();
        if token.kind == TokenKind::Identifier && !token.text.starts_with('.') {
            Ok(token.text)
        } else {
            Err(Failure::new(
                token.position,
                format!("expected field name, got {}", describe(&token)),
            ))
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        let token = self.lexer.next_token();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(Failure::new(
                token.position,
                format!("expected {}, got {}", what, describe(&token)),
            ))
        }
    }

    // Expressions use precedence climbing: additive binds looser than
    // multiplicative, parentheses reset precedence.

    fn expression(&mut self) -> PResult<Expr> {
        self.additive()
    }

    fn additive(&mut self) -> PResult<Expr> {
        let mut left = self.multiplicative()?;

        loop {
            let op = match self.lexer.peek().kind {
                TokenKind::Plus => ArithOp::Add,
                TokenKind::Minus => ArithOp::Subtract,
                _ => break,
            };

            self.lexer.next_token();
            let right = self.multiplicative()?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> PResult<Expr> {
        let mut left = self.primary()?;

        loop {
            let op = match self.lexer.peek().kind {
                TokenKind::Star => ArithOp::Multiply,
                TokenKind::Slash => ArithOp::Divide,
                _ => break,
            };

            self.lexer.next_token();
            let right = self.primary()?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// A primary value: parenthesized expression, literal, field reference,
    /// function call, or array literal.
    ///
    /// The non-paren alternatives are tried in order with backtracking;
    /// when none fits, the failure reports every attempted alternative and
    /// why it failed, joined into one message.
    fn primary(&mut self) -> PResult<Expr> {
        let start = self.lexer.peek();

        if start.kind == TokenKind::LParen {
            self.lexer.next_token();
            let expr = self.expression()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(expr);
        }

        let alternatives: [fn(&mut Self) -> PResult<Expr>; 4] = [
            Self::literal,
            Self::field_ref,
            Self::function_call,
            Self::array_literal,
        ];

        let mut causes = Vec::new();
        for alternative in alternatives {
            let saved = self.lexer.clone();
            match alternative(self) {
                Ok(expr) => return Ok(expr),
                Err(failure) => {
                    causes.push(failure.message);
                    self.lexer = saved;
                }
            }
        }

        Err(Failure::new(
            start.position,
            format!("unable to parse value: {}", causes.join("; ")),
        ))
    }

    fn literal(&mut self) -> PResult<Expr> {
        let token = self.lexer.next_token();
        match token.kind {
            TokenKind::String | TokenKind::Char => Ok(Expr::Scalar {
                kind: ScalarKind::String,
                literal: token.text,
            }),
            TokenKind::Integer | TokenKind::Float => Ok(Expr::Scalar {
                kind: ScalarKind::Number,
                literal: token.text,
            }),
            TokenKind::Boolean => Ok(Expr::Scalar {
                kind: ScalarKind::Bool,
                literal: token.text,
            }),
            TokenKind::Null => Ok(Expr::Scalar {
                kind: ScalarKind::Null,
                literal: "null".to_string(),
            }),
            TokenKind::Minus => {
                let number = self.lexer.next_token();
                match number.kind {
                    TokenKind::Integer | TokenKind::Float => Ok(Expr::Scalar {
                        kind: ScalarKind::Number,
                        literal: format!("-{}", number.text),
                    }),
                    _ => Err(Failure::new(
                        number.position,
                        format!("expected number after '-', got {}", describe(&number)),
                    )),
                }
            }
            _ => Err(Failure::new(
                token.position,
                format!("{} is not a literal", describe(&token)),
            )),
        }
    }

    fn field_ref(&mut self) -> PResult<Expr> {
        let token = self.lexer.next_token();
        if token.kind == TokenKind::Identifier
            && let Some(field) = token.text.strip_prefix('.')
            && !field.is_empty()
        {
            Ok(Expr::FieldRef(field.to_string()))
        } else {
            Err(Failure::new(
                token.position,
                format!(
                    "{} is not a field reference (field references start with '.')",
                    describe(&token)
                ),
            ))
        }
    }

    fn function_call(&mut self) -> PResult<Expr> {
        let token = self.lexer.next_token();
        if token.kind != TokenKind::Identifier || token.text.starts_with('.') {
            return Err(Failure::new(
                token.position,
                format!("{} is not a function call", describe(&token)),
            ));
        }

        if self.registry.lookup(&token.text).is_none() {
            return Err(Failure::new(
                token.position,
                format!("unknown function: '{}'", token.text),
            ));
        }

        self.expect(TokenKind::LParen, "'(' after function name")?;

        let mut args = Vec::new();
        if self.lexer.peek().kind == TokenKind::RParen {
            self.lexer.next_token();
        } else {
            loop {
                args.push(self.expression()?);
                let next = self.lexer.next_token();
                match next.kind {
                    TokenKind::Comma => continue,
                    TokenKind::RParen => break,
                    _ => {
                        return Err(Failure::new(
                            next.position,
                            format!(
                                "expected ',' or ')' in argument list, got {}",
                                describe(&next)
                            ),
                        ));
                    }
                }
            }
        }

        Ok(Expr::Function {
            name: token.text,
            args,
        })
    }

    fn array_literal(&mut self) -> PResult<Expr> {
        let open = self.lexer.next_token();
        if open.kind != TokenKind::LBracket {
            return Err(Failure::new(
                open.position,
                format!("{} is not an array literal", describe(&open)),
            ));
        }

        let mut elements = Vec::new();
        if self.lexer.peek().kind == TokenKind::RBracket {
            self.lexer.next_token();
        } else {
            loop {
                elements.push(self.expression()?);
                let next = self.lexer.next_token();
                match next.kind {
                    TokenKind::Comma => continue,
                    TokenKind::RBracket => break,
                    _ => {
                        return Err(Failure::new(
                            next.position,
                            format!("expected ',' or ']' in array, got {}", describe(&next)),
                        ));
                    }
                }
            }
        }

        Ok(Expr::Array(elements))
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        _ => format!("'{}'", token.text),
    }
}
