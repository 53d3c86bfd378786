#[cfg(test)]
mod tests {
    use breeze_lang::ast::{
        ArithOp, BinaryCheck, CheckOp, Expr, FieldAssignment, ScalarKind, Stage, UnaryCheck,
        UnaryOp,
    };
    use breeze_lang::{AggFunc, FunctionRegistry, ParseError, parse};

    fn parse_ok(input: &str) -> Vec<Stage> {
        let registry = FunctionRegistry::new();
        parse(input, &registry).unwrap()
    }

    fn parse_err(input: &str) -> ParseError {
        let registry = FunctionRegistry::new();
        parse(input, &registry).unwrap_err()
    }

    fn number(literal: &str) -> Expr {
        Expr::Scalar {
            kind: ScalarKind::Number,
            literal: literal.to_string(),
        }
    }

    fn string(literal: &str) -> Expr {
        Expr::Scalar {
            kind: ScalarKind::String,
            literal: literal.to_string(),
        }
    }

    // ========================================================================
    // Stages
    // ========================================================================

    #[test]
    fn test_filter_with_binary_and_unary_checks() {
        let stages = parse_ok("filter status = \"error\" retries > 3 trace_id exists");
        assert_eq!(
            stages,
            vec![Stage::Filter {
                binary_checks: vec![
                    BinaryCheck {
                        field: "status".to_string(),
                        op: CheckOp::Equal,
                        expr: string("error"),
                    },
                    BinaryCheck {
                        field: "retries".to_string(),
                        op: CheckOp::Greater,
                        expr: number("3"),
                    },
                ],
                unary_checks: vec![UnaryCheck {
                    field: "trace_id".to_string(),
                    op: UnaryOp::Exists,
                }],
            }]
        );
    }

    #[test]
    fn test_filter_with_no_checks() {
        let stages = parse_ok("filter");
        assert_eq!(
            stages,
            vec![Stage::Filter {
                binary_checks: vec![],
                unary_checks: vec![],
            }]
        );
    }

    #[test]
    fn test_filter_not_exists() {
        let stages = parse_ok("filter error !exists");
        assert_eq!(
            stages,
            vec![Stage::Filter {
                binary_checks: vec![],
                unary_checks: vec![UnaryCheck {
                    field: "error".to_string(),
                    op: UnaryOp::NotExists,
                }],
            }]
        );
    }

    #[test]
    fn test_sort_directions() {
        assert_eq!(
            parse_ok("sort latency"),
            vec![Stage::Sort {
                field: "latency".to_string(),
                descending: false,
            }]
        );
        assert_eq!(
            parse_ok("sort latency desc"),
            vec![Stage::Sort {
                field: "latency".to_string(),
                descending: true,
            }]
        );
        // 'asc' is accepted and consumed but is the default anyway.
        assert_eq!(
            parse_ok("sort latency asc | filter"),
            vec![
                Stage::Sort {
                    field: "latency".to_string(),
                    descending: false,
                },
                Stage::Filter {
                    binary_checks: vec![],
                    unary_checks: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_group_with_and_without_by() {
        assert_eq!(
            parse_ok("group sum amount"),
            vec![Stage::Group {
                group_by_field: None,
                aggregate_field: "amount".to_string(),
                func: AggFunc::Sum,
            }]
        );
        assert_eq!(
            parse_ok("group avg latency by endpoint"),
            vec![Stage::Group {
                group_by_field: Some("endpoint".to_string()),
                aggregate_field: "latency".to_string(),
                func: AggFunc::Avg,
            }]
        );
    }

    #[test]
    fn test_map_multiple_assignments() {
        let stages = parse_ok("map doubled = .a * 2 label = \"x\"");
        assert_eq!(
            stages,
            vec![Stage::Map {
                assignments: vec![
                    FieldAssignment {
                        field: "doubled".to_string(),
                        assignment: Expr::Binary {
                            op: ArithOp::Multiply,
                            left: Box::new(Expr::FieldRef("a".to_string())),
                            right: Box::new(number("2")),
                        },
                    },
                    FieldAssignment {
                        field: "label".to_string(),
                        assignment: string("x"),
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_multi_stage_pipeline() {
        let stages = parse_ok("filter a > 1 | sort a desc | group count a | map b = 1");
        assert_eq!(stages.len(), 4);
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn map_expr(input: &str) -> Expr {
        let stages = parse_ok(input);
        let [Stage::Map { assignments }] = stages.as_slice() else {
            panic!("expected a single map stage");
        };
        assignments[0].assignment.clone()
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(
            map_expr("map x = 2 + 3 * 4"),
            Expr::Binary {
                op: ArithOp::Add,
                left: Box::new(number("2")),
                right: Box::new(Expr::Binary {
                    op: ArithOp::Multiply,
                    left: Box::new(number("3")),
                    right: Box::new(number("4")),
                }),
            }
        );
    }

    #[test]
    fn test_parentheses_reset_precedence() {
        assert_eq!(
            map_expr("map x = (2 + 3) * 4"),
            Expr::Binary {
                op: ArithOp::Multiply,
                left: Box::new(Expr::Binary {
                    op: ArithOp::Add,
                    left: Box::new(number("2")),
                    right: Box::new(number("3")),
                }),
                right: Box::new(number("4")),
            }
        );
    }

    #[test]
    fn test_same_precedence_associates_left() {
        assert_eq!(
            map_expr("map x = 10 - 4 - 3"),
            Expr::Binary {
                op: ArithOp::Subtract,
                left: Box::new(Expr::Binary {
                    op: ArithOp::Subtract,
                    left: Box::new(number("10")),
                    right: Box::new(number("4")),
                }),
                right: Box::new(number("3")),
            }
        );
    }

    #[test]
    fn test_negative_number_literal() {
        assert_eq!(map_expr("map x = -3.5"), number("-3.5"));
    }

    #[test]
    fn test_function_call_with_arguments() {
        assert_eq!(
            map_expr("map x = pow(.a, 2)"),
            Expr::Function {
                name: "pow".to_string(),
                args: vec![Expr::FieldRef("a".to_string()), number("2")],
            }
        );
    }

    #[test]
    fn test_zero_argument_function_call() {
        assert_eq!(
            map_expr("map x = ping()"),
            Expr::Function {
                name: "ping".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_array_literal() {
        assert_eq!(
            map_expr("map x = [1, \"two\", .three]"),
            Expr::Array(vec![
                number("1"),
                string("two"),
                Expr::FieldRef("three".to_string()),
            ])
        );
    }

    #[test]
    fn test_null_literal() {
        assert_eq!(
            map_expr("map x = null"),
            Expr::Scalar {
                kind: ScalarKind::Null,
                literal: "null".to_string(),
            }
        );
    }

    // ========================================================================
    // Round-tripping
    // ========================================================================

    #[test]
    fn test_display_round_trips_through_parser() {
        let queries = [
            "filter status = \"error\" retries > 3 trace_id exists",
            "sort latency desc",
            "group avg latency by endpoint",
            "map total = .price * .quantity flag = true",
            "filter tags contains \"prod\" | sort name | group count name by team",
        ];
        for query in queries {
            let stages = parse_ok(query);
            let rendered = stages
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" | ");
            assert_eq!(parse_ok(&rendered), stages, "round-trip of {:?}", query);
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn test_empty_query() {
        let err = parse_err("");
        assert_eq!(err.message, "unexpected end of input, expected a stage");
    }

    #[test]
    fn test_unrecognized_stage_keyword() {
        let err = parse_err("select a");
        assert_eq!(err.message, "unrecognized stage keyword: 'select'");
        assert_eq!(err.position, 1);
    }

    #[test]
    fn test_missing_pipe_between_stages() {
        let err = parse_err("filter a = 1 sort b");
        assert_eq!(err.message, "expected '|' between stages, got 'sort'");
        assert_eq!(err.position, 14);
    }

    #[test]
    fn test_unknown_aggregation_function() {
        let err = parse_err("group median latency");
        assert_eq!(err.message, "unknown aggregation function: 'median'");
    }

    #[test]
    fn test_unknown_function_reported_among_causes() {
        let err = parse_err("map x = nope(1)");
        assert!(err.message.starts_with("unable to parse value:"));
        assert!(err.message.contains("unknown function: 'nope'"));
    }

    #[test]
    fn test_check_target_must_be_bare_field_name() {
        let err = parse_err("filter .a = 1");
        assert_eq!(err.message, "expected field name, got '.a'");
    }

    #[test]
    fn test_caret_points_at_failing_column() {
        let err = parse_err("filter a >");
        let rendered = err.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "filter a >");
        // Failure is at end of input: column 11, one past the query.
        assert_eq!(lines[2], format!("{}^", " ".repeat(10)));
    }

    #[test]
    fn test_value_failure_reports_every_alternative() {
        let err = parse_err("filter a = >");
        assert!(err.message.starts_with("unable to parse value:"));
        assert!(err.message.contains("not a literal"));
        assert!(err.message.contains("not a field reference"));
        assert!(err.message.contains("not a function call"));
        assert!(err.message.contains("not an array literal"));
    }

    #[test]
    fn test_unclosed_parenthesis() {
        let err = parse_err("map x = (1 + 2");
        assert_eq!(err.message, "expected ')', got end of input");
    }
}
