#[cfg(test)]
mod tests {
    use breeze_lang::{AggFunc, Value};

    fn run(func: AggFunc, values: &[Value]) -> Value {
        let mut aggregator = func.aggregator();
        for value in values {
            aggregator.ingest(value);
        }
        aggregator.aggregate()
    }

    fn assert_close(result: Value, expected: f64) {
        let Value::Number(n) = result else {
            panic!("expected a number, got {:?}", result);
        };
        assert!((n - expected).abs() < 1e-9, "{} != {}", n, expected);
    }

    // ========================================================================
    // sum
    // ========================================================================

    #[test]
    fn test_sum_numbers() {
        let result = run(
            AggFunc::Sum,
            &[Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)],
        );
        assert_eq!(result, Value::Number(6.0));
    }

    #[test]
    fn test_sum_empty_is_zero() {
        assert_eq!(run(AggFunc::Sum, &[]), Value::Number(0.0));
    }

    #[test]
    fn test_sum_booleans_or_together() {
        let result = run(
            AggFunc::Sum,
            &[
                Value::Boolean(false),
                Value::Boolean(true),
                Value::Boolean(false),
            ],
        );
        assert_eq!(result, Value::Boolean(true));
    }

    #[test]
    fn test_sum_mixed_group_majority_wins() {
        // Two numbers against one boolean: numeric result.
        let result = run(
            AggFunc::Sum,
            &[Value::Number(1.0), Value::Boolean(true), Value::Number(2.0)],
        );
        assert_eq!(result, Value::Number(3.0));
    }

    #[test]
    fn test_sum_mixed_tie_favors_numeric() {
        let result = run(AggFunc::Sum, &[Value::Boolean(true), Value::Number(5.0)]);
        assert_eq!(result, Value::Number(5.0));
    }

    #[test]
    fn test_sum_ignores_strings() {
        let result = run(
            AggFunc::Sum,
            &[Value::String("7".to_string()), Value::Number(1.0)],
        );
        assert_eq!(result, Value::Number(1.0));
    }

    // ========================================================================
    // avg
    // ========================================================================

    #[test]
    fn test_avg_numbers() {
        assert_close(
            run(
                AggFunc::Avg,
                &[Value::Number(1.0), Value::Number(2.0), Value::Number(6.0)],
            ),
            3.0,
        );
    }

    #[test]
    fn test_avg_booleans_count_as_zero_and_one() {
        assert_close(
            run(AggFunc::Avg, &[Value::Boolean(true), Value::Boolean(false)]),
            0.5,
        );
    }

    #[test]
    fn test_avg_empty_is_zero() {
        assert_eq!(run(AggFunc::Avg, &[]), Value::Number(0.0));
    }

    // ========================================================================
    // count
    // ========================================================================

    #[test]
    fn test_count_every_type() {
        let result = run(
            AggFunc::Count,
            &[
                Value::Number(1.0),
                Value::String("x".to_string()),
                Value::Null,
                Value::Array(vec![]),
            ],
        );
        assert_eq!(result, Value::Number(4.0));
    }

    // ========================================================================
    // min / max
    // ========================================================================

    #[test]
    fn test_min_and_max() {
        let values = [
            Value::Number(3.0),
            Value::Number(-1.0),
            Value::Number(7.0),
        ];
        assert_eq!(run(AggFunc::Min, &values), Value::Number(-1.0));
        assert_eq!(run(AggFunc::Max, &values), Value::Number(7.0));
    }

    #[test]
    fn test_min_heterogeneous_null_is_least() {
        let values = [Value::Number(3.0), Value::Null, Value::String("a".to_string())];
        assert_eq!(run(AggFunc::Min, &values), Value::Null);
    }

    #[test]
    fn test_extremum_empty_is_null() {
        assert_eq!(run(AggFunc::Min, &[]), Value::Null);
        assert_eq!(run(AggFunc::Max, &[]), Value::Null);
    }

    #[test]
    fn test_extremum_skips_incomparable_candidates() {
        // A scalar extremum never compares against an array candidate.
        let result = run(
            AggFunc::Max,
            &[Value::Number(1.0), Value::Array(vec![Value::Number(99.0)])],
        );
        assert_eq!(result, Value::Number(1.0));
    }

    // ========================================================================
    // mode
    // ========================================================================

    #[test]
    fn test_mode_most_frequent() {
        let result = run(
            AggFunc::Mode,
            &[
                Value::String("a".to_string()),
                Value::String("b".to_string()),
                Value::String("b".to_string()),
            ],
        );
        assert_eq!(result, Value::String("b".to_string()));
    }

    #[test]
    fn test_mode_tie_keeps_first_seen() {
        let result = run(
            AggFunc::Mode,
            &[
                Value::String("b".to_string()),
                Value::String("a".to_string()),
                Value::String("b".to_string()),
                Value::String("a".to_string()),
            ],
        );
        assert_eq!(result, Value::String("b".to_string()));
    }

    #[test]
    fn test_mode_distinguishes_string_and_number_keys() {
        let result = run(
            AggFunc::Mode,
            &[
                Value::String("1".to_string()),
                Value::Number(1.0),
                Value::Number(1.0),
            ],
        );
        assert_eq!(result, Value::Number(1.0));
    }

    #[test]
    fn test_mode_empty_is_null() {
        assert_eq!(run(AggFunc::Mode, &[]), Value::Null);
    }

    // ========================================================================
    // stddev
    // ========================================================================

    #[test]
    fn test_stddev_two_samples() {
        assert_close(
            run(AggFunc::StdDev, &[Value::Number(1.0), Value::Number(2.0)]),
            0.5,
        );
    }

    #[test]
    fn test_stddev_population_formula() {
        let values: Vec<Value> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .iter()
            .map(|n| Value::Number(*n))
            .collect();
        assert_close(run(AggFunc::StdDev, &values), 2.0);
    }

    #[test]
    fn test_stddev_under_two_samples_is_nan_string() {
        assert_eq!(
            run(AggFunc::StdDev, &[]),
            Value::String("NaN".to_string())
        );
        assert_eq!(
            run(AggFunc::StdDev, &[Value::Number(5.0)]),
            Value::String("NaN".to_string())
        );
    }

    #[test]
    fn test_stddev_ignores_non_numeric() {
        assert_eq!(
            run(
                AggFunc::StdDev,
                &[Value::Number(1.0), Value::String("x".to_string())]
            ),
            Value::String("NaN".to_string())
        );
    }

    // ========================================================================
    // name lookup
    // ========================================================================

    #[test]
    fn test_from_name() {
        assert_eq!(AggFunc::from_name("sum"), Some(AggFunc::Sum));
        assert_eq!(AggFunc::from_name("stddev"), Some(AggFunc::StdDev));
        assert_eq!(AggFunc::from_name("median"), None);
    }

    #[test]
    fn test_display_matches_query_names() {
        assert_eq!(AggFunc::StdDev.to_string(), "stddev");
        assert_eq!(AggFunc::Avg.to_string(), "avg");
    }
}
