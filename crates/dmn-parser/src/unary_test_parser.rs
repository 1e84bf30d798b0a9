//! Simple unary test parser
//!
//! Supported syntax (input entries of decision tables):
//! - `-` matches any input
//! - comparisons: `< 18`, `<= limit`, `> 0`, `>= 1.5`, `!= "x"`, `= 3`, `== 3`
//! - plain endpoints: `"gold"`, `42`, `category`
//! - intervals: `[1..10]`, `(1..10)`, `]1..10[`, `[1..10)`
//! - disjunction: `"gold", "silver"`
//! - negation: `not("gold", "silver")`

use crate::error::{ParseError, Result};
use crate::expression_parser::ExpressionParser;
use crate::scan::is_wrapped;
use dmn_core::ast::{Operator, UnaryTest, UnaryTests};

const COMPARISON_PREFIXES: &[(&str, Operator)] = &[
    ("<=", Operator::Le),
    (">=", Operator::Ge),
    ("!=", Operator::Ne),
    ("==", Operator::Eq),
    ("<", Operator::Lt),
    (">", Operator::Gt),
    ("=", Operator::Eq),
];

/// Simple unary test parser
pub struct UnaryTestParser;

impl UnaryTestParser {
    pub fn parse(input: &str) -> Result<UnaryTests> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ParseError::InvalidUnaryTest("Empty unary test".to_string()));
        }

        if input == "-" {
            return Ok(UnaryTests::Any);
        }

        if let Some(rest) = input.strip_prefix("not") {
            let rest = rest.trim_start();
            if is_wrapped(rest, b'(', b')') {
                return Ok(UnaryTests::Negated(Self::parse_disjunction(
                    &rest[1..rest.len() - 1],
                )?));
            }
        }

        Ok(UnaryTests::Positive(Self::parse_disjunction(input)?))
    }

    fn parse_disjunction(input: &str) -> Result<Vec<UnaryTest>> {
        split_unary_tests(input)
            .into_iter()
            .map(Self::parse_test)
            .collect()
    }

    fn parse_test(input: &str) -> Result<UnaryTest> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::InvalidUnaryTest("Empty test in list".to_string()));
        }

        if let Some(interval) = Self::parse_interval(input)? {
            return Ok(interval);
        }

        for (prefix, op) in COMPARISON_PREFIXES {
            if let Some(rest) = input.strip_prefix(prefix) {
                return Ok(UnaryTest::Compare {
                    op: *op,
                    endpoint: ExpressionParser::parse(rest)?,
                });
            }
        }

        Ok(UnaryTest::equals(ExpressionParser::parse(input)?))
    }

    fn parse_interval(input: &str) -> Result<Option<UnaryTest>> {
        let bytes = input.as_bytes();
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if !matches!(first, b'[' | b'(' | b']') || !matches!(last, b']' | b')' | b'[') {
            return Ok(None);
        }
        // a lone bracket is both the opening and the closing byte
        if bytes.len() < 2 {
            return Err(ParseError::InvalidUnaryTest(format!(
                "Incomplete interval: {}",
                input
            )));
        }

        let inner = &input[1..input.len() - 1];
        let Some(range_pos) = find_range_operator(inner) else {
            return Ok(None);
        };

        let low = inner[..range_pos].trim();
        let high = inner[range_pos + 2..].trim();
        if low.is_empty() || high.is_empty() {
            return Err(ParseError::InvalidUnaryTest(format!(
                "Interval needs two endpoints: {}",
                input
            )));
        }

        Ok(Some(UnaryTest::Interval {
            low: ExpressionParser::parse(low)?,
            low_inclusive: first == b'[',
            high: ExpressionParser::parse(high)?,
            high_inclusive: last == b']',
        }))
    }
}

/// Split on commas outside string literals and parentheses
///
/// Interval brackets may be unbalanced (`]1..2[`), so they do not nest.
fn split_unary_tests(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0_i32;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in input.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth <= 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Position of `..` outside string literals
fn find_range_operator(input: &str) -> Option<usize> {
    let mut in_string = false;
    let bytes = input.as_bytes();
    for i in 0..bytes.len() {
        match bytes[i] {
            b'"' if i == 0 || bytes[i - 1] != b'\\' => in_string = !in_string,
            b'.' if !in_string && bytes.get(i + 1) == Some(&b'.') => return Some(i),
            _ => {}
        }
    }
    None
}
