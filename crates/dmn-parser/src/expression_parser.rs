//! Expression parser
//!
//! Parses string expressions into Expression AST nodes.
//!
//! Supported syntax:
//! - Variables: `age`, `applicant.income`
//! - Literals: `42`, `1.1`, `"string"`, `true`, `false`, `null`, `[1, 2]`
//! - Binary operators: `=`, `==`, `!=`, `<`, `<=`, `>`, `>=`, `+`, `-`, `*`, `/`, `%`
//! - Logical operators: `and`, `&&`, `or`, `||`
//! - Keyword operators: `contains`, `starts_with`, `ends_with`, `in`, `not_in`
//! - Unary operators: `!`, `not`, `-`
//! - Parentheses for grouping: `(a + b) * c`
//!
//! Integer literals become integers, literals with a fraction become exact
//! decimals and literals with an exponent become doubles.

use crate::error::{ParseError, Result};
use crate::scan::{is_wrapped, split_top_level, top_level_mask};
use dmn_core::ast::{Expression, Operator, UnaryOperator};
use dmn_core::Value;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Precedence levels, lowest first
const LEVELS: &[(&[&str], &[&str])] = &[
    (&["||"], &["or"]),
    (&["&&"], &["and"]),
    (&[], &["contains", "not_in", "in", "starts_with", "ends_with"]),
    (&["==", "!=", "<=", ">=", "=", "<", ">"], &[]),
    (&["+", "-"], &[]),
    (&["*", "/", "%"], &[]),
];

/// Expression parser
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parse an expression from a string
    pub fn parse(input: &str) -> Result<Expression> {
        let input = input.trim();

        if input.is_empty() {
            return Err(ParseError::InvalidExpression("Empty expression".to_string()));
        }

        Self::parse_expression(input)
    }

    /// Parse a complete expression (handles binary operators with precedence)
    fn parse_expression(input: &str) -> Result<Expression> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::InvalidExpression("Missing operand".to_string()));
        }

        for (symbols, keywords) in LEVELS {
            if let Some((left, op, right)) = Self::split_by_operator(input, symbols, keywords) {
                let op = Self::parse_operator(op)?;
                return Ok(Expression::binary(
                    Self::parse_expression(left)?,
                    op,
                    Self::parse_expression(right)?,
                ));
            }
        }

        Self::parse_primary(input)
    }

    /// Parse a primary expression
    fn parse_primary(input: &str) -> Result<Expression> {
        let input = input.trim();

        if let Some(rest) = input.strip_prefix('!') {
            return Ok(Expression::unary(UnaryOperator::Not, Self::parse_primary(rest)?));
        }

        if let Some(rest) = Self::strip_keyword(input, "not") {
            return Ok(Expression::unary(UnaryOperator::Not, Self::parse_primary(rest)?));
        }

        if let Some(rest) = input.strip_prefix('-') {
            let rest = rest.trim_start();
            if rest.starts_with(|c: char| c.is_ascii_digit()) {
                return Self::parse_number(&format!("-{}", rest));
            }
            return Ok(Expression::unary(UnaryOperator::Negate, Self::parse_primary(rest)?));
        }

        if is_wrapped(input, b'(', b')') {
            return Self::parse_expression(&input[1..input.len() - 1]);
        }

        if is_wrapped(input, b'[', b']') {
            return Self::parse_list(&input[1..input.len() - 1]);
        }

        if input.len() >= 2 && input.starts_with('"') && input.ends_with('"') {
            return Self::parse_string(input);
        }

        match input {
            "true" => return Ok(Expression::literal(true)),
            "false" => return Ok(Expression::literal(false)),
            "null" => return Ok(Expression::literal(Value::Null)),
            _ => {}
        }

        if input.starts_with(|c: char| c.is_ascii_digit()) {
            return Self::parse_number(input);
        }

        if Self::is_path(input) {
            return Ok(Expression::variable(input));
        }

        Err(ParseError::InvalidExpression(format!("Cannot parse: {}", input)))
    }

    fn parse_list(inner: &str) -> Result<Expression> {
        if inner.trim().is_empty() {
            return Ok(Expression::List(Vec::new()));
        }
        let items = split_top_level(inner, b',')
            .into_iter()
            .map(Self::parse_expression)
            .collect::<Result<Vec<_>>>()?;
        Ok(Expression::List(items))
    }

    fn parse_string(input: &str) -> Result<Expression> {
        let inner = &input[1..input.len() - 1];
        let mut value = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(other) => value.push(other),
                    None => {
                        return Err(ParseError::InvalidExpression(format!(
                            "Dangling escape in string literal: {}",
                            input
                        )))
                    }
                },
                '"' => {
                    return Err(ParseError::InvalidExpression(format!(
                        "Unescaped quote in string literal: {}",
                        input
                    )))
                }
                c => value.push(c),
            }
        }
        Ok(Expression::literal(value))
    }

    fn parse_number(input: &str) -> Result<Expression> {
        if input.contains(['e', 'E']) {
            return input
                .parse::<f64>()
                .map(Expression::literal)
                .map_err(|_| ParseError::InvalidNumber(input.to_string()));
        }
        if input.contains('.') {
            return Decimal::from_str(input)
                .map(Expression::literal)
                .map_err(|_| ParseError::InvalidNumber(input.to_string()));
        }
        input
            .parse::<i64>()
            .map(Expression::literal)
            .map_err(|_| ParseError::InvalidNumber(input.to_string()))
    }

    /// Dotted identifier path such as `applicant.age`
    fn is_path(input: &str) -> bool {
        input.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
    }

    /// Strip a leading keyword followed by whitespace or `(`
    fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
        let rest = input.strip_prefix(keyword)?;
        rest.starts_with(|c: char| c.is_whitespace() || c == '(')
            .then_some(rest)
    }

    /// Split input by the rightmost top-level operator of one precedence level
    fn split_by_operator<'a>(
        input: &'a str,
        symbols: &[&str],
        keywords: &[&str],
    ) -> Option<(&'a str, &'a str, &'a str)> {
        let mask = top_level_mask(input);
        let bytes = input.as_bytes();

        // Scan from right to left to handle left-to-right associativity
        for i in (0..input.len()).rev() {
            if !mask[i] || !input.is_char_boundary(i) {
                continue;
            }

            for &op in symbols {
                if input[i..].starts_with(op) && Self::is_symbol_at(bytes, i, op) {
                    if let Some(split) = Self::split_at(input, i, op) {
                        return Some(split);
                    }
                }
            }

            for &op in keywords {
                if input[i..].starts_with(op) && Self::is_keyword_at(bytes, i, op) {
                    if let Some(split) = Self::split_at(input, i, op) {
                        return Some(split);
                    }
                }
            }
        }

        None
    }

    fn split_at<'a>(input: &'a str, i: usize, op: &str) -> Option<(&'a str, &'a str, &'a str)> {
        let left = input[..i].trim();
        let right = input[i + op.len()..].trim();
        if left.is_empty() || right.is_empty() {
            return None;
        }
        Some((left, &input[i..i + op.len()], right))
    }

    fn is_symbol_at(bytes: &[u8], i: usize, op: &str) -> bool {
        let end = i + op.len();
        // Make sure it's not part of another operator
        let standalone = (i == 0 || !Self::is_operator_char(bytes[i - 1]))
            && (end >= bytes.len() || !Self::is_operator_char(bytes[end]));
        if !standalone {
            return false;
        }

        if op == "+" || op == "-" {
            // binary only if preceded by an operand
            return match bytes[..i].iter().rev().find(|b| !b.is_ascii_whitespace()) {
                Some(prev) => !matches!(
                    prev,
                    b'+' | b'-' | b'*' | b'/' | b'%' | b'=' | b'!' | b'<' | b'>' | b'&' | b'|'
                        | b'(' | b'[' | b','
                ),
                None => false,
            };
        }
        true
    }

    fn is_keyword_at(bytes: &[u8], i: usize, op: &str) -> bool {
        let end = i + op.len();
        let boundary = |b: u8| b.is_ascii_whitespace() || matches!(b, b'(' | b')' | b'[' | b']' | b'"');
        (i == 0 || boundary(bytes[i - 1])) && (end >= bytes.len() || boundary(bytes[end]))
    }

    /// Characters that combine into comparison and logical operators
    fn is_operator_char(c: u8) -> bool {
        matches!(c, b'=' | b'!' | b'<' | b'>' | b'&' | b'|')
    }

    /// Parse an operator string
    fn parse_operator(op: &str) -> Result<Operator> {
        match op {
            "==" | "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            ">" => Ok(Operator::Gt),
            "<=" => Ok(Operator::Le),
            ">=" => Ok(Operator::Ge),
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Sub),
            "*" => Ok(Operator::Mul),
            "/" => Ok(Operator::Div),
            "%" => Ok(Operator::Mod),
            "&&" | "and" => Ok(Operator::And),
            "||" | "or" => Ok(Operator::Or),
            "contains" => Ok(Operator::Contains),
            "starts_with" => Ok(Operator::StartsWith),
            "ends_with" => Ok(Operator::EndsWith),
            "in" => Ok(Operator::In),
            "not_in" => Ok(Operator::NotIn),
            _ => Err(ParseError::InvalidOperator(op.to_string())),
        }
    }
}
