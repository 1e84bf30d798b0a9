//! Tree-walking interpreter for the built-in expression language

use super::operators::{execute_binary_op, execute_compare, execute_unary_op};
use crate::context::{lookup_path, VariableContext};
use crate::error::Result;
use dmn_core::ast::{
    Expression, Operator, Template, TemplateSegment, UnaryTest, UnaryTests,
};
use dmn_core::Value;

/// Evaluates parsed expressions, unary tests and templates against a context
pub struct Interpreter;

impl Interpreter {
    /// Evaluate an expression
    pub fn evaluate(expr: &Expression, context: &dyn VariableContext) -> Result<Value> {
        match expr {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Variable(path) => Ok(lookup_path(context, path)),
            Expression::List(items) => items
                .iter()
                .map(|item| Self::evaluate(item, context))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Expression::Unary { op, operand } => {
                let operand = Self::evaluate(operand, context)?;
                execute_unary_op(&operand, op)
            }
            Expression::Binary { left, op, right } => {
                let left = Self::evaluate(left, context)?;

                // Short-circuit once the left operand decides the result
                match (op, &left) {
                    (Operator::And, Value::Bool(false)) => return Ok(Value::Bool(false)),
                    (Operator::Or, Value::Bool(true)) => return Ok(Value::Bool(true)),
                    _ => {}
                }

                let right = Self::evaluate(right, context)?;
                execute_binary_op(&left, op, &right)
            }
        }
    }

    /// Test `input` against simple unary tests
    pub fn evaluate_unary_tests(
        tests: &UnaryTests,
        input: &Value,
        context: &dyn VariableContext,
    ) -> Result<bool> {
        match tests {
            UnaryTests::Any => Ok(true),
            UnaryTests::Positive(tests) => Self::any_matches(tests, input, context),
            UnaryTests::Negated(tests) => Ok(!Self::any_matches(tests, input, context)?),
        }
    }

    fn any_matches(tests: &[UnaryTest], input: &Value, context: &dyn VariableContext) -> Result<bool> {
        for test in tests {
            if Self::matches(test, input, context)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn matches(test: &UnaryTest, input: &Value, context: &dyn VariableContext) -> Result<bool> {
        match test {
            UnaryTest::Compare { op, endpoint } => {
                let endpoint = Self::evaluate(endpoint, context)?;
                // `null` as a test matches a null input
                if *op == Operator::Eq && input.is_null() && endpoint.is_null() {
                    return Ok(true);
                }
                execute_compare(input, op, &endpoint)
            }
            UnaryTest::Interval {
                low,
                low_inclusive,
                high,
                high_inclusive,
            } => {
                let low = Self::evaluate(low, context)?;
                let high = Self::evaluate(high, context)?;
                let lower = if *low_inclusive { Operator::Ge } else { Operator::Gt };
                let upper = if *high_inclusive { Operator::Le } else { Operator::Lt };
                Ok(execute_compare(input, &lower, &low)? && execute_compare(input, &upper, &high)?)
            }
        }
    }

    /// Render a template
    ///
    /// A template of exactly one `${...}` yields the raw value; anything
    /// else is rendered to a string, with null rendering as empty text.
    pub fn render_template(template: &Template, context: &dyn VariableContext) -> Result<Value> {
        if let Some(expr) = template.single_expression() {
            return Self::evaluate(expr, context);
        }

        let mut rendered = String::new();
        for segment in &template.segments {
            match segment {
                TemplateSegment::Text(text) => rendered.push_str(text),
                TemplateSegment::Expression(expr) => match Self::evaluate(expr, context)? {
                    Value::Null => {}
                    value => rendered.push_str(&value.to_string()),
                },
            }
        }
        Ok(Value::String(rendered))
    }
}
