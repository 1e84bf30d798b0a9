//! COLLECT aggregators

use crate::error::HitPolicyError;
use crate::evaluation::DecisionTableEvaluationEvent;
use dmn_core::definition::BuiltinAggregator;
use dmn_core::{DecisionTable, TypedValue, Value, ValueType};
use rust_decimal::Decimal;

/// Aggregate the single output of all matching rules into one value
///
/// Null outputs are skipped. Without values to aggregate SUM, MIN and MAX
/// produce no result while COUNT produces 0.
pub(super) fn aggregate(
    aggregator: BuiltinAggregator,
    table: &DecisionTable,
    event: &mut DecisionTableEvaluationEvent,
) -> Result<(), HitPolicyError> {
    if table.outputs.len() > 1 {
        return Err(HitPolicyError::AggregationOnMultipleOutputs {
            aggregator: aggregator.to_string(),
            outputs: table.outputs.len(),
        });
    }

    let result_name = event
        .matching_rules
        .iter()
        .find_map(|rule| rule.output_entries.values().next())
        .map(|output| output.output_name.clone())
        .or_else(|| table.outputs.first().map(|output| output.output_name.clone()));

    let values: Vec<&Value> = event
        .matching_rules
        .iter()
        .filter_map(|rule| rule.output_entries.values().next())
        .map(|output| &output.value.value)
        .filter(|value| !value.is_null())
        .collect();

    let result_value = match aggregator {
        BuiltinAggregator::Count => Some(TypedValue::new(
            Value::Integer(values.len() as i64),
            ValueType::Integer,
        )),
        _ if values.is_empty() => None,
        _ => Some(aggregate_numbers(aggregator, &values)?),
    };

    event.collect_result_name = result_name;
    event.collect_result_value = result_value;
    Ok(())
}

fn aggregate_numbers(
    aggregator: BuiltinAggregator,
    values: &[&Value],
) -> Result<TypedValue, HitPolicyError> {
    if let Some(value) = values.iter().find(|value| !value.is_number()) {
        return Err(HitPolicyError::NonNumericAggregation {
            aggregator: aggregator.to_string(),
            value: value.to_string(),
        });
    }

    if values.iter().any(|value| matches!(value, Value::Double(_))) {
        let numbers = values.iter().filter_map(|value| value.as_f64());
        let result = match aggregator {
            BuiltinAggregator::Sum => numbers.sum(),
            BuiltinAggregator::Min => numbers.fold(f64::INFINITY, f64::min),
            _ => numbers.fold(f64::NEG_INFINITY, f64::max),
        };
        return Ok(TypedValue::new(Value::Double(result), ValueType::Double));
    }

    if values.iter().any(|value| matches!(value, Value::Decimal(_))) {
        let numbers: Vec<Decimal> = values.iter().filter_map(|value| value.as_decimal()).collect();
        let result = match aggregator {
            BuiltinAggregator::Sum => numbers
                .iter()
                .try_fold(Decimal::ZERO, |sum, n| sum.checked_add(*n))
                .ok_or_else(|| overflow(aggregator))?,
            BuiltinAggregator::Min => numbers.iter().copied().min().unwrap_or_default(),
            _ => numbers.iter().copied().max().unwrap_or_default(),
        };
        return Ok(TypedValue::untyped(Value::Decimal(result)));
    }

    let mut numbers = values.iter().filter_map(|value| match value {
        Value::Integer(i) => Some(*i),
        _ => None,
    });
    let result = match aggregator {
        BuiltinAggregator::Sum => numbers
            .try_fold(0i64, |sum, n| sum.checked_add(n))
            .ok_or_else(|| overflow(aggregator))?,
        BuiltinAggregator::Min => numbers.min().unwrap_or_default(),
        _ => numbers.max().unwrap_or_default(),
    };
    Ok(TypedValue::new(Value::Integer(result), ValueType::Long))
}

fn overflow(aggregator: BuiltinAggregator) -> HitPolicyError {
    HitPolicyError::AggregationOverflow {
        aggregator: aggregator.to_string(),
    }
}
