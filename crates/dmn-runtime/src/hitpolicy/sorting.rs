//! PRIORITY and OUTPUT ORDER
//!
//! Rules are ranked by the position of their output values in the declared
//! output value lists. Outputs with value lists are compared in clause order,
//! the first difference decides.

use crate::error::HitPolicyError;
use crate::evaluation::{DecisionTableEvaluationEvent, EvaluatedDecisionRule};
use dmn_core::{DecisionTable, HitPolicy, OutputClause, Value};

pub(super) fn apply(
    hit_policy: HitPolicy,
    table: &DecisionTable,
    event: &mut DecisionTableEvaluationEvent,
) -> Result<(), HitPolicyError> {
    let ranked_outputs: Vec<&OutputClause> = table
        .outputs
        .iter()
        .filter(|output| !output.output_values.is_empty())
        .collect();

    if hit_policy == HitPolicy::Priority && ranked_outputs.is_empty() {
        return Err(HitPolicyError::OutputValuesRequired {
            hit_policy: hit_policy.to_string(),
        });
    }

    let single_output = table.outputs.len() == 1;
    match event.matching_rules.len() {
        0 => Err(HitPolicyError::NoMatchingRule {
            hit_policy: hit_policy.to_string(),
        }),
        1 => {
            let rule = &event.matching_rules[0];
            for output in &ranked_outputs {
                // a blank conclusion has nothing to validate
                if let Some(value) = output_value(hit_policy, rule, output, single_output)? {
                    position(output, value)?;
                }
            }
            Ok(())
        }
        _ => {
            let mut ranked = Vec::with_capacity(event.matching_rules.len());
            for rule in event.matching_rules.drain(..) {
                let key = ranked_outputs
                    .iter()
                    .map(|output| {
                        let value = output_value(hit_policy, &rule, output, single_output)?;
                        position(output, value.unwrap_or(&Value::Null))
                    })
                    .collect::<Result<Vec<usize>, _>>()?;
                ranked.push((key, rule));
            }

            if hit_policy == HitPolicy::Priority {
                // min_by returns the first of equally ranked rules
                let best = ranked
                    .into_iter()
                    .min_by(|(left, _), (right, _)| left.cmp(right))
                    .map(|(_, rule)| rule);
                event.matching_rules.extend(best);
            } else {
                ranked.sort_by(|(left, _), (right, _)| left.cmp(right));
                event
                    .matching_rules
                    .extend(ranked.into_iter().map(|(_, rule)| rule));
            }
            Ok(())
        }
    }
}

/// The rule's value for `output`; an unnamed output is only allowed alone
fn output_value<'r>(
    hit_policy: HitPolicy,
    rule: &'r EvaluatedDecisionRule,
    output: &OutputClause,
    single_output: bool,
) -> Result<Option<&'r Value>, HitPolicyError> {
    let typed = if !output.output_name.is_empty() {
        rule.output_value(&output.output_name)
    } else if single_output {
        rule.output_entries.values().next().map(|entry| &entry.value)
    } else {
        return Err(HitPolicyError::OutputNameRequired {
            hit_policy: hit_policy.to_string(),
        });
    };
    Ok(typed.map(|typed| &typed.value))
}

/// Index of `value` in the output's value list
fn position(output: &OutputClause, value: &Value) -> Result<usize, HitPolicyError> {
    output
        .output_values
        .iter()
        .position(|allowed| allowed.loosely_equals(value))
        .ok_or_else(|| HitPolicyError::OutputValueNotFound {
            output_name: if output.output_name.is_empty() {
                "unnamed output".to_string()
            } else {
                output.output_name.clone()
            },
            value: value.to_string(),
            allowed: output
                .output_values
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
}
