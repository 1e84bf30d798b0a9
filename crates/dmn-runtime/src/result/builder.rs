//! Conversion of evaluation events into decision results

use super::{DecisionResult, DecisionResultEntries};
use crate::evaluation::{
    DecisionLogicEvaluationEvent, DecisionTableEvaluationEvent, LiteralExpressionEvaluationEvent,
};

impl DecisionResult {
    pub fn from_event(event: &DecisionLogicEvaluationEvent) -> Self {
        match event {
            DecisionLogicEvaluationEvent::Table(event) => Self::from_table_event(event),
            DecisionLogicEvaluationEvent::LiteralExpression(event) => {
                Self::from_literal_event(event)
            }
        }
    }

    /// One row for an aggregated value, otherwise one row per matching rule
    pub fn from_table_event(event: &DecisionTableEvaluationEvent) -> Self {
        if let Some(value) = &event.collect_result_value {
            let mut row = DecisionResultEntries::new();
            row.put_value(
                event.collect_result_name.clone().unwrap_or_default(),
                value.clone(),
            );
            return Self::new(vec![row]);
        }
        if event.aggregation.is_some() {
            return Self::default();
        }

        let rows = event
            .matching_rules
            .iter()
            .map(|rule| {
                rule.output_entries
                    .values()
                    .map(|output| (output.output_name.clone(), output.value.clone()))
                    .collect::<DecisionResultEntries>()
            })
            .collect();
        Self::new(rows)
    }

    pub fn from_literal_event(event: &LiteralExpressionEvaluationEvent) -> Self {
        let mut row = DecisionResultEntries::new();
        row.put_value(event.output_name.clone(), event.output_value.clone());
        Self::new(vec![row])
    }
}
