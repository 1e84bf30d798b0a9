//! Decision results
//!
//! The caller-facing shape of an evaluation: an ordered list of rows, each an
//! ordered map from output name to typed value. Rows follow rule order and
//! entries follow output clause order.

mod builder;
mod decision_result;
mod entries;

pub use decision_result::DecisionResult;
pub use entries::DecisionResultEntries;
