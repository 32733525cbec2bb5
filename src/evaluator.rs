// Copyright (c) 2025 - Cowboy AI, Inc.
//! Result Evaluator
//!
//! Pure verdict functions over raw query results.
//!
//! | Claim | Verdict |
//! |---|---|
//! | `Exists` | at least one record |
//! | `Absent` | no record |
//! | `ContainsValues(ls)` | some record's serialized value contains every normalized literal |
//! | event registered | some record has kind `event` |
//!
//! An unset work expectation is an authoring error and yields
//! [`HarnessError::Configuration`], never a verdict.

use crate::domain::{Record, WorkExpectation};
use crate::errors::{HarnessError, HarnessResult};

/// Strip single and double quote characters from a literal
pub fn normalize_literal(literal: &str) -> String {
    literal.chars().filter(|c| *c != '"' && *c != '\'').collect()
}

/// Decide whether `records` satisfy a work expectation
pub fn evaluate_work(
    records: &[Record],
    expectation: Option<&WorkExpectation>,
) -> HarnessResult<bool> {
    let expectation = expectation.ok_or_else(|| {
        HarnessError::Configuration("work expectation is not set".to_string())
    })?;

    match expectation {
        WorkExpectation::Exists => Ok(!records.is_empty()),
        WorkExpectation::Absent => Ok(records.is_empty()),
        WorkExpectation::ContainsValues(literals) => {
            if literals.is_empty() {
                return Err(HarnessError::Configuration(
                    "ContainsValues declares no literals".to_string(),
                ));
            }
            Ok(!matching_records(records, literals).is_empty())
        }
    }
}

/// Records whose serialized value contains every literal
///
/// Filtering narrows the candidate set one literal at a time.
pub fn matching_records<'a>(records: &'a [Record], literals: &[String]) -> Vec<&'a Record> {
    let mut candidates: Vec<(&Record, String)> = records
        .iter()
        .map(|record| (record, record.serialized_value()))
        .collect();

    for literal in literals {
        let needle = normalize_literal(literal);
        candidates.retain(|(_, haystack)| haystack.contains(&needle));
    }

    candidates.into_iter().map(|(record, _)| record).collect()
}

/// Whether any record is a recorded event, regardless of content
pub fn event_registered(records: &[Record]) -> bool {
    records.iter().any(Record::is_event)
}

/// Short rendering of observed records for failure messages
pub fn describe_records(records: &[Record]) -> String {
    if records.is_empty() {
        return "no records".to_string();
    }
    records
        .iter()
        .map(|r| format!("{}:{}", r.kind, r.serialized_value()))
        .collect::<Vec<_>>()
        .join(", ")
}
