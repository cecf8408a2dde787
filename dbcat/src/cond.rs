//! Nested `if` / `else` / `endif` evaluation.
//!
//! The stack holds one boolean frame per open `if`, recording whether
//! that branch's condition held. The derived `suppressed` flag is what
//! the walker consults before executing a directive; the conditional
//! directives themselves always run so nesting stays balanced.

use crate::error::{Error, Result};
use crate::params::ParamStore;

/// Comparison operators, two-character forms first so `>=` matches
/// before `>`.
const OPERATORS: [&str; 5] = [">=", "<=", "=", ">", "<"];

/// Evaluate a `KEY<op>VALUE` condition against the store.
///
/// `=` compares exact strings. The relational operators compare both
/// sides as decimal numbers; a side that fails to parse makes the
/// condition false, as does a `KEY` with no value. Only a condition
/// containing no operator at all is an error.
pub fn eval_condition(condition: &str, params: &ParamStore) -> Result<bool> {
    let (op, key, expected) = OPERATORS
        .iter()
        .find_map(|op| {
            condition
                .split_once(op)
                .map(|(key, expected)| (*op, key, expected))
        })
        .ok_or_else(|| Error::InvalidCondition(condition.to_owned()))?;

    let Some(actual) = params.get(key) else {
        return Ok(false);
    };

    if op == "=" {
        return Ok(actual == expected);
    }

    let (Ok(actual), Ok(expected)) = (actual.parse::<f64>(), expected.parse::<f64>()) else {
        return Ok(false);
    };
    Ok(match op {
        ">" => actual > expected,
        ">=" => actual >= expected,
        "<" => actual < expected,
        "<=" => actual <= expected,
        _ => unreachable!("operator list covers all arms"),
    })
}

/// Per-file conditional nesting state.
#[derive(Debug, Default)]
pub struct CondStack {
    frames: Vec<bool>,
    suppressed: bool,
}

impl CondStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while directives in the current branch must be discarded.
    pub fn suppressed(&self) -> bool {
        self.suppressed
    }

    /// `true` when every `if` in this file has met its `endif`.
    pub fn is_balanced(&self) -> bool {
        self.frames.is_empty()
    }

    /// `if <condition>`. Inside a suppressed branch the condition is not
    /// evaluated; a synthetic false frame keeps the nesting balanced.
    pub fn begin_if(&mut self, condition: &str, params: &ParamStore) -> Result<()> {
        if self.suppressed {
            self.frames.push(false);
            return Ok(());
        }
        let truth = eval_condition(condition, params)?;
        self.frames.push(truth);
        self.suppressed = !truth;
        Ok(())
    }

    /// `else`. The branch runs only when the matching `if` was false and
    /// no enclosing frame is suppressing; the negated frame is pushed
    /// back so the matching `endif` balances.
    pub fn begin_else(&mut self) -> Result<()> {
        let matched = self.frames.pop().ok_or(Error::DanglingElse)?;
        if matched {
            self.suppressed = true;
        } else {
            self.suppressed = match self.frames.last() {
                Some(outer) => !outer,
                None => false,
            };
        }
        self.frames.push(!matched);
        Ok(())
    }

    /// `endif`. Suppression reverts to whatever the enclosing frame
    /// dictates.
    pub fn end_if(&mut self) -> Result<()> {
        self.frames.pop().ok_or(Error::DanglingEndif)?;
        self.suppressed = match self.frames.last() {
            Some(outer) => !outer,
            None => false,
        };
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
