// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Update-expression algebra
//!
//! Two independent, pure algebras: counter arithmetic (one `SET`
//! statement writing both the step and the counter attribute) and
//! single-element set membership (`ADD`/`DELETE`). The exact textual
//! form is a contract with the stored schema; the evaluator and any
//! external backend both consume these strings.

use crate::schema;

/// How the step attribute is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// Set to the supplied value
    Init,
    /// Keep the current value, or the supplied value if absent
    Current,
}

/// How the counter attribute is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMode {
    /// Reset to the default
    Init,
    /// Keep the current value, or the default if absent
    Current,
    /// Add the step expression to the current-or-default value
    Increment,
    /// Subtract the step expression from the current-or-default value
    Decrement,
}

fn step_fragment(mode: StepMode) -> String {
    match mode {
        StepMode::Init => schema::STEP_INIT.to_string(),
        StepMode::Current => format!(
            "if_not_exists({},{})",
            schema::STEP_VAL,
            schema::STEP_INIT
        ),
    }
}

/// Build the single statement writing both `stepVal` and `countVal`
///
/// A counter that has never been written still behaves as value 0,
/// step 1 on first touch: every read of the current value goes through
/// `if_not_exists` with the bound default.
pub fn arithmetic(step: StepMode, count: CountMode) -> String {
    let step_expr = step_fragment(step);
    let preserved = format!(
        "if_not_exists({},{})",
        schema::COUNT_VAL,
        schema::COUNT_INIT
    );
    let count_expr = match count {
        CountMode::Init => schema::COUNT_INIT.to_string(),
        CountMode::Current => preserved,
        CountMode::Increment => format!("{} + {}", preserved, step_expr),
        CountMode::Decrement => format!("{} - {}", preserved, step_expr),
    };
    format!(
        "SET {}={},{}={}",
        schema::STEP_VAL,
        step_expr,
        schema::COUNT_VAL,
        count_expr
    )
}

/// Externally meaningful counter mutations, mapped onto mode pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterChange {
    Increment,
    Decrement,
    /// Reset the value to the default, keeping the step
    Reset,
    /// Replace the step, keeping the value
    SetStep(i64),
    /// Materialize defaults without changing anything already written
    Touch,
}

impl CounterChange {
    pub fn modes(&self) -> (StepMode, CountMode) {
        match self {
            Self::Increment => (StepMode::Current, CountMode::Increment),
            Self::Decrement => (StepMode::Current, CountMode::Decrement),
            Self::Reset => (StepMode::Current, CountMode::Init),
            Self::SetStep(_) => (StepMode::Init, CountMode::Current),
            Self::Touch => (StepMode::Current, CountMode::Current),
        }
    }

    /// Value bound to the step placeholder
    pub fn step_value(&self) -> i64 {
        match self {
            Self::SetStep(n) => *n,
            _ => 1,
        }
    }

    pub fn expression(&self) -> String {
        let (step, count) = self.modes();
        arithmetic(step, count)
    }
}

/// Add or remove one element of a stored string set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetEdit {
    Add,
    Remove,
}

/// Build a set-membership statement against a single-element-set value
pub fn set_mutation(edit: SetEdit, attr: &str, value: &str) -> String {
    match edit {
        SetEdit::Add => format!("ADD {} {}", attr, value),
        SetEdit::Remove => format!("DELETE {} {}", attr, value),
    }
}

#[cfg(test)]
#[path = "expr_tests.rs"]
mod tests;
