//! Comparison operations and operand datatypes of a category.
//!
//! Both are persisted as integer codes. Codes outside the defined set survive
//! a load as `Unknown(code)` and render to a sentinel instead of failing.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rendered in place of a symbol for an unknown operation code.
pub const UNKNOWN_OPERATION: &str = "Unknown operation";

/// Rendered in place of a label for an unknown datatype code.
pub const UNKNOWN_DATATYPE: &str = "Unknown Datatype";

/// Comparison applied between a category's tab name and its tab value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Operation {
    EqualTo,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    NotEqual,
    /// Stored code outside the defined set
    Unknown(i32),
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::EqualTo,
        Operation::LessThan,
        Operation::LessThanOrEqual,
        Operation::GreaterThan,
        Operation::GreaterThanOrEqual,
        Operation::NotEqual,
    ];

    /// Predicate symbol, or the unknown-operation sentinel.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::EqualTo => "=",
            Operation::LessThan => "<",
            Operation::LessThanOrEqual => "<=",
            Operation::GreaterThan => ">",
            Operation::GreaterThanOrEqual => ">=",
            Operation::NotEqual => "<>",
            Operation::Unknown(_) => UNKNOWN_OPERATION,
        }
    }

    /// Upper-case constant name, e.g. `GREATER_THAN`.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::EqualTo => "EQUAL_TO",
            Operation::LessThan => "LESS_THAN",
            Operation::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            Operation::GreaterThan => "GREATER_THAN",
            Operation::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Operation::NotEqual => "NOT_EQUAL",
            Operation::Unknown(_) => UNKNOWN_OPERATION,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Operation::EqualTo => 0,
            Operation::LessThan => 1,
            Operation::LessThanOrEqual => 2,
            Operation::GreaterThan => 3,
            Operation::GreaterThanOrEqual => 4,
            Operation::NotEqual => 5,
            Operation::Unknown(code) => *code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operation::Unknown(_))
    }
}

impl From<i32> for Operation {
    fn from(code: i32) -> Self {
        match code {
            0 => Operation::EqualTo,
            1 => Operation::LessThan,
            2 => Operation::LessThanOrEqual,
            3 => Operation::GreaterThan,
            4 => Operation::GreaterThanOrEqual,
            5 => Operation::NotEqual,
            other => Operation::Unknown(other),
        }
    }
}

impl From<Operation> for i32 {
    fn from(op: Operation) -> Self {
        op.code()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error returned when user input names no known operation or datatype.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: '{input}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub input: String,
    pub expected: String,
}

/// Normalizes `greater-than`, `GreaterThan`, `greater_than` to `GREATERTHAN`.
fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

impl FromStr for Operation {
    type Err = ParseEnumError;

    /// Accepts a symbol (`>=`), a name (`greater-than-or-equal`) or a code (`4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(op) = Operation::ALL.iter().find(|op| op.symbol() == trimmed) {
            return Ok(*op);
        }
        if trimmed == "!=" {
            return Ok(Operation::NotEqual);
        }
        if let Ok(code) = trimmed.parse::<i32>() {
            let op = Operation::from(code);
            if op.is_known() {
                return Ok(op);
            }
        }
        let wanted = normalize(trimmed);
        Operation::ALL
            .iter()
            .find(|op| normalize(op.name()) == wanted)
            .copied()
            .ok_or_else(|| ParseEnumError {
                kind: "operation",
                input: s.to_string(),
                expected: Operation::ALL.iter().map(|op| op.symbol()).join(", "),
            })
    }
}

/// Type of a category's tab value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Datatype {
    String,
    Integer,
    Float,
    Date,
    /// No operand: the tab value may be left blank
    Nil,
    Unknown(i32),
}

impl Datatype {
    pub const ALL: [Datatype; 5] = [
        Datatype::String,
        Datatype::Integer,
        Datatype::Float,
        Datatype::Date,
        Datatype::Nil,
    ];

    /// Diagnostic label, or the unknown-datatype sentinel.
    pub fn label(&self) -> &'static str {
        match self {
            Datatype::String => "STRING",
            Datatype::Integer => "INTEGER",
            Datatype::Float => "FLOAT",
            Datatype::Date => "DATE",
            Datatype::Nil => "NIL",
            Datatype::Unknown(_) => UNKNOWN_DATATYPE,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Datatype::String => 0,
            Datatype::Integer => 1,
            Datatype::Float => 2,
            Datatype::Date => 3,
            Datatype::Nil => 4,
            Datatype::Unknown(code) => *code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Datatype::Unknown(_))
    }
}

impl From<i32> for Datatype {
    fn from(code: i32) -> Self {
        match code {
            0 => Datatype::String,
            1 => Datatype::Integer,
            2 => Datatype::Float,
            3 => Datatype::Date,
            4 => Datatype::Nil,
            other => Datatype::Unknown(other),
        }
    }
}

impl From<Datatype> for i32 {
    fn from(datatype: Datatype) -> Self {
        datatype.code()
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Datatype {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i32>() {
            let datatype = Datatype::from(code);
            if datatype.is_known() {
                return Ok(datatype);
            }
        }
        let wanted = normalize(trimmed);
        Datatype::ALL
            .iter()
            .find(|d| d.label() == wanted)
            .copied()
            .ok_or_else(|| ParseEnumError {
                kind: "datatype",
                input: s.to_string(),
                expected: Datatype::ALL.iter().map(|d| d.label()).join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "=")]
    #[case(1, "<")]
    #[case(2, "<=")]
    #[case(3, ">")]
    #[case(4, ">=")]
    #[case(5, "<>")]
    #[case(6, UNKNOWN_OPERATION)]
    #[case(-1, UNKNOWN_OPERATION)]
    fn given_operation_code_when_rendering_symbol_then_maps_to_fixed_text(
        #[case] code: i32,
        #[case] expected: &str,
    ) {
        assert_eq!(Operation::from(code).symbol(), expected);
    }

    #[rstest]
    #[case(0, "STRING")]
    #[case(1, "INTEGER")]
    #[case(2, "FLOAT")]
    #[case(3, "DATE")]
    #[case(4, "NIL")]
    #[case(42, UNKNOWN_DATATYPE)]
    fn given_datatype_code_when_labelling_then_maps_to_fixed_text(
        #[case] code: i32,
        #[case] expected: &str,
    ) {
        assert_eq!(Datatype::from(code).label(), expected);
    }

    #[test]
    fn given_unknown_code_when_converting_back_then_code_is_preserved() {
        assert_eq!(i32::from(Operation::from(17)), 17);
        assert_eq!(i32::from(Datatype::from(-3)), -3);
    }

    #[rstest]
    #[case(">=", Operation::GreaterThanOrEqual)]
    #[case("<>", Operation::NotEqual)]
    #[case("!=", Operation::NotEqual)]
    #[case("greater-than", Operation::GreaterThan)]
    #[case("LESS_THAN_OR_EQUAL", Operation::LessThanOrEqual)]
    #[case("0", Operation::EqualTo)]
    fn given_operation_text_when_parsing_then_accepts_symbols_names_and_codes(
        #[case] input: &str,
        #[case] expected: Operation,
    ) {
        assert_eq!(input.parse::<Operation>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_operation_text_when_parsing_then_errors() {
        let err = "~=".parse::<Operation>().unwrap_err();
        assert_eq!(err.kind, "operation");
        assert!("9".parse::<Operation>().is_err());
    }

    #[test]
    fn given_datatype_text_when_parsing_then_accepts_names_and_codes() {
        assert_eq!("nil".parse::<Datatype>().unwrap(), Datatype::Nil);
        assert_eq!("3".parse::<Datatype>().unwrap(), Datatype::Date);
        assert!("decimal".parse::<Datatype>().is_err());
    }

    #[test]
    fn given_operation_when_serializing_then_uses_integer_code() {
        let json = serde_json::to_string(&Operation::GreaterThan).unwrap();
        assert_eq!(json, "3");
        let back: Operation = serde_json::from_str("9").unwrap();
        assert_eq!(back, Operation::Unknown(9));
    }
}
