//! Static operator catalog and field palette.

pub mod fields;
pub mod operator;

use crate::error::CatalogError;
use operator::{Arity, Operator, OperatorCode, OperatorFamily, RightOperand};

const fn op(
    code: OperatorCode,
    family: OperatorFamily,
    arity: Arity,
    right: RightOperand,
    symbol: &'static str,
    label: &'static str,
    description: &'static str,
) -> Operator {
    Operator {
        code,
        family,
        arity,
        symbol,
        label,
        description,
        right,
    }
}

use Arity::*;
use OperatorFamily::*;

/// Indexed by `OperatorCode as usize`; keep in declaration order.
pub(crate) static CATALOG: [Operator; 18] = [
    op(OperatorCode::Eq, Comparison, Binary, RightOperand::Number, "$eq", "=", "Equals"),
    op(OperatorCode::Ne, Comparison, Binary, RightOperand::Number, "$ne", "≠", "Not Equal"),
    op(OperatorCode::Gt, Comparison, Binary, RightOperand::Number, "$gt", ">", "Greater Than"),
    op(OperatorCode::Gte, Comparison, Binary, RightOperand::Number, "$gte", "≥", "Greater Than or Equal"),
    op(OperatorCode::Lt, Comparison, Binary, RightOperand::Number, "$lt", "<", "Less Than"),
    op(OperatorCode::Lte, Comparison, Binary, RightOperand::Number, "$lte", "≤", "Less Than or Equal"),
    op(OperatorCode::Between, Comparison, Ternary, RightOperand::Number, "$and", "between", "Between Two Bounds"),
    op(OperatorCode::In, Array, Binary, RightOperand::List, "$in", "in", "In Array"),
    op(OperatorCode::Nin, Array, Binary, RightOperand::List, "$nin", "not in", "Not In Array"),
    op(OperatorCode::All, Array, Binary, RightOperand::List, "$all", "all", "All Elements Match"),
    op(OperatorCode::Exists, Element, Unary, RightOperand::None, "$ifNull", "exists", "Field Exists"),
    op(OperatorCode::Type, Element, Unary, RightOperand::None, "$type", "type", "Type Check"),
    op(OperatorCode::Mod, Evaluation, Binary, RightOperand::Integer, "$mod", "mod", "Modulo"),
    op(OperatorCode::Regex, Evaluation, Binary, RightOperand::Any, "$regexMatch", "regex", "Regular Expression"),
    op(OperatorCode::Add, Math, Variadic, RightOperand::Number, "$add", "+", "Addition"),
    op(OperatorCode::Subtract, Math, Variadic, RightOperand::Number, "$subtract", "-", "Subtraction"),
    op(OperatorCode::Multiply, Math, Variadic, RightOperand::Number, "$multiply", "×", "Multiplication"),
    op(OperatorCode::Divide, Math, Variadic, RightOperand::Number, "$divide", "÷", "Division"),
];

pub(crate) fn entry(code: OperatorCode) -> &'static Operator {
    &CATALOG[code as usize]
}

/// Looks an operator up by its code string.
pub fn lookup(code: &str) -> Result<&'static Operator, CatalogError> {
    code.parse::<OperatorCode>().map(entry)
}

/// All operators, in palette order.
pub fn operators() -> impl Iterator<Item = &'static Operator> {
    CATALOG.iter()
}

/// Operators belonging to `family`, in palette order.
pub fn family(family: OperatorFamily) -> impl Iterator<Item = &'static Operator> {
    CATALOG.iter().filter(move |op| op.family == family)
}

/// Case-insensitive search over labels and descriptions. An empty query
/// matches everything.
pub fn search(query: &str) -> Vec<&'static Operator> {
    let needle = query.trim().to_lowercase();
    CATALOG
        .iter()
        .filter(|op| {
            needle.is_empty()
                || op.label.to_lowercase().contains(&needle)
                || op.description.to_lowercase().contains(&needle)
        })
        .collect()
}
