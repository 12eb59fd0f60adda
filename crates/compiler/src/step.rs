//! Per-kind rules for steps that need no saved filter lookup.

use crate::{
    coerce::{coerce_number, integer_or_raw, number_or_raw},
    error::CompileError,
};
use model::{
    Expression, Literal, Operator, OperatorCode, OperatorFamily, RangeBounds, RightOperand, Step,
    StepKind, StepValue,
};

/// How a literal right-hand operand is turned into an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coercion {
    /// Left exactly as typed.
    Raw,
    /// Number, or the raw literal when it does not parse.
    Number,
    /// Integer, or the raw literal when it does not parse.
    Integer,
    /// A sequence; a scalar becomes a one-element list.
    List,
}

impl Coercion {
    /// Picks the rule from the operator's right-hand declaration. Array steps
    /// always compare against a sequence and generic steps coerce whatever
    /// parses as a number.
    fn for_step(kind: &StepKind, operator: &Operator) -> Self {
        if matches!(kind, StepKind::Array { .. }) {
            return Coercion::List;
        }
        match operator.right {
            RightOperand::Integer => Coercion::Integer,
            _ if matches!(kind, StepKind::Generic) => Coercion::Number,
            RightOperand::List => Coercion::List,
            RightOperand::Number if kind.expects_number() => Coercion::Number,
            _ => Coercion::Raw,
        }
    }
}

/// Right-hand operand of `step`: a field path in reference mode, the coerced
/// literal otherwise. `None` when nothing was supplied.
fn right_operand(value: &StepValue, coercion: Coercion) -> Option<Expression> {
    match value {
        StepValue::Field(path) if !path.trim().is_empty() => Some(Expression::field(path.trim())),
        StepValue::Literal(lit) if !lit.is_blank() => Some(match coercion {
            Coercion::Raw => Expression::Literal(lit.clone()),
            Coercion::Number => number_or_raw(lit),
            Coercion::Integer => integer_or_raw(lit),
            Coercion::List => match lit {
                Literal::List(_) => Expression::Literal(lit.clone()),
                scalar => Expression::Literal(Literal::List(vec![scalar.clone()])),
            },
        }),
        _ => None,
    }
}

fn binary(operator: &Operator, left: Expression, right: Expression) -> Expression {
    Expression::call(operator.symbol, vec![left, right])
}

/// Compiles a step of any kind other than a saved filter reference.
///
/// `Ok(None)` means the step is still incomplete.
pub(crate) fn compile_local(step: &Step) -> Result<Option<Expression>, CompileError> {
    let Some(operator) = step.operator() else {
        return Ok(None);
    };
    let field = step.field_name.trim();
    if field.is_empty() {
        return Ok(None);
    }
    if operator.code == OperatorCode::Between && !matches!(step.kind, StepKind::Range { .. }) {
        return Err(CompileError::Unsupported(format!(
            "'between' needs a range step, '{}' is {}",
            step.id,
            step.kind.name()
        )));
    }

    let coercion = Coercion::for_step(&step.kind, operator);

    match &step.kind {
        StepKind::Range {
            has_abs,
            use_abs,
            bounds,
        } => {
            // Bounds always apply to the signed value.
            if operator.code == OperatorCode::Between {
                return compile_between(Expression::field(field), bounds.as_ref());
            }

            let subject = if *has_abs || *use_abs {
                Expression::unary("$abs", Expression::field(field))
            } else {
                Expression::field(field)
            };
            if !operator.takes_value() {
                return Ok(Some(compile_unary(operator, subject)));
            }
            Ok(right_operand(&step.value, coercion).map(|right| binary(operator, subject, right)))
        }

        StepKind::Computed {
            operands,
            operation,
        } => compile_computed(step, field, operator, operands, *operation, coercion),

        StepKind::Array { operation } => {
            let subject = match operation.as_deref().map(str::trim) {
                Some(op) if !op.is_empty() => Expression::call(
                    format!("${}", op.trim_start_matches('$')),
                    vec![Expression::field(field)],
                ),
                _ => Expression::field(field),
            };

            Ok(right_operand(&step.value, coercion).map(|right| binary(operator, subject, right)))
        }

        StepKind::Evaluation if operator.code == OperatorCode::Regex => {
            Ok(right_operand(&step.value, coercion).map(|pattern| {
                Expression::named(
                    operator.symbol,
                    vec![("input", Expression::field(field)), ("regex", pattern)],
                )
            }))
        }

        StepKind::Element | StepKind::Evaluation | StepKind::Generic => {
            compile_generic(step, field, operator, coercion)
        }

        StepKind::CustomFilterRef { .. } => Err(CompileError::Unsupported(format!(
            "saved filter reference '{}' needs a resolver",
            step.id
        ))),
    }
}

fn compile_generic(
    step: &Step,
    field: &str,
    operator: &Operator,
    coercion: Coercion,
) -> Result<Option<Expression>, CompileError> {
    if !operator.takes_value() {
        return Ok(Some(compile_unary(operator, Expression::field(field))));
    }
    Ok(right_operand(&step.value, coercion)
        .map(|right| binary(operator, Expression::field(field), right)))
}

/// Operators that test the field alone; any supplied value is ignored.
fn compile_unary(operator: &Operator, subject: Expression) -> Expression {
    match operator.code {
        OperatorCode::Exists => Expression::call(
            operator.symbol,
            vec![subject, Expression::literal(Literal::Bool(false))],
        ),
        _ => Expression::unary(operator.symbol, subject),
    }
}

/// `{$and: [{$gte: [f, min]}, {$lte: [f, max]}]}`. Both bounds must be
/// present and numeric.
fn compile_between(
    subject: Expression,
    bounds: Option<&RangeBounds>,
) -> Result<Option<Expression>, CompileError> {
    let (Some(min), Some(max)) = (
        bounds.and_then(|b| b.min.as_ref()).filter(|l| !l.is_blank()),
        bounds.and_then(|b| b.max.as_ref()).filter(|l| !l.is_blank()),
    ) else {
        return Ok(None);
    };

    let min = Expression::Literal(Literal::Number(coerce_number(min)?));
    let max = Expression::Literal(Literal::Number(coerce_number(max)?));

    Ok(Some(Expression::call(
        OperatorCode::Between.symbol(),
        vec![
            Expression::call(OperatorCode::Gte.symbol(), vec![subject.clone(), min]),
            Expression::call(OperatorCode::Lte.symbol(), vec![subject, max]),
        ],
    )))
}

fn compile_computed(
    step: &Step,
    field: &str,
    operator: &Operator,
    operands: &[String],
    operation: Option<OperatorCode>,
    coercion: Coercion,
) -> Result<Option<Expression>, CompileError> {
    let math = operation.map(|code| code.operator()).unwrap_or(operator);
    if math.family != OperatorFamily::Math {
        return Err(CompileError::Unsupported(format!(
            "computed step '{}' combines operands with non-math operator '{}'",
            step.id, math.code
        )));
    }

    let operands = if operands.is_empty() {
        vec![Expression::field(field)]
    } else {
        operands.iter().map(|path| Expression::field(path.trim())).collect()
    };
    let expression = Expression::call(math.symbol, operands);

    Ok(Some(match right_operand(&step.value, coercion) {
        Some(right) => binary(operator, expression, right),
        None => expression,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compiled(step: &Step) -> serde_json::Value {
        compile_local(step)
            .unwrap()
            .map(|e| e.to_json())
            .unwrap_or(serde_json::Value::Null)
    }

    #[test]
    fn test_range_coerces_literal() {
        let step = Step::range("a", "rb")
            .with_operator(OperatorCode::Gt)
            .with_literal("0.5");
        assert_eq!(compiled(&step), json!({"$gt": ["$rb", 0.5]}));

        let step = step.with_field_value("drb");
        assert_eq!(compiled(&step), json!({"$gt": ["$rb", "$drb"]}));
    }

    #[test]
    fn test_range_with_abs() {
        let step = Step::new(
            "a",
            "x",
            StepKind::Range {
                has_abs: true,
                use_abs: true,
                bounds: None,
            },
        )
        .with_operator(OperatorCode::Lt)
        .with_literal(5);
        assert_eq!(compiled(&step), json!({"$lt": [{"$abs": "$x"}, 5]}));
    }

    #[test]
    fn test_between_ignores_abs() {
        let step = Step::new(
            "b",
            "galactic_latitude",
            StepKind::Range {
                has_abs: true,
                use_abs: true,
                bounds: Some(RangeBounds::new(5, 20)),
            },
        )
        .with_operator(OperatorCode::Between);
        assert_eq!(
            compiled(&step),
            json!({"$and": [
                {"$gte": ["$galactic_latitude", 5]},
                {"$lte": ["$galactic_latitude", 20]}
            ]})
        );
    }

    #[test]
    fn test_coercion_follows_operator_declaration() {
        let regex = Step::new("r", "name", StepKind::Evaluation)
            .with_operator(OperatorCode::Regex)
            .with_literal("42");
        assert_eq!(
            compiled(&regex),
            json!({"$regexMatch": {"input": "$name", "regex": "42"}})
        );

        let within = Step::range("i", "fid")
            .with_operator(OperatorCode::In)
            .with_literal("2");
        assert_eq!(compiled(&within), json!({"$in": ["$fid", ["2"]]}));

        let modulo = Step::range("m", "jd")
            .with_operator(OperatorCode::Mod)
            .with_literal("3.9");
        assert_eq!(compiled(&modulo), json!({"$mod": ["$jd", 3]}));

        let generic_mod = Step::new("m", "jd", StepKind::Generic)
            .with_operator(OperatorCode::Mod)
            .with_literal("3.9");
        assert_eq!(compiled(&generic_mod), json!({"$mod": ["$jd", 3]}));
    }

    #[test]
    fn test_between() {
        let step = Step::new(
            "b",
            "jd",
            StepKind::Range {
                has_abs: false,
                use_abs: false,
                bounds: Some(RangeBounds::new("10", 20)),
            },
        )
        .with_operator(OperatorCode::Between);
        assert_eq!(
            compiled(&step),
            json!({"$and": [{"$gte": ["$jd", 10]}, {"$lte": ["$jd", 20]}]})
        );

        let missing = Step::range("b", "jd").with_operator(OperatorCode::Between);
        assert_eq!(compile_local(&missing).unwrap(), None);
    }

    #[test]
    fn test_between_rejects_non_numeric_bounds() {
        let step = Step::new(
            "b",
            "jd",
            StepKind::Range {
                has_abs: false,
                use_abs: false,
                bounds: Some(RangeBounds::new("soon", 20)),
            },
        )
        .with_operator(OperatorCode::Between);
        assert!(matches!(compile_local(&step), Err(CompileError::Coercion(_))));
    }

    #[test]
    fn test_missing_value_is_incomplete() {
        let step = Step::range("a", "rb").with_operator(OperatorCode::Gt);
        assert_eq!(compile_local(&step).unwrap(), None);

        let blank = step.with_literal("  ");
        assert_eq!(compile_local(&blank).unwrap(), None);

        let no_field = Step::range("a", "").with_operator(OperatorCode::Gt).with_literal(1);
        assert_eq!(compile_local(&no_field).unwrap(), None);
    }

    #[test]
    fn test_computed() {
        let sum = Step::new(
            "c",
            "rb",
            StepKind::Computed {
                operands: vec!["rb".into(), "drb".into()],
                operation: Some(OperatorCode::Add),
            },
        )
        .with_operator(OperatorCode::Gt);
        assert_eq!(compiled(&sum), json!({"$add": ["$rb", "$drb"]}));

        let compared = sum.with_literal("1.2");
        assert_eq!(
            compiled(&compared),
            json!({"$gt": [{"$add": ["$rb", "$drb"]}, 1.2]})
        );

        let own_field = Step::new(
            "c",
            "rb",
            StepKind::Computed {
                operands: vec![],
                operation: None,
            },
        )
        .with_operator(OperatorCode::Multiply);
        assert_eq!(compiled(&own_field), json!({"$multiply": ["$rb"]}));
    }

    #[test]
    fn test_computed_rejects_non_math_operation() {
        let step = Step::new(
            "c",
            "rb",
            StepKind::Computed {
                operands: vec![],
                operation: None,
            },
        )
        .with_operator(OperatorCode::Gt);
        assert!(matches!(compile_local(&step), Err(CompileError::Unsupported(_))));
    }

    #[test]
    fn test_array_promotes_scalar_and_applies_operation() {
        let step = Step::new("a", "tags", StepKind::Array { operation: None })
            .with_operator(OperatorCode::In)
            .with_literal("star");
        assert_eq!(compiled(&step), json!({"$in": ["$tags", ["star"]]}));

        let step = Step::new(
            "a",
            "cands",
            StepKind::Array {
                operation: Some("size".into()),
            },
        )
        .with_operator(OperatorCode::In)
        .with_literal(Literal::List(vec![Literal::int(1), Literal::int(2)]));
        assert_eq!(compiled(&step), json!({"$in": [{"$size": ["$cands"]}, [1, 2]]}));

        let step = step.with_field_value("allowed");
        assert_eq!(compiled(&step), json!({"$in": [{"$size": ["$cands"]}, "$allowed"]}));
    }

    #[test]
    fn test_element_operators_ignore_value() {
        let exists = Step::new("e", "y", StepKind::Element)
            .with_operator(OperatorCode::Exists)
            .with_literal("ignored");
        assert_eq!(compiled(&exists), json!({"$ifNull": ["$y", false]}));

        let ty = Step::new("e", "y", StepKind::Element).with_operator(OperatorCode::Type);
        assert_eq!(compiled(&ty), json!({"$type": "$y"}));

        let eq = Step::new("e", "y", StepKind::Element)
            .with_operator(OperatorCode::Eq)
            .with_literal("3");
        assert_eq!(compiled(&eq), json!({"$eq": ["$y", "3"]}));
    }

    #[test]
    fn test_evaluation() {
        let modulo = Step::new("m", "jd", StepKind::Evaluation)
            .with_operator(OperatorCode::Mod)
            .with_literal("4.7");
        assert_eq!(compiled(&modulo), json!({"$mod": ["$jd", 4]}));

        let regex = Step::new("r", "name", StepKind::Evaluation)
            .with_operator(OperatorCode::Regex)
            .with_literal("^ZTF");
        assert_eq!(
            compiled(&regex),
            json!({"$regexMatch": {"input": "$name", "regex": "^ZTF"}})
        );

        let by_field = regex.with_field_value("pattern");
        assert_eq!(
            compiled(&by_field),
            json!({"$regexMatch": {"input": "$name", "regex": "$pattern"}})
        );
    }

    #[test]
    fn test_generic_coerces_when_numeric() {
        let step = Step::new("g", "magpsf", StepKind::Generic)
            .with_operator(OperatorCode::Lte)
            .with_literal("18");
        assert_eq!(compiled(&step), json!({"$lte": ["$magpsf", 18]}));

        let text = Step::new("g", "band", StepKind::Generic)
            .with_operator(OperatorCode::Eq)
            .with_literal("g");
        assert_eq!(compiled(&text), json!({"$eq": ["$band", "g"]}));
    }
}
