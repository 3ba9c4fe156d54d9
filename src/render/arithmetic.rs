use crate::{
    compile::Operator,
    log::{
        error_not_iterable, Error, ErrorKind, DIVISION_BY_ZERO, INCOMPATIBLE_TYPES,
        NUMERIC_OVERFLOW,
    },
};
use serde_json::{Number, Value};

/// Return true if the given [`Value`] is truthy.
///
/// `None`, `False`, zero and empty strings or collections are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(bo) => *bo,
        Value::Number(nu) => nu.as_f64().is_some_and(|f| f != 0.0),
        Value::String(st) => !st.is_empty(),
        Value::Array(ar) => !ar.is_empty(),
        Value::Object(ob) => !ob.is_empty(),
        Value::Null => false,
    }
}

/// Return the name of the type of the [`Value`], as it would be written
/// in a template.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "None",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "dictionary",
    }
}

/// Return the items a loop over the [`Value`] visits.
///
/// Arrays yield their items, dictionaries yield their keys, and strings
/// yield each character as a string.
///
/// # Errors
///
/// Returns an [`Error`] of kind [`ErrorKind::Iteration`] for any other type.
pub fn iterate(value: Value) -> Result<Vec<Value>, Error> {
    match value {
        Value::Array(array) => Ok(array),
        Value::Object(object) => Ok(object.into_iter().map(|(key, _)| Value::String(key)).collect()),
        Value::String(string) => Ok(string.chars().map(|c| Value::String(c.into())).collect()),
        other => Err(error_not_iterable(type_name(&other))),
    }
}

/// Apply the [`Operator`] to two [`Value`] instances.
///
/// Integers stay integers for `+`, `-` and `*`, while `/` always produces
/// a float.
///
/// # Errors
///
/// Returns an [`Error`] if either value is not a number, or the operation
/// has no finite result.
pub fn apply_operator(left: &Value, operator: Operator, right: &Value) -> Result<Value, Error> {
    let (Value::Number(left), Value::Number(right)) = (left, right) else {
        return Err(Error::build(INCOMPATIBLE_TYPES)
            .with_kind(ErrorKind::TypeMismatch)
            .with_help(format!(
                "operator `{operator}` requires two numbers, found {} and {}",
                type_name(left),
                type_name(right)
            )));
    };

    if operator == Operator::Divide {
        return divide(left, right);
    }
    if let Some(result) = apply_integer(left, operator, right) {
        return result;
    }

    let (left_as, right_as) = as_floats(left, right);
    let result = match operator {
        Operator::Add => left_as + right_as,
        Operator::Subtract => left_as - right_as,
        Operator::Multiply => left_as * right_as,
        Operator::Divide => left_as / right_as,
    };

    from_float(result)
}

/// Apply the [`Operator`] when both numbers are integers.
///
/// Returns `None` when either number is a float.
fn apply_integer(
    left: &Number,
    operator: Operator,
    right: &Number,
) -> Option<Result<Value, Error>> {
    if let (Some(left), Some(right)) = (left.as_i64(), right.as_i64()) {
        let result = match operator {
            Operator::Add => left.checked_add(right),
            Operator::Subtract => left.checked_sub(right),
            Operator::Multiply => left.checked_mul(right),
            Operator::Divide => return None,
        };
        return Some(result.map(Value::from).ok_or_else(|| error_overflow(operator)));
    }
    if let (Some(left), Some(right)) = (left.as_u64(), right.as_u64()) {
        let result = match operator {
            Operator::Add => left.checked_add(right).map(Value::from),
            Operator::Subtract => match left.checked_sub(right) {
                Some(result) => Some(Value::from(result)),
                None => i64::try_from(i128::from(left) - i128::from(right))
                    .ok()
                    .map(Value::from),
            },
            Operator::Multiply => left.checked_mul(right).map(Value::from),
            Operator::Divide => return None,
        };
        return Some(result.ok_or_else(|| error_overflow(operator)));
    }
    if left.is_f64() || right.is_f64() {
        return None;
    }

    // One operand is above i64::MAX and the other is negative.
    let (left, right) = (as_i128(left)?, as_i128(right)?);
    let result = match operator {
        Operator::Add => left.checked_add(right),
        Operator::Subtract => left.checked_sub(right),
        Operator::Multiply => left.checked_mul(right),
        Operator::Divide => return None,
    };
    let value = result.and_then(|result| {
        i64::try_from(result)
            .map(Value::from)
            .or_else(|_| u64::try_from(result).map(Value::from))
            .ok()
    });

    Some(value.ok_or_else(|| error_overflow(operator)))
}

/// Divide two numbers, always producing a float.
fn divide(left: &Number, right: &Number) -> Result<Value, Error> {
    let (left_as, right_as) = as_floats(left, right);
    if right_as == 0.0 {
        return Err(Error::build(DIVISION_BY_ZERO)
            .with_kind(ErrorKind::Arithmetic)
            .with_help("the right side of `/` must not be zero"));
    }

    from_float(left_as / right_as)
}

fn as_i128(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

fn as_floats(left: &Number, right: &Number) -> (f64, f64) {
    (
        left.as_f64().unwrap_or_default(),
        right.as_f64().unwrap_or_default(),
    )
}

/// Convert a float result to a [`Value`].
///
/// # Errors
///
/// Returns an [`Error`] if the float is infinite or NaN, which cannot be
/// represented as a number.
fn from_float(result: f64) -> Result<Value, Error> {
    Number::from_f64(result)
        .map(Value::Number)
        .ok_or_else(|| {
            Error::build(NUMERIC_OVERFLOW)
                .with_kind(ErrorKind::Arithmetic)
                .with_help("the result of the operation is not a finite number")
        })
}

fn error_overflow(operator: Operator) -> Error {
    Error::build(NUMERIC_OVERFLOW)
        .with_kind(ErrorKind::Arithmetic)
        .with_help(format!(
            "the result of `{operator}` does not fit in a 64-bit integer"
        ))
}
