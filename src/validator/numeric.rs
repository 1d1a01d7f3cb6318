//! Range and divisibility constraints for numbers.

use serde_json::Value;

use crate::error::Attribute;
use crate::path::JsonPath;
use crate::schema::Schema;
use crate::validation::ValidationContext;

pub(super) fn check(
    ctx: &mut ValidationContext<'_>,
    value: &Value,
    path: &JsonPath,
    schema: &Schema,
) {
    let Some(n) = value.as_f64() else {
        return;
    };

    let checks = [
        (Attribute::Minimum, schema.minimum.is_some_and(|min| n < min)),
        (Attribute::Maximum, schema.maximum.is_some_and(|max| n > max)),
        (
            Attribute::ExclusiveMinimum,
            schema.exclusive_minimum.is_some_and(|min| n <= min),
        ),
        (
            Attribute::ExclusiveMaximum,
            schema.exclusive_maximum.is_some_and(|max| n >= max),
        ),
        (
            Attribute::DivisibleBy,
            schema.divisible_by.is_some_and(|div| !is_divisible(n, div)),
        ),
    ];

    for (attribute, violated) in checks {
        if violated {
            ctx.report(attribute, path, Some(value.clone()), schema);
        }
    }
}

/// Tests `value % divisor == 0` without binary fraction artifacts.
///
/// Both operands are scaled by the smallest power of ten that makes them
/// whole before taking the remainder, so `0.3` is divisible by `0.1`.
/// A zero or non-finite divisor divides nothing.
pub(crate) fn is_divisible(value: f64, divisor: f64) -> bool {
    if divisor == 0.0 || !divisor.is_finite() || !value.is_finite() {
        return false;
    }

    let places = decimal_places(value).max(decimal_places(divisor));
    let scale = 10f64.powi(places as i32);
    let (a, b) = ((value * scale).round(), (divisor * scale).round());

    if !a.is_finite() || !b.is_finite() || b == 0.0 {
        return value % divisor == 0.0;
    }
    a % b == 0.0
}

fn decimal_places(n: f64) -> usize {
    // f64's Display never switches to exponent notation.
    let text = n.abs().to_string();
    text.split_once('.').map_or(0, |(_, fraction)| fraction.len()).min(300)
}
