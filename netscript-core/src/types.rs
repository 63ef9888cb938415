#![forbid(unsafe_code)]

use netscript_graph::DataType;

/// Element type named by a literal suffix (`1f`, `2i`, `3LL`, `1b`).
pub fn literal_dtype(suffix: &str) -> Option<DataType> {
    match suffix {
        "f" => Some(DataType::Float),
        "i" => Some(DataType::Int32),
        "LL" => Some(DataType::Int64),
        "b" => Some(DataType::Bool),
        _ => None,
    }
}

/// Integer value of a literal stored as `dtype`, truncated toward zero.
/// `None` when the value does not fit, instead of saturating.
pub fn integer_literal(value: f64, dtype: DataType) -> Option<i64> {
    // 2^63 is exactly representable; i64::MAX as f64 rounds up to it.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let v = value.trunc();
    let fits = match dtype {
        DataType::Int32 => v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX),
        DataType::Int64 => v >= -LIMIT && v < LIMIT,
        DataType::Float | DataType::Bool => false,
    };
    fits.then_some(v as i64)
}

/// Element type named by the target of `expr as TYPE`.
pub fn cast_dtype(token: &str) -> Option<DataType> {
    match token {
        "float" => Some(DataType::Float),
        "int" => Some(DataType::Int32),
        "long" => Some(DataType::Int64),
        "bool" => Some(DataType::Bool),
        _ => None,
    }
}
