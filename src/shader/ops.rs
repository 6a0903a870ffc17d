//! Operators, intrinsics, swizzles and texture sampling on `Variable`s.

use super::builders::{call, check, Slot};
use super::errors::{Error, Result};
use super::variable::{DataType, Variable};

fn mismatch(op: &'static str, expected: &str, operands: &[&Variable]) -> Error {
    let found: Vec<&str> = operands.iter().map(|v| v.data_type().name()).collect();
    Error::TypeMismatch {
        constructor: op,
        expected: expected.into(),
        found: found.join(", "),
    }
}

fn binary(symbol: &str, target: DataType, a: &Variable, b: &Variable) -> Variable {
    a.set_used();
    b.set_used();
    Variable::new(format!("({} {} {})", a.value(), symbol, b.value()), target)
}

/// Result type of a component-wise operation: identical numeric types, or a
/// float scalar against a float vector/matrix.
fn componentwise(a: DataType, b: DataType) -> Option<DataType> {
    if !a.is_numeric() || !b.is_numeric() {
        return None;
    }

    if a == b {
        Some(a)
    } else if a == DataType::Float && !b.is_scalar() {
        Some(b)
    } else if b == DataType::Float && !a.is_scalar() {
        Some(a)
    } else {
        None
    }
}

fn arithmetic(op: &'static str, symbol: &str, a: &Variable, b: &Variable) -> Result<Variable> {
    match componentwise(a.data_type(), b.data_type()) {
        Some(t) => Ok(binary(symbol, t, a, b)),
        None => Err(mismatch(op, "matching numeric types", &[a, b])),
    }
}

pub fn add(a: &Variable, b: &Variable) -> Result<Variable> {
    arithmetic("add", "+", a, b)
}

pub fn sub(a: &Variable, b: &Variable) -> Result<Variable> {
    arithmetic("sub", "-", a, b)
}

pub fn div(a: &Variable, b: &Variable) -> Result<Variable> {
    arithmetic("div", "/", a, b)
}

/// Multiplication. Products involving two matrices or a matrix and a vector are
/// linear-algebra products emitted through `MUL(a, b)`; everything else is
/// component-wise.
pub fn mul(a: &Variable, b: &Variable) -> Result<Variable> {
    use self::DataType::*;

    let product = match (a.data_type(), b.data_type()) {
        (Mat4, Mat4) => Some(Mat4),
        (Mat4, Vec4) | (Vec4, Mat4) => Some(Vec4),
        _ => None,
    };

    match product {
        Some(t) => Ok(call("MUL", t, &[a, b])),
        None => arithmetic("mul", "*", a, b),
    }
}

pub fn neg(a: &Variable) -> Result<Variable> {
    if !a.data_type().is_numeric() {
        return Err(mismatch("neg", "numeric", &[a]));
    }

    a.set_used();
    Ok(Variable::new(format!("(-{})", a.value()), a.data_type()))
}

fn same_vector(op: &'static str, a: &Variable, b: &Variable) -> Result<DataType> {
    let t = a.data_type();
    if t.is_vector() && t == b.data_type() {
        Ok(t)
    } else {
        Err(mismatch(op, "vecN, vecN", &[a, b]))
    }
}

pub fn dot(a: &Variable, b: &Variable) -> Result<Variable> {
    same_vector("dot", a, b)?;
    Ok(call("dot", DataType::Float, &[a, b]))
}

pub fn normalize(v: &Variable) -> Result<Variable> {
    if !v.data_type().is_vector() {
        return Err(mismatch("normalize", "vecN", &[v]));
    }

    Ok(call("normalize", v.data_type(), &[v]))
}

pub fn length(v: &Variable) -> Result<Variable> {
    if !v.data_type().is_vector() {
        return Err(mismatch("length", "vecN", &[v]));
    }

    Ok(call("length", DataType::Float, &[v]))
}

/// `x` is a float or float vector; bounds either match it or are floats.
fn is_float_like(t: DataType) -> bool {
    t == DataType::Float || t.is_vector()
}

fn bound_accepts(x: DataType, bound: DataType) -> bool {
    bound == x || bound == DataType::Float
}

pub fn clamp(x: &Variable, lo: &Variable, hi: &Variable) -> Result<Variable> {
    let t = x.data_type();
    if !is_float_like(t) || !bound_accepts(t, lo.data_type()) || !bound_accepts(t, hi.data_type()) {
        return Err(mismatch("clamp", "genType, genType|float, genType|float", &[x, lo, hi]));
    }

    Ok(call("clamp", t, &[x, lo, hi]))
}

pub fn mix(a: &Variable, b: &Variable, t: &Variable) -> Result<Variable> {
    let ty = a.data_type();
    if !is_float_like(ty) || ty != b.data_type() || !bound_accepts(ty, t.data_type()) {
        return Err(mismatch("mix", "genType, genType, genType|float", &[a, b, t]));
    }

    Ok(call("mix", ty, &[a, b, t]))
}

fn extremum(op: &'static str, a: &Variable, b: &Variable) -> Result<Variable> {
    let t = a.data_type();
    if !is_float_like(t) || !bound_accepts(t, b.data_type()) {
        return Err(mismatch(op, "genType, genType|float", &[a, b]));
    }

    Ok(call(op, t, &[a, b]))
}

pub fn max(a: &Variable, b: &Variable) -> Result<Variable> {
    extremum("max", a, b)
}

pub fn min(a: &Variable, b: &Variable) -> Result<Variable> {
    extremum("min", a, b)
}

/// Samples a 2D texture, yielding its `vec4` color.
pub fn sample(sampler: &Variable, uv: &Variable) -> Result<Variable> {
    check(
        "sample",
        &[
            Slot::Exact(DataType::Sampler2D),
            Slot::Exact(DataType::Vec2),
        ],
        &[sampler, uv],
    )?;

    Ok(call("SAMPLE_TEXTURE", DataType::Vec4, &[sampler, uv]))
}

const SWIZZLE_SETS: [&str; 2] = ["xyzw", "rgba"];

/// Selects components by name, e.g. `swizzle(&color, "rgb")`. Components must
/// come from a single naming set and exist in the source vector.
pub fn swizzle(v: &Variable, components: &str) -> Result<Variable> {
    let invalid = || Error::InvalidSwizzle(components.to_owned(), v.data_type());

    if !v.data_type().is_vector() {
        return Err(invalid());
    }

    let width = v.data_type().components();
    let set = components
        .chars()
        .next()
        .and_then(|c| SWIZZLE_SETS.iter().find(|s| s.contains(c)))
        .ok_or_else(invalid)?;

    let inside = components
        .chars()
        .all(|c| set.find(c).map(|i| i < width).unwrap_or(false));

    let target = DataType::float_vector(components.len()).ok_or_else(invalid)?;
    if !inside {
        return Err(invalid());
    }

    v.set_used();
    Ok(Variable::new(format!("{}.{}", v.value(), components), target))
}

#[cfg(test)]
mod test {
    use super::*;

    fn var(t: DataType) -> Variable {
        Variable::new("v", t)
    }

    #[test]
    fn componentwise_rules() {
        assert_eq!(componentwise(DataType::Vec3, DataType::Vec3), Some(DataType::Vec3));
        assert_eq!(componentwise(DataType::Float, DataType::Vec2), Some(DataType::Vec2));
        assert_eq!(componentwise(DataType::Mat4, DataType::Float), Some(DataType::Mat4));
        assert_eq!(componentwise(DataType::Int, DataType::Float), None);
        assert_eq!(componentwise(DataType::Int, DataType::Vec2), None);
        assert_eq!(componentwise(DataType::Vec2, DataType::Vec3), None);
        assert_eq!(componentwise(DataType::Sampler2D, DataType::Sampler2D), None);
    }

    #[test]
    fn swizzles() {
        let v = var(DataType::Vec3);
        assert_eq!(swizzle(&v, "xy").unwrap().data_type(), DataType::Vec2);
        assert_eq!(swizzle(&v, "bgr").unwrap().data_type(), DataType::Vec3);
        assert_eq!(swizzle(&v, "xxxx").unwrap().data_type(), DataType::Vec4);
        assert!(swizzle(&v, "w").is_err());
        assert!(swizzle(&v, "xg").is_err());
        assert!(swizzle(&v, "").is_err());
        assert!(swizzle(&v, "xyzxy").is_err());
        assert!(swizzle(&var(DataType::Float), "x").is_err());
        assert!(swizzle(&var(DataType::Mat4), "x").is_err());
    }
}
