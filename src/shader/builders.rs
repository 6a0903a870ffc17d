//! Constructors of typed values.
//!
//! Each constructor accepts exactly one operand pattern; the call site picks the
//! pattern by picking the function. On success every operand is marked used and
//! the result carries the generic constructor text (`vec4(a, b)`), which the
//! generator later maps onto the active dialect.

use smallvec::SmallVec;

use super::errors::{Error, Result};
use super::variable::{DataType, Variable};

/// What a single position of a constructor pattern accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// `Int` or `Float`.
    Scalar,
    Exact(DataType),
}

impl Slot {
    fn accepts(self, t: DataType) -> bool {
        match self {
            Slot::Scalar => t.is_scalar(),
            Slot::Exact(v) => v == t,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Slot::Scalar => "scalar",
            Slot::Exact(v) => v.name(),
        }
    }

    #[cfg(test)]
    fn components(self) -> usize {
        match self {
            Slot::Scalar => 1,
            Slot::Exact(v) => v.components(),
        }
    }
}

const S: Slot = Slot::Scalar;
const V2: Slot = Slot::Exact(DataType::Vec2);
const V3: Slot = Slot::Exact(DataType::Vec3);
const V4: Slot = Slot::Exact(DataType::Vec4);
const M4: Slot = Slot::Exact(DataType::Mat4);

/// Validates `operands` against `pattern`. Nothing is marked used on failure.
pub(crate) fn check(constructor: &'static str, pattern: &[Slot], operands: &[&Variable]) -> Result<()> {
    let ok = pattern.len() == operands.len()
        && pattern
            .iter()
            .zip(operands)
            .all(|(slot, v)| slot.accepts(v.data_type()));

    if ok {
        return Ok(());
    }

    let expected: SmallVec<[&str; 16]> = pattern.iter().map(|v| v.name()).collect();
    let found: SmallVec<[&str; 16]> = operands.iter().map(|v| v.data_type().name()).collect();

    Err(Error::TypeMismatch {
        constructor,
        expected: expected.join(", "),
        found: found.join(", "),
    })
}

/// Emits `name(op0, op1, ...)` typed as `target`, consuming the operands.
pub(crate) fn call(name: &str, target: DataType, operands: &[&Variable]) -> Variable {
    let args: SmallVec<[&str; 16]> = operands.iter().map(|v| v.value()).collect();
    for v in operands {
        v.set_used();
    }

    Variable::new(format!("{}({})", name, args.join(", ")), target)
}

fn construct(
    constructor: &'static str,
    target: DataType,
    pattern: &[Slot],
    operands: &[&Variable],
) -> Result<Variable> {
    check(constructor, pattern, operands)?;
    Ok(call(target.name(), target, operands))
}

fn splat(constructor: &'static str, target: DataType, s: &Variable) -> Result<Variable> {
    check(constructor, &[S], &[s])?;
    let operands: SmallVec<[&Variable; 4]> = (0..target.components()).map(|_| s).collect();
    Ok(call(target.name(), target, &operands))
}

fn literal(v: f32) -> Result<String> {
    if !v.is_finite() {
        return Err(Error::NonFiniteLiteral(v));
    }

    // `Debug` keeps a decimal point or exponent on every finite value.
    Ok(format!("{:?}", v))
}

/// Scalar floats.
pub struct Float;

impl Float {
    /// A float constant.
    pub fn lit(v: f32) -> Result<Variable> {
        Ok(Variable::new(literal(v)?, DataType::Float))
    }

    /// Converts a scalar into a float.
    pub fn from_scalar(v: &Variable) -> Result<Variable> {
        construct("Float::from_scalar", DataType::Float, &[S], &[v])
    }
}

/// Scalar integers.
pub struct Int;

impl Int {
    /// An integer constant.
    pub fn lit(v: i32) -> Variable {
        Variable::new(v.to_string(), DataType::Int)
    }

    /// Converts a scalar into an integer.
    pub fn from_scalar(v: &Variable) -> Result<Variable> {
        construct("Int::from_scalar", DataType::Int, &[S], &[v])
    }
}

pub struct Vec2;

impl Vec2 {
    pub fn new(x: &Variable, y: &Variable) -> Result<Variable> {
        construct("Vec2::new", DataType::Vec2, &[S, S], &[x, y])
    }

    pub fn splat(s: &Variable) -> Result<Variable> {
        splat("Vec2::splat", DataType::Vec2, s)
    }

    pub fn from_vec2(v: &Variable) -> Result<Variable> {
        construct("Vec2::from_vec2", DataType::Vec2, &[V2], &[v])
    }
}

pub struct Vec3;

impl Vec3 {
    pub fn new(x: &Variable, y: &Variable, z: &Variable) -> Result<Variable> {
        construct("Vec3::new", DataType::Vec3, &[S, S, S], &[x, y, z])
    }

    pub fn from_vec2_scalar(xy: &Variable, z: &Variable) -> Result<Variable> {
        construct("Vec3::from_vec2_scalar", DataType::Vec3, &[V2, S], &[xy, z])
    }

    pub fn from_scalar_vec2(x: &Variable, yz: &Variable) -> Result<Variable> {
        construct("Vec3::from_scalar_vec2", DataType::Vec3, &[S, V2], &[x, yz])
    }

    pub fn splat(s: &Variable) -> Result<Variable> {
        splat("Vec3::splat", DataType::Vec3, s)
    }

    pub fn from_vec3(v: &Variable) -> Result<Variable> {
        construct("Vec3::from_vec3", DataType::Vec3, &[V3], &[v])
    }

    /// Drops the `w` component.
    pub fn from_vec4(v: &Variable) -> Result<Variable> {
        check("Vec3::from_vec4", &[V4], &[v])?;
        v.set_used();
        Ok(Variable::new(format!("({}).xyz", v.value()), DataType::Vec3))
    }
}

pub struct Vec4;

impl Vec4 {
    pub fn new(x: &Variable, y: &Variable, z: &Variable, w: &Variable) -> Result<Variable> {
        construct("Vec4::new", DataType::Vec4, &[S, S, S, S], &[x, y, z, w])
    }

    pub fn from_vec3_scalar(xyz: &Variable, w: &Variable) -> Result<Variable> {
        construct("Vec4::from_vec3_scalar", DataType::Vec4, &[V3, S], &[xyz, w])
    }

    pub fn from_scalar_vec3(x: &Variable, yzw: &Variable) -> Result<Variable> {
        construct("Vec4::from_scalar_vec3", DataType::Vec4, &[S, V3], &[x, yzw])
    }

    pub fn from_vec2s(xy: &Variable, zw: &Variable) -> Result<Variable> {
        construct("Vec4::from_vec2s", DataType::Vec4, &[V2, V2], &[xy, zw])
    }

    pub fn from_vec2_scalars(xy: &Variable, z: &Variable, w: &Variable) -> Result<Variable> {
        construct("Vec4::from_vec2_scalars", DataType::Vec4, &[V2, S, S], &[xy, z, w])
    }

    pub fn from_scalar_vec2_scalar(x: &Variable, yz: &Variable, w: &Variable) -> Result<Variable> {
        construct(
            "Vec4::from_scalar_vec2_scalar",
            DataType::Vec4,
            &[S, V2, S],
            &[x, yz, w],
        )
    }

    pub fn from_scalars_vec2(x: &Variable, y: &Variable, zw: &Variable) -> Result<Variable> {
        construct("Vec4::from_scalars_vec2", DataType::Vec4, &[S, S, V2], &[x, y, zw])
    }

    pub fn splat(s: &Variable) -> Result<Variable> {
        splat("Vec4::splat", DataType::Vec4, s)
    }

    pub fn from_vec4(v: &Variable) -> Result<Variable> {
        construct("Vec4::from_vec4", DataType::Vec4, &[V4], &[v])
    }
}

pub struct Mat4;

impl Mat4 {
    /// Sixteen scalars in column order.
    pub fn from_scalars(v: [&Variable; 16]) -> Result<Variable> {
        construct("Mat4::from_scalars", DataType::Mat4, &[S; 16], &v)
    }

    pub fn from_columns(c0: &Variable, c1: &Variable, c2: &Variable, c3: &Variable) -> Result<Variable> {
        construct(
            "Mat4::from_columns",
            DataType::Mat4,
            &[V4, V4, V4, V4],
            &[c0, c1, c2, c3],
        )
    }

    pub fn from_mat4(m: &Variable) -> Result<Variable> {
        construct("Mat4::from_mat4", DataType::Mat4, &[M4], &[m])
    }

    pub fn identity() -> Variable {
        let values: SmallVec<[&str; 16]> = (0..16)
            .map(|i| if i % 5 == 0 { "1.0" } else { "0.0" })
            .collect();

        Variable::new(format!("mat4({})", values.join(", ")), DataType::Mat4)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn patterns_sum_to_target() {
        let patterns: &[(&[Slot], DataType)] = &[
            (&[S, S], DataType::Vec2),
            (&[V2, S], DataType::Vec3),
            (&[S, V2], DataType::Vec3),
            (&[V3, S], DataType::Vec4),
            (&[S, V3], DataType::Vec4),
            (&[V2, V2], DataType::Vec4),
            (&[V2, S, S], DataType::Vec4),
            (&[S, V2, S], DataType::Vec4),
            (&[S, S, V2], DataType::Vec4),
            (&[V4, V4, V4, V4], DataType::Mat4),
            (&[S; 16], DataType::Mat4),
        ];

        for (pattern, target) in patterns {
            let sum: usize = pattern.iter().map(|v| v.components()).sum();
            assert_eq!(sum, target.components());
        }
    }

    const TYPES: [DataType; 7] = [
        DataType::Int,
        DataType::Float,
        DataType::Vec2,
        DataType::Vec3,
        DataType::Vec4,
        DataType::Mat4,
        DataType::Sampler2D,
    ];

    type Build = fn(&[&Variable]) -> Result<Variable>;

    type Constructor = (&'static str, &'static [Slot], DataType, Build);

    fn constructors() -> Vec<Constructor> {
        let table: [Constructor; 23] = [
            ("Float::from_scalar", &[S], DataType::Float, |v| Float::from_scalar(v[0])),
            ("Int::from_scalar", &[S], DataType::Int, |v| Int::from_scalar(v[0])),
            ("Vec2::new", &[S, S], DataType::Vec2, |v| Vec2::new(v[0], v[1])),
            ("Vec2::splat", &[S], DataType::Vec2, |v| Vec2::splat(v[0])),
            ("Vec2::from_vec2", &[V2], DataType::Vec2, |v| Vec2::from_vec2(v[0])),
            ("Vec3::new", &[S, S, S], DataType::Vec3, |v| Vec3::new(v[0], v[1], v[2])),
            ("Vec3::from_vec2_scalar", &[V2, S], DataType::Vec3, |v| {
                Vec3::from_vec2_scalar(v[0], v[1])
            }),
            ("Vec3::from_scalar_vec2", &[S, V2], DataType::Vec3, |v| {
                Vec3::from_scalar_vec2(v[0], v[1])
            }),
            ("Vec3::splat", &[S], DataType::Vec3, |v| Vec3::splat(v[0])),
            ("Vec3::from_vec3", &[V3], DataType::Vec3, |v| Vec3::from_vec3(v[0])),
            ("Vec3::from_vec4", &[V4], DataType::Vec3, |v| Vec3::from_vec4(v[0])),
            ("Vec4::new", &[S, S, S, S], DataType::Vec4, |v| {
                Vec4::new(v[0], v[1], v[2], v[3])
            }),
            ("Vec4::from_vec3_scalar", &[V3, S], DataType::Vec4, |v| {
                Vec4::from_vec3_scalar(v[0], v[1])
            }),
            ("Vec4::from_scalar_vec3", &[S, V3], DataType::Vec4, |v| {
                Vec4::from_scalar_vec3(v[0], v[1])
            }),
            ("Vec4::from_vec2s", &[V2, V2], DataType::Vec4, |v| Vec4::from_vec2s(v[0], v[1])),
            ("Vec4::from_vec2_scalars", &[V2, S, S], DataType::Vec4, |v| {
                Vec4::from_vec2_scalars(v[0], v[1], v[2])
            }),
            ("Vec4::from_scalar_vec2_scalar", &[S, V2, S], DataType::Vec4, |v| {
                Vec4::from_scalar_vec2_scalar(v[0], v[1], v[2])
            }),
            ("Vec4::from_scalars_vec2", &[S, S, V2], DataType::Vec4, |v| {
                Vec4::from_scalars_vec2(v[0], v[1], v[2])
            }),
            ("Vec4::splat", &[S], DataType::Vec4, |v| Vec4::splat(v[0])),
            ("Vec4::from_vec4", &[V4], DataType::Vec4, |v| Vec4::from_vec4(v[0])),
            ("Mat4::from_columns", &[V4, V4, V4, V4], DataType::Mat4, |v| {
                Mat4::from_columns(v[0], v[1], v[2], v[3])
            }),
            ("Mat4::from_mat4", &[M4], DataType::Mat4, |v| Mat4::from_mat4(v[0])),
            ("Mat4::from_scalars", &[S; 16], DataType::Mat4, |v| {
                let mut m = [v[0]; 16];
                m.copy_from_slice(v);
                Mat4::from_scalars(m)
            }),
        ];

        table.to_vec()
    }

    fn fits(slot: Slot, t: DataType) -> bool {
        match (slot, t) {
            (Slot::Scalar, DataType::Int) | (Slot::Scalar, DataType::Float) => true,
            (Slot::Scalar, _) => false,
            (Slot::Exact(v), t) => v == t,
        }
    }

    fn assert_construct(
        name: &'static str,
        pattern: &[Slot],
        target: DataType,
        build: Build,
        types: &[DataType],
    ) {
        let operands: Vec<Variable> = types
            .iter()
            .enumerate()
            .map(|(i, &t)| Variable::new(format!("x{}", i), t))
            .collect();
        let refs: Vec<&Variable> = operands.iter().collect();
        let legal = pattern.iter().zip(types).all(|(&slot, &t)| fits(slot, t));

        match build(&refs) {
            Ok(v) => {
                assert!(legal, "{} accepted {:?}", name, types);
                assert_eq!(v.data_type(), target);
                assert!(!v.is_used());
                assert!(operands.iter().all(|v| v.is_used()), "{} {:?}", name, types);
            }
            Err(Error::TypeMismatch { constructor, .. }) => {
                assert!(!legal, "{} rejected {:?}", name, types);
                assert_eq!(constructor, name);
                assert!(operands.iter().all(|v| !v.is_used()), "{} {:?}", name, types);
            }
            Err(err) => panic!("{}: unexpected {:?}", name, err),
        }
    }

    #[test]
    fn every_operand_tuple() {
        for (name, pattern, target, build) in constructors() {
            let n = pattern.len();
            if n > 4 {
                continue;
            }

            for mut code in 0..TYPES.len().pow(n as u32) {
                let mut types = Vec::with_capacity(n);
                for _ in 0..n {
                    types.push(TYPES[code % TYPES.len()]);
                    code /= TYPES.len();
                }

                assert_construct(name, pattern, target, build, &types);
            }
        }
    }

    #[test]
    fn random_scalar_matrices() {
        let (name, pattern, target, build) = constructors()
            .into_iter()
            .find(|v| v.0 == "Mat4::from_scalars")
            .unwrap();

        for _ in 0..500 {
            // Mostly scalars so that legal tuples come up regularly.
            let types: Vec<DataType> = (0..16)
                .map(|_| match rand::random::<u8>() % 40 {
                    0 => TYPES[2 + rand::random::<usize>() % 5],
                    v if v % 2 == 0 => DataType::Int,
                    _ => DataType::Float,
                })
                .collect();

            assert_construct(name, pattern, target, build, &types);
        }

        assert_construct(name, pattern, target, build, &[DataType::Float; 16]);
        assert_construct(name, pattern, target, build, &[DataType::Vec4; 16]);
    }

    #[test]
    fn literal_formatting() {
        assert_eq!(Float::lit(1.0).unwrap().value(), "1.0");
        assert_eq!(Float::lit(-0.25).unwrap().value(), "-0.25");
        assert_eq!(Int::lit(3).value(), "3");
        assert!(Float::lit(std::f32::NAN).is_err());
        assert!(Float::lit(std::f32::INFINITY).is_err());
    }

    #[test]
    fn identity() {
        let m = Mat4::identity();
        assert_eq!(m.data_type(), DataType::Mat4);
        assert!(m.value().starts_with("mat4(1.0, 0.0, 0.0, 0.0, 0.0, 1.0"));
    }
}
