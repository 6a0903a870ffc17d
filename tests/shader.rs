extern crate lumen;

use lumen::shader::prelude::*;

fn float(v: f32) -> Variable {
    Float::lit(v).unwrap()
}

#[test]
fn vec4_from_vec3_and_scalar() {
    let xyz = Vec3::splat(&float(0.5)).unwrap();
    let w = float(1.0);

    let v = Vec4::from_vec3_scalar(&xyz, &w).unwrap();
    assert_eq!(v.data_type(), DataType::Vec4);
    assert_eq!(v.value(), format!("vec4({}, 1.0)", xyz.value()));
    assert!(xyz.is_used());
    assert!(w.is_used());
    assert!(!v.is_used());
}

#[test]
fn vec4_from_two_vec3_fails() {
    let a = Vec3::splat(&float(0.5)).unwrap();
    let b = Vec3::splat(&float(0.5)).unwrap();

    match Vec4::from_vec2s(&a, &b) {
        Err(ShaderError::TypeMismatch {
            constructor,
            expected,
            found,
        }) => {
            assert_eq!(constructor, "Vec4::from_vec2s");
            assert_eq!(expected, "vec2, vec2");
            assert_eq!(found, "vec3, vec3");
        }
        other => panic!("unexpected {:?}", other),
    }

    assert!(!a.is_used());
    assert!(!b.is_used());
}

#[test]
fn scalars_accept_ints_and_floats() {
    let v = Vec2::new(&Int::lit(1), &float(2.0)).unwrap();
    assert_eq!(v.value(), "vec2(1, 2.0)");

    let m = Vec2::new(&v, &float(2.0));
    assert!(m.is_err());

    let i = Int::from_scalar(&float(2.5)).unwrap();
    assert_eq!(i.data_type(), DataType::Int);
    assert_eq!(i.value(), "int(2.5)");
}

#[test]
fn mat4_constructors() {
    let c = Vec4::splat(&float(0.0)).unwrap();
    let m = Mat4::from_columns(&c, &c, &c, &c).unwrap();
    assert_eq!(m.data_type(), DataType::Mat4);

    let s = float(1.0);
    assert!(Mat4::from_scalars([&s; 16]).is_ok());
    assert!(Mat4::from_columns(&c, &c, &c, &s).is_err());
    assert!(Mat4::from_mat4(&Mat4::identity()).is_ok());
}

#[test]
fn arithmetic() {
    let a = Vec3::splat(&float(1.0)).unwrap();
    let s = float(2.0);

    let v = ops::mul(&a, &s).unwrap();
    assert_eq!(v.data_type(), DataType::Vec3);
    assert!(ops::add(&a, &Vec2::splat(&s).unwrap()).is_err());
    assert!(ops::sub(&Int::lit(1), &s).is_err());

    let m = Mat4::identity();
    let p = Vec4::splat(&s).unwrap();
    let mv = ops::mul(&m, &p).unwrap();
    assert_eq!(mv.data_type(), DataType::Vec4);
    assert!(mv.value().starts_with("MUL("));

    let n = ops::neg(&a).unwrap();
    assert_eq!(n.value(), format!("(-{})", a.value()));
}

#[test]
fn intrinsics() {
    let a = Vec3::splat(&float(1.0)).unwrap();
    let b = Vec3::splat(&float(0.0)).unwrap();

    assert_eq!(ops::dot(&a, &b).unwrap().data_type(), DataType::Float);
    assert_eq!(ops::length(&a).unwrap().data_type(), DataType::Float);
    assert_eq!(ops::normalize(&a).unwrap().data_type(), DataType::Vec3);
    assert_eq!(
        ops::clamp(&a, &float(0.0), &float(1.0)).unwrap().data_type(),
        DataType::Vec3
    );
    assert_eq!(ops::mix(&a, &b, &float(0.5)).unwrap().data_type(), DataType::Vec3);
    assert_eq!(ops::max(&a, &b).unwrap().data_type(), DataType::Vec3);

    assert!(ops::dot(&a, &float(1.0)).is_err());
    assert!(ops::normalize(&float(1.0)).is_err());
    assert!(ops::min(&a, &Vec2::splat(&float(0.0)).unwrap()).is_err());
}

#[test]
fn swizzle() {
    let color = Vec4::splat(&float(1.0)).unwrap();

    let rgb = ops::swizzle(&color, "rgb").unwrap();
    assert_eq!(rgb.data_type(), DataType::Vec3);
    assert!(color.is_used());

    match ops::swizzle(&rgb, "a") {
        Err(ShaderError::InvalidSwizzle(s, t)) => {
            assert_eq!(s, "a");
            assert_eq!(t, DataType::Vec3);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn non_finite_literals() {
    assert_eq!(
        Float::lit(std::f32::NAN).err().map(|e| e.to_string()),
        Some("Literal NaN is not a finite number.".to_owned())
    );
}
