//! Typed shader values.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// The type tag of a shader value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
    Sampler2D,
}

impl DataType {
    /// Number of scalar components.
    pub fn components(self) -> usize {
        match self {
            DataType::Int | DataType::Float => 1,
            DataType::Vec2 => 2,
            DataType::Vec3 => 3,
            DataType::Vec4 => 4,
            DataType::Mat4 => 16,
            DataType::Sampler2D => 0,
        }
    }

    #[inline]
    pub fn is_scalar(self) -> bool {
        self == DataType::Int || self == DataType::Float
    }

    #[inline]
    pub fn is_vector(self) -> bool {
        match self {
            DataType::Vec2 | DataType::Vec3 | DataType::Vec4 => true,
            _ => false,
        }
    }

    /// Scalars, vectors and matrices. Everything except samplers.
    #[inline]
    pub fn is_numeric(self) -> bool {
        self != DataType::Sampler2D
    }

    /// The float vector type with `n` components, `Float` for one.
    pub fn float_vector(n: usize) -> Option<DataType> {
        match n {
            1 => Some(DataType::Float),
            2 => Some(DataType::Vec2),
            3 => Some(DataType::Vec3),
            4 => Some(DataType::Vec4),
            _ => None,
        }
    }

    /// The generic spelling used in expressions. Dialects that spell types
    /// differently alias these names in their preamble.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Vec2 => "vec2",
            DataType::Vec3 => "vec3",
            DataType::Vec4 => "vec4",
            DataType::Mat4 => "mat4",
            DataType::Sampler2D => "sampler2D",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct VariableData {
    value: String,
    data_type: DataType,
    used: Cell<bool>,
}

/// A typed value in the shader IR together with the source text producing it.
///
/// Cloning a `Variable` yields another handle to the same value, sharing the
/// `used` flag. Its data type never changes after construction, and `used`
/// only ever goes from false to true.
#[derive(Clone)]
pub struct Variable(Rc<VariableData>);

impl Variable {
    pub(crate) fn new<T: Into<String>>(value: T, data_type: DataType) -> Self {
        Variable(Rc::new(VariableData {
            value: value.into(),
            data_type,
            used: Cell::new(false),
        }))
    }

    /// The expression text producing this value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.0.value
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.0.data_type
    }

    /// Returns true once the value has been consumed by another expression.
    #[inline]
    pub fn is_used(&self) -> bool {
        self.0.used.get()
    }

    /// Marks the value as consumed. Idempotent.
    #[inline]
    pub fn set_used(&self) {
        self.0.used.set(true);
    }

    /// Returns true if both handles refer to the same value.
    #[inline]
    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Variable")
            .field("value", &self.0.value)
            .field("data_type", &self.0.data_type)
            .field("used", &self.0.used.get())
            .finish()
    }
}
