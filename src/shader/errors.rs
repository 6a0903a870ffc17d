use super::dialect::{Language, Version};
use super::program::Attribute;
use super::variable::DataType;

#[derive(Debug, Clone, PartialEq, Fail)]
pub enum Error {
    #[fail(display = "{} expects ({}), but got ({}).", constructor, expected, found)]
    TypeMismatch {
        constructor: &'static str,
        expected: String,
        found: String,
    },
    #[fail(display = "Literal {} is not a finite number.", _0)]
    NonFiniteLiteral(f32),
    #[fail(display = "Swizzle '{}' is invalid for {}.", _0, _1)]
    InvalidSwizzle(String, DataType),
    #[fail(display = "{} {} is not supported by the generator.", _0, _1)]
    UnsupportedDialect(Language, Version),
    #[fail(display = "Attribute {} is not declared.", _0)]
    UndeclaredAttribute(Attribute),
    #[fail(display = "Varying '{}' is not declared.", _0)]
    UndeclaredVarying(String),
    #[fail(display = "Uniform '{}' is not declared.", _0)]
    UndeclaredUniform(String),
    #[fail(display = "Slot '{}' is declared more than once.", _0)]
    DuplicatedSlot(String),
    #[fail(display = "'{}' is not a valid shader identifier.", _0)]
    InvalidIdentifier(String),
    #[fail(display = "Slot '{}' can not be declared as {}.", _0, _1)]
    InvalidSlotType(String, DataType),
    #[fail(display = "Varying '{}' is never written by the vertex stage.", _0)]
    VaryingNotWritten(String),
    #[fail(display = "Varying '{}' is written more than once.", _0)]
    VaryingWrittenTwice(String),
    #[fail(display = "Output '{}' expects {}, but got {}.", slot, expected, found)]
    OutputTypeMismatch {
        slot: String,
        expected: DataType,
        found: DataType,
    },
    #[fail(display = "Uniform '{}' expects {}, but got {}.", name, expected, found)]
    UniformTypeMismatch {
        name: String,
        expected: DataType,
        found: DataType,
    },
    #[fail(display = "Uniform '{}' is not a member of the uniform block.", _0)]
    UndefinedBlockMember(String),
    #[fail(display = "Uniform block needs {} bytes, but the buffer has {}.", _0, _1)]
    BufferTooSmall(usize, usize),
}

pub type Result<T> = ::std::result::Result<T, Error>;
