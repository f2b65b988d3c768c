use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NodeError;

/// A three-component vector, the payload of [`Value::Vector3`].
///
/// Components stay `f32` because blueprint values describe per-frame spatial
/// data (positions, directions, velocities), not accumulated quantities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Stable host-managed pointer identifier.
///
/// Pointer values are opaque handles to caller-managed data. The handle is an
/// integer rather than a raw pointer so that values stay `Send`, serializable,
/// and can round-trip between host and engine without the engine ever owning
/// or freeing host data. The host keeps the table that maps handles back to
/// its own objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointerId(u64);

impl PointerId {
    /// Creates a pointer ID from a raw integer.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The discriminant of a [`Value`], without its payload.
///
/// Used in type-mismatch diagnostics and anywhere a node behavior needs to
/// reason about a value's kind without touching the payload.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum ValueKind {
    None,
    Int,
    Float,
    Bool,
    Vector3,
    Pointer,
}

/// A single datum travelling on the execution stack or stored in a program's
/// constant pool.
///
/// The payload is only reachable through checked accessors (`as_*` /
/// `expect_*`), so reading a representation other than the active one is
/// impossible by construction. Every variant is `Copy`; values carry no
/// ownership and no lifetime beyond their containing slot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    None,
    Int(i64),
    Float(f64),
    Bool(bool),
    Vector3(Vec3),
    /// Opaque non-owning handle to caller-managed data.
    Pointer(PointerId),
}

impl Value {
    /// Returns the discriminant of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::None => ValueKind::None,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::Vector3(_) => ValueKind::Vector3,
            Self::Pointer(_) => ValueKind::Pointer,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_vector3(&self) -> Option<Vec3> {
        match self {
            Self::Vector3(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_pointer(&self) -> Option<PointerId> {
        match self {
            Self::Pointer(p) => Some(*p),
            _ => None,
        }
    }

    /// Reads the `Int` payload, or reports a type mismatch.
    ///
    /// The `expect_*` accessors are the form node behaviors use: a wrong kind
    /// becomes a [`NodeError::TypeMismatch`] that the machine surfaces as an
    /// execution fault naming the offending opcode.
    pub fn expect_int(&self) -> Result<i64, NodeError> {
        self.as_int().ok_or(self.mismatch(ValueKind::Int))
    }

    /// Reads the `Float` payload, or reports a type mismatch.
    pub fn expect_float(&self) -> Result<f64, NodeError> {
        self.as_float().ok_or(self.mismatch(ValueKind::Float))
    }

    /// Reads the `Bool` payload, or reports a type mismatch.
    pub fn expect_bool(&self) -> Result<bool, NodeError> {
        self.as_bool().ok_or(self.mismatch(ValueKind::Bool))
    }

    /// Reads the `Vector3` payload, or reports a type mismatch.
    pub fn expect_vector3(&self) -> Result<Vec3, NodeError> {
        self.as_vector3().ok_or(self.mismatch(ValueKind::Vector3))
    }

    /// Reads the `Pointer` payload, or reports a type mismatch.
    pub fn expect_pointer(&self) -> Result<PointerId, NodeError> {
        self.as_pointer().ok_or(self.mismatch(ValueKind::Pointer))
    }

    const fn mismatch(&self, expected: ValueKind) -> NodeError {
        NodeError::TypeMismatch {
            expected,
            actual: self.kind(),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Self::Vector3(v)
    }
}

impl From<PointerId> for Value {
    fn from(v: PointerId) -> Self {
        Self::Pointer(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => {
                // keep a decimal point so floats stay distinguishable from ints
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Self::Bool(b) => write!(f, "{b}"),
            Self::Vector3(v) => write!(f, "{v}"),
            Self::Pointer(p) => write!(f, "ptr#{}", p.raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_active_variant() {
        assert_eq!(Value::None.kind(), ValueKind::None);
        assert_eq!(Value::Int(3).kind(), ValueKind::Int);
        assert_eq!(Value::Float(1.5).kind(), ValueKind::Float);
        assert_eq!(Value::Bool(true).kind(), ValueKind::Bool);
        assert_eq!(Value::Vector3(Vec3::new(1.0, 2.0, 3.0)).kind(), ValueKind::Vector3);
        assert_eq!(Value::Pointer(PointerId::new(7)).kind(), ValueKind::Pointer);
    }

    #[test]
    fn checked_accessors_refuse_other_kinds() {
        let v = Value::Int(42);
        assert_eq!(v.as_int(), Some(42));
        assert_eq!(v.as_float(), None);
        assert_eq!(v.as_bool(), None);

        let err = v.expect_float().unwrap_err();
        assert_eq!(
            err,
            NodeError::TypeMismatch {
                expected: ValueKind::Float,
                actual: ValueKind::Int,
            }
        );
    }

    #[test]
    fn display_keeps_float_marker() {
        assert_eq!(Value::Float(20.0).to_string(), "20.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Int(20).to_string(), "20");
        assert_eq!(Value::Vector3(Vec3::new(1.0, 0.0, 0.0)).to_string(), "(1, 0, 0)");
    }
}
