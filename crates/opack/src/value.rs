// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value model consumed by plan traversal.
//!
//! Values are cheap to clone: composites are `Arc`-backed and objects carry
//! identity via their allocation, which is what back-reference tables key on.

use crate::types::TypeInfo;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Leaf scalar codec discriminators.
///
/// One per primitive codec the byte layer knows how to frame. Property and
/// value items carry these so the codec can dispatch without re-inspecting
/// the runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CodecKind {
    Bool = 0x01,
    U8 = 0x02,
    U16 = 0x03,
    U32 = 0x04,
    U64 = 0x05,
    I8 = 0x06,
    I16 = 0x07,
    I32 = 0x08,
    I64 = 0x09,
    F32 = 0x0A,
    F64 = 0x0B,
    Char = 0x0C,
    Str = 0x0D,
    Bytes = 0x0E,
}

impl CodecKind {
    /// Zero value for this codec (the non-nullable field default).
    pub fn zero(self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::U8 => Value::U8(0),
            Self::U16 => Value::U16(0),
            Self::U32 => Value::U32(0),
            Self::U64 => Value::U64(0),
            Self::I8 => Value::I8(0),
            Self::I16 => Value::I16(0),
            Self::I32 => Value::I32(0),
            Self::I64 => Value::I64(0),
            Self::F32 => Value::F32(0.0),
            Self::F64 => Value::F64(0.0),
            Self::Char => Value::Char('\0'),
            Self::Str => Value::Str(Arc::from("")),
            Self::Bytes => Value::Bytes(Arc::from(&[][..])),
        }
    }
}

/// Errors for field access through a precompiled accessor.
#[derive(Debug)]
pub enum AccessError {
    NotAnObject { got: &'static str },
    SlotOutOfBounds { slot: usize, len: usize },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject { got } => write!(f, "Field access requires object value, got {}", got),
            Self::SlotOutOfBounds { slot, len } => {
                write!(f, "Field slot out of bounds: {} >= {}", slot, len)
            }
        }
    }
}

impl std::error::Error for AccessError {}

/// A dynamic value traversed by a [`Scope`](crate::plan::Scope).
#[derive(Debug, Clone)]
pub enum Value {
    // Primitives
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(Arc<str>),
    Bytes(Arc<[u8]>),

    // Composites
    List(Arc<Vec<Value>>),
    Map(Arc<Vec<(Value, Value)>>),
    Object(Arc<ObjectValue>),

    // Special
    Null,
}

impl Value {
    /// Precomputed default for a property slot: null when nullable,
    /// otherwise the codec's zero value.
    pub fn default_for(codec: CodecKind, nullable: bool) -> Value {
        if nullable {
            Value::Null
        } else {
            codec.zero()
        }
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Object identity check (`Arc` pointer identity); false for non-objects.
    pub fn is_same_object(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as map entries.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as object.
    pub fn as_object(&self) -> Option<&Arc<ObjectValue>> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Short label for error messages.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
            Self::Null => "null",
        }
    }
}

/// Scalars compare structurally; objects compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

/// Identity-bearing object with slotted fields.
///
/// Field order matches the declaration order the plan compiler enumerated,
/// so a [`FieldAccessor`](crate::plan::FieldAccessor) slot index resolves
/// without a name lookup. Interior mutability lets graphs close cycles
/// after construction.
#[derive(Debug)]
pub struct ObjectValue {
    ty: Arc<TypeInfo>,
    fields: RwLock<Vec<Value>>,
}

impl ObjectValue {
    /// Create an object with its field slots in declaration order.
    pub fn new(ty: Arc<TypeInfo>, fields: Vec<Value>) -> Self {
        Self {
            ty,
            fields: RwLock::new(fields),
        }
    }

    /// Get the runtime type.
    pub fn ty(&self) -> &Arc<TypeInfo> {
        &self.ty
    }

    /// Number of field slots.
    pub fn field_count(&self) -> usize {
        self.fields.read().len()
    }

    /// Get a field slot (cloned; values are cheap to clone).
    pub fn field(&self, slot: usize) -> Option<Value> {
        self.fields.read().get(slot).cloned()
    }

    /// Overwrite a field slot. Returns false if the slot does not exist.
    pub fn set_field(&self, slot: usize, value: Value) -> bool {
        let mut fields = self.fields.write();
        match fields.get_mut(slot) {
            Some(entry) => {
                *entry = value;
                true
            }
            None => false,
        }
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Self::I8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Arc::from(v.as_str()))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(Arc::new(v.into_iter().map(Into::into).collect()))
    }
}

impl From<Arc<ObjectValue>> for Value {
    fn from(v: Arc<ObjectValue>) -> Self {
        Self::Object(v)
    }
}
