// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Plan instructions.
//!
//! One [`PlanItem`] per compiled instruction. Every variant except
//! [`RuntimeValue`] is built once by the plan compiler and immutable
//! thereafter; `RuntimeValue` slots are pooled and reinitialized per
//! occurrence because a polymorphic slot's concrete type is only known once
//! a value is observed.

use crate::types::{TypeInfo, TypeNameTuple};
use crate::value::{AccessError, CodecKind, Value};
use std::sync::Arc;

/// One-byte instruction discriminator for the external byte codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PlanItemKind {
    WriteBytes = 0x01,
    TypeStart = 0x02,
    TypeEnd = 0x03,
    ListStart = 0x04,
    ListEnd = 0x05,
    DictionaryStart = 0x06,
    DictionaryEnd = 0x07,
    PropertyValue = 0x08,
    PropertyReference = 0x09,
    Value = 0x0A,
    RuntimeValue = 0x0B,
}

/// One compiled traversal instruction.
#[derive(Debug, Clone)]
pub enum PlanItem {
    /// Literal byte sequence emitted as-is.
    WriteBytes(WriteBytes),
    /// Object header open. Every `TypeStart` has exactly one matching
    /// `TypeEnd` at the same nesting depth.
    TypeStart(TypeStart),
    /// Object header close.
    TypeEnd,
    /// Collection open.
    ListStart(ListStart),
    /// Collection close.
    ListEnd,
    /// Dictionary open.
    DictionaryStart(DictionaryStart),
    /// Dictionary close.
    DictionaryEnd,
    /// Property encoded inline with a known leaf codec.
    PropertyValue(PropertyValue),
    /// Property deferred to the external identity table; this is how
    /// cyclic and shared graphs terminate.
    PropertyReference(PropertyReference),
    /// Leaf scalar with a known primitive codec.
    Value(ValueItem),
    /// Pooled slot for a polymorphic value observed at serialize time.
    RuntimeValue(RuntimeValue),
}

impl PlanItem {
    /// Discriminator byte for this instruction.
    pub fn kind(&self) -> PlanItemKind {
        match self {
            Self::WriteBytes(_) => PlanItemKind::WriteBytes,
            Self::TypeStart(_) => PlanItemKind::TypeStart,
            Self::TypeEnd => PlanItemKind::TypeEnd,
            Self::ListStart(_) => PlanItemKind::ListStart,
            Self::ListEnd => PlanItemKind::ListEnd,
            Self::DictionaryStart(_) => PlanItemKind::DictionaryStart,
            Self::DictionaryEnd => PlanItemKind::DictionaryEnd,
            Self::PropertyValue(_) => PlanItemKind::PropertyValue,
            Self::PropertyReference(_) => PlanItemKind::PropertyReference,
            Self::Value(_) => PlanItemKind::Value,
            Self::RuntimeValue(_) => PlanItemKind::RuntimeValue,
        }
    }
}

/// Literal bytes (preamble markers, fixed separators).
#[derive(Debug, Clone)]
pub struct WriteBytes {
    bytes: Arc<[u8]>,
}

impl WriteBytes {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Object header open: the static type plus its resolved name parts, so the
/// codec writes headers without touching the resolver on the hot path.
#[derive(Debug, Clone)]
pub struct TypeStart {
    ty: Arc<TypeInfo>,
    is_array: bool,
    is_list: bool,
    is_dictionary: bool,
    assembly: Option<Arc<str>>,
    namespace: Arc<str>,
    type_name: Arc<str>,
    generic_args: Vec<Arc<TypeInfo>>,
}

impl TypeStart {
    /// Build a header item from a type and its resolved name tuple.
    pub fn new(
        ty: Arc<TypeInfo>,
        is_array: bool,
        is_list: bool,
        is_dictionary: bool,
        tuple: &TypeNameTuple,
    ) -> Self {
        let generic_args = ty.generic_args().to_vec();
        Self {
            ty,
            is_array,
            is_list,
            is_dictionary,
            assembly: tuple.assembly.clone(),
            namespace: tuple.namespace.clone(),
            type_name: tuple.name.clone(),
            generic_args,
        }
    }

    pub fn ty(&self) -> &Arc<TypeInfo> {
        &self.ty
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn is_list(&self) -> bool {
        self.is_list
    }

    pub fn is_dictionary(&self) -> bool {
        self.is_dictionary
    }

    pub fn assembly(&self) -> Option<&str> {
        self.assembly.as_deref()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn generic_args(&self) -> &[Arc<TypeInfo>] {
        &self.generic_args
    }
}

/// Collection open: static collection type and its element type.
#[derive(Debug, Clone)]
pub struct ListStart {
    list_type: Arc<TypeInfo>,
    element_type: Arc<TypeInfo>,
}

impl ListStart {
    pub fn new(list_type: Arc<TypeInfo>, element_type: Arc<TypeInfo>) -> Self {
        Self {
            list_type,
            element_type,
        }
    }

    pub fn list_type(&self) -> &Arc<TypeInfo> {
        &self.list_type
    }

    pub fn element_type(&self) -> &Arc<TypeInfo> {
        &self.element_type
    }
}

/// Dictionary open: key/value types with their leaf codecs.
#[derive(Debug, Clone)]
pub struct DictionaryStart {
    dict_type: Arc<TypeInfo>,
    key_type: Arc<TypeInfo>,
    key_codec: CodecKind,
    key_nullable: bool,
    value_type: Arc<TypeInfo>,
    value_codec: CodecKind,
    value_nullable: bool,
}

impl DictionaryStart {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dict_type: Arc<TypeInfo>,
        key_type: Arc<TypeInfo>,
        key_codec: CodecKind,
        key_nullable: bool,
        value_type: Arc<TypeInfo>,
        value_codec: CodecKind,
        value_nullable: bool,
    ) -> Self {
        Self {
            dict_type,
            key_type,
            key_codec,
            key_nullable,
            value_type,
            value_codec,
            value_nullable,
        }
    }

    pub fn dict_type(&self) -> &Arc<TypeInfo> {
        &self.dict_type
    }

    pub fn key_type(&self) -> &Arc<TypeInfo> {
        &self.key_type
    }

    pub fn key_codec(&self) -> CodecKind {
        self.key_codec
    }

    pub fn key_nullable(&self) -> bool {
        self.key_nullable
    }

    pub fn value_type(&self) -> &Arc<TypeInfo> {
        &self.value_type
    }

    pub fn value_codec(&self) -> CodecKind {
        self.value_codec
    }

    pub fn value_nullable(&self) -> bool {
        self.value_nullable
    }
}

/// Precompiled field accessor: a slot index into an
/// [`ObjectValue`](crate::value::ObjectValue)'s declaration-ordered fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAccessor {
    slot: usize,
}

impl FieldAccessor {
    pub fn new(slot: usize) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Read the field from a bound object value.
    pub fn get(&self, value: &Value) -> Result<Value, AccessError> {
        match value {
            Value::Object(obj) => obj.field(self.slot).ok_or(AccessError::SlotOutOfBounds {
                slot: self.slot,
                len: obj.field_count(),
            }),
            other => Err(AccessError::NotAnObject {
                got: other.type_label(),
            }),
        }
    }
}

/// Property encoded inline. The default is precomputed at compile time so
/// the hot path can skip emission for default-valued fields without
/// recomputing it per call.
#[derive(Debug, Clone)]
pub struct PropertyValue {
    name: Arc<str>,
    accessor: FieldAccessor,
    codec: CodecKind,
    default: Value,
    nullable: bool,
}

impl PropertyValue {
    pub fn new(name: impl Into<Arc<str>>, slot: usize, codec: CodecKind, nullable: bool) -> Self {
        Self {
            name: name.into(),
            accessor: FieldAccessor::new(slot),
            codec,
            default: Value::default_for(codec, nullable),
            nullable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accessor(&self) -> FieldAccessor {
        self.accessor
    }

    pub fn codec(&self) -> CodecKind {
        self.codec
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Check a read value against the precomputed default.
    pub fn is_default(&self, value: &Value) -> bool {
        *value == self.default
    }
}

/// Property resolved through the external identity table instead of being
/// re-encoded inline. Carries no codec kind by contract.
#[derive(Debug, Clone)]
pub struct PropertyReference {
    name: Arc<str>,
    accessor: FieldAccessor,
    default: Value,
}

impl PropertyReference {
    pub fn new(name: impl Into<Arc<str>>, slot: usize) -> Self {
        Self {
            name: name.into(),
            accessor: FieldAccessor::new(slot),
            // Reference-typed slots default to null.
            default: Value::Null,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accessor(&self) -> FieldAccessor {
        self.accessor
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    /// Check a read value against the precomputed default.
    pub fn is_default(&self, value: &Value) -> bool {
        *value == self.default
    }
}

/// Leaf scalar with a known primitive codec.
#[derive(Debug, Clone)]
pub struct ValueItem {
    ty: Arc<TypeInfo>,
    codec: CodecKind,
}

impl ValueItem {
    pub fn new(ty: Arc<TypeInfo>, codec: CodecKind) -> Self {
        Self { ty, codec }
    }

    pub fn ty(&self) -> &Arc<TypeInfo> {
        &self.ty
    }

    pub fn codec(&self) -> CodecKind {
        self.codec
    }
}

/// Mutable, poolable slot for a polymorphic value whose concrete type is
/// known only at serialize time.
#[derive(Debug, Clone)]
pub struct RuntimeValue {
    ty: Arc<TypeInfo>,
    codec: CodecKind,
    value: Value,
}

impl RuntimeValue {
    pub fn new(ty: Arc<TypeInfo>, codec: CodecKind, value: Value) -> Self {
        Self { ty, codec, value }
    }

    /// Reinitialize a pooled slot for a newly observed value.
    pub fn init(&mut self, ty: Arc<TypeInfo>, codec: CodecKind, value: Value) {
        self.ty = ty;
        self.codec = codec;
        self.value = value;
    }

    pub fn ty(&self) -> &Arc<TypeInfo> {
        &self.ty
    }

    pub fn codec(&self) -> CodecKind {
        self.codec
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TypeInfo, TypeNameResolver};
    use crate::value::ObjectValue;

    #[test]
    fn test_kind_discriminators_are_stable() {
        assert_eq!(PlanItem::TypeEnd.kind() as u8, 0x03);
        assert_eq!(
            PlanItem::WriteBytes(WriteBytes::new(vec![0u8])).kind() as u8,
            0x01
        );
        let ty = TypeInfo::new("core", "core", "i32");
        assert_eq!(
            PlanItem::Value(ValueItem::new(ty, CodecKind::I32)).kind(),
            PlanItemKind::Value
        );
    }

    #[test]
    fn test_type_start_copies_resolved_names() {
        let resolver = TypeNameResolver::new();
        let int_ty = TypeInfo::new("core", "core", "i32");
        let vec_int = TypeInfo::generic("alloc", "alloc.vec", "Vec", vec![int_ty]);
        let tuple = resolver.resolve(&vec_int).expect("resolvable");

        let start = TypeStart::new(vec_int.clone(), false, true, false, &tuple);
        assert_eq!(start.type_name(), "Vec[[core.i32]]");
        assert_eq!(start.namespace(), "alloc.vec");
        assert_eq!(start.assembly(), Some("alloc"));
        assert!(start.is_list());
        assert!(!start.is_dictionary());
        assert_eq!(start.generic_args().len(), 1);
        assert_eq!(start.ty().token(), vec_int.token());
    }

    #[test]
    fn test_property_value_precomputes_default() {
        let prop = PropertyValue::new("age", 1, CodecKind::I32, false);
        assert_eq!(prop.default(), &Value::I32(0));
        assert!(prop.is_default(&Value::I32(0)));
        assert!(!prop.is_default(&Value::I32(7)));

        let nullable = PropertyValue::new("name", 0, CodecKind::Str, true);
        assert!(nullable.default().is_null());
        assert!(nullable.is_default(&Value::Null));
    }

    #[test]
    fn test_property_reference_defaults_to_null() {
        let prop = PropertyReference::new("best_friend", 2);
        assert!(prop.default().is_null());
        assert!(prop.is_default(&Value::Null));
    }

    #[test]
    fn test_field_accessor_reads_slots() {
        let ty = TypeInfo::new("demo_models", "demo.models", "Point");
        let obj = Value::Object(std::sync::Arc::new(ObjectValue::new(
            ty,
            vec![Value::I32(3), Value::I32(4)],
        )));

        let accessor = FieldAccessor::new(1);
        assert_eq!(accessor.get(&obj).expect("slot 1"), Value::I32(4));

        let overrun = FieldAccessor::new(9).get(&obj);
        assert!(matches!(
            overrun,
            Err(AccessError::SlotOutOfBounds { slot: 9, len: 2 })
        ));

        let not_object = accessor.get(&Value::I32(5));
        assert!(matches!(not_object, Err(AccessError::NotAnObject { .. })));
    }

    #[test]
    fn test_runtime_value_reinit() {
        let int_ty = TypeInfo::new("core", "core", "i32");
        let str_ty = TypeInfo::new("alloc", "alloc.string", "String");

        let mut slot = RuntimeValue::new(int_ty, CodecKind::I32, Value::I32(1));
        slot.init(str_ty.clone(), CodecKind::Str, Value::from("poly"));

        assert_eq!(slot.ty().token(), str_ty.token());
        assert_eq!(slot.codec(), CodecKind::Str);
        assert_eq!(slot.value().as_str(), Some("poly"));
    }
}
