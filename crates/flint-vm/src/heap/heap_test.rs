// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the object heap.

use super::Heap;
use crate::object::UpvalueCell;
use crate::value::Value;

#[test]
fn alloc_string_grows_heap() {
    let mut heap = Heap::new();
    assert!(heap.is_empty());
    let handle = heap.alloc_string(b"hi".to_vec());
    assert_eq!(heap.len(), 1);
    assert_eq!(heap.get(handle).as_string(), Some(b"hi".as_slice()));
}

#[test]
fn distinct_allocations_get_distinct_handles() {
    let mut heap = Heap::new();
    let a = heap.alloc_string(b"a".to_vec());
    let b = heap.alloc_string(b"a".to_vec());
    assert_ne!(a, b);
}

#[test]
fn concat_strings_allocates_a_third_string() {
    let mut heap = Heap::new();
    let a = Value::Obj(heap.alloc_string(b"foo".to_vec()));
    let b = Value::Obj(heap.alloc_string(b"bar".to_vec()));
    let result = heap.concat_strings(a, b).unwrap();
    assert_eq!(heap.get(result).as_string(), Some(b"foobar".as_slice()));
    assert_eq!(heap.len(), 3);
}

#[test]
fn concat_strings_rejects_non_string_operand() {
    let mut heap = Heap::new();
    let a = Value::Obj(heap.alloc_string(b"foo".to_vec()));
    let err = heap.concat_strings(a, Value::Int(1)).unwrap_err();
    assert!(matches!(err, crate::error::VmError::TypeMismatch { .. }));
}

#[test]
fn values_equal_strings_by_content() {
    let mut heap = Heap::new();
    let a = Value::Obj(heap.alloc_string(b"same".to_vec()));
    let b = Value::Obj(heap.alloc_string(b"same".to_vec()));
    assert!(heap.values_equal(a, b));
}

#[test]
fn values_equal_structs_by_identity_only() {
    let mut heap = Heap::new();
    let a = Value::Obj(heap.alloc_struct(vec![Value::Int(1)]));
    let b = Value::Obj(heap.alloc_struct(vec![Value::Int(1)]));
    assert!(!heap.values_equal(a, b));
    assert!(heap.values_equal(a, a));
}

#[test]
fn values_equal_scalars_by_value() {
    let heap = Heap::new();
    assert!(heap.values_equal(Value::Int(3), Value::Int(3)));
    assert!(!heap.values_equal(Value::Int(3), Value::Num(3.0)));
    assert!(heap.values_equal(Value::Nil, Value::Nil));
}

#[test]
fn stringify_bool_nil_int() {
    let mut heap = Heap::new();
    let h = heap.stringify(Value::Bool(true));
    assert_eq!(heap.get(h).as_string(), Some(b"true".as_slice()));
    let h = heap.stringify(Value::Nil);
    assert_eq!(heap.get(h).as_string(), Some(b"nil".as_slice()));
    let h = heap.stringify(Value::Int(-7));
    assert_eq!(heap.get(h).as_string(), Some(b"-7".as_slice()));
}

#[test]
fn stringify_trims_trailing_zeros() {
    let mut heap = Heap::new();
    let h = heap.stringify(Value::Num(1.5));
    assert_eq!(heap.get(h).as_string(), Some(b"1.5".as_slice()));
    let h = heap.stringify(Value::Num(2.0));
    assert_eq!(heap.get(h).as_string(), Some(b"2".as_slice()));
}

#[test]
fn stringify_keeps_significant_digits_not_fractional_digits() {
    let mut heap = Heap::new();
    // 9 significant digits in the input: rounds down to 7, not truncated
    // at a fixed 7 fractional places (which would keep all 9).
    let h = heap.stringify(Value::Num(123_456.789));
    assert_eq!(heap.get(h).as_string(), Some(b"123456.8".as_slice()));

    // A small magnitude must not lose precision to a fixed fractional
    // cutoff; only 5 significant digits are present here, all preserved.
    let h = heap.stringify(Value::Num(0.00000012345));
    assert_eq!(heap.get(h).as_string(), Some(b"0.00000012345".as_slice()));

    // Exact powers of ten and round-number integers still print clean.
    let h = heap.stringify(Value::Num(100.0));
    assert_eq!(heap.get(h).as_string(), Some(b"100".as_slice()));
    let h = heap.stringify(Value::Num(-123_456.789));
    assert_eq!(heap.get(h).as_string(), Some(b"-123456.8".as_slice()));
}

#[test]
fn stringify_infinite_and_nan() {
    let mut heap = Heap::new();
    let h = heap.stringify(Value::Num(f64::INFINITY));
    assert_eq!(heap.get(h).as_string(), Some(b"inf".as_slice()));
    let h = heap.stringify(Value::Num(f64::NEG_INFINITY));
    assert_eq!(heap.get(h).as_string(), Some(b"-inf".as_slice()));
    let h = heap.stringify(Value::Num(f64::NAN));
    assert_eq!(heap.get(h).as_string(), Some(b"nan".as_slice()));
}

#[test]
fn alloc_open_upvalue_round_trips() {
    let mut heap = Heap::new();
    let handle = heap.alloc_open_upvalue(5);
    assert_eq!(heap.get(handle).as_upvalue(), Some(&UpvalueCell::Open(5)));
}
