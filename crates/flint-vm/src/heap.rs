// SPDX-License-Identifier: MIT OR Apache-2.0

//! The object heap (spec §4.2).
//!
//! The reference design tracks heap objects with an intrusive linked list
//! so they can all be walked and freed at VM teardown. Spec §9 explicitly
//! sanctions replacing that list with "a simple vector of owned object
//! handles" since it adds no capability a vector lacks — this is the form
//! used here. Destruction then falls out of ordinary `Drop` when the
//! owning `Vm` (and its `Heap`) goes out of scope; there is no separate
//! teardown walk to write by hand.

use crate::object::Object;
use crate::value::Value;

/// A handle to a heap-allocated object.
///
/// Identity is by handle: two `Handle`s are equal iff they name the same
/// allocation. Structural equality for the *referent* (byte-wise for
/// strings) is implemented by [`Heap::values_equal`], not by comparing
/// handles.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Handle(u32);

/// The VM's object heap: every `String`, `Struct`, and `Upvalue` ever
/// allocated during a run, in allocation order.
#[derive(Default)]
pub struct Heap {
    objects: Vec<Object>,
}

impl Heap {
    /// Create an empty heap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Number of objects allocated so far. Used by tests asserting that an
    /// operation did (or did not) allocate.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no object has been allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn alloc(&mut self, object: Object) -> Handle {
        let index = self.objects.len();
        self.objects.push(object);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a single run cannot allocate u32::MAX objects"
        )]
        Handle(index as u32)
    }

    /// Allocate a string from raw bytes (opaque, UTF-8-agnostic per §3).
    pub fn alloc_string(&mut self, bytes: Vec<u8>) -> Handle {
        self.alloc(Object::String(bytes))
    }

    /// Allocate a struct from its fields, in declaration order.
    pub fn alloc_struct(&mut self, fields: Vec<Value>) -> Handle {
        self.alloc(Object::Struct(fields))
    }

    /// Allocate an open upvalue aliasing the given stack index.
    pub fn alloc_open_upvalue(&mut self, stack_index: usize) -> Handle {
        self.alloc(Object::Upvalue(crate::object::UpvalueCell::Open(
            stack_index,
        )))
    }

    /// Borrow an object by handle.
    ///
    /// # Panics
    /// Panics if `handle` does not name a live object. Handles are only
    /// ever produced by this heap's own `alloc_*` methods and never
    /// invalidated (nothing is ever freed before teardown), so a valid
    /// `Handle` is always in range.
    #[must_use]
    pub fn get(&self, handle: Handle) -> &Object {
        &self.objects[handle.0 as usize]
    }

    /// Borrow an object mutably by handle. See [`Heap::get`] for the
    /// panic contract.
    pub fn get_mut(&mut self, handle: Handle) -> &mut Object {
        &mut self.objects[handle.0 as usize]
    }

    /// Concatenate two strings into a freshly allocated third string.
    /// Neither source is modified.
    ///
    /// # Errors
    /// Returns [`crate::error::VmError::TypeMismatch`] if either operand is
    /// not a string.
    pub fn concat_strings(
        &mut self,
        a: Value,
        b: Value,
    ) -> Result<Handle, crate::error::VmError> {
        let a_bytes = self.expect_string(a)?.to_vec();
        let b_bytes = self.expect_string(b)?;
        let mut out = a_bytes;
        out.extend_from_slice(b_bytes);
        Ok(self.alloc_string(out))
    }

    fn expect_string(&self, v: Value) -> Result<&[u8], crate::error::VmError> {
        let Value::Obj(handle) = v else {
            return Err(crate::error::VmError::TypeMismatch {
                expected: "string",
                found: v.type_name(),
            });
        };
        self.get(handle)
            .as_string()
            .ok_or(crate::error::VmError::TypeMismatch {
                expected: "string",
                found: self.get(handle).type_name(),
            })
    }

    /// Structural equality (spec §4.1): `Bool`/`Int`/`Num`/`Nil`/`CodePtr`/
    /// `FramePtr` compare by value or address; `Obj` compares by handle
    /// identity, except two `String` objects compare by byte content.
    #[must_use]
    pub fn values_equal(&self, a: Value, b: Value) -> bool {
        match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Nil, Value::Nil) => true,
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Num(x), Value::Num(y)) => x == y,
            (Value::CodePtr(x), Value::CodePtr(y)) | (Value::FramePtr(x), Value::FramePtr(y)) => {
                x == y
            }
            (Value::Obj(x), Value::Obj(y)) => {
                if x == y {
                    return true;
                }
                match (self.get(x).as_string(), self.get(y).as_string()) {
                    (Some(sx), Some(sy)) => sx == sy,
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Render a value as a freshly allocated `String` object (spec §4.1).
    ///
    /// Always succeeds: allocation in this heap is a `Vec` push, which
    /// cannot fail short of process-wide OOM (which aborts, per normal
    /// Rust allocator behavior, rather than returning an error here).
    pub fn stringify(&mut self, v: Value) -> Handle {
        let bytes = match v {
            Value::Bool(true) => b"true".to_vec(),
            Value::Bool(false) => b"false".to_vec(),
            Value::Nil => b"nil".to_vec(),
            Value::Int(n) => n.to_string().into_bytes(),
            Value::Num(n) => format_num(n).into_bytes(),
            Value::CodePtr(off) => format!("<code {off}>").into_bytes(),
            Value::FramePtr(off) => format!("<frame {off}>").into_bytes(),
            Value::Obj(handle) => match self.get(handle) {
                Object::String(bytes) => bytes.clone(),
                Object::Struct(fields) => format!("<struct {} field(s)>", fields.len())
                    .into_bytes(),
                Object::Upvalue(_) => b"<upvalue>".to_vec(),
            },
        };
        self.alloc_string(bytes)
    }
}

/// Number of significant digits `format_num` keeps (spec §4.1: "decimal
/// with up to 7 significant digits").
const SIG_DIGITS: usize = 7;

/// Render a double as plain decimal with up to `SIG_DIGITS` significant
/// digits, `%.7g`-style but never switching to exponential notation.
///
/// Goes through scientific notation internally (the only way `core`
/// exposes a fixed *significant*-digit count, as opposed to a fixed
/// fractional-digit count) and then expands the mantissa back out to a
/// plain decimal string, trimming trailing fractional zeros.
fn format_num(n: f64) -> String {
    if n.is_infinite() {
        return if n > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if n.is_nan() {
        return "nan".to_string();
    }
    #[expect(
        clippy::float_cmp,
        reason = "zero is exactly representable; this guards against printing -0"
    )]
    if n == 0.0 {
        return "0".to_string();
    }

    let negative = n.is_sign_negative();
    let sci = format!("{:.*e}", SIG_DIGITS - 1, n.abs());
    let (mantissa, exp_str) = sci
        .split_once('e')
        .expect("Rust's exponential float format always contains 'e'");
    let exponent: i32 = exp_str
        .parse()
        .expect("Rust's exponential float format always has an integer exponent");
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = exponent + 1; // count of digits before the decimal point

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if point <= 0 {
        let leading_zeros = usize::try_from(-point).unwrap_or(0);
        out.push_str("0.");
        out.push_str(&"0".repeat(leading_zeros));
        out.push_str(&digits);
    } else {
        let point = usize::try_from(point).unwrap_or(digits.len());
        if point >= digits.len() {
            out.push_str(&digits);
            out.push_str(&"0".repeat(point - digits.len()));
        } else {
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        }
    }

    if out.contains('.') {
        let trimmed = out.trim_end_matches('0');
        trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod heap_test;
