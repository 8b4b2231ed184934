// SPDX-License-Identifier: MIT OR Apache-2.0

//! The constant pool loader (spec §4.4).
//!
//! Parses the fixed-format header at the front of a bytecode image into a
//! constant table, and reports the byte offset at which the instruction
//! stream proper begins.

use crate::error::VmError;
use crate::heap::Heap;
use crate::value::Value;

/// Constant-pool entry tags (spec §6).
mod tag {
    pub const INT: u8 = 0;
    pub const NUM: u8 = 1;
    pub const STR: u8 = 2;
}

/// The parsed constant pool plus where the instruction stream starts.
pub struct LoadedImage {
    /// One value per constant-pool entry, in declaration order.
    pub constants: Vec<Value>,
    /// Byte offset of the first instruction.
    pub code_start: usize,
}

/// Parse the constant-pool header of `image`.
///
/// # Errors
/// Returns [`VmError::TruncatedImage`] if any header read would run past
/// the end of `image`, or [`VmError::UnknownConstTag`] if an entry's tag
/// byte isn't one of `INT`/`NUM`/`STR`.
pub fn load(image: &[u8], heap: &mut Heap) -> Result<LoadedImage, VmError> {
    let mut cursor = Cursor::new(image);
    let count = cursor.read_u8()?;

    let mut constants = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let tag = cursor.read_u8()?;
        let value = match tag {
            tag::INT => Value::Int(cursor.read_i32_le()?),
            tag::NUM => Value::Num(cursor.read_f64_le()?),
            tag::STR => {
                let len = cursor.read_u8()?;
                let bytes = cursor.read_bytes(len as usize)?.to_vec();
                Value::Obj(heap.alloc_string(bytes))
            }
            other => {
                return Err(VmError::UnknownConstTag {
                    offset: cursor.pos - 1,
                    tag: other,
                });
            }
        };
        constants.push(value);
    }

    Ok(LoadedImage {
        constants,
        code_start: cursor.pos,
    })
}

/// A minimal bounds-checked byte reader over the image, shared by the
/// constant-pool loader and the dispatch loop's own instruction fetch.
pub(crate) struct Cursor<'a> {
    pub(crate) bytes: &'a [u8],
    pub(crate) pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], VmError> {
        let end = self.pos.checked_add(len).ok_or(VmError::TruncatedImage {
            offset: self.pos,
            needed: len,
        })?;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or(VmError::TruncatedImage {
                offset: self.pos,
                needed: len,
            })?;
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, VmError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub(crate) fn read_i32_le(&mut self) -> Result<i32, VmError> {
        let bytes = self.read_bytes(4)?;
        let array: [u8; 4] = bytes.try_into().expect("read_bytes(4) returns 4 bytes");
        Ok(i32::from_le_bytes(array))
    }

    pub(crate) fn read_f64_le(&mut self) -> Result<f64, VmError> {
        let bytes = self.read_bytes(8)?;
        let array: [u8; 8] = bytes.try_into().expect("read_bytes(8) returns 8 bytes");
        Ok(f64::from_le_bytes(array))
    }
}
