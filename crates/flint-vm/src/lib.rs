// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Flint VM
//!
//! The execution core of a small stack-based bytecode virtual machine.
//!
//! This crate provides:
//! - Value representation and the object heap (strings, structs, upvalues)
//! - A constant-pool loader for the bytecode image format
//! - The fetch-decode-execute dispatch loop, including the call/return
//!   frame convention and the closure-on-pop upvalue mechanism
//! - The VM's error taxonomy
//!
//! It does not include a compiler or a parser for any source language —
//! inputs are already-assembled bytecode images. See `SPEC_FULL.md` at the
//! repository root for the full data and instruction-set reference.

pub mod constants;
pub mod error;
pub mod globals;
pub mod heap;
pub mod object;
pub mod opcode;
pub mod value;
pub mod vm;

pub use error::VmError;
pub use heap::{Handle, Heap};
pub use value::Value;
pub use vm::Vm;
