//! # sdb
//!
//! A simple debugger for a small RISC-V emulator.
//!
//! The debugger reads commands at a `(sdb) ` prompt. Expressions may use
//! decimal and hexadecimal literals, registers such as `$sp` or `$pc`,
//! the operators `+ - * / == != && ||`, parentheses and a unary `*`
//! which reads a 32-bit word from guest memory.
//! ```text
//! (sdb) p *$sp + 4
//! (sdb) w *0x80001000
//! (sdb) c
//! ```
//!
//! A watchpoint stops execution as soon as the value of its expression
//! changes. The pool of watchpoints has a fixed size.

pub mod lang;
pub mod mach;
pub mod term;
