//! Diagnostic system for the Cocktail front-end.
//!
//! Diagnostics are small structured values: a compile-time kind descriptor
//! (with its payload) plus a byte position. Kinds carry a stable short name
//! used by tooling and tests, and render their message on demand.
//!
//! # Emission model
//!
//! Analyzers emit through the [`DiagnosticSink`] trait and then continue,
//! reporting as many problems as they can find. Emission never fails and
//! never halts the caller; recovery decisions live entirely in the emitting
//! analyzer.
//!
//! Positions emitted by the literal analyzers are relative to the start of
//! the analyzed lexeme. The tokenizer rebases them to absolute source
//! offsets with [`RebasedSink`] when forwarding.
//!
//! # Ordering
//!
//! Within a single analyzer invocation diagnostics arrive in left-to-right
//! source order, because the analyzers scan monotonically. [`DiagnosticLog`]
//! preserves emission order.

mod kind;
mod sink;

pub use kind::{Severity, SyntaxDiagnosticKind};
pub use sink::{Diagnostic, DiagnosticLog, DiagnosticSink, RebasedSink};
