//! Types shared by every stage of the tsn compiler.

pub mod span;

pub use span::{LineIndex, Span};
