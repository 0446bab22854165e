//! Arbitrary-precision decimal arithmetic and a small expression
//! calculator built on top of it.
//!
//! The two halves of the crate mirror the original pjump/BigNum split
//! between `BigN` (the numeric type, here [`bigdec::BigDec`]) and
//! `Calculator<T>` (the language front end, here [`evaluator::Evaluator`]
//! plus its supporting [`lexer`], [`token`] and [`registry`] modules).

pub mod bigdec;
pub mod digits;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod registry;
pub mod shared;
pub mod token;

pub use bigdec::BigDec;
pub use error::Error;
pub use evaluator::Evaluator;
