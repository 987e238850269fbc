//! Alignment block table and its filter engine.

pub mod blocks;
pub mod predicate;

pub use blocks::{AlignmentBlock, AlignmentBlockTable};
pub use predicate::{Cell, Column, Field, Filter, Predicate, Side, SortKey, Value};
