//! # `tiff_meta_types`
//!
//! Types used by `tiff_meta` to describe TIFF metadata: the field types found
//! in directory entries, the named blocks (IFDs) a file may carry, decoded tag
//! values, and static dictionaries for naming tags and their values.
//!
//! Nothing in here reads bytes. That happens in `tiff_meta`.

#![forbid(unsafe_code)]

pub mod block;
pub mod field;
pub mod revival;
pub mod tags;
pub mod value;

pub use block::IfdBlock;
pub use field::{Endianness, FieldTy};
pub use value::{Block, Date, DateTime, Scalar, TagKey, TagValue};
