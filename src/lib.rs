//! dynadata - a self-describing dynamic value container with a strict JSON
//! codec
//!
//! This crate provides:
//! - [`Variant`], the eight-kinded scalar cell with total conversions
//! - [`InsertOrderedMap`], the insertion-ordered mapping backing Objects
//! - [`DynamicData`], the ten-kinded value tree (scalars plus Array/Object)
//! - [`decode`]/[`Decoder`], a strict RFC 8259 JSON parser
//! - [`encode`]/[`Encoder`], a configurable JSON encoder

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod dynamic;
pub mod encode;
pub mod error;
pub mod map;
pub mod variant;

pub use decode::decode;
pub use dynamic::{DynIndex, DynamicData, Kind, Serializable};
pub use encode::{encode, EncodeOptions};
pub use error::{ConversionError, Error, Result, TypeError};
pub use map::InsertOrderedMap;
pub use variant::Variant;

/// Strategy-style abstraction over [`decode`], following the "Decoder"
/// interface the source design names. The JSON implementation is the only
/// concrete implementor this crate provides.
pub trait Decoder {
    fn decode(&self, input: &str) -> Result<DynamicData>;
}

/// Strategy-style abstraction over [`encode`], following the "Encoder"
/// interface the source design names.
pub trait Encoder {
    fn encode(&self, data: &DynamicData) -> Result<String>;
}

/// The JSON implementation of [`Decoder`]/[`Encoder`] — the only concrete
/// strategy this crate ships.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json {
    pub options: EncodeOptions,
}

impl Decoder for Json {
    fn decode(&self, input: &str) -> Result<DynamicData> {
        decode::decode(input)
    }
}

impl Encoder for Json {
    fn encode(&self, data: &DynamicData) -> Result<String> {
        encode::encode(data, &self.options)
    }
}
