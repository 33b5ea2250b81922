// Bit and byte helpers for the M16 wire format and report frame

pub mod elements;
pub mod parser;

pub use elements::{bit_field, bit_flag, mask_u16, place_u16, take_u16};
pub use parser::{parse_u16_be, parse_u24_be, parse_u8};
