// Parser combinators using nom for fixed-layout binary frames

use nom::{bytes::complete::take, IResult};

/// Parse a single byte
pub fn parse_u8(input: &[u8]) -> IResult<&[u8], u8> {
    let (input, bytes) = take(1usize)(input)?;
    Ok((input, bytes[0]))
}

/// Parse a u16 big-endian
pub fn parse_u16_be(input: &[u8]) -> IResult<&[u8], u16> {
    let (input, bytes) = take(2usize)(input)?;
    Ok((input, u16::from_be_bytes([bytes[0], bytes[1]])))
}

/// Parse a u24 big-endian
pub fn parse_u24_be(input: &[u8]) -> IResult<&[u8], u32> {
    let (input, bytes) = take(3usize)(input)?;
    Ok((input, u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])))
}
