// Bit-level helpers shared by the wire codec and the report parser

/// Mask covering the low `bits` bits of a 16-bit word
/// Example: mask_u16(4) -> 0x000F, mask_u16(0) -> 0x0000
pub const fn mask_u16(bits: u8) -> u16 {
    if bits == 0 {
        0
    } else if bits >= 16 {
        u16::MAX
    } else {
        (1u16 << bits) - 1
    }
}

/// Extract `width` bits of `byte` starting at bit `shift` (bit 0 = LSB)
/// Example: bit_field(0b0011_1100, 2, 4) -> 0b1111
pub const fn bit_field(byte: u8, shift: u8, width: u8) -> u8 {
    ((byte as u16 >> shift) & mask_u16(width)) as u8
}

/// Test a single bit of `byte` (bit 0 = LSB)
pub const fn bit_flag(byte: u8, bit: u8) -> bool {
    (byte >> bit) & 0x01 != 0
}

/// Place the low `width` bits of `value` at bit `shift` of a 16-bit word
pub const fn place_u16(value: u16, shift: u8, width: u8) -> u16 {
    if width == 0 {
        return 0;
    }
    (value & mask_u16(width)) << shift
}

/// Inverse of [`place_u16`]
pub const fn take_u16(word: u16, shift: u8, width: u8) -> u16 {
    if width == 0 {
        return 0;
    }
    (word >> shift) & mask_u16(width)
}
