const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Uppercase hex digit for the low nibble of `value`.
pub fn nibble_to_hex(value: u8) -> u8 {
    HEX_DIGITS[usize::from(value & 0x0F)]
}

/// Two uppercase hex digits for `byte`, high nibble first.
pub fn byte_to_hex(byte: u8) -> [u8; 2] {
    [nibble_to_hex(byte >> 4), nibble_to_hex(byte)]
}

/// Parse two hex digits (either case) back into a byte.
pub fn hex_to_byte(pair: [u8; 2]) -> Option<u8> {
    fn digit(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    }
    Some(digit(pair[0])? << 4 | digit(pair[1])?)
}

#[cfg(test)]
#[path = "../../tests/unit/render/hex.rs"]
mod tests;
