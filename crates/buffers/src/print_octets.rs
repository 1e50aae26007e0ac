//! Hex dump helper used in diagnostics.

use std::fmt::Write as _;

/// Formats up to `max` bytes as space separated lowercase hex, noting how
/// many bytes were left out.
///
/// ```
/// use msgpack_bind_buffers::print_octets;
///
/// assert_eq!(print_octets(&[0x82, 0xa4, 0x6e], 16), "82 a4 6e");
/// assert_eq!(print_octets(&[1, 2, 3], 2), "01 02 ... (1 more)");
/// assert_eq!(print_octets(&[], 16), "");
/// ```
pub fn print_octets(octets: &[u8], max: usize) -> String {
    let mut out = String::with_capacity(octets.len().min(max) * 3);
    for (i, byte) in octets.iter().take(max).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    if octets.len() > max {
        let _ = write!(out, " ... ({} more)", octets.len() - max);
    }
    out
}

/// [`print_octets`] capped at 16 bytes.
pub fn print_octets_default(octets: &[u8]) -> String {
    print_octets(octets, 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single() {
        assert_eq!(print_octets(&[0xc0], 16), "c0");
    }

    #[test]
    fn test_truncated() {
        let data: Vec<u8> = (0..20).collect();
        assert_eq!(
            print_octets_default(&data),
            "00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f ... (4 more)"
        );
    }
}
