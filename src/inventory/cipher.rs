//! Letter-rotation cipher used to obscure counter-store value names.
//!
//! The store rotates every ASCII letter by 13 places and leaves everything
//! else alone, so the same transform both encodes and decodes.

const ROTATION: u8 = 13;

/// Rotates a single character, preserving case. Non-letters pass through.
pub fn rotate_char(c: char) -> char {
    match c {
        'a'..='z' => rotate_within(c, b'a'),
        'A'..='Z' => rotate_within(c, b'A'),
        _ => c,
    }
}

fn rotate_within(c: char, base: u8) -> char {
    // Callers guarantee `c` is an ASCII letter above `base`.
    let offset = (c as u8 - base + ROTATION) % 26;
    char::from(base + offset)
}

/// Decodes (or encodes) an obscured key string.
///
/// Total over any input: characters outside `A-Z`/`a-z`, including non-ASCII,
/// are copied verbatim.
pub fn rot13(input: &str) -> String {
    input.chars().map(rotate_char).collect()
}
