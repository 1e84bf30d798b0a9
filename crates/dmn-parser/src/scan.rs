//! Byte-level scanning helpers shared by the parsers
//!
//! Expression text is split on operators and separators that appear at the
//! top level only: outside string literals and outside `(...)`/`[...]`.

/// For each byte, whether it lies at the top level of `input`
pub(crate) fn top_level_mask(input: &str) -> Vec<bool> {
    let bytes = input.as_bytes();
    let mut mask = Vec::with_capacity(bytes.len());
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escaped = false;

    for &b in bytes {
        if in_string {
            mask.push(false);
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => {
                in_string = true;
                mask.push(false);
            }
            b'(' | b'[' => {
                mask.push(depth == 0);
                depth += 1;
            }
            b')' | b']' => {
                depth -= 1;
                mask.push(depth == 0);
            }
            _ => mask.push(depth == 0),
        }
    }

    mask
}

/// True if `open` at position 0 is closed by the last byte of `input`
pub(crate) fn is_wrapped(input: &str, open: u8, close: u8) -> bool {
    let bytes = input.as_bytes();
    if bytes.len() < 2 || bytes[0] != open || bytes[bytes.len() - 1] != close {
        return false;
    }
    let mask = top_level_mask(input);
    // the only top-level bytes are the outer pair
    mask.iter()
        .enumerate()
        .all(|(i, top)| !top || i == 0 || i == bytes.len() - 1)
}

/// Split `input` on a separator at top level
pub(crate) fn split_top_level<'a>(input: &'a str, separator: u8) -> Vec<&'a str> {
    let mask = top_level_mask(input);
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, &b) in input.as_bytes().iter().enumerate() {
        if b == separator && mask[i] {
            parts.push(input[start..i].trim());
            start = i + 1;
        }
    }
    parts.push(input[start..].trim());
    parts
}
