//! Base64 VLQ decoding for the `mappings` field of a revision 3 source map.

const CONTINUATION_BIT: u32 = 1 << 5;
const VALUE_MASK: u32 = CONTINUATION_BIT - 1;

fn base64_digit(byte: u8) -> Option<u32> {
    let digit = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(digit as u32)
}

/// Decode every VLQ value in one segment (the text between commas).
///
/// Returns `None` on an invalid digit, a dangling continuation, or a value
/// that does not fit in an `i64`.
pub fn decode_segment(segment: &str) -> Option<Vec<i64>> {
    let mut values = Vec::with_capacity(5);
    let mut accumulator: u64 = 0;
    let mut shift = 0u32;
    let mut in_value = false;

    for byte in segment.bytes() {
        let digit = base64_digit(byte)?;
        if shift > 60 {
            return None;
        }
        accumulator |= u64::from(digit & VALUE_MASK) << shift;
        in_value = true;

        if digit & CONTINUATION_BIT != 0 {
            shift += 5;
            continue;
        }

        let magnitude = (accumulator >> 1) as i64;
        values.push(if accumulator & 1 == 1 {
            -magnitude
        } else {
            magnitude
        });
        accumulator = 0;
        shift = 0;
        in_value = false;
    }

    if in_value {
        return None;
    }
    Some(values)
}
