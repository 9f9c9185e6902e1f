/// Layout of a well-formed timestamp token, as shown to users.
pub const TIMESTAMP_FORMAT: &str = "{YYYY}-{MM}-{DD}T{HH}:{mm}:{ss}.{ssssss}Z";

/// `D` marks a digit, anything else must match literally.
const TIMESTAMP_SHAPE: &[u8; 27] = b"DDDD-DD-DDTDD:DD:DD.DDDDDDZ";

/// Leading token of a line: everything before the first ASCII whitespace byte.
///
/// The line terminator counts as whitespace, so a bare `"\n"` yields an empty
/// token, as does a line that starts with a space.
pub fn leading_token(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(line.len());
    &line[..end]
}

/// Whether `token` has the fixed-width shape that makes lexical order match
/// chronological order. Only the shape is checked, not the calendar.
pub fn is_fixed_format(token: &[u8]) -> bool {
    token.len() == TIMESTAMP_SHAPE.len()
        && token
            .iter()
            .zip(TIMESTAMP_SHAPE)
            .all(|(&b, &expected)| match expected {
                b'D' => b.is_ascii_digit(),
                _ => b == expected,
            })
}
