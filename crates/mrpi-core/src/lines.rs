//! Logical line scanning shared by the config and whitelist loaders.
//!
//! Files are scanned as raw bytes: any byte of the given terminator set ends
//! a line, and a line whose first byte is [`COMMENT_MARKER`] is dropped up to
//! the next terminator. Each remaining line is then decoded on its own, so
//! one line of invalid UTF-8 is reported back as bytes instead of being
//! rewritten into something that could compare equal to a different line.
//! Empty lines are yielded so callers can decide how to report them.

use crate::constants::COMMENT_MARKER;

/// One logical line: decoded text, or the raw bytes if it is not UTF-8.
pub type LogicalLine<'a> = std::result::Result<&'a str, &'a [u8]>;

/// Iterate over the non-comment logical lines of `bytes`.
///
/// # Examples
///
/// ```
/// use mrpi_core::constants::CONFIG_LINE_TERMINATORS;
/// use mrpi_core::lines::logical_lines;
///
/// let text = b"# buttons\r\n07=IN<cmd:>a.sh\r\n";
/// let lines: Vec<_> = logical_lines(text, &CONFIG_LINE_TERMINATORS)
///     .filter(|l| *l != Ok(""))
///     .collect();
/// assert_eq!(lines, vec![Ok("07=IN<cmd:>a.sh")]);
/// ```
pub fn logical_lines<'a>(
    bytes: &'a [u8],
    terminators: &'a [u8],
) -> impl Iterator<Item = LogicalLine<'a>> {
    bytes
        .split(move |byte| terminators.contains(byte))
        .filter(|line| line.first() != Some(&COMMENT_MARKER))
        .map(|line| std::str::from_utf8(line).map_err(|_| line))
}
