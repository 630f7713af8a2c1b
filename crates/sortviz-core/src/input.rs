//! User-supplied sequences.
//!
//! Input is validated in full before a run starts. Nothing is reported
//! while an algorithm is in progress.

use sortviz_types::Value;

/// Longest sequence accepted from input or generated from config.
pub const MAX_SEQUENCE_LEN: usize = 1024;

/// Reasons a user-supplied sequence is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// A token is not an integer.
    #[error("not a number: {token:?}: {source}")]
    NotNumeric {
        /// The offending token, as written.
        token: String,
        /// Why the token did not parse.
        source: std::num::ParseIntError,
    },

    /// More elements than [`MAX_SEQUENCE_LEN`].
    #[error("sequence has {len} elements, the maximum is {max}")]
    TooLong {
        /// Number of elements supplied.
        len: usize,
        /// The limit.
        max: usize,
    },

    /// No elements where at least one is required.
    #[error("sequence is empty")]
    Empty,
}

/// Parse integers separated by commas and/or whitespace.
///
/// An empty string yields an empty sequence; empty sequences are valid
/// input to every algorithm.
///
/// # Errors
///
/// Returns [`InputError::NotNumeric`] for the first token that does not
/// parse, or [`InputError::TooLong`] past [`MAX_SEQUENCE_LEN`] elements.
pub fn parse_sequence(text: &str) -> Result<Vec<Value>, InputError> {
    let values = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Value>()
                .map_err(|source| InputError::NotNumeric {
                    token: token.to_owned(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    check_len(&values)?;
    Ok(values)
}

/// Like [`parse_sequence`], but rejects empty input.
///
/// # Errors
///
/// As [`parse_sequence`], plus [`InputError::Empty`].
pub fn parse_non_empty(text: &str) -> Result<Vec<Value>, InputError> {
    let values = parse_sequence(text)?;
    if values.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(values)
}

/// Check a sequence against [`MAX_SEQUENCE_LEN`].
///
/// # Errors
///
/// Returns [`InputError::TooLong`] if the sequence is over the limit.
pub fn check_len(values: &[Value]) -> Result<(), InputError> {
    if values.len() > MAX_SEQUENCE_LEN {
        return Err(InputError::TooLong {
            len: values.len(),
            max: MAX_SEQUENCE_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_commas_and_whitespace() {
        assert_eq!(parse_sequence("5, 3,8\n1"), Ok(vec![5, 3, 8, 1]));
        assert_eq!(parse_sequence("  -2   0 7 "), Ok(vec![-2, 0, 7]));
    }

    #[test]
    fn empty_text_is_an_empty_sequence() {
        assert_eq!(parse_sequence(""), Ok(Vec::new()));
        assert_eq!(parse_sequence(" , ,"), Ok(Vec::new()));
        assert_eq!(parse_non_empty(""), Err(InputError::Empty));
    }

    #[test]
    fn reports_the_first_bad_token() {
        assert!(matches!(
            parse_sequence("1, two, 3, x"),
            Err(InputError::NotNumeric { token, .. }) if token == "two"
        ));
        assert!(matches!(
            parse_sequence("1.5"),
            Err(InputError::NotNumeric { .. })
        ));
    }

    #[test]
    fn rejects_oversized_input() {
        let text = vec!["1"; MAX_SEQUENCE_LEN.saturating_add(1)].join(",");
        assert_eq!(
            parse_sequence(&text),
            Err(InputError::TooLong {
                len: MAX_SEQUENCE_LEN.saturating_add(1),
                max: MAX_SEQUENCE_LEN
            })
        );
        let text = vec!["1"; MAX_SEQUENCE_LEN].join(",");
        assert_eq!(parse_sequence(&text).map(|v| v.len()), Ok(MAX_SEQUENCE_LEN));
    }
}
