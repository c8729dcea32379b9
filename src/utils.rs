use failure::Error;

/// Converts a lowercase letter to its alphabet index, 'a' = 0.
pub fn a2i(c: char) -> u8 {
    debug_assert!(c.is_ascii_lowercase());
    c as u8 - b'a'
}

/// Converts an alphabet index back to its lowercase letter.
pub fn i2a(i: u8) -> char {
    debug_assert!(i < 26);
    (i + b'a') as char
}

/// Parses a single-letter token into an alphabet index, folding case.
pub fn parse_letter(token: &str) -> Result<u8, Error> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(a2i(c.to_ascii_lowercase())),
        _ => Err(format_err!("'{}' is not a letter a-z", token)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        for i in 0..26 {
            assert_eq!(i, a2i(i2a(i)));
        }
    }

    #[test]
    fn parse() {
        assert_eq!(0, parse_letter("a").unwrap());
        assert_eq!(25, parse_letter("Z").unwrap());
        assert!(parse_letter("ab").is_err());
        assert!(parse_letter("").is_err());
        assert!(parse_letter("1").is_err());
    }
}
