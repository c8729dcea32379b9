use std::fmt;

use failure::Error;

use crate::utils::{a2i, i2a};

/// The steckerboard: a partial involution on the alphabet.
///
/// Letters without a cord pass through unchanged. A letter may carry an
/// explicit self-pair, which the checking machine uses to record that a
/// letter was deduced to be unsteckered.
#[derive(Default)]
pub struct Plugboard {
    swaps: [Option<u8>; 26],
}

impl Plugboard {
    pub fn new() -> Plugboard {
        Plugboard::default()
    }

    /// Builds a plugboard from whitespace-separated stecker pairs, e.g.
    /// `"AB CD EF"`. Every group must be exactly two letters.
    pub fn from_pairs(pairs: &str) -> Result<Plugboard, Error> {
        let mut board = Plugboard::new();

        for group in pairs.split_whitespace() {
            let mut letters = group.chars();
            match (letters.next(), letters.next(), letters.next()) {
                (Some(a), Some(b), None) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                    board.add(
                        a2i(a.to_ascii_lowercase()),
                        a2i(b.to_ascii_lowercase()),
                    );
                }
                _ => bail!("stecker pairs must be groups of exactly two letters, got '{}'", group),
            }
        }

        Ok(board)
    }

    /// Cords a to b and b to a.
    pub fn add(&mut self, a: u8, b: u8) {
        self.swaps[a as usize] = Some(b);
        self.swaps[b as usize] = Some(a);
    }

    /// The stecker partner of c, or c itself when unsteckered.
    pub fn swap(&self, c: u8) -> u8 {
        self.swaps[c as usize].unwrap_or(c)
    }
}

impl fmt::Display for Plugboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (i, partner) in self.swaps.iter().enumerate() {
            if let Some(j) = partner {
                if i as u8 <= *j {
                    if !first {
                        write!(f, " ")?;
                    }
                    write!(f, "{}{}", i2a(i as u8), i2a(*j))?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}
