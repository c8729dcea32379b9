use failure::Error;
use lazy_static::lazy_static;

use crate::utils::a2i;

/// A wheel's fixed core: the substitution both ways plus the turnover letter.
///
/// Wirings are immutable and shared; everything that moves (ring, rotation)
/// lives on the [`Rotor`] that carries the wheel. Reflectors are wirings with
/// no turnover.
pub struct Wiring {
    name: &'static str,
    forward: [u8; 26],
    inverse: [u8; 26],
    turnover: Option<u8>,
}

lazy_static! {
    static ref WHEELS: [Wiring; 5] = [
        Wiring::build("I", "EKMFLGDQVZNTOWYHXUSPAIBRCJ", Some('q')),
        Wiring::build("II", "AJDKSIRUXBLHWTMCQGZNPYFVOE", Some('e')),
        Wiring::build("III", "BDFHJLCPRTXVZNYEIWGAKMUSQO", Some('v')),
        Wiring::build("IV", "ESOVPZJAYQUIRHXLNFTGKDCMWB", Some('j')),
        Wiring::build("V", "VZBRGITYUPSDNHLXAWMJQOFECK", Some('z')),
    ];
    static ref REFLECTORS: [Wiring; 2] = [
        Wiring::build("B", "YRUHQSLDPXNGOKMIEBFZCWVJAT", None),
        Wiring::build("C", "FVPJIAOYEDRZXWGCTKUQSBNMHL", None),
    ];
}

impl Wiring {
    fn build(name: &'static str, letters: &str, turnover: Option<char>) -> Wiring {
        let mut forward = [0u8; 26];
        let mut inverse = [0u8; 26];

        for (i, c) in letters.bytes().enumerate() {
            forward[i] = c - b'A';
        }

        for (i, &m) in forward.iter().enumerate() {
            inverse[m as usize] = i as u8;
        }

        Wiring {
            name,
            forward,
            inverse,
            turnover: turnover.map(a2i),
        }
    }

    /// Looks up one of the five wheels by name.
    pub fn wheel(name: &str) -> Result<&'static Wiring, Error> {
        WHEELS
            .iter()
            .find(|w| w.name == name)
            .ok_or_else(|| format_err!("unknown wheel '{}', expected one of I, II, III, IV, V", name))
    }

    /// Looks up a reflector by name.
    pub fn reflector(name: &str) -> Result<&'static Wiring, Error> {
        REFLECTORS
            .iter()
            .find(|w| w.name == name)
            .ok_or_else(|| format_err!("unknown reflector '{}', expected B or C", name))
    }

    pub(crate) fn wheels() -> &'static [Wiring; 5] {
        &WHEELS
    }

    pub(crate) fn reflectors() -> &'static [Wiring; 2] {
        &REFLECTORS
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// One wheel in a machine: a wiring plus the ring offset and rotation.
pub struct Rotor {
    pub(crate) wiring: &'static Wiring,
    pub(crate) ring_offset: u8,
    pub(crate) rotation: u8,
    original_rotation: u8,
}

impl Rotor {
    pub fn new(wiring: &'static Wiring, ring_offset: u8, rotation: u8) -> Rotor {
        Rotor {
            wiring,
            ring_offset,
            rotation,
            original_rotation: rotation,
        }
    }

    /// Substitutes one letter through the wiring at the current ring offset
    /// and rotation. `forwards` is the entry pass (right side toward the
    /// reflector); the return pass runs the inverse table.
    pub fn encode(&self, c: u8, forwards: bool) -> u8 {
        // ring offset and rotation shift the contacts in opposite directions
        let contact = (26 + c - self.ring_offset + self.rotation) % 26;

        let mapped = if forwards {
            self.wiring.forward[contact as usize]
        } else {
            self.wiring.inverse[contact as usize]
        };

        (26 + mapped + self.ring_offset - self.rotation) % 26
    }

    /// Advances the rotor one position.
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 1) % 26;
    }

    /// True when the turnover notch sits under the prawl, i.e. the next key
    /// press also carries the wheel to the left.
    pub fn is_at_notch(&self) -> bool {
        self.wiring.turnover == Some(self.rotation)
    }

    /// Updates both the current rotation and the rotation [`reset`] returns to.
    ///
    /// [`reset`]: Rotor::reset
    pub fn set_rotation_permanent(&mut self, rotation: u8) {
        self.original_rotation = rotation;
        self.reset();
    }

    /// Restores the rotation the rotor was configured with.
    pub fn reset(&mut self) {
        self.rotation = self.original_rotation;
    }

    /// A fresh rotor over the same wiring with ring offset and rotation zeroed.
    pub fn copy(&self) -> Rotor {
        Rotor::new(self.wiring, 0, 0)
    }

    pub fn name(&self) -> &'static str {
        self.wiring.name
    }
}

#[cfg(test)]
mod tests {
    use super::{Rotor, Wiring};

    #[test]
    fn wheel_lookup() {
        assert_eq!("IV", Wiring::wheel("IV").unwrap().name());
        assert_eq!("C", Wiring::reflector("C").unwrap().name());
        assert!(Wiring::wheel("VI").is_err());
        assert!(Wiring::reflector("A").is_err());
    }

    #[test]
    fn forward_mapping() {
        // wheel I maps a -> e at zero ring and rotation
        let rotor = Rotor::new(Wiring::wheel("I").unwrap(), 0, 0);
        assert_eq!(4, rotor.encode(0, true));
        assert_eq!(0, rotor.encode(4, false));
    }

    #[test]
    fn wiring_involution() {
        for name in &["I", "II", "III", "IV", "V"] {
            let mut rotor = Rotor::new(Wiring::wheel(name).unwrap(), 0, 0);
            for ring in &[0, 3, 25] {
                rotor.ring_offset = *ring;
                for rotation in 0..26 {
                    rotor.rotation = rotation;
                    for c in 0..26 {
                        assert_eq!(c, rotor.encode(rotor.encode(c, true), false));
                    }
                }
            }
        }
    }

    #[test]
    fn reflector_is_involution() {
        let reflector = Rotor::new(Wiring::reflector("B").unwrap(), 0, 0);
        for c in 0..26 {
            let r = reflector.encode(c, true);
            assert_ne!(c, r);
            assert_eq!(c, reflector.encode(r, true));
        }
    }

    #[test]
    fn notch() {
        // wheel I turns over at q
        let mut rotor = Rotor::new(Wiring::wheel("I").unwrap(), 0, 0);
        assert!(!rotor.is_at_notch());
        rotor.set_rotation_permanent(16);
        assert!(rotor.is_at_notch());
        rotor.rotate();
        assert!(!rotor.is_at_notch());
        rotor.reset();
        assert!(rotor.is_at_notch());
    }

    #[test]
    fn copy_zeroes_state() {
        let mut rotor = Rotor::new(Wiring::wheel("II").unwrap(), 4, 9);
        rotor.rotate();
        let copy = rotor.copy();
        assert_eq!(0, copy.ring_offset);
        assert_eq!(0, copy.rotation);
        assert_eq!("II", copy.name());
    }
}
