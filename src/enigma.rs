use failure::Error;

use crate::plugboard::Plugboard;
use crate::rotor::{Rotor, Wiring};
use crate::utils::{a2i, i2a};

/// A three-rotor Enigma: plugboard, rotor stack and reflector.
///
/// The machine is reciprocal: feeding the ciphertext back through identical
/// settings yields the plaintext. A letter can never encode to itself, which
/// is the flaw the [`Bombe`](crate::Bombe) exploits.
pub struct Enigma {
    pub(crate) board: Plugboard,
    pub(crate) reflector: Rotor,
    pub(crate) left: Rotor,
    pub(crate) middle: Rotor,
    pub(crate) right: Rotor,
}

impl Enigma {
    pub(crate) fn new(
        board: Plugboard,
        reflector: Rotor,
        left: Rotor,
        middle: Rotor,
        right: Rotor,
    ) -> Enigma {
        Enigma {
            board,
            reflector,
            left,
            middle,
            right,
        }
    }

    /// Simulates the three prawls pushing up against the rotors. The middle
    /// prawl also engages when the middle rotor itself sits at its notch, so
    /// that rotor can advance on two consecutive presses (the double step).
    fn rotate(&mut self) {
        let should_middle_rotate = self.right.is_at_notch() || self.middle.is_at_notch();
        let should_left_rotate = self.middle.is_at_notch();

        self.right.rotate();

        if should_middle_rotate {
            self.middle.rotate();
        }

        if should_left_rotate {
            self.left.rotate();
        }
    }

    /// One key press: rotors step first, then the letter runs through the
    /// plugboard, the rotor stack, the reflector, and back out.
    pub fn encode_char(&mut self, c: u8) -> u8 {
        self.rotate();

        let mut c = self.board.swap(c);

        c = self.right.encode(c, true);
        c = self.middle.encode(c, true);
        c = self.left.encode(c, true);

        c = self.reflector.encode(c, true);

        c = self.left.encode(c, false);
        c = self.middle.encode(c, false);
        c = self.right.encode(c, false);

        self.board.swap(c)
    }

    /// Encodes a whole message, preserving spaces, and restores the starting
    /// rotations afterwards. Output is uppercased.
    pub fn encode(&mut self, message: &str) -> Result<String, Error> {
        let message = message.to_lowercase();

        if let Some(c) = message.chars().find(|&c| c != ' ' && !c.is_ascii_lowercase()) {
            bail!("message may only contain letters a-z and spaces, got '{}'", c);
        }

        let mut encoded = String::with_capacity(message.len());

        for c in message.chars() {
            if c == ' ' {
                encoded.push(' ');
            } else {
                encoded.push(i2a(self.encode_char(a2i(c))).to_ascii_uppercase());
            }
        }

        self.reset();

        Ok(encoded)
    }

    pub fn set_rotors(&mut self, reflector: Rotor, left: Rotor, middle: Rotor, right: Rotor) {
        self.reflector = reflector;
        self.left = left;
        self.middle = middle;
        self.right = right;
    }

    pub fn set_plugboard(&mut self, pairs: &str) -> Result<(), Error> {
        self.board = Plugboard::from_pairs(pairs)?;
        Ok(())
    }

    pub fn set_rings(&mut self, left: u8, middle: u8, right: u8) {
        self.left.ring_offset = left;
        self.middle.ring_offset = middle;
        self.right.ring_offset = right;
    }

    pub fn set_rotations(&mut self, left: u8, middle: u8, right: u8) {
        self.left.set_rotation_permanent(left);
        self.middle.set_rotation_permanent(middle);
        self.right.set_rotation_permanent(right);
    }

    /// Restores all three movable rotors to their configured rotations.
    pub fn reset(&mut self) {
        self.left.reset();
        self.middle.reset();
        self.right.reset();
    }

    /// Human-readable summary of the current settings.
    pub fn configuration(&self) -> String {
        format!(
            "Rotors=[{}, {}, {}, {}], Rings=[{}, {}, {}], Rotations=[{}, {}, {}], Steckerboard: {}",
            self.reflector.name(),
            self.left.name(),
            self.middle.name(),
            self.right.name(),
            i2a(self.left.ring_offset),
            i2a(self.middle.ring_offset),
            i2a(self.right.ring_offset),
            i2a(self.left.rotation),
            i2a(self.middle.rotation),
            i2a(self.right.rotation),
            self.board,
        )
    }
}

/// Step-by-step construction of a configured [`Enigma`].
#[derive(Default)]
pub struct EnigmaBuilder {
    board: Option<Plugboard>,
    reflector: Option<&'static Wiring>,
    left: Option<(&'static Wiring, u8, u8)>,
    middle: Option<(&'static Wiring, u8, u8)>,
    right: Option<(&'static Wiring, u8, u8)>,
}

impl EnigmaBuilder {
    pub fn new() -> EnigmaBuilder {
        EnigmaBuilder::default()
    }

    pub fn board(mut self, board: Plugboard) -> EnigmaBuilder {
        self.board = Some(board);
        self
    }

    pub fn reflector(mut self, wiring: &'static Wiring) -> EnigmaBuilder {
        self.reflector = Some(wiring);
        self
    }

    pub fn left(mut self, wiring: &'static Wiring, ring: u8, rotation: u8) -> EnigmaBuilder {
        self.left = Some((wiring, ring, rotation));
        self
    }

    pub fn middle(mut self, wiring: &'static Wiring, ring: u8, rotation: u8) -> EnigmaBuilder {
        self.middle = Some((wiring, ring, rotation));
        self
    }

    pub fn right(mut self, wiring: &'static Wiring, ring: u8, rotation: u8) -> EnigmaBuilder {
        self.right = Some((wiring, ring, rotation));
        self
    }

    pub fn build(self) -> Result<Enigma, Error> {
        let rotor = |slot: Option<(&'static Wiring, u8, u8)>, name: &str| {
            slot.map(|(wiring, ring, rotation)| Rotor::new(wiring, ring, rotation))
                .ok_or_else(|| format_err!("enigma builder is missing the {} rotor", name))
        };

        Ok(Enigma::new(
            self.board.unwrap_or_default(),
            Rotor::new(
                self.reflector
                    .ok_or_else(|| format_err!("enigma builder is missing the reflector"))?,
                0,
                0,
            ),
            rotor(self.left, "left")?,
            rotor(self.middle, "middle")?,
            rotor(self.right, "right")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{Enigma, EnigmaBuilder};
    use crate::rotor::Wiring;
    use crate::utils::a2i;

    fn machine() -> Enigma {
        EnigmaBuilder::new()
            .reflector(Wiring::reflector("B").unwrap())
            .left(Wiring::wheel("I").unwrap(), 0, 0)
            .middle(Wiring::wheel("II").unwrap(), 0, 0)
            .right(Wiring::wheel("III").unwrap(), 0, 0)
            .build()
            .unwrap()
    }

    #[test]
    fn known_encoding() {
        let mut enigma = machine();
        assert_eq!("BDZGO", enigma.encode("aaaaa").unwrap());
    }

    #[test]
    fn double_step() {
        let mut enigma = machine();
        enigma.set_rotations(a2i('a'), a2i('d'), a2i('u'));

        let mut trace = Vec::new();
        for _ in 0..5 {
            enigma.encode_char(0);
            trace.push((
                enigma.left.rotation,
                enigma.middle.rotation,
                enigma.right.rotation,
            ));
        }

        // the middle rotor reaches its own notch on the second press and
        // therefore steps again on the third, dragging the left rotor along
        assert_eq!(
            vec![(0, 3, 21), (0, 4, 22), (1, 5, 23), (1, 5, 24), (1, 5, 25)],
            trace
        );
    }

    #[test]
    fn reciprocity_with_plugboard() {
        let mut enigma = machine();
        enigma.set_plugboard("AB CD").unwrap();

        let cipher = enigma.encode("hello").unwrap();
        assert_eq!("HELLO", enigma.encode(&cipher).unwrap());
    }

    #[test]
    fn reciprocity_with_rings_and_rotations() {
        let mut enigma = machine();
        enigma.set_rings(2, 11, 24);
        enigma.set_rotations(7, 0, 19);

        let cipher = enigma.encode("the quick brown fox").unwrap();
        assert_eq!("THE QUICK BROWN FOX", enigma.encode(&cipher).unwrap());
    }

    #[test]
    fn no_fixed_point() {
        for c in b'a'..=b'z' {
            let mut enigma = machine();
            let cipher = enigma.encode(&(c as char).to_string()).unwrap();
            assert_ne!((c as char).to_ascii_uppercase().to_string(), cipher);
        }
    }

    #[test]
    fn spaces_pass_through() {
        let mut enigma = machine();
        let cipher = enigma.encode("aa aa").unwrap();
        assert_eq!(Some(' '), cipher.chars().nth(2));
    }

    #[test]
    fn encode_resets_rotations() {
        let mut enigma = machine();
        let first = enigma.encode("attackatdawn").unwrap();
        let second = enigma.encode("attackatdawn").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_non_letters() {
        let mut enigma = machine();
        assert!(enigma.encode("attack at 9").is_err());
    }
}
