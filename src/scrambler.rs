use crate::enigma::Enigma;
use crate::rotor::Wiring;
use crate::utils::i2a;

/// The Bombe's view of an Enigma: the rotor stack and reflector with the
/// plugboard removed and ring settings zeroed.
///
/// Every output for every (left, middle, right) rotation and input letter is
/// precomputed up front, 26^4 entries, so that traversing a menu edge is a
/// single table lookup. Rotors never step here; a menu edge instead offsets
/// the right rotation by the crib position, which assumes menus are short
/// enough that the middle rotor would not have moved.
pub struct Scrambler {
    // reflector, left, middle, right
    wheels: [&'static Wiring; 4],
    cache: Vec<u8>,
    cursor: (u8, u8, u8),
}

impl Scrambler {
    pub fn new(enigma: &Enigma) -> Scrambler {
        let reflector = enigma.reflector.copy();
        let mut left = enigma.left.copy();
        let mut middle = enigma.middle.copy();
        let mut right = enigma.right.copy();

        let mut cache = vec![0u8; 26 * 26 * 26 * 26];

        for l in 0..26 {
            left.rotation = l;
            for m in 0..26 {
                middle.rotation = m;
                for r in 0..26 {
                    right.rotation = r;
                    for x in 0..26 {
                        let mut c = right.encode(x, true);
                        c = middle.encode(c, true);
                        c = left.encode(c, true);

                        c = reflector.encode(c, true);

                        c = left.encode(c, false);
                        c = middle.encode(c, false);
                        c = right.encode(c, false);

                        cache[Scrambler::index(l, m, r, x)] = c;
                    }
                }
            }
        }

        let scrambler = Scrambler {
            wheels: [
                enigma.reflector.wiring,
                enigma.left.wiring,
                enigma.middle.wiring,
                enigma.right.wiring,
            ],
            cache,
            cursor: (0, 0, 0),
        };

        debug!("scrambler cache filled for {}", scrambler.configuration());

        scrambler
    }

    fn index(l: u8, m: u8, r: u8, x: u8) -> usize {
        ((l as usize * 26 + m as usize) * 26 + r as usize) * 26 + x as usize
    }

    /// Moves the rotation cursor the sweep is currently testing.
    pub fn set_rotation(&mut self, left: u8, middle: u8, right: u8) {
        self.cursor = (left, middle, right);
    }

    /// Encodes a letter with the right rotation offset by `right_shift`.
    /// Non-destructive: the cursor is unchanged, so the caller can jump
    /// between menu edges freely.
    pub fn encode(&self, letter: u8, right_shift: usize) -> u8 {
        let (l, m, r) = self.cursor;
        let r = ((r as usize + right_shift) % 26) as u8;
        self.cache[Scrambler::index(l, m, r, letter)]
    }

    /// The cursor as three indicator letters, left to right.
    pub fn indicator(&self) -> String {
        let (l, m, r) = self.cursor;
        format!("{}{}{}", i2a(l), i2a(m), i2a(r))
    }

    /// Wheel names as "Reflector, Left, Middle, Right".
    pub fn configuration(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.wheels[0].name(),
            self.wheels[1].name(),
            self.wheels[2].name(),
            self.wheels[3].name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Scrambler;
    use crate::enigma::EnigmaBuilder;
    use crate::rotor::{Rotor, Wiring};

    fn scrambler() -> Scrambler {
        let enigma = EnigmaBuilder::new()
            .reflector(Wiring::reflector("B").unwrap())
            .left(Wiring::wheel("I").unwrap(), 0, 0)
            .middle(Wiring::wheel("II").unwrap(), 0, 0)
            .right(Wiring::wheel("III").unwrap(), 0, 0)
            .build()
            .unwrap();
        Scrambler::new(&enigma)
    }

    #[test]
    fn matches_known_vector() {
        // aaaaa encodes to BDZGO from rotations aaa; press k leaves only the
        // right rotor advanced by k
        let scrambler = scrambler();
        for (k, &expected) in [1u8, 3, 25, 6, 14].iter().enumerate() {
            assert_eq!(expected, scrambler.encode(0, k + 1));
        }
    }

    #[test]
    fn matches_single_letter_stack() {
        // spot-check the cache against rotors constructed directly at the
        // cursor rotations
        let mut scrambler = scrambler();
        let reflector = Rotor::new(Wiring::reflector("B").unwrap(), 0, 0);

        for &(l, m, r) in &[(0u8, 0u8, 0u8), (5, 13, 2), (25, 25, 25), (1, 0, 19)] {
            let left = Rotor::new(Wiring::wheel("I").unwrap(), 0, l);
            let middle = Rotor::new(Wiring::wheel("II").unwrap(), 0, m);
            let right = Rotor::new(Wiring::wheel("III").unwrap(), 0, r);

            scrambler.set_rotation(l, m, r);

            for x in 0..26 {
                let mut c = right.encode(x, true);
                c = middle.encode(c, true);
                c = left.encode(c, true);
                c = reflector.encode(c, true);
                c = left.encode(c, false);
                c = middle.encode(c, false);
                c = right.encode(c, false);

                assert_eq!(c, scrambler.encode(x, 0));
            }
        }
    }

    #[test]
    fn involution_without_fixed_point() {
        let mut scrambler = scrambler();
        scrambler.set_rotation(3, 17, 9);
        for shift in &[0usize, 4, 30] {
            for x in 0..26 {
                let e = scrambler.encode(x, *shift);
                assert_ne!(x, e);
                assert_eq!(x, scrambler.encode(e, *shift));
            }
        }
    }

    #[test]
    fn indicator_and_configuration() {
        let mut scrambler = scrambler();
        scrambler.set_rotation(0, 1, 2);
        assert_eq!("abc", scrambler.indicator());
        assert_eq!("B, I, II, III", scrambler.configuration());
    }
}
