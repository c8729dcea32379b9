//! The Bombe proper.
//!
//! The Bombe does not decrypt anything. For a fixed wheel order it tries all
//! 26^3 starting rotations and, at each, attempts to prove a stecker
//! hypothesis absurd. There are 26 cables of 26 wires each; wire j of cable i
//! means "i is steckered to j". Scramblers sit between cables wherever the
//! menu has an edge, so a live wire forces more wires live through them. A
//! test register counts the live wires of the most connected menu letter's
//! cable; settings the Bombe cannot invalidate are reported as stops for an
//! operator to try by hand.

use failure::Error;

use crate::enigma::Enigma;
use crate::menu::Menu;
use crate::plugboard::Plugboard;
use crate::scrambler::Scrambler;

/// A rotation setting the Bombe failed to invalidate, with whatever
/// steckerboard deductions fell out of the wire pattern.
#[derive(Debug, Clone)]
pub struct Stop {
    /// Rotor rotations as three letters, left to right.
    pub indicator: String,
    /// Deduced stecker pairs, space separated.
    pub steckers: String,
    /// Wheel names as "Reflector, Left, Middle, Right".
    pub wheels: String,
}

pub struct Bombe {
    scrambler: Scrambler,
    menu: Menu,
    check: bool,
    wires: [bool; 26 * 26],
    live_wires: usize,
    test_register: u8,
    test_register_pair: u8,
}

impl Bombe {
    /// Builds a Bombe over the enigma's wheel order. Ring settings and the
    /// enigma's own plugboard are deliberately ignored; rings must be fixed
    /// by hand after a stop.
    pub fn new(enigma: &Enigma, cipher_text: &str, crib: &str, check: bool) -> Result<Bombe, Error> {
        let menu = Menu::new(cipher_text, crib)?;

        Ok(Bombe {
            scrambler: Scrambler::new(enigma),
            check,
            wires: [false; 26 * 26],
            live_wires: 0,
            test_register: menu.most_connected(),
            // the hypothesis letter is arbitrary; b throughout
            test_register_pair: 1,
            menu,
        })
    }

    /// Forces live the wire asserting "i is steckered to j", plus everything
    /// that implication drives through the menu's scramblers, breadth of the
    /// reachable wire set permitting. Saturating the test register's cable at
    /// 26 live wires contradicts the hypothesis and aborts the propagation.
    fn energize(&mut self, i: u8, j: u8) {
        let mut pending = vec![(i, j)];

        while let Some((i, j)) = pending.pop() {
            if self.wires[26 * i as usize + j as usize] {
                continue;
            }

            self.wires[26 * i as usize + j as usize] = true;
            // Welchman's diagonal board: j is steckered to i as well
            self.wires[26 * j as usize + i as usize] = true;

            if i == self.test_register || j == self.test_register {
                self.live_wires += 1;
                if self.live_wires == 26 {
                    return;
                }
            }

            for &k in self.menu.adjacent(i) {
                let shift = self.menu.crib_offset(i, k);
                let encoded = self.scrambler.encode(j, shift);
                if !self.wires[26 * k as usize + encoded as usize] {
                    pending.push((k, encoded));
                }
            }

            // the mirror wire drives the same scramblers from the other side
            if i != j {
                for &k in self.menu.adjacent(j) {
                    let shift = self.menu.crib_offset(j, k);
                    let encoded = self.scrambler.encode(i, shift);
                    if !self.wires[26 * k as usize + encoded as usize] {
                        pending.push((k, encoded));
                    }
                }
            }
        }
    }

    /// Inspects the test register's cable after energization. A letter may
    /// be steckered at most once, so 26 live wires disprove the hypothesis
    /// outright; 25 leave exactly one dead wire, which names the true
    /// partner; one live wire means the hypothesis itself was consistent.
    /// Anything in between is a stop.
    ///
    /// Relies on energization having started from the single hypothesis
    /// (test_register, test_register_pair).
    fn check_stop(&mut self) -> Option<Plugboard> {
        if self.live_wires == 26 {
            return None;
        }

        let stecker_pair = if self.live_wires == 25 {
            // the hypothesis was wrong but its complement is right
            (0..26u8)
                .find(|&j| !self.wires[26 * self.test_register as usize + j as usize])
                .expect("25 live wires but no dead wire in the test register cable")
        } else if self.live_wires == 1 {
            self.test_register_pair
        } else {
            if !self.check {
                return Some(Plugboard::new());
            }

            // try every candidate partner; only a unique survivor counts
            let mut stecker = None;
            for candidate in 0..26 {
                if let Some(board) = self.checking_machine(candidate) {
                    if stecker.is_some() {
                        return Some(Plugboard::new());
                    }
                    stecker = Some(board);
                }
            }

            return stecker;
        };

        if self.check {
            self.checking_machine(stecker_pair)
        } else {
            let mut board = Plugboard::new();
            board.add(self.test_register, stecker_pair);
            Some(board)
        }
    }

    /// Extracts full plugboard deductions from the wire pattern for one
    /// candidate partner of the test register, re-energizing first unless the
    /// candidate is the pair the wires already reflect. A cable with more
    /// than one live wire contradicts the plugboard.
    fn checking_machine(&mut self, pair: u8) -> Option<Plugboard> {
        if pair != self.test_register_pair {
            self.clear_wires();
            self.energize(self.test_register, pair);
        }

        let mut board = Plugboard::new();
        board.add(self.test_register, pair);

        for i in 0..26u8 {
            let mut count = 0;
            let mut other = 0;

            for j in 0..26u8 {
                if self.wires[26 * i as usize + j as usize] {
                    count += 1;
                    other = j;
                }
            }

            if count > 1 {
                return None;
            }
            if count == 1 {
                board.add(i, other);
            }
        }

        Some(board)
    }

    fn clear_wires(&mut self) {
        for wire in self.wires.iter_mut() {
            *wire = false;
        }
        self.live_wires = 0;
    }

    /// Sweeps every starting rotation, energizing the fixed hypothesis at
    /// each, and collects the stops in lexicographic cursor order.
    pub fn run(&mut self) -> Vec<Stop> {
        let mut stops = Vec::new();

        for l in 0..26 {
            for m in 0..26 {
                for r in 0..26 {
                    self.scrambler.set_rotation(l, m, r);

                    self.clear_wires();
                    self.energize(self.test_register, self.test_register_pair);

                    if let Some(deductions) = self.check_stop() {
                        stops.push(Stop {
                            indicator: self.scrambler.indicator(),
                            steckers: deductions.to_string(),
                            wheels: self.scrambler.configuration(),
                        });
                    }
                }
            }
        }

        debug!(
            "{} stops for {}",
            stops.len(),
            self.scrambler.configuration()
        );

        stops
    }
}
