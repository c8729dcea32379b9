use failure::Error;
use rayon::prelude::*;

use crate::bombe::{Bombe, Stop};
use crate::enigma::Enigma;
use crate::menu::Menu;
use crate::plugboard::Plugboard;
use crate::rotor::{Rotor, Wiring};

/// Runs Bombes over every wheel order in parallel.
///
/// Five wheels taken three at a time with order significant gives 60 orders.
/// Each worker owns its Bombe, scrambler cache and wire matrix outright, so
/// the sweep is shared-nothing; results are concatenated as workers finish.
pub struct BombeFarm {
    cipher_text: String,
    crib: String,
    check: bool,
}

impl BombeFarm {
    pub fn new(cipher_text: &str, crib: &str, check: bool) -> BombeFarm {
        BombeFarm {
            cipher_text: cipher_text.to_lowercase(),
            crib: crib.to_lowercase(),
            check,
        }
    }

    pub fn run(&self) -> Result<Vec<Stop>, Error> {
        // surface bad input once, before fanning out
        Menu::new(&self.cipher_text, &self.crib)?;

        let mut orders = Vec::new();

        // only reflector B is swept; C stays available to the machinery
        for reflector in 0..1 {
            for i in 0..5 {
                for j in 0..5 {
                    if j == i {
                        continue;
                    }
                    for k in 0..5 {
                        if k == i || k == j {
                            continue;
                        }
                        orders.push((reflector, i, j, k));
                    }
                }
            }
        }

        info!("sweeping {} wheel orders", orders.len());

        let stops = orders
            .into_par_iter()
            .flat_map(|(reflector, i, j, k)| {
                let wheels = Wiring::wheels();
                let enigma = Enigma::new(
                    Plugboard::new(),
                    Rotor::new(&Wiring::reflectors()[reflector], 0, 0),
                    Rotor::new(&wheels[i], 0, 0),
                    Rotor::new(&wheels[j], 0, 0),
                    Rotor::new(&wheels[k], 0, 0),
                );

                match Bombe::new(&enigma, &self.cipher_text, &self.crib, self.check) {
                    Ok(mut bombe) => bombe.run(),
                    Err(e) => {
                        warn!(
                            "skipping wheel order {}, {}, {}: {}",
                            wheels[i].name(),
                            wheels[j].name(),
                            wheels[k].name(),
                            e
                        );
                        Vec::new()
                    }
                }
            })
            .collect();

        Ok(stops)
    }
}
