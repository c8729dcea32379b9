#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

mod bombe;
mod enigma;
mod farm;
mod menu;
mod plugboard;
mod rotor;
mod scrambler;

pub mod utils;

pub use self::bombe::{Bombe, Stop};
pub use self::enigma::{Enigma, EnigmaBuilder};
pub use self::farm::BombeFarm;
pub use self::plugboard::Plugboard;
pub use self::rotor::{Rotor, Wiring};
pub use self::scrambler::Scrambler;
