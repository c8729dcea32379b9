#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;

use chrono::Local;
use clap::App;
use failure::Error;
use rbombe::utils::parse_letter;
use rbombe::{Bombe, BombeFarm, Enigma, EnigmaBuilder, Rotor, Stop, Wiring};
use std::io::{self, BufRead};
use std::time::Instant;

const HELP: &str = "\
set-rotors [reflector] [left] [middle] [right]
\tsets the wheel order, e.g. set-rotors B I IV III
\t[reflector] is B or C; wheels are I, II, III, IV, V and must be distinct
set-steckers [pairs]
\tsets the steckered letters, e.g. set-steckers AB CE FG HL PQ RT
set-rings [left] [middle] [right]
\tsets the ring positions, letters a-z, e.g. set-rings a r z
set-rotations [left] [middle] [right]
\tsets the rotor rotations, letters a-z, e.g. set-rotations a l z
encode [msg]
\tencodes the message using the current Enigma settings
crack [cipher text] [crib]
\tcracks the message using the current wheel order, e.g. crack XJQWE HELLO
\tcipher text and crib length must match
farm-crack [cipher text] [crib]
\tcracks the message using all possible wheel orders
enigma
\toutputs the current Enigma settings
quit
\tquits the application";

fn now() -> String {
    Local::now().format("%T").to_string()
}

fn three_letters(rest: &str) -> Result<(u8, u8, u8), Error> {
    let params: Vec<&str> = rest.split_whitespace().collect();
    if params.len() != 3 {
        bail!("expected three letters a-z");
    }
    Ok((
        parse_letter(params[0])?,
        parse_letter(params[1])?,
        parse_letter(params[2])?,
    ))
}

fn cipher_and_crib(rest: &str) -> Result<(&str, &str), Error> {
    let params: Vec<&str> = rest.split_whitespace().collect();
    if params.len() != 2 {
        bail!("expected a cipher text and a crib");
    }
    Ok((params[0], params[1]))
}

fn print_stops(stops: &[Stop], with_wheels: bool) {
    for (index, stop) in stops.iter().enumerate() {
        if with_wheels {
            println!(
                "{}) {}: {} ({})",
                index + 1,
                stop.indicator,
                stop.steckers,
                stop.wheels
            );
        } else {
            println!("{}) {}: {}", index + 1, stop.indicator, stop.steckers);
        }
    }
}

/// Runs one shell command. Returns false once the user quits.
fn dispatch(enigma: &mut Enigma, line: &str) -> Result<bool, Error> {
    let (command, rest) = match line.find(' ') {
        Some(at) => (&line[..at], line[at + 1..].trim()),
        None => (line, ""),
    };

    match command {
        "help" => println!("{}", HELP),
        "quit" => return Ok(false),
        "enigma" => println!("Enigma config: {}", enigma.configuration()),
        "encode" => println!("{}", enigma.encode(rest)?),
        "set-rotors" => {
            let params: Vec<&str> = rest.split_whitespace().collect();
            if params.len() != 4 {
                bail!("expected a reflector and three wheels");
            }

            let reflector = Wiring::reflector(params[0])?;
            let left = Wiring::wheel(params[1])?;
            let middle = Wiring::wheel(params[2])?;
            let right = Wiring::wheel(params[3])?;
            if left.name() == middle.name()
                || left.name() == right.name()
                || middle.name() == right.name()
            {
                bail!("the three wheels must be distinct");
            }

            enigma.set_rotors(
                Rotor::new(reflector, 0, 0),
                Rotor::new(left, 0, 0),
                Rotor::new(middle, 0, 0),
                Rotor::new(right, 0, 0),
            );
            println!("Enigma config: {}", enigma.configuration());
        }
        "set-steckers" => {
            enigma.set_plugboard(rest)?;
            println!("Enigma config: {}", enigma.configuration());
        }
        "set-rings" => {
            let (l, m, r) = three_letters(rest)?;
            enigma.set_rings(l, m, r);
            println!("Enigma config: {}", enigma.configuration());
        }
        "set-rotations" => {
            let (l, m, r) = three_letters(rest)?;
            enigma.set_rotations(l, m, r);
            println!("Enigma config: {}", enigma.configuration());
        }
        "crack" => {
            let (cipher_text, crib) = cipher_and_crib(rest)?;

            let started = Instant::now();
            let mut bombe = Bombe::new(enigma, cipher_text, crib, true)?;
            let stops = bombe.run();

            println!("[{}] Cracked in {} ms", now(), started.elapsed().as_millis());
            println!("Possible rotor rotations and plug board deductions:");
            print_stops(&stops, false);
        }
        "farm-crack" => {
            let (cipher_text, crib) = cipher_and_crib(rest)?;

            let started = Instant::now();
            let stops = BombeFarm::new(cipher_text, crib, true).run()?;

            println!("[{}] Cracked in {} ms", now(), started.elapsed().as_millis());
            println!("Possible rotor rotations, plug board deductions, and rotor orders:");
            print_stops(&stops, true);
        }
        _ => println!("Command not found"),
    }

    Ok(true)
}

fn main() {
    env_logger::init();

    App::new("rbombe")
        .version(crate_version!())
        .about("Three-rotor Enigma emulator with a Turing-Welchman Bombe")
        .get_matches();

    let mut enigma = EnigmaBuilder::new()
        .reflector(Wiring::reflector("B").unwrap())
        .left(Wiring::wheel("I").unwrap(), 0, 0)
        .middle(Wiring::wheel("II").unwrap(), 0, 0)
        .right(Wiring::wheel("III").unwrap(), 0, 0)
        .build()
        .unwrap();

    println!("Welcome to Enigma! Type help for a list of commands.");
    println!("Enigma config: {}", enigma.configuration());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match dispatch(&mut enigma, line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("{}", e),
        }
    }
}
