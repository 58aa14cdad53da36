//! Console input helpers and re-prompt loops.
//!
//! Validation failures here never abort anything: the prompt boundary is
//! where malformed input is caught and the question asked again.

use std::io::{self, BufRead, Write};

use stockroom_catalog::{is_valid_date, is_valid_kind, parse_price, parse_quantity};

/// Read one trimmed line; `None` when the input is exhausted or broken.
fn read_trimmed(input: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        // A zero-byte read is EOF (e.g. piped stdin ran out), not a blank
        // answer; looping on it would re-prompt forever.
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Ask one question and return the trimmed answer.
///
/// When stdin is closed there is nothing further to prompt for; the session
/// ends instead of spinning on the re-prompt loops.
pub fn ask(label: &str) -> String {
    print!("{label}: ");
    let _ = io::stdout().flush();
    match read_trimmed(&mut io::stdin().lock()) {
        Some(answer) => answer,
        None => {
            println!("\nEnd of input; leaving the inventory.");
            std::process::exit(0);
        }
    }
}

/// Ask until the answer is non-blank.
pub fn ask_required(label: &str) -> String {
    loop {
        let answer = ask(label);
        if !answer.is_empty() {
            return answer;
        }
        println!("A value is required.");
    }
}

/// Ask until the answer names a product kind; returns it normalized.
pub fn ask_kind() -> String {
    loop {
        let answer = ask("Product kind (hardware/software)");
        if is_valid_kind(&answer) {
            return answer.trim().to_lowercase();
        }
        println!("Invalid kind. Please enter 'hardware' or 'software'.");
    }
}

/// Ask until the answer is a positive price.
pub fn ask_price(label: &str) -> f64 {
    loop {
        match parse_price(&ask(label)) {
            Some(price) => return price,
            None => println!("The price must be a positive number."),
        }
    }
}

/// Ask until the answer is a non-negative integer quantity.
pub fn ask_quantity(label: &str) -> u32 {
    loop {
        match parse_quantity(&ask(label)) {
            Some(quantity) => return quantity,
            None => println!("The stock quantity must be a non-negative integer."),
        }
    }
}

/// Ask until the answer is a real `dd/mm/yyyy` date.
pub fn ask_date(label: &str) -> String {
    loop {
        let answer = ask(label);
        if is_valid_date(&answer) {
            return answer;
        }
        println!("Invalid date. Please use dd/mm/yyyy (31/12/2999 for \"never\").");
    }
}

/// Optional variants for the update flow: blank means "keep current value".
pub fn ask_optional(label: &str) -> Option<String> {
    let answer = ask(label);
    if answer.is_empty() { None } else { Some(answer) }
}

pub fn ask_optional_price(label: &str) -> Option<f64> {
    loop {
        let answer = ask(label);
        if answer.is_empty() {
            return None;
        }
        match parse_price(&answer) {
            Some(price) => return Some(price),
            None => println!("The price must be a positive number."),
        }
    }
}

pub fn ask_optional_quantity(label: &str) -> Option<u32> {
    loop {
        let answer = ask(label);
        if answer.is_empty() {
            return None;
        }
        match parse_quantity(&answer) {
            Some(quantity) => return Some(quantity),
            None => println!("The stock quantity must be a non-negative integer."),
        }
    }
}

pub fn ask_optional_date(label: &str) -> Option<String> {
    loop {
        let answer = ask(label);
        if answer.is_empty() {
            return None;
        }
        if is_valid_date(&answer) {
            return Some(answer);
        }
        println!("Invalid date. Please use dd/mm/yyyy.");
    }
}

/// Block until the user presses Enter.
pub fn pause() {
    let _ = ask("\nPress Enter to continue");
}
