//! Stdin reader
//!
//! Reads one command per line on its own thread and hands parsed commands
//! to the controller loop. End of input quits.

use std::io::{self, BufRead};
use std::thread;

use embassy_futures::block_on;
use tracing::{debug, warn};

use crate::channels::INPUT_CHANNEL;
use crate::command::{self, Input, ParseError, HELP};

/// Start the reader thread
pub fn spawn_input_reader() -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin".into())
        .spawn(read_lines)
}

fn read_lines() {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        };

        match command::parse(&line) {
            Ok(Input::Help) => eprintln!("{}", HELP),
            Ok(input) => {
                debug!(?input, "input");
                block_on(INPUT_CHANNEL.send(input));
                if input == Input::Quit {
                    return;
                }
            }
            Err(ParseError::Empty) => {}
            Err(e) => warn!(line = line.trim(), "{}", e),
        }
    }

    debug!("stdin closed");
    block_on(INPUT_CHANNEL.send(Input::Quit));
}
