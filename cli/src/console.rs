use std::io::{self, BufRead, Write};

use anyhow::Result;
use log::debug;
use taskmate_core::{greet, ConsoleSink};

use crate::session::Session;

/// Line-by-line session on stdin/stdout. Ends on `bye` or end of input.
pub fn run(mut session: Session) -> Result<()> {
    for line in greet() {
        println!("{}", line);
    }
    for notice in session.notices() {
        println!("{}", notice);
    }

    let stdin = io::stdin();
    let mut sink = ConsoleSink;
    for line in stdin.lock().lines() {
        let line = line?;
        let (service, tasks) = session.parts_mut();
        match service.execute(&line, tasks, &mut sink) {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => println!("oop. {}", e),
        }
        io::stdout().flush()?;
    }
    debug!("stdin closed, leaving console");
    Ok(())
}
