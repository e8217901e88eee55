//! Opening deep links from the terminal.

use colored::Colorize;
use safar_core::broadcast::Dispatcher;
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Start `program uri` detached from the terminal. The returned thread waits
/// on the child so it never lingers as a zombie.
fn launch(program: &str, uri: &str) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = Command::new(program)
        .arg(uri)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(thread::spawn(move || child.wait()))
}

/// Prints each link and hands it to the desktop's URL handler.
pub struct TerminalDispatcher {
    open: bool,
    dispatched: usize,
}

impl TerminalDispatcher {
    /// `open = false` only prints.
    pub fn new(open: bool) -> Self {
        Self {
            open,
            dispatched: 0,
        }
    }

    pub fn dispatched(&self) -> usize {
        self.dispatched
    }
}

impl Dispatcher for TerminalDispatcher {
    fn open_external(&mut self, uri: &str) {
        self.dispatched += 1;
        println!("  {} {}", "→".blue(), uri.dimmed());
        if !self.open {
            return;
        }

        match launch("xdg-open", uri) {
            Ok(_) => debug!(uri = %uri, "Opened with xdg-open"),
            Err(e) => debug!(error = %e, "xdg-open failed, open the link manually"),
        }
    }
}
