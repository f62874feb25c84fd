//! Ctrl-C handling for batch modes
//!
//! The handler only sets a flag; long-running loops poll it between items.

use std::sync::atomic::{AtomicBool, Ordering};

/// Flag indicating SIGINT was received
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

pub(crate) fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst))
}

pub(crate) fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
