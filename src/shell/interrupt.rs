//! Interrupt tracking.
//!
//! SIGINT and SIGTERM set a flag instead of terminating the process. The
//! foreground child (curl, tar, apt-get, ...) still receives the signal and
//! exits; the installer notices the flag after the child returns and unwinds
//! with [`InstallError::Interrupted`](crate::InstallError::Interrupted), so
//! scoped resources such as temporary download directories are dropped.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn record_interrupt(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Install the SIGINT/SIGTERM handlers. Call once from `main`.
pub fn install_interrupt_guard() {
    #[cfg(unix)]
    {
        let handler = record_interrupt as extern "C" fn(libc::c_int);
        // SAFETY: the handler only performs an atomic store, which is
        // async-signal-safe.
        unsafe {
            libc::signal(libc::SIGINT, handler as libc::sighandler_t);
            libc::signal(libc::SIGTERM, handler as libc::sighandler_t);
        }
    }
}

/// Whether an interrupt has been received.
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Fail with `Interrupted` if an interrupt has been received.
pub fn check_interrupt() -> crate::Result<()> {
    if interrupted() {
        Err(crate::InstallError::Interrupted)
    } else {
        Ok(())
    }
}
