//! Stage timing for the compiler and the Groth16 hot paths
//!
//! A [`Stage`] is a guard: open it at the top of a stage and the elapsed
//! time is reported when it drops, so early returns and error paths are
//! covered too. Reporting goes to stderr and only under the `profile`
//! feature. This doubles as the progress surface of long operations.

use std::time::Instant;

/// Guard for one named stage of a longer operation.
pub struct Stage {
    label: &'static str,
    started: Instant,
}

/// Open a named stage.
pub fn stage(label: &'static str) -> Stage {
    Stage {
        label,
        started: Instant::now(),
    }
}

impl Stage {
    /// Close the stage before the end of its scope.
    pub fn finish(self) {}
}

impl Drop for Stage {
    fn drop(&mut self) {
        #[cfg(feature = "profile")]
        eprintln!("  * {} {:.2?}", self.label, self.started.elapsed());
        #[cfg(not(feature = "profile"))]
        let _ = (self.label, self.started);
    }
}

/// Report a one-off labelled value, e.g. sizes picked at compile time.
pub fn note(msg: &str) {
    #[cfg(feature = "profile")]
    eprintln!("  * {msg}");
    let _ = msg;
}
