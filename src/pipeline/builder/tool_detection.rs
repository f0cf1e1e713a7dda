//! External tool availability checking.

use std::path::Path;

/// Whether `program` resolves to an executable, either as a path or on
/// `PATH`.
///
/// Only used for an early warning; the shell still gets the final say.
pub fn cmake_available(program: &Path) -> bool {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Found cmake at: {}", path.display());
            true
        }
        Err(e) => {
            log::warn!(
                "{} not found: {e}. The configure step will likely fail.",
                program.display()
            );
            false
        }
    }
}
