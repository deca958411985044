// ============================================================================
// Logging
// Optional fmt subscriber for binaries and tests embedding the library
// ============================================================================

use tracing::Level;

/// Install a global fmt subscriber writing events at `level` and above.
///
/// Returns `false` if a global subscriber is already set, in which case
/// nothing changes.
pub fn init_logging(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .try_init()
        .is_ok()
}
