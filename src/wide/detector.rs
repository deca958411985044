// ============================================================================
// CPU Detection and Backend Factory
// Runtime capability detection and wide multiply/divide backend selection
// ============================================================================

use super::native::NativeMulDiv;
use super::portable::PortableMulDiv;
use super::traits::MulDivBackend;
use crate::config::{ArithmeticConfig, BackendPreference};

static NATIVE: NativeMulDiv = NativeMulDiv::new();
static PORTABLE: PortableMulDiv = PortableMulDiv::new();

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// x86_64 (Intel/AMD 64-bit)
    X86_64,
    /// aarch64 (ARM 64-bit, including Apple Silicon)
    Aarch64,
    /// Unknown or unsupported architecture
    Other,
}

impl Architecture {
    /// Detect the current CPU architecture.
    #[inline]
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Architecture::X86_64
        }
        #[cfg(target_arch = "aarch64")]
        {
            Architecture::Aarch64
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Architecture::Other
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Architecture::X86_64 => write!(f, "x86_64"),
            Architecture::Aarch64 => write!(f, "aarch64"),
            Architecture::Other => write!(f, "other"),
        }
    }
}

/// Detected CPU capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuCapabilities {
    /// The CPU architecture
    pub architecture: Architecture,
    /// Native pointer width in bits
    pub pointer_width: u32,
}

impl CpuCapabilities {
    /// Detect CPU capabilities at runtime.
    pub fn detect() -> Self {
        Self {
            architecture: Architecture::detect(),
            pointer_width: usize::BITS,
        }
    }

    /// Whether the target has a hardware widening multiply and wide divide,
    /// so `u128` arithmetic lowers to a handful of instructions.
    pub fn supports_accelerated(&self) -> bool {
        self.pointer_width == 64 && self.architecture != Architecture::Other
    }
}

impl std::fmt::Display for CpuCapabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CPU: {} ({}-bit)", self.architecture, self.pointer_width)
    }
}

/// The accelerated backend, regardless of CPU support.
pub fn accelerated_backend() -> &'static dyn MulDivBackend {
    &NATIVE
}

/// The portable backend.
pub fn portable_backend() -> &'static dyn MulDivBackend {
    &PORTABLE
}

/// Select the backend described by `config` for the current CPU.
///
/// - `Auto`: accelerated when supported, portable otherwise
/// - `Accelerated`: accelerated, falling back to portable if unsupported
/// - `Portable`: portable
///
/// With `probe_on_install`, a chosen accelerated backend is first checked
/// against the portable one and rejected on any disagreement.
pub fn select_backend(config: &ArithmeticConfig) -> &'static dyn MulDivBackend {
    let caps = CpuCapabilities::detect();
    let wants_accelerated = match config.backend {
        BackendPreference::Auto => caps.supports_accelerated(),
        BackendPreference::Accelerated => {
            if !caps.supports_accelerated() {
                tracing::warn!(%caps, "accelerated backend requested but not supported, using portable");
            }
            caps.supports_accelerated()
        }
        BackendPreference::Portable => false,
    };

    if !wants_accelerated {
        return portable_backend();
    }
    if config.probe_on_install {
        if let Err((a, b, d)) = probe(accelerated_backend(), portable_backend()) {
            tracing::warn!(
                a,
                b,
                d,
                "accelerated backend disagrees with portable backend, using portable"
            );
            return portable_backend();
        }
    }
    accelerated_backend()
}

/// Cross-check `candidate` against `reference` on a fixed sample.
///
/// Returns the first disagreeing `(a, b, d)` triple.
pub fn probe(
    candidate: &dyn MulDivBackend,
    reference: &dyn MulDivBackend,
) -> Result<(), (u64, u64, u64)> {
    const FIXED: [(u64, u64, u64); 8] = [
        (0, 0, 1),
        (1, 1, 1),
        (1999, 1000, 1190),
        (999_999_999_999_999_999, 999_999_999_999_999_999, 1_000_000_000_000_000_000),
        (u64::MAX, u64::MAX, u64::MAX),
        (u64::MAX, u64::MAX - 1, u64::MAX),
        (1 << 31, 1 << 31, 3),
        (15_777_333_234_567_321, 123_456_789, 987_654_321),
    ];

    let check = |a: u64, b: u64, d: u64| {
        if candidate.mul_div_rem(a, b, d) == reference.mul_div_rem(a, b, d) {
            Ok(())
        } else {
            Err((a, b, d))
        }
    };

    for (a, b, d) in FIXED {
        check(a, b, d)?;
    }

    // xorshift64 sample, deterministic
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    for _ in 0..256 {
        let a = next();
        let b = next() >> (next() % 64);
        let d = (next() >> (next() % 64)).max(1);
        check(a, b, d)?;
    }
    Ok(())
}
