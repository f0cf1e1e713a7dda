//! Host platform detection.
//!
//! The platform is resolved once per process into a [`Platform`] value and
//! passed down to every component, so OS-specific choices (shell, library
//! file names, CMake generator) live here and nowhere else.

use std::fmt;

/// Operating system family, named by its runtime-identifier prefix.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Os {
    /// `win`
    Windows,
    /// `osx`
    MacOs,
    /// `linux`
    Linux,
}

impl Os {
    /// Detects the host OS. Returns `None` on unsupported systems.
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::MacOs),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Runtime-identifier prefix (`win`, `osx`, `linux`).
    pub fn rid(&self) -> &'static str {
        match self {
            Self::Windows => "win",
            Self::MacOs => "osx",
            Self::Linux => "linux",
        }
    }

    /// Long form accepted in dependency mappings.
    fn long_name(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        }
    }
}

/// CPU architecture of the host process.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Arch {
    /// x86_64 / AMD64
    X64,
    /// x86 / i686
    X86,
    /// 32-bit ARM
    Arm,
    /// AArch64 / ARM64 (Apple Silicon, modern ARM servers)
    Arm64,
    /// 64-bit RISC-V
    RiscV64,
    /// 64-bit PowerPC, little endian
    Ppc64le,
    /// IBM Z
    S390x,
}

impl Arch {
    /// Detects the host architecture. Returns `None` on unsupported CPUs.
    pub fn current() -> Option<Self> {
        match std::env::consts::ARCH {
            "x86_64" => Some(Self::X64),
            "x86" => Some(Self::X86),
            "arm" => Some(Self::Arm),
            "aarch64" => Some(Self::Arm64),
            "riscv64" => Some(Self::RiscV64),
            "powerpc64" if cfg!(target_endian = "little") => Some(Self::Ppc64le),
            "s390x" => Some(Self::S390x),
            _ => None,
        }
    }

    /// Lower-cased architecture tag used in runtime identifiers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X86 => "x86",
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
            Self::RiscV64 => "riscv64",
            Self::Ppc64le => "ppc64le",
            Self::S390x => "s390x",
        }
    }
}

/// Host platform capabilities, resolved once at startup.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Platform {
    os: Os,
    arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Resolves the running platform.
    ///
    /// # Errors
    ///
    /// Fails when the host OS or architecture has no runtime identifier.
    pub fn current() -> crate::pipeline::Result<Self> {
        let os = match Os::current() {
            Some(os) => os,
            None => crate::bail!("unsupported operating system: {}", std::env::consts::OS),
        };
        let arch = match Arch::current() {
            Some(arch) => arch,
            None => crate::bail!("unsupported architecture: {}", std::env::consts::ARCH),
        };
        Ok(Self { os, arch })
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    /// `"{os}-{arch}"`, e.g. `linux-x64`, `osx-arm64`, `win-x86`.
    pub fn runtime_identifier(&self) -> String {
        format!("{}-{}", self.os.rid(), self.arch.as_str())
    }

    /// Whether a dependency-mapping key designates this platform.
    ///
    /// Accepts the short OS id, the long OS name, or the full runtime
    /// identifier, case-insensitively.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        key.eq_ignore_ascii_case(self.os.rid())
            || key.eq_ignore_ascii_case(self.os.long_name())
            || key.eq_ignore_ascii_case(&self.runtime_identifier())
    }

    /// Shell binary and its inline-execution flag.
    pub fn shell(&self) -> (&'static str, &'static str) {
        match self.os {
            Os::Windows => ("cmd", "/C"),
            Os::MacOs | Os::Linux => ("sh", "-c"),
        }
    }

    /// File name of the shared library inside a packaged artifact.
    pub fn packaged_library_name(&self, base: &str) -> String {
        match self.os {
            Os::Windows => format!("{base}.dll"),
            Os::Linux => format!("lib{base}.so"),
            Os::MacOs => format!("lib{base}.dylib"),
        }
    }

    /// File name CMake gives the shared library in the build tree.
    ///
    /// SDL2 appends its ABI version on Unix-like systems; the packager drops
    /// that suffix when it writes the archive entry.
    pub fn built_library_name(&self, base: &str) -> String {
        match self.os {
            Os::Windows => format!("{base}.dll"),
            Os::Linux => format!("lib{base}-2.0.so"),
            Os::MacOs => format!("lib{base}-2.0.0.dylib"),
        }
    }

    /// Off Windows the default single-config generator cannot honour
    /// `--config`, so configure forces a multi-config generator.
    pub fn multi_config_generator(&self) -> Option<&'static str> {
        match self.os {
            Os::Windows => None,
            Os::MacOs | Os::Linux => Some("Ninja Multi-Config"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.runtime_identifier())
    }
}

/// Whether a debugger is tracing this process.
///
/// Used as the interactive-session signal that turns installer commands into
/// dry runs.
pub fn debugger_attached() -> bool {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/self/status")
            .map(|status| tracer_pid_is_set(&status))
            .unwrap_or(false)
    }
    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn tracer_pid_is_set(status: &str) -> bool {
    status
        .lines()
        .find_map(|line| line.strip_prefix("TracerPid:"))
        .and_then(|pid| pid.trim().parse::<u32>().ok())
        .is_some_and(|pid| pid != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_identifier_uses_short_os_and_lowercase_arch() {
        assert_eq!(Platform::new(Os::Linux, Arch::X64).runtime_identifier(), "linux-x64");
        assert_eq!(Platform::new(Os::MacOs, Arch::Arm64).runtime_identifier(), "osx-arm64");
        assert_eq!(Platform::new(Os::Windows, Arch::X86).runtime_identifier(), "win-x86");
    }

    #[test]
    fn matches_short_long_and_full_identifiers() {
        let platform = Platform::new(Os::MacOs, Arch::Arm64);
        assert!(platform.matches("osx"));
        assert!(platform.matches("MacOS"));
        assert!(platform.matches("osx-arm64"));
        assert!(!platform.matches("osx-x64"));
        assert!(!platform.matches("linux"));
    }

    #[test]
    fn library_names_follow_platform_conventions() {
        let linux = Platform::new(Os::Linux, Arch::X64);
        let mac = Platform::new(Os::MacOs, Arch::X64);
        let win = Platform::new(Os::Windows, Arch::X64);

        assert_eq!(linux.packaged_library_name("SDL2"), "libSDL2.so");
        assert_eq!(mac.packaged_library_name("SDL2"), "libSDL2.dylib");
        assert_eq!(win.packaged_library_name("SDL2"), "SDL2.dll");
        assert_eq!(linux.built_library_name("SDL2"), "libSDL2-2.0.so");
        assert_eq!(mac.built_library_name("SDL2"), "libSDL2-2.0.0.dylib");
    }

    #[test]
    fn generator_override_only_off_windows() {
        assert_eq!(Platform::new(Os::Windows, Arch::X64).multi_config_generator(), None);
        assert!(Platform::new(Os::Linux, Arch::X64).multi_config_generator().is_some());
    }

    #[test]
    fn tracer_pid_parsing() {
        assert!(!tracer_pid_is_set("Name:\tsh\nTracerPid:\t0\n"));
        assert!(tracer_pid_is_set("Name:\tsh\nTracerPid:\t4242\n"));
        assert!(!tracer_pid_is_set("Name:\tsh\n"));
    }
}
