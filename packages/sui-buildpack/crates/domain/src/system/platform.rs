use serde::{Deserialize, Serialize};
use std::fmt;

/// CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X86_64,
    Aarch64,
    Unknown,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::X86_64 => write!(f, "x86_64"),
            Architecture::Aarch64 => write!(f, "aarch64"),
            Architecture::Unknown => write!(f, "unknown"),
        }
    }
}

impl Architecture {
    /// Suffix of the prebuilt binaries in Sui release archives,
    /// e.g. `sui-ubuntu-x86_64`
    pub fn release_binary_name(&self, tool: &str) -> String {
        format!("{}-ubuntu-{}", tool, self)
    }
}

/// Platform detection service
pub struct PlatformDetector;

impl PlatformDetector {
    /// Architecture of the running build container
    pub fn architecture() -> Architecture {
        Self::parse_architecture(std::env::consts::ARCH)
    }

    pub fn parse_architecture(arch: &str) -> Architecture {
        match arch {
            "x86_64" | "amd64" => Architecture::X86_64,
            "aarch64" | "arm64" => Architecture::Aarch64,
            _ => Architecture::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architecture_detection() {
        let arch = PlatformDetector::architecture();
        println!("Detected architecture: {}", arch);

        assert_eq!(arch, PlatformDetector::parse_architecture(std::env::consts::ARCH));
    }

    #[test]
    fn test_architecture_aliases() {
        assert_eq!(PlatformDetector::parse_architecture("amd64"), Architecture::X86_64);
        assert_eq!(PlatformDetector::parse_architecture("arm64"), Architecture::Aarch64);
        assert_eq!(PlatformDetector::parse_architecture("riscv64"), Architecture::Unknown);
    }

    #[test]
    fn test_release_binary_name() {
        assert_eq!(
            Architecture::X86_64.release_binary_name("sui"),
            "sui-ubuntu-x86_64"
        );
    }
}
