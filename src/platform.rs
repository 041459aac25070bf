use std::fmt;

/// Detected operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux, macOS and other Unix-like systems.
    Unix,
    /// Windows.
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix => write!(f, "unix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            os: if cfg!(target_os = "windows") {
                Os::Windows
            } else {
                Os::Unix
            },
        }
    }

    /// Create a platform with an explicit OS (for testing).
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Default shell program and the flag that makes it run a command string.
    #[must_use]
    pub const fn default_shell(&self) -> (&'static str, &'static str) {
        match self.os {
            Os::Unix => ("sh", "-c"),
            Os::Windows => ("cmd", "/C"),
        }
    }

    /// Rewrite POSIX-only hook fragments into their platform equivalent.
    ///
    /// Windows has no `rm -rf`; hooks that use it get `rmdir /s /q` instead.
    #[must_use]
    pub fn rewrite_hook(&self, command: &str) -> String {
        match self.os {
            Os::Unix => command.to_string(),
            Os::Windows => command.replace("rm -rf", "rmdir /s /q"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(Os::Unix.to_string(), "unix");
        assert_eq!(Os::Windows.to_string(), "windows");
    }

    #[test]
    fn detect_matches_cfg() {
        let platform = Platform::detect();
        assert_eq!(platform.os == Os::Windows, cfg!(target_os = "windows"));
    }

    #[test]
    fn unix_hooks_are_untouched() {
        let platform = Platform::new(Os::Unix);
        assert_eq!(
            platform.rewrite_hook("rm -rf $PROJECT/var/cache"),
            "rm -rf $PROJECT/var/cache"
        );
    }

    #[test]
    fn windows_rewrites_recursive_delete() {
        let platform = Platform::new(Os::Windows);
        assert_eq!(
            platform.rewrite_hook("rm -rf $PROJECT/var/cache && echo done"),
            "rmdir /s /q $PROJECT/var/cache && echo done"
        );
    }

    #[test]
    fn default_shell_per_os() {
        assert_eq!(Platform::new(Os::Unix).default_shell(), ("sh", "-c"));
        assert_eq!(Platform::new(Os::Windows).default_shell(), ("cmd", "/C"));
    }
}
