use std::fmt;

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

/// Object type and permission bits of an index entry.
///
/// A remote index can carry anything, so unknown modes are kept verbatim
/// instead of being rejected.
#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
pub enum EntryMode {
    File(FileMode),
    Symlink,
    Gitlink,
    Other(u32),
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
            EntryMode::Symlink => 0o120000,
            EntryMode::Gitlink => 0o160000,
            EntryMode::Other(mode) => *mode,
        }
    }
}

impl From<u32> for EntryMode {
    fn from(mode: u32) -> Self {
        match mode {
            0o100644 => EntryMode::File(FileMode::Regular),
            0o100755 => EntryMode::File(FileMode::Executable),
            0o120000 => EntryMode::Symlink,
            0o160000 => EntryMode::Gitlink,
            other => EntryMode::Other(other),
        }
    }
}

impl From<EntryMode> for u32 {
    fn from(mode: EntryMode) -> Self {
        mode.as_u32()
    }
}

impl From<FileMode> for EntryMode {
    fn from(mode: FileMode) -> Self {
        EntryMode::File(mode)
    }
}

// Six octal digits, zero padded, the way `git ls-files --stage` prints them
impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.as_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0o100644, "100644")]
    #[case(0o100755, "100755")]
    #[case(0o120000, "120000")]
    #[case(0o160000, "160000")]
    #[case(0o40000, "040000")]
    fn test_octal_display(#[case] raw: u32, #[case] expected: &str) {
        pretty_assertions::assert_eq!(EntryMode::from(raw).to_string(), expected);
    }

    #[test]
    fn test_unknown_mode_is_preserved() {
        let mode = EntryMode::from(0o100600);

        pretty_assertions::assert_eq!(mode, EntryMode::Other(0o100600));
        pretty_assertions::assert_eq!(u32::from(mode), 0o100600);
    }
}
