//! The 16-bit flags word that closes the fixed part of every entry.
//!
//! ```text
//!   15   14   13-12   11-0
//! +----+----+-------+-------------+
//! | AV | EX | stage | name length |
//! +----+----+-------+-------------+
//! ```

use crate::artifacts::index::MAX_NAME_LENGTH;
use bitflags::bitflags;

bitflags! {
    /// Single-bit flags; the stage and name length live in the other bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntryFlags: u16 {
        const ASSUME_VALID = 0b1000_0000 << 8;
        const EXTENDED = 0b0100_0000 << 8;
        const STAGE = 0b0011_0000 << 8;
        const NAME_LENGTH = 0x0FFF;
    }
}

impl EntryFlags {
    pub fn from_raw(raw: u16) -> Self {
        Self::from_bits_retain(raw)
    }

    pub fn assume_valid(&self) -> bool {
        self.contains(Self::ASSUME_VALID)
    }

    pub fn extended(&self) -> bool {
        self.contains(Self::EXTENDED)
    }

    /// Merge stage, 0 for a normal entry and 1..=3 during a conflicted merge
    pub fn stage(&self) -> u8 {
        ((self.bits() & Self::STAGE.bits()) >> 12) as u8
    }

    pub fn name_length(&self) -> usize {
        (self.bits() & Self::NAME_LENGTH.bits()) as usize
    }

    /// The name is too long for 12 bits and is terminated by a NUL instead
    pub fn has_long_name(&self) -> bool {
        self.name_length() >= MAX_NAME_LENGTH
    }
}
