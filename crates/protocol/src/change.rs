//! Change classification for watched resources
//!
//! `ChangeType` models the change notifications a cluster watch source
//! emits. Only these three kinds enter the log; the ingest adapter discards
//! everything else the source produces (bookmarks, watch errors) before
//! append, so the log never sees a change it does not model.

use std::fmt;
use std::str::FromStr;

/// The kind of change an event records
///
/// NOTE: These values are used on the wire and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChangeType {
    /// Object was created
    Added = 1,
    /// Object was updated
    Modified = 2,
    /// Object was removed
    Deleted = 3,
}

impl ChangeType {
    /// Parse from raw wire value
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Added),
            2 => Some(Self::Modified),
            3 => Some(Self::Deleted),
            _ => None,
        }
    }

    /// Convert to raw wire value
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get the string name of this change type
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        }
    }

    /// Normalize a raw watch-source tag
    ///
    /// Watch sources emit upper-case tags. Anything that is not an
    /// add/modify/delete returns `None` and is dropped at the ingest
    /// boundary.
    pub fn from_watch_tag(tag: &str) -> Option<Self> {
        match tag {
            "ADDED" => Some(Self::Added),
            "MODIFIED" => Some(Self::Modified),
            "DELETED" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<u8> for ChangeType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(())
    }
}

impl FromStr for ChangeType {
    type Err = ();

    /// Case-insensitive parse of the human-readable name, as accepted in
    /// query parameters and CLI flags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "added" => Ok(Self::Added),
            "modified" => Ok(Self::Modified),
            "deleted" => Ok(Self::Deleted),
            _ => Err(()),
        }
    }
}
