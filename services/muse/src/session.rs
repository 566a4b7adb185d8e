//! Interactive session state: current settings and the poem feed.

use muse_core::EmotionProfile;
use std::path::PathBuf;

/// One composed poem as shown in the feed.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub topic: String,
    pub style: String,
    pub text: String,
    pub emotions: EmotionProfile,
    /// Local `HH:MM` when the poem was composed.
    pub time: String,
    pub filepath: Option<PathBuf>,
}

/// Poem feed, newest first.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<SessionEntry>,
}

impl History {
    pub fn push(&mut self, entry: SessionEntry) {
        self.entries.insert(0, entry);
    }

    /// Index 0 is the most recent poem.
    pub fn get(&self, index: usize) -> Option<&SessionEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Settings the user can change between poems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub style: String,
    pub use_mock: bool,
    pub archive: bool,
}
