//! Keyword Emotion Scoring
//!
//! Assigns a poem a four-category "emotional" composition from plain keyword
//! counts. This is a deterministic tally, not sentiment analysis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four scored categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Joy,
    Melancholy,
    Chaos,
    Serenity,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [
        Emotion::Joy,
        Emotion::Melancholy,
        Emotion::Chaos,
        Emotion::Serenity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Joy => "Joy",
            Emotion::Melancholy => "Melancholy",
            Emotion::Chaos => "Chaos",
            Emotion::Serenity => "Serenity",
        }
    }

    /// Lower-case substrings counted toward this category.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Emotion::Joy => &["light", "love", "sun", "hope"],
            Emotion::Melancholy => &["dark", "rain", "lost", "gray"],
            Emotion::Chaos => &["neon", "crash", "burn", "scream"],
            Emotion::Serenity => &["leaf", "quiet", "flow", "peace"],
        }
    }

    fn index(self) -> usize {
        match self {
            Emotion::Joy => 0,
            Emotion::Melancholy => 1,
            Emotion::Chaos => 2,
            Emotion::Serenity => 3,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Added to every raw count so no category is ever zero.
const SCORE_FLOOR: usize = 1;

/// Percentage share of each category. The four values sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionProfile {
    #[serde(rename = "Joy")]
    pub joy: f64,
    #[serde(rename = "Melancholy")]
    pub melancholy: f64,
    #[serde(rename = "Chaos")]
    pub chaos: f64,
    #[serde(rename = "Serenity")]
    pub serenity: f64,
}

impl EmotionProfile {
    fn from_raw(raw: [usize; 4]) -> Self {
        let total: usize = raw.iter().sum();
        let pct = |v: usize| (v as f64 / total as f64) * 100.0;
        Self {
            joy: pct(raw[0]),
            melancholy: pct(raw[1]),
            chaos: pct(raw[2]),
            serenity: pct(raw[3]),
        }
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Joy => self.joy,
            Emotion::Melancholy => self.melancholy,
            Emotion::Chaos => self.chaos,
            Emotion::Serenity => self.serenity,
        }
    }

    /// Category/percentage pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.into_iter().map(|e| (e, self.get(e)))
    }

    /// The highest-scoring category. Ties go to the earlier one in display order.
    pub fn dominant(&self) -> Emotion {
        self.iter()
            .fold((Emotion::Joy, f64::MIN), |best, (e, v)| {
                if v > best.1 { (e, v) } else { best }
            })
            .0
    }
}

/// Raw floored keyword counts, indexed in display order.
pub fn raw_scores(text: &str) -> [usize; 4] {
    let lower = text.to_lowercase();
    let mut raw = [SCORE_FLOOR; 4];
    for emotion in Emotion::ALL {
        // `matches` scans left to right without overlap.
        raw[emotion.index()] += emotion
            .keywords()
            .iter()
            .map(|kw| lower.matches(kw).count())
            .sum::<usize>();
    }
    raw
}

/// Scores poem text into an [`EmotionProfile`].
pub fn score(text: &str) -> EmotionProfile {
    EmotionProfile::from_raw(raw_scores(text))
}
