//! Terminal rendering for poems and their emotion charts.

use muse_core::EmotionProfile;
use std::fmt::Write;

use crate::session::SessionEntry;

/// Width of a bar at 100%.
const BAR_WIDTH: usize = 30;

/// One row per category: label, proportional bar, and `{:.1}%`.
pub fn emotion_chart(profile: &EmotionProfile) -> String {
    let mut out = String::new();
    for (emotion, pct) in profile.iter() {
        let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        let _ = writeln!(
            out,
            "{:<10} {}{} {:>5.1}%",
            emotion.label(),
            "█".repeat(filled),
            "░".repeat(BAR_WIDTH - filled),
            pct
        );
    }
    out
}

/// Poem lines, each quoted with `> `.
pub fn quote(text: &str) -> String {
    text.lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A full feed card: heading, caption, poem, chart, and archive location.
pub fn entry_card(index: usize, entry: &SessionEntry) -> String {
    let file = entry
        .filepath
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "Not saved".to_string());
    format!(
        "[{index}] Untitled '{}'\nStyle: {} | Time: {}\n\n{}\n\nEmotional Composition\n{}Local file: {}\n",
        entry.topic,
        entry.style,
        entry.time,
        quote(&entry.text),
        emotion_chart(&entry.emotions),
        file
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use muse_core::emotion::score;
    use std::path::PathBuf;

    #[test]
    fn test_uniform_chart() {
        let chart = emotion_chart(&score(""));
        let lines: Vec<_> = chart.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Joy "));
        assert!(lines[3].starts_with("Serenity "));
        for line in &lines {
            assert!(line.ends_with(" 25.0%"), "line {line:?}");
            assert_eq!(line.matches('█').count(), 8);
        }
    }

    #[test]
    fn test_chart_percentages_one_decimal() {
        let chart = emotion_chart(&score("light light love"));
        assert!(chart.lines().next().unwrap().ends_with(" 57.1%"));
        assert!(chart.lines().nth(1).unwrap().ends_with(" 14.3%"));
    }

    #[test]
    fn test_quote_prefixes_each_line() {
        assert_eq!(quote("a\nb"), "> a\n> b");
    }

    #[test]
    fn test_entry_card() {
        let entry = SessionEntry {
            topic: "rain".to_string(),
            style: "Surrealist".to_string(),
            text: "clocks drip".to_string(),
            emotions: score("clocks drip"),
            time: "21:07".to_string(),
            filepath: Some(PathBuf::from("poems/rain_20260101_210700.txt")),
        };
        let card = entry_card(2, &entry);
        assert!(card.starts_with("[2] Untitled 'rain'\nStyle: Surrealist | Time: 21:07\n"));
        assert!(card.contains("> clocks drip"));
        assert!(card.contains("Local file: poems/rain_20260101_210700.txt"));

        let unsaved = SessionEntry {
            filepath: None,
            ..entry
        };
        assert!(entry_card(0, &unsaved).contains("Local file: Not saved"));
    }
}
