//! The compose pipeline and session command handling shared by every
//! front end: generate, score, archive, record, and read aloud.

use chrono::Local;
use muse_core::emotion::{self, EmotionProfile};
use muse_core::style::StylePersona;
use muse_core::{Muse, SpeechJob, Speaker};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::archive::{self, Archive, ArchiveRecord};
use crate::render;
use crate::session::{History, SessionEntry, SessionSettings};

/// The outcome of composing one poem.
#[derive(Debug, Clone, Serialize)]
pub struct Composition {
    pub topic: String,
    pub style: String,
    /// Poem text, or the failure message rendered in its place.
    pub poem: String,
    /// False when `poem` carries a generation failure.
    pub ok: bool,
    pub emotions: EmotionProfile,
    pub archive_path: Option<PathBuf>,
    pub archive_error: Option<String>,
}

/// A parsed session input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Compose(String),
    Style(String),
    Model(String),
    Mock(bool),
    History,
    Speak(usize),
    Stop,
    Export(usize, PathBuf),
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
Type a topic to compose a poem, or one of:
  /style <label>       switch persona (Shakespearean, Cyberpunk, Haiku Master, Surrealist)
  /model <name>        switch Ollama model
  /mock on|off         toggle mock mode
  /history             show composed poems, newest first
  /speak [n]           read poem n aloud (0 = newest)
  /stop                stop the current reading
  /export <n> <path>   save a copy of poem n
  /help                show this message
  /quit                leave";

fn parse_index(arg: Option<&str>) -> Result<usize, String> {
    match arg {
        None => Ok(0),
        Some(s) => s
            .parse::<usize>()
            .map_err(|_| format!("'{}' is not a poem number", s)),
    }
}

impl SessionCommand {
    /// Parses one line of input. Lines not starting with `/` are topics.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Self::Compose(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let arg = (!arg.is_empty()).then_some(arg);

        match name {
            "style" => arg
                .map(|a| Self::Style(a.to_string()))
                .ok_or_else(|| "usage: /style <label>".to_string()),
            "model" => arg
                .map(|a| Self::Model(a.to_string()))
                .ok_or_else(|| "usage: /model <name>".to_string()),
            "mock" => match arg {
                Some("on") => Ok(Self::Mock(true)),
                Some("off") => Ok(Self::Mock(false)),
                _ => Err("usage: /mock on|off".to_string()),
            },
            "history" => Ok(Self::History),
            "speak" => parse_index(arg).map(Self::Speak),
            "stop" => Ok(Self::Stop),
            "export" => {
                let (index, path) = arg
                    .and_then(|a| a.split_once(char::is_whitespace))
                    .ok_or_else(|| "usage: /export <n> <path>".to_string())?;
                Ok(Self::Export(parse_index(Some(index))?, PathBuf::from(path.trim())))
            }
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("Unknown command '/{}'. Type /help.", other)),
        }
    }
}

/// What the front end should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Nothing,
    Quit,
}

/// Application state for one user.
pub struct App {
    pub muse: Muse,
    pub speaker: Speaker,
    pub archive: Archive,
    pub settings: SessionSettings,
    pub history: History,
    last_job: Option<SpeechJob>,
}

impl App {
    pub fn new(muse: Muse, speaker: Speaker, archive: Archive, settings: SessionSettings) -> Self {
        Self {
            muse,
            speaker,
            archive,
            settings,
            history: History::default(),
            last_job: None,
        }
    }

    /// Generates, scores, and archives a poem on `topic`, then records it.
    pub async fn compose(&mut self, topic: &str) -> Composition {
        let style = self.settings.style.clone();
        let (poem, ok) = match self.muse.compose(topic, &style, self.settings.use_mock).await {
            Ok(poem) => (poem, true),
            Err(e) => {
                warn!(error = %e, "Poem generation failed");
                (e.to_string(), false)
            }
        };
        let emotions = emotion::score(&poem);

        let (archive_path, archive_error) = if self.settings.archive {
            match self.archive.save(&ArchiveRecord::new(topic, &style, &poem)) {
                Ok(path) => (Some(path), None),
                Err(e) => {
                    error!(error = %e, "Could not archive poem");
                    (None, Some(e.to_string()))
                }
            }
        } else {
            (None, None)
        };

        self.history.push(SessionEntry {
            topic: topic.to_string(),
            style: style.clone(),
            text: poem.clone(),
            emotions,
            time: Local::now().format("%H:%M").to_string(),
            filepath: archive_path.clone(),
        });

        Composition {
            topic: topic.to_string(),
            style,
            poem,
            ok,
            emotions,
            archive_path,
            archive_error,
        }
    }

    /// Starts reading `text` aloud; the previous reading, if any, keeps going.
    pub fn speak(&mut self, text: &str) {
        self.last_job = Some(self.speaker.speak(text));
    }

    /// Takes the most recent speech job, leaving none behind.
    pub fn take_last_job(&mut self) -> Option<SpeechJob> {
        self.last_job.take()
    }

    pub async fn execute(&mut self, command: SessionCommand) -> Reply {
        match command {
            SessionCommand::Empty => Reply::Nothing,
            SessionCommand::Quit => Reply::Quit,
            SessionCommand::Help => Reply::Text(HELP.to_string()),
            SessionCommand::Compose(topic) => {
                let composition = self.compose(&topic).await;
                let mut text = match self.history.get(0) {
                    Some(entry) => render::entry_card(0, entry),
                    None => composition.poem.clone(),
                };
                if let Some(path) = &composition.archive_path {
                    text.push_str(&format!("Archived to {}\n", path.display()));
                }
                if let Some(err) = &composition.archive_error {
                    text.push_str(&format!("Could not save file: {}\n", err));
                }
                Reply::Text(text)
            }
            SessionCommand::Style(label) => {
                let text = match StylePersona::from_label(&label) {
                    Some(persona) => format!("Style: {}", persona),
                    None => format!(
                        "Unknown style '{}'; poems will use the default instruction.",
                        label
                    ),
                };
                self.settings.style = label;
                Reply::Text(text)
            }
            SessionCommand::Model(name) => {
                self.muse.set_model(name.clone());
                Reply::Text(format!("Switched to {}", name))
            }
            SessionCommand::Mock(on) => {
                self.settings.use_mock = on;
                Reply::Text(if on {
                    "Engine mode: Mock Mode (Test)".to_string()
                } else {
                    "Engine mode: Ollama (Local AI)".to_string()
                })
            }
            SessionCommand::History => {
                if self.history.is_empty() {
                    return Reply::Text("Enter a topic above to begin co-creating.".to_string());
                }
                let cards: Vec<_> = self
                    .history
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| render::entry_card(i, entry))
                    .collect();
                Reply::Text(cards.join("\n"))
            }
            SessionCommand::Speak(index) => match self.history.get(index) {
                Some(entry) => {
                    let text = entry.text.clone();
                    info!(index, "Reading poem aloud");
                    self.speak(&text);
                    Reply::Text(format!("Reading poem {} aloud.", index))
                }
                None => Reply::Text(format!("No poem number {}.", index)),
            },
            SessionCommand::Stop => match self.last_job.take() {
                Some(job) => {
                    job.cancel();
                    Reply::Text("Stopped reading.".to_string())
                }
                None => Reply::Text("Nothing is being read.".to_string()),
            },
            SessionCommand::Export(index, path) => match self.history.get(index) {
                Some(entry) => {
                    let body = archive::export_text(&entry.topic, &entry.style, &entry.text);
                    match std::fs::write(&path, body) {
                        Ok(()) => Reply::Text(format!("Saved a copy to {}", path.display())),
                        Err(e) => Reply::Text(format!("Could not save file: {}", e)),
                    }
                }
                None => Reply::Text(format!("No poem number {}.", index)),
            },
        }
    }
}
