//! Line-oriented interactive session.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::app::{App, HELP, Reply, SessionCommand};

const PROMPT: &str = "muse> ";

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> Result<()> {
    writer.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        writer.write_all(b"\n").await?;
    }
    Ok(())
}

/// Reads commands until `/quit` or end of input.
pub async fn run<R, W>(app: &mut App, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_line(
        &mut writer,
        &format!(
            "The Poetry Muse. Style: {} | Model: {} | Mock: {}",
            app.settings.style,
            app.muse.model(),
            app.settings.use_mock
        ),
    )
    .await?;
    write_line(&mut writer, HELP).await?;

    let mut lines = reader.lines();
    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        debug!(input = %line, "Session input");

        let reply = match SessionCommand::parse(&line) {
            Ok(command) => app.execute(command).await,
            Err(message) => Reply::Text(message),
        };
        match reply {
            Reply::Text(text) => write_line(&mut writer, &text).await?,
            Reply::Nothing => {}
            Reply::Quit => break,
        }
    }

    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Archive;
    use crate::session::SessionSettings;
    use muse_core::llm_client::{GenerationError, GenerationRequest, PoemGenerator};
    use muse_core::speech::NullBackend;
    use muse_core::{Muse, Speaker};
    use std::sync::Arc;
    use tokio::io::BufReader;

    struct Echo;

    #[async_trait::async_trait]
    impl PoemGenerator for Echo {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            Ok(format!("{} wrote of sunlight", request.model))
        }
    }

    async fn session(input: &str, dir: &std::path::Path) -> (App, String) {
        let mut app = App::new(
            Muse::new(Arc::new(Echo), "mistral:latest"),
            Speaker::new(Arc::new(NullBackend)),
            Archive::new(dir),
            SessionSettings {
                style: "Shakespearean".to_string(),
                use_mock: false,
                archive: false,
            },
        );
        let mut out = Vec::new();
        run(&mut app, BufReader::new(input.as_bytes()), &mut out)
            .await
            .unwrap();
        (app, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_session_composes_until_quit() {
        let tmp = tempfile::tempdir().unwrap();
        let (app, out) = session(
            "\n/model llama3\nautumn leaves\n/nonsense\n/quit\nnever read\n",
            tmp.path(),
        )
        .await;

        assert!(out.starts_with("The Poetry Muse. Style: Shakespearean | Model: mistral:latest"));
        assert!(out.contains("Switched to llama3"));
        assert!(out.contains("Untitled 'autumn leaves'"));
        assert!(out.contains("> llama3 wrote of sunlight"));
        assert!(out.contains("Unknown command '/nonsense'"));
        assert!(out.contains("Local file: Not saved"));
        assert_eq!(app.history.len(), 1);
    }

    #[tokio::test]
    async fn test_session_ends_at_eof() {
        let tmp = tempfile::tempdir().unwrap();
        let (app, out) = session("/mock on\nrain", tmp.path()).await;
        assert!(out.contains("Engine mode: Mock Mode (Test)"));
        assert_eq!(
            app.history.get(0).unwrap().text,
            "(Mock Shakespearean Poem about rain)\nIn the digital void,\nWeaving codes of light and sound,\nThe system awakens."
        );
    }
}
