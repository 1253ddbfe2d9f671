//! # Line Loop
//!
//! Reads one call per line, runs it through a [`Session`] and prints the rendered reply. Errors
//! never end the loop; only `exit` or the end of input does.

use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;

use ctrpc::Session;
use ctrpc::Transport;

const PROMPT: &str = ">> ";
const GOODBYE: &str = "Goodbye!";
const COMPLETE: &str = ":complete";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Blank,
    Exit,
    Complete(&'a str),
    Call(&'a str),
}

impl<'a> Command<'a> {
    fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Blank;
        }
        if trimmed == "exit" {
            return Command::Exit;
        }
        // trailing whitespace is meaningful to completion, so only the command word is trimmed
        if let Some(rest) = line.trim_start().strip_prefix(COMPLETE) {
            if rest.is_empty() || rest.starts_with(' ') {
                return Command::Complete(rest.strip_prefix(' ').unwrap_or(rest));
            }
        }
        Command::Call(trimmed)
    }
}

/// Runs the loop until `exit` or end of input.
pub async fn run<T, R, W>(session: &Session<T>, input: R, mut out: W, prompt: bool) -> anyhow::Result<()>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        if prompt {
            out.write_all(PROMPT.as_bytes()).await?;
            out.flush().await?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let response = match Command::classify(&line) {
            Command::Blank => continue,
            Command::Exit => break,
            Command::Complete(text) => session.complete(text),
            Command::Call(text) => match session.execute(text).await {
                Ok(reply) => reply.to_string(),
                Err(e) => {
                    tracing::debug!(line = text, error = ?e, "call failed");
                    format!("Error: {}", e)
                }
            },
        };
        out.write_all(response.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
    }

    out.write_all(GOODBYE.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}
