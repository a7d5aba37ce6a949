//! Interactive operator input.

use crate::tools::base::{Tool, ToolError};
use async_trait::async_trait;
use fx_protocol::query_models::UserQuery;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

struct PromptIo {
    reader: Box<dyn BufRead + Send>,
    writer: Box<dyn Write + Send>,
}

/// Asks the operator for one line of text.
///
/// The call blocks the whole pipeline until a line arrives; there is no
/// timeout, default value, or validation. The line is returned verbatim
/// apart from its trailing line terminator.
///
/// As a [`Tool`], the blocking read runs on tokio's blocking pool.
pub struct UserPromptTool {
    prompt: String,
    io: Arc<Mutex<PromptIo>>,
}

impl UserPromptTool {
    /// Prompt on stderr, read from stdin. Stdout stays free for the report.
    pub fn stdio(prompt: impl Into<String>) -> Self {
        Self::with_io(
            prompt,
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stderr()),
        )
    }

    /// Prompt on `writer`, read from `reader`.
    pub fn with_io(
        prompt: impl Into<String>,
        reader: Box<dyn BufRead + Send>,
        writer: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            io: Arc::new(Mutex::new(PromptIo { reader, writer })),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Prompt and read one line on the calling thread.
    pub fn ask(&self) -> Result<UserQuery, ToolError> {
        read_answer(&self.prompt, &self.io)
    }
}

fn read_answer(prompt: &str, io: &Mutex<PromptIo>) -> Result<UserQuery, ToolError> {
    let mut io = io
        .lock()
        .map_err(|_| ToolError::Input("prompt streams are poisoned".to_string()))?;

    let io = &mut *io;
    write!(io.writer, "{prompt}: ")
        .map_err(|e| ToolError::Input(format!("failed to write prompt: {e}")))?;
    io.writer
        .flush()
        .map_err(|e| ToolError::Input(format!("failed to write prompt: {e}")))?;

    let mut line = String::new();
    let read = io
        .reader
        .read_line(&mut line)
        .map_err(|e| ToolError::Input(format!("failed to read input: {e}")))?;
    if read == 0 {
        return Err(ToolError::Input("end of input".to_string()));
    }

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(UserQuery::new(line))
}

#[async_trait]
impl Tool for UserPromptTool {
    type Input = ();
    type Output = UserQuery;

    fn name(&self) -> &'static str {
        "user_prompt"
    }

    async fn call(&self, _input: ()) -> Result<UserQuery, ToolError> {
        let prompt = self.prompt.clone();
        let io = Arc::clone(&self.io);
        tokio::task::spawn_blocking(move || read_answer(&prompt, &io))
            .await
            .map_err(|e| ToolError::Input(format!("prompt task failed: {e}")))?
    }
}
