use crate::core::error::SessionError;
use std::io::{self, BufRead, Write};

/// Line-oriented console the session flows talk to
pub trait Terminal {
    /// Print `message` without a newline and read one reply
    ///
    /// The reply is trimmed. End of input yields
    /// [`SessionError::Interrupted`].
    fn prompt(&mut self, message: &str) -> Result<String, SessionError>;

    /// Print one line
    fn say(&mut self, message: &str) -> Result<(), SessionError>;
}

/// Terminal over any reader/writer pair, stdin/stdout by default
pub struct StdTerminal<R, W> {
    input: R,
    output: W,
}

impl StdTerminal<io::StdinLock<'static>, io::Stdout> {
    pub fn new() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl Default for StdTerminal<io::StdinLock<'static>, io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdTerminal<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Terminal for StdTerminal<R, W> {
    fn prompt(&mut self, message: &str) -> Result<String, SessionError> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SessionError::Interrupted);
        }

        Ok(line.trim().to_string())
    }

    fn say(&mut self, message: &str) -> Result<(), SessionError> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}

/// Terminal fed from a fixed list of replies, recording everything shown
#[cfg(test)]
pub struct ScriptedTerminal {
    replies: std::collections::VecDeque<String>,
    pub transcript: Vec<String>,
}

#[cfg(test)]
impl ScriptedTerminal {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn count(&self, needle: &str) -> usize {
        self.transcript.iter().filter(|line| line.contains(needle)).count()
    }

    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

#[cfg(test)]
impl Terminal for ScriptedTerminal {
    fn prompt(&mut self, message: &str) -> Result<String, SessionError> {
        self.transcript.push(message.to_string());
        match self.replies.pop_front() {
            Some(reply) => Ok(reply.trim().to_string()),
            None => Err(SessionError::Interrupted),
        }
    }

    fn say(&mut self, message: &str) -> Result<(), SessionError> {
        self.transcript.push(message.to_string());
        Ok(())
    }
}
