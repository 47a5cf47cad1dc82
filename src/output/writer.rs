//! Message sinks

use super::message::Message;
use crate::error::Result;
use std::io::Write;

/// Destination for emitted messages
pub trait MessageSink {
    /// Emit one message
    fn emit(&mut self, message: Message) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Collects messages in memory
impl MessageSink for Vec<Message> {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.push(message);
        Ok(())
    }
}

/// Writes messages as JSON lines.
///
/// Output is flushed after every STATE message so a consumer never sees a
/// state ahead of the records it covers.
#[derive(Debug)]
pub struct MessageWriter<W: Write> {
    writer: W,
    messages_written: u64,
}

impl<W: Write> MessageWriter<W> {
    /// Create a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            messages_written: 0,
        }
    }

    /// Number of messages written so far
    pub fn messages_written(&self) -> u64 {
        self.messages_written
    }

    /// Recover the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MessageSink for MessageWriter<W> {
    fn emit(&mut self, message: Message) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &message)?;
        self.writer.write_all(b"\n")?;
        self.messages_written += 1;

        if message.is_state() {
            self.writer.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
