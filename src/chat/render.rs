//! Simulated typing for assistant replies.

use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Reveals text one character at a time with a fixed delay.
///
/// Purely cosmetic: the full text is always written.
#[derive(Debug, Clone, Copy)]
pub struct TypingRenderer {
    delay: Duration,
}

impl TypingRenderer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Write everything at once
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Write `text` followed by a newline
    pub async fn render<W>(&self, out: &mut W, text: &str) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        if self.delay.is_zero() {
            out.write_all(text.as_bytes()).await?;
        } else {
            let mut buf = [0u8; 4];
            for c in text.chars() {
                out.write_all(c.encode_utf8(&mut buf).as_bytes()).await?;
                out.flush().await?;
                tokio::time::sleep(self.delay).await;
            }
        }
        out.write_all(b"\n").await?;
        out.flush().await
    }
}
