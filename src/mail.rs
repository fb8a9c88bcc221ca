use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use crate::domain::EmailPayload;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub message_id: String,
    pub detail: String,
}

/// Hands a composed payload to a delivery mechanism. The core never
/// retries; a transport failure surfaces as `Error::Transport`.
pub trait MailTransport {
    fn send(&self, payload: &EmailPayload) -> Result<DeliveryReceipt>;
}

/// Writes each message as an RFC822-style `.eml` file into an outbox
/// directory, from where the actual mail submission happens out-of-band.
pub struct OutboxTransport {
    dir: PathBuf,
}

impl OutboxTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl MailTransport for OutboxTransport {
    fn send(&self, payload: &EmailPayload) -> Result<DeliveryReceipt> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| Error::Transport(format!("create outbox {}: {e}", self.dir.display())))?;

        let message_id = Uuid::new_v4().to_string();
        let path = self.dir.join(format!("{message_id}.eml"));

        let boundary = format!("----incasso-{message_id}");
        let mut raw = String::new();
        raw.push_str(&format!("From: {}\r\n", payload.from));
        raw.push_str(&format!("To: {}\r\n", payload.to));
        raw.push_str(&format!("Subject: {}\r\n", payload.subject));
        raw.push_str("MIME-Version: 1.0\r\n");
        raw.push_str(&format!(
            "Content-Type: multipart/alternative; boundary=\"{boundary}\"\r\n\r\n"
        ));
        raw.push_str(&format!("--{boundary}\r\n"));
        raw.push_str("Content-Type: text/plain; charset=utf-8\r\n\r\n");
        raw.push_str(&payload.text);
        raw.push_str(&format!("\r\n\r\n--{boundary}\r\n"));
        raw.push_str("Content-Type: text/html; charset=utf-8\r\n\r\n");
        raw.push_str(&payload.html);
        raw.push_str(&format!("\r\n\r\n--{boundary}--\r\n"));

        fs::write(&path, raw)
            .map_err(|e| Error::Transport(format!("write {}: {e}", path.display())))?;

        Ok(DeliveryReceipt {
            message_id,
            detail: path.display().to_string(),
        })
    }
}
