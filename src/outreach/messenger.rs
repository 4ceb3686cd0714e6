//! Delivery collaborators.
//!
//! The dispatcher only needs `send(recipient, subject, body) -> bool`. Delivery
//! problems are reported through the return value, never as errors, so one bad
//! recipient cannot stop a batch.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::OutreachConfig;

/// Something that can deliver a rendered message.
pub trait Messenger {
    /// Attempt delivery. Returns `true` only if the message was accepted.
    fn send(&self, recipient: &str, subject: &str, body: &str) -> bool;

    /// Whether delivery credentials/targets are present at all.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Stand-in used when no delivery target is configured: every send fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl Messenger for Unconfigured {
    fn send(&self, recipient: &str, _subject: &str, _body: &str) -> bool {
        debug!(recipient, "messaging not configured; skipping send");
        false
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Writes each message as an RFC 5322-style text file into an outbox directory,
/// for a relay (or a human) to pick up.
#[derive(Debug)]
pub struct OutboxMessenger {
    dir: PathBuf,
    sender_name: String,
    sender_email: String,
    seq: AtomicUsize,
}

impl OutboxMessenger {
    pub fn new(dir: impl Into<PathBuf>, sender_name: impl Into<String>, sender_email: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            sender_name: sender_name.into(),
            sender_email: sender_email.into(),
            seq: AtomicUsize::new(0),
        }
    }

    /// Outbox file name for message number `n` (1-based).
    fn message_path(&self, n: usize) -> PathBuf {
        self.dir.join(format!("{}-{n:04}.eml", Utc::now().format("%Y%m%dT%H%M%S")))
    }

    fn write_message(&self, recipient: &str, subject: &str, body: &str) -> std::io::Result<PathBuf> {
        create_dir_all(&self.dir)?;
        let n = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let path = self.message_path(n);
        let mut file = File::create(&path)?;
        writeln!(file, "From: {} <{}>", self.sender_name, self.sender_email)?;
        writeln!(file, "To: {recipient}")?;
        writeln!(file, "Subject: {subject}")?;
        writeln!(file, "Date: {}", Utc::now().to_rfc2822())?;
        writeln!(file, "Content-Type: text/plain; charset=utf-8")?;
        writeln!(file)?;
        file.write_all(body.as_bytes())?;
        if !body.ends_with('\n') {
            writeln!(file)?;
        }
        Ok(path)
    }
}

impl Messenger for OutboxMessenger {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> bool {
        if !recipient.contains('@') {
            warn!(recipient, "rejecting recipient without an address");
            return false;
        }
        match self.write_message(recipient, subject, body) {
            Ok(path) => {
                debug!(recipient, path = %path.display(), "queued message");
                true
            }
            Err(e) => {
                warn!(recipient, error = %e, "failed to write outbox message");
                false
            }
        }
    }
}

/// Pick the messenger for the given outreach settings.
pub fn messenger_from_config(config: &OutreachConfig) -> Box<dyn Messenger> {
    match (&config.outbox_dir, &config.sender_email) {
        (Some(dir), Some(email)) => Box::new(OutboxMessenger::new(dir, config.sender_name.clone(), email.clone())),
        _ => Box::new(Unconfigured),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_always_fails() {
        let m = Unconfigured;
        assert!(!m.is_configured());
        assert!(!m.send("a@b.c", "s", "b"));
    }

    #[test]
    fn outbox_writes_one_file_per_message() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().join("outbox");
        let m = OutboxMessenger::new(&outbox, "Lead Scorer", "sdr@example.com");

        assert!(m.send("asha@acme.io", "Hello", "Body text"));
        assert!(m.send("ben@globex.com", "Hello", "Second\n"));
        assert!(!m.send("not-an-address", "Hello", "x"));

        let mut files: Vec<PathBuf> = std::fs::read_dir(&outbox)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        files.sort();
        assert_eq!(files.len(), 2);

        let first = std::fs::read_to_string(&files[0]).unwrap();
        assert!(first.contains("From: Lead Scorer <sdr@example.com>"));
        assert!(first.contains("To: asha@acme.io"));
        assert!(first.ends_with("Body text\n"));
    }

    #[test]
    fn config_selects_messenger() {
        let mut cfg = OutreachConfig::default();
        assert!(!messenger_from_config(&cfg).is_configured());

        cfg.outbox_dir = Some(PathBuf::from("outbox"));
        assert!(!messenger_from_config(&cfg).is_configured());

        cfg.sender_email = Some("sdr@example.com".to_string());
        assert!(messenger_from_config(&cfg).is_configured());
    }
}
