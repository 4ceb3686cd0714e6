//! Templated outreach to the top of a ranked lead set.
//!
//! Each row is handled independently: a render failure, a missing recipient or
//! a rejected delivery marks that row as failed and the loop moves on.

use tracing::{info, warn};

use crate::domain::RankedLeadSet;

pub mod messenger;
pub mod template;

pub use messenger::{Messenger, OutboxMessenger, Unconfigured, messenger_from_config};
pub use template::{MissingFields, Template};

/// Default subject line for outreach messages.
pub const DEFAULT_SUBJECT: &str = "Quick idea for your team";

/// Default outreach body.
pub const DEFAULT_TEMPLATE: &str = "Hi {name},\n\n\
I came across {company} and thought we could help automate your lead management and increase conversions.\n\
If you're open to it, I'd love to schedule a quick 15-minute call to share relevant use-cases for {industry}.\n\n\
Best,\nThe Sales Team";

/// What happened to one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    /// The messenger rejected the message (or is not configured).
    Rejected,
    /// The template could not be rendered for this row.
    RenderFailed(MissingFields),
    /// The row has no `email` value.
    NoRecipient,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    pub rank: usize,
    pub recipient: Option<String>,
    pub outcome: Outcome,
}

/// Per-row outcomes plus the aggregate counts.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub rows: Vec<RowOutcome>,
    /// Rows whose template rendered.
    pub rendered: usize,
    /// Messages accepted by the messenger. This is the success count.
    pub delivered: usize,
    pub configured: bool,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.rows.len()
    }

    pub fn failed(&self) -> usize {
        self.rows.len() - self.delivered
    }
}

/// Render `template` for the top `k` leads and hand each message to `messenger`.
pub fn dispatch(
    ranked: &RankedLeadSet,
    k: usize,
    template: &Template,
    subject: &str,
    messenger: &dyn Messenger,
) -> DispatchReport {
    let configured = messenger.is_configured();
    if !configured {
        warn!("messaging is not configured; every send will be a no-op failure");
    }

    let mut rows = Vec::with_capacity(k.min(ranked.len()));
    let mut rendered = 0;
    let mut delivered = 0;

    for lead in ranked.top(k) {
        let recipient = lead.record.email().map(str::to_string);
        let outcome = match template.render(&lead.field_map()) {
            Err(missing) => {
                warn!(rank = lead.rank, error = %missing, "skipping lead: template render failed");
                Outcome::RenderFailed(missing)
            }
            Ok(body) => {
                rendered += 1;
                match recipient.as_deref() {
                    None => {
                        warn!(rank = lead.rank, "skipping lead: no email address");
                        Outcome::NoRecipient
                    }
                    Some(to) if messenger.send(to, subject, &body) => {
                        delivered += 1;
                        Outcome::Delivered
                    }
                    Some(_) => Outcome::Rejected,
                }
            }
        };
        rows.push(RowOutcome {
            rank: lead.rank,
            recipient,
            outcome,
        });
    }

    info!(attempted = rows.len(), rendered, delivered, "outreach dispatch finished");
    DispatchReport {
        rows,
        rendered,
        delivered,
        configured,
    }
}
