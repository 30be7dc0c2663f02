//! Webhook authentication and event filtering.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::domain::models::Issue;

/// `issues` event actions that trigger a reconciliation
pub const ADMITTED_ACTIONS: [&str; 8] = [
    "opened",
    "edited",
    "transferred",
    "reopened",
    "assigned",
    "unassigned",
    "labeled",
    "unlabeled",
];

/// The parts of an inbound webhook request the gate looks at
#[derive(Debug, Clone, Copy)]
pub struct WebhookRequest<'a> {
    /// `X-GitHub-Event` header
    pub event: Option<&'a str>,
    /// `algorithm=hexdigest` signature header
    pub signature: Option<&'a str>,
    /// Raw request body, exactly as received
    pub body: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Missing or invalid signature
    Forbidden,
    /// Event type this service does not handle
    UnknownEvent,
    /// Body could not be decoded as an issues event
    MalformedPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Rejected(Rejection),
    /// Authentic but nothing to do (ping, uninteresting action)
    Ignored,
    Admit(Box<Issue>),
}

/// HMAC algorithms GitHub signs deliveries with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "sha1" => Some(Self::Sha1),
            "sha256" => Some(Self::Sha256),
            _ => None,
        }
    }
}

/// Hex-encoded HMAC of `body` keyed with `secret`
pub fn sign(secret: &[u8], body: &[u8], algorithm: SignatureAlgorithm) -> Option<String> {
    let digest = match algorithm {
        SignatureAlgorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(secret).ok()?;
            mac.update(body);
            mac.finalize().into_bytes().to_vec()
        }
        SignatureAlgorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret).ok()?;
            mac.update(body);
            mac.finalize().into_bytes().to_vec()
        }
    };
    Some(hex::encode(digest))
}

#[derive(Deserialize)]
struct IssuesEvent {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    issue: Option<Issue>,
}

/// Decides whether an inbound webhook reaches the reconciler
///
/// Without a secret every request is considered authentic.
#[derive(Debug, Clone, Default)]
pub struct WebhookGate {
    secret: Option<String>,
}

impl WebhookGate {
    pub const fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    pub const fn verifies_signatures(&self) -> bool {
        self.secret.is_some()
    }

    pub fn admit(&self, request: &WebhookRequest<'_>) -> Verdict {
        if !self.authentic(request) {
            warn!("rejecting webhook with missing or invalid signature");
            return Verdict::Rejected(Rejection::Forbidden);
        }

        match request.event {
            Some("ping") => Verdict::Ignored,
            Some("issues") => Self::filter_issues_event(request.body),
            other => {
                debug!(event = ?other, "unhandled webhook event");
                Verdict::Rejected(Rejection::UnknownEvent)
            }
        }
    }

    fn authentic(&self, request: &WebhookRequest<'_>) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            return true;
        };
        let Some((algorithm, supplied)) = request.signature.and_then(|s| s.split_once('=')) else {
            return false;
        };
        let Some(algorithm) = SignatureAlgorithm::parse(algorithm) else {
            return false;
        };

        let Some(computed) = sign(secret.as_bytes(), request.body, algorithm) else {
            return false;
        };
        computed.as_bytes().ct_eq(supplied.as_bytes()).into()
    }

    fn filter_issues_event(body: &[u8]) -> Verdict {
        let Ok(event) = serde_json::from_slice::<IssuesEvent>(body) else {
            return Verdict::Rejected(Rejection::MalformedPayload);
        };

        let action = event.action.unwrap_or_default();
        if !ADMITTED_ACTIONS.contains(&action.as_str()) {
            debug!(action, "ignoring issues event");
            return Verdict::Ignored;
        }

        event.issue.map_or(
            Verdict::Rejected(Rejection::MalformedPayload),
            |issue| Verdict::Admit(Box::new(issue)),
        )
    }
}
