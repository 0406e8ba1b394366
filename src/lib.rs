#[macro_use]
mod macros;

pub mod cli;
pub mod codes;
pub mod reason;
pub mod spam;

pub use codes::{BounceReason, BounceType, ReasonInfo, Specificity, UnknownStatusCode};
pub use reason::find_reason;
pub use spam::spam_score;

use mail_parser::{Message, MessageParser, MimeHeaders};
use std::collections::HashMap;
use std::fmt;

/// Header access needed by the classifier.
pub trait HeaderLookup {
    /// First value of the header `name`.
    fn first_value(&self, name: &str) -> Option<&str>;
}

/// Case sensitive, as the map keys are.
impl HeaderLookup for HashMap<String, Vec<String>> {
    fn first_value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(String::as_str)
    }
}

/// Top level headers of the message, names compared case insensitive.
impl HeaderLookup for Message<'_> {
    fn first_value(&self, name: &str) -> Option<&str> {
        // first occurrence, name matched ignoring case
        self.parts
            .first()?
            .headers
            .iter()
            .find(|h| h.name.as_str().eq_ignore_ascii_case(name))
            .and_then(|h| h.value.as_text())
    }
}

/// Result of the analysis of a bounce message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analysis {
    pub bounce_type: BounceType,
    pub reason: BounceReason,
    pub spam_score: f64,
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bounce: {} (spam score {})",
            self.bounce_type, self.reason, self.spam_score
        )
    }
}

/// Classifies a bounce from its headers and its decoded text body.
///
/// If no reason is found, `reason` is `BounceReason::NotFound` and the
/// bounce is hard.
pub fn analyze(headers: &(impl HeaderLookup + ?Sized), body: &[u8]) -> Analysis {
    let reason = find_reason(body);
    let analysis = Analysis {
        bounce_type: reason.bounce_type(),
        reason,
        spam_score: spam_score(headers),
    };
    log::debug!(
        "{} bounce, reason {:?}, spam score {}",
        analysis.bounce_type,
        analysis.reason.as_str(),
        analysis.spam_score
    );
    analysis
}

pub struct BounceMessage<'a> {
    pub msg: Message<'a>,
}

impl<'a> BounceMessage<'a> {
    pub fn parse(mail_buffer: &'a [u8]) -> Option<Self> {
        MessageParser::default()
            .parse(mail_buffer)
            .map(|msg| BounceMessage { msg })
    }
    pub fn get_message(&self) -> &Message<'a> {
        &self.msg
    }
    /// All text parts, HTML-only parts converted to text, followed by the
    /// delivery status parts, joined by newlines.
    pub fn get_text(&self) -> String {
        let delivery_status = self
            .msg
            .parts
            .iter()
            .filter(|part| part.is_content_type("message", "delivery-status"))
            .map(|part| String::from_utf8_lossy(part.contents()));
        (0..)
            .map_while(|pos| self.msg.body_text(pos))
            .chain(delivery_status)
            .collect::<Vec<_>>()
            .join("\n")
    }
    pub fn get_subject(&self) -> &str {
        self.msg.subject().unwrap_or("")
    }
    pub fn get_spam_score(&self) -> f64 {
        spam_score(&self.msg)
    }
    pub fn find_reason(&self) -> BounceReason {
        find_reason(self.get_text().as_bytes())
    }
    pub fn analyze(&self) -> Analysis {
        analyze(&self.msg, self.get_text().as_bytes())
    }
}

#[test]
fn test_analyze_empty_body() {
    let headers: HashMap<String, Vec<String>> = HashMap::new();
    let analysis = analyze(&headers, b"");
    assert_eq!(analysis.reason, BounceReason::NotFound);
    assert_eq!(analysis.bounce_type, BounceType::Hard);
    assert_eq!(analysis.spam_score, 0.0);
}

#[test]
fn test_analyze_soft() {
    let mut headers: HashMap<String, Vec<String>> = HashMap::new();
    headers.insert("X-Spam-Score".to_string(), vec!["2.5".to_string()]);
    let body = b"Delivery delayed\nThe reason for the problem:\n421 try again later\n";
    let analysis = analyze(&headers, body);
    assert_eq!(
        analysis,
        Analysis {
            bounce_type: BounceType::Soft,
            reason: BounceReason::ServiceNotAvailable,
            spam_score: 2.5,
        }
    );
}

#[test]
fn test_header_lookup_case() {
    let mut headers: HashMap<String, Vec<String>> = HashMap::new();
    headers.insert("x-spam-score".to_string(), vec!["2.5".to_string()]);
    assert_eq!(headers.first_value("X-Spam-Score"), None);

    let raw = b"X-SPAM-SCORE: 3.5\r\nSubject: test\r\n\r\nbody\r\n";
    let msg = BounceMessage::parse(raw).unwrap();
    assert_eq!(msg.get_message().first_value("X-Spam-Score"), Some("3.5"));
    assert_eq!(msg.get_spam_score(), 3.5);
}

#[test]
fn test_delivery_status_part() {
    let raw = b"From: postmaster@example.org\r\n\
        Content-Type: multipart/report; report-type=delivery-status; boundary=\"XX\"\r\n\
        \r\n\
        --XX\r\n\
        Content-Type: text/plain\r\n\
        \r\n\
        Delivery failed.\r\n\
        --XX\r\n\
        Content-Type: message/delivery-status\r\n\
        \r\n\
        Final-Recipient: rfc822;foo@example.org\r\n\
        Action: failed\r\n\
        Status: 5.1.1\r\n\
        --XX--\r\n";
    let msg = BounceMessage::parse(raw).unwrap();
    assert!(msg.get_text().contains("Status: 5.1.1"));
    assert_eq!(msg.find_reason(), BounceReason::BadDestinationMailboxAddress);
}
