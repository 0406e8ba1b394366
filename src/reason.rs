use crate::codes::{BounceReason, Specificity};
use log::{debug, trace};

const STATUS_PREFIX: &str = "status:";

// matched against the end of a line; the code is expected on the next line
const MARKERS: [&str; 3] = [
    "the reason of the problem:",
    "the reason for the problem:",
    "the error that the other server returned was:",
];

/// Returns the bounce reason found in the body of a bounce message, or
/// `BounceReason::NotFound`.
///
/// The body is scanned from the last line to the first, because some
/// servers put a more specific code at the end of the message and a less
/// specific one at the beginning. The first hit wins.
pub fn find_reason(body: &[u8]) -> BounceReason {
    let body = String::from_utf8_lossy(body).to_lowercase();
    let lines: Vec<&str> = body.split('\n').collect();

    for (i, raw_line) in lines.iter().enumerate().rev() {
        let line = raw_line.trim();
        if let Some(rest) = line.strip_prefix(STATUS_PREFIX) {
            let reason = analyze_line(rest);
            if reason.is_found() {
                debug!("status line {}: {}", i + 1, reason.as_str());
                return reason;
            }
        } else if let Some(marker) = MARKERS.iter().find(|m| line.ends_with(*m))
            && let Some(next) = lines.get(i + 1)
        {
            let reason = analyze_line(next);
            if reason.is_found() {
                debug!("line {} after {marker:?}: {}", i + 2, reason.as_str());
                return reason;
            }
        }
    }
    trace!("no bounce reason in {} lines", lines.len());
    BounceReason::NotFound
}

/// Resolves the status code of a single line.
///
/// Only the first two tokens are looked at. If both are codes, the more
/// specific one wins, the first one on a tie.
pub fn analyze_line(line: &str) -> BounceReason {
    let normalized = normalize_line(line);
    let mut parts = normalized.split(' ');
    let first = parts.next().map_or(BounceReason::NotFound, BounceReason::parse);
    let second = parts.next().map_or(BounceReason::NotFound, BounceReason::parse);

    match first.compare_specificity(second) {
        Specificity::MoreSpecific | Specificity::Equal => first,
        Specificity::LessSpecific => second,
        Specificity::BothNotFound => BounceReason::NotFound,
    }
}

/// Replaces dashes by spaces (`550-5.1.1`) and collapses doubled spaces.
///
/// The collapse runs exactly twice, longer runs of spaces are only shortened.
pub fn normalize_line(line: &str) -> String {
    line.replace('-', " ").replace("  ", " ").replace("  ", " ")
}

#[test]
fn test_normalize_line() {
    assert_eq!(normalize_line("550-5.1.1 foo"), "550 5.1.1 foo");
    assert_eq!(normalize_line("421- 1.2.3"), "421 1.2.3");
    assert_eq!(normalize_line("a   b"), "a b");
    assert_eq!(normalize_line("a--b"), "a b");
    // two passes: 8 spaces -> 4 -> 2
    assert_eq!(normalize_line("a        b"), "a  b");
    let normalized = "550 5.1.1 the email account does not exist";
    assert_eq!(normalize_line(normalized), normalized);
}

#[test]
fn test_analyze_line() {
    let cases = [
        ("421 a ksk sogjsdhvkfg dk", BounceReason::ServiceNotAvailable),
        ("421- sdfiu a ksk sogjsdhvkfg dk", BounceReason::ServiceNotAvailable),
        ("421- 1.2.3 a ksk sogjsdhvkfg dk", BounceReason::ServiceNotAvailable),
        ("421- 5.0.0 a ksk sogjsdhvkfg dk", BounceReason::AddressDoesntExist),
        ("421 5.0.0 a ksk sogjsdhvkfg dk", BounceReason::AddressDoesntExist),
        ("421 (a ksk sogjsdhvkfg dk)", BounceReason::ServiceNotAvailable),
        ("5.0.0 (a ksk sogjsdhvkfg dk)", BounceReason::AddressDoesntExist),
        ("5.0.0- a ksk sogjsdhvkfg dk", BounceReason::AddressDoesntExist),
        ("5.1.1 550 user unknown", BounceReason::BadDestinationMailboxAddress),
        ("550 552 quota", BounceReason::MailboxUnavailable),
        ("a ksk sogjsdhvkfg dk", BounceReason::NotFound),
        ("mailbox 5.1.1", BounceReason::BadDestinationMailboxAddress),
        ("mailbox full 5.2.2", BounceReason::NotFound),
        ("9.1.1 unknown", BounceReason::NotFound),
        ("", BounceReason::NotFound),
    ];
    for (line, expected) in cases {
        assert_eq!(analyze_line(line), expected, "{line:?}");
    }
}

#[test]
fn test_find_reason_status_line() {
    let body = b"Action: failed\nStatus: 5.0.0 (permanent failure)\n";
    assert_eq!(find_reason(body), BounceReason::AddressDoesntExist);
    let body = b"Status: 4.4.7\n";
    assert_eq!(find_reason(body), BounceReason::NotFound);
}

#[test]
fn test_find_reason_marker() {
    let body = b"The error that the other server returned was:\n\
        550-5.1.1 The email account that you tried to reach does not exist.\n";
    assert_eq!(find_reason(body), BounceReason::BadDestinationMailboxAddress);
    let body = b"Some text\r\nThe reason of the problem:\r\n552 mailbox full\r\n";
    assert_eq!(find_reason(body), BounceReason::ActionAbortedExceededStorageAlloc);
}

#[test]
fn test_find_reason_marker_without_code() {
    assert_eq!(find_reason(b"The reason for the problem:"), BounceReason::NotFound);
    assert_eq!(find_reason(b"The reason for the problem:\n"), BounceReason::NotFound);
    let body = b"The error that the other server returned was:\n\
        DNS Error: Domain name not found\n";
    assert_eq!(find_reason(body), BounceReason::NotFound);
}

#[test]
fn test_find_reason_prefers_last() {
    let body = b"The reason for the problem:\n550 no such user\n\nStatus: 5.1.1\n";
    assert_eq!(find_reason(body), BounceReason::BadDestinationMailboxAddress);
}

#[test]
fn test_find_reason_status_line_hides_marker() {
    let body = b"Status: see below. The reason for the problem:\n550 no such user\n";
    assert_eq!(find_reason(body), BounceReason::NotFound);
}

#[cfg(test)]
const REPORT_BODY: &str = r#"The following message to <foo@foo.foo> was undeliverable.
The reason for the problem:
5.1.0 - Unknown address error 550-'No such user (foo) -ERR foo@foo.foo not found'

Reporting-MTA: dns; mx1.foo.foo

Final-Recipient: rfc822;foo@foo.foo
Action: failed
Status: 5.0.0 (permanent failure)
Remote-MTA: dns; [1.1.1.1]
Diagnostic-Code: smtp; 5.1.0 - Unknown address error 550-'No such user (foo) -ERR foo@foo.foo not found' (delivery attempts: 0)"#;

#[cfg(test)]
const REASON_ONLY_BODY: &str = r#"The following message to <foo@foo.foo> was undeliverable.
The reason for the problem:
5.1.0 - Unknown address error 550-'No such user (foo) -ERR foo@foo.foo not found'
"#;

#[test]
fn test_find_reason_report() {
    assert_eq!(
        find_reason(REPORT_BODY.as_bytes()),
        BounceReason::AddressDoesntExist
    );
    assert_eq!(
        find_reason(REASON_ONLY_BODY.as_bytes()),
        BounceReason::OtherAddressError
    );
}

#[test]
fn test_find_reason_code_outside_of_heuristics() {
    assert_eq!(find_reason(b"550 5.1.1 user unknown\n"), BounceReason::NotFound);
    assert_eq!(find_reason(b""), BounceReason::NotFound);
}
