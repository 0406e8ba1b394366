use bounce_reason::cli::classify_file;
use bounce_reason::{BounceReason, BounceType};
use lazy_regex::regex_is_match;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[test]
fn test_classify_raw() {
    let mut file1 = NamedTempFile::new().unwrap();
    file1
        .write_all(
            b"Delivery has failed.\n\
            The reason of the problem:\n\
            452-4.2.2 mailbox over quota\n",
        )
        .unwrap();
    let analysis = classify_file(file1.path(), true).unwrap();
    assert_eq!(analysis.reason, BounceReason::ActionAbortedInsufficientStorage);
    assert_eq!(analysis.bounce_type, BounceType::Soft);
    assert_eq!(analysis.spam_score, 0.0);
}

#[test]
fn test_classify_message() {
    let mut file1 = NamedTempFile::new().unwrap();
    file1
        .write_all(
            b"From: MAILER-DAEMON@example.org\r\n\
            X-Spam-Score: 1.5\r\n\
            \r\n\
            Final-Recipient: rfc822;foo@example.org\r\n\
            Action: failed\r\n\
            Status: 5.2.2\r\n",
        )
        .unwrap();
    let analysis = classify_file(file1.path(), false).unwrap();
    assert_eq!(analysis.reason, BounceReason::MailboxFull);
    assert_eq!(analysis.bounce_type, BounceType::Soft);
    assert_eq!(analysis.spam_score, 1.5);
    assert_eq!(
        analysis.to_string(),
        "soft bounce: 5.2.2 - mailbox full (spam score 1.5)"
    );
}

#[test]
fn test_classify_missing_file() {
    assert!(classify_file(Path::new("tests/does_not_exist.eml"), false).is_err());
}

#[test]
fn test_code_format() {
    for reason in BounceReason::ALL {
        let line = reason.to_string();
        assert!(
            regex_is_match!(r"^(\d{3}|\d\.\d\.\d) - [a-z(][a-z ',:()]+$", &line),
            "{line}"
        );
    }
}
