use bounce_reason::{BounceMessage, BounceReason, BounceType};

#[test]
fn parse_001() {
    let mail_buffer = std::fs::read("tests/bounce_001.eml").unwrap();
    let msg = BounceMessage::parse(&mail_buffer).unwrap();
    assert_eq!(
        msg.get_subject(),
        "Delivery Status Notification (Failure)"
    );
    assert_eq!(msg.get_spam_score(), -4.0);
    assert_eq!(msg.find_reason(), BounceReason::MailboxUnavailable);
    let analysis = msg.analyze();
    assert_eq!(analysis.bounce_type, BounceType::Hard);
    assert_eq!(analysis.reason, BounceReason::MailboxUnavailable);
    assert_eq!(analysis.spam_score, -4.0);
}

#[test]
fn parse_002() {
    let mail_buffer = std::fs::read("tests/bounce_002.eml").unwrap();
    let msg = BounceMessage::parse(&mail_buffer).unwrap();
    let text = msg.get_text();
    assert!(text.contains("The reason for the problem:"));
    assert!(text.contains("Status: 5.0.0 (permanent failure)"));
    let analysis = msg.analyze();
    assert_eq!(analysis.reason, BounceReason::AddressDoesntExist);
    assert_eq!(analysis.bounce_type, BounceType::Hard);
    assert_eq!(analysis.spam_score, 0.0);
}

#[test]
fn parse_003() {
    let mail_buffer = std::fs::read("tests/bounce_003.eml").unwrap();
    let msg = BounceMessage::parse(&mail_buffer).unwrap();
    assert_eq!(msg.get_spam_score(), 0.0);
    let analysis = msg.analyze();
    assert_eq!(analysis.reason, BounceReason::NotFound);
    assert_eq!(analysis.bounce_type, BounceType::Hard);
}
