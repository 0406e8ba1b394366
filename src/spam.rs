use crate::HeaderLookup;

pub const SPAM_SCORE_HEADER: &str = "X-Spam-Score";

/// Spam score from the `X-Spam-Score` header, `0.0` if the header is missing
/// or not a number.
pub fn spam_score(headers: &(impl HeaderLookup + ?Sized)) -> f64 {
    headers
        .first_value(SPAM_SCORE_HEADER)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0f64)
}

#[test]
fn test_spam_score() {
    use std::collections::HashMap;

    let mut h1: HashMap<String, Vec<String>> = HashMap::new();
    h1.insert(SPAM_SCORE_HEADER.to_string(), vec!["-4.0".to_string()]);
    let h2: HashMap<String, Vec<String>> = HashMap::new();
    let mut h3: HashMap<String, Vec<String>> = HashMap::new();
    h3.insert(SPAM_SCORE_HEADER.to_string(), vec!["high".to_string()]);
    let mut h4: HashMap<String, Vec<String>> = HashMap::new();
    h4.insert(
        SPAM_SCORE_HEADER.to_string(),
        vec!["7.25".to_string(), "1.0".to_string()],
    );

    assert_eq!(spam_score(&h1), -4.0);
    assert_eq!(spam_score(&h2), 0.0);
    assert_eq!(spam_score(&h3), 0.0);
    assert_eq!(spam_score(&h4), 7.25);
}
