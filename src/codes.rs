//! Classification table of SMTP reply codes and enhanced status codes.
//!
//! https://tools.ietf.org/html/rfc821#section-4.2.2
//! https://tools.ietf.org/html/rfc3463#section-3

use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Hard or soft bounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BounceType {
    /// Transient failure, delivery may be retried.
    Soft,
    /// Permanent failure.
    Hard,
}

impl BounceType {
    pub fn as_str(self) -> &'static str {
        match self {
            BounceType::Soft => "soft",
            BounceType::Hard => "hard",
        }
    }
}

impl fmt::Display for BounceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Table entry of a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReasonInfo {
    pub bounce_type: BounceType,
    /// Enhanced codes are specific, basic reply codes are not.
    pub specific: bool,
    pub description: &'static str,
}

status_codes! {
    ServiceNotAvailable => "421", Soft, false, "service not available";
    MailActionNotTaken => "450", Soft, false, "mail action not taken: mailbox unavailable";
    ActionAbortedErrorProcessing => "451", Soft, false, "action aborted: error in processing";
    ActionAbortedInsufficientStorage => "452", Soft, false, "action aborted: insufficient system storage";
    CmdSyntaxError => "500", Hard, false, "the server could not recognize the command due to a syntax error";
    ArgumentsSyntaxError => "501", Hard, false, "a syntax error was encountered in command arguments";
    CmdNotImplemented => "502", Hard, false, "this command is not implemented";
    BadCmdSequence => "503", Hard, false, "the server has encountered a bad sequence of commands";
    CmdParamNotImplemented => "504", Hard, false, "a command parameter is not implemented";
    MailboxUnavailable => "550", Hard, false, "user's mailbox was unavailable (such as not found)";
    RecipientNotLocal => "551", Hard, false, "the recipient is not local to the server";
    ActionAbortedExceededStorageAlloc => "552", Hard, false, "the action was aborted due to exceeded storage allocation";
    MailboxNameInvalid => "553", Hard, false, "the command was aborted because the mailbox name is invalid";
    TransactionFailed => "554", Hard, false, "the transaction failed for some unstated reason";

    AddressDoesntExist => "5.0.0", Hard, true, "address does not exist";
    OtherAddressError => "5.1.0", Hard, true, "other address status";
    BadDestinationMailboxAddress => "5.1.1", Hard, true, "bad destination mailbox address";
    BadDestinationSystemAddress => "5.1.2", Hard, true, "bad destination system address";
    BadDestinationMailboxAddressSyntax => "5.1.3", Hard, true, "bad destination mailbox address syntax";
    DestinationMailboxAmbiguous => "5.1.4", Hard, true, "destination mailbox address ambiguous";
    DestinationMailboxAddressInvalid => "5.1.5", Hard, true, "destination mailbox address invalid";
    MailboxMoved => "5.1.6", Hard, true, "mailbox has moved";
    BadSenderMailboxAddressSyntax => "5.1.7", Hard, true, "bad sender's mailbox address syntax";
    BadSenderSystemAddress => "5.1.8", Hard, true, "bad sender's system address";
    UndefinedMailboxError => "5.2.0", Soft, true, "other or undefined mailbox status";
    MailboxDisabled => "5.2.1", Soft, true, "mailbox disabled, not accepting messages";
    MailboxFull => "5.2.2", Soft, true, "mailbox full";
    MessageLenExceedsLimit => "5.2.3", Hard, true, "message length exceeds administrative limit";
    MailingListExpansionProblem => "5.2.4", Hard, true, "mailing list expansion problem";
    UndefinedMailSystemStatus => "5.3.0", Hard, true, "other or undefined mail system status";
    MailSystemFull => "5.3.1", Soft, true, "mail system full";
    SystemNotAcceptingNetworkMessages => "5.3.2", Hard, true, "system not accepting network messages";
    SystemNotCapableOfFeatures => "5.3.3", Hard, true, "system not capable of selected features";
    MessageTooBigForSystem => "5.3.4", Hard, true, "message too big for system";
    UndefinedNetworkStatus => "5.4.0", Hard, true, "other or undefined network or routing status";
    NoAnswerFromHost => "5.4.1", Hard, true, "no answer from host";
    BadConnection => "5.4.2", Hard, true, "bad connection";
    RoutingServerFailure => "5.4.3", Hard, true, "routing server failure";
    UnableToRoute => "5.4.4", Hard, true, "unable to route";
    NetworkCongestion => "5.4.5", Soft, true, "network congestion";
    RoutingLoopDetected => "5.4.6", Hard, true, "routing loop detected";
    DeliveryTimeExpired => "5.4.7", Hard, true, "delivery time expired";
    UndefinedProtocolStatus => "5.5.0", Hard, true, "other or undefined protocol status";
    InvalidCommand => "5.5.1", Hard, true, "invalid command";
    SyntaxError => "5.5.2", Hard, true, "syntax error";
    TooManyRecipients => "5.5.3", Soft, true, "too many recipients";
    InvalidCommandArguments => "5.5.4", Hard, true, "invalid command arguments";
    WrongProtocolVersion => "5.5.5", Hard, true, "wrong protocol version";
    UndefinedMediaError => "5.6.0", Hard, true, "other or undefined media error";
    MediaNotSupported => "5.6.1", Hard, true, "media not supported";
    ConversionRequiredAndProhibited => "5.6.2", Hard, true, "conversion required and prohibited";
    ConversionRequiredButNotSupported => "5.6.3", Hard, true, "conversion required but not supported";
    ConversionWithLossPerformed => "5.6.4", Hard, true, "conversion with loss performed";
    ConversionFailed => "5.6.5", Hard, true, "conversion failed";
    UndefinedSecurityStatus => "5.7.0", Hard, true, "other or undefined security status";
    MessageRefused => "5.7.1", Hard, true, "delivery not authorized, message refused";
    MailingListExpansionProhibited => "5.7.2", Hard, true, "mailing list expansion prohibited";
    SecurityConversionRequiredButNotPossible => "5.7.3", Hard, true, "security conversion required but not possible";
    SecurityFeaturesNotSupported => "5.7.4", Hard, true, "security features not supported";
    CryptoFailure => "5.7.5", Hard, true, "cryptographic failure";
    CryptoAlgorithmNotSupported => "5.7.6", Hard, true, "cryptographic algorithm not supported";
    MessageIntegrityFailure => "5.7.7", Hard, true, "message integrity failure";

    /// Hard bounce without a recognizable code. Never parsed from a message.
    UndefinedCode => "9.1.1", Hard, true, "hard bounce with no bounce code found";
}

/// Outcome of [`BounceReason::compare_specificity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specificity {
    BothNotFound,
    LessSpecific,
    Equal,
    MoreSpecific,
}

impl BounceReason {
    /// Looks up a code token as found in a bounce line.
    ///
    /// Anything that is not a known code, including the synthetic
    /// `9.1.1`, gives `NotFound`.
    pub fn parse(token: &str) -> BounceReason {
        match BounceReason::from_code(token.trim()) {
            BounceReason::UndefinedCode => BounceReason::NotFound,
            reason => reason,
        }
    }

    /// Severity of the code. `NotFound` is treated as `UndefinedCode`,
    /// a hard bounce.
    pub fn bounce_type(self) -> BounceType {
        self.info()
            .or(BounceReason::UndefinedCode.info())
            .map_or(BounceType::Hard, |info| info.bounce_type)
    }

    pub fn is_specific(self) -> bool {
        self.info().is_some_and(|info| info.specific)
    }

    pub fn description(self) -> &'static str {
        self.info().map_or("", |info| info.description)
    }

    pub fn is_found(self) -> bool {
        self != BounceReason::NotFound
    }

    /// Compares how specific `self` is relative to `other`.
    ///
    /// Enhanced codes are more specific than basic reply codes. Codes of the
    /// same kind are `Equal`, and `NotFound` counts as a basic code unless
    /// both sides are `NotFound`.
    pub fn compare_specificity(self, other: BounceReason) -> Specificity {
        if self == BounceReason::NotFound && other == BounceReason::NotFound {
            return Specificity::BothNotFound;
        }
        match (self.is_specific(), other.is_specific()) {
            (a, b) if a == b => Specificity::Equal,
            (true, _) => Specificity::MoreSpecific,
            _ => Specificity::LessSpecific,
        }
    }
}

impl fmt::Display for BounceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == BounceReason::NotFound {
            return f.write_str("no bounce reason found");
        }
        write!(f, "{} - {}", self.as_str(), self.description())
    }
}

/// A code string that has no table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatusCode(pub String);

impl fmt::Display for UnknownStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status code {:?}", self.0)
    }
}

impl Error for UnknownStatusCode {}

/// Strict lookup, accepting every table entry including `9.1.1`.
impl FromStr for BounceReason {
    type Err = UnknownStatusCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match BounceReason::from_code(s.trim()) {
            BounceReason::NotFound => Err(UnknownStatusCode(s.to_string())),
            reason => Ok(reason),
        }
    }
}

#[test]
fn test_compare_specificity() {
    use BounceReason::*;
    let cases = [
        (NotFound, NotFound, Specificity::BothNotFound),
        (ServiceNotAvailable, CryptoFailure, Specificity::LessSpecific),
        (NotFound, CryptoFailure, Specificity::LessSpecific),
        (MailboxUnavailable, MailboxUnavailable, Specificity::Equal),
        (CryptoFailure, CryptoFailure, Specificity::Equal),
        (AddressDoesntExist, MailboxUnavailable, Specificity::MoreSpecific),
        (AddressDoesntExist, NotFound, Specificity::MoreSpecific),
        (NotFound, MailboxUnavailable, Specificity::Equal),
    ];
    for (a, b, expected) in cases {
        assert_eq!(a.compare_specificity(b), expected, "{a:?} vs {b:?}");
    }
}

#[test]
fn test_compare_enhanced_against_basic() {
    let (enhanced, basic): (Vec<BounceReason>, Vec<BounceReason>) =
        BounceReason::ALL.iter().copied().partition(|r| r.is_specific());
    for e in &enhanced {
        for b in &basic {
            assert_eq!(e.compare_specificity(*b), Specificity::MoreSpecific);
            assert_eq!(b.compare_specificity(*e), Specificity::LessSpecific);
        }
        assert_eq!(e.compare_specificity(*e), Specificity::Equal);
    }
}

#[test]
fn test_parse() {
    assert_eq!(BounceReason::parse("550"), BounceReason::MailboxUnavailable);
    assert_eq!(BounceReason::parse(" 5.1.1 "), BounceReason::BadDestinationMailboxAddress);
    assert_eq!(BounceReason::parse("5.1.9"), BounceReason::NotFound);
    assert_eq!(BounceReason::parse("(550)"), BounceReason::NotFound);
    assert_eq!(BounceReason::parse(""), BounceReason::NotFound);
    assert_eq!(BounceReason::parse("9.1.1"), BounceReason::NotFound);
    assert_eq!("9.1.1".parse::<BounceReason>(), Ok(BounceReason::UndefinedCode));
    assert!("4.4.4".parse::<BounceReason>().is_err());
}

#[test]
fn test_table() {
    assert_eq!(BounceReason::ALL.len(), 14 + 48 + 1);
    for reason in BounceReason::ALL {
        assert_eq!(BounceReason::from_code(reason.as_str()), *reason);
        assert_eq!(reason.is_specific(), reason.as_str().contains('.'));
        assert!(!reason.description().is_empty());
    }
    assert!(BounceReason::NotFound.info().is_none());
    assert_eq!(BounceReason::NotFound.as_str(), "");
}

#[test]
fn test_bounce_type() {
    assert_eq!(BounceReason::ServiceNotAvailable.bounce_type(), BounceType::Soft);
    assert_eq!(BounceReason::MailboxFull.bounce_type(), BounceType::Soft);
    assert_eq!(BounceReason::MailboxUnavailable.bounce_type(), BounceType::Hard);
    assert_eq!(BounceReason::UndefinedCode.bounce_type(), BounceType::Hard);
    assert_eq!(BounceReason::NotFound.bounce_type(), BounceType::Hard);
}

#[test]
fn test_display() {
    assert_eq!(
        BounceReason::BadDestinationMailboxAddress.to_string(),
        "5.1.1 - bad destination mailbox address"
    );
    assert_eq!(BounceReason::NotFound.to_string(), "no bounce reason found");
}
