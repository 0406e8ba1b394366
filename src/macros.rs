/// Builds the `BounceReason` enum and its lookup table from one list.
macro_rules! status_codes {
    (
        $(
            $(#[$meta:meta])*
            $name:ident => $code:literal, $bounce_type:ident, $specific:literal, $description:literal;
        )*
    ) => {
        /// Status code of a bounce, as found in the message body.
        ///
        /// Basic SMTP reply codes (RFC 5321) and enhanced status codes
        /// (RFC 3463). `NotFound` stands for "no code identified".
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum BounceReason {
            $(
                $(#[$meta])*
                $name,
            )*
            #[default]
            NotFound,
        }

        impl BounceReason {
            /// Every code with a table entry, in table order.
            pub const ALL: &'static [BounceReason] = &[$(BounceReason::$name,)*];

            /// The code as it appears on the wire, `""` for `NotFound`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(BounceReason::$name => $code,)*
                    BounceReason::NotFound => "",
                }
            }

            /// Table entry of the code, `None` for `NotFound`.
            pub const fn info(self) -> Option<ReasonInfo> {
                match self {
                    $(
                        BounceReason::$name => Some(ReasonInfo {
                            bounce_type: BounceType::$bounce_type,
                            specific: $specific,
                            description: $description,
                        }),
                    )*
                    BounceReason::NotFound => None,
                }
            }

            fn from_code(code: &str) -> BounceReason {
                match code {
                    $($code => BounceReason::$name,)*
                    _ => BounceReason::NotFound,
                }
            }
        }
    };
}
