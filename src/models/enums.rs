//! Wire enums shared by the customer resources.
//!
//! Square adds enum values server-side without a version bump, so every wire
//! enum keeps unknown values verbatim in an `Unrecognized` variant instead of
//! failing deserialization.

/// Defines a wire enum with tolerant parsing.
///
/// Unknown wire values round-trip unchanged through `Unrecognized`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unrecognized(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unrecognized(other) => other,
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Unrecognized(value),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use wire_enum;

wire_enum! {
    /// Method used to create a customer profile.
    pub enum CreationSource {
        Other => "OTHER",
        Appointments => "APPOINTMENTS",
        Coupon => "COUPON",
        DeletionRecovery => "DELETION_RECOVERY",
        Directory => "DIRECTORY",
        Egifting => "EGIFTING",
        EmailCollection => "EMAIL_COLLECTION",
        Feedback => "FEEDBACK",
        Import => "IMPORT",
        Invoices => "INVOICES",
        Loyalty => "LOYALTY",
        Marketing => "MARKETING",
        Merge => "MERGE",
        OnlineStore => "ONLINE_STORE",
        InstantProfile => "INSTANT_PROFILE",
        Terminal => "TERMINAL",
        ThirdParty => "THIRD_PARTY",
        ThirdPartyImport => "THIRD_PARTY_IMPORT",
        UnmergeRecovery => "UNMERGE_RECOVERY",
    }
}

wire_enum! {
    /// Brand of a card on file.
    pub enum CardBrand {
        OtherBrand => "OTHER_BRAND",
        Visa => "VISA",
        Mastercard => "MASTERCARD",
        AmericanExpress => "AMERICAN_EXPRESS",
        Discover => "DISCOVER",
        DiscoverDiners => "DISCOVER_DINERS",
        Jcb => "JCB",
        ChinaUnionpay => "CHINA_UNIONPAY",
        SquareGiftCard => "SQUARE_GIFT_CARD",
        SquareCapitalCard => "SQUARE_CAPITAL_CARD",
        Interac => "INTERAC",
        Eftpos => "EFTPOS",
        Felica => "FELICA",
    }
}

wire_enum! {
    /// Whether a card on file is prepaid.
    pub enum CardPrepaidType {
        UnknownPrepaidType => "UNKNOWN_PREPAID_TYPE",
        NotPrepaid => "NOT_PREPAID",
        Prepaid => "PREPAID",
    }
}
