#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error when parsing a string that is not one of an enum's wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{invalid}'. Valid values: {valid}")]
pub struct ParseEnumError {
    kind: &'static str,
    invalid: String,
    valid: String,
}

/// Declares a string-backed enum usable in JSON, OpenAPI and (with the
/// `sea-orm` feature) directly as an entity column.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:tt) default $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:tt ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
        #[cfg_attr(
            feature = "sea-orm",
            derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
            sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value)]
                #[cfg_attr(feature = "sea-orm", sea_orm(string_value = $value))]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            /// Wire values, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        invalid: s.to_string(),
                        valid: Self::VALUES.join(", "),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Access level of a backoffice account.
    UserRole ("role") default Member {
        Admin => "admin",
        Manager => "manager",
        Member => "member",
    }
}

string_enum! {
    /// Lifecycle of a user account.
    UserStatus ("user status") default Active {
        Active => "active",
        /// Blocked by an operator; cannot sign in.
        Suspended => "suspended",
        Withdrawn => "withdrawn",
    }
}

string_enum! {
    /// Fulfilment state of a shop order.
    OrderStatus ("order status") default Pending {
        Pending => "pending",
        Paid => "paid",
        Shipping => "shipping",
        Delivered => "delivered",
        Cancelled => "cancelled",
        Refunded => "refunded",
    }
}

string_enum! {
    FcmPlatform ("platform") default Android {
        Ios => "ios",
        Android => "android",
        Web => "web",
    }
}

string_enum! {
    /// Audience of a push message.
    FcmTarget ("target") default All {
        All => "all",
        User => "user",
    }
}

impl UserRole {
    /// Admins and managers may use the backoffice.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl UserStatus {
    pub fn can_sign_in(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl OrderStatus {
    /// Orders in these states no longer move.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded)
    }
}
