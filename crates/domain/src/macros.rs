//! Macro for implementing Display and FromStr for wire-named enums
//!
//! Several domain enums travel over the wire by a fixed name (`MD5`,
//! `HMAC-SHA256`, `jsapi_ticket`, ...). This macro keeps the mapping in one
//! place and generates both directions.
//!
//! # Example
//!
//! ```rust
//! use wxkit_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Web,
//!     MiniProgram,
//! }
//!
//! impl_wire_name_conversions!(Channel {
//!     Web => "web",
//!     MiniProgram => "miniprogram",
//! });
//!
//! assert_eq!(Channel::MiniProgram.to_string(), "miniprogram");
//! assert_eq!("web".parse::<Channel>().ok(), Some(Channel::Web));
//! assert!("WEB".parse::<Channel>().is_err());
//! ```

/// Implements Display and FromStr traits for wire-named enums
///
/// This macro generates:
/// - Display trait: writes the wire name exactly as declared
/// - FromStr trait: accepts only the exact wire name, failing with
///   `WxError::InvalidInput`
///
/// Paths inside the expansion are fully qualified, so the macro also works
/// in modules that shadow `Result`, `Ok` or `Err`.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire name of this variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = $crate::WxError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                $(
                    if s == $str {
                        return ::core::result::Result::Ok(Self::$variant);
                    }
                )+
                ::core::result::Result::Err($crate::WxError::InvalidInput(::std::format!(
                    "Invalid {}: {}",
                    ::core::stringify!($enum_name),
                    s
                )))
            }
        }
    };
}
