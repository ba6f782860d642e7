/// The closed set of failure kinds reported by the Web eID authenticator.
///
/// The browser extension reports errors as stable string codes
/// (`ERR_WEBEID_*`); [`AuthenticatorError::from_code`] maps them into this
/// enum at the extension boundary, with anything unrecognized collapsing to
/// [`AuthenticatorError::Unknown`].
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthenticatorError {
    #[error("the authentication operation timed out")]
    ActionTimeout,

    #[error("the user did not interact with the card reader in time")]
    UserTimeout,

    #[error("the extension and native component versions do not match")]
    VersionMismatch,

    #[error("the authenticator reported an invalid version")]
    VersionInvalid,

    #[error("the Web eID browser extension is not available")]
    ExtensionUnavailable,

    #[error("the Web eID native component is not available")]
    NativeUnavailable,

    #[error("unknown authenticator error")]
    Unknown,

    #[error("the page is not served from a secure context")]
    ContextInsecure,

    #[error("the user cancelled the operation")]
    UserCancelled,

    #[error("the native component rejected an argument")]
    NativeInvalidArgument,

    #[error("the native component failed fatally")]
    NativeFatal,

    #[error("another authentication operation is already pending")]
    ActionPending,

    #[error("a required parameter was missing")]
    MissingParameter,
}

impl AuthenticatorError {
    /// The wire code used by the Web eID javascript library.
    pub const fn code(self) -> &'static str {
        match self {
            Self::ActionTimeout => "ERR_WEBEID_ACTION_TIMEOUT",
            Self::UserTimeout => "ERR_WEBEID_USER_TIMEOUT",
            Self::VersionMismatch => "ERR_WEBEID_VERSION_MISMATCH",
            Self::VersionInvalid => "ERR_WEBEID_VERSION_INVALID",
            Self::ExtensionUnavailable => "ERR_WEBEID_EXTENSION_UNAVAILABLE",
            Self::NativeUnavailable => "ERR_WEBEID_NATIVE_UNAVAILABLE",
            Self::Unknown => "ERR_WEBEID_UNKNOWN_ERROR",
            Self::ContextInsecure => "ERR_WEBEID_CONTEXT_INSECURE",
            Self::UserCancelled => "ERR_WEBEID_USER_CANCELLED",
            Self::NativeInvalidArgument => "ERR_WEBEID_NATIVE_INVALID_ARGUMENT",
            Self::NativeFatal => "ERR_WEBEID_NATIVE_FATAL",
            Self::ActionPending => "ERR_WEBEID_ACTION_PENDING",
            Self::MissingParameter => "ERR_WEBEID_MISSING_PARAMETER",
        }
    }

    /// Inverse of [`Self::code`]. Unrecognized codes become [`Self::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "ERR_WEBEID_ACTION_TIMEOUT" => Self::ActionTimeout,
            "ERR_WEBEID_USER_TIMEOUT" => Self::UserTimeout,
            "ERR_WEBEID_VERSION_MISMATCH" => Self::VersionMismatch,
            "ERR_WEBEID_VERSION_INVALID" => Self::VersionInvalid,
            "ERR_WEBEID_EXTENSION_UNAVAILABLE" => Self::ExtensionUnavailable,
            "ERR_WEBEID_NATIVE_UNAVAILABLE" => Self::NativeUnavailable,
            "ERR_WEBEID_UNKNOWN_ERROR" => Self::Unknown,
            "ERR_WEBEID_CONTEXT_INSECURE" => Self::ContextInsecure,
            "ERR_WEBEID_USER_CANCELLED" => Self::UserCancelled,
            "ERR_WEBEID_NATIVE_INVALID_ARGUMENT" => Self::NativeInvalidArgument,
            "ERR_WEBEID_NATIVE_FATAL" => Self::NativeFatal,
            "ERR_WEBEID_ACTION_PENDING" => Self::ActionPending,
            "ERR_WEBEID_MISSING_PARAMETER" => Self::MissingParameter,
            _ => Self::Unknown,
        }
    }

    pub const ALL: [Self; 13] = [
        Self::ActionTimeout,
        Self::UserTimeout,
        Self::VersionMismatch,
        Self::VersionInvalid,
        Self::ExtensionUnavailable,
        Self::NativeUnavailable,
        Self::Unknown,
        Self::ContextInsecure,
        Self::UserCancelled,
        Self::NativeInvalidArgument,
        Self::NativeFatal,
        Self::ActionPending,
        Self::MissingParameter,
    ];
}

#[cfg(test)]
mod tests {
    use super::AuthenticatorError;

    #[test]
    fn code_roundtrip() {
        for err in AuthenticatorError::ALL {
            assert_eq!(AuthenticatorError::from_code(err.code()), err);
        }
    }

    #[test]
    fn unrecognized_code_is_unknown() {
        assert_eq!(
            AuthenticatorError::from_code("ERR_WEBEID_FROM_THE_FUTURE"),
            AuthenticatorError::Unknown
        );
        assert_eq!(
            AuthenticatorError::from_code(""),
            AuthenticatorError::Unknown
        );
    }
}
