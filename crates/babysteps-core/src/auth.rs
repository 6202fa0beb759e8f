//! Mapping of authentication provider failures to parent-facing messages.

use crate::locale::Locale;

/// Classified sign-in or sign-up failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    EmailInUse,
    BadCredentials,
    PopupClosed,
    PopupCancelled,
    /// Anything unrecognised; carries the provider's raw message.
    Other(String),
}

impl AuthFailure {
    /// Classifies a provider error `code` such as `auth/wrong-password`.
    #[must_use]
    pub fn from_code(code: &str, raw_message: &str) -> Self {
        match code {
            "auth/email-already-in-use" => Self::EmailInUse,
            "auth/wrong-password" | "auth/user-not-found" | "auth/invalid-credential" => {
                Self::BadCredentials
            }
            "auth/popup-closed-by-user" => Self::PopupClosed,
            "auth/cancelled-popup-request" => Self::PopupCancelled,
            _ => Self::Other(raw_message.to_string()),
        }
    }

    #[must_use]
    pub fn message(&self, locale: Locale) -> String {
        match self {
            Self::EmailInUse => locale.auth_email_in_use().to_string(),
            Self::BadCredentials => locale.auth_bad_credentials().to_string(),
            Self::PopupClosed => locale.auth_popup_closed().to_string(),
            Self::PopupCancelled => locale.auth_popup_cancelled().to_string(),
            Self::Other(raw) => format!("{}{raw}", locale.error_prefix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_fixed_messages() {
        for code in ["auth/wrong-password", "auth/user-not-found", "auth/invalid-credential"] {
            assert_eq!(AuthFailure::from_code(code, "x"), AuthFailure::BadCredentials);
        }
        assert_eq!(
            AuthFailure::from_code("auth/email-already-in-use", "x").message(Locale::Uz),
            "Bu email allaqachon band."
        );
        assert_eq!(
            AuthFailure::from_code("auth/popup-closed-by-user", "x"),
            AuthFailure::PopupClosed
        );
        assert_eq!(
            AuthFailure::from_code("auth/cancelled-popup-request", "x"),
            AuthFailure::PopupCancelled
        );
    }

    #[test]
    fn unknown_code_keeps_raw_message() {
        let failure = AuthFailure::from_code("auth/network-request-failed", "network down");
        assert_eq!(failure.message(Locale::Uz), "Xatolik: network down");
    }
}
