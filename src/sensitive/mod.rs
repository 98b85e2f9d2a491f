//! Sensitive content filter. Decides whether a capture is dropped.
//!
//! Two independent checks:
//! - the source application is a known password manager
//!   ([`denylist`]); always on, no content inspection;
//! - the copied text looks like a secret ([`secret`]); only when
//!   protection is enabled in [`EngineConfig`](crate::config::EngineConfig).
//!
//! A suppression is an outcome, not an error. The caller surfaces
//! [`SuppressReason`] to the UI as a transient notice.

pub mod denylist;
pub mod secret;

use std::collections::HashSet;
use std::fmt;

pub use secret::is_likely_secret;

use crate::config::EngineConfig;

/// Why a capture was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    /// Copied while a denylisted application had focus.
    PasswordManager { app: String },
    /// Text matched the secret heuristic.
    LikelySecret,
}

impl SuppressReason {
    /// Short machine-readable kind, safe for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SuppressReason::PasswordManager { .. } => "password_manager",
            SuppressReason::LikelySecret => "likely_secret",
        }
    }
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuppressReason::PasswordManager { app } => write!(
                f,
                "Ignored a copy from password manager {app} to protect your privacy."
            ),
            SuppressReason::LikelySecret => f.write_str(
                "Ignored copied text that looks like a password or key to protect your privacy.",
            ),
        }
    }
}

/// Combined source-app and text checks.
#[derive(Debug, Clone)]
pub struct SensitiveFilter {
    denied_apps: HashSet<String>,
    protect_text: bool,
}

impl SensitiveFilter {
    pub fn new(config: &EngineConfig) -> Self {
        let denied_apps = denylist::builtin()
            .map(str::to_owned)
            .chain(config.extra_denied_apps.iter().cloned())
            .collect();
        Self {
            denied_apps,
            protect_text: config.protect_sensitive,
        }
    }

    /// Check the application that had focus when the copy happened.
    pub fn check_source(&self, app: Option<&str>) -> Option<SuppressReason> {
        let app = app?;
        self.denied_apps
            .contains(app)
            .then(|| SuppressReason::PasswordManager {
                app: app.to_owned(),
            })
    }

    /// Check copied text. No-op when protection is disabled.
    pub fn check_text(&self, text: &str) -> Option<SuppressReason> {
        (self.protect_text && is_likely_secret(text)).then_some(SuppressReason::LikelySecret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(protect: bool) -> SensitiveFilter {
        SensitiveFilter::new(&EngineConfig {
            protect_sensitive: protect,
            extra_denied_apps: vec!["org.example.vault".into()],
            ..EngineConfig::default()
        })
    }

    #[test]
    fn denylisted_bundle_id_suppressed() {
        let reason = filter(false).check_source(Some("com.bitwarden.desktop"));
        assert_eq!(
            reason,
            Some(SuppressReason::PasswordManager {
                app: "com.bitwarden.desktop".into()
            })
        );
    }

    #[test]
    fn denylisted_wm_class_suppressed() {
        assert!(filter(false).check_source(Some("KeePassXC")).is_some());
    }

    #[test]
    fn extra_denied_app_suppressed() {
        assert!(filter(false).check_source(Some("org.example.vault")).is_some());
    }

    #[test]
    fn ordinary_or_unknown_app_allowed() {
        let f = filter(true);
        assert!(f.check_source(Some("com.apple.Safari")).is_none());
        assert!(f.check_source(None).is_none());
    }

    #[test]
    fn text_check_respects_protection_flag() {
        assert_eq!(
            filter(true).check_text("Tr0ub4dor&3!"),
            Some(SuppressReason::LikelySecret)
        );
        assert!(filter(false).check_text("Tr0ub4dor&3!").is_none());
        assert!(filter(true).check_text("grocery list").is_none());
    }

    #[test]
    fn reason_messages_are_human_readable() {
        let reason = SuppressReason::PasswordManager {
            app: "com.lastpass.LastPass".into(),
        };
        assert!(reason.to_string().contains("com.lastpass.LastPass"));
        assert_eq!(reason.kind(), "password_manager");
        assert!(SuppressReason::LikelySecret.to_string().contains("password"));
    }
}
