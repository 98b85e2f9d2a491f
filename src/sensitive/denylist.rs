//! Known password-manager application identities.
//!
//! Copies made while one of these owns focus are dropped without
//! looking at the content.

/// macOS bundle identifiers.
pub const BUNDLE_IDS: &[&str] = &[
    "com.agilebits.onepassword7",
    "com.agilebits.onepassword-osx",
    "com.bitwarden.desktop",
    "com.lastpass.LastPass",
    "com.dashlane.dashlanephonefinal",
    "com.outercorner.secrets",
    "in.sinew.Enpass-Desktop",
    "com.apple.keychainaccess",
    "org.keepassx.keepassxc",
    "com.meldium.Meldium",
];

/// X11 `WM_CLASS` class names of the same tools on Linux desktops.
pub const WM_CLASSES: &[&str] = &[
    "1Password",
    "Bitwarden",
    "KeePassXC",
    "keepassxc",
    "Enpass",
    "Seahorse",
    "org.gnome.seahorse.Application",
];

/// Iterate every built-in identity.
pub fn builtin() -> impl Iterator<Item = &'static str> {
    BUNDLE_IDS.iter().chain(WM_CLASSES).copied()
}
