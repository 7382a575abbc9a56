//! Locale identifier handling.
//!
//! Locale names are matched against a fixed table of RFC 5646 language and
//! region codes. Lookups are case-insensitive and accept `_` in place of `-`,
//! so `en_gb`, `EN-gb` and `en-GB` all resolve to the canonical `en-GB`.

use std::collections::HashMap;
use std::sync::LazyLock;

/// RFC 5646 language codes
/// Based on <http://tools.ietf.org/html/rfc5646>
const KNOWN_LOCALES: &[&str] = &[
    "af", "af-ZA", "ar", "ar-AE", "ar-BH", "ar-DZ", "ar-EG", "ar-IQ",
    "ar-JO", "ar-KW", "ar-LB", "ar-LY", "ar-MA", "ar-OM", "ar-QA", "ar-SA",
    "ar-SY", "ar-TN", "ar-YE", "az", "az-AZ", "az-Cyrl-AZ", "be", "be-BY",
    "bg", "bg-BG", "bs-BA", "ca", "ca-ES", "cs", "cs-CZ", "cy",
    "cy-GB", "da", "da-DK", "de", "de-AT", "de-CH", "de-DE", "de-LI",
    "de-LU", "dv", "dv-MV", "el", "el-GR", "en", "en-AU", "en-BZ",
    "en-CA", "en-CB", "en-GB", "en-IE", "en-JM", "en-NZ", "en-PH", "en-TT",
    "en-US", "en-ZA", "en-ZW", "eo", "es", "es-AR", "es-BO", "es-CL",
    "es-CO", "es-CR", "es-DO", "es-EC", "es-ES", "es-GT", "es-HN", "es-MX",
    "es-NI", "es-PA", "es-PE", "es-PR", "es-PY", "es-SV", "es-UY", "es-VE",
    "et", "et-EE", "eu", "eu-ES", "fa", "fa-IR", "fi", "fi-FI",
    "fo", "fo-FO", "fr", "fr-BE", "fr-CA", "fr-CH", "fr-FR", "fr-LU",
    "fr-MC", "gl", "gl-ES", "gu", "gu-IN", "he", "he-IL", "hi",
    "hi-IN", "hr", "hr-BA", "hr-HR", "hu", "hu-HU", "hy", "hy-AM",
    "id", "id-ID", "is", "is-IS", "it", "it-CH", "it-IT", "ja",
    "ja-JP", "ka", "ka-GE", "kk", "kk-KZ", "kn", "kn-IN", "ko",
    "ko-KR", "kok", "kok-IN", "ky", "ky-KG", "lt", "lt-LT", "lv",
    "lv-LV", "mi", "mi-NZ", "mk", "mk-MK", "mn", "mn-MN", "mr",
    "mr-IN", "ms", "ms-BN", "ms-MY", "mt", "mt-MT", "nb", "nb-NO",
    "nl", "nl-BE", "nl-NL", "nn-NO", "ns", "ns-ZA", "pa", "pa-IN",
    "pl", "pl-PL", "ps", "ps-AR", "pt", "pt-BR", "pt-PT", "qu",
    "qu-BO", "qu-EC", "qu-PE", "ro", "ro-RO", "ru", "ru-RU", "sa",
    "sa-IN", "se", "se-FI", "se-NO", "se-SE", "sk", "sk-SK", "sl",
    "sl-SI", "sq", "sq-AL", "sr-BA", "sr-Cyrl-BA", "sr-SP", "sr-Cyrl-SP", "sv",
    "sv-FI", "sv-SE", "sw", "sw-KE", "syr", "syr-SY", "ta", "ta-IN",
    "te", "te-IN", "th", "th-TH", "tl", "tl-PH", "tn", "tn-ZA",
    "tr", "tr-TR", "tt", "tt-RU", "ts", "uk", "uk-UA", "ur",
    "ur-PK", "uz", "uz-UZ", "uz-Cyrl-UZ", "vi", "vi-VN", "xh", "xh-ZA",
    "zh", "zh-CN", "zh-HK", "zh-MO", "zh-SG", "zh-TW", "zu", "zu-ZA",
];

/// Normalized form → canonical spelling.
static CANONICAL_LOCALES: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    KNOWN_LOCALES.iter().map(|code| (normalize_locale_name(code), *code)).collect()
});

/// Normalize locale name (lowercase and replace `-` with `_`)
fn normalize_locale_name(name: &str) -> String {
    name.to_lowercase().replace('-', "_")
}

/// Resolves a locale name to its canonical identifier.
///
/// POSIX-style suffixes such as `.UTF-8` or `@euro` are ignored.
/// Returns `None` when the name is not a known locale.
///
/// # Examples
/// ```
/// use locale_tables::locale::canonicalize;
///
/// assert_eq!(canonicalize("en_gb.UTF-8"), Some("en-GB"));
/// assert_eq!(canonicalize("pt-br"), Some("pt-BR"));
/// assert_eq!(canonicalize("xx-ZZ"), None);
/// ```
#[must_use]
pub fn canonicalize(name: &str) -> Option<&'static str> {
    let name = name.trim();
    let name = name.split(['.', '@']).next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }
    CANONICAL_LOCALES.get(&normalize_locale_name(name)).copied()
}

/// Returns true if `name` is already the canonical spelling of a known locale.
#[must_use]
pub fn is_canonical(name: &str) -> bool {
    canonicalize(name) == Some(name)
}

/// Locale reported by the host, canonicalized when possible.
///
/// The raw host value is returned in the error so callers can log what was
/// rejected.
pub fn system_locale() -> Result<&'static str, Option<String>> {
    let Some(raw) = sys_locale::get_locale() else {
        return Err(None);
    };
    canonicalize(&raw).ok_or(Some(raw))
}
