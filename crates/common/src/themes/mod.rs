//! Theme registry
//!
//! Each selectable domain has a fixed visual theme. Lookup by domain id
//! never fails: unknown ids resolve to the default theme.

mod catalog;

use serde::Serialize;

pub use catalog::{BIBLE, DEFAULT, MAHABHARATA, QURAN};

/// Domain id of the fallback theme
pub const DEFAULT_DOMAIN: &str = "default";

/// Every registered theme, default last
pub static THEMES: &[&Theme] = &[&MAHABHARATA, &BIBLE, &QURAN, &DEFAULT];

const GOOGLE_FONTS_CSS: &str = "https://fonts.googleapis.com/css2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationStyle {
    FadeSlideUp,
    GracefulFade,
    ReverentSlide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ThinkingStyle {
    LotusBloom,
    CandleFlicker,
    PrayerBeads,
    Pulse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub colors: ThemeColors,
    pub fonts: ThemeFonts,
    pub avatars: ThemeAvatars,
    pub patterns: ThemePatterns,
    pub animations: ThemeAnimations,
    pub metadata: ThemeMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
    pub message_bg: MessageColors,
    pub input_bg: &'static str,
    pub header_bg: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageColors {
    pub user: &'static str,
    pub assistant: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeFonts {
    pub heading: &'static str,
    pub body: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeAvatars {
    pub assistant: &'static str,
    pub user: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemePatterns {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoration: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeAnimations {
    pub message_entry: AnimationStyle,
    pub thinking: ThinkingStyle,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeMetadata {
    pub culture: &'static str,
    pub primary_language: &'static str,
    pub region: &'static str,
}

/// Assets a page should preload for a theme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThemeAssets {
    pub stylesheets: Vec<String>,
    pub images: Vec<String>,
}

impl Theme {
    /// Font stylesheets and images used by this theme, without duplicates
    pub fn assets(&self) -> ThemeAssets {
        let mut assets = ThemeAssets::default();

        let families = [Some(self.fonts.heading), Some(self.fonts.body), self.fonts.code];
        for family in families.into_iter().flatten() {
            let url = font_stylesheet_url(family);
            if !assets.stylesheets.contains(&url) {
                assets.stylesheets.push(url);
            }
        }

        let images = [
            Some(self.avatars.assistant),
            Some(self.avatars.user),
            self.patterns.background,
            self.patterns.decoration,
        ];
        for image in images.into_iter().flatten() {
            if !assets.images.iter().any(|i| i == image) {
                assets.images.push(image.to_string());
            }
        }

        assets
    }
}

/// Theme for a domain id, falling back to the default theme
pub fn get_theme(domain_id: &str) -> &'static Theme {
    THEMES
        .iter()
        .copied()
        .find(|theme| theme.id == domain_id)
        .unwrap_or(&DEFAULT)
}

/// Domain ids a user can pick, excluding the default
pub fn available_domains() -> Vec<&'static str> {
    THEMES
        .iter()
        .map(|theme| theme.id)
        .filter(|id| *id != DEFAULT_DOMAIN)
        .collect()
}

/// Stylesheet URL for a CSS font-family value such as `"Lora", serif`.
/// The first quoted name is used; unquoted values are used whole.
fn font_stylesheet_url(family: &str) -> String {
    let name = family
        .split(['"', '\''])
        .nth(1)
        .filter(|name| !name.is_empty())
        .unwrap_or(family);

    format!(
        "{}?family={}:wght@400;500;600;700&display=swap",
        GOOGLE_FONTS_CSS,
        name.replace(' ', "+")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_domain() {
        let theme = get_theme("quran");
        assert_eq!(theme.id, "quran");
        assert_eq!(theme.animations.thinking, ThinkingStyle::PrayerBeads);
    }

    #[test]
    fn test_unknown_domain_falls_back() {
        assert_eq!(get_theme("tripitaka").id, DEFAULT_DOMAIN);
        assert_eq!(get_theme("").id, DEFAULT_DOMAIN);
        assert_eq!(get_theme("Bible").id, DEFAULT_DOMAIN);
    }

    #[test]
    fn test_available_domains_excludes_default() {
        assert_eq!(available_domains(), vec!["mahabharata", "bible", "quran"]);
    }

    #[test]
    fn test_theme_ids_unique() {
        for (i, a) in THEMES.iter().enumerate() {
            for b in &THEMES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_font_stylesheet_url() {
        assert_eq!(
            font_stylesheet_url("\"Crimson Text\", serif"),
            "https://fonts.googleapis.com/css2?family=Crimson+Text:wght@400;500;600;700&display=swap"
        );
        assert_eq!(
            font_stylesheet_url("monospace"),
            "https://fonts.googleapis.com/css2?family=monospace:wght@400;500;600;700&display=swap"
        );
    }

    #[test]
    fn test_assets_are_deduplicated() {
        let assets = get_theme("default").assets();
        // Heading and body share Inter
        assert_eq!(assets.stylesheets.len(), 2);
        // No background patterns on the default theme
        assert_eq!(assets.images.len(), 2);

        let assets = get_theme("mahabharata").assets();
        assert_eq!(assets.stylesheets.len(), 3);
        assert_eq!(assets.images.len(), 4);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(get_theme("bible")).unwrap();
        assert_eq!(json["colors"]["messageBg"]["user"], "#E6F2FF");
        assert_eq!(json["animations"]["messageEntry"], "gracefulFade");
        assert_eq!(json["metadata"]["primaryLanguage"], "Hebrew/Greek");

        let json = serde_json::to_value(get_theme("default")).unwrap();
        assert!(json["patterns"].as_object().unwrap().is_empty());
    }
}
