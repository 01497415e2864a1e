use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CSS_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^url\(\s*['"]?([^'")]+)['"]?\s*\)"#).expect("valid url regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f64,
    pub node_fill: String,
    pub root_fill: String,
    pub node_border: String,
    pub text_color: String,
    pub root_text_color: String,
    pub line_color: String,
    pub selection_color: String,
    /// Painted under image backgrounds and used when a background is unusable.
    pub fallback_background: String,
}

impl Theme {
    pub fn nebula() -> Self {
        Self {
            font_family: "\"Segoe UI\", system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            node_fill: "rgba(30, 41, 82, 0.85)".to_string(),
            root_fill: "#6C5CE7".to_string(),
            node_border: "#8FA8FF".to_string(),
            text_color: "#E8ECFF".to_string(),
            root_text_color: "#FFFFFF".to_string(),
            line_color: "#8FA8FF".to_string(),
            selection_color: "#FFD166".to_string(),
            fallback_background: "#0f142b".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            node_fill: "#F8FAFF".to_string(),
            root_fill: "#3D5AFE".to_string(),
            node_border: "#C7D2E5".to_string(),
            text_color: "#1C2430".to_string(),
            root_text_color: "#FFFFFF".to_string(),
            line_color: "#7A8AA6".to_string(),
            selection_color: "#FF9F1C".to_string(),
            fallback_background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::nebula()
    }
}

/// A workspace background value as stored by the editor: either a CSS colour
/// or a CSS `url(...)` image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Color(String),
    Image(String),
}

impl Background {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if value.starts_with('#') || value.starts_with("rgb") || value.starts_with("hsl") {
            return Some(Self::Color(value.to_string()));
        }
        if let Some(caps) = CSS_URL_RE.captures(value) {
            return Some(Self::Image(caps[1].to_string()));
        }
        // Gradients and named colours pass through untouched.
        Some(Self::Color(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colors_and_urls() {
        assert_eq!(
            Background::parse("#112233"),
            Some(Background::Color("#112233".to_string()))
        );
        assert_eq!(
            Background::parse("url('https://example.com/a.jpg?w=10')"),
            Some(Background::Image("https://example.com/a.jpg?w=10".to_string()))
        );
        assert_eq!(
            Background::parse("url(plain.png)"),
            Some(Background::Image("plain.png".to_string()))
        );
        assert_eq!(Background::parse("   "), None);
    }
}
