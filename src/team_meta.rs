use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use ratatui::style::Color;

pub const LOGO_SIZE: u32 = 128;
const AVATAR_BASE: &str = "https://ui-avatars.com/api/";

// Characters encodeURIComponent leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

struct TeamStyle {
    name: &'static str,
    primary: &'static str,
    secondary: &'static str,
    tagline: &'static str,
}

const DEFAULT_PRIMARY: &str = "#667eea";
const DEFAULT_SECONDARY: &str = "#764ba2";
const DEFAULT_TAGLINE: &str = "Ready to Play";

const TEAM_STYLES: &[TeamStyle] = &[
    TeamStyle {
        name: "Maggi's Mighty Ducks",
        primary: "#FFD700",
        secondary: "#FFA500",
        tagline: "Quack Attack!",
    },
    TeamStyle {
        name: "Mebs Militia",
        primary: "#8B0000",
        secondary: "#DC143C",
        tagline: "Locked and Loaded",
    },
    TeamStyle {
        name: "Pels",
        primary: "#00CED1",
        secondary: "#20B2AA",
        tagline: "Soaring High",
    },
    TeamStyle {
        name: "Wolfpack",
        primary: "#4B0082",
        secondary: "#8A2BE2",
        tagline: "Howling for Wins",
    },
    TeamStyle {
        name: "The Brotherhood",
        primary: "#000000",
        secondary: "#333333",
        tagline: "United We Stand",
    },
    TeamStyle {
        name: "The Generous",
        primary: "#32CD32",
        secondary: "#228B22",
        tagline: "Giving Points Away",
    },
    TeamStyle {
        name: "The Ratpack",
        primary: "#FF6347",
        secondary: "#FF4500",
        tagline: "Squeaking By",
    },
    TeamStyle {
        name: "Woody",
        primary: "#8B4513",
        secondary: "#A0522D",
        tagline: "Rooted in Victory",
    },
    TeamStyle {
        name: "cheeseheads",
        primary: "#FFD700",
        secondary: "#FFA500",
        tagline: "Cheesy Goodness",
    },
    TeamStyle {
        name: "DirtyBirds",
        primary: "#000080",
        secondary: "#0000CD",
        tagline: "Flying Dirty",
    },
    TeamStyle {
        name: "Killer Cam",
        primary: "#FF1493",
        secondary: "#DC143C",
        tagline: "Cam-tastic",
    },
    TeamStyle {
        name: "Scrubs",
        primary: "#808080",
        secondary: "#A9A9A9",
        tagline: "Scrubbing the Competition",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMeta {
    pub logo: String,
    pub primary: String,
    pub secondary: String,
    pub gradient: String,
    pub tagline: String,
}

/// Display metadata for a team. Colors and tagline come from an exact-name table with one
/// fixed fallback; the logo is the normalized `logo_url` or a generated avatar.
pub fn resolve(team: &str, logo_url: Option<&str>) -> TeamMeta {
    let style = TEAM_STYLES.iter().find(|s| s.name == team);
    let (primary, secondary, tagline) = match style {
        Some(s) => (s.primary, s.secondary, s.tagline),
        None => (DEFAULT_PRIMARY, DEFAULT_SECONDARY, DEFAULT_TAGLINE),
    };
    let logo = match logo_url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => normalize_logo_url(url),
        None => placeholder_logo_url(team),
    };
    TeamMeta {
        logo,
        primary: primary.to_string(),
        secondary: secondary.to_string(),
        gradient: gradient(primary, secondary),
        tagline: tagline.to_string(),
    }
}

pub fn team_color(team: &str) -> Color {
    let primary = TEAM_STYLES
        .iter()
        .find(|s| s.name == team)
        .map(|s| s.primary)
        .unwrap_or(DEFAULT_PRIMARY);
    // Pure black is invisible on most terminal themes.
    match hex_color(primary) {
        Some(Color::Rgb(0, 0, 0)) => Color::Gray,
        Some(color) => color,
        None => Color::Reset,
    }
}

pub fn tagline(team: &str) -> &'static str {
    TEAM_STYLES
        .iter()
        .find(|s| s.name == team)
        .map(|s| s.tagline)
        .unwrap_or(DEFAULT_TAGLINE)
}

/// Replaces any `x`/`y` size parameters with `x=128&y=128`. Other parameters keep their exact
/// bytes, so an already encoded query is never re-encoded.
pub fn normalize_logo_url(raw: &str) -> String {
    let (rest, fragment) = match raw.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (raw, None),
    };
    let (base, query) = rest.split_once('?').unwrap_or((rest, ""));
    let mut params: Vec<&str> = query
        .split('&')
        .filter(|p| !p.is_empty())
        .filter(|p| {
            let key = p.split('=').next().unwrap_or("");
            key != "x" && key != "y"
        })
        .collect();
    let sized = format!("x={LOGO_SIZE}&y={LOGO_SIZE}");
    params.push(&sized);
    let mut out = format!("{base}?{}", params.join("&"));
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

pub fn placeholder_logo_url(team: &str) -> String {
    let name = utf8_percent_encode(team, COMPONENT);
    format!(
        "{AVATAR_BASE}?name={name}&size={LOGO_SIZE}&background=667eea&color=fff&bold=true&font-size=0.5"
    )
}

fn gradient(primary: &str, secondary: &str) -> String {
    format!("linear-gradient(135deg, {primary} 0%, {secondary} 100%)")
}

fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(hex_color("#00CED1"), Some(Color::Rgb(0, 206, 209)));
        assert_eq!(hex_color("00CED1"), None);
        assert_eq!(team_color("The Brotherhood"), Color::Gray);
    }

    #[test]
    fn relative_logo_urls_are_rewritten_as_strings() {
        assert_eq!(
            normalize_logo_url("/img/logo.png?x=40&v=2&y=40"),
            "/img/logo.png?v=2&x=128&y=128"
        );
        assert_eq!(normalize_logo_url("/img/logo.png"), "/img/logo.png?x=128&y=128");
    }
}
