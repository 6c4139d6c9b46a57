use crate::commands::share::{self, Resolved};
use crate::layout::Breakpoint;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};

pub const MAX_CORNER_RADIUS: u8 = 25;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Qr encoding error {0}")]
    Encode(#[from] qrcode::types::QrError),
}

// we must manually implement serde::Serialize
impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QrStyle {
    Dots,
    Squares,
    Rounded,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QrOptions {
    pub foreground: String,
    pub background: String,
    pub style: QrStyle,
    /// Eye rounding, clamped to `0..=25`.
    pub corner_radius: u8,
    pub show_logo: bool,
    pub logo_url: Option<String>,
}

impl Default for QrOptions {
    fn default() -> Self {
        QrOptions {
            foreground: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
            style: QrStyle::Dots,
            corner_radius: 0,
            show_logo: true,
            logo_url: None,
        }
    }
}

/// Everything a shell needs to draw the code: the rendered SVG plus the
/// overlay parameters it applies on top.
#[derive(Clone, Debug, Serialize)]
pub struct QrPayload {
    pub svg: String,
    pub size: u32,
    pub style: QrStyle,
    pub logo_url: Option<String>,
    pub logo_size: u32,
    pub outer_eye_radius: u8,
    pub inner_eye_radius: u8,
}

/// What a scanned payload turned out to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Navigate to this profile.
    Profile(String),
    /// Offer the raw string as a generic external link.
    External(String),
    /// Nothing usable; the scanner keeps scanning.
    Rearm,
}

/// Encodes a share URL at error-correction level H so the embedded logo
/// does not break scan reliability. The side length follows the viewport
/// tier the way the profile screen sizes its code.
pub fn encode(value: &str, options: &QrOptions, breakpoint: Breakpoint) -> Result<QrPayload, Error> {
    let (size, logo_size) = if breakpoint >= Breakpoint::Md {
        (220, 50)
    } else {
        (200, 40)
    };
    let code = QrCode::with_error_correction_level(value.as_bytes(), EcLevel::H)?;
    let svg = code
        .render::<svg::Color>()
        .min_dimensions(size, size)
        .quiet_zone(true)
        .dark_color(svg::Color(&options.foreground))
        .light_color(svg::Color(&options.background))
        .build();
    let corner_radius = options.corner_radius.min(MAX_CORNER_RADIUS);
    Ok(QrPayload {
        svg,
        size,
        style: options.style,
        logo_url: if options.show_logo {
            options.logo_url.clone()
        } else {
            None
        },
        logo_size,
        outer_eye_radius: corner_radius,
        inner_eye_radius: corner_radius / 2,
    })
}

/// Classifies a scanned payload. Malformed or empty input never errors;
/// the scanner simply re-arms.
pub fn scan(raw: &str) -> ScanOutcome {
    match share::resolve(raw) {
        Resolved::Profile(id) => ScanOutcome::Profile(id),
        Resolved::External(url) => ScanOutcome::External(url),
        Resolved::Landing | Resolved::Invalid => ScanOutcome::Rearm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_renders_svg_with_the_chosen_colors() {
        let options = QrOptions::default();
        let payload = encode(
            "https://nexia.naveennuwantha.lk/viewprofile/42",
            &options,
            Breakpoint::Xs,
        )
        .expect("payload");
        assert!(payload.svg.starts_with("<?xml"));
        assert!(payload.svg.contains("#000000"));
        assert!(payload.svg.contains("#FFFFFF"));
        assert_eq!(payload.size, 200);
        assert_eq!(payload.logo_size, 40);
    }

    #[test]
    fn wide_viewports_get_the_larger_tier() {
        let payload = encode("nexia://viewprofile/42", &QrOptions::default(), Breakpoint::Lg)
            .expect("payload");
        assert_eq!(payload.size, 220);
        assert_eq!(payload.logo_size, 50);
    }

    #[test]
    fn corner_radius_is_clamped() {
        let options = QrOptions {
            corner_radius: 80,
            ..QrOptions::default()
        };
        let payload = encode("nexia://viewprofile/42", &options, Breakpoint::Xs).expect("payload");
        assert_eq!(payload.outer_eye_radius, 25);
        assert_eq!(payload.inner_eye_radius, 12);
    }

    #[test]
    fn hiding_the_logo_drops_it_from_the_payload() {
        let options = QrOptions {
            show_logo: false,
            logo_url: Some("https://nexia.example/avatar.jpg".to_string()),
            ..QrOptions::default()
        };
        let payload = encode("nexia://viewprofile/42", &options, Breakpoint::Xs).expect("payload");
        assert_eq!(payload.logo_url, None);
    }

    #[test]
    fn scanning_legacy_and_canonical_links_agree() {
        let canonical = scan("https://nexia.example/viewprofile/42");
        let legacy = scan("https://nexia.example/public-profile/42");
        assert_eq!(canonical, legacy);
        assert_eq!(canonical, ScanOutcome::Profile("42".to_string()));
    }

    #[test]
    fn unknown_payloads_become_external_links() {
        assert_eq!(
            scan("https://random.example/page"),
            ScanOutcome::External("https://random.example/page".to_string())
        );
    }

    #[test]
    fn empty_payloads_rearm_the_scanner() {
        assert_eq!(scan(""), ScanOutcome::Rearm);
        assert_eq!(scan("   "), ScanOutcome::Rearm);
        assert_eq!(scan("https://nexia.example/viewprofile/"), ScanOutcome::Rearm);
    }
}
