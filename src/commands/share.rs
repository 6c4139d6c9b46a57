//! Public-profile URL resolver.
//!
//! Single source of truth in both directions: a user id becomes exactly one
//! canonical share URL, and every link shape ever issued — canonical path,
//! legacy `/public-profile/` path, `nexia://` deep link, `/qr?id=`
//! indirection — resolves back to the same user id. The alias set lives in
//! one ordered rule table instead of scattered substring checks.

use crate::config::Config;
use url::Url;

/// Where the caller is running. Selected at composition time by the shell,
/// never sniffed at call sites.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Platform {
    Web { origin: Option<Url> },
    Native,
}

/// Outcome of resolving an inbound link or scanned payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    /// A profile reference, carrying the extracted user id.
    Profile(String),
    /// The `/qr` indirection without an id: go to the default landing spot.
    Landing,
    /// No recognized marker; hand the string back for generic handling.
    External(String),
    /// A recognized marker with nothing after it.
    Invalid,
}

/// Recognized path markers, checked for the last occurrence in the input.
const MARKERS: [&str; 4] = [
    "nexia://viewprofile/",
    "nexia://public-profile/",
    "/viewprofile/",
    "/public-profile/",
];

const LEGACY_SEGMENT: &str = "/public-profile/";
const CANONICAL_SEGMENT: &str = "/viewprofile/";

/// The one outbound form. Web callers on a local development host get their
/// own origin so links stay clickable; everyone else gets the production
/// domain. Native callers get the app scheme.
pub fn canonical_profile_url(config: &Config, platform: &Platform, user_id: &str) -> String {
    match platform {
        Platform::Web { origin } => {
            let base = match origin {
                Some(origin) if is_local_host(origin) => {
                    origin.origin().ascii_serialization()
                }
                _ => config.app_url.clone(),
            };
            format!("{}/viewprofile/{user_id}", base.trim_end_matches('/'))
        }
        Platform::Native => format!("nexia://viewprofile/{user_id}"),
    }
}

fn is_local_host(origin: &Url) -> bool {
    matches!(origin.host_str(), Some("localhost") | Some("127.0.0.1"))
}

/// Resolves any previously-issued URL shape back to its target.
pub fn resolve(input: &str) -> Resolved {
    let input = input.trim();
    if input.is_empty() {
        return Resolved::Invalid;
    }

    let marker_hit = MARKERS
        .iter()
        .filter_map(|marker| input.rfind(marker))
        .max();
    if marker_hit.is_some() {
        let id = input.rsplit('/').next().unwrap_or("");
        if id.is_empty() {
            return Resolved::Invalid;
        }
        return Resolved::Profile(id.to_string());
    }

    // QR redirect indirection: `/qr?id={userId}`, no id means landing page.
    if let Ok(url) = Url::parse(input) {
        if url.path() == "/qr" || url.path().ends_with("/qr") {
            return match url.query_pairs().find(|(key, _)| key == "id") {
                Some((_, id)) if !id.is_empty() => Resolved::Profile(id.into_owned()),
                _ => Resolved::Landing,
            };
        }
    }

    Resolved::External(input.to_string())
}

/// Rewrites the legacy path segment wherever a URL is persisted or shown
/// again; the old form never propagates further.
pub fn canonicalize(url: &str) -> String {
    if url.contains(LEGACY_SEGMENT) {
        url.replace(LEGACY_SEGMENT, CANONICAL_SEGMENT)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web(origin: Option<&str>) -> Platform {
        Platform::Web {
            origin: origin.map(|o| Url::parse(o).expect("origin")),
        }
    }

    #[test]
    fn canonical_url_uses_production_domain_on_web() {
        let config = Config::default();
        assert_eq!(
            canonical_profile_url(&config, &web(None), "42"),
            "https://nexia.naveennuwantha.lk/viewprofile/42"
        );
        assert_eq!(
            canonical_profile_url(&config, &web(Some("https://nexia.naveennuwantha.lk")), "42"),
            "https://nexia.naveennuwantha.lk/viewprofile/42"
        );
    }

    #[test]
    fn local_development_origin_is_substituted() {
        let config = Config::default();
        assert_eq!(
            canonical_profile_url(&config, &web(Some("http://localhost:3000")), "42"),
            "http://localhost:3000/viewprofile/42"
        );
        assert_eq!(
            canonical_profile_url(&config, &web(Some("http://127.0.0.1:3000")), "42"),
            "http://127.0.0.1:3000/viewprofile/42"
        );
    }

    #[test]
    fn native_callers_get_the_app_scheme() {
        let config = Config::default();
        assert_eq!(
            canonical_profile_url(&config, &Platform::Native, "42"),
            "nexia://viewprofile/42"
        );
    }

    #[test]
    fn every_accepted_shape_resolves_to_the_same_id() {
        for link in [
            "https://nexia.example/viewprofile/42",
            "https://nexia.example/public-profile/42",
            "https://nexia.example/qr?id=42",
            "nexia://viewprofile/42",
            "nexia://public-profile/42",
        ] {
            assert_eq!(resolve(link), Resolved::Profile("42".to_string()), "{link}");
        }
    }

    #[test]
    fn resolve_then_encode_is_idempotent() {
        let config = Config::default();
        for link in [
            "https://nexia.naveennuwantha.lk/viewprofile/42",
            "https://nexia.naveennuwantha.lk/public-profile/42",
            "nexia://viewprofile/42",
        ] {
            let platform = if link.starts_with("nexia://") {
                Platform::Native
            } else {
                web(None)
            };
            let Resolved::Profile(id) = resolve(link) else {
                panic!("{link} did not resolve to a profile");
            };
            let canonical = canonical_profile_url(&config, &platform, &id);
            assert_eq!(resolve(&canonical), Resolved::Profile(id));
            // Re-encoding the canonical form changes nothing.
            assert_eq!(canonical, canonicalize(&canonical));
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        // Saving a profile twice with no changes stores the same URL both
        // times; the outbound form depends only on its inputs.
        let config = Config::default();
        let first = canonical_profile_url(&config, &web(None), "42");
        let second = canonical_profile_url(&config, &web(None), "42");
        assert_eq!(first, second);
    }

    #[test]
    fn unrecognized_urls_come_back_unresolved() {
        assert_eq!(
            resolve("https://random.example/page"),
            Resolved::External("https://random.example/page".to_string())
        );
        assert_eq!(resolve("plain text"), Resolved::External("plain text".to_string()));
    }

    #[test]
    fn qr_without_an_id_goes_to_the_landing_page() {
        assert_eq!(resolve("https://nexia.example/qr"), Resolved::Landing);
        assert_eq!(resolve("https://nexia.example/qr?id="), Resolved::Landing);
    }

    #[test]
    fn marker_without_an_id_is_invalid() {
        assert_eq!(resolve("https://nexia.example/viewprofile/"), Resolved::Invalid);
        assert_eq!(resolve(""), Resolved::Invalid);
    }

    #[test]
    fn last_marker_wins() {
        // A legacy link wrapped in a redirect parameter still resolves to
        // the innermost reference.
        let nested = "https://nexia.example/public-profile/abc/viewprofile/42";
        assert_eq!(resolve(nested), Resolved::Profile("42".to_string()));
    }

    #[test]
    fn legacy_segment_is_rewritten_everywhere() {
        assert_eq!(
            canonicalize("https://nexia.example/public-profile/42"),
            "https://nexia.example/viewprofile/42"
        );
        assert_eq!(
            canonicalize("nexia://public-profile/42"),
            "nexia://viewprofile/42"
        );
        let untouched = "https://nexia.example/viewprofile/42";
        assert_eq!(canonicalize(untouched), untouched);
    }
}
