use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Platforms a user may pick from when adding a social link.
pub const SOCIAL_PLATFORMS: [&str; 11] = [
    "facebook",
    "instagram",
    "twitter",
    "linkedin",
    "youtube",
    "github",
    "pinterest",
    "tiktok",
    "snapchat",
    "whatsapp",
    "website",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Mobile,
    Email,
    Sms,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub sms: Option<String>,
    /// Only methods listed here are displayed or editable.
    #[serde(default)]
    pub enabled: Vec<ContactMethod>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Address {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub map_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SocialLink {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for SocialLink {
    fn default() -> Self {
        SocialLink {
            url: String::new(),
            enabled: true,
            label: None,
        }
    }
}

/// One entry of the ordered heading list. Ids are millisecond timestamps
/// assigned at append time and unique within the profile.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Heading {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subheading: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub heading: Vec<Heading>,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub social_links: BTreeMap<String, SocialLink>,
    #[serde(default)]
    pub custom_sections: Vec<serde_json::Value>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub is_public_profile: bool,
    #[serde(default)]
    pub public_profile_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Default skeleton inserted on first visit to the edit screen when no
    /// row exists yet. Only the email contact method starts enabled.
    pub fn skeleton(id: &str, email: Option<&str>) -> Self {
        let mut social_links = BTreeMap::new();
        for platform in ["facebook", "instagram", "twitter", "linkedin", "github", "website"] {
            social_links.insert(platform.to_string(), SocialLink::default());
        }
        Profile {
            id: id.to_string(),
            email: email.map(str::to_string),
            username: None,
            full_name: None,
            title: None,
            bio: None,
            heading: Vec::new(),
            contact_info: ContactInfo {
                mobile: None,
                email: email.map(str::to_string),
                sms: None,
                enabled: vec![ContactMethod::Email],
            },
            address: Address::default(),
            social_links,
            custom_sections: Vec::new(),
            avatar_url: None,
            cover_url: None,
            is_public_profile: true,
            public_profile_url: None,
            updated_at: Some(Utc::now()),
        }
    }

    /// A profile renders as the empty-state placeholder only when the name,
    /// the title and the enabled contact methods are all absent at once.
    pub fn is_empty(&self) -> bool {
        let missing_name = blank(&self.full_name);
        let missing_title = blank(&self.title);
        let missing_contact = self.contact_info.enabled.is_empty();
        missing_name && missing_title && missing_contact
    }

    /// Appends a heading entry, keeping ids strictly increasing even when
    /// two entries are added within the same millisecond.
    pub fn add_heading(&mut self, title: &str, subheading: &str) -> i64 {
        let now = Utc::now().timestamp_millis();
        let id = match self.heading.last() {
            Some(last) if last.id >= now => last.id + 1,
            _ => now,
        };
        self.heading.push(Heading {
            id,
            title: title.to_string(),
            subheading: subheading.to_string(),
        });
        id
    }

    pub fn update_heading(&mut self, index: usize, title: &str, subheading: &str) {
        if let Some(entry) = self.heading.get_mut(index) {
            entry.title = title.to_string();
            entry.subheading = subheading.to_string();
        }
    }

    pub fn remove_heading(&mut self, index: usize) {
        if index < self.heading.len() {
            self.heading.remove(index);
        }
    }

    /// Enables a contact method, or disables it when already enabled.
    pub fn toggle_contact_method(&mut self, method: ContactMethod) {
        if let Some(pos) = self.contact_info.enabled.iter().position(|m| *m == method) {
            self.contact_info.enabled.remove(pos);
        } else {
            self.contact_info.enabled.push(method);
        }
    }

    /// Adds a platform from the catalog. Unknown platforms and platforms
    /// already present are rejected.
    pub fn add_social_platform(&mut self, platform: &str) -> bool {
        if !SOCIAL_PLATFORMS.contains(&platform) || self.social_links.contains_key(platform) {
            return false;
        }
        self.social_links.insert(platform.to_string(), SocialLink::default());
        true
    }
}

pub(crate) fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_needs_all_three_fields_missing() {
        let mut profile = Profile::skeleton("u1", None);
        profile.contact_info.enabled.clear();
        assert!(profile.is_empty());

        // A title alone makes the profile non-empty.
        profile.title = Some("Dev".to_string());
        assert!(!profile.is_empty());

        profile.title = Some(String::new());
        assert!(profile.is_empty());

        profile.full_name = Some("Ada".to_string());
        assert!(!profile.is_empty());

        profile.full_name = None;
        profile.contact_info.enabled.push(ContactMethod::Sms);
        assert!(!profile.is_empty());
    }

    #[test]
    fn skeleton_enables_email_only() {
        let profile = Profile::skeleton("u1", Some("ada@example.com"));
        assert_eq!(profile.contact_info.enabled, vec![ContactMethod::Email]);
        assert_eq!(profile.contact_info.email.as_deref(), Some("ada@example.com"));
        assert!(profile.is_public_profile);
        assert!(profile.social_links.contains_key("website"));
        assert!(!profile.social_links.contains_key("tiktok"));
    }

    #[test]
    fn heading_ids_stay_unique_and_ordered() {
        let mut profile = Profile::skeleton("u1", None);
        let a = profile.add_heading("First", "");
        let b = profile.add_heading("Second", "");
        let c = profile.add_heading("Third", "");
        assert!(a < b && b < c);
        assert_eq!(
            profile.heading.iter().map(|h| h.title.as_str()).collect::<Vec<_>>(),
            ["First", "Second", "Third"]
        );

        profile.remove_heading(1);
        assert_eq!(profile.heading.len(), 2);
        assert_eq!(profile.heading[1].title, "Third");
    }

    #[test]
    fn social_platform_catalog_is_enforced() {
        let mut profile = Profile::skeleton("u1", None);
        assert!(profile.add_social_platform("tiktok"));
        assert!(!profile.add_social_platform("tiktok"));
        assert!(!profile.add_social_platform("myspace"));
    }

    #[test]
    fn contact_method_toggle_round_trips() {
        let mut profile = Profile::skeleton("u1", None);
        profile.toggle_contact_method(ContactMethod::Mobile);
        assert!(profile.contact_info.enabled.contains(&ContactMethod::Mobile));
        profile.toggle_contact_method(ContactMethod::Mobile);
        assert!(!profile.contact_info.enabled.contains(&ContactMethod::Mobile));
    }

    #[test]
    fn profile_row_with_nulls_deserializes() {
        let row = r#"{
            "id": "u1",
            "username": null,
            "full_name": "Ada",
            "title": null,
            "heading": [{"id": 1700000000000, "title": "Hi", "subheading": ""}],
            "contact_info": {"email": "ada@example.com", "enabled": ["email", "sms"]},
            "social_links": {"github": {"url": "https://github.com/ada"}},
            "is_public_profile": true
        }"#;
        let profile: Profile = serde_json::from_str(row).expect("profile row");
        assert_eq!(profile.full_name.as_deref(), Some("Ada"));
        assert_eq!(
            profile.contact_info.enabled,
            vec![ContactMethod::Email, ContactMethod::Sms]
        );
        let github = &profile.social_links["github"];
        assert!(github.enabled);
        assert_eq!(github.url, "https://github.com/ada");
    }
}
