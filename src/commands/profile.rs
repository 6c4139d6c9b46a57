use crate::commands::share::{self, Platform};
use crate::entities::profile::{blank, Profile};
use crate::gateway::{self, ImageKind};
use crate::State;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Please fix the errors before saving")]
    Invalid(Vec<FieldError>),

    #[error("Gateway error {0}")]
    Gateway(#[from] gateway::Error),
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

/// One field-keyed validation failure. Validation never raises; callers get
/// the whole set back and block submission themselves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s-]{10,}$").expect("phone pattern"));
static WEBSITE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$").expect("website pattern")
});

/// Checks the required and format-checked fields. Formats are only checked
/// when a value is present; clearing a field is always allowed.
pub fn validate(profile: &Profile) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if blank(&profile.full_name) {
        errors.push(FieldError {
            field: "full_name",
            message: "Full name is required",
        });
    }

    if let Some(email) = non_blank(&profile.contact_info.email) {
        if !EMAIL_RE.is_match(email) {
            errors.push(FieldError {
                field: "email",
                message: "Please enter a valid email address",
            });
        }
    }

    if let Some(phone) = non_blank(&profile.contact_info.mobile) {
        if !PHONE_RE.is_match(phone) {
            errors.push(FieldError {
                field: "phone",
                message: "Please enter a valid phone number",
            });
        }
    }

    let website = profile.social_links.get("website").map(|link| link.url.trim());
    if let Some(website) = website.filter(|url| !url.is_empty()) {
        if !WEBSITE_RE.is_match(website) {
            errors.push(FieldError {
                field: "website",
                message: "Please enter a valid website URL",
            });
        }
    }

    errors
}

/// Fetches the caller's profile, inserting the default skeleton when no row
/// exists yet. The existence check and the insert are two calls; a racing
/// second session can still hit a duplicate-key failure, which surfaces as
/// a plain gateway error.
pub async fn load_profile(state: &State) -> Result<Profile, Error> {
    let user = state.gateway.require_user().await?;
    if let Some(profile) = state
        .gateway
        .select_one::<Profile>("profiles", &user.id)
        .await?
    {
        debug!("Loaded profile {}", user.id);
        return Ok(profile);
    }

    info!("No profile row for {}, inserting the default skeleton", user.id);
    let profile = Profile::skeleton(&user.id, user.email.as_deref());
    state.gateway.insert("profiles", &profile).await?;
    Ok(profile)
}

/// Validates, normalizes and writes the profile. The public URL is always
/// recomputed from the session user and the canonical base; the profile is
/// forced public. Saving the same profile twice yields the same stored URL.
pub async fn save_profile(
    state: &State,
    platform: &Platform,
    mut profile: Profile,
) -> Result<Profile, Error> {
    let errors = validate(&profile);
    if !errors.is_empty() {
        return Err(Error::Invalid(errors));
    }

    let user = state.gateway.require_user().await?;
    profile.id = user.id.clone();
    profile.username = trimmed_or_none(&profile.username);
    profile.full_name = trimmed_or_none(&profile.full_name);
    profile.bio = trimmed_or_none(&profile.bio);
    profile.title = Some(
        trimmed_or_none(&profile.title).unwrap_or_else(|| "Nexia User".to_string()),
    );
    profile.is_public_profile = true;
    profile.public_profile_url = Some(share::canonical_profile_url(
        &state.config,
        platform,
        &user.id,
    ));
    profile.updated_at = Some(Utc::now());

    if state.gateway.exists("profiles", &user.id).await? {
        state.gateway.update("profiles", &user.id, &profile).await?;
    } else {
        state.gateway.insert("profiles", &profile).await?;
    }
    info!("Saved profile {}", user.id);
    Ok(profile)
}

/// Stores an avatar or cover image and writes the returned URL onto the
/// profile row.
pub async fn upload_profile_image(
    state: &State,
    kind: ImageKind,
    bytes: Vec<u8>,
) -> Result<String, Error> {
    let user = state.gateway.require_user().await?;
    let url = state.gateway.upload_image(&user.id, kind, bytes).await?;
    let column = match kind {
        ImageKind::Avatar => "avatar_url",
        ImageKind::Cover => "cover_url",
    };
    let patch = serde_json::json!({ column: url });
    state.gateway.update("profiles", &user.id, &patch).await?;
    Ok(url)
}

/// Fetches someone else's profile by id. A missing row is the normal
/// empty-profile state, not an error.
pub async fn view_profile(state: &State, user_id: &str) -> Result<Option<Profile>, Error> {
    Ok(state
        .gateway
        .select_one::<Profile>("profiles", user_id)
        .await?)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn trimmed_or_none(value: &Option<String>) -> Option<String> {
    non_blank(value).map(str::to_string)
}
