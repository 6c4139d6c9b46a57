use crate::entities::profile::Profile;

/// Renders the downloadable contact card for a profile.
///
/// Field order is fixed. Values are emitted as-is: embedded `;`, `,` and
/// newlines are not escaped, matching the cards the app has always
/// produced.
pub fn vcard(profile: &Profile) -> String {
    let contact = &profile.contact_info;
    let address = &profile.address;
    let field = |value: &Option<String>| value.clone().unwrap_or_default();
    [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", field(&profile.full_name)),
        format!("TEL;TYPE=CELL:{}", field(&contact.mobile)),
        format!("EMAIL:{}", field(&contact.email)),
        format!(
            "ADR;TYPE=WORK:;;{};{};{};{};{}",
            field(&address.line1),
            field(&address.city),
            field(&address.state),
            field(&address.zipcode),
            field(&address.country),
        ),
        "END:VCARD".to_string(),
    ]
    .join("\n")
}

/// Suggested download name for the card.
pub fn file_name(profile: &Profile) -> String {
    match profile.full_name.as_deref() {
        Some(name) if !name.trim().is_empty() => format!("{name}.vcf"),
        _ => "contact.vcf".to_string(),
    }
}
