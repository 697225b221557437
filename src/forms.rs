//! Form-boundary validation for each content kind.
//!
//! Every form takes the raw text a user typed, validates it and produces a
//! [`ContentPayload`] ready for the formatter. Rejections carry the inline
//! message shown next to the form.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::formatter::datetime;
use crate::models::{
    CalendarPayload, ContentPayload, EmailPayload, LocationPayload, PhonePayload, TextPayload,
    UrlPayload, VCardPayload, WifiEncryption, WifiPayload,
};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s-]+$").expect("phone pattern compiles"));

/// A rejected form submission. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field is empty
    #[error("Please enter {0}")]
    Missing(&'static str),
    /// URL did not parse or is not http(s)
    #[error("Please enter a valid URL (e.g., https://example.com)")]
    InvalidUrl,
    /// Phone number contains characters other than digits, spaces, `-` and a leading `+`
    #[error("Please enter a valid phone number")]
    InvalidPhone,
    /// Email address does not look like `local@domain.tld`
    #[error("Please enter a valid email address")]
    InvalidEmail,
    /// Latitude or longitude is not a number
    #[error("Please enter valid numbers for coordinates")]
    InvalidCoordinates,
    /// Latitude outside [-90, 90]
    #[error("Latitude must be between -90 and 90 degrees")]
    LatitudeOutOfRange,
    /// Longitude outside [-180, 180]
    #[error("Longitude must be between -180 and 180 degrees")]
    LongitudeOutOfRange,
    /// Date-time field could not be converted
    #[error("Invalid {field}: {reason}")]
    InvalidDateTime {
        /// Which field
        field: &'static str,
        /// Conversion failure
        reason: String,
    },
    /// Contact form has no field filled in
    #[error("Please fill in at least one contact field")]
    EmptyContact,
}

/// Micro-format a free-text field is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDialect {
    /// `KEY:value;` records (MECARD, WIFI)
    Mecard,
    /// `KEY:value;` records whose value is a URI or address; `:` and `,` stay
    MecardUri,
    /// Line-oriented `KEY:value\n` records (vEvent)
    VEvent,
}

/// Neutralizes characters that would break the surrounding record.
///
/// ```
/// use lazyqr::forms::{sanitize_field, FieldDialect};
///
/// assert_eq!(sanitize_field("Cafe; Guest", FieldDialect::Mecard), r"Cafe\; Guest");
/// assert_eq!(sanitize_field("https://a.b/;c", FieldDialect::MecardUri), r"https://a.b/\;c");
/// assert_eq!(sanitize_field("two\nlines", FieldDialect::VEvent), "two lines");
/// ```
#[must_use]
pub fn sanitize_field(value: &str, dialect: FieldDialect) -> String {
    match dialect {
        FieldDialect::Mecard => escape(value, &['\\', ';', ',', ':']),
        FieldDialect::MecardUri => escape(value, &['\\', ';']),
        FieldDialect::VEvent => value
            .replace("\r\n", " ")
            .replace(['\r', '\n'], " "),
    }
}

fn escape(value: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Validates a web address.
pub fn url(input: &str) -> Result<ContentPayload, FormError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FormError::Missing("a URL"));
    }

    match url::Url::parse(input) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            Ok(ContentPayload::Url(UrlPayload {
                href: input.to_string(),
            }))
        }
        _ => Err(FormError::InvalidUrl),
    }
}

/// Validates free text. The text is kept as typed.
pub fn text(input: &str) -> Result<ContentPayload, FormError> {
    if input.trim().is_empty() {
        return Err(FormError::Missing("some text"));
    }
    Ok(ContentPayload::Text(TextPayload {
        body: input.to_string(),
    }))
}

/// Validates a phone number.
pub fn phone(input: &str) -> Result<ContentPayload, FormError> {
    let input = input.trim();
    if !PHONE_PATTERN.is_match(input) {
        return Err(FormError::InvalidPhone);
    }
    Ok(ContentPayload::Phone(PhonePayload {
        number: input.to_string(),
    }))
}

/// Validates an email draft. Empty subject or body are dropped.
pub fn email(address: &str, subject: &str, body: &str) -> Result<ContentPayload, FormError> {
    let address = address.trim();
    if !EMAIL_PATTERN.is_match(address) {
        return Err(FormError::InvalidEmail);
    }
    Ok(ContentPayload::Email(EmailPayload {
        address: address.to_string(),
        subject: optional(subject),
        body: optional(body),
    }))
}

/// Validates coordinates. The numeric text is kept as typed (trimmed).
pub fn location(latitude: &str, longitude: &str) -> Result<ContentPayload, FormError> {
    let (latitude, longitude) = (latitude.trim(), longitude.trim());
    let lat = parse_coordinate(latitude)?;
    let lng = parse_coordinate(longitude)?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(FormError::LatitudeOutOfRange);
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(FormError::LongitudeOutOfRange);
    }

    Ok(ContentPayload::Location(LocationPayload {
        latitude: latitude.to_string(),
        longitude: longitude.to_string(),
    }))
}

fn parse_coordinate(value: &str) -> Result<f64, FormError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(FormError::InvalidCoordinates)
}

/// Validates Wi-Fi credentials. Open networks never carry a password.
pub fn wifi(
    ssid: &str,
    encryption: WifiEncryption,
    password: &str,
) -> Result<ContentPayload, FormError> {
    if ssid.trim().is_empty() {
        return Err(FormError::Missing("the network name (SSID)"));
    }

    let password = match encryption {
        WifiEncryption::NoPass => String::new(),
        WifiEncryption::Wpa | WifiEncryption::Wep => sanitize_field(password, FieldDialect::Mecard),
    };

    Ok(ContentPayload::Wifi(WifiPayload {
        ssid: sanitize_field(ssid, FieldDialect::Mecard),
        encryption,
        password: Some(password),
    }))
}

/// Raw calendar form fields. Dates are local `YYYY-MM-DDTHH:MM` values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarForm {
    /// Event title
    pub title: String,
    /// Local start date-time
    pub start: String,
    /// Local end date-time (may be empty)
    pub end: String,
    /// Location (may be empty)
    pub location: String,
    /// Description (may be empty)
    pub description: String,
}

/// Validates a calendar event, converting dates from the system time zone to UTC.
pub fn calendar(form: &CalendarForm) -> Result<ContentPayload, FormError> {
    calendar_in(form, &chrono::Local)
}

/// Validates a calendar event with dates interpreted in `tz`.
pub fn calendar_in<Tz: chrono::TimeZone>(
    form: &CalendarForm,
    tz: &Tz,
) -> Result<ContentPayload, FormError> {
    if form.title.trim().is_empty() {
        return Err(FormError::Missing("an event title"));
    }
    if form.start.trim().is_empty() {
        return Err(FormError::Missing("a start date and time"));
    }

    let convert = |field: &'static str, value: &str| {
        datetime::to_utc_basic_in(value, tz).map_err(|e| FormError::InvalidDateTime {
            field,
            reason: e.to_string(),
        })
    };
    let start_date = convert("start date", &form.start)?;
    let end_date = convert("end date", &form.end)?;

    let single_line = |value: &str| optional(&sanitize_field(value, FieldDialect::VEvent));

    Ok(ContentPayload::Calendar(CalendarPayload {
        summary: sanitize_field(&form.title, FieldDialect::VEvent),
        start_date,
        end_date: optional(&end_date),
        location: single_line(&form.location),
        description: single_line(&form.description),
    }))
}

/// Validates a contact card; at least one field must be filled in.
///
/// A filled-in email or phone must pass the same checks as the standalone forms.
pub fn vcard(card: &VCardPayload) -> Result<ContentPayload, FormError> {
    if card.is_blank() {
        return Err(FormError::EmptyContact);
    }

    let email = card.email.as_deref().and_then(optional);
    if email.as_deref().is_some_and(|e| !EMAIL_PATTERN.is_match(e)) {
        return Err(FormError::InvalidEmail);
    }
    let phone = card.phone.as_deref().and_then(optional);
    if phone.as_deref().is_some_and(|p| !PHONE_PATTERN.is_match(p)) {
        return Err(FormError::InvalidPhone);
    }

    let clean = |value: &Option<String>| {
        value
            .as_deref()
            .and_then(|v| optional(&sanitize_field(v, FieldDialect::Mecard)))
    };

    Ok(ContentPayload::Vcard(VCardPayload {
        first_name: sanitize_field(card.first_name.trim(), FieldDialect::Mecard),
        last_name: sanitize_field(card.last_name.trim(), FieldDialect::Mecard),
        organization: clean(&card.organization),
        job_title: clean(&card.job_title),
        email: email.map(|e| sanitize_field(&e, FieldDialect::MecardUri)),
        phone,
        website: card
            .website
            .as_deref()
            .and_then(optional)
            .map(|w| sanitize_field(&w, FieldDialect::MecardUri)),
        address: clean(&card.address),
        note: clean(&card.note),
    }))
}

/// Empty or whitespace-only input becomes `None`.
fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
