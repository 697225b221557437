//! Structured content that gets turned into a QR payload string.
//!
//! Payloads are transient: a form builds one, the formatter consumes it once.
//! None of these types are persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of content a payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Web address, encoded verbatim
    Url,
    /// Free text, encoded verbatim (also the fallback kind)
    #[default]
    Text,
    /// Phone number as a `tel:` URI
    Phone,
    /// Email draft as a `mailto:` URI
    Email,
    /// Coordinates as a `geo:` URI
    Location,
    /// Wi-Fi network credentials
    Wifi,
    /// Calendar event (vEvent)
    Calendar,
    /// Contact card (MECARD)
    Vcard,
}

impl ContentKind {
    /// Every kind, in the order the content tabs present them.
    pub const ALL: [ContentKind; 8] = [
        ContentKind::Url,
        ContentKind::Text,
        ContentKind::Phone,
        ContentKind::Email,
        ContentKind::Location,
        ContentKind::Wifi,
        ContentKind::Calendar,
        ContentKind::Vcard,
    ];

    /// Lowercase name used on the wire and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Url => "url",
            ContentKind::Text => "text",
            ContentKind::Phone => "phone",
            ContentKind::Email => "email",
            ContentKind::Location => "location",
            ContentKind::Wifi => "wifi",
            ContentKind::Calendar => "calendar",
            ContentKind::Vcard => "vcard",
        }
    }

    /// Resolves a kind by name; unrecognized names resolve to [`ContentKind::Text`].
    ///
    /// ```
    /// use lazyqr::models::ContentKind;
    ///
    /// assert_eq!(ContentKind::from_name("wifi"), ContentKind::Wifi);
    /// assert_eq!(ContentKind::from_name("barcode"), ContentKind::Text);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name.trim())
            .unwrap_or_default()
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wi-Fi authentication type as written into the `T:` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WifiEncryption {
    /// WPA/WPA2
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    /// WEP
    #[serde(rename = "WEP")]
    Wep,
    /// Open network
    #[serde(rename = "nopass")]
    NoPass,
}

impl WifiEncryption {
    /// Value written after `T:`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            WifiEncryption::Wpa => "WPA",
            WifiEncryption::Wep => "WEP",
            WifiEncryption::NoPass => "nopass",
        }
    }

    /// Parses the `T:` value (case-insensitive; "none" is accepted for open networks).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wpa" | "wpa2" => Some(WifiEncryption::Wpa),
            "wep" => Some(WifiEncryption::Wep),
            "nopass" | "none" | "open" => Some(WifiEncryption::NoPass),
            _ => None,
        }
    }
}

impl fmt::Display for WifiEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Web address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPayload {
    /// Absolute URL
    pub href: String,
}

/// Free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPayload {
    /// Text body
    pub body: String,
}

/// Phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonePayload {
    /// Number as typed (digits, spaces, `+`, `-`)
    pub number: String,
}

/// Email draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPayload {
    /// Recipient address
    pub address: String,
    /// Optional subject line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Optional message body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Geographic coordinates, kept as the numeric text the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPayload {
    /// Latitude in [-90, 90]
    pub latitude: String,
    /// Longitude in [-180, 180]
    pub longitude: String,
}

/// Wi-Fi network credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiPayload {
    /// Network name
    pub ssid: String,
    /// Authentication type
    #[serde(default)]
    pub encryption: WifiEncryption,
    /// Network password; an absent password is written as empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Calendar event. Dates are UTC basic-format timestamps (`YYYYMMDDTHHMMSSZ`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarPayload {
    /// Event title
    pub summary: String,
    /// Start timestamp
    pub start_date: String,
    /// End timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Where the event takes place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Contact card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VCardPayload {
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Company or organization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Job title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-form note, appended after the organization/title/website lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl VCardPayload {
    /// Builds the `NOTE` value.
    ///
    /// MECARD has no dedicated fields for organization, job title or website,
    /// so they are carried as `ORG:`, `TITLE:` and `URL:` lines inside the note,
    /// each terminated by `\n`, followed by any explicit note text.
    /// Returns `None` when there is nothing to write.
    #[must_use]
    pub fn note(&self) -> Option<String> {
        let mut note = String::new();
        if let Some(org) = non_empty(self.organization.as_deref()) {
            note.push_str(&format!("ORG:{org}\n"));
        }
        if let Some(title) = non_empty(self.job_title.as_deref()) {
            note.push_str(&format!("TITLE:{title}\n"));
        }
        if let Some(url) = non_empty(self.website.as_deref()) {
            note.push_str(&format!("URL:{url}\n"));
        }
        if let Some(extra) = non_empty(self.note.as_deref()) {
            note.push_str(extra);
        }

        if note.is_empty() {
            None
        } else {
            Some(note)
        }
    }

    /// True when every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.first_name.trim().is_empty()
            && self.last_name.trim().is_empty()
            && [
                &self.organization,
                &self.job_title,
                &self.email,
                &self.phone,
                &self.website,
                &self.address,
                &self.note,
            ]
            .iter()
            .all(|field| non_empty(field.as_deref()).is_none())
    }
}

/// Structured content, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentPayload {
    /// Web address
    Url(UrlPayload),
    /// Free text
    Text(TextPayload),
    /// Phone number
    Phone(PhonePayload),
    /// Email draft
    Email(EmailPayload),
    /// Coordinates
    Location(LocationPayload),
    /// Wi-Fi credentials
    Wifi(WifiPayload),
    /// Calendar event
    Calendar(CalendarPayload),
    /// Contact card
    Vcard(VCardPayload),
}

impl ContentPayload {
    /// Kind of this payload.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            ContentPayload::Url(_) => ContentKind::Url,
            ContentPayload::Text(_) => ContentKind::Text,
            ContentPayload::Phone(_) => ContentKind::Phone,
            ContentPayload::Email(_) => ContentKind::Email,
            ContentPayload::Location(_) => ContentKind::Location,
            ContentPayload::Wifi(_) => ContentKind::Wifi,
            ContentPayload::Calendar(_) => ContentKind::Calendar,
            ContentPayload::Vcard(_) => ContentKind::Vcard,
        }
    }
}

/// Treats an empty optional field as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
