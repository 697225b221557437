//! Payload formatter: turns structured content into the string a QR symbol encodes.
//!
//! Formatting is pure and infallible. Identical input always yields a
//! byte-identical string, and empty optional fields are treated as absent.

pub mod datetime;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::models::payload::non_empty;
use crate::models::{
    CalendarPayload, ContentKind, ContentPayload, EmailPayload, VCardPayload, WifiPayload,
};

/// Characters left alone by ECMAScript `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a query component the way browsers' `encodeURIComponent` does.
///
/// ```
/// use lazyqr::formatter::encode_uri_component;
///
/// assert_eq!(encode_uri_component("Hello world & more"), "Hello%20world%20%26%20more");
/// assert_eq!(encode_uri_component("it's (ok)!"), "it's%20(ok)!");
/// ```
#[must_use]
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Formats a typed payload.
///
/// # Examples
///
/// ```
/// use lazyqr::formatter::format_payload;
/// use lazyqr::models::{ContentPayload, WifiEncryption, WifiPayload};
///
/// let payload = ContentPayload::Wifi(WifiPayload {
///     ssid: "Home".to_string(),
///     encryption: WifiEncryption::NoPass,
///     password: None,
/// });
/// assert_eq!(format_payload(&payload), "WIFI:T:nopass;S:Home;P:;;");
/// ```
#[must_use]
pub fn format_payload(payload: &ContentPayload) -> String {
    match payload {
        ContentPayload::Url(url) => url.href.clone(),
        ContentPayload::Text(text) => text.body.clone(),
        ContentPayload::Phone(phone) => format!("tel:{}", phone.number),
        ContentPayload::Location(location) => {
            format!("geo:{},{}", location.latitude, location.longitude)
        }
        ContentPayload::Email(email) => format_email(email),
        ContentPayload::Wifi(wifi) => format_wifi(wifi),
        ContentPayload::Calendar(event) => format_calendar(event),
        ContentPayload::Vcard(card) => format_vcard(card),
    }
}

/// Formats loosely-typed content, as received from JSON input.
///
/// `kind` is resolved with [`ContentKind::from_name`]. When the value does
/// not have the field shape of that kind, the text rule applies: a JSON
/// string is returned verbatim, anything else as its JSON text.
///
/// ```
/// use lazyqr::formatter::format_value;
/// use serde_json::json;
///
/// assert_eq!(format_value("phone", &json!({"number": "+1 555"})), "tel:+1 555");
/// assert_eq!(format_value("hologram", &json!("just text")), "just text");
/// ```
#[must_use]
pub fn format_value(kind: &str, value: &Value) -> String {
    let kind = ContentKind::from_name(kind);

    let mut tagged = value.clone();
    if let Value::Object(fields) = &mut tagged {
        fields.insert("kind".to_string(), Value::String(kind.as_str().to_string()));
    }

    match serde_json::from_value::<ContentPayload>(tagged) {
        Ok(payload) => format_payload(&payload),
        Err(e) => {
            tracing::debug!("Value does not match {} fields ({}), formatting as text", kind, e);
            match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            }
        }
    }
}

fn format_email(email: &EmailPayload) -> String {
    let mut out = format!("mailto:{}", email.address);
    if let Some(subject) = non_empty(email.subject.as_deref()) {
        out.push_str("?subject=");
        out.push_str(&encode_uri_component(subject));
    }
    // Body is joined with `&` even without a subject.
    if let Some(body) = non_empty(email.body.as_deref()) {
        out.push_str("&body=");
        out.push_str(&encode_uri_component(body));
    }
    out
}

fn format_wifi(wifi: &WifiPayload) -> String {
    format!(
        "WIFI:T:{};S:{};P:{};;",
        wifi.encryption,
        wifi.ssid,
        wifi.password.as_deref().unwrap_or_default()
    )
}

fn format_calendar(event: &CalendarPayload) -> String {
    let mut out = String::from("BEGIN:VEVENT\n");
    out.push_str(&format!("SUMMARY:{}\n", event.summary));
    out.push_str(&format!("DTSTART:{}\n", event.start_date));
    out.push_str(&format!(
        "DTEND:{}\n",
        event.end_date.as_deref().unwrap_or_default()
    ));
    if let Some(location) = non_empty(event.location.as_deref()) {
        out.push_str(&format!("LOCATION:{location}\n"));
    }
    if let Some(description) = non_empty(event.description.as_deref()) {
        out.push_str(&format!("DESCRIPTION:{description}\n"));
    }
    out.push_str("END:VEVENT");
    out
}

fn format_vcard(card: &VCardPayload) -> String {
    let mut out = format!("MECARD:N:{},{};", card.last_name, card.first_name);
    if let Some(phone) = non_empty(card.phone.as_deref()) {
        out.push_str(&format!("TEL:{phone};"));
    }
    if let Some(email) = non_empty(card.email.as_deref()) {
        out.push_str(&format!("EMAIL:{email};"));
    }
    if let Some(address) = non_empty(card.address.as_deref()) {
        out.push_str(&format!("ADR:{address};"));
    }
    if let Some(note) = card.note() {
        out.push_str(&format!("NOTE:{note};"));
    }
    out.push(';');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        LocationPayload, PhonePayload, TextPayload, UrlPayload, WifiEncryption,
    };
    use serde_json::json;

    fn email(address: &str, subject: Option<&str>, body: Option<&str>) -> ContentPayload {
        ContentPayload::Email(EmailPayload {
            address: address.to_string(),
            subject: subject.map(str::to_string),
            body: body.map(str::to_string),
        })
    }

    #[test]
    fn test_url_and_text_verbatim() {
        let url = ContentPayload::Url(UrlPayload {
            href: "https://example.com/a?b=c".to_string(),
        });
        assert_eq!(format_payload(&url), "https://example.com/a?b=c");

        let text = ContentPayload::Text(TextPayload {
            body: "line one\nline two".to_string(),
        });
        assert_eq!(format_payload(&text), "line one\nline two");
    }

    #[test]
    fn test_phone_and_location() {
        let phone = ContentPayload::Phone(PhonePayload {
            number: "+1 555-0100".to_string(),
        });
        assert_eq!(format_payload(&phone), "tel:+1 555-0100");

        let location = ContentPayload::Location(LocationPayload {
            latitude: "52.52".to_string(),
            longitude: "-13.405".to_string(),
        });
        assert_eq!(format_payload(&location), "geo:52.52,-13.405");
    }

    #[test]
    fn test_email_subject_only_when_body_empty() {
        let payload = email("a@b.com", Some("Hi"), Some(""));
        assert_eq!(format_payload(&payload), "mailto:a@b.com?subject=Hi");
    }

    #[test]
    fn test_email_subject_and_body_are_percent_encoded() {
        let payload = email("a@b.com", Some("Hi there"), Some("See you @ 5 & bring café"));
        assert_eq!(
            format_payload(&payload),
            "mailto:a@b.com?subject=Hi%20there&body=See%20you%20%40%205%20%26%20bring%20caf%C3%A9"
        );
    }

    #[test]
    fn test_email_body_without_subject_uses_ampersand() {
        let payload = email("x", None, Some("hello world"));
        assert_eq!(format_payload(&payload), "mailto:x&body=hello%20world");
    }

    #[test]
    fn test_email_address_only() {
        assert_eq!(format_payload(&email("x@y.z", None, None)), "mailto:x@y.z");
    }

    #[test]
    fn test_wifi_nopass_keeps_empty_password_segment() {
        let payload = ContentPayload::Wifi(WifiPayload {
            ssid: "Home".to_string(),
            encryption: WifiEncryption::NoPass,
            password: Some(String::new()),
        });
        assert_eq!(format_payload(&payload), "WIFI:T:nopass;S:Home;P:;;");
    }

    #[test]
    fn test_wifi_wpa() {
        let payload = ContentPayload::Wifi(WifiPayload {
            ssid: "Office".to_string(),
            encryption: WifiEncryption::Wpa,
            password: Some("s3cret".to_string()),
        });
        assert_eq!(format_payload(&payload), "WIFI:T:WPA;S:Office;P:s3cret;;");
    }

    #[test]
    fn test_calendar_full() {
        let payload = ContentPayload::Calendar(CalendarPayload {
            summary: "Standup".to_string(),
            start_date: "20240301T090000Z".to_string(),
            end_date: Some("20240301T091500Z".to_string()),
            location: Some("Room 4".to_string()),
            description: Some("Daily sync".to_string()),
        });
        assert_eq!(
            format_payload(&payload),
            "BEGIN:VEVENT\nSUMMARY:Standup\nDTSTART:20240301T090000Z\nDTEND:20240301T091500Z\n\
             LOCATION:Room 4\nDESCRIPTION:Daily sync\nEND:VEVENT"
        );
    }

    #[test]
    fn test_calendar_without_optionals_keeps_empty_end() {
        let payload = ContentPayload::Calendar(CalendarPayload {
            summary: "Launch".to_string(),
            start_date: "20240301T090000Z".to_string(),
            end_date: None,
            location: Some(String::new()),
            description: None,
        });
        assert_eq!(
            format_payload(&payload),
            "BEGIN:VEVENT\nSUMMARY:Launch\nDTSTART:20240301T090000Z\nDTEND:\nEND:VEVENT"
        );
    }

    #[test]
    fn test_vcard_minimal() {
        let payload = ContentPayload::Vcard(VCardPayload {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..VCardPayload::default()
        });
        assert_eq!(format_payload(&payload), "MECARD:N:Lovelace,Ada;;");
    }

    #[test]
    fn test_vcard_all_segments_in_order() {
        let payload = ContentPayload::Vcard(VCardPayload {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            organization: Some("Engines Ltd".to_string()),
            job_title: None,
            email: Some("ada@example.com".to_string()),
            phone: Some("+44 20 0000".to_string()),
            website: Some(String::new()),
            address: Some("London".to_string()),
            note: None,
        });
        assert_eq!(
            format_payload(&payload),
            "MECARD:N:Lovelace,Ada;TEL:+44 20 0000;EMAIL:ada@example.com;ADR:London;\
             NOTE:ORG:Engines Ltd\n;;"
        );
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let payload = email("a@b.com", Some("Über"), Some("ß"));
        assert_eq!(format_payload(&payload), format_payload(&payload.clone()));
    }

    #[test]
    fn test_format_value_typed_fields() {
        assert_eq!(
            format_value(
                "wifi",
                &json!({"ssid": "Cafe", "encryption": "WEP", "password": "abc"})
            ),
            "WIFI:T:WEP;S:Cafe;P:abc;;"
        );
        assert_eq!(
            format_value("calendar", &json!({"summary": "X", "startDate": "20240101T000000Z"})),
            "BEGIN:VEVENT\nSUMMARY:X\nDTSTART:20240101T000000Z\nDTEND:\nEND:VEVENT"
        );
    }

    #[test]
    fn test_format_value_unknown_kind_falls_back_to_text() {
        assert_eq!(format_value("barcode", &json!("plain")), "plain");
        assert_eq!(format_value("barcode", &json!({"body": "from body"})), "from body");
        assert_eq!(format_value("", &json!(42)), "42");
    }

    #[test]
    fn test_format_value_shape_mismatch_falls_back_to_text() {
        assert_eq!(format_value("url", &json!("https://example.com")), "https://example.com");
        assert_eq!(format_value("phone", &json!({"nope": 1})), r#"{"nope":1}"#);
    }
}
