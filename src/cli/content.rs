//! Content form arguments shared by `format` and `render`.

use clap::{Args, Subcommand};

use crate::cli::common::{CliError, CliResult};
use crate::forms::{self, CalendarForm};
use crate::models::{ContentPayload, VCardPayload, WifiEncryption};

/// Content to encode, one subcommand per content kind.
#[derive(Subcommand, Debug, Clone)]
pub enum ContentArgs {
    /// Web address (http or https)
    Url {
        /// The URL
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Free text
    Text {
        /// The text
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Phone number
    Phone {
        /// Digits, spaces, dashes and an optional leading +
        #[arg(value_name = "NUMBER")]
        number: String,
    },
    /// Email draft
    Email(EmailArgs),
    /// Geographic coordinates
    Location(LocationArgs),
    /// Wi-Fi network credentials
    Wifi(WifiArgs),
    /// Calendar event
    Calendar(CalendarArgs),
    /// Contact card
    Vcard(VCardArgs),
}

/// Email fields
#[derive(Args, Debug, Clone)]
pub struct EmailArgs {
    /// Recipient address
    #[arg(long, value_name = "ADDRESS")]
    address: String,
    /// Subject line
    #[arg(long, default_value = "")]
    subject: String,
    /// Message body
    #[arg(long, default_value = "")]
    body: String,
}

/// Coordinate fields
#[derive(Args, Debug, Clone)]
pub struct LocationArgs {
    /// Latitude (-90 to 90)
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    latitude: String,
    /// Longitude (-180 to 180)
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    longitude: String,
}

/// Wi-Fi fields
#[derive(Args, Debug, Clone)]
pub struct WifiArgs {
    /// Network name
    #[arg(long)]
    ssid: String,
    /// Authentication (WPA, WEP or nopass)
    #[arg(long, default_value = "WPA")]
    encryption: String,
    /// Network password
    #[arg(long, default_value = "")]
    password: String,
}

/// Calendar fields; dates are local `YYYY-MM-DDTHH:MM`
#[derive(Args, Debug, Clone)]
pub struct CalendarArgs {
    /// Event title
    #[arg(long)]
    title: String,
    /// Start date and time
    #[arg(long, value_name = "DATETIME")]
    start: String,
    /// End date and time
    #[arg(long, value_name = "DATETIME", default_value = "")]
    end: String,
    /// Location
    #[arg(long, default_value = "")]
    location: String,
    /// Description
    #[arg(long, default_value = "")]
    description: String,
}

/// Contact fields; at least one is required
#[derive(Args, Debug, Clone)]
pub struct VCardArgs {
    /// Given name
    #[arg(long, default_value = "")]
    first_name: String,
    /// Family name
    #[arg(long, default_value = "")]
    last_name: String,
    /// Organization
    #[arg(long)]
    organization: Option<String>,
    /// Job title
    #[arg(long)]
    job_title: Option<String>,
    /// Email address
    #[arg(long)]
    email: Option<String>,
    /// Phone number
    #[arg(long)]
    phone: Option<String>,
    /// Website
    #[arg(long)]
    website: Option<String>,
    /// Postal address
    #[arg(long)]
    address: Option<String>,
    /// Note
    #[arg(long)]
    note: Option<String>,
}

impl ContentArgs {
    /// Runs the matching form validation.
    pub fn to_payload(&self) -> CliResult<ContentPayload> {
        let payload = match self {
            ContentArgs::Url { url } => forms::url(url)?,
            ContentArgs::Text { text } => forms::text(text)?,
            ContentArgs::Phone { number } => forms::phone(number)?,
            ContentArgs::Email(args) => forms::email(&args.address, &args.subject, &args.body)?,
            ContentArgs::Location(args) => forms::location(&args.latitude, &args.longitude)?,
            ContentArgs::Wifi(args) => {
                let encryption = WifiEncryption::parse(&args.encryption).ok_or_else(|| {
                    CliError::validation(format!(
                        "Invalid encryption '{}'. Must be WPA, WEP or nopass",
                        args.encryption
                    ))
                })?;
                forms::wifi(&args.ssid, encryption, &args.password)?
            }
            ContentArgs::Calendar(args) => forms::calendar(&CalendarForm {
                title: args.title.clone(),
                start: args.start.clone(),
                end: args.end.clone(),
                location: args.location.clone(),
                description: args.description.clone(),
            })?,
            ContentArgs::Vcard(args) => forms::vcard(&VCardPayload {
                first_name: args.first_name.clone(),
                last_name: args.last_name.clone(),
                organization: args.organization.clone(),
                job_title: args.job_title.clone(),
                email: args.email.clone(),
                phone: args.phone.clone(),
                website: args.website.clone(),
                address: args.address.clone(),
                note: args.note.clone(),
            })?,
        };
        Ok(payload)
    }
}
