//! Contact records decoded from N1MM Logger+ broadcasts.
//!
//! N1MM sends one XML document per datagram. Only documents rooted at
//! `<contactinfo>` describe a logged contact; every direct child element of
//! that root becomes one entry of the [`Contact`] mapping.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::trace;

use crate::error::{Error, Result};

/// Root element of a contact broadcast.
pub const CONTACT_ROOT: &str = "contactinfo";

/// Element names read from a `contactinfo` payload.
///
/// Names are case-sensitive: `Name` is the contest exchange name and `name`
/// is the operator name typed into the entry window.
pub mod keys {
    /// Logged date and time, `YYYY-MM-DD HH:MM:SS`.
    pub const TIMESTAMP: &str = "timestamp";
    /// Station callsign.
    pub const STATION_PREFIX: &str = "stationprefix";
    /// Cabrillo contest name.
    pub const CONTEST_NAME: &str = "contestname";
    /// Worked callsign.
    pub const CALL: &str = "call";
    /// Operator name of the worked station.
    pub const NAME: &str = "name";
    /// Mode as reported by N1MM.
    pub const MODE: &str = "mode";
    /// Receive frequency in tens of hertz.
    pub const RX_FREQ: &str = "rxfreq";
    /// Sent signal report.
    pub const SENT_RST: &str = "snt";
    /// Received signal report.
    pub const RCVD_RST: &str = "rcv";
    /// Sent serial number.
    pub const SENT_NR: &str = "sntnr";
    /// Received serial number.
    pub const RCVD_NR: &str = "rcvnr";
    /// Maidenhead grid square.
    pub const GRID: &str = "gridsquare";
    /// WPX prefix.
    pub const WPX_PREFIX: &str = "wpxprefix";
    /// Free-text comment.
    pub const COMMENT: &str = "comment";
    /// Sent exchange as configured in the contest setup.
    pub const SENT_EXCHANGE: &str = "SentExchange";
    /// First received exchange field.
    pub const EXCHANGE1: &str = "Exchange1";
    /// ARRL section.
    pub const SECTION: &str = "Sect";
    /// Name received as part of the exchange.
    pub const EXCHANGE_NAME: &str = "Name";
    /// Number received as part of the exchange.
    pub const EXCHANGE_NR: &str = "NR";
    /// CQ zone.
    pub const ZONE: &str = "ZN";
}

/// One logged contact, as a mapping of N1MM field names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    fields: HashMap<String, String>,
}

impl Contact {
    /// Create an empty contact.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Get a field value.
    ///
    /// Missing, empty and whitespace-only values all read as `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Upper-cased station callsign, used to name the output file.
    #[must_use]
    pub fn station_callsign(&self) -> String {
        self.get(keys::STATION_PREFIX)
            .unwrap_or_default()
            .to_uppercase()
    }

    /// Contest name, if any.
    #[must_use]
    pub fn contest(&self) -> Option<&str> {
        self.get(keys::CONTEST_NAME)
    }

    /// Number of fields, empty ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the contact has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decode a broadcast payload.
    ///
    /// Returns `Ok(None)` for well-formed payloads that are not contacts, such
    /// as `RadioInfo` or `contactdelete`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the payload is not UTF-8 or not well-formed
    /// XML.
    pub fn decode(payload: &[u8]) -> Result<Option<Self>> {
        let text = std::str::from_utf8(payload).map_err(|e| Error::decode(e.to_string()))?;

        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut contact = Self::new();
        let mut depth = 0usize;
        let mut current: Option<String> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| Error::decode(format!("at byte {}: {e}", reader.buffer_position())))?;

            match event {
                Event::Start(e) => {
                    depth += 1;
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if depth == 1 && name != CONTACT_ROOT {
                        trace!("Ignoring <{}> payload", name);
                        return Ok(None);
                    }
                    if depth == 2 {
                        contact.fields.entry(name.clone()).or_default();
                        current = Some(name);
                    }
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    match depth {
                        0 => return Ok((name == CONTACT_ROOT).then(Self::new)),
                        1 => contact.insert(name, String::new()),
                        _ => {}
                    }
                }
                Event::Text(t) if depth == 2 => {
                    if let Some(key) = &current {
                        let value = t.unescape().map_err(|e| Error::decode(e.to_string()))?;
                        contact.append_text(key, &value);
                    }
                }
                Event::CData(c) if depth == 2 => {
                    if let Some(key) = &current {
                        let raw = c.into_inner();
                        contact.append_text(key, &String::from_utf8_lossy(&raw));
                    }
                }
                Event::End(_) => {
                    if depth == 2 {
                        current = None;
                    }
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(Some(contact));
                    }
                }
                Event::Eof => {
                    return if depth == 0 {
                        Ok(None)
                    } else {
                        Err(Error::decode("unexpected end of payload"))
                    };
                }
                _ => {}
            }
        }
    }

    fn append_text(&mut self, key: &str, text: &str) {
        self.fields.entry(key.to_string()).or_default().push_str(text);
    }
}

impl<K, V> FromIterator<(K, V)> for Contact
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
