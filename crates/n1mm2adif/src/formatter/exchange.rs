//! Contest-dependent exchange strings.
//!
//! `STX_STRING` and `SRX_STRING` are built from different contact fields
//! depending on the contest. [`ContestRules`] maps each contest identifier to
//! an [`ExchangeRule`]; contests without an entry log bare serial numbers.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::ContestConfig;
use crate::contact::{keys, Contact};

/// How a contest's sent and received exchanges are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExchangeRule {
    /// Field Day: sent exchange as configured, received class and section.
    FieldDay,
    /// Medium speed test: exchange plus serial, received name and number.
    MediumSpeedTest,
    /// Serial sent, first exchange field received when longer than one character.
    ExchangeOnly,
    /// Serial sent, exchange name and section received.
    NameSection,
    /// Serial sent, two-digit zone (`00` when none) and exchange (`DX` when none) received.
    ZoneExchange,
    /// Serial numbers both ways.
    SerialNumber,
}

impl ExchangeRule {
    /// Derive `STX_STRING`.
    #[must_use]
    pub fn sent(self, contact: &Contact) -> Option<String> {
        match self {
            Self::FieldDay => join_upper(&[contact.get(keys::SENT_EXCHANGE)]),
            Self::MediumSpeedTest => join_upper(&[
                contact.get(keys::SENT_EXCHANGE),
                contact.get(keys::SENT_NR),
            ]),
            Self::ExchangeOnly | Self::NameSection | Self::ZoneExchange | Self::SerialNumber => {
                serial(contact.get(keys::SENT_NR))
            }
        }
    }

    /// Derive `SRX_STRING`.
    #[must_use]
    pub fn received(self, contact: &Contact) -> Option<String> {
        match self {
            Self::FieldDay => join_upper(&[contact.get(keys::EXCHANGE1), contact.get(keys::SECTION)]),
            Self::MediumSpeedTest => {
                join_upper(&[contact.get(keys::NAME), contact.get(keys::EXCHANGE_NR)])
            }
            Self::ExchangeOnly => join_upper(&[contact.get(keys::EXCHANGE1)])
                .filter(|exchange| exchange.chars().count() > 1),
            Self::NameSection => join_upper(&[
                contact.get(keys::EXCHANGE_NAME),
                contact.get(keys::SECTION),
            ]),
            Self::ZoneExchange => {
                let zone = format!("{:0>2}", contact.get(keys::ZONE).unwrap_or_default());
                let exchange = contact.get(keys::EXCHANGE1).unwrap_or("DX");
                join_upper(&[Some(zone.as_str()), Some(exchange)])
            }
            Self::SerialNumber => serial(contact.get(keys::RCVD_NR)),
        }
    }
}

/// Built-in contest identifiers with a dedicated exchange rule.
pub const DEFAULT_EXCHANGE_RULES: &[(&str, ExchangeRule)] = &[
    ("WFD", ExchangeRule::FieldDay),
    ("ARRL-FD", ExchangeRule::FieldDay),
    ("ARRL-FIELD-DAY", ExchangeRule::FieldDay),
    ("ICWC-MST", ExchangeRule::MediumSpeedTest),
    ("CQ-160-CW", ExchangeRule::ExchangeOnly),
    ("CQ-160-SSB", ExchangeRule::ExchangeOnly),
    ("WEEKLY-RTTY", ExchangeRule::ExchangeOnly),
    ("K1USN-SST", ExchangeRule::NameSection),
    ("CQ-WW-RTTY", ExchangeRule::ZoneExchange),
];

/// Built-in contests logged as RTTY whatever mode N1MM reports.
pub const DEFAULT_RTTY_CONTESTS: &[&str] = &["CQ-WW-RTTY", "WEEKLY-RTTY"];

/// Contest lookup tables used while formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestRules {
    exchange: HashMap<String, ExchangeRule>,
    rtty: HashSet<String>,
}

impl Default for ContestRules {
    fn default() -> Self {
        Self {
            exchange: DEFAULT_EXCHANGE_RULES
                .iter()
                .map(|(id, rule)| ((*id).to_string(), *rule))
                .collect(),
            rtty: DEFAULT_RTTY_CONTESTS.iter().map(|id| (*id).to_string()).collect(),
        }
    }
}

impl ContestRules {
    /// Built-in rules extended with configured ones.
    ///
    /// Configured exchange rules replace built-in entries for the same contest.
    #[must_use]
    pub fn from_config(config: &ContestConfig) -> Self {
        let mut rules = Self::default();
        for (id, rule) in &config.exchange_rules {
            rules.exchange.insert(id.trim().to_string(), *rule);
        }
        for id in &config.rtty_contests {
            rules.rtty.insert(id.trim().to_string());
        }
        rules
    }

    /// Exchange rule for a contest.
    #[must_use]
    pub fn rule_for(&self, contest: Option<&str>) -> ExchangeRule {
        contest
            .and_then(|id| self.exchange.get(id))
            .copied()
            .unwrap_or(ExchangeRule::SerialNumber)
    }

    /// Check whether a contest forces the RTTY mode.
    #[must_use]
    pub fn forces_rtty(&self, contest: Option<&str>) -> bool {
        contest.is_some_and(|id| self.rtty.contains(id))
    }
}

/// A serial number, unless it is the `0` N1MM sends when none was exchanged.
fn serial(value: Option<&str>) -> Option<String> {
    value.filter(|v| *v != "0").map(str::to_string)
}

/// Space-joined, upper-cased present parts.
fn join_upper(parts: &[Option<&str>]) -> Option<String> {
    let joined = parts
        .iter()
        .flatten()
        .map(|p| p.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}
