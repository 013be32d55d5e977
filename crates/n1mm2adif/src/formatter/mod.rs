//! Conversion of decoded contacts into ADIF records.
//!
//! Fields are emitted in a fixed order. Any field whose source value is
//! missing or unusable is skipped without affecting the rest of the record.

pub mod exchange;
pub mod fields;

use tracing::debug;

use crate::adif::{AdifRecord, Field};
use crate::band::classify;
use crate::contact::{keys, Contact};
use crate::error::Result;
use crate::sink::AdifSink;

pub use exchange::{ContestRules, ExchangeRule};
pub use fields::ModeTags;

/// Builds ADIF records from contacts.
#[derive(Debug, Clone, Default)]
pub struct RecordFormatter {
    rules: ContestRules,
}

impl RecordFormatter {
    /// Create a formatter using the given contest rules.
    #[must_use]
    pub fn new(rules: ContestRules) -> Self {
        Self { rules }
    }

    /// The contest rules in use.
    #[must_use]
    pub fn rules(&self) -> &ContestRules {
        &self.rules
    }

    /// Format a contact as an ADIF record.
    #[must_use]
    pub fn format(&self, contact: &Contact) -> AdifRecord {
        let mut record = AdifRecord::new();
        let contest = contact.contest();

        if let Some(timestamp) = contact.get(keys::TIMESTAMP) {
            let (date, time) = fields::split_timestamp(timestamp);
            if let Some(date) = date {
                record.push(Field::typed("QSO_DATE", 'd', date));
            }
            record.push_opt("TIME_ON", time);
        }

        let station = contact.station_callsign();
        if !station.is_empty() {
            record.push(Field::new("STATION_CALLSIGN", station));
        }

        record.push_opt("CALL", contact.get(keys::CALL).map(str::to_uppercase));
        record.push_opt("NAME", contact.get(keys::NAME).map(fields::title_case));

        let force_rtty = self.rules.forces_rtty(contest);
        if let Some(tags) = fields::normalize_mode(contact.get(keys::MODE), force_rtty) {
            record.push(Field::new("MODE", tags.mode));
            record.push_opt("SUBMODE", tags.submode);
        }

        match contact.get(keys::RX_FREQ).map(|raw| (raw, fields::scale_frequency(raw))) {
            Some((_, Some(mhz))) => {
                record.push(Field::new("BAND", classify(mhz).as_str()));
                record.push(Field::new("FREQ", mhz.to_string()));
            }
            Some((raw, None)) => debug!("Skipping unparseable rxfreq {:?}", raw),
            None => {}
        }

        record.push_opt("RST_SENT", owned(contact.get(keys::SENT_RST)));
        record.push_opt("RST_RCVD", owned(contact.get(keys::RCVD_RST)));

        let rule = self.rules.rule_for(contest);
        record.push_opt("STX_STRING", rule.sent(contact));
        record.push_opt("SRX_STRING", rule.received(contact));

        record.push_opt(
            "GRIDSQUARE",
            contact.get(keys::GRID).and_then(fields::grid_square),
        );
        record.push_opt("PFX", owned(contact.get(keys::WPX_PREFIX)));
        record.push_opt(
            "CONTEST_ID",
            owned(contest.filter(|c| c.chars().count() > 1)),
        );
        record.push_opt("COMMENT", owned(contact.get(keys::COMMENT)));

        record
    }

    /// Format a contact and append it to the station's log.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot store the record.
    pub fn format_and_append<K: AdifSink + ?Sized>(
        &self,
        contact: &Contact,
        sink: &mut K,
    ) -> Result<()> {
        let record = self.format(contact);
        sink.append(&contact.station_callsign(), &record)
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn contact(fields: &[(&str, &str)]) -> Contact {
        fields.iter().copied().collect()
    }

    fn names(record: &AdifRecord) -> Vec<&'static str> {
        record.fields().iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_full_record_field_order() {
        let c = contact(&[
            ("timestamp", "2024-06-22 18:30:05"),
            ("stationprefix", "k1abc"),
            ("contestname", "CQ-WPX-SSB"),
            ("call", "w1aw"),
            ("name", "hiram"),
            ("mode", "USB"),
            ("rxfreq", "1420000"),
            ("snt", "59"),
            ("rcv", "57"),
            ("sntnr", "101"),
            ("rcvnr", "55"),
            ("gridsquare", "FN31pr"),
            ("wpxprefix", "W1"),
            ("comment", "nice signal"),
        ]);

        let record = RecordFormatter::default().format(&c);
        assert_eq!(
            names(&record),
            vec![
                "QSO_DATE",
                "TIME_ON",
                "STATION_CALLSIGN",
                "CALL",
                "NAME",
                "MODE",
                "SUBMODE",
                "BAND",
                "FREQ",
                "RST_SENT",
                "RST_RCVD",
                "STX_STRING",
                "SRX_STRING",
                "GRIDSQUARE",
                "PFX",
                "CONTEST_ID",
                "COMMENT",
            ]
        );

        assert_eq!(
            record.to_string(),
            "<QSO_DATE:8:d>20240622\r\n\
             <TIME_ON:6>183005\r\n\
             <STATION_CALLSIGN:5>K1ABC\r\n\
             <CALL:4>W1AW\r\n\
             <NAME:5>Hiram\r\n\
             <MODE:3>SSB\r\n\
             <SUBMODE:3>USB\r\n\
             <BAND:3>20m\r\n\
             <FREQ:4>14.2\r\n\
             <RST_SENT:2>59\r\n\
             <RST_RCVD:2>57\r\n\
             <STX_STRING:3>101\r\n\
             <SRX_STRING:2>55\r\n\
             <GRIDSQUARE:6>FN31pr\r\n\
             <PFX:2>W1\r\n\
             <CONTEST_ID:10>CQ-WPX-SSB\r\n\
             <COMMENT:11>nice signal\r\n\
             <EOR>\r\n\
             \r\n"
        );
    }

    #[test]
    fn test_cw_variant_normalized() {
        let record = RecordFormatter::default().format(&contact(&[("mode", "CW-R")]));
        assert_eq!(record.get("MODE"), Some("CW"));
        assert_eq!(record.get("SUBMODE"), None);
    }

    #[test]
    fn test_rtty_contest_forces_mode() {
        let c = contact(&[("mode", "CW-L"), ("contestname", "CQ-WW-RTTY")]);
        let record = RecordFormatter::default().format(&c);
        assert_eq!(record.get("MODE"), Some("RTTY"));
    }

    #[test]
    fn test_band_from_raw_frequency() {
        let record = RecordFormatter::default().format(&contact(&[("rxfreq", "1400000")]));
        assert_eq!(record.get("BAND"), Some("20m"));
        assert_eq!(record.get("FREQ"), Some("14"));
    }

    #[test]
    fn test_out_of_band_frequency() {
        let record = RecordFormatter::default().format(&contact(&[("rxfreq", "1200000")]));
        assert_eq!(record.get("BAND"), Some("0m"));
        assert_eq!(record.get("FREQ"), Some("12"));
    }

    #[test]
    fn test_bad_frequency_skips_only_band_and_freq() {
        let c = contact(&[("rxfreq", "n/a"), ("call", "w1aw"), ("comment", "hi")]);
        let record = RecordFormatter::default().format(&c);
        assert_eq!(names(&record), vec!["CALL", "COMMENT"]);
    }

    #[test]
    fn test_grid_validation() {
        let f = RecordFormatter::default();
        let record = f.format(&contact(&[("gridsquare", "FN20ab")]));
        assert_eq!(record.get("GRIDSQUARE"), Some("FN20ab"));

        let record = f.format(&contact(&[("gridsquare", "invalid")]));
        assert_eq!(record.get("GRIDSQUARE"), None);
    }

    #[test]
    fn test_empty_contact_yields_bare_record() {
        let record = RecordFormatter::default().format(&Contact::new());
        assert!(record.is_empty());
        assert_eq!(record.to_string(), "<EOR>\r\n\r\n");
    }

    #[test]
    fn test_single_character_contest_not_logged() {
        let record = RecordFormatter::default().format(&contact(&[("contestname", "X")]));
        assert_eq!(record.get("CONTEST_ID"), None);
    }

    #[test]
    fn test_field_day_exchange() {
        let c = contact(&[
            ("contestname", "ARRL-FD"),
            ("SentExchange", "1d ct"),
            ("Exchange1", "2a"),
            ("Sect", "wma"),
            ("sntnr", "9"),
        ]);
        let record = RecordFormatter::default().format(&c);
        assert_eq!(record.get("STX_STRING"), Some("1D CT"));
        assert_eq!(record.get("SRX_STRING"), Some("2A WMA"));
    }

    #[test]
    fn test_configured_rules_are_used() {
        let mut config = crate::config::ContestConfig::default();
        config
            .exchange_rules
            .insert("MY-SPRINT".to_string(), ExchangeRule::NameSection);
        let f = RecordFormatter::new(ContestRules::from_config(&config));

        let c = contact(&[("contestname", "MY-SPRINT"), ("Name", "ed"), ("Sect", "ct")]);
        assert_eq!(f.format(&c).get("SRX_STRING"), Some("ED CT"));
    }

    #[test]
    fn test_format_and_append_uses_station_file() {
        let mut sink = MemorySink::new();
        let c = contact(&[("stationprefix", "k1abc"), ("call", "w1aw")]);
        RecordFormatter::default()
            .format_and_append(&c, &mut sink)
            .unwrap();

        let contents = sink.contents("K1ABC").expect("station log");
        assert!(contents.starts_with("N1MM2ADIF export\r\n"));
        assert!(contents.ends_with("<CALL:4>W1AW\r\n<EOR>\r\n\r\n"));
    }
}
