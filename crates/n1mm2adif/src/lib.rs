//! `n1mm2adif` - Bridges N1MM Logger+ contact broadcasts to ADIF logs
//!
//! This library decodes the `contactinfo` datagrams N1MM Logger+ broadcasts,
//! formats each contact as an ADIF record, and appends it to a log file named
//! after the station callsign.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod adif;
pub mod band;
pub mod cli;
pub mod config;
pub mod contact;
pub mod error;
pub mod formatter;
pub mod logging;
pub mod pipeline;
pub mod sink;
pub mod transport;

pub use adif::{AdifRecord, Field};
pub use band::{classify, Band};
pub use config::Config;
pub use contact::Contact;
pub use error::{Error, Result};
pub use formatter::RecordFormatter;
pub use logging::init_logging;
pub use pipeline::{ContactLogger, Pipeline};
pub use sink::{AdifSink, FileSink, MemorySink};
