//! Receive → queue → drain pipeline.
//!
//! A receiver task is the only producer on an unbounded FIFO; the drain loop is
//! the only consumer and the only writer of ADIF logs, so appends need no
//! further locking.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::contact::{keys, Contact};
use crate::error::{Error, Result};
use crate::formatter::RecordFormatter;
use crate::logging::DROPPED_TARGET;
use crate::sink::AdifSink;
use crate::transport::{receive_loop, DatagramSource, ReceiveTiming};

/// What happened to a single datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The contact was appended to the station's log.
    Logged {
        /// Station callsign naming the log.
        station_callsign: String,
    },
    /// The payload was well-formed but not a contact.
    NotAContact,
}

/// Formats contacts and hands them to a sink.
#[derive(Debug)]
pub struct ContactLogger<K> {
    formatter: RecordFormatter,
    sink: K,
    logged: u64,
}

impl<K: AdifSink> ContactLogger<K> {
    /// Create a logger.
    #[must_use]
    pub fn new(formatter: RecordFormatter, sink: K) -> Self {
        Self {
            formatter,
            sink,
            logged: 0,
        }
    }

    /// The sink records are written to.
    #[must_use]
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Number of contacts logged so far.
    #[must_use]
    pub fn logged(&self) -> u64 {
        self.logged
    }

    /// Log one decoded contact.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot store the record.
    pub fn log_contact(&mut self, contact: &Contact) -> Result<()> {
        self.formatter.format_and_append(contact, &mut self.sink)?;
        self.logged += 1;
        info!(
            "Logged {} for {}",
            contact.get(keys::CALL).unwrap_or("<no call>").to_uppercase(),
            contact.station_callsign()
        );
        Ok(())
    }

    /// Decode a raw payload and log it if it is a contact.
    ///
    /// # Errors
    ///
    /// Returns a decode error for malformed payloads, or the sink's error.
    pub fn handle_datagram(&mut self, payload: &[u8]) -> Result<Outcome> {
        let Some(contact) = Contact::decode(payload)? else {
            debug!("Discarding non-contact payload ({} bytes)", payload.len());
            return Ok(Outcome::NotAContact);
        };
        self.log_contact(&contact)?;
        Ok(Outcome::Logged {
            station_callsign: contact.station_callsign(),
        })
    }

    /// Handle every queued datagram without waiting.
    ///
    /// Failures are reported and the datagram dropped. Returns `false` once
    /// the queue is closed and empty.
    pub fn drain(&mut self, queue: &mut mpsc::UnboundedReceiver<Vec<u8>>) -> bool {
        loop {
            match queue.try_recv() {
                Ok(datagram) => {
                    let result = self.handle_datagram(&datagram);
                    Self::report(result);
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn report(result: Result<Outcome>) {
        match result {
            Ok(_) => {}
            Err(e) if e.is_decode_error() => {
                warn!(target: DROPPED_TARGET, "Dropping payload: {}", e);
            }
            Err(e) => error!(target: DROPPED_TARGET, "{}", e),
        }
    }
}

/// Timing of the pipeline loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Receiver timing.
    pub receive: ReceiveTiming,
    /// Idle time between drains of the queue.
    pub drain_interval: Duration,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            receive: ReceiveTiming {
                poll_timeout: config.poll_timeout(),
                backoff: config.timeout_backoff(),
            },
            drain_interval: config.drain_interval(),
        }
    }
}

/// The running bridge: a datagram source, its queue, and a contact logger.
#[derive(Debug)]
pub struct Pipeline<S, K> {
    source: S,
    logger: ContactLogger<K>,
    settings: PipelineSettings,
    queue_tx: mpsc::UnboundedSender<Vec<u8>>,
    queue_rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl<S, K> Pipeline<S, K>
where
    S: DatagramSource + 'static,
    K: AdifSink,
{
    /// Assemble a pipeline.
    #[must_use]
    pub fn new(source: S, logger: ContactLogger<K>, settings: PipelineSettings) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        Self {
            source,
            logger,
            settings,
            queue_tx,
            queue_rx,
        }
    }

    /// Run until the source is exhausted, then return the logger.
    ///
    /// A UDP source never is, so in practice this runs until the process is
    /// terminated.
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver task panics.
    pub async fn run(self) -> Result<ContactLogger<K>> {
        let Self {
            source,
            mut logger,
            settings,
            queue_tx,
            mut queue_rx,
        } = self;

        let receiver = tokio::spawn(receive_loop(source, queue_tx, settings.receive));

        // Appends are blocking std::fs writes. This loop is their only caller.
        while logger.drain(&mut queue_rx) {
            tokio::time::sleep(settings.drain_interval).await;
        }

        receiver
            .await
            .map_err(|e| Error::internal(format!("receiver task failed: {e}")))?;
        info!("Pipeline stopped after {} contacts", logger.logged());
        Ok(logger)
    }
}
