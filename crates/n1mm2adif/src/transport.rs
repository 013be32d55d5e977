//! Inbound datagram transport.
//!
//! [`DatagramSource`] abstracts where broadcasts come from so the pipeline can
//! be driven by a real UDP socket or by a scripted source in tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::config::ListenerConfig;
use crate::error::{Error, Result};

/// A source of raw datagrams.
#[async_trait::async_trait]
pub trait DatagramSource: Send {
    /// Wait for the next datagram.
    ///
    /// Returns `Ok(None)` once the source is exhausted and will never produce
    /// another datagram.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying receive fails. The caller may retry.
    async fn recv_datagram(&mut self) -> std::io::Result<Option<Vec<u8>>>;
}

/// UDP socket receiving N1MM broadcasts.
#[derive(Debug)]
pub struct UdpListener {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl UdpListener {
    /// Bind the listener described by `config`, joining its multicast group
    /// if one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound or the group joined.
    pub async fn bind(config: &ListenerConfig) -> Result<Self> {
        let addr = config.socket_addr();
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;

        if let Some(group) = config.multicast_group {
            socket
                .join_multicast_v4(group, config.interface)
                .map_err(|source| Error::MulticastJoin { group, source })?;
            info!("Joined multicast group {} on {}", group, config.interface);
        }

        info!("Listening for N1MM broadcasts on {}", addr);
        Ok(Self {
            socket,
            buf: vec![0; config.max_datagram_size],
        })
    }

    /// Address the socket is bound to.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be read from the socket.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

#[async_trait::async_trait]
impl DatagramSource for UdpListener {
    async fn recv_datagram(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let (len, from) = self.socket.recv_from(&mut self.buf).await?;
        trace!("Received {} bytes from {}", len, from);
        Ok(Some(self.buf[..len].to_vec()))
    }
}

/// Timing of the receive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveTiming {
    /// Longest wait for a single datagram.
    pub poll_timeout: Duration,
    /// Pause after a timeout or receive error.
    pub backoff: Duration,
}

/// Move datagrams from `source` into `queue` until either side closes.
///
/// A receive that times out is not an error: the loop backs off and polls
/// again. Empty datagrams are dropped.
pub async fn receive_loop<S: DatagramSource>(
    mut source: S,
    queue: mpsc::UnboundedSender<Vec<u8>>,
    timing: ReceiveTiming,
) {
    loop {
        if queue.is_closed() {
            debug!("Queue closed, stopping receiver");
            return;
        }

        match tokio::time::timeout(timing.poll_timeout, source.recv_datagram()).await {
            Err(_elapsed) => {
                trace!("No datagram within {:?}", timing.poll_timeout);
                tokio::time::sleep(timing.backoff).await;
            }
            Ok(Ok(Some(datagram))) => {
                if datagram.is_empty() {
                    continue;
                }
                if queue.send(datagram).is_err() {
                    debug!("Queue closed, stopping receiver");
                    return;
                }
            }
            Ok(Ok(None)) => {
                debug!("Datagram source exhausted, stopping receiver");
                return;
            }
            Ok(Err(e)) => {
                warn!("Receive failed: {}", e);
                tokio::time::sleep(timing.backoff).await;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Yields canned datagrams, then reports exhaustion.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedSource {
        pub(crate) steps: VecDeque<Step>,
    }

    #[derive(Debug)]
    pub(crate) enum Step {
        Datagram(Vec<u8>),
        Stall(Duration),
        Fail,
    }

    impl ScriptedSource {
        pub(crate) fn datagrams<I, D>(datagrams: I) -> Self
        where
            I: IntoIterator<Item = D>,
            D: Into<Vec<u8>>,
        {
            Self {
                steps: datagrams
                    .into_iter()
                    .map(|d| Step::Datagram(d.into()))
                    .collect(),
            }
        }
    }

    #[async_trait::async_trait]
    impl DatagramSource for ScriptedSource {
        async fn recv_datagram(&mut self) -> std::io::Result<Option<Vec<u8>>> {
            match self.steps.pop_front() {
                Some(Step::Datagram(d)) => Ok(Some(d)),
                Some(Step::Stall(d)) => {
                    tokio::time::sleep(d).await;
                    Ok(Some(Vec::new()))
                }
                Some(Step::Fail) => Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "scripted failure",
                )),
                None => Ok(None),
            }
        }
    }

    fn fast_timing() -> ReceiveTiming {
        ReceiveTiming {
            poll_timeout: Duration::from_millis(20),
            backoff: Duration::from_millis(1),
        }
    }

    async fn collect(source: ScriptedSource) -> Vec<Vec<u8>> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        receive_loop(source, tx, fast_timing()).await;
        let mut out = Vec::new();
        while let Ok(d) = rx.try_recv() {
            out.push(d);
        }
        out
    }

    #[tokio::test]
    async fn test_receive_loop_forwards_in_order() {
        let out = collect(ScriptedSource::datagrams(["one", "two", "three"])).await;
        assert_eq!(out, vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]);
    }

    #[tokio::test]
    async fn test_receive_loop_survives_timeouts_and_errors() {
        let mut source = ScriptedSource::default();
        source.steps.push_back(Step::Datagram(b"first".to_vec()));
        // Longer than the poll timeout, so this receive times out.
        source.steps.push_back(Step::Stall(Duration::from_millis(200)));
        source.steps.push_back(Step::Fail);
        source.steps.push_back(Step::Datagram(b"second".to_vec()));

        let out = collect(source).await;
        assert_eq!(out, vec![b"first".to_vec(), b"second".to_vec()]);
    }

    #[tokio::test]
    async fn test_receive_loop_drops_empty_datagrams() {
        let out = collect(ScriptedSource::datagrams([Vec::new(), b"x".to_vec()])).await;
        assert_eq!(out, vec![b"x".to_vec()]);
    }

    #[tokio::test]
    async fn test_receive_loop_stops_when_queue_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        // Would otherwise yield forever.
        let source = ScriptedSource::datagrams(std::iter::repeat("x").take(1000));
        tokio::time::timeout(Duration::from_secs(5), receive_loop(source, tx, fast_timing()))
            .await
            .expect("receiver should stop");
    }

    #[tokio::test]
    async fn test_udp_listener_receives_datagram() {
        let config = ListenerConfig {
            port: 0,
            ..ListenerConfig::default()
        };
        let mut listener = UdpListener::bind(&config).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(b"<contactinfo/>", addr).await.unwrap();

        let datagram = tokio::time::timeout(Duration::from_secs(5), listener.recv_datagram())
            .await
            .expect("datagram in time")
            .unwrap();
        assert_eq!(datagram.as_deref(), Some(&b"<contactinfo/>"[..]));
    }
}
