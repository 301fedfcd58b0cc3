//! SocketSink - syslog-style tcp/udp delivery, fire-and-forget

use bytes::Bytes;
use contracts::{ContractError, LineSpec, LogSink, SinkRoute, SocketProto};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, UdpSocket};
use tracing::{debug, instrument};

/// Sink that writes lines to a tcp/udp socket
///
/// Opens a fresh connection per send, writes, and closes. No retries; a
/// failed send is dropped.
pub struct SocketSink {
    name: String,
}

impl Default for SocketSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketSink {
    /// Create a new SocketSink
    pub fn new() -> Self {
        Self {
            name: "syslog".to_string(),
        }
    }

    async fn send_tcp(&self, addr: &str, payload: &Bytes) -> Result<(), ContractError> {
        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ContractError::sink_connection(&self.name, e.to_string()))?;

        stream
            .write_all(payload)
            .await
            .map_err(|e| ContractError::sink_send(&self.name, e.to_string()))?;
        stream
            .shutdown()
            .await
            .map_err(|e| ContractError::sink_send(&self.name, e.to_string()))?;
        Ok(())
    }

    async fn send_udp(&self, addr: &str, payload: &Bytes) -> Result<(), ContractError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| ContractError::sink_connection(&self.name, e.to_string()))?;
        socket
            .connect(addr)
            .await
            .map_err(|e| ContractError::sink_connection(&self.name, e.to_string()))?;

        let sent = socket
            .send(payload)
            .await
            .map_err(|e| ContractError::sink_send(&self.name, e.to_string()))?;
        debug!(sink = %self.name, addr, bytes = sent, "datagram sent");
        Ok(())
    }
}

impl LogSink for SocketSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "socket_sink_send", skip(self, payload, spec), fields(sink = %self.name))]
    async fn send(&self, payload: &Bytes, spec: &LineSpec) -> Result<(), ContractError> {
        let SinkRoute::Syslog { proto, addr } = &spec.route else {
            return Err(ContractError::sink_send(
                &self.name,
                "line routed to socket sink without a syslog destination",
            ));
        };

        match proto {
            SocketProto::Tcp => self.send_tcp(addr, payload).await,
            SocketProto::Udp => self.send_udp(addr, payload).await,
        }
    }
}
