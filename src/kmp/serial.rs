//! # KMP Serial Communication
//!
//! Exchanges frames with a meter over a serial line or a TCP socket (for
//! example an optical head shared through ser2net).
//!
//! The protocol is half duplex with one request in flight: a request frame is
//! written, then one response frame is read. A read that receives no bytes
//! within the configured timeout fails with [`KmpError::Timeout`]; there are no
//! retries at this level.
//!
//! ## Usage
//!
//! ```no_run
//! use kmp_rs::config::ClientConfig;
//! use kmp_rs::kmp::KmpDeviceHandle;
//! use kmp_rs::messages::GetSerialRequest;
//!
//! # async fn run() -> Result<(), kmp_rs::KmpError> {
//! let mut handle = KmpDeviceHandle::open(&ClientConfig::new("/dev/ttyUSB0")).await?;
//! let response = handle.send_request(&GetSerialRequest).await?;
//! println!("Meter serial is: {}", response.serial);
//! # Ok(())
//! # }
//! ```

use crate::config::ClientConfig;
use crate::constants::{KMP_ACK, KMP_SERIAL_BAUDRATE, KMP_STOP};
use crate::error::KmpError;
use crate::kmp::bytes::PhysicalBytes;
use crate::kmp::client::{ClientCodec, EncodedResponse};
use crate::messages::{KmpMessage, KmpRequest};
use log::{debug, error, info};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_serial::SerialPortBuilderExt;

/// Byte stream to a meter.
pub trait KmpPort: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> KmpPort for T {}

/// A serial or TCP connection, chosen at runtime.
pub type BoxedPort = Box<dyn KmpPort>;

/// Handle to one meter, generic over the byte stream.
pub struct KmpDeviceHandle<P: KmpPort> {
    port: P,
    destination_address: u16,
    timeout: Duration,
}

impl KmpDeviceHandle<BoxedPort> {
    /// Opens the serial device or socket named in `config`.
    ///
    /// The serial line runs at 1200 baud, 8 data bits, no parity, 2 stop bits.
    pub async fn open(config: &ClientConfig) -> Result<Self, KmpError> {
        let port: BoxedPort = match config.socket_address() {
            Some(address) => {
                debug!("Connecting to {address}");
                let stream = TcpStream::connect(address).await.map_err(|e| {
                    error!("Could not connect to {}: {}", address, e);
                    KmpError::SerialPortError(e.to_string())
                })?;
                Box::new(stream)
            }
            None => {
                debug!("Opening serial device {}", config.serial_device);
                let stream = tokio_serial::new(&config.serial_device, KMP_SERIAL_BAUDRATE)
                    .data_bits(tokio_serial::DataBits::Eight)
                    .parity(tokio_serial::Parity::None)
                    .stop_bits(tokio_serial::StopBits::Two)
                    .timeout(config.timeout)
                    .open_native_async()
                    .map_err(|e| {
                        error!(
                            "Could not set up serial communication with device {}: {}",
                            config.serial_device, e
                        );
                        KmpError::SerialPortError(e.to_string())
                    })?;
                Box::new(stream)
            }
        };

        Ok(KmpDeviceHandle::new(port, config.destination_address, config.timeout))
    }
}

impl<P: KmpPort> KmpDeviceHandle<P> {
    pub fn new(port: P, destination_address: u16, timeout: Duration) -> Self {
        KmpDeviceHandle {
            port,
            destination_address,
            timeout,
        }
    }

    pub fn destination_address(&self) -> u16 {
        self.destination_address
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    /// Reads one byte, `None` on timeout or end of stream.
    async fn read_byte(&mut self) -> Result<Option<u8>, KmpError> {
        let mut byte = [0u8; 1];
        match timeout(self.timeout, self.port.read(&mut byte)).await {
            Err(_) => Ok(None),
            Ok(Ok(0)) => Ok(None),
            Ok(Ok(_)) => Ok(Some(byte[0])),
            Ok(Err(e)) => Err(KmpError::SerialPortError(e.to_string())),
        }
    }

    fn received(&self, bytes: Vec<u8>) -> Result<PhysicalBytes, KmpError> {
        if bytes.is_empty() {
            return Err(KmpError::Timeout(self.timeout));
        }
        Ok(PhysicalBytes::new(bytes))
    }

    /// Reads until the stop byte, or just the ACK byte if that comes first.
    ///
    /// Bytes received before a timeout are returned as-is; the frame decoder
    /// reports the missing stop byte.
    pub async fn read_until_stop(&mut self) -> Result<PhysicalBytes, KmpError> {
        let mut received = Vec::new();
        while let Some(byte) = self.read_byte().await? {
            received.push(byte);
            if byte == KMP_STOP || (received.len() == 1 && byte == KMP_ACK) {
                break;
            }
        }
        self.received(received)
    }

    /// Reads `num_bytes` bytes, or fewer if the meter stops sending.
    pub async fn read_exact(&mut self, num_bytes: usize) -> Result<PhysicalBytes, KmpError> {
        let mut received = Vec::with_capacity(num_bytes);
        while received.len() < num_bytes {
            match self.read_byte().await? {
                Some(byte) => received.push(byte),
                None => break,
            }
        }
        self.received(received)
    }

    /// Writes a whole frame and flushes it.
    pub async fn write(&mut self, frame: &PhysicalBytes) -> Result<(), KmpError> {
        self.port
            .write_all(frame)
            .await
            .map_err(|e| KmpError::SerialPortError(e.to_string()))?;
        self.port
            .flush()
            .await
            .map_err(|e| KmpError::SerialPortError(e.to_string()))
    }

    /// Encodes and sends a request, then reads and decodes its response.
    pub async fn send_request<R: KmpRequest>(
        &mut self,
        request: &R,
    ) -> Result<R::Response, KmpError> {
        let codec = ClientCodec::new(self.destination_address);
        let encoded = codec.encode(request)?;
        debug!("Request encoded: {}", encoded.physical_bytes().to_hex());

        info!("Sending {}...", R::TYPE_NAME);
        self.write(encoded.physical_bytes()).await?;

        let received = self.read_until_stop().await?;
        debug!("Received bytes on serial: {}", received.to_hex());

        codec.decode(&EncodedResponse::<R>::new(received))
    }
}
