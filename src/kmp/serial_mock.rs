//! Mock serial port implementation for testing
//!
//! This module provides an in-memory port that can be used to test the KMP
//! request/response exchange without a meter or optical head.
//!
//! Reads with nothing queued stay pending, so the handle's read timeout fires
//! just like on a silent serial line.

use crate::kmp::bytes::PhysicalBytes;
use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll, Waker};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

#[derive(Default)]
struct MockState {
    tx: Vec<u8>,
    rx: VecDeque<u8>,
    next_error: Option<io::Error>,
    closed: bool,
    reader: Option<Waker>,
}

/// Mock serial port that simulates bidirectional communication.
///
/// Clones share the same buffers, so a test keeps one clone to inspect the
/// port after handing the other to a device handle.
#[derive(Clone, Default)]
pub struct MockSerialPort {
    state: Arc<Mutex<MockState>>,
}

impl MockSerialPort {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // a panicking test thread must not hide the buffers from the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue data to be read from the port
    pub fn queue_rx_data(&self, data: &[u8]) {
        let mut state = self.state();
        state.rx.extend(data);
        if let Some(waker) = state.reader.take() {
            waker.wake();
        }
    }

    /// Queue a complete frame as the meter would send it
    pub fn queue_frame(&self, frame: &PhysicalBytes) {
        self.queue_rx_data(frame);
    }

    /// Number of queued bytes not read yet
    pub fn rx_len(&self) -> usize {
        self.state().rx.len()
    }

    /// Get data that was written to the port
    pub fn get_tx_data(&self) -> Vec<u8> {
        self.state().tx.clone()
    }

    /// Clear all buffers
    pub fn clear(&self) {
        let mut state = self.state();
        state.tx.clear();
        state.rx.clear();
    }

    /// Set an error to be returned on the next operation
    pub fn set_next_error(&self, error: io::Error) {
        self.state().next_error = Some(error);
    }

    /// Report end of stream once the queued data is read, like a closed socket
    pub fn close(&self) {
        let mut state = self.state();
        state.closed = true;
        if let Some(waker) = state.reader.take() {
            waker.wake();
        }
    }
}

impl AsyncRead for MockSerialPort {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let mut state = self.state();
        if let Some(error) = state.next_error.take() {
            return Poll::Ready(Err(error));
        }

        let available = state.rx.len().min(buf.remaining());
        if available > 0 {
            let data: Vec<u8> = state.rx.drain(..available).collect();
            buf.put_slice(&data);
            return Poll::Ready(Ok(()));
        }
        if state.closed {
            return Poll::Ready(Ok(()));
        }

        state.reader = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl AsyncWrite for MockSerialPort {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut state = self.state();
        if let Some(error) = state.next_error.take() {
            return Poll::Ready(Err(error));
        }

        state.tx.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
