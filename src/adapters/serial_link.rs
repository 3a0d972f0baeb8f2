//! Serial link adapter (UART0 console).
//!
//! Implements [`LinkPort`] over the same UART the log output uses —
//! the stock companion terminal talks line-delimited text on it.
//! Inbound bytes are drained non-blocking each poll and run through the
//! [`LineAssembler`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF: UART0 via raw driver calls.
//! On host/test: injectable inbound bytes, captured outbound lines.

use crate::app::ports::{LinkLine, LinkPort, MAX_LINE_LEN};
use crate::error::LinkError;
use crate::link::LineAssembler;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
const UART_PORT: uart_port_t = 0;
#[cfg(target_os = "espidf")]
const RX_CHUNK: usize = 64;

pub struct SerialLink {
    assembler: LineAssembler,
    #[cfg(not(target_os = "espidf"))]
    inbound: std::collections::VecDeque<u8>,
    #[cfg(not(target_os = "espidf"))]
    sent: Vec<String>,
}

impl SerialLink {
    #[cfg(target_os = "espidf")]
    pub fn new() -> Result<Self, LinkError> {
        // The ROM console has already configured the UART; we only need
        // the driver's RX ring buffer installed.
        // SAFETY: called once at startup, before any poll.
        let ret = unsafe {
            uart_driver_install(UART_PORT, 512, 0, 0, core::ptr::null_mut(), 0)
        };
        if ret != ESP_OK as i32 {
            return Err(LinkError::WriteFailed);
        }
        Ok(Self {
            assembler: LineAssembler::new(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, LinkError> {
        Ok(Self {
            assembler: LineAssembler::new(),
            inbound: Default::default(),
            sent: Vec::new(),
        })
    }

    /// Host/test hook: queue raw inbound bytes.
    #[cfg(not(target_os = "espidf"))]
    pub fn inject_bytes(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes);
    }

    /// Host/test hook: everything sent so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn sent_lines(&self) -> &[String] {
        &self.sent
    }
}

impl LinkPort for SerialLink {
    #[cfg(target_os = "espidf")]
    fn poll_line(&mut self) -> Option<LinkLine> {
        let mut buf = [0u8; RX_CHUNK];
        loop {
            // SAFETY: reads into a stack buffer with zero timeout; the
            // driver was installed in new().
            let n = unsafe {
                uart_read_bytes(
                    UART_PORT,
                    buf.as_mut_ptr() as *mut core::ffi::c_void,
                    buf.len() as u32,
                    0,
                )
            };
            if n <= 0 {
                return None;
            }
            for &b in &buf[..n as usize] {
                if let Some(line) = self.assembler.feed(b) {
                    return Some(line);
                }
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn poll_line(&mut self) -> Option<LinkLine> {
        while let Some(b) = self.inbound.pop_front() {
            if let Some(line) = self.assembler.feed(b) {
                return Some(line);
            }
        }
        None
    }

    fn send_line(&mut self, line: &str) -> Result<(), LinkError> {
        if line.len() > MAX_LINE_LEN {
            return Err(LinkError::LineTooLong);
        }

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: writes a stack/static byte slice; driver installed.
            let wrote = unsafe {
                uart_write_bytes(
                    UART_PORT,
                    line.as_ptr() as *const core::ffi::c_void,
                    line.len(),
                )
            };
            let nl = unsafe {
                uart_write_bytes(UART_PORT, b"\n".as_ptr() as *const core::ffi::c_void, 1)
            };
            if wrote < 0 || nl < 0 {
                return Err(LinkError::WriteFailed);
            }
        }

        #[cfg(not(target_os = "espidf"))]
        self.sent.push(line.to_string());

        Ok(())
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn injected_bytes_assemble_into_lines() {
        let mut link = SerialLink::new().unwrap();
        link.inject_bytes(b"SPE");
        assert!(link.poll_line().is_none());
        link.inject_bytes(b"ED:100\r\nAUTO\n");
        assert_eq!(link.poll_line().unwrap().as_str(), "SPEED:100");
        assert_eq!(link.poll_line().unwrap().as_str(), "AUTO");
        assert!(link.poll_line().is_none());
    }

    #[test]
    fn sent_lines_are_captured() {
        let mut link = SerialLink::new().unwrap();
        link.send_line("Temp: 25.0C").unwrap();
        assert_eq!(link.sent_lines(), ["Temp: 25.0C"]);
    }

    #[test]
    fn oversized_outbound_line_rejected() {
        let mut link = SerialLink::new().unwrap();
        let long = "x".repeat(MAX_LINE_LEN + 1);
        assert_eq!(link.send_line(&long), Err(LinkError::LineTooLong));
    }
}
