use crate::cache::{ChangeCache, Heartbeat};
use crate::config::Config;
use crate::constants::IDLE_SLEEP_MS;
use crate::dispatch::{self, Report};
use crate::error::{R24Error, Result};
use crate::frame::{Frame, FrameDecoder};
use crate::query::{Query, Setting};
use crate::scheduler::PollScheduler;
use crate::sink::TelemetrySink;
use crate::transport::{SerialTransport, Transport};
use crate::types::*;
use chrono::Utc;
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};

/// Counters for everything the receive path discarded or accepted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub frames: u64,
    pub framing_errors: u64,
    pub checksum_errors: u64,
    pub decode_errors: u64,
    pub queries_sent: u64,
}

/// One connection to an R24 radar module.
///
/// Owns all per-device protocol state: frame decoder, poll scheduler and
/// learned dialect, change cache, heartbeat latch and device info. Reads
/// and poll steps must be serialized by the caller (the type is `&mut self`
/// throughout).
pub struct R24<T: Transport, S: TelemetrySink> {
    transport: T,
    sink: S,
    decoder: FrameDecoder,
    scheduler: PollScheduler,
    cache: ChangeCache,
    heartbeat: Heartbeat,
    device_info: DeviceInfo,
    stats: SessionStats,
    poll_interval: Duration,
}

impl<S: TelemetrySink> R24<SerialTransport, S> {
    /// Open the configured serial port and start a session on it
    pub fn open(config: &Config, sink: S) -> Result<Self> {
        config.validate()?;
        let transport = SerialTransport::open(config)?;
        Ok(R24::new(transport, sink).with_poll_interval(config.poll_interval()))
    }
}

impl<T: Transport, S: TelemetrySink> R24<T, S> {
    /// Create a session over an arbitrary transport
    pub fn new(transport: T, sink: S) -> Self {
        R24 {
            transport,
            sink,
            decoder: FrameDecoder::new(),
            scheduler: PollScheduler::new(),
            cache: ChangeCache::new(),
            heartbeat: Heartbeat::default(),
            device_info: DeviceInfo::default(),
            stats: SessionStats::default(),
            poll_interval: Config::default().poll_interval(),
        }
    }

    /// Set the period used by [`R24::run_for`]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Dialect learned from output switch replies
    pub fn dialect(&self) -> Dialect {
        self.scheduler.dialect()
    }

    /// Last reported product information
    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    /// Receive and send counters
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Telemetry sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the telemetry sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Tear the session down into its transport and sink
    pub fn into_parts(self) -> (T, S) {
        (self.transport, self.sink)
    }

    fn hex(bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Send raw bytes to the module
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        log::trace!("Sending:  {}", Self::hex(bytes));
        self.transport.write(bytes)
    }

    /// Send a single query frame
    pub fn send_query(&mut self, query: Query) -> Result<()> {
        self.send(&query.encode())?;
        self.stats.queries_sent += 1;
        Ok(())
    }

    /// Send a configuration command; the module's reply is decoded like any
    /// other frame
    pub fn apply_setting(&mut self, setting: Setting) -> Result<()> {
        let bytes = setting.encode()?;
        log::debug!("Applying {:?}", setting);
        self.send(&bytes)
    }

    /// Consume one received byte, dispatching a frame if it completes one
    pub fn feed(&mut self, byte: u8) {
        match self.decoder.push(byte) {
            Ok(Some(frame)) => self.handle_frame(&frame),
            Ok(None) => {}
            Err(e) => {
                if e.is_framing() {
                    self.stats.framing_errors += 1;
                } else {
                    self.stats.checksum_errors += 1;
                }
                log::debug!("Frame dropped: {}", e);
            }
        }
    }

    /// Feed a slice of received bytes
    pub fn feed_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.feed(byte);
        }
    }

    /// Drain every byte the transport has waiting.
    ///
    /// Returns the number of bytes consumed.
    pub fn process_available(&mut self) -> Result<usize> {
        let mut count = 0;
        while let Some(byte) = self.transport.read_byte()? {
            self.feed(byte);
            count += 1;
        }
        Ok(count)
    }

    /// Decode a validated frame and publish what it carries
    pub fn handle_frame(&mut self, frame: &Frame) {
        self.stats.frames += 1;
        log::trace!("Received: {}", Self::hex(&frame.to_bytes()));
        match dispatch::decode(frame) {
            Ok(reports) => {
                for report in reports {
                    self.apply(report);
                }
            }
            Err(e @ (R24Error::OutOfRange { .. } | R24Error::OversizeString { .. })) => {
                self.stats.decode_errors += 1;
                log::warn!("Field skipped: {}", e);
            }
            Err(e) => {
                self.stats.decode_errors += 1;
                log::debug!("Frame ignored: {}", e);
            }
        }
    }

    fn apply(&mut self, report: Report) {
        match &report {
            Report::Heartbeat => {
                self.heartbeat.mark_alive();
                return;
            }
            Report::ResetAck => return,
            Report::OutputSwitch(on) => {
                self.scheduler.set_dialect(Dialect::from_switch(*on));
            }
            Report::ProductMode(s) => self.device_info.product_mode = Some(s.clone()),
            Report::ProductId(s) => self.device_info.product_id = Some(s.clone()),
            Report::HardwareModel(s) => self.device_info.hardware_model = Some(s.clone()),
            Report::FirmwareVersion(s) => self.device_info.firmware_version = Some(s.clone()),
            Report::ProtocolType(p) => self.device_info.protocol_type = Some(*p),
            _ => {}
        }
        if matches!(
            report,
            Report::ProductMode(_)
                | Report::ProductId(_)
                | Report::HardwareModel(_)
                | Report::FirmwareVersion(_)
                | Report::ProtocolType(_)
        ) {
            self.device_info.updated_at = Some(Utc::now());
        }

        let (Some(metric), Some(value)) = (report.metric(), report.value()) else {
            return;
        };
        if let Some(key) = report.change_key() {
            if !self.cache.update(metric, key) {
                return;
            }
        }
        self.sink.publish(metric, value);
    }

    /// One scheduler step: publish the heartbeat state if one is pending,
    /// then send the next query of the active sweep.
    pub fn poll(&mut self) -> Result<Query> {
        if let Some(status) = self.heartbeat.take() {
            self.sink
                .publish(Metric::Heartbeat, Value::Text(status.label().to_string()));
        }
        let query = self.scheduler.step();
        self.send_query(query)?;
        Ok(query)
    }

    /// Drive the session for `duration`: drain received bytes continuously
    /// and run a poll step every poll interval, starting immediately.
    pub fn run_for(&mut self, duration: Duration) -> Result<()> {
        let start = Instant::now();
        let mut next_poll = start;

        while start.elapsed() < duration {
            self.process_available()?;
            if Instant::now() >= next_poll {
                self.poll()?;
                // Measured from now so a stall does not queue up missed polls
                next_poll = Instant::now() + self.poll_interval;
            }
            thread::sleep(Duration::from_millis(IDLE_SLEEP_MS));
        }

        log::info!("Session stats: {:?}", self.stats);
        Ok(())
    }
}
