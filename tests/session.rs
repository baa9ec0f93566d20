use r24_protocol::checksum;
use r24_protocol::scheduler::STANDARD_QUERIES;
use r24_protocol::{
    Dialect, Frame, FrameDecoder, Metric, Query, R24Error, Result, Transport, Value, R24,
};
use std::collections::VecDeque;

/// In-memory transport: bytes queued in `rx` are "received", writes land in `tx`
#[derive(Default)]
struct MemoryTransport {
    rx: VecDeque<u8>,
    tx: Vec<Vec<u8>>,
}

impl Transport for MemoryTransport {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.rx.pop_front())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.tx.push(bytes.to_vec());
        Ok(())
    }
}

type Session = R24<MemoryTransport, Vec<(Metric, Value)>>;

fn session() -> Session {
    R24::new(MemoryTransport::default(), Vec::new())
}

fn receive(r24: &mut Session, frame: Frame) {
    r24.transport_mut().rx.extend(frame.to_bytes());
    r24.process_available().unwrap();
}

fn published(r24: &Session, metric: Metric) -> Vec<Value> {
    r24.sink()
        .iter()
        .filter(|(m, _)| *m == metric)
        .map(|(_, v)| v.clone())
        .collect()
}

#[test]
fn output_switch_reply_selects_custom_dialect() {
    let mut r24 = session();
    let mut bytes = vec![0x53, 0x59, 0x08, 0x80, 0x00, 0x01, 0x0F, 0x00, 0x54, 0x43];
    bytes[6] = 0x01;
    bytes[7] = checksum::checksum(&bytes);
    r24.feed_all(&bytes);

    assert_eq!(r24.dialect(), Dialect::CustomProtocol);
    assert_eq!(published(&r24, Metric::OutputSwitch), vec![Value::Bool(true)]);
}

#[test]
fn repeated_timer_reply_publishes_once() {
    let mut r24 = session();
    let frame = Frame::new(0x08, 0x8C, &[0x00, 0x00, 0x00, 0x05]);
    receive(&mut r24, frame.clone());
    receive(&mut r24, frame);

    assert_eq!(r24.stats().frames, 2);
    assert_eq!(
        published(&r24, Metric::MotionTriggerTime),
        vec![Value::UInt(5)]
    );
}

#[test]
fn changed_value_is_republished() {
    let mut r24 = session();
    receive(&mut r24, Frame::new(0x80, 0x03, &[40]));
    receive(&mut r24, Frame::new(0x08, 0x87, &[40]));
    receive(&mut r24, Frame::new(0x80, 0x83, &[41]));

    // Body movement shares one cache slot across both families
    assert_eq!(
        published(&r24, Metric::MovementSigns),
        vec![Value::UInt(40), Value::UInt(41)]
    );
}

#[test]
fn unchanged_non_gated_metric_still_publishes() {
    let mut r24 = session();
    receive(&mut r24, Frame::new(0x80, 0x81, &[0x01]));
    receive(&mut r24, Frame::new(0x80, 0x81, &[0x01]));
    assert_eq!(published(&r24, Metric::Presence).len(), 2);
}

#[test]
fn out_of_range_scene_is_not_published() {
    let mut r24 = session();
    receive(&mut r24, Frame::new(0x05, 0x07, &[0x05]));

    assert!(r24.sink().is_empty());
    assert_eq!(r24.stats().decode_errors, 1);
}

#[test]
fn length_high_byte_aborts_frame() {
    let mut decoder = FrameDecoder::new();
    let input = [0x53, 0x59, 0x08, 0x80, 0x06, 0x01, 0x0F, 0x00, 0x54, 0x43];
    let mut frames = 0;
    let mut errors = Vec::new();
    for b in input {
        match decoder.push(b) {
            Ok(Some(_)) => frames += 1,
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }
    assert_eq!(frames, 0);
    assert!(matches!(errors[0], R24Error::LengthOutOfRange { high: 0x06 }));

    let mut r24 = session();
    r24.feed_all(&input);
    assert_eq!(r24.stats().frames, 0);
    assert!(r24.sink().is_empty());
}

#[test]
fn corrupted_checksum_never_dispatches() {
    let mut r24 = session();
    for corruption in 1..=255u8 {
        let mut bytes = Frame::new(0x08, 0x80, &[0x00]).to_bytes();
        bytes[7] = bytes[7].wrapping_add(corruption);
        r24.feed_all(&bytes);
    }
    assert_eq!(r24.stats().frames, 0);
    assert_eq!(r24.stats().checksum_errors, 255);
    assert_eq!(r24.dialect(), Dialect::Unknown);
}

#[test]
fn recovers_after_noise_prefix() {
    let noise: [&[u8]; 4] = [
        &[0x00, 0xFF, 0x12],
        &[0x53, 0x00, 0x53],
        &[0x53, 0x59, 0x80, 0x81, 0x00, 0x01, 0x01, 0x00, 0x00],
        &[0x54, 0x43, 0x59, 0x05],
    ];
    for prefix in noise {
        let frame = Frame::new(0x07, 0x81, &[0x01, 0x2C]);
        let mut decoder = FrameDecoder::new();
        let mut decoded = Vec::new();
        for &b in prefix.iter().chain(frame.to_bytes().iter()) {
            if let Ok(Some(f)) = decoder.push(b) {
                decoded.push(f);
            }
        }
        assert_eq!(decoded.last(), Some(&frame), "prefix {:02X?}", prefix);
    }
}

#[test]
fn scheduler_learns_standard_dialect_and_sweeps() {
    let mut r24 = session();

    assert_eq!(r24.poll().unwrap(), Query::OutputSwitch);
    assert_eq!(
        r24.transport_mut().tx[0],
        Query::OutputSwitch.encode().to_vec()
    );

    receive(&mut r24, Frame::new(0x08, 0x80, &[0x00]));
    assert_eq!(r24.dialect(), Dialect::StandardProtocol);

    let mut sent = Vec::new();
    for _ in 0..(STANDARD_QUERIES.len() + 2) {
        sent.push(r24.poll().unwrap());
    }
    assert_eq!(&sent[..13], &STANDARD_QUERIES);
    assert_eq!(sent[13], Query::Heartbeat);
    assert_eq!(sent[14], Query::ProductMode);
    assert_eq!(r24.stats().queries_sent, 16);
}

#[test]
fn heartbeat_published_once_per_poll_after_first_reply() {
    let mut r24 = session();
    r24.poll().unwrap();
    r24.poll().unwrap();
    assert!(published(&r24, Metric::Heartbeat).is_empty());

    receive(&mut r24, Frame::new(0x01, 0x01, &[0x0F]));
    r24.poll().unwrap();
    r24.poll().unwrap();
    receive(&mut r24, Frame::new(0x01, 0x01, &[0x0F]));
    r24.poll().unwrap();

    assert_eq!(
        published(&r24, Metric::Heartbeat),
        vec![
            Value::Text("Normal".into()),
            Value::Text("Abnormal".into()),
            Value::Text("Normal".into()),
        ]
    );
}

#[test]
fn burst_report_publishes_scaled_values() {
    let mut r24 = session();
    receive(&mut r24, Frame::new(0x08, 0x01, &[120, 3, 80, 5, 8]));
    receive(&mut r24, Frame::new(0x08, 0x01, &[120, 3, 81, 5, 8]));

    assert_eq!(published(&r24, Metric::StaticDistance), vec![Value::Float(1.5)]);
    assert_eq!(published(&r24, Metric::MotionSpeed), vec![Value::Float(-1.0)]);
    assert_eq!(
        published(&r24, Metric::SpatialMotionValue),
        vec![Value::UInt(80), Value::UInt(81)]
    );
    assert_eq!(r24.sink().len(), 6);
}

#[test]
fn device_info_exports_as_json() {
    let mut r24 = session();
    receive(&mut r24, Frame::new(0x02, 0xA2, b"ID-0042"));
    receive(&mut r24, Frame::new(0x02, 0xA1, &[b'x'; 32]));

    let json = serde_json::to_value(r24.device_info()).unwrap();
    assert_eq!(json["product_id"], "ID-0042");
    assert!(json["product_mode"].is_null());
}
