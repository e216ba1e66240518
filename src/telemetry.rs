//! Telemetry
//!
//! Fire-and-forget lifecycle events, one JSON line per UDP datagram to
//! the habitat's collector. The sink can never affect lifecycle
//! correctness: a failed bind downgrades it to local logging, a lost
//! datagram is just lost. Every event is mirrored to `tracing`.

use std::net::UdpSocket;

use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{DeathReason, EatOutcome, FarmOutcome};

/// One lifecycle event, tagged for the collector.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifeEvent {
    Born { id: String, generation: u32 },
    Tick { age: u32, energy: i64 },
    Ate { requested: u64, outcome: EatOutcome },
    Farmed { amount: u64, outcome: FarmOutcome },
    Spawned { child: String, artifact: String },
    Died { reason: DeathReason, age: u32, energy: i64 },
    Halted { age: u32 },
}

/// Write-only event channel toward the collector.
pub struct EventSink {
    socket: Option<UdpSocket>,
    collector: String,
}

impl EventSink {
    /// Open a sink toward `collector`. A failed bind is logged once and
    /// leaves the sink local-only.
    pub fn bind(collector: &str) -> Self {
        let socket = match UdpSocket::bind("0.0.0.0:0") {
            Ok(socket) => Some(socket),
            Err(err) => {
                warn!(error = %err, "telemetry socket unavailable, events stay local");
                None
            }
        };
        EventSink {
            socket,
            collector: collector.to_string(),
        }
    }

    /// A sink that only mirrors to the local log.
    pub fn disabled() -> Self {
        EventSink {
            socket: None,
            collector: String::new(),
        }
    }

    /// Emit one event. Infallible by design of the interface; failures
    /// degrade to silence.
    pub fn emit(&self, event: &LifeEvent) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(_) => return,
        };
        debug!("{}", line);
        if let Some(socket) = &self.socket {
            let _ = socket.send_to(line.as_bytes(), self.collector.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_wire_shape() {
        assert_eq!(
            serde_json::to_value(LifeEvent::Born {
                id: "1.0".to_string(),
                generation: 2,
            })
            .unwrap(),
            json!({"event": "born", "id": "1.0", "generation": 2})
        );
        assert_eq!(
            serde_json::to_value(LifeEvent::Ate {
                requested: 3,
                outcome: EatOutcome::TimedOut,
            })
            .unwrap(),
            json!({"event": "ate", "requested": 3, "outcome": "timed_out"})
        );
        assert_eq!(
            serde_json::to_value(LifeEvent::Died {
                reason: DeathReason::Hunger,
                age: 40,
                energy: 0,
            })
            .unwrap(),
            json!({"event": "died", "reason": "hunger", "age": 40, "energy": 0})
        );
    }

    #[test]
    fn test_events_reach_the_collector() {
        let collector = UdpSocket::bind("127.0.0.1:0").unwrap();
        collector
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let addr = collector.local_addr().unwrap();

        let sink = EventSink::bind(&addr.to_string());
        sink.emit(&LifeEvent::Tick { age: 1, energy: 39 });

        let mut buf = [0u8; 512];
        let (len, _) = collector.recv_from(&mut buf).unwrap();
        let received: serde_json::Value = serde_json::from_slice(&buf[..len]).unwrap();
        assert_eq!(received["event"], "tick");
        assert_eq!(received["age"], 1);
        assert_eq!(received["energy"], 39);
    }

    #[test]
    fn test_disabled_sink_swallows_events() {
        let sink = EventSink::disabled();
        sink.emit(&LifeEvent::Halted { age: 12 });
    }

    #[test]
    fn test_unresolvable_collector_is_harmless() {
        let sink = EventSink::bind("this-is-not-an-address");
        sink.emit(&LifeEvent::Tick { age: 1, energy: 1 });
    }
}
