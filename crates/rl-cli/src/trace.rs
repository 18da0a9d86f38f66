//! Host event traces.
//!
//! One JSON object per line; blank lines and `#` comments are skipped.
//! `at` is a millisecond offset from the start of the replay.
//!
//! ```text
//! {"event": "start", "at": 0, "url": "https://www.facebook.com/reel/1"}
//! {"event": "url", "at": 4000, "url": "https://www.facebook.com/reel/2"}
//! {"event": "visibility", "at": 9000, "visible": true}
//! {"event": "tick", "at": 10000}
//! ```

use serde::Deserialize;

use rl_core::Millis;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    Start { at: Millis, url: String },
    Url { at: Millis, url: String },
    Visibility { at: Millis, visible: bool },
    Tick { at: Millis },
}

impl TraceEvent {
    pub fn at(&self) -> Millis {
        match self {
            Self::Start { at, .. }
            | Self::Url { at, .. }
            | Self::Visibility { at, .. }
            | Self::Tick { at } => *at,
        }
    }
}

pub fn parse_trace(text: &str) -> Result<Vec<TraceEvent>, String> {
    let mut events: Vec<TraceEvent> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event: TraceEvent = serde_json::from_str(line)
            .map_err(|e| format!("line {}: {}", idx + 1, e))?;

        if let Some(prev) = events.last() {
            if event.at() < prev.at() {
                return Err(format!(
                    "line {}: events out of order ({} after {})",
                    idx + 1,
                    event.at(),
                    prev.at()
                ));
            }
        }

        events.push(event);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trace() {
        let text = r#"
# warm up
{"event": "start", "at": 0, "url": "https://x/reel/1"}
{"event": "url", "at": 10, "url": "https://x/reel/2"}

{"event": "visibility", "at": 20, "visible": false}
{"event": "tick", "at": 30}
"#;
        let events = parse_trace(text).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            TraceEvent::Start {
                at: 0,
                url: "https://x/reel/1".to_string()
            }
        );
        assert_eq!(events[2], TraceEvent::Visibility { at: 20, visible: false });
        assert_eq!(events[3].at(), 30);
    }

    #[test]
    fn test_rejects_unknown_event() {
        let err = parse_trace(r#"{"event": "scroll", "at": 0}"#).unwrap_err();
        assert!(err.starts_with("line 1:"));
    }

    #[test]
    fn test_rejects_out_of_order() {
        let text = "{\"event\": \"tick\", \"at\": 50}\n{\"event\": \"tick\", \"at\": 40}";
        let err = parse_trace(text).unwrap_err();
        assert!(err.contains("out of order"));
    }
}
