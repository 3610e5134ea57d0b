use std::collections::VecDeque;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// How many price samples are kept before the oldest are dropped.
pub const HISTORY_CAP: usize = 100;

/// A single (time, price) sample for the chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: SystemTime,
    pub price: f64,
}

/// Time-ascending, append-only price samples, capped at the most recent
/// `cap` entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    points: VecDeque<PricePoint>,
    cap: usize,
}

impl PriceHistory {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            points: VecDeque::new(),
            cap,
        }
    }

    /// Append a sample stamped now.
    pub fn push(&mut self, price: f64) {
        self.record(PricePoint {
            time: SystemTime::now(),
            price,
        });
    }

    /// Append a pre-stamped sample (used when seeding synthetic history).
    pub fn record(&mut self, point: PricePoint) {
        self.points.push_back(point);
        while self.points.len() > self.cap {
            self.points.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::with_cap(HISTORY_CAP)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Info,
    Warning,
    Error,
    Success,
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogKind::Info => "info",
            LogKind::Warning => "warning",
            LogKind::Error => "error",
            LogKind::Success => "success",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
    pub timestamp: SystemTime,
}

/// Most-recent-first event feed for the display. Append-only and unbounded;
/// the engine writes it, only the presentation reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketLog {
    entries: VecDeque<LogEntry>,
}

impl MarketLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: LogKind, message: impl Into<String>) {
        self.entries.push_front(LogEntry {
            kind,
            message: message.into(),
            timestamp: SystemTime::now(),
        });
    }

    /// Most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
