//! Report items, grounding citations, and the per-session report board.
//!
//! The board holds exactly one item per [`Timeframe`], in declaration order. All
//! mutation goes through [`ReportBoard::apply`], which enforces the status order
//! `pending -> loading -> completed | error`.

use crate::timeframe::Timeframe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Web source attached to a grounding citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

/// Provenance reference returned with generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub web: WebSource,
}

impl Citation {
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            web: WebSource {
                uri: uri.into(),
                title: title.into(),
            },
        }
    }

    pub fn uri(&self) -> &str {
        &self.web.uri
    }

    /// Title for display: the given title, else the URI's host, else the raw URI.
    pub fn display_title(&self) -> String {
        let title = self.web.title.trim();
        if !title.is_empty() {
            return title.to_string();
        }
        url::Url::parse(&self.web.uri)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
            .unwrap_or_else(|| self.web.uri.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Loading,
    Completed,
    Error,
}

impl ReportStatus {
    fn stage(self) -> u8 {
        match self {
            ReportStatus::Pending => 0,
            ReportStatus::Loading => 1,
            ReportStatus::Completed | ReportStatus::Error => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.stage() == 2
    }
}

/// Result of scanning one timeframe. Identity is the timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub time_frame: Timeframe,
    pub content: String,
    pub sources: Vec<Citation>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportItem {
    pub fn pending(time_frame: Timeframe) -> Self {
        Self {
            time_frame,
            content: String::new(),
            sources: Vec::new(),
            timestamp: None,
            status: ReportStatus::Pending,
            error: None,
        }
    }

    pub fn completed(time_frame: Timeframe, content: String, sources: Vec<Citation>) -> Self {
        Self {
            time_frame,
            content,
            sources,
            timestamp: Some(Utc::now()),
            status: ReportStatus::Completed,
            error: None,
        }
    }

    pub fn failed(time_frame: Timeframe, message: impl Into<String>) -> Self {
        Self {
            time_frame,
            content: String::new(),
            sources: Vec::new(),
            timestamp: Some(Utc::now()),
            status: ReportStatus::Error,
            error: Some(message.into()),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ReportStatus::Completed
    }
}

/// Overall scan progress shown by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatus {
    pub is_generating: bool,
    /// 0 to 100.
    pub progress: f32,
    pub current_action: String,
}

impl ScanStatus {
    pub fn idle() -> Self {
        Self {
            is_generating: false,
            progress: 0.0,
            current_action: "Idle".to_string(),
        }
    }

    pub fn initializing() -> Self {
        Self {
            is_generating: true,
            progress: 5.0,
            current_action: "Initializing Scan...".to_string(),
        }
    }

    /// Progress before scanning step `index` of `total`: 10..90, leaving the ends
    /// for initialising and completion.
    pub fn scanning(index: usize, total: usize, timeframe: Timeframe) -> Self {
        let fraction = if total == 0 {
            0.0
        } else {
            index as f32 / total as f32
        };
        Self {
            is_generating: true,
            progress: 10.0 + fraction * 80.0,
            current_action: format!("Scanning {}...", timeframe),
        }
    }

    pub fn complete() -> Self {
        Self {
            is_generating: false,
            progress: 100.0,
            current_action: "Scan Complete".to_string(),
        }
    }
}

impl Default for ScanStatus {
    fn default() -> Self {
        Self::idle()
    }
}

/// State transition on the report board.
#[derive(Debug, Clone)]
pub enum BoardAction {
    /// New scan session: every item is replaced by a fresh `loading` item.
    BeginScan,
    /// The orchestrator is about to generate this timeframe.
    MarkLoading(Timeframe),
    /// Generation finished; the item replaces the board entry for its timeframe.
    Resolve(ReportItem),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid transition for {timeframe}: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub timeframe: Timeframe,
    pub from: ReportStatus,
    pub to: ReportStatus,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("report board must hold one item per timeframe in order, got {0:?}")]
pub struct MalformedBoard(pub Vec<Timeframe>);

/// Exactly one [`ReportItem`] per timeframe, in declaration order. Serialized as a
/// plain array; deserializing rejects any other shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<ReportItem>", try_from = "Vec<ReportItem>")]
pub struct ReportBoard {
    items: Vec<ReportItem>,
}

impl TryFrom<Vec<ReportItem>> for ReportBoard {
    type Error = MalformedBoard;

    fn try_from(items: Vec<ReportItem>) -> Result<Self, Self::Error> {
        let order: Vec<Timeframe> = items.iter().map(|r| r.time_frame).collect();
        if order != Timeframe::ALL {
            return Err(MalformedBoard(order));
        }
        Ok(Self { items })
    }
}

impl From<ReportBoard> for Vec<ReportItem> {
    fn from(board: ReportBoard) -> Self {
        board.items
    }
}

impl ReportBoard {
    pub fn new() -> Self {
        Self {
            items: Timeframe::ALL.into_iter().map(ReportItem::pending).collect(),
        }
    }

    pub fn items(&self) -> &[ReportItem] {
        &self.items
    }

    pub fn get(&self, timeframe: Timeframe) -> &ReportItem {
        &self.items[Self::slot(timeframe)]
    }

    /// Completed items in timeframe order.
    pub fn completed(&self) -> Vec<ReportItem> {
        self.items.iter().filter(|r| r.is_completed()).cloned().collect()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|r| r.is_completed()).count()
    }

    /// True once every item is `completed` or `error`.
    pub fn is_settled(&self) -> bool {
        self.items.iter().all(|r| r.status.is_terminal())
    }

    pub fn apply(&mut self, action: BoardAction) -> Result<(), InvalidTransition> {
        match action {
            BoardAction::BeginScan => {
                for item in self.items.iter_mut() {
                    *item = ReportItem {
                        status: ReportStatus::Loading,
                        ..ReportItem::pending(item.time_frame)
                    };
                }
                Ok(())
            }
            BoardAction::MarkLoading(timeframe) => {
                let item = &mut self.items[Self::slot(timeframe)];
                match item.status {
                    ReportStatus::Pending | ReportStatus::Loading => {
                        item.status = ReportStatus::Loading;
                        Ok(())
                    }
                    from => Err(InvalidTransition {
                        timeframe,
                        from,
                        to: ReportStatus::Loading,
                    }),
                }
            }
            BoardAction::Resolve(result) => {
                let timeframe = result.time_frame;
                let slot = &mut self.items[Self::slot(timeframe)];
                if !result.status.is_terminal() || slot.status.stage() >= result.status.stage() {
                    return Err(InvalidTransition {
                        timeframe,
                        from: slot.status,
                        to: result.status,
                    });
                }
                *slot = result;
                Ok(())
            }
        }
    }

    fn slot(timeframe: Timeframe) -> usize {
        Timeframe::ALL
            .iter()
            .position(|tf| *tf == timeframe)
            .unwrap_or_default()
    }
}

impl Default for ReportBoard {
    fn default() -> Self {
        Self::new()
    }
}
