//! Chat report layout and rendering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ChatRole, ChatTurn};

/// File name offered to clients.
pub const REPORT_FILE_NAME: &str = "Rapport_Cabinet.pdf";

/// MIME type of rendered reports.
pub const REPORT_MIME: &str = "application/pdf";

/// Longest turn excerpt printed, in characters.
pub const MAX_LINE_CHARS: usize = 80;

const LEFT_MARGIN: i32 = 100;
const TITLE_Y: i32 = 750;
const RULE_Y: i32 = 730;
const RULE_END_X: i32 = 500;
const FIRST_LINE_Y: i32 = 700;
const LINE_STEP: i32 = 20;
const BOTTOM_MARGIN: i32 = 50;

/// Report errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report renderer unavailable")]
    RendererUnavailable,
}

pub type ReportResult<T> = Result<T, ReportError>;

/// One string placed on the page, in points from the bottom-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

/// Everything drawn on the single report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    pub title: PlacedLine,
    /// Horizontal rule as (x1, y, x2)
    pub rule: (i32, i32, i32),
    pub lines: Vec<PlacedLine>,
}

/// Renderer options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Stop drawing once the cursor passes the bottom margin
    pub stop_at_margin: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            stop_at_margin: true,
        }
    }
}

/// Turns chat transcripts into a one-page document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    settings: ReportSettings,
}

impl ReportRenderer {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    /// Place the title, rule and one line per turn.
    ///
    /// Lines descend from a fixed start. Past the bottom margin the rest of
    /// the transcript is dropped (or, with `stop_at_margin` off, placed
    /// below the page where viewers clip it).
    pub fn layout(&self, cabinet_name: &str, turns: &[ChatTurn]) -> ReportLayout {
        let title = PlacedLine {
            x: LEFT_MARGIN,
            y: TITLE_Y,
            text: format!("Rapport d'Activité - {}", cabinet_name),
        };

        let mut lines = Vec::with_capacity(turns.len());
        let mut y = FIRST_LINE_Y;
        for turn in turns {
            lines.push(PlacedLine {
                x: LEFT_MARGIN,
                y,
                text: format!("{} {}", role_label(turn.role), excerpt(&turn.content)),
            });
            y -= LINE_STEP;
            if self.settings.stop_at_margin && y < BOTTOM_MARGIN {
                break;
            }
        }

        ReportLayout {
            title,
            rule: (LEFT_MARGIN, RULE_Y, RULE_END_X),
            lines,
        }
    }

    /// Render the report as PDF bytes.
    #[cfg(feature = "pdf")]
    pub fn render(&self, cabinet_name: &str, turns: &[ChatTurn]) -> ReportResult<Vec<u8>> {
        let layout = self.layout(cabinet_name, turns);
        Ok(super::PdfPage::from_layout(&layout).finish())
    }

    /// Render the report as PDF bytes.
    #[cfg(not(feature = "pdf"))]
    pub fn render(&self, _cabinet_name: &str, _turns: &[ChatTurn]) -> ReportResult<Vec<u8>> {
        Err(ReportError::RendererUnavailable)
    }
}

/// Labels carry their own trailing space, so lines read `"IA:  text"`.
fn role_label(role: ChatRole) -> &'static str {
    match role {
        ChatRole::Bot => "IA: ",
        ChatRole::User => "USER: ",
    }
}

fn excerpt(content: &str) -> String {
    content.chars().take(MAX_LINE_CHARS).collect()
}
