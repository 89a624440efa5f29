//! Inference categories and label parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Inference modes offered by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Object detection with bounding boxes
    Detect,
    /// Whole-image classification
    Classify,
    /// Instance segmentation masks
    Segment,
    /// Keypoint/pose estimation
    Pose,
    /// Detection with track identities
    Track,
}

impl Category {
    /// Canonical wire label
    pub fn name(&self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::Classify => "classify",
            Self::Segment => "segment",
            Self::Pose => "pose",
            Self::Track => "track",
        }
    }

    /// Label used by the legacy front-end selector
    pub fn alias(&self) -> &'static str {
        match self {
            Self::Detect => "检测",
            Self::Classify => "分类",
            Self::Segment => "分割",
            Self::Pose => "姿势",
            Self::Track => "追踪",
        }
    }

    /// Task name forwarded to the predictor
    pub fn task(&self) -> &'static str {
        self.name()
    }

    /// Default weights file relative to the weights directory
    pub fn weights_file(&self) -> PathBuf {
        match self {
            Self::Detect | Self::Track => PathBuf::from("best.pt"),
            Self::Classify => PathBuf::from("models/classify/yolov8n-cls.pt"),
            Self::Pose => PathBuf::from("models/pose/yolov8n-pose.pt"),
            Self::Segment => PathBuf::from("models/segment/yolov8n-seg.pt"),
        }
    }

    /// All selectable categories
    pub fn all() -> &'static [Category] {
        &[
            Self::Detect,
            Self::Classify,
            Self::Segment,
            Self::Pose,
            Self::Track,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone)]
pub struct ParseCategoryError {
    input: String,
}

impl ParseCategoryError {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.input.trim();
        write!(
            f,
            "Unknown model category: {}",
            if shown.is_empty() { "<empty>" } else { shown }
        )
    }
}

impl std::error::Error for ParseCategoryError {}

impl From<ParseCategoryError> for crate::error::Error {
    fn from(err: ParseCategoryError) -> Self {
        let input = err.input().trim();
        crate::error::Error::UnknownCategory(if input.is_empty() {
            "<empty>".to_string()
        } else {
            input.to_string()
        })
    }
}

/// Parse a client-provided category label.
///
/// Accepts the canonical English names and the legacy front-end labels,
/// ignoring surrounding whitespace and ASCII case.
pub fn parse_category(input: &str) -> Result<Category, ParseCategoryError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseCategoryError::new(input));
    }

    Category::all()
        .iter()
        .copied()
        .find(|category| {
            category.name().eq_ignore_ascii_case(trimmed) || category.alias() == trimmed
        })
        .ok_or_else(|| ParseCategoryError::new(input))
}
