//! Precomputed scene-cut data for a source video.
//!
//! Produced once per video by an external scene detector and read-only
//! during reframing. An empty context is valid and simply means no resets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ModelError, ModelResult};

/// A detected scene as a half-open frame range `[start_frame, end_frame)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SceneSpan {
    pub start_frame: u64,
    pub end_frame: u64,
}

impl SceneSpan {
    pub fn new(start_frame: u64, end_frame: u64) -> ModelResult<Self> {
        if start_frame >= end_frame {
            return Err(ModelError::InvalidSceneSpan {
                start: start_frame,
                end: end_frame,
            });
        }
        Ok(Self {
            start_frame,
            end_frame,
        })
    }

    /// Scene length in frames.
    pub fn length(&self) -> u64 {
        self.end_frame.saturating_sub(self.start_frame)
    }
}

/// Scene boundaries plus per-scene lengths keyed by scene start frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SceneContext {
    /// Frame indices at which a new scene begins (hard cuts).
    #[serde(default)]
    pub boundary_frame_indices: BTreeSet<u64>,
    /// Scene start frame -> scene length in frames.
    #[serde(default)]
    pub scene_lengths: BTreeMap<u64, u64>,
}

impl SceneContext {
    /// Context with no scene information.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a context from an ordered scene list.
    ///
    /// Each scene's end frame is a boundary except for the last scene.
    pub fn from_spans(spans: &[SceneSpan]) -> Self {
        let mut context = Self::default();
        for (i, span) in spans.iter().enumerate() {
            if i + 1 < spans.len() {
                context.boundary_frame_indices.insert(span.end_frame);
            }
            context.scene_lengths.insert(span.start_frame, span.length());
        }
        context
    }

    /// True when no boundaries are known.
    pub fn is_empty(&self) -> bool {
        self.boundary_frame_indices.is_empty()
    }

    pub fn is_boundary(&self, frame_index: u64) -> bool {
        self.boundary_frame_indices.contains(&frame_index)
    }

    /// Length of the scene covering `frame_index`, if one is known.
    pub fn scene_length_at(&self, frame_index: u64) -> Option<u64> {
        let (start, length) = self.scene_lengths.range(..=frame_index).next_back()?;
        if frame_index < start.saturating_add(*length) {
            Some(*length)
        } else {
            None
        }
    }

    /// Number of scenes with length information.
    pub fn scene_count(&self) -> usize {
        self.scene_lengths.len()
    }

    /// Boundaries in ascending order.
    pub fn cut_boundaries(&self) -> Vec<u64> {
        self.boundary_frame_indices.iter().copied().collect()
    }

    /// Copy of this context without the given boundary.
    pub fn without_boundary(&self, frame_index: u64) -> Self {
        let mut context = self.clone();
        context.boundary_frame_indices.remove(&frame_index);
        context
    }
}
