//! Right-edge series labels: collision resolution and text fitting.
//!
//! Typical flow for one render:
//! 1. [`label_targets`] projects each series' last value to an ideal position
//! 2. [`LabelLayoutEngine::layout`] separates colliding labels and truncates
//!    each label's text to the maximum width

pub mod collision;
pub mod targets;
pub mod text;

pub use collision::{RelaxationMode, resolve_collisions, resolve_collisions_symmetric};
pub use targets::{LinearScale, label_targets};
pub use text::{CharWidthEstimate, ELLIPSIS, truncate_to_width, wrap_text_to_width};

use crate::config::LabelConfig;
use crate::models::{LabelTarget, ResolvedLabel};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayoutEngine {
    pub min_distance: f64,
    pub max_width: f64,
    pub relaxation: RelaxationMode,
}

impl Default for LabelLayoutEngine {
    fn default() -> Self {
        Self::from(&LabelConfig::default())
    }
}

impl From<&LabelConfig> for LabelLayoutEngine {
    fn from(cfg: &LabelConfig) -> Self {
        Self {
            min_distance: cfg.min_distance,
            max_width: cfg.max_width,
            relaxation: cfg.relaxation,
        }
    }
}

impl LabelLayoutEngine {
    /// Separate colliding labels; `targets` must be sorted by ideal position.
    pub fn resolve(&self, targets: &[LabelTarget]) -> Vec<ResolvedLabel> {
        match self.relaxation {
            RelaxationMode::Forward => resolve_collisions(targets, self.min_distance),
            RelaxationMode::Symmetric => resolve_collisions_symmetric(targets, self.min_distance),
        }
    }

    /// [`resolve`](Self::resolve), then truncate every label to `max_width`.
    pub fn layout<F>(&self, targets: &[LabelTarget], measure: F) -> Vec<ResolvedLabel>
    where
        F: Fn(&str) -> f64,
    {
        let mut labels = self.resolve(targets);
        for label in &mut labels {
            label.display_text = truncate_to_width(&label.text, self.max_width, &measure);
        }
        let moved = labels.iter().filter(|l| l.displacement() != 0.0).count();
        debug!(
            "laid out {} labels ({moved} moved, min distance {})",
            labels.len(),
            self.min_distance
        );
        labels
    }
}
