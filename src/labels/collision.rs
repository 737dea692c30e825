//! Vertical anti-collision for right-edge series labels.

use crate::models::{LabelTarget, ResolvedLabel};
use serde::{Deserialize, Serialize};

/// How colliding labels are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelaxationMode {
    /// Single top-to-bottom pass; labels are only ever pushed down.
    #[default]
    Forward,
    /// Runs of colliding labels are centered on the mean of their ideal positions.
    Symmetric,
}

fn resolved(target: &LabelTarget, final_position: f64) -> ResolvedLabel {
    ResolvedLabel {
        key: target.key.clone(),
        ideal_position: target.ideal_position,
        text: target.text.clone(),
        final_position,
        display_text: target.text.clone(),
    }
}

/// Push labels apart so consecutive positions differ by at least `min_distance`.
///
/// `targets` must already be sorted by `ideal_position` ascending; the input
/// order is kept in the output. Greedy and one-directional: a label is moved
/// to `previous + min_distance` when it sits too close, earlier labels are never
/// revisited. A `min_distance` that is zero, negative or NaN disables separation.
pub fn resolve_collisions(targets: &[LabelTarget], min_distance: f64) -> Vec<ResolvedLabel> {
    let separate = min_distance > 0.0;
    let mut out: Vec<ResolvedLabel> = Vec::with_capacity(targets.len());
    for target in targets {
        let mut position = target.ideal_position;
        if separate
            && let Some(prev) = out.last()
            && position - prev.final_position < min_distance
        {
            position = prev.final_position + min_distance;
        }
        out.push(resolved(target, position));
    }
    out
}

#[derive(Debug, Clone, Copy)]
struct Cluster {
    start: usize,
    len: usize,
    ideal_sum: f64,
    top: f64,
}

impl Cluster {
    fn bottom(&self, gap: f64) -> f64 {
        self.top + (self.len - 1) as f64 * gap
    }

    fn merge(self, next: Cluster, gap: f64) -> Cluster {
        let len = self.len + next.len;
        let ideal_sum = self.ideal_sum + next.ideal_sum;
        Cluster {
            start: self.start,
            len,
            ideal_sum,
            top: ideal_sum / len as f64 - (len - 1) as f64 * gap / 2.0,
        }
    }
}

/// Like [`resolve_collisions`], but a run of colliding labels spreads both up
/// and down around the mean of its ideal positions. Same precondition.
pub fn resolve_collisions_symmetric(
    targets: &[LabelTarget],
    min_distance: f64,
) -> Vec<ResolvedLabel> {
    if min_distance.is_nan() || min_distance <= 0.0 {
        return resolve_collisions(targets, min_distance);
    }

    let mut clusters: Vec<Cluster> = Vec::new();
    for (i, target) in targets.iter().enumerate() {
        let mut cluster = Cluster {
            start: i,
            len: 1,
            ideal_sum: target.ideal_position,
            top: target.ideal_position,
        };
        while let Some(prev) =
            clusters.pop_if(|p| cluster.top - p.bottom(min_distance) < min_distance)
        {
            cluster = prev.merge(cluster, min_distance);
        }
        clusters.push(cluster);
    }

    let mut out = Vec::with_capacity(targets.len());
    for c in &clusters {
        for k in 0..c.len {
            out.push(resolved(&targets[c.start + k], c.top + k as f64 * min_distance));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(positions: &[f64]) -> Vec<LabelTarget> {
        positions
            .iter()
            .enumerate()
            .map(|(i, &p)| LabelTarget::new(format!("s{i}"), p, format!("Series {i}")))
            .collect()
    }

    fn finals(labels: &[ResolvedLabel]) -> Vec<f64> {
        labels.iter().map(|l| l.final_position).collect()
    }

    #[test]
    fn forward_pass_pushes_down() {
        let got = resolve_collisions(&targets(&[100.0, 105.0, 108.0]), 16.0);
        assert_eq!(finals(&got), vec![100.0, 116.0, 132.0]);
        assert_eq!(got[2].key, "s2");
        assert_eq!(got[2].display_text, "Series 2");
    }

    #[test]
    fn well_separated_labels_stay_put() {
        let got = resolve_collisions(&targets(&[10.0, 40.0, 90.0]), 16.0);
        assert_eq!(finals(&got), vec![10.0, 40.0, 90.0]);
    }

    #[test]
    fn non_positive_distance_is_pass_through() {
        let t = targets(&[5.0, 5.0, 6.0]);
        assert_eq!(finals(&resolve_collisions(&t, 0.0)), vec![5.0, 5.0, 6.0]);
        assert_eq!(finals(&resolve_collisions(&t, -3.0)), vec![5.0, 5.0, 6.0]);
        assert_eq!(finals(&resolve_collisions_symmetric(&t, f64::NAN)), vec![5.0, 5.0, 6.0]);
    }

    #[test]
    fn empty_input() {
        assert!(resolve_collisions(&[], 16.0).is_empty());
        assert!(resolve_collisions_symmetric(&[], 16.0).is_empty());
    }

    #[test]
    fn symmetric_centers_a_collision_run() {
        let got = resolve_collisions_symmetric(&targets(&[100.0, 100.0, 100.0]), 10.0);
        assert_eq!(finals(&got), vec![90.0, 100.0, 110.0]);

        // Second run collides with the first after it grows and they merge.
        let got = resolve_collisions_symmetric(&targets(&[0.0, 0.0, 14.0, 14.0]), 10.0);
        assert_eq!(finals(&got), vec![-8.0, 2.0, 12.0, 22.0]);
    }
}
