use std::collections::VecDeque;

/// Bounded window of the most recent episode scores.
///
/// Pushing beyond capacity drops the oldest score.
#[derive(Debug, Clone)]
pub struct ScoreWindow {
    scores: VecDeque<f64>,
    capacity: usize,
}

impl ScoreWindow {
    /// Creates an empty window holding at most `capacity` scores.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be positive");
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, score: f64) {
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Mean of the `n` most recent scores (fewer if the window holds fewer).
    ///
    /// Returns `None` if the window is empty or `n` is zero.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean_of_last(&self, n: usize) -> Option<f64> {
        let take = n.min(self.scores.len());
        if take == 0 {
            return None;
        }
        let sum = self.scores.iter().rev().take(take).sum::<f64>();
        Some(sum / take as f64)
    }

    /// Mean of every score in the window.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        self.mean_of_last(self.scores.len())
    }

    /// Largest score in the window.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.scores.iter().copied().max_by(f64::total_cmp)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.scores.iter().copied()
    }
}
