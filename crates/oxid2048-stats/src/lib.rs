//! Statistics used to summarize training and evaluation runs.
//!
//! - [`descriptive`]: Min, max, mean, median, standard deviation and percentiles
//!   of a finished batch of episode results
//! - [`window`]: Bounded rolling window of recent episode scores, for progress
//!   reports while a run is still going
//!
//! # Examples
//!
//! ```
//! use oxid2048_stats::descriptive::DescriptiveStats;
//!
//! let scores = [1024.0, 2048.0, 512.0];
//! let stats = DescriptiveStats::new(scores).unwrap();
//! assert_eq!(stats.max, 2048.0);
//! assert_eq!(stats.median, 1024.0);
//! ```
//!
//! ```
//! use oxid2048_stats::window::ScoreWindow;
//!
//! let mut window = ScoreWindow::new(3);
//! for score in [10.0, 20.0, 30.0, 40.0] {
//!     window.push(score);
//! }
//! assert_eq!(window.len(), 3);
//! assert_eq!(window.mean_of_last(2), Some(35.0));
//! ```

pub mod descriptive;
pub mod window;
