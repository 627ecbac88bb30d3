//! Testimonial carousel: cyclic slide index and its autoplay timer.

use crate::dom::Document;
use crate::{Error, Result};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const CONTAINER: &str = ".carousel-container";
pub const SLIDE: &str = ".carousel-slide";
pub const INDICATOR: &str = ".indicator";
pub const ACTIVE: &str = "active";

/// Index over a fixed number of slides, `0 <= index < total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    total: usize,
}

impl Carousel {
    /// A carousel positioned on the first slide; `None` when there are no slides
    pub fn new(total: usize) -> Option<Self> {
        (total > 0).then_some(Self { index: 0, total })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Move by `step` slides, wrapping at both ends
    pub fn advance(&mut self, step: isize) -> usize {
        let total = self.total as isize;
        self.index = (self.index as isize + step).rem_euclid(total) as usize;
        self.index
    }

    /// Jump to slide `n`, counted from 1
    pub fn go_to(&mut self, n: usize) -> Result<usize> {
        if n == 0 || n > self.total {
            return Err(Error::SlideOutOfRange {
                index: n,
                total: self.total,
            });
        }
        self.index = n - 1;
        Ok(self.index)
    }

    /// Mark the current slide and indicator active and clear every other one
    pub fn apply(&self, doc: &mut Document) -> Result<()> {
        for selector in [SLIDE, INDICATOR] {
            for (i, node) in doc.query_all(selector)?.into_iter().enumerate() {
                if i == self.index {
                    doc.add_class(node, ACTIVE);
                } else {
                    doc.remove_class(node, ACTIVE);
                }
            }
        }
        Ok(())
    }
}

/// Recurring autoplay timer. Stopped explicitly or when dropped.
#[derive(Debug)]
pub struct Autoplay {
    handle: JoinHandle<()>,
}

impl Autoplay {
    /// Call `tick` every `period` until it returns `false` or the timer stops
    pub fn start<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                if !tick() {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Autoplay {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn empty_carousel_is_rejected() {
        assert!(Carousel::new(0).is_none());
    }

    #[test]
    fn advance_forward_then_back_is_identity() {
        for total in 1..=7 {
            for start in 0..total {
                let mut c = Carousel::new(total).unwrap();
                c.go_to(start + 1).unwrap();
                c.advance(1);
                c.advance(-1);
                assert_eq!(c.index(), start, "total={} start={}", total, start);
            }
        }
    }

    #[test]
    fn advance_wraps_both_ends() {
        let mut c = Carousel::new(5).unwrap();
        assert_eq!(c.advance(-1), 4);
        assert_eq!(c.advance(1), 0);
        c.go_to(5).unwrap();
        assert_eq!(c.advance(1), 0);
    }

    #[test]
    fn go_to_is_one_based() {
        let mut c = Carousel::new(5).unwrap();
        for n in 1..=5 {
            assert_eq!(c.go_to(n).unwrap(), n - 1);
        }
        assert!(matches!(
            c.go_to(0),
            Err(Error::SlideOutOfRange { index: 0, total: 5 })
        ));
        assert!(c.go_to(6).is_err());
        assert_eq!(c.index(), 4);
    }

    #[test]
    fn apply_marks_exactly_one_pair() {
        let mut doc = Document::parse(
            r#"<div class="carousel-container">
                <div class="carousel-slide active"></div><div class="carousel-slide"></div><div class="carousel-slide"></div>
                <span class="indicator active"></span><span class="indicator"></span><span class="indicator"></span>
            </div>"#,
        );
        let mut c = Carousel::new(3).unwrap();
        for n in 1..=3 {
            c.go_to(n).unwrap();
            c.apply(&mut doc).unwrap();
            for sel in [SLIDE, INDICATOR] {
                let nodes = doc.query_all(sel).unwrap();
                let active: Vec<usize> = nodes
                    .iter()
                    .enumerate()
                    .filter(|(_, id)| doc.has_class(**id, ACTIVE))
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(active, vec![n - 1]);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_ticks_until_stopped() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let autoplay = Autoplay::start(Duration::from_millis(5000), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        tokio::time::sleep(Duration::from_millis(15_100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        autoplay.stop();
        tokio::time::sleep(Duration::from_millis(20_000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_ends_when_tick_declines() {
        let autoplay = Autoplay::start(Duration::from_millis(10), || false);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(autoplay.is_finished());
    }
}
