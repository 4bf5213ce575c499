use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub const HERO_IMAGES: [&str; 3] = ["/hero1.jpg", "/hero2.jpg", "/hero3.jpg"];
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

/// Index into a fixed ring of hero images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    current: usize,
    total: usize,
}

impl Carousel {
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total: total.max(1),
        }
    }

    pub fn hero() -> Self {
        Self::new(HERO_IMAGES.len())
    }

    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % self.total;
        self.current
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTick;

/// Background ticker driving a [`Carousel`]. Aborted on `cancel` or drop.
pub struct CarouselTimer {
    handle: JoinHandle<()>,
}

impl CarouselTimer {
    pub fn spawn(period: Duration, tx: mpsc::UnboundedSender<CarouselTick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(CarouselTick).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for CarouselTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
