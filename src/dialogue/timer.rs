use std::future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{sleep, Sleep};

/// Identifies one scheduled return to the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetToken(pub(super) u64);

/// Deferred "back to the main menu" timer for the chat loop.
///
/// The timer follows whatever token the session currently has pending. A new
/// token re-arms it with the full delay; no token disarms it. The sleep lives
/// inside the timer, so dropping an `expired()` future inside `select!` loses
/// no progress.
pub struct ResetTimer {
    delay: Duration,
    armed: Option<(ResetToken, Pin<Box<Sleep>>)>,
}

impl ResetTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, armed: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Align the timer with the session's pending token
    pub fn sync(&mut self, pending: Option<ResetToken>) {
        let current = self.armed.as_ref().map(|(token, _)| *token);
        if current == pending {
            return;
        }
        self.armed = pending.map(|token| {
            tracing::debug!(delay_ms = self.delay.as_millis() as u64, "Reset timer armed");
            (token, Box::pin(sleep(self.delay)))
        });
    }

    /// Resolves with the armed token once its delay has elapsed. Never
    /// resolves while disarmed.
    pub async fn expired(&mut self) -> ResetToken {
        let token = match self.armed.as_mut() {
            Some((token, deadline)) => {
                deadline.as_mut().await;
                *token
            }
            None => return future::pending().await,
        };
        self.armed = None;
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Instant};

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let mut timer = ResetTimer::new(Duration::from_millis(800));
        timer.sync(Some(ResetToken(1)));
        let start = Instant::now();
        assert_eq!(timer.expired().await, ResetToken(1));
        assert!(start.elapsed() >= Duration::from_millis(800));
        assert!(!timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_timer_never_fires() {
        let mut timer = ResetTimer::new(Duration::from_millis(10));
        timer.sync(Some(ResetToken(1)));
        timer.sync(None);
        assert!(timeout(Duration::from_secs(5), timer.expired()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn same_token_keeps_original_deadline() {
        let mut timer = ResetTimer::new(Duration::from_millis(800));
        timer.sync(Some(ResetToken(7)));
        tokio::time::advance(Duration::from_millis(500)).await;
        timer.sync(Some(ResetToken(7)));
        let start = Instant::now();
        timer.expired().await;
        assert!(start.elapsed() <= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn new_token_rearms() {
        let mut timer = ResetTimer::new(Duration::from_millis(800));
        timer.sync(Some(ResetToken(1)));
        tokio::time::advance(Duration::from_millis(500)).await;
        timer.sync(Some(ResetToken(2)));
        let start = Instant::now();
        assert_eq!(timer.expired().await, ResetToken(2));
        assert!(start.elapsed() >= Duration::from_millis(800));
    }
}
