use std::pin::Pin;

use tokio::time::{Duration, Sleep};

/// Single-owner one-shot delay for the scheduler loop.
///
/// At most one deadline is armed at a time: arming again drops the previous
/// deadline, which is what keeps the engine from ever having two pending
/// advances in flight.
#[derive(Default)]
pub struct OneShotTimer {
    sleep: Option<Pin<Box<Sleep>>>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self { sleep: None }
    }

    /// Arm for `delay`, cancelling any previously armed deadline.
    pub fn arm(&mut self, delay: Duration) {
        self.sleep = Some(Box::pin(tokio::time::sleep(delay)));
    }

    pub fn cancel(&mut self) {
        self.sleep = None;
    }

    pub fn is_armed(&self) -> bool {
        self.sleep.is_some()
    }

    /// Wait for the armed deadline, disarming once it fires. Pends forever
    /// while nothing is armed, so it is safe to park in a `select!` arm.
    pub async fn fired(&mut self) {
        match self.sleep.as_mut() {
            Some(sleep) => {
                sleep.await;
                self.sleep = None;
            }
            None => std::future::pending().await,
        }
    }
}
