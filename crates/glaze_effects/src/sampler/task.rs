//! Background sampling task
//!
//! The render path publishes its latest glass layer into a `watch` channel;
//! the task wakes once per interval, reads back the newest layer on the
//! blocking pool and publishes the luminance through a second `watch`
//! channel. Both channels hold only the latest value, so a slow measurement
//! simply skips stale layers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::pixmap::Pixmap;

use super::{measure, ContinuousSampler, ImpulseSampler, SamplerPolicy};

/// Animation tick of the continuous sampler and lower bound of every wait
const FRAME: Duration = Duration::from_millis(16);

enum Sampler {
    Impulse(ImpulseSampler),
    Continuous(ContinuousSampler),
}

impl Sampler {
    fn new(policy: SamplerPolicy) -> Self {
        match policy {
            SamplerPolicy::Impulse(config) => Sampler::Impulse(ImpulseSampler::new(config)),
            SamplerPolicy::Continuous(config) => {
                Sampler::Continuous(ContinuousSampler::new(config))
            }
        }
    }

    fn impulse_mut(&mut self) -> &mut ImpulseSampler {
        match self {
            Sampler::Impulse(s) => s,
            Sampler::Continuous(s) => s.impulse_mut(),
        }
    }
}

/// Owner of a running sampler task
///
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub struct SamplerHandle {
    luminance: watch::Receiver<f32>,
    task: JoinHandle<()>,
}

impl SamplerHandle {
    /// Latest published luminance; never blocks
    pub fn latest(&self) -> f32 {
        *self.luminance.borrow()
    }

    /// A receiver notified on every publish
    pub fn subscribe(&self) -> watch::Receiver<f32> {
        self.luminance.clone()
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a sampler on `handle` reading layers from `layers`
pub fn spawn_sampler(
    policy: SamplerPolicy,
    layers: watch::Receiver<Option<Arc<Pixmap>>>,
    handle: &Handle,
) -> SamplerHandle {
    let (tx, rx) = watch::channel(policy.initial_luminance().clamp(0.0, 1.0));
    let task = handle.spawn(run(policy, layers, tx));
    debug!(?policy, "luminance sampler spawned");
    SamplerHandle {
        luminance: rx,
        task,
    }
}

async fn run(
    policy: SamplerPolicy,
    layers: watch::Receiver<Option<Arc<Pixmap>>>,
    tx: watch::Sender<f32>,
) {
    let mut sampler = Sampler::new(policy);
    let grid = policy.grid();
    let precision = policy.precision();

    loop {
        let wait = sampler.impulse_mut().interval().max(FRAME);
        tokio::time::sleep(wait).await;

        if layers.has_changed().is_err() {
            debug!("layer channel closed, sampler stopping");
            break;
        }
        let Some(layer) = layers.borrow().clone() else {
            continue;
        };
        if layer.is_empty() || !sampler.impulse_mut().try_begin(Instant::now()) {
            continue;
        }

        let measured = match tokio::task::spawn_blocking(move || measure(&layer, grid, precision))
            .await
        {
            Ok(measured) => measured,
            Err(err) => {
                warn!(%err, "luminance readback failed");
                None
            }
        };

        match &mut sampler {
            Sampler::Impulse(s) => {
                let value = s.publish(measured);
                tx.send_if_modified(|current| replace(current, value));
            }
            Sampler::Continuous(s) => {
                s.publish(measured);
                while s.is_animating() {
                    tokio::time::sleep(FRAME).await;
                    let value = s.step(FRAME);
                    tx.send_if_modified(|current| replace(current, value));
                }
            }
        }
    }
}

fn replace(current: &mut f32, value: f32) -> bool {
    if *current == value {
        false
    } else {
        *current = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::Rgba;
    use crate::sampler::{ContinuousConfig, ImpulseConfig};
    use tokio::time::timeout;

    fn white() -> Option<Arc<Pixmap>> {
        Some(Arc::new(Pixmap::filled(
            16,
            16,
            Rgba::new(1.0, 1.0, 1.0, 1.0),
        )))
    }

    async fn wait_for(rx: &mut watch::Receiver<f32>, target: f32) -> bool {
        timeout(Duration::from_secs(5), async {
            loop {
                if *rx.borrow_and_update() == target {
                    return;
                }
                if rx.changed().await.is_err() {
                    return;
                }
            }
        })
        .await
        .is_ok()
            && *rx.borrow() == target
    }

    #[tokio::test]
    async fn test_impulse_task_publishes() {
        let (_layer_tx, layer_rx) = watch::channel(white());
        let policy = SamplerPolicy::Impulse(ImpulseConfig {
            interval_ms: 20,
            ..Default::default()
        });
        let sampler = spawn_sampler(policy, layer_rx, &Handle::current());
        assert_eq!(sampler.latest(), 0.5);

        let mut rx = sampler.subscribe();
        assert!(wait_for(&mut rx, 1.0).await);
        assert_eq!(sampler.latest(), 1.0);
    }

    #[tokio::test]
    async fn test_continuous_task_reaches_target() {
        let (_layer_tx, layer_rx) = watch::channel(white());
        let policy = SamplerPolicy::Continuous(ContinuousConfig {
            initial_luminance: 0.0,
            duration_ms: 64,
            ..Default::default()
        });
        let sampler = spawn_sampler(policy, layer_rx, &Handle::current());
        let mut rx = sampler.subscribe();
        assert!(wait_for(&mut rx, 1.0).await);
    }

    #[tokio::test]
    async fn test_no_layer_keeps_initial() {
        let (_layer_tx, layer_rx) = watch::channel(None);
        let sampler = spawn_sampler(SamplerPolicy::default(), layer_rx, &Handle::current());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(sampler.latest(), 0.5);
    }

    #[tokio::test]
    async fn test_cancel_stops_task() {
        let (_layer_tx, layer_rx) = watch::channel(white());
        let sampler = spawn_sampler(SamplerPolicy::default(), layer_rx, &Handle::current());
        sampler.cancel();
        let finished = timeout(Duration::from_secs(1), async {
            while !sampler.is_finished() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn test_closed_layer_channel_ends_task() {
        let (layer_tx, layer_rx) = watch::channel(None);
        let sampler = spawn_sampler(SamplerPolicy::default(), layer_rx, &Handle::current());
        drop(layer_tx);
        let finished = timeout(Duration::from_secs(2), async {
            while !sampler.is_finished() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(finished.is_ok());
    }
}
