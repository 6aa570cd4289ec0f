use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::config::defaults::{default_max_workers, default_min_workers};

/// Samples a worker's normalized CPU usage (0.0-1.0). Abstracted behind a
/// trait so the auto-scaling algorithm can be exercised with a deterministic
/// fake in tests; [`SysinfoCpuSampler`] is the production implementation.
pub trait CpuSampler: Send + Sync {
    fn sample(&self, worker_id: u64) -> f64;
}

/// Real sampler backed by `sysinfo`. There is no mediasoup worker process to
/// attach to in this facade, so every logical worker reports the CPU usage
/// of the orchestrator's own process; this is a deliberate simplification
/// (see the design notes) rather than an attempt at per-worker attribution.
pub struct SysinfoCpuSampler {
    system: std::sync::Mutex<sysinfo::System>,
    pid: sysinfo::Pid,
}

impl SysinfoCpuSampler {
    pub fn new() -> Self {
        let pid = sysinfo::Pid::from_u32(std::process::id());
        let mut system = sysinfo::System::new();
        system.refresh_processes(sysinfo::ProcessesToUpdate::All, true);
        Self {
            system: std::sync::Mutex::new(system),
            pid,
        }
    }
}

impl Default for SysinfoCpuSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSampler for SysinfoCpuSampler {
    fn sample(&self, _worker_id: u64) -> f64 {
        let mut system = self.system.lock().unwrap_or_else(|e| e.into_inner());
        system.refresh_processes(sysinfo::ProcessesToUpdate::All, true);
        system
            .process(self.pid)
            .map(|p| f64::from(p.cpu_usage()) / 100.0)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct Worker {
    pub id: u64,
    pub alive: bool,
}

/// Configuration bounds for the worker pool's auto-scaler.
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub min_workers: usize,
    pub max_workers: usize,
    pub scale_up_cpu: f64,
    pub scale_down_cpu: f64,
    pub death_grace: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let max_workers = default_max_workers();
        Self {
            min_workers: default_min_workers(),
            max_workers,
            scale_up_cpu: 0.75,
            scale_down_cpu: 0.30,
            death_grace: Duration::from_secs(5),
        }
    }
}

/// Owns the SFU's logical worker set. Workers are assigned routers
/// round-robin and auto-scale between `min_workers` and `max_workers` in
/// response to CPU pressure, triggered imperatively by the caller rather
/// than on a timer.
pub struct WorkerPool {
    workers: RwLock<Vec<Worker>>,
    next_worker_index: AtomicU64,
    next_id: AtomicU64,
    config: PoolConfig,
    sampler: Arc<dyn CpuSampler>,
    is_scaling: tokio::sync::Mutex<()>,
}

impl WorkerPool {
    /// Creates `config.min_workers` workers in parallel, failing only if
    /// every single one fails (there is currently no failure path for an
    /// in-process logical worker, so this always succeeds, but the shape
    /// mirrors a pool that supervises real child processes).
    pub async fn startup(config: PoolConfig, sampler: Arc<dyn CpuSampler>) -> Self {
        let pool = Self {
            workers: RwLock::new(Vec::new()),
            next_worker_index: AtomicU64::new(0),
            next_id: AtomicU64::new(0),
            config,
            sampler,
            is_scaling: tokio::sync::Mutex::new(()),
        };
        let mut handles = Vec::with_capacity(config.min_workers);
        for _ in 0..config.min_workers {
            handles.push(pool.spawn_worker());
        }
        let results = futures_util::future::join_all(handles).await;
        let alive = results.iter().filter(|r| r.is_some()).count();
        if alive == 0 {
            error!("all initial media workers failed to start");
        }
        pool
    }

    async fn spawn_worker(&self) -> Option<u64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.workers.write().await.push(Worker { id, alive: true });
        info!(worker_id = id, "media worker started");
        Some(id)
    }

    /// Assigns the next router to a worker round-robin, returning its id.
    pub async fn next_worker(&self) -> Option<u64> {
        let workers = self.workers.read().await;
        if workers.is_empty() {
            return None;
        }
        let idx = self.next_worker_index.fetch_add(1, Ordering::SeqCst) as usize % workers.len();
        Some(workers[idx].id)
    }

    pub async fn size(&self) -> usize {
        self.workers.read().await.len()
    }

    /// Simulates a worker dying: removes it, attempts exactly one recovery,
    /// and if the pool is left empty schedules process termination after
    /// `death_grace`.
    pub async fn handle_worker_death(self: &Arc<Self>, worker_id: u64) {
        self.workers.write().await.retain(|w| w.id != worker_id);
        warn!(worker_id, "media worker died, attempting recovery");

        if self.spawn_worker().await.is_none() {
            if self.workers.read().await.is_empty() {
                let grace = self.config.death_grace;
                let pool = Arc::clone(self);
                tokio::spawn(async move {
                    tokio::time::sleep(grace).await;
                    if pool.workers.read().await.is_empty() {
                        error!("media worker pool empty after recovery failure, exiting process");
                        std::process::exit(1);
                    }
                });
            }
        }
    }

    /// Runs the imperative auto-scale pass. Triggered by the caller after
    /// router creation or room closure, never on a timer.
    pub async fn autoscale(&self, active_rooms: usize) {
        if active_rooms == 0 {
            return;
        }
        let Ok(_guard) = self.is_scaling.try_lock() else {
            return;
        };

        let worker_ids: Vec<u64> = self.workers.read().await.iter().map(|w| w.id).collect();
        if worker_ids.is_empty() {
            return;
        }
        let samples: Vec<f64> = worker_ids.iter().map(|id| self.sampler.sample(*id)).collect();
        let max_cpu = samples.iter().copied().fold(0.0_f64, f64::max);
        let avg_cpu = samples.iter().sum::<f64>() / samples.len() as f64;

        let count = worker_ids.len();
        if max_cpu > self.config.scale_up_cpu && count < self.config.max_workers {
            info!(max_cpu, "scaling media worker pool up");
            self.spawn_worker().await;
        } else if avg_cpu < self.config.scale_down_cpu && count > self.config.min_workers {
            info!(avg_cpu, "scaling media worker pool down");
            let mut workers = self.workers.write().await;
            workers.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSampler(f64);
    impl CpuSampler for FixedSampler {
        fn sample(&self, _worker_id: u64) -> f64 {
            self.0
        }
    }

    #[tokio::test]
    async fn startup_creates_min_workers() {
        let pool = WorkerPool::startup(PoolConfig::default(), Arc::new(FixedSampler(0.0))).await;
        assert_eq!(pool.size().await, 1);
    }

    #[tokio::test]
    async fn autoscale_up_under_high_cpu() {
        let config = PoolConfig {
            min_workers: 1,
            max_workers: 3,
            ..Default::default()
        };
        let pool = WorkerPool::startup(config, Arc::new(FixedSampler(0.9))).await;
        pool.autoscale(1).await;
        assert_eq!(pool.size().await, 2);
    }

    #[tokio::test]
    async fn autoscale_never_exceeds_max_workers() {
        let config = PoolConfig {
            min_workers: 3,
            max_workers: 3,
            ..Default::default()
        };
        let pool = WorkerPool::startup(config, Arc::new(FixedSampler(0.9))).await;
        pool.autoscale(1).await;
        assert_eq!(pool.size().await, 3);
    }

    #[tokio::test]
    async fn autoscale_down_under_low_cpu_respects_min() {
        let config = PoolConfig {
            min_workers: 1,
            max_workers: 3,
            ..Default::default()
        };
        let pool = WorkerPool::startup(config, Arc::new(FixedSampler(0.01))).await;
        pool.autoscale(1).await;
        assert_eq!(pool.size().await, 1);
    }

    #[tokio::test]
    async fn autoscale_is_noop_with_no_rooms() {
        let pool = WorkerPool::startup(PoolConfig::default(), Arc::new(FixedSampler(0.99))).await;
        pool.autoscale(0).await;
        assert_eq!(pool.size().await, 1);
    }

    #[tokio::test]
    async fn worker_death_recovers_one_replacement() {
        let pool = Arc::new(
            WorkerPool::startup(PoolConfig::default(), Arc::new(FixedSampler(0.0))).await,
        );
        let id = pool.workers.read().await[0].id;
        pool.handle_worker_death(id).await;
        assert_eq!(pool.size().await, 1);
    }
}
