// Copyright @yucwang 2026

use crate::core::bsdf::ScatterEvent;
use crate::core::config::PhotonMappingConfig;
use crate::core::intersector::Intersector;
use crate::core::light::Light;
use crate::core::photon::{Photon, PhotonBuffer};
use crate::core::rng::LcgRng;
use crate::math::ray::Ray3f;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

const PHOTON_BATCH_SIZE: usize = 4096;

/// How a photon's walk ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PhotonFate {
    Missed,
    Absorbed,
    /// Stopped by Russian roulette after a diffuse hit.
    Terminated,
    BounceLimit,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TraceStats {
    pub emitted: usize,
    pub recorded: usize,
    pub missed: usize,
    pub absorbed: usize,
    pub terminated: usize,
    pub bounce_limit: usize,
}

impl TraceStats {
    fn count(&mut self, fate: PhotonFate) {
        self.emitted += 1;
        match fate {
            PhotonFate::Missed => self.missed += 1,
            PhotonFate::Absorbed => self.absorbed += 1,
            PhotonFate::Terminated => self.terminated += 1,
            PhotonFate::BounceLimit => self.bounce_limit += 1,
        }
    }

    fn merge(&mut self, other: &TraceStats) {
        self.emitted += other.emitted;
        self.recorded += other.recorded;
        self.missed += other.missed;
        self.absorbed += other.absorbed;
        self.terminated += other.terminated;
        self.bounce_limit += other.bounce_limit;
    }
}

/// First pass: shoots each light's photon quota through the scene and
/// records every diffuse hit.
pub struct PhotonTracer {
    max_bounces: u32,
    capacity: usize,
    seed: u64,
}

impl PhotonTracer {
    pub fn new(max_bounces: u32, capacity: usize, seed: u64) -> Self {
        Self { max_bounces, capacity, seed }
    }

    pub fn from_config(config: &PhotonMappingConfig) -> Self {
        Self::new(config.max_photon_bounces, config.photon_capacity, config.seed)
    }

    /// Trace all photons. Lights must already carry their quotas. The
    /// returned buffer holds the first `capacity` recorded photons in
    /// emission order regardless of how the batches were scheduled.
    pub fn trace<I: Intersector>(&self, oracle: &I, lights: &[Light]) -> (PhotonBuffer, TraceStats) {
        let mut tasks: Vec<(usize, usize, usize)> = Vec::new();
        for (light_idx, light) in lights.iter().enumerate() {
            let mut start = 0;
            while start < light.num_photons() {
                let end = (start + PHOTON_BATCH_SIZE).min(light.num_photons());
                tasks.push((light_idx, start, end));
                start = end;
            }
        }

        let progress = ProgressBar::new(tasks.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.yellow/blue} {pos}/{len} photon batches")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_task = AtomicUsize::new(0);
        // Room left after the batches merged so far. Batches merge in
        // order, so a batch starting now can never keep more than this.
        let room_left = AtomicUsize::new(self.capacity);
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(tasks.len().max(1));
        let (tx, rx) = mpsc::channel::<(usize, Vec<Photon>, TraceStats)>();
        let mut pending: Vec<Option<(Vec<Photon>, TraceStats)>> = vec![None; tasks.len()];
        let mut next_merge = 0;
        let mut buffer = PhotonBuffer::with_capacity(self.capacity);
        let mut stats = TraceStats::default();

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let tx = tx.clone();
                let next_task = &next_task;
                let room_left = &room_left;
                let tasks = &tasks;
                scope.spawn(move || {
                    loop {
                        let task_idx = next_task.fetch_add(1, Ordering::Relaxed);
                        if task_idx >= tasks.len() {
                            break;
                        }

                        let (light_idx, start, end) = tasks[task_idx];
                        let light = &lights[light_idx];
                        let room = room_left.load(Ordering::Acquire);
                        let mut photons = Vec::new();
                        let mut batch_stats = TraceStats::default();
                        for photon_idx in start..end {
                            let mut rng = LcgRng::for_task(self.seed, light_idx as u64, photon_idx as u64);
                            let fate = self.trace_photon(oracle, light, &mut rng, &mut |photon| {
                                batch_stats.recorded += 1;
                                if photons.len() < room {
                                    photons.push(photon);
                                }
                            });
                            batch_stats.count(fate);
                        }
                        if tx.send((task_idx, photons, batch_stats)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..tasks.len() {
                let (task_idx, photons, batch_stats) = match rx.recv() {
                    Ok(batch) => batch,
                    Err(_) => break,
                };
                pending[task_idx] = Some((photons, batch_stats));
                while let Some((photons, batch_stats)) = pending.get_mut(next_merge).and_then(Option::take) {
                    buffer.add_dropped(batch_stats.recorded - photons.len());
                    buffer.extend(photons);
                    stats.merge(&batch_stats);
                    next_merge += 1;
                }
                room_left.store(buffer.room(), Ordering::Release);
                progress.inc(1);
            }
        });
        progress.finish_and_clear();

        log::info!("Traced {} photons: {} recorded, {} stored, {} missed, {} absorbed, {} terminated, {} hit the bounce limit.",
                   stats.emitted, stats.recorded, buffer.len(), stats.missed,
                   stats.absorbed, stats.terminated, stats.bounce_limit);
        if buffer.dropped() > 0 {
            log::warn!("Photon buffer full: dropped {} of {} recorded photons.", buffer.dropped(), stats.recorded);
        }

        (buffer, stats)
    }

    /// Walk one photon, handing a record to `record` at every diffuse hit.
    ///
    /// After a diffuse hit the photon survives with the material's
    /// `survival_probability` p, and a survivor's power is scaled by
    /// `albedo * diffuse / p` so the expected power leaving the surface is
    /// unchanged.
    pub fn trace_photon<I, F>(&self, oracle: &I, light: &Light, rng: &mut LcgRng, record: &mut F) -> PhotonFate
    where
        I: Intersector,
        F: FnMut(Photon),
    {
        let mut ray = light.sample_emission(rng);
        let mut power = light.photon_power();

        for _ in 0..self.max_bounces {
            let hit = match oracle.intersect(&ray) {
                Some(hit) => hit,
                None => return PhotonFate::Missed,
            };

            let scatter = hit.material.scatter(&ray.dir(), &hit.normal, rng);
            match scatter.event {
                ScatterEvent::ReflectedDiffuse => {
                    record(Photon::new(hit.p, ray.dir(), power));
                    let survival = hit.material.survival_probability();
                    if rng.next_f32() >= survival {
                        return PhotonFate::Terminated;
                    }
                    power = power * hit.material.diffuse_brdf() / survival;
                }
                ScatterEvent::ReflectedSpecular | ScatterEvent::Refraction => {
                    power *= scatter.attenuation;
                }
                ScatterEvent::Absorbed | ScatterEvent::Missed => return PhotonFate::Absorbed,
            }

            if power.is_black() {
                return PhotonFate::Absorbed;
            }
            ray = Ray3f::spawn(hit.p, hit.normal, scatter.direction);
        }

        PhotonFate::BounceLimit
    }
}
