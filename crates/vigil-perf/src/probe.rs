//! # Resource Probes
//!
//! The memory and runtime dimensions read the host through a
//! [`ResourceProbe`]. [`SystemProbe`] samples the current process with
//! `sysinfo`; [`ScriptedProbe`] replays fixed samples so that scoring is
//! reproducible.

use std::collections::VecDeque;

use parking_lot::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::warn;

/// One observation of the host process.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResourceSample {
    /// CPU usage percentage since the previous refresh.
    pub cpu_percent: f64,
    /// Resident memory in bytes.
    pub resident_bytes: u64,
}

/// Source of process resource samples.
pub trait ResourceProbe: Send + Sync {
    /// Take a sample. `None` when the host cannot be read.
    fn sample(&self) -> Option<ResourceSample>;
}

/// Samples the current process through `sysinfo`.
pub struct SystemProbe {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl SystemProbe {
    /// Probe for the calling process.
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(reason) => {
                warn!(%reason, "current pid unavailable; resource sampling disabled");
                None
            }
        };
        Self {
            pid,
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemProbe").field("pid", &self.pid).finish_non_exhaustive()
    }
}

impl ResourceProbe for SystemProbe {
    fn sample(&self) -> Option<ResourceSample> {
        let pid = self.pid?;
        let mut system = self.system.lock();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );
        let process = system.process(pid)?;
        Some(ResourceSample {
            cpu_percent: f64::from(process.cpu_usage()),
            resident_bytes: process.memory(),
        })
    }
}

/// Replays a fixed sequence of samples; the last one repeats forever.
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    samples: Mutex<VecDeque<ResourceSample>>,
}

impl ScriptedProbe {
    /// Replay `samples` in order.
    pub fn new(samples: impl IntoIterator<Item = ResourceSample>) -> Self {
        Self {
            samples: Mutex::new(samples.into_iter().collect()),
        }
    }

    /// Always report `sample`.
    pub fn constant(sample: ResourceSample) -> Self {
        Self::new([sample])
    }
}

impl ResourceProbe for ScriptedProbe {
    fn sample(&self) -> Option<ResourceSample> {
        let mut samples = self.samples.lock();
        if samples.len() > 1 {
            samples.pop_front()
        } else {
            samples.front().copied()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(bytes: u64) -> ResourceSample {
        ResourceSample {
            cpu_percent: 10.0,
            resident_bytes: bytes,
        }
    }

    #[test]
    fn scripted_probe_replays_then_repeats() {
        let probe = ScriptedProbe::new([at(1), at(2)]);
        assert_eq!(probe.sample(), Some(at(1)));
        assert_eq!(probe.sample(), Some(at(2)));
        assert_eq!(probe.sample(), Some(at(2)));
    }

    #[test]
    fn empty_script_yields_nothing() {
        assert_eq!(ScriptedProbe::default().sample(), None);
    }

    #[test]
    fn system_probe_reads_this_process() {
        let sample = SystemProbe::new().sample();
        if let Some(sample) = sample {
            assert!(sample.resident_bytes > 0);
            assert!(sample.cpu_percent >= 0.0);
        }
    }
}
