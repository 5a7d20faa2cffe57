use std::sync::{Mutex, OnceLock};
use sysinfo::{MemoryRefreshKind, RefreshKind, System};

/// Point-in-time memory reading attached to progress updates and the run
/// summary.
#[derive(Debug, Clone, Copy)]
pub struct MemorySnapshot {
    pub used_mb: u64,
    pub avail_mb: u64,
}

static SYS: OnceLock<Mutex<System>> = OnceLock::new();

pub fn memory_snapshot() -> MemorySnapshot {
    let lock = SYS.get_or_init(|| {
        Mutex::new(System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        ))
    });
    let mut sys = lock.lock().expect("sysinfo lock poisoned");
    sys.refresh_memory();
    // sysinfo reports bytes
    let total_mb = sys.total_memory() / (1024 * 1024);
    let avail_mb = sys.available_memory() / (1024 * 1024);
    MemorySnapshot {
        used_mb: total_mb.saturating_sub(avail_mb),
        avail_mb,
    }
}
