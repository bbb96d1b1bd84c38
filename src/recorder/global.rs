//! Process-wide switch and recorder holder for integrations that cannot
//! thread a recorder handle through, e.g. a developer console.
//!
//! Prefer passing an `Arc<ChangeRecorder>` explicitly where possible.

use super::change_recorder::ChangeRecorder;
use crate::logging;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static DEBUG_MODE: AtomicBool = AtomicBool::new(false);
static RECORDER: OnceLock<Arc<ChangeRecorder>> = OnceLock::new();

/// Enable or disable debug capture for state hooks that use the global recorder
pub fn set_debug_mode(enabled: bool) {
    DEBUG_MODE.store(enabled, Ordering::Release);
}

pub fn debug_mode() -> bool {
    DEBUG_MODE.load(Ordering::Acquire)
}

/// Register the process-wide recorder and start capturing. The first
/// install wins; later calls drop their recorder and return the existing one.
pub fn install(recorder: ChangeRecorder) -> Arc<ChangeRecorder> {
    let mut installed_now = false;
    let recorder = RECORDER.get_or_init(|| {
        installed_now = true;
        Arc::new(recorder)
    });

    if installed_now {
        recorder.start_capture();
        logging::log_recorder_installed();
    }
    Arc::clone(recorder)
}

/// The installed recorder, if any
pub fn recorder() -> Option<Arc<ChangeRecorder>> {
    RECORDER.get().cloned()
}

/// The installed recorder, but only while debug mode is on
pub fn active_recorder() -> Option<Arc<ChangeRecorder>> {
    if debug_mode() {
        recorder()
    } else {
        None
    }
}
