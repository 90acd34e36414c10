//! Serialized access to process environment variables in tests.

use std::sync::{Mutex, MutexGuard};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Sets or removes variables while held and restores the previous values on
/// drop. Only one guard exists at a time.
pub(crate) struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// `Some` sets the variable, `None` removes it.
    pub(crate) fn new(vars: &[(&'static str, Option<&str>)]) -> Self {
        let lock = ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let saved = vars
            .iter()
            .map(|(key, _)| (*key, std::env::var(key).ok()))
            .collect();

        for (key, value) in vars {
            set(key, *value);
        }

        Self { saved, _lock: lock }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            set(key, value.as_deref());
        }
    }
}

fn set(key: &str, value: Option<&str>) {
    // Safety: every test that touches the environment holds ENV_MUTEX.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}
