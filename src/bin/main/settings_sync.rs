use flicker_core::settings::{PreferencesStore, ReaderPreferences};
use log::{debug, warn};

use super::SETTINGS_SAVE_DEBOUNCE_MS;

pub(super) struct SettingsSyncState {
    last_saved: ReaderPreferences,
    pending: Option<(ReaderPreferences, u64)>,
}

impl SettingsSyncState {
    pub(super) fn new(initial: ReaderPreferences) -> Self {
        Self {
            last_saved: initial,
            pending: None,
        }
    }

    pub(super) fn track_current(&mut self, current: ReaderPreferences, now_ms: u64) {
        if current == self.last_saved {
            self.pending = None;
            return;
        }

        match self.pending.as_mut() {
            Some((pending, changed_at_ms)) => {
                if *pending != current {
                    *pending = current;
                    *changed_at_ms = now_ms;
                }
            }
            None => {
                self.pending = Some((current, now_ms));
            }
        }
    }

    pub(super) fn due_at_ms(&self) -> Option<u64> {
        self.pending
            .map(|(_, changed_at_ms)| changed_at_ms.saturating_add(SETTINGS_SAVE_DEBOUNCE_MS))
    }

    pub(super) fn flush_if_due<S>(&mut self, store: &mut S, now_ms: u64)
    where
        S: PreferencesStore,
    {
        let Some((_, changed_at_ms)) = self.pending else {
            return;
        };

        if now_ms.saturating_sub(changed_at_ms) < SETTINGS_SAVE_DEBOUNCE_MS {
            return;
        }

        self.flush(store, now_ms);
    }

    /// Saves whatever is pending regardless of the debounce.
    pub(super) fn flush<S>(&mut self, store: &mut S, now_ms: u64)
    where
        S: PreferencesStore,
    {
        let Some((candidate, _)) = self.pending else {
            return;
        };

        if store.save(&candidate).is_ok() {
            debug!("settings: saved wpm={}", candidate.wpm());
            self.last_saved = candidate;
            self.pending = None;
        } else {
            // Keep pending changes and retry after another debounce window.
            warn!("settings: save failed, retrying later");
            self.pending = Some((candidate, now_ms));
        }
    }
}
