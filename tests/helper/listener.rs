use std::sync::Mutex;

use modcheck::registry::events::RegistryListener;
use modcheck::version::types::UpdateVerdict;

/// Records every event it receives
#[derive(Default)]
pub struct RecordingListener {
    pub registered: Mutex<Vec<(String, String)>>,
    pub updates: Mutex<Vec<UpdateVerdict>>,
}

impl RecordingListener {
    pub fn registered(&self) -> Vec<(String, String)> {
        self.registered.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<UpdateVerdict> {
        self.updates.lock().unwrap().clone()
    }
}

impl RegistryListener for RecordingListener {
    fn on_registered(&self, id: &str, version: &str) {
        self.registered
            .lock()
            .unwrap()
            .push((id.to_string(), version.to_string()));
    }

    fn on_update_available(&self, _id: &str, verdict: &UpdateVerdict) {
        self.updates.lock().unwrap().push(verdict.clone());
    }
}
