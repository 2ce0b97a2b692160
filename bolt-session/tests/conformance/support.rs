//! Shared test doubles for the conformance scenarios.

use std::sync::{Arc, Mutex};

use bolt_session::callbacks::{TransferProgress, VerificationState};
use bolt_session::{EngineCallbacks, SessionError};

#[derive(Default, Clone)]
pub struct RecordingCallbacks {
    pub received_files: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    pub errors: Arc<Mutex<Vec<String>>>,
    pub progress: Arc<Mutex<Vec<TransferProgress>>>,
    pub verification: Arc<Mutex<Vec<VerificationState>>>,
}

impl EngineCallbacks for RecordingCallbacks {
    fn on_receive_file(&mut self, blob: Vec<u8>, filename: &str) {
        self.received_files.lock().unwrap().push((filename.to_string(), blob));
    }

    fn on_error(&mut self, error: &SessionError) {
        self.errors.lock().unwrap().push(error.to_string());
    }

    fn on_progress(&mut self, progress: TransferProgress) {
        self.progress.lock().unwrap().push(progress);
    }

    fn on_verification_state(&mut self, state: VerificationState) {
        self.verification.lock().unwrap().push(state);
    }
}

impl RecordingCallbacks {
    pub fn last_error_contains(&self, needle: &str) -> bool {
        self.errors.lock().unwrap().iter().any(|e| e.contains(needle))
    }
}
