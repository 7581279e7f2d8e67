use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread::{self, JoinHandle};

use cr_app::{AppError, AppResult, ServiceResponse, SimulationClient, SimulationRequest};

/// Runs one remote simulation call off the UI thread.
pub struct RunWorker {
    result_rx: Receiver<AppResult<ServiceResponse>>,
    _handle: JoinHandle<()>,
}

impl RunWorker {
    pub fn start(client: Arc<dyn SimulationClient>, request: SimulationRequest) -> Self {
        let (tx, rx) = channel();

        let handle = thread::spawn(move || {
            let outcome = client.simulate(&request);
            let _ = tx.send(outcome);
        });

        Self {
            result_rx: rx,
            _handle: handle,
        }
    }

    /// `None` while the call is still in flight.
    pub fn poll(&self) -> Option<AppResult<ServiceResponse>> {
        match self.result_rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(AppError::Transport(
                "Simulation worker stopped unexpectedly".to_string(),
            ))),
        }
    }
}
