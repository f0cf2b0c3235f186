//! Background scene loading.
//!
//! A small pool of loader threads runs scene loads off the render thread.
//! Requests go in over one shared channel and results come back over
//! another; the host polls for results once per frame and feeds them to the
//! viewer. Each load runs on whichever thread is free, so a slow room never
//! holds up the rooms queued after it while another thread is idle.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};
use gallery_core::error::AssetLoadError;
use gallery_core::id::RoomIndex;
use gallery_core::scene::{SceneGeometry, SceneLoader};

/// Upper bound on loader threads, whatever the room count.
pub const MAX_LOADER_THREADS: usize = 8;

/// Commands sent to the loader threads.
#[derive(Debug)]
enum WorkerCommand {
    Load { room: RoomIndex, address: String },
    Stop,
}

/// A finished scene load.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLoaded {
    pub room: RoomIndex,
    pub address: String,
    pub result: Result<SceneGeometry, AssetLoadError>,
}

pub struct SceneWorker {
    command_tx: Sender<WorkerCommand>,
    event_rx: Receiver<SceneLoaded>,
    handles: Vec<JoinHandle<()>>,
}

impl SceneWorker {
    /// Spawn one loader thread per available core, at least two and at most
    /// [`MAX_LOADER_THREADS`].
    pub fn spawn<L>(loader: L) -> std::io::Result<Self>
    where
        L: SceneLoader + Send + Sync + 'static,
    {
        let cores = thread::available_parallelism().map_or(2, NonZeroUsize::get);
        Self::with_threads(loader, cores.max(2))
    }

    /// Spawn `threads` loader threads (clamped to `1..=MAX_LOADER_THREADS`)
    /// sharing `loader`.
    pub fn with_threads<L>(loader: L, threads: usize) -> std::io::Result<Self>
    where
        L: SceneLoader + Send + Sync + 'static,
    {
        let (command_tx, command_rx) = unbounded::<WorkerCommand>();
        let (event_tx, event_rx) = unbounded::<SceneLoaded>();
        let loader = Arc::new(loader);

        let handles = (0..threads.clamp(1, MAX_LOADER_THREADS))
            .map(|n| {
                let loader = Arc::clone(&loader);
                let command_rx = command_rx.clone();
                let event_tx = event_tx.clone();
                thread::Builder::new()
                    .name(format!("gallery-scene-loader-{n}"))
                    .spawn(move || Self::worker_loop(&*loader, command_rx, event_tx))
            })
            .collect::<std::io::Result<Vec<_>>>()?;
        log::debug!("started {} scene loader threads", handles.len());

        Ok(Self {
            command_tx,
            event_rx,
            handles,
        })
    }

    fn worker_loop<L: SceneLoader>(
        loader: &L,
        command_rx: Receiver<WorkerCommand>,
        event_tx: Sender<SceneLoaded>,
    ) {
        while let Ok(command) = command_rx.recv() {
            match command {
                WorkerCommand::Load { room, address } => {
                    log::debug!("loading {room} from {address}");
                    let result = loader.load(&address);
                    if event_tx
                        .send(SceneLoaded {
                            room,
                            address,
                            result,
                        })
                        .is_err()
                    {
                        return;
                    }
                }
                WorkerCommand::Stop => return,
            }
        }
    }

    pub fn threads(&self) -> usize {
        self.handles.len()
    }

    /// Queue a load. Returns `false` if the worker has stopped.
    pub fn submit(&self, room: RoomIndex, address: impl Into<String>) -> bool {
        self.command_tx
            .send(WorkerCommand::Load {
                room,
                address: address.into(),
            })
            .is_ok()
    }

    /// Every result that has arrived since the last poll. Never blocks.
    pub fn poll(&self) -> Vec<SceneLoaded> {
        let mut results = Vec::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(loaded) => results.push(loaded),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("scene loader thread exited");
                    break;
                }
            }
        }
        results
    }

    /// Wait up to `timeout` for the next result.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SceneLoaded> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(loaded) => Some(loaded),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for SceneWorker {
    fn drop(&mut self) {
        // One stop per thread; each thread consumes exactly one.
        for _ in &self.handles {
            let _ = self.command_tx.send(WorkerCommand::Stop);
        }
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}
