//! # Pool de workers
//! src/server/pool.rs
//!
//! Pool fijo de threads que atienden conexiones de principio a fin.
//!
//! El acceptor entrega cada conexión por un canal de capacidad cero: el
//! `send` solo retorna cuando un worker libre la recibe. Con todos los
//! workers ocupados el acceptor se queda bloqueado y las conexiones nuevas
//! esperan en el backlog del sistema operativo; no hay cola en la
//! aplicación.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use thiserror::Error;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// El pool ya no acepta trabajos
#[derive(Debug, Error)]
#[error("worker pool is shut down")]
pub struct PoolClosed;

/// Pool de tamaño fijo
pub struct WorkerPool {
    workers: Vec<Worker>,
    sender: Option<SyncSender<Job>>,
}

struct Worker {
    id: usize,
    thread: Option<JoinHandle<()>>,
}

impl WorkerPool {
    /// Crea el pool y arranca `size` threads
    pub fn new(size: usize) -> io::Result<Self> {
        if size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "worker pool needs at least one worker",
            ));
        }

        let (sender, receiver) = mpsc::sync_channel::<Job>(0);
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size)
            .map(|id| Worker::spawn(id, Arc::clone(&receiver)))
            .collect::<io::Result<Vec<_>>>()?;

        Ok(Self {
            workers,
            sender: Some(sender),
        })
    }

    /// Entrega un trabajo al próximo worker libre
    ///
    /// Bloquea mientras todos los workers estén ocupados.
    pub fn execute<F>(&self, job: F) -> Result<(), PoolClosed>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(PoolClosed)?;
        sender.send(Box::new(job)).map_err(|_| PoolClosed)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Cerrar el canal: cada worker sale de su loop al recibir Err
        drop(self.sender.take());

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    tracing::error!(worker = worker.id, "worker thread panicked");
                }
            }
        }
    }
}

impl Worker {
    fn spawn(id: usize, receiver: Arc<Mutex<Receiver<Job>>>) -> io::Result<Self> {
        let thread = thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || Self::run(id, receiver))?;

        Ok(Self {
            id,
            thread: Some(thread),
        })
    }

    fn run(id: usize, receiver: Arc<Mutex<Receiver<Job>>>) {
        tracing::debug!(worker = id, "worker started");

        loop {
            // El lock se suelta antes de ejecutar el trabajo
            let message = receiver
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .recv();

            let Ok(job) = message else {
                break;
            };

            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                tracing::error!(
                    worker = id,
                    panic = panic_message(payload.as_ref()),
                    "connection handler panicked, connection aborted"
                );
            }
        }

        tracing::debug!(worker = id, "worker stopped");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
