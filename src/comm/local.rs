//! A group of workers living in one process.
use super::{Communicator, ROOT};
use crate::error::{Error, Result};
use crossbeam::channel::{self, Receiver, Sender};
use std::sync::{Arc, Barrier};

#[derive(Debug)]
enum Message {
    Flag(bool),
    Values(Vec<f64>),
    Partial { rank: usize, value: f64 },
}

#[derive(Debug)]
struct Shared {
    barrier: Barrier,
    senders: Vec<Sender<Message>>,
}

/// A worker of a group whose members run on separate threads of the same process.
///
/// The workers exchange messages through channels and never share their data otherwise, so a
/// group behaves like a set of processes. Every member must be moved to its own thread.
#[derive(Debug)]
pub struct LocalComm {
    rank: usize,
    shared: Arc<Shared>,
    receiver: Receiver<Message>,
}

impl LocalComm {
    /// Create the `size` members of a new group, ordered by rank.
    pub fn group(size: usize) -> Vec<Self> {
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..size).map(|_| channel::unbounded()).unzip();

        let shared = Arc::new(Shared {
            barrier: Barrier::new(size),
            senders,
        });

        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, receiver)| Self {
                rank,
                shared: Arc::clone(&shared),
                receiver,
            })
            .collect()
    }

    fn send(&self, to: usize, message: Message) -> Result<()> {
        self.shared.senders[to]
            .send(message)
            .map_err(|_| Error::Communication(format!("worker {} has left the group", to)))
    }

    fn receive(&self) -> Result<Message> {
        self.receiver.recv().map_err(|_| {
            Error::Communication(format!("worker {} lost its connection", self.rank))
        })
    }

    fn unexpected(&self, message: &Message) -> Error {
        Error::Communication(format!(
            "worker {} received an unexpected message: {:?}",
            self.rank, message
        ))
    }

    fn broadcast(&self, message: impl Fn() -> Message) -> Result<Option<Message>> {
        if self.is_root() {
            for to in (0..self.size()).filter(|&to| to != ROOT) {
                self.send(to, message())?;
            }
            Ok(None)
        } else {
            self.receive().map(Some)
        }
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.shared.senders.len()
    }

    fn barrier(&self) -> Result<()> {
        self.shared.barrier.wait();
        Ok(())
    }

    fn broadcast_flag(&self, flag: &mut bool) -> Result<()> {
        let value = *flag;

        match self.broadcast(|| Message::Flag(value))? {
            None => Ok(()),
            Some(Message::Flag(received)) => {
                *flag = received;
                Ok(())
            }
            Some(other) => Err(self.unexpected(&other)),
        }
    }

    fn broadcast_values(&self, values: &mut Vec<f64>) -> Result<()> {
        let root_values = if self.is_root() {
            values.clone()
        } else {
            Vec::new()
        };

        match self.broadcast(|| Message::Values(root_values.clone()))? {
            None => Ok(()),
            Some(Message::Values(received)) => {
                *values = received;
                Ok(())
            }
            Some(other) => Err(self.unexpected(&other)),
        }
    }

    fn reduce_sum(&self, local: f64) -> Result<Option<f64>> {
        if !self.is_root() {
            self.send(
                ROOT,
                Message::Partial {
                    rank: self.rank,
                    value: local,
                },
            )?;
            return Ok(None);
        }

        let mut partials = vec![0.0; self.size()];
        partials[ROOT] = local;

        for _ in 1..self.size() {
            match self.receive()? {
                Message::Partial { rank, value } if rank < partials.len() => {
                    partials[rank] = value;
                }
                other => return Err(self.unexpected(&other)),
            }
        }

        // add up in rank order, independent of the arrival order
        Ok(Some(partials.into_iter().sum()))
    }
}
