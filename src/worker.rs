use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use tracing::debug;

use crate::fetch::Fetcher;
use crate::model::{History, Item};

/// Message sent from a background fetch thread to the event loop
#[derive(Debug)]
pub enum FetchMessage {
    Prices { seq: u64, items: Option<Vec<Item>> },
    History { material: String, history: Option<History> },
}

/// Runs each fetch on its own thread and funnels the results back through a
/// channel the UI loop drains without blocking.
pub struct Worker {
    fetcher: Fetcher,
    sender: Sender<FetchMessage>,
    receiver: Receiver<FetchMessage>,
}

impl Worker {
    pub fn new(fetcher: Fetcher) -> Self {
        let (sender, receiver) = mpsc::channel();
        Worker { fetcher, sender, receiver }
    }

    pub fn request_prices(&self, seq: u64) {
        let fetcher = self.fetcher.clone();
        let sender = self.sender.clone();
        debug!(seq, "spawning price fetch");
        thread::spawn(move || {
            let items = fetcher.prices();
            let _ = sender.send(FetchMessage::Prices { seq, items });
        });
    }

    pub fn request_history(&self, material: &str) {
        let fetcher = self.fetcher.clone();
        let sender = self.sender.clone();
        let material = material.to_string();
        thread::spawn(move || {
            let history = fetcher.history(&material);
            let _ = sender.send(FetchMessage::History { material, history });
        });
    }

    pub fn try_recv(&self) -> Option<FetchMessage> {
        self.receiver.try_recv().ok()
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<FetchMessage> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::MemorySource;
    use std::time::Duration;

    #[test]
    fn price_results_come_back_with_their_sequence() {
        let source = MemorySource::with(&[("prices.json", r#"[{"material":"DIRT","category":"Blocks"}]"#)]);
        let worker = Worker::new(Fetcher::new(source));
        worker.request_prices(7);
        match worker.recv_timeout(Duration::from_secs(5)) {
            Some(FetchMessage::Prices { seq, items }) => {
                assert_eq!(seq, 7);
                assert_eq!(items.unwrap()[0].material, "DIRT");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn failed_history_is_reported_as_none() {
        let worker = Worker::new(Fetcher::new(MemorySource::with(&[])));
        worker.request_history("STONE");
        match worker.recv_timeout(Duration::from_secs(5)) {
            Some(FetchMessage::History { material, history }) => {
                assert_eq!(material, "STONE");
                assert!(history.is_none());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
