use connection::{Connection, ConnectionError};
use prpd_config::DisplayRange;

use crate::engine::PrpdEngine;

/// Work handed to the engine from producer threads.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartMessage {
    Cycle(Vec<f64>),
    DisplayRange(DisplayRange),
    Reset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub cycles_accepted: usize,
    pub cycles_rejected: usize,
    pub range_changes: usize,
    pub resets: usize,
    /// Every producer has hung up and the queue is empty.
    pub disconnected: bool,
}

impl DrainReport {
    pub fn messages(&self) -> usize {
        self.cycles_accepted + self.cycles_rejected + self.range_changes + self.resets
    }
}

impl PrpdEngine {
    pub fn apply(&mut self, message: ChartMessage, report: &mut DrainReport) {
        match message {
            ChartMessage::Cycle(samples) => match self.add_cycle(&samples) {
                Ok(()) => report.cycles_accepted += 1,
                Err(_) => report.cycles_rejected += 1,
            },
            ChartMessage::DisplayRange(range) => {
                self.set_display_range(range.min, range.max);
                report.range_changes += 1;
            }
            ChartMessage::Reset => {
                self.reset();
                report.resets += 1;
            }
        }
    }

    /// Applies up to `budget` queued messages in arrival order.
    pub fn drain(&mut self, connection: &dyn Connection<ChartMessage>, budget: usize) -> DrainReport {
        let mut report = DrainReport::default();
        while report.messages() < budget {
            match connection.try_recv() {
                Ok(Some(message)) => self.apply(message, &mut report),
                Ok(None) => break,
                Err(ConnectionError::RecvFailed) => {
                    report.disconnected = true;
                    break;
                }
                Err(err) => {
                    log::warn!("hand-off receive error: {err}");
                    break;
                }
            }
        }
        if report.cycles_rejected > 0 {
            log::warn!("{} malformed cycles dropped", report.cycles_rejected);
        }
        report
    }
}
