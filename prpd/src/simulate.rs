use connection::{
    ConnectionConfig, ConnectionError, ConnectionFactory, ConnectionKind, Producer, QueueSender,
};
use prpd_core::{ChartDefinition, ChartMessage, DrainReport, PrpdEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;

const NOISE_FLOOR: f64 = -70.0;
const NOISE_SPREAD: f64 = 2.5;
// Peak deviation of the power-frequency baseline riding under the noise.
const BASELINE_SWING: f64 = 3.0;
// Discharges cluster on the rising flanks of both half-cycles.
const PD_WINDOWS: [(f64, f64); 2] = [(30.0, 100.0), (210.0, 280.0)];
const PD_PROBABILITY: f64 = 0.08;
const DRAIN_BUDGET: usize = 64;

/// Synthetic partial-discharge source producing one cycle per call.
pub struct PdSource {
    rng: StdRng,
    phases: Vec<f64>,
}

impl PdSource {
    pub fn new(definition: &ChartDefinition, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let axis = definition.phase_axis;
        let phases = (0..axis.point_count)
            .map(|i| axis.phase_at(i).rem_euclid(360.0))
            .collect();
        Self { rng, phases }
    }

    pub fn next_cycle(&mut self) -> Vec<f64> {
        let mut cycle = Vec::with_capacity(self.phases.len());
        for &phase in &self.phases {
            let baseline = NOISE_FLOOR + BASELINE_SWING * phase.to_radians().sin();
            let mut value = baseline + self.rng.gen_range(-NOISE_SPREAD..NOISE_SPREAD);
            let in_window = PD_WINDOWS
                .iter()
                .any(|&(start, end)| phase >= start && phase <= end);
            if in_window && self.rng.gen_bool(PD_PROBABILITY) {
                value = self.rng.gen_range(-58.0..-32.0);
            }
            cycle.push(value);
        }
        cycle
    }
}

fn spawn_producer(
    mut source: PdSource,
    sender: QueueSender<ChartMessage>,
    cycles: usize,
    interval: Duration,
) -> thread::JoinHandle<usize> {
    thread::spawn(move || {
        let mut sent = 0;
        for _ in 0..cycles {
            match sender.send(ChartMessage::Cycle(source.next_cycle())) {
                Ok(()) => sent += 1,
                Err(ConnectionError::QueueFull) => continue,
                Err(err) => {
                    log::warn!("producer stopped: {err}");
                    break;
                }
            }
            if !interval.is_zero() {
                thread::sleep(interval);
            }
        }
        sent
    })
}

pub struct SimulationOutcome {
    pub engine: PrpdEngine,
    pub report: DrainReport,
    pub produced: usize,
}

/// Streams `cycles` synthetic cycles from a producer thread into a fresh engine.
pub fn run_simulation(
    definition: &ChartDefinition,
    cycles: usize,
    seed: Option<u64>,
    interval: Duration,
) -> Result<SimulationOutcome, Box<dyn std::error::Error>> {
    let mut engine = PrpdEngine::new(definition)?;
    let config = ConnectionConfig {
        kind: ConnectionKind::Blocking,
        queue_capacity: definition.engine.max_cycles.max(1),
    };
    let (sender, receiver) = ConnectionFactory::create::<ChartMessage>(&config);
    let producer = spawn_producer(PdSource::new(definition, seed), sender, cycles, interval);

    let mut total = DrainReport::default();
    loop {
        let report = engine.drain(&receiver, DRAIN_BUDGET);
        total.cycles_accepted += report.cycles_accepted;
        total.cycles_rejected += report.cycles_rejected;
        total.range_changes += report.range_changes;
        total.resets += report.resets;
        if report.disconnected {
            total.disconnected = true;
            break;
        }
        if report.messages() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
    }

    let produced = producer
        .join()
        .map_err(|_| "producer thread panicked")?;
    log::info!(
        "simulation finished: {produced} produced, {} accepted",
        total.cycles_accepted
    );
    Ok(SimulationOutcome {
        engine,
        report: total,
        produced,
    })
}
