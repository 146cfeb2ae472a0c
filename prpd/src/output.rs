use prpd_core::{ChartDefinition, DrainReport, PrpdEngine, Rgba, Transform};
use serde::Serialize;
use std::path::Path;

pub fn print_info(message: &str) {
    println!("[PRPD][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[PRPD][ERROR]: {message}");
}

fn hex(color: Rgba) -> String {
    let [r, g, b, a] = color.to_rgba8();
    format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
}

pub fn print_definition(definition: &ChartDefinition) {
    print_info(&format!("Chart '{}'", definition.name));
    if !definition.description.is_empty() {
        println!("\t{}", definition.description);
    }
    let axis = definition.phase_axis;
    println!(
        "\tphase: {}..{} deg, {} points",
        axis.phase_min, axis.phase_max, axis.point_count
    );
    let engine = definition.engine;
    println!(
        "\twindow: {} cycles, {} amplitude bins, max frequency {:?} (every {} cycles)",
        engine.max_cycles, engine.amplitude_bins, engine.max_frequency_mode, engine.reconcile_interval
    );
    println!(
        "\tdisplay range: {} .. {}",
        definition.display_range.min, definition.display_range.max
    );
}

pub fn print_summary(engine: &mut PrpdEngine, report: &DrainReport, produced: usize) {
    print_info(&format!(
        "{produced} cycles produced, {} accepted, {} rejected",
        report.cycles_accepted, report.cycles_rejected
    ));
    print_info(&format!(
        "{} of {} cycles retained, max frequency {}",
        engine.cycle_count(),
        engine.settings().max_cycles,
        engine.max_frequency()
    ));
    if engine.batch_count() == 0 {
        print_info("No batches");
        return;
    }
    println!("frequency\tinstances\tcolor");
    engine.for_each_render_batch(|batch| {
        println!(
            "{}\t\t{}\t\t{}",
            batch.frequency,
            batch.transforms.len(),
            hex(batch.color)
        );
    });
}

#[derive(Debug, Serialize)]
pub struct BatchExport {
    pub frequency: u32,
    pub color: Rgba,
    pub transforms: Vec<Transform>,
}

#[derive(Debug, Serialize)]
pub struct ChartExport {
    pub name: String,
    pub cycles: usize,
    pub max_frequency: u32,
    pub batches: Vec<BatchExport>,
}

pub fn collect_export(name: &str, engine: &mut PrpdEngine) -> ChartExport {
    let mut batches = Vec::with_capacity(engine.batch_count());
    engine.for_each_render_batch(|batch| {
        batches.push(BatchExport {
            frequency: batch.frequency,
            color: batch.color,
            transforms: batch.transforms.to_vec(),
        });
    });
    ChartExport {
        name: name.to_string(),
        cycles: engine.cycle_count(),
        max_frequency: engine.max_frequency(),
        batches,
    }
}

pub fn write_export<P: AsRef<Path>>(export: &ChartExport, path: P) -> std::io::Result<()> {
    let data = serde_json::to_vec_pretty(export)?;
    std::fs::write(path, data)
}
