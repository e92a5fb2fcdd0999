use controller::TickReport;
use safety::Thresholds;
use sim::{Anomaly, Parameter, PumpState};

const BAR_WIDTH: usize = 30;

/// One JSONL trace line per tick.
#[derive(serde::Serialize)]
pub struct TraceRow {
    tick: u64,
    command: &'static str,
    state: PumpState,
    pressure: f64,
    temperature: f64,
    water_level: f64,
    violated: Vec<&'static str>,
    transition: Option<String>,
    anomaly: Option<Anomaly>,
    scram: bool,
}

impl From<&TickReport> for TraceRow {
    fn from(report: &TickReport) -> Self {
        let step = &report.step;
        Self {
            tick: report.tick,
            command: report.command.name(),
            state: step.state,
            pressure: step.readings.pressure,
            temperature: step.readings.temperature,
            water_level: step.readings.water_level,
            violated: step.violated(),
            transition: step.transition.map(|t| format!("{:?} -> {:?}", t.from, t.to)),
            anomaly: step.anomaly,
            scram: step.state == PumpState::EmergencyScram,
        }
    }
}

fn bar(value: f64, scale: f64) -> String {
    let filled = if scale > 0.0 {
        ((value / scale) * BAR_WIDTH as f64).clamp(0.0, BAR_WIDTH as f64) as usize
    } else {
        0
    };
    format!("{}{}", "#".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

/// Human-readable status block for one tick.
pub fn status(report: &TickReport, thresholds: &Thresholds) -> String {
    let step = &report.step;
    let mut lines = vec![format!(
        "tick {:>4}  command: {:<5}  state: [{}]",
        report.tick, report.command, step.state
    )];

    if let Some(t) = step.transition {
        lines.push(format!(">>> transition: {} -> {}", t.from, t.to));
    }
    if let Some(anomaly) = step.anomaly {
        lines.push(format!("*** simulating parameter anomaly: {anomaly:?} ***"));
    }

    for (label, parameter) in [
        ("TEMPERATURE", Parameter::Temperature),
        ("PRESSURE   ", Parameter::Pressure),
        ("WATER LEVEL", Parameter::WaterLevel),
    ] {
        let value = step.readings.get(parameter);
        let gauge = bar(value, thresholds.scale(parameter));
        lines.push(format!("  {label} [{gauge}] {value:.2}"));
    }

    if !step.violations.is_empty() {
        lines.push("ALERT: parameters outside safety limits".to_string());
        lines.extend(step.violations.iter().map(|v| format!("  reason: {v}")));
    }
    if step.state == PumpState::EmergencyScram {
        lines.push("[SCRAM ACTIVE] reactor shut down, manual reset required".to_string());
    }

    lines.join("\n") + "\n"
}
