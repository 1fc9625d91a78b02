//! Developer utility to evaluate a model against a JSON-lines feature table.
//!
//! Each line holds `{"features": {<29 named measurements>}, "label": 0|1}`.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use pearlyx::{FeatureVector, VoiceAnalyzer};
use pearlyx::ml::metrics::{ConfusionMatrix, accuracy, binary_summary, precision_recall_by_class};
use pearlyx::ml::{load_model, load_scaler};
use pearlyx::scoring::{DEFAULT_THRESHOLD, validate_threshold};
use serde::Deserialize;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    model_path: PathBuf,
    scaler_path: Option<PathBuf>,
    data_path: PathBuf,
    threshold: f64,
    top: usize,
}

#[derive(Debug, Deserialize)]
struct Row {
    features: FeatureVector,
    label: u8,
}

#[derive(Debug, Clone)]
struct Misclassified {
    line: usize,
    truth: u8,
    probability: f64,
}

const CLASS_NAMES: [&str; 2] = ["healthy", "parkinsons"];

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let model = load_model(&options.model_path).map_err(|err| err.to_string())?;
    let scaler = options
        .scaler_path
        .as_deref()
        .map(load_scaler)
        .transpose()
        .map_err(|err| err.to_string())?;
    let analyzer = VoiceAnalyzer::new(Box::new(model), scaler).map_err(|err| err.to_string())?;
    let rows = read_rows(&options.data_path)?;

    let mut cm = ConfusionMatrix::new(2);
    let mut misclassified = Vec::new();
    for (line, row) in rows {
        if row.label > 1 {
            return Err(format!("line {line}: label must be 0 or 1, got {}", row.label));
        }
        let result = analyzer
            .classify(&row.features, options.threshold)
            .map_err(|err| format!("line {line}: {err}"))?;
        cm.add(row.label as usize, result.prediction as usize);
        if result.prediction != row.label {
            misclassified.push(Misclassified {
                line,
                truth: row.label,
                probability: result.probability,
            });
        }
    }
    if cm.total() == 0 {
        return Err(format!("No rows in {}", options.data_path.display()));
    }

    println!("rows: {}  threshold: {}", cm.total(), options.threshold);
    println!("accuracy: {:.4}", accuracy(&cm));
    for (idx, stats) in precision_recall_by_class(&cm).iter().enumerate() {
        println!(
            "class {} {:<12}  precision={:.3}  recall={:.3}  support={}",
            idx, CLASS_NAMES[idx], stats.precision, stats.recall, stats.support
        );
    }
    if let Some(summary) = binary_summary(&cm) {
        println!(
            "sensitivity={:.3}  specificity={:.3}  f1={:.3}",
            summary.sensitivity, summary.specificity, summary.f1
        );
    }
    println!("confusion matrix (rows=true, cols=pred):");
    for truth in 0..cm.n_classes {
        let mut row = String::new();
        for pred in 0..cm.n_classes {
            row.push_str(&format!("{:6}", cm.get(truth, pred)));
        }
        println!("{row}");
    }

    if !misclassified.is_empty() {
        println!();
        println!("Most confident misses:");
        misclassified.sort_by(|a, b| {
            margin(b, options.threshold).total_cmp(&margin(a, options.threshold))
        });
        for item in misclassified.iter().take(options.top) {
            println!(
                "- line {}  truth={}  p={:.3}",
                item.line, CLASS_NAMES[item.truth as usize], item.probability
            );
        }
    }
    Ok(())
}

fn margin(item: &Misclassified, threshold: f64) -> f64 {
    (item.probability - threshold).abs()
}

fn read_rows(path: &Path) -> Result<Vec<(usize, Row)>, String> {
    let file = std::fs::File::open(path)
        .map_err(|err| format!("Failed to open {}: {err}", path.display()))?;
    let mut rows = Vec::new();
    for (idx, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let row: Row =
            serde_json::from_str(&line).map_err(|err| format!("line {}: {err}", idx + 1))?;
        rows.push((idx + 1, row));
    }
    Ok(rows)
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut model_path: Option<PathBuf> = None;
    let mut scaler_path: Option<PathBuf> = None;
    let mut data_path: Option<PathBuf> = None;
    let mut threshold = DEFAULT_THRESHOLD;
    let mut top = 10usize;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--model requires a value".to_string())?;
                model_path = Some(PathBuf::from(value));
            }
            "--scaler" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--scaler requires a value".to_string())?;
                scaler_path = Some(PathBuf::from(value));
            }
            "--data" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--data requires a value".to_string())?;
                data_path = Some(PathBuf::from(value));
            }
            "--threshold" => {
                idx += 1;
                let value =
                    args.get(idx).ok_or_else(|| "--threshold requires a value".to_string())?;
                threshold = value
                    .parse::<f64>()
                    .map_err(|_| format!("Invalid --threshold value: {value}"))?;
                validate_threshold(threshold).map_err(|err| err.to_string())?;
            }
            "--top" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--top requires a value".to_string())?;
                top = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --top value: {value}"))?;
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let model_path = model_path.ok_or_else(|| "--model is required".to_string())?;
    let data_path = data_path.ok_or_else(|| "--data is required".to_string())?;
    Ok(CliOptions {
        model_path,
        scaler_path,
        data_path,
        threshold,
        top,
    })
}

fn help_text() -> String {
    [
        "pearlyx-model-eval",
        "",
        "Evaluate a classifier artifact against labelled feature rows.",
        "",
        "Usage:",
        "  pearlyx-model-eval --model <model.json> --data <rows.jsonl> [options]",
        "",
        "Options:",
        "  --scaler <path>     Feature scaler artifact applied before the model.",
        "  --threshold <t>     Decision threshold in [0, 1] (default: 0.52).",
        "  --top <n>           Misclassified rows to list (default: 10).",
    ]
    .join("\n")
}
