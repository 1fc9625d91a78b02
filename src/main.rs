//! Command-line entry point: analyze recordings and print one JSON object per file.

use std::path::{Path, PathBuf};

use pearlyx::analysis::{ExtractionParams, extract_features_with};
use pearlyx::audio::load_file;
use pearlyx::config::{self, AppSettings};
use pearlyx::scoring::validate_threshold;
use pearlyx::{SharedAnalyzer, VoiceAnalyzer, logging};
use serde_json::{Value, json};
use tracing::{error, info};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    model_path: Option<PathBuf>,
    scaler_path: Option<PathBuf>,
    threshold: Option<f64>,
    features_only: bool,
    inputs: Vec<PathBuf>,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let settings = resolve_settings(&options)?;
    if let Err(err) = logging::init(&settings.logging.level) {
        eprintln!("Logging disabled: {err}");
    }

    let params = ExtractionParams::default();
    if options.features_only {
        for input in &options.inputs {
            let report = match extract_file(input, &params) {
                Ok(features) => json!({ "file": input.display().to_string(), "features": features }),
                Err(message) => error_report(input, &message),
            };
            println!("{report}");
        }
        return Ok(());
    }

    let analyzer = SharedAnalyzer::global()
        .get_or_load(&settings.analyzer)
        .map_err(|err| format!("Cannot start without a usable model: {err}"))?;
    info!(
        "Analyzing {} file(s) at threshold {}",
        options.inputs.len(),
        settings.analyzer.threshold
    );
    for input in &options.inputs {
        let report = analyze_file(&analyzer, input, settings.analyzer.threshold, &params)
            .unwrap_or_else(|message| error_report(input, &message));
        println!("{report}");
    }
    Ok(())
}

fn resolve_settings(options: &CliOptions) -> Result<AppSettings, String> {
    let mut settings = match &options.config_path {
        Some(path) => config::load_from_path(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())?;
    if let Some(path) = &options.model_path {
        settings.analyzer.model_path = path.clone();
    }
    if let Some(path) = &options.scaler_path {
        settings.analyzer.scaler_path = Some(path.clone());
    }
    if let Some(threshold) = options.threshold {
        validate_threshold(threshold).map_err(|err| err.to_string())?;
        settings.analyzer.threshold = threshold;
    }
    Ok(settings)
}

fn extract_file(path: &Path, params: &ExtractionParams) -> Result<Value, String> {
    let signal = load_file(path).map_err(|err| err.to_string())?;
    let features = extract_features_with(&signal, params).map_err(|err| err.to_string())?;
    serde_json::to_value(features).map_err(|err| err.to_string())
}

fn analyze_file(
    analyzer: &VoiceAnalyzer,
    path: &Path,
    threshold: f64,
    params: &ExtractionParams,
) -> Result<Value, String> {
    let signal = load_file(path).map_err(|err| err.to_string())?;
    let (features, result) = analyzer
        .analyze_with_params(&signal, threshold, params)
        .map_err(|err| err.to_string())?;
    Ok(json!({ "file": path.display().to_string(), "features": features, "result": result }))
}

fn error_report(path: &Path, message: &str) -> Value {
    error!("{}: {message}", path.display());
    json!({ "file": path.display().to_string(), "error": message })
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--model requires a value".to_string())?;
                options.model_path = Some(PathBuf::from(value));
            }
            "--scaler" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--scaler requires a value".to_string())?;
                options.scaler_path = Some(PathBuf::from(value));
            }
            "--threshold" => {
                idx += 1;
                let value =
                    args.get(idx).ok_or_else(|| "--threshold requires a value".to_string())?;
                options.threshold = Some(
                    value
                        .parse::<f64>()
                        .map_err(|_| format!("Invalid --threshold value: {value}"))?,
                );
            }
            "--features-only" => options.features_only = true,
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            input => options.inputs.push(PathBuf::from(input)),
        }
        idx += 1;
    }
    if options.inputs.is_empty() {
        return Err(format!("At least one audio file is required\n\n{}", help_text()));
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "pearlyx",
        "",
        "Extract voice biomarkers from recordings and score them with a trained model.",
        "",
        "Usage:",
        "  pearlyx [options] <audio>...",
        "",
        "Options:",
        "  --config <path>     Settings file (default: <config dir>/.pearlyx/config.toml).",
        "  --model <path>      Classifier artifact, overriding the settings file.",
        "  --scaler <path>     Feature scaler artifact, overriding the settings file.",
        "  --threshold <t>     Decision threshold in [0, 1] (default: 0.52).",
        "  --features-only     Print the 29 measurements without classifying.",
        "",
        "Each file produces one JSON line on stdout; logs go to stderr.",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_overrides_and_inputs() {
        let options = parse_args(args(&[
            "--model",
            "m.json",
            "--threshold",
            "0.4",
            "a.wav",
            "b.mp3",
        ]))
        .unwrap();
        assert_eq!(options.model_path, Some(PathBuf::from("m.json")));
        assert_eq!(options.threshold, Some(0.4));
        assert_eq!(options.inputs, vec![PathBuf::from("a.wav"), PathBuf::from("b.mp3")]);
        assert!(!options.features_only);
    }

    #[test]
    fn rejects_missing_inputs_and_unknown_flags() {
        assert!(parse_args(args(&["--features-only"])).is_err());
        let err = parse_args(args(&["--fast", "a.wav"])).unwrap_err();
        assert!(err.starts_with("Unknown argument: --fast"));
        assert!(parse_args(args(&["--threshold", "high", "a.wav"])).is_err());
    }
}
