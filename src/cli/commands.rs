use crate::cli::args::{AnnotateArgs, OutputFormat};
use crate::config::{Config, TraceConfig};
use crate::logging;
use crate::recorder::{ChangeRecorder, StateValue, StaticTrace};
use crate::ui::formatter::Formatter;
use crate::{Result, TracerError};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Execute the annotate command
pub async fn annotate(mut args: AnnotateArgs, config: &Config) -> Result<()> {
    args.merge_config(config);

    let raw_trace = read_trace(&args.trace)?;
    let from_value = match args.from.as_deref() {
        Some(json) => parse_value(json)?,
        None => StateValue::Unset,
    };
    let to_value = parse_value(&args.to)?;

    // merge_config has filled every frame option from the config already.
    let trace_config = TraceConfig {
        entry_frame: args.entry_frame.unwrap_or_default(),
        dispatch_frame: args.dispatch_frame.unwrap_or_default(),
        default_prop_name: args.default_prop_name.unwrap_or_default(),
        ..config.trace.clone()
    };
    logging::log_display(
        format!(
            "Annotating trace for {} bundles (engine support: {})",
            trace_config.es_version, trace_config.mappings_location
        ),
        logging::LogLevel::Debug,
    );

    let recorder = ChangeRecorder::http(trace_config, StaticTrace::new(raw_trace))?;
    recorder.start_capture();
    recorder.capture(from_value, to_value).await;

    let record = recorder.last().pop().ok_or_else(|| {
        TracerError::InvalidValue("No state change was recorded".to_string())
    })?;

    match args.format.unwrap_or(OutputFormat::Text) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&record)
                .map_err(|e| TracerError::InvalidValue(format!("Failed to encode record: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("{}", Formatter::format_record(&record));
            if record.source_line_preview.is_empty() {
                eprintln!(
                    "{}",
                    Formatter::warning("No source preview resolved; positions may be generated ones.")
                );
            }
        }
    }

    Ok(())
}

fn read_trace(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut trace = String::new();
        io::stdin()
            .read_to_string(&mut trace)
            .map_err(|e| TracerError::FileError(format!("Failed to read stdin: {}", e)))?;
        return Ok(trace);
    }

    fs::read_to_string(path).map_err(|e| {
        TracerError::FileError(format!("Failed to read trace file {:?}: {}", path, e)).into()
    })
}

/// Parse a state value given as JSON
pub fn parse_value(json: &str) -> Result<StateValue> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        TracerError::InvalidValue(format!("{:?} is not valid JSON: {}", json, e))
    })?;
    Ok(StateValue::Value(value))
}
