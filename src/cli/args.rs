//! Command-line argument parsing.

use crate::api::CleanConfigPatch;
use crate::state::Mode;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Probe the backend once
    Health,
    /// Poll backend health until interrupted
    Monitor,
    /// List data folders, or the CSV files inside one
    Files { subfolder: Option<String> },
    /// Parse and merge CSV files
    Parse {
        files: Vec<String>,
        subfolder: Option<String>,
    },
    /// Clean the parsed dataset
    Clean(CleanConfigPatch),
    /// Show the first rows of the current dataset
    Preview { rows: Option<usize> },
    /// Show statistics for one column
    Stats { column: String },
    /// List trained models
    Models { subfolder: Option<String> },
    /// Ask a model for optimized setpoints
    Optimize {
        model: String,
        inputs: Vec<(String, f64)>,
    },
    /// List pages, optionally of one mode
    Pages { mode: Option<Mode> },
    /// Resolve a page identifier the way the dashboard does
    View { page_id: String },
    /// Arguments could not be understood
    Invalid(String),
}

/// Parse command-line arguments into a [`CliCommand`].
///
/// The first item is the program name and is skipped. No arguments means
/// [`CliCommand::Help`].
///
/// # Examples
///
/// ```
/// use hvacdash::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["hvacdash".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let args: Vec<String> = args.skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        return CliCommand::Help;
    };

    match parse_command(command, rest) {
        Ok(command) => command,
        Err(message) => CliCommand::Invalid(message),
    }
}

fn parse_command(command: &str, rest: &[String]) -> Result<CliCommand, String> {
    match command {
        "--version" | "-V" | "version" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "health" => no_extra(rest).map(|_| CliCommand::Health),
        "monitor" => no_extra(rest).map(|_| CliCommand::Monitor),
        "files" => Ok(CliCommand::Files {
            subfolder: single_optional(rest)?,
        }),
        "models" => Ok(CliCommand::Models {
            subfolder: single_optional(rest)?,
        }),
        "parse" => parse_parse(rest),
        "clean" => parse_clean(rest).map(CliCommand::Clean),
        "preview" => {
            let rows = single_optional(rest)?
                .map(|n| n.parse::<usize>().map_err(|_| format!("invalid row count '{}'", n)))
                .transpose()?;
            Ok(CliCommand::Preview { rows })
        }
        "stats" => match rest {
            [column] => Ok(CliCommand::Stats {
                column: column.clone(),
            }),
            _ => Err("usage: stats <column>".to_string()),
        },
        "optimize" => parse_optimize(rest),
        "pages" => {
            let mode = single_optional(rest)?
                .map(|m| match m.as_str() {
                    "batch" => Ok(Mode::Batch),
                    "optimization" | "opt" => Ok(Mode::Optimization),
                    other => Err(format!("unknown mode '{}'", other)),
                })
                .transpose()?;
            Ok(CliCommand::Pages { mode })
        }
        "view" => match rest {
            [id] => Ok(CliCommand::View {
                page_id: id.clone(),
            }),
            _ => Err("usage: view <page-id>".to_string()),
        },
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn no_extra(rest: &[String]) -> Result<(), String> {
    match rest.first() {
        None => Ok(()),
        Some(extra) => Err(format!("unexpected argument '{}'", extra)),
    }
}

fn single_optional(rest: &[String]) -> Result<Option<String>, String> {
    match rest {
        [] => Ok(None),
        [value] => Ok(Some(value.clone())),
        [_, extra, ..] => Err(format!("unexpected argument '{}'", extra)),
    }
}

fn parse_parse(rest: &[String]) -> Result<CliCommand, String> {
    let mut files = Vec::new();
    let mut subfolder = None;
    let mut iter = rest.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--folder" | "-f" => {
                let value = iter.next().ok_or("--folder needs a value")?;
                subfolder = Some(value.clone());
            }
            _ => files.push(arg.clone()),
        }
    }

    if files.is_empty() {
        return Err("usage: parse [--folder <name>] <file>...".to_string());
    }
    Ok(CliCommand::Parse { files, subfolder })
}

fn parse_clean(rest: &[String]) -> Result<CleanConfigPatch, String> {
    let mut patch = CleanConfigPatch::new();
    let mut iter = rest.iter();

    while let Some(arg) = iter.next() {
        patch = match arg.as_str() {
            "--resample" => {
                let value = iter.next().ok_or("--resample needs a value")?;
                patch.resample_interval(value.clone())
            }
            "--no-frozen" => patch.detect_frozen(false),
            "--steady-state" => patch.apply_steady_state(true),
            "--heat-balance" => patch.apply_heat_balance(true),
            "--affinity" => patch.apply_affinity(true),
            "--filter-invalid" => patch.filter_invalid(true),
            other => return Err(format!("unknown clean option '{}'", other)),
        };
    }
    Ok(patch)
}

fn parse_optimize(rest: &[String]) -> Result<CliCommand, String> {
    let (model, readings) = rest
        .split_first()
        .ok_or("usage: optimize <model> [name=value]...")?;

    let inputs = readings
        .iter()
        .map(|pair| -> Result<(String, f64), String> {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected name=value, got '{}'", pair))?;
            let value: f64 = value
                .parse()
                .map_err(|_| format!("invalid value for '{}': '{}'", name, value))?;
            Ok((name.to_string(), value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CliCommand::Optimize {
        model: model.clone(),
        inputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let mut all = vec!["hvacdash".to_string()];
        all.extend(args.iter().map(|s| s.to_string()));
        parse_args(all.into_iter())
    }

    #[test]
    fn test_no_args_shows_help() {
        assert_eq!(parse(&[]), CliCommand::Help);
    }

    #[test]
    fn test_version_flags() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
    }

    #[test]
    fn test_files_and_models() {
        assert_eq!(parse(&["files"]), CliCommand::Files { subfolder: None });
        assert_eq!(
            parse(&["files", "2024-01"]),
            CliCommand::Files {
                subfolder: Some("2024-01".to_string())
            }
        );
        assert_eq!(parse(&["models"]), CliCommand::Models { subfolder: None });
        assert!(matches!(parse(&["files", "a", "b"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse(&["parse", "--folder", "2024-01", "a.csv", "b.csv"]),
            CliCommand::Parse {
                files: vec!["a.csv".to_string(), "b.csv".to_string()],
                subfolder: Some("2024-01".to_string()),
            }
        );
        assert!(matches!(parse(&["parse"]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["parse", "--folder"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_clean_flags() {
        assert_eq!(
            parse(&["clean", "--no-frozen", "--resample", "15m"]),
            CliCommand::Clean(
                CleanConfigPatch::new()
                    .detect_frozen(false)
                    .resample_interval("15m")
            )
        );
        assert!(matches!(parse(&["clean", "--bogus"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_preview_rows() {
        assert_eq!(parse(&["preview"]), CliCommand::Preview { rows: None });
        assert_eq!(parse(&["preview", "10"]), CliCommand::Preview { rows: Some(10) });
        assert!(matches!(parse(&["preview", "ten"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_optimize_inputs() {
        assert_eq!(
            parse(&["optimize", "m1", "chw_supply_temp=7.0", "load_kw=820"]),
            CliCommand::Optimize {
                model: "m1".to_string(),
                inputs: vec![
                    ("chw_supply_temp".to_string(), 7.0),
                    ("load_kw".to_string(), 820.0)
                ],
            }
        );
        assert!(matches!(parse(&["optimize", "m1", "x"]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["optimize"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_pages_and_view() {
        assert_eq!(parse(&["pages", "opt"]), CliCommand::Pages { mode: Some(Mode::Optimization) });
        assert_eq!(
            parse(&["view", "batch_stats"]),
            CliCommand::View {
                page_id: "batch_stats".to_string()
            }
        );
        assert!(matches!(parse(&["pages", "x"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse(&["frobnicate"]),
            CliCommand::Invalid("unknown command 'frobnicate'".to_string())
        );
    }
}
