//! Unit tests for CLI commands

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::cli::{execute, Cli, Commands, OutputFormat};
use clap::Parser;
use tempfile::TempDir;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args.iter().copied()).unwrap()
}

fn run(command: &Commands, dir: &TempDir) -> String {
    let mut out = Vec::new();
    execute(command, dir.path(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_generate_command_defaults() {
    let cli = parse(&["internalapis-gen", "generate"]);
    match cli.command {
        Commands::Generate {
            inputs,
            output,
            format,
        } => {
            assert!(inputs.config.is_none());
            assert!(!inputs.no_builtin);
            assert!(output.is_none());
            assert_eq!(format, OutputFormat::Yaml);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_command_with_flags() {
    let cli = parse(&[
        "internalapis-gen",
        "--verbose",
        "generate",
        "--config",
        "gen.yaml",
        "--output",
        "out",
        "--format",
        "json",
        "--no-builtin",
    ]);
    assert!(cli.verbose);
    match cli.command {
        Commands::Generate {
            inputs,
            output,
            format,
        } => {
            assert_eq!(inputs.config.unwrap().to_string_lossy(), "gen.yaml");
            assert!(inputs.no_builtin);
            assert_eq!(output.unwrap().to_string_lossy(), "out");
            assert_eq!(format, OutputFormat::Json);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_unknown_format_is_rejected() {
    assert!(Cli::try_parse_from(["internalapis-gen", "generate", "--format", "xml"]).is_err());
}

#[test]
fn test_list_prints_builtin_catalog() {
    let dir = TempDir::new().unwrap();
    let output = run(&parse(&["internalapis-gen", "list"]).command, &dir);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "internal.namespaces.core\tv1, Kind=Namespace\tCluster\tk8s.io/api/core/v1.Namespace\tstatus"
    );
    assert!(lines[3].starts_with("internal.serviceaccounts.core\t"));
}

#[test]
fn test_generate_yaml_stream_to_stdout() {
    let dir = TempDir::new().unwrap();
    let output = run(&parse(&["internalapis-gen", "generate"]).command, &dir);
    assert_eq!(output.matches("---\n").count(), 4);
    assert!(output.contains("name: internal.namespaces.core"));
    assert!(output.contains("kind: APIResourceSchema"));
}

#[test]
fn test_generate_json_files_into_output_dir() {
    let dir = TempDir::new().unwrap();
    let command = parse(&[
        "internalapis-gen",
        "generate",
        "--output",
        "schemas",
        "--format",
        "json",
    ])
    .command;
    let output = run(&command, &dir);
    assert!(output.is_empty());

    let path = dir.path().join("schemas/internal.secrets.core.json");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written["metadata"]["name"], "internal.secrets.core");
    assert_eq!(written["spec"]["scope"], "Namespaced");
}

#[test]
fn test_inspect_lists_components_and_kinds() {
    let dir = TempDir::new().unwrap();
    let output = run(&parse(&["internalapis-gen", "inspect"]).command, &dir);
    assert!(output.starts_with("Description document (version 1.0)\n"));
    assert!(output.contains("  io.k8s.apimachinery.pkg.apis.meta.v1.ObjectMeta\n"));
    assert!(output.contains("  v1, Kind=Secret -> io.k8s.api.core.v1.Secret\n"));
}

#[test]
fn test_no_builtin_without_config_is_empty() {
    let dir = TempDir::new().unwrap();
    let output = run(
        &parse(&["internalapis-gen", "generate", "--no-builtin"]).command,
        &dir,
    );
    assert!(output.is_empty());
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let command = parse(&["internalapis-gen", "list", "--config", "absent.toml"]).command;
    let mut out = Vec::new();
    let err = execute(&command, dir.path(), &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("absent.toml"));
}
