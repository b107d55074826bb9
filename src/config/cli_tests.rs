//! Tests for CLI argument parsing.

use super::cli::{Cli, Command, FormatArg};

mod parsing {
    use super::*;

    #[test]
    fn parse_monitor_options() {
        let cli = Cli::parse_from_iter(["ifwatch", "--update-interval", "250", "--listen"]);

        assert_eq!(cli.update_interval, Some(250));
        assert!(cli.listen);
    }

    #[test]
    fn parse_output_options() {
        let cli = Cli::parse_from_iter(["ifwatch", "--print-interval", "1000", "--format", "json"]);

        assert_eq!(cli.print_interval, Some(1000));
        assert_eq!(cli.format, Some(FormatArg::Json));
    }

    #[test]
    fn parse_filter_options() {
        let cli = Cli::parse_from_iter([
            "ifwatch",
            "--include",
            "^eth",
            "--include",
            "^en",
            "--exclude",
            "^docker",
            "--exclude-loopback",
        ]);

        assert_eq!(cli.include, vec!["^eth", "^en"]);
        assert_eq!(cli.exclude, vec!["^docker"]);
        assert!(cli.exclude_loopback);
    }

    #[test]
    fn parse_misc_options() {
        let cli = Cli::parse_from_iter(["ifwatch", "-c", "/etc/ifwatch.toml", "-v"]);

        assert_eq!(
            cli.config.as_ref().unwrap().to_str(),
            Some("/etc/ifwatch.toml")
        );
        assert!(cli.verbose);
    }

    #[test]
    fn default_values() {
        let cli = Cli::parse_from_iter(["ifwatch"]);

        // Optional fields have no defaults in CLI - None when not specified
        assert!(cli.update_interval.is_none());
        assert!(cli.print_interval.is_none());
        assert!(cli.format.is_none());
        assert!(cli.config.is_none());
        // Boolean flags default to false
        assert!(!cli.listen);
        assert!(!cli.exclude_loopback);
        assert!(!cli.verbose);
        // Vec fields default to empty
        assert!(cli.include.is_empty());
        assert!(cli.exclude.is_empty());
    }

    #[test]
    fn rejects_unknown_format() {
        let result = <Cli as clap::Parser>::try_parse_from(["ifwatch", "--format", "xml"]);

        assert!(result.is_err());
    }

    #[test]
    fn rejects_non_numeric_interval() {
        let result =
            <Cli as clap::Parser>::try_parse_from(["ifwatch", "--update-interval", "soon"]);

        assert!(result.is_err());
    }
}

mod init_command {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_init_with_default_output() {
        let cli = Cli::parse_from_iter(["ifwatch", "init"]);

        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("ifwatch.toml"));
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_custom_output() {
        let cli = Cli::parse_from_iter(["ifwatch", "init", "--output", "/custom/path/config.toml"]);

        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("/custom/path/config.toml"));
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn is_init_false_for_run_mode() {
        let cli = Cli::parse_from_iter(["ifwatch", "--listen"]);

        assert!(!cli.is_init());
    }
}

mod format_arg {
    use super::*;
    use crate::output::OutputFormat;
    use clap::ValueEnum;

    #[test]
    fn parse_values() {
        assert_eq!(FormatArg::from_str("text", false).unwrap(), FormatArg::Text);
        assert_eq!(FormatArg::from_str("json", false).unwrap(), FormatArg::Json);
    }

    #[test]
    fn converts_to_output_format() {
        assert_eq!(OutputFormat::from(FormatArg::Text), OutputFormat::Text);
        assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
    }
}
