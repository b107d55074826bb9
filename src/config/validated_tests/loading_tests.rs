//! Tests for configuration loading and the init template.

use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, tempdir};

use crate::config::write_default_config;
use crate::output::OutputFormat;

use super::*;

mod load {
    use super::*;

    #[test]
    fn reads_config_file_named_on_cli() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"json\"").unwrap();
        let path = file.path().to_str().unwrap();

        let config = ValidatedConfig::load(&cli(&["--config", path])).unwrap();

        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn without_config_file_uses_cli_and_defaults() {
        let config = ValidatedConfig::load(&cli(&["--listen"])).unwrap();

        assert!(config.listen);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let result = ValidatedConfig::load(&cli(&["--config", path.to_str().unwrap()]));

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[monitor\nupdate_interval = ").unwrap();

        let result = ValidatedConfig::load(&cli(&["--config", file.path().to_str().unwrap()]));

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}

mod init_template {
    use super::*;

    #[test]
    fn written_template_loads_as_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ifwatch.toml");

        write_default_config(&path).unwrap();
        let config = ValidatedConfig::load(&cli(&["--config", path.to_str().unwrap()])).unwrap();

        assert!(fs::metadata(&path).unwrap().len() > 0);
        assert_eq!(config.update_interval, crate::config::defaults::update_interval());
        assert!(!config.listen);
    }

    #[test]
    fn unwritable_path_is_write_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("ifwatch.toml");

        let result = write_default_config(&path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}

mod display {
    use super::*;

    #[test]
    fn summarizes_settings() {
        let config =
            ValidatedConfig::from_raw(&cli(&["--listen", "--exclude-loopback"]), None).unwrap();

        let rendered = config.to_string();

        assert!(rendered.contains("update_interval: 500ms"));
        assert!(rendered.contains("listen: true"));
        assert!(rendered.contains("format: text"));
        assert!(rendered.contains("filters: 0+1"));
    }
}
