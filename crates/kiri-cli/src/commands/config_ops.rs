use std::path::Path;
use std::process;

use kiri_core::settings::{self, Settings, SettingsError};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Settings from `file`, or the embedded defaults.
pub fn load_settings(file: Option<&str>) -> Result<Settings, SettingsError> {
    match file {
        Some(path) => Settings::open(Path::new(path)),
        None => settings::parse_settings_toml(settings::default_toml()),
    }
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

/// Print the effective settings, followed by the analyzer arguments they
/// produce.
pub fn settings_show(file: Option<&str>) {
    let s = die!(load_settings(file), "Error: {}");
    print!("{}", die!(render(&s), "Error rendering settings: {}"));
}

pub fn render(s: &Settings) -> Result<String, toml::ser::Error> {
    let mut out = toml::to_string(s)?;
    out.push_str(&format!(
        "\n# analyzer arguments: {}\n",
        s.tokenizer.analyzer_args().join(" ")
    ));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let s = load_settings(None).unwrap();
        let out = render(&s).unwrap();
        assert!(out.contains("[tokenizer]"));
        assert!(out.contains("mode = \"search\""));
        assert!(out.contains("kanji_length = 2"));
        assert!(out.ends_with("# analyzer arguments: --node-format=%H\n"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_settings(Some("/nonexistent/kiri.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
