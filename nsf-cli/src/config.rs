use log::LevelFilter;

/// Формат вывода отчётов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Параметры команды `info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Формат отчёта
    pub format: OutputFormat,
    /// Сколько событий вывести (0 = не выводить)
    pub events: usize,
    /// Выводить блоки настроек
    pub show_setup: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            events: 0,
            show_setup: false,
        }
    }
}

/// Уровень логирования по флагам `--quiet` / `--verbose`.
///
/// `--quiet` сильнее `--verbose`.
pub fn log_level(
    quiet: bool,
    verbose: bool,
) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, true) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для OutputFormat
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{s}'. Use: text, json")),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
