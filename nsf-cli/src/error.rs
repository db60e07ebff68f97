use thiserror::Error;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Ошибка открытия или записи файла
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка кодека записи
    #[error("Recording error: {0}")]
    Codec(#[from] nsf_core::NsError),

    /// Ошибка построения JSON-отчёта
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
