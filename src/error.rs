use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("simulation already complete: horizon of {horizon} turns reached")]
    SimulationComplete { horizon: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type SimResult<T> = Result<T, SimError>;
