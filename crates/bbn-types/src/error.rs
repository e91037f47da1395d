use thiserror::Error;

#[derive(Error, Debug)]
pub enum BbnError {
    #[error("Solver diverged at step {iteration}: {message}")]
    SolverDiverged { iteration: usize, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Linear algebra error: {0}")]
    LinAlg(String),
}

pub type BbnResult<T> = Result<T, BbnError>;
