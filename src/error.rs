use thiserror::Error;

/// Top-level error type for the rosace kernel.
#[derive(Debug, Error)]
pub enum RosaceError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the planar map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("edge would connect a vertex to itself")]
    SelfLoop,

    #[error("map violates {count} invariant(s), first: {first}")]
    Invalid { count: usize, first: String },

    #[error("cleanse left {residual} unrepaired defect(s)")]
    CleanseIncomplete { residual: usize },
}

/// Which half of a reflective unit a branch point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Bottom => f.write_str("bottom"),
        }
    }
}

/// Errors raised while building a motif.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("{motif}: branch point {branch} ({side}) could not be located")]
    Degenerate {
        motif: &'static str,
        branch: usize,
        side: Side,
    },

    #[error("builder is in stage {found}, expected {expected}")]
    InvalidStage {
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors raised while reading or writing mosaic documents.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("vertex reference {0} has no prior definition")]
    ReferenceNotFound(u32),

    #[error("vertex id {0} is defined more than once")]
    DuplicateId(u32),

    #[error("vertices {0} and {1} are joined by more than one edge")]
    DuplicateEdge(u32, u32),

    #[error("unsupported document version {0}")]
    UnsupportedVersion(u32),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`RosaceError`].
pub type Result<T> = std::result::Result<T, RosaceError>;
