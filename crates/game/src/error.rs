use crate::snapshot::EntityHandle;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must not be positive, got {value}")]
    Positive { field: &'static str, value: f32 },
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControllerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("no player registered for entity {0:?}")]
    UnknownPlayer(EntityHandle),
    #[error("entity {0:?} does not exist")]
    MissingEntity(EntityHandle),
    #[error("entity {0:?} has no character body attached")]
    MissingCharacterBody(EntityHandle),
}

pub(crate) fn require_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}
