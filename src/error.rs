//! Errors raised while turning route declarations into a configuration.

/// A fatal problem with the current build.
///
/// Every variant names the offending path, name or handler so the message can
/// be surfaced as-is by a build script or a macro.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A declared path is empty or cannot be parsed.
    #[error("invalid route path '{path}'")]
    InvalidPath { path: String },

    /// Two declarations resolve to the same segment sequence.
    #[error("duplicate route path '{path}'")]
    DuplicatePath { path: String },

    /// Two declarations share the same name.
    #[error("duplicate route name '{name}' (declared again by '{path}')")]
    DuplicateName { name: String, path: String },

    /// Neither `/` nor any single-segment route was declared.
    #[error("no top-level route: declare '/' or at least one single-segment path")]
    NoTopLevelRoute,

    /// A declaration does not describe a constructible handler type.
    ///
    /// Raised when a [`RouteDescriptor`](crate::RouteDescriptor) is
    /// constructed, never by the hierarchy builder.
    #[error("invalid handler '{handler}': {reason}")]
    InvalidHandlerSource { handler: String, reason: String },
}

impl BuildError {
    /// The path this error is about, if it is about one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidPath { path }
            | Self::DuplicatePath { path }
            | Self::DuplicateName { path, .. } => Some(path),
            Self::NoTopLevelRoute | Self::InvalidHandlerSource { .. } => None,
        }
    }
}
