/// Stable identifier type used for requests, angles, and libraries.
///
/// Aliased so a future switch of id scheme touches one line.
pub type Id = uuid::Uuid;

/// Opaque reference to a generated artifact held by the remote provider.
pub type ArtifactRef = String;
