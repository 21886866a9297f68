use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures specific to the MongoDB backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to encode status value for a query filter")]
    EncodeStatus {
        #[source]
        source: mongodb::bson::error::Error,
    },
    #[error("failed to write {kind} `{id}`")]
    Write {
        kind: &'static str,
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load {kind} `{id}`")]
    Load {
        kind: &'static str,
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to run {kind} query")]
    Query {
        kind: &'static str,
        #[source]
        source: MongoError,
    },
}
