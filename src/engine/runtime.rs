//! Runtime objects: requests, client connections, worker pools, logging
//! configuration and extension modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;

/// Product info key naming the VDB a client logged on to.
pub const VIRTUAL_DB: &str = "VirtualDatabaseName";

/// Product info key naming the VDB version a client logged on to.
pub const VDB_VERSION: &str = "VirtualDatabaseVersion";

/// Identifies a user request within a client connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId {
    pub connection_id: String,
    pub execution_id: i64,
}

/// An in-flight or historical query, either the user request itself or one
/// of the source queries it fanned out to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub request_id: RequestId,
    /// Plan node that issued a source query
    #[serde(default)]
    pub node_id: i32,
    /// Execution number of a source query within its node
    #[serde(default)]
    pub execution_id: i32,
    pub command: String,
    pub processing_timestamp: DateTime<Utc>,
    /// Set only for source queries running against a connector binding
    #[serde(default)]
    pub connector_binding_uuid: Option<String>,
}

impl RequestInfo {
    pub fn is_source_request(&self) -> bool {
        self.connector_binding_uuid.is_some()
    }
}

/// Point-in-time counters of one worker pool queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPoolStats {
    pub queue_name: String,
    #[serde(default)]
    pub active_threads: u32,
    #[serde(default)]
    pub highest_active_threads: u32,
    #[serde(default)]
    pub max_threads: u32,
    #[serde(default)]
    pub queued: u32,
    #[serde(default)]
    pub highest_queued: u32,
    #[serde(default)]
    pub total_submitted: u64,
    #[serde(default)]
    pub total_completed: u64,
}

/// What the engine returned when a client logged on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogonResult {
    pub session_id: String,
    #[serde(default)]
    pub product_info: BTreeMap<String, String>,
}

impl LogonResult {
    pub fn product_info(&self, key: &str) -> Option<&str> {
        self.product_info.get(key).map(String::as_str)
    }
}

/// A live client connection to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConnection {
    pub logon: LogonResult,
}

impl ClientConnection {
    /// Connection logged on to the given VDB name and version.
    pub fn new(session_id: impl Into<String>, vdb_name: &str, vdb_version: &str) -> Self {
        let mut product_info = BTreeMap::new();
        product_info.insert(VIRTUAL_DB.to_string(), vdb_name.to_string());
        product_info.insert(VDB_VERSION.to_string(), vdb_version.to_string());
        ClientConnection {
            logon: LogonResult {
                session_id: session_id.into(),
                product_info,
            },
        }
    }

    pub fn session_id(&self) -> &str {
        &self.logon.session_id
    }
}

/// Engine message verbosity, from nothing to everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    None,
    Critical,
    Error,
    #[default]
    Warning,
    Info,
    Detail,
    Trace,
}

impl MessageLevel {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Level for a numeric code; out-of-range codes clamp to the ends.
    pub fn from_i32(code: i32) -> Self {
        match code {
            i32::MIN..=0 => MessageLevel::None,
            1 => MessageLevel::Critical,
            2 => MessageLevel::Error,
            3 => MessageLevel::Warning,
            4 => MessageLevel::Info,
            5 => MessageLevel::Detail,
            _ => MessageLevel::Trace,
        }
    }
}

impl From<MessageLevel> for LevelFilter {
    fn from(level: MessageLevel) -> Self {
        match level {
            MessageLevel::None => LevelFilter::OFF,
            MessageLevel::Critical | MessageLevel::Error => LevelFilter::ERROR,
            MessageLevel::Warning => LevelFilter::WARN,
            MessageLevel::Info => LevelFilter::INFO,
            MessageLevel::Detail => LevelFilter::DEBUG,
            MessageLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Which log contexts are dropped and at what level messages are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LogConfiguration {
    #[serde(default)]
    pub discarded_contexts: BTreeSet<String>,
    #[serde(default)]
    pub message_level: MessageLevel,
}

impl LogConfiguration {
    pub fn new<I, S>(discarded_contexts: I, message_level: MessageLevel) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LogConfiguration {
            discarded_contexts: discarded_contexts.into_iter().map(Into::into).collect(),
            message_level,
        }
    }

    pub fn is_context_discarded(&self, context: &str) -> bool {
        self.discarded_contexts.contains(context)
    }
}

/// A deployed binary module (connector jar, function library, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionModule {
    pub full_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub module_type: String,
    #[serde(default)]
    pub file_contents: Vec<u8>,
}
