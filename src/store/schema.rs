use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::session::result::SessionRecord;

/// Root of `stats.json`. Sessions are kept in write order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsDocument {
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    /// Top-level keys this version does not know about, written back as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
