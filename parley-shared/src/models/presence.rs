use serde::{Deserialize, Serialize};

/// One currently-online participant as reported by the presence stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Opaque unique id of the participant.
    pub user_id: String,

    /// Display name of the participant.
    pub user_name: String,
}
