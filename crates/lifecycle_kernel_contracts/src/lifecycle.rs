#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ContractViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u64);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    Start,
    Mid,
    Final,
}

/// Reported lifecycle state. Each phase has a primary (`*1`) and an alternate (`*2`) form.
///
/// Deliberately not `Ord`: output ordering is owned by the engine's ranking comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LifecycleState {
    Start1,
    Start2,
    Mid1,
    Mid2,
    Final1,
    Final2,
}

impl LifecycleState {
    pub const ALL: [LifecycleState; 6] = [
        LifecycleState::Start1,
        LifecycleState::Start2,
        LifecycleState::Mid1,
        LifecycleState::Mid2,
        LifecycleState::Final1,
        LifecycleState::Final2,
    ];

    pub fn phase(self) -> LifecyclePhase {
        match self {
            LifecycleState::Start1 | LifecycleState::Start2 => LifecyclePhase::Start,
            LifecycleState::Mid1 | LifecycleState::Mid2 => LifecyclePhase::Mid,
            LifecycleState::Final1 | LifecycleState::Final2 => LifecyclePhase::Final,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            LifecycleState::Start1 => "START1",
            LifecycleState::Start2 => "START2",
            LifecycleState::Mid1 => "MID1",
            LifecycleState::Mid2 => "MID2",
            LifecycleState::Final1 => "FINAL1",
            LifecycleState::Final2 => "FINAL2",
        }
    }

    pub fn from_wire_name(name: &str) -> Result<Self, ContractViolation> {
        match name {
            "START1" => Ok(LifecycleState::Start1),
            "START2" => Ok(LifecycleState::Start2),
            "MID1" => Ok(LifecycleState::Mid1),
            "MID2" => Ok(LifecycleState::Mid2),
            "FINAL1" => Ok(LifecycleState::Final1),
            "FINAL2" => Ok(LifecycleState::Final2),
            _ => Err(ContractViolation::InvalidValue {
                field: "lifecycle_state",
                reason: "must be one of START1, START2, MID1, MID2, FINAL1, FINAL2",
            }),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One lifecycle notification as produced by the caller.
///
/// `seq_no` is minted by the producer and is opaque to the engine beyond the duplicate-by-count
/// check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notification {
    pub process_id: ProcessId,
    pub state: LifecycleState,
    pub seq_no: i32,
}

impl Notification {
    pub fn v1(process_id: ProcessId, state: LifecycleState, seq_no: i32) -> Self {
        Self {
            process_id,
            state,
            seq_no,
        }
    }

    /// Decodes `{"process_id": u64, "state": "START1", "seq_no": i32}`.
    pub fn from_json(json_text: &str) -> Result<Self, ContractViolation> {
        let value: Value =
            serde_json::from_str(json_text).map_err(|_| ContractViolation::InvalidValue {
                field: "notification_json",
                reason: "must be valid JSON",
            })?;
        let obj = value.as_object().ok_or(ContractViolation::InvalidValue {
            field: "notification_json",
            reason: "must be a JSON object",
        })?;

        let process_id = required_field(obj, "process_id", "notification_json.process_id")?
            .as_u64()
            .ok_or(ContractViolation::InvalidValue {
                field: "notification_json.process_id",
                reason: "must be a non-negative integer",
            })?;

        let state_name = required_field(obj, "state", "notification_json.state")?
            .as_str()
            .ok_or(ContractViolation::InvalidValue {
                field: "notification_json.state",
                reason: "must be a string",
            })?;
        let state = LifecycleState::from_wire_name(state_name)?;

        let seq_no = required_field(obj, "seq_no", "notification_json.seq_no")?
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or(ContractViolation::InvalidValue {
                field: "notification_json.seq_no",
                reason: "must be an integer within i32 range",
            })?;

        Ok(Self::v1(ProcessId(process_id), state, seq_no))
    }
}

fn required_field<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<&'a Value, ContractViolation> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(ContractViolation::MissingField { field }),
        Some(v) => Ok(v),
    }
}
