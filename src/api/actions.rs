//! Asynchronous device actions such as charge commands.

// self
use crate::_prelude::*;

/// Lifecycle state of a device action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionState {
	/// Sent to the vendor, not yet confirmed.
	Pending,
	/// Vendor confirmed the device reached the target state.
	Confirmed,
	/// Action could not be completed.
	Failed,
	/// Superseded or cancelled before completion.
	Cancelled,
}
impl ActionState {
	/// Returns `true` once the action can no longer change state.
	pub const fn is_terminal(self) -> bool {
		!matches!(self, Self::Pending)
	}
}

/// Why an action failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
	/// Machine-readable failure type.
	#[serde(rename = "type")]
	pub kind: String,
	/// Human-readable explanation.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
}

/// Action issued against a device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAction {
	/// Action identifier.
	pub id: String,
	/// Owner of the target device.
	pub user_id: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last state change.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// Completion time, once terminal.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub completed_at: Option<OffsetDateTime>,
	/// Current state.
	pub state: ActionState,
	/// Target device identifier.
	pub target_id: String,
	/// Target device kind, e.g. `vehicle`.
	pub target_kind: String,
	/// Failure details for failed actions.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub failure_reason: Option<FailureReason>,
}
