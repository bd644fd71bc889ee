//! Building blocks shared by device models.

// self
use crate::_prelude::*;

/// Whether a device supports a feature, and which interventions would enable it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
	/// Interventions the user can take to unlock the capability.
	#[serde(default)]
	pub intervention_ids: Vec<String>,
	/// Whether the device currently supports the capability.
	#[serde(default)]
	pub is_capable: bool,
}

/// Last known position of a device.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
	/// Longitude in degrees.
	pub longitude: Option<f64>,
	/// Latitude in degrees.
	pub latitude: Option<f64>,
	/// Time of the reading.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_updated: Option<OffsetDateTime>,
}
