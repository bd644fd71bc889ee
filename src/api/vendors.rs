//! Vendors linked to a user account.

// self
use crate::_prelude::*;

/// Message reported when the API does not recognize a vendor name.
pub const UNKNOWN_VENDOR: &str = "vendors: unknown vendor";

/// Category of assets a vendor provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorType {
	/// Electric vehicles.
	Vehicle,
	/// EV chargers.
	Charger,
	/// Heating, ventilation, and air conditioning.
	Hvac,
	/// Solar inverters.
	Inverter,
	/// Home batteries.
	Battery,
	/// Energy meters.
	Meter,
}
impl VendorType {
	/// Returns the wire label used in paths and payloads.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Vehicle => "vehicle",
			Self::Charger => "charger",
			Self::Hvac => "hvac",
			Self::Inverter => "inverter",
			Self::Battery => "battery",
			Self::Meter => "meter",
		}
	}
}
impl Display for VendorType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Vendor account linked to a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
	/// Vendor name, e.g. `TESLA`.
	#[serde(default)]
	pub vendor: String,
	/// Asset category provided by the vendor.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vendor_type: Option<VendorType>,
	/// Whether the stored vendor credentials are still valid.
	#[serde(default)]
	pub is_valid: bool,
}
