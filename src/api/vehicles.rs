//! Vehicles and charge control.

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	api::{Capability, DeviceAction, Location, Page, json_body},
	error::ErrorKind,
	http::ApiHttpClient,
	response::{ResourceMessages, ResponseTable, StatusRule},
	session::Session,
};

const MESSAGES: ResourceMessages = ResourceMessages {
	unauthorized: "vehicles: unauthorized access",
	general: "vehicles: unexpected server error",
	read: "vehicles: could not read response body",
	parse: "vehicles: unable to parse vehicle data",
};
const ACTION_MESSAGES: ResourceMessages =
	ResourceMessages { parse: "actions: unable to parse action data", ..MESSAGES };
const TRANSFER: StatusRule =
	StatusRule::new(502, ErrorKind::Transfer, "vehicles: could not transfer vehicle data");
const USER_NOT_FOUND: StatusRule =
	StatusRule::new(404, ErrorKind::ResourceNotFound, "users: no user with this id was found");
const VEHICLE_NOT_FOUND: StatusRule = StatusRule::new(
	404,
	ErrorKind::ResourceNotFound,
	"vehicles: no vehicle with this id was found",
);
const INVALID: StatusRule =
	StatusRule::new(400, ErrorKind::Validation, "vehicles: invalid request payload input");
const UNPROCESSABLE: StatusRule =
	StatusRule::new(422, ErrorKind::Validation, "vehicles: charging state cannot be changed");

const LIST: ResponseTable = ResponseTable::new(MESSAGES).with_overrides(&[TRANSFER]);
const LIST_FOR_USER: ResponseTable =
	ResponseTable::new(MESSAGES).with_overrides(&[USER_NOT_FOUND, TRANSFER]);
const GET: ResponseTable =
	ResponseTable::new(MESSAGES).with_overrides(&[VEHICLE_NOT_FOUND, TRANSFER]);
const CHARGING: ResponseTable = ResponseTable::new(ACTION_MESSAGES).with_overrides(&[
	VEHICLE_NOT_FOUND,
	INVALID,
	UNPROCESSABLE,
	TRANSFER,
]);

/// Electric vehicle linked through a vendor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
	/// Vehicle identifier.
	pub id: String,
	/// Owner of the vehicle.
	pub user_id: String,
	/// Vendor providing the vehicle, e.g. `TESLA`.
	#[serde(default)]
	pub vendor: String,
	/// Whether the vendor can currently reach the vehicle.
	#[serde(default)]
	pub is_reachable: bool,
	/// Last time the vehicle was seen by its vendor.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_seen: Option<OffsetDateTime>,
	/// Static vehicle details.
	#[serde(default)]
	pub information: VehicleInformation,
	/// Charging telemetry.
	#[serde(default)]
	pub charge_state: ChargeState,
	/// Odometer reading.
	#[serde(default)]
	pub odometer: Odometer,
	/// Last known position.
	#[serde(default)]
	pub location: Location,
	/// Features the vehicle supports through its vendor.
	#[serde(default)]
	pub capabilities: VehicleCapabilities,
}

/// Per-feature support of a vehicle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleCapabilities {
	/// Static details can be read.
	pub information: Capability,
	/// Charging telemetry can be read.
	pub charge_state: Capability,
	/// Position can be read.
	pub location: Capability,
	/// Odometer can be read.
	pub odometer: Capability,
	/// Charging can be started remotely.
	pub start_charging: Capability,
	/// Charging can be stopped remotely.
	pub stop_charging: Capability,
	/// Smart charging can be enabled.
	pub smart_charging: Capability,
}

/// Static vehicle details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInformation {
	/// Vehicle identification number.
	pub vin: Option<String>,
	/// Manufacturer brand.
	pub brand: Option<String>,
	/// Model name.
	pub model: Option<String>,
	/// Model year.
	pub year: Option<i32>,
	/// Name chosen by the owner.
	pub display_name: Option<String>,
}

/// Charging telemetry. Fields are `None` when the vendor does not report them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeState {
	/// State of charge in percent.
	pub battery_level: Option<f64>,
	/// Estimated range in kilometers.
	pub range: Option<f64>,
	/// Whether a cable is connected.
	pub is_plugged_in: Option<bool>,
	/// Whether the vehicle is charging.
	pub is_charging: Option<bool>,
	/// Whether the charge limit has been reached.
	pub is_fully_charged: Option<bool>,
	/// Usable battery capacity in kWh.
	pub battery_capacity: Option<f64>,
	/// Charge limit in percent.
	pub charge_limit: Option<f64>,
	/// Current charge rate in kW.
	pub charge_rate: Option<f64>,
	/// Minutes until the charge limit is reached.
	pub charge_time_remaining: Option<f64>,
	/// Time of the reading.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_updated: Option<OffsetDateTime>,
	/// Maximum charging current in amperes.
	pub max_current: Option<f64>,
	/// Vendor-reported power delivery state, e.g. `PLUGGED_IN:CHARGING`.
	pub power_delivery_state: Option<String>,
}

/// Odometer reading.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Odometer {
	/// Total distance in kilometers.
	pub distance: Option<f64>,
	/// Time of the reading.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_updated: Option<OffsetDateTime>,
}

/// Charge command accepted by a vehicle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleAction {
	/// Common action fields.
	#[serde(flatten)]
	pub action: DeviceAction,
	/// Action kind, e.g. `START` or `STOP`.
	pub kind: String,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum ChargeCommand {
	Start,
	Stop,
}

#[derive(Debug, Serialize)]
struct ChargeRequest {
	action: ChargeCommand,
}

impl<C> Session<C>
where
	C: ApiHttpClient,
{
	/// Lists every vehicle visible to the client, keyed by vehicle id.
	pub async fn list_vehicles(&self) -> Result<HashMap<String, Vehicle>> {
		let page: Page<Vehicle> =
			self.fetch("list_vehicles", Method::GET, &["vehicles"], None, &LIST).await?;

		Ok(page.into_map(|vehicle| vehicle.id.as_str()))
	}

	/// Lists the vehicles of one user, keyed by vehicle id.
	pub async fn list_user_vehicles(&self, user_id: &str) -> Result<HashMap<String, Vehicle>> {
		let page: Page<Vehicle> = self
			.fetch(
				"list_user_vehicles",
				Method::GET,
				&["users", user_id, "vehicles"],
				None,
				&LIST_FOR_USER,
			)
			.await?;

		Ok(page.into_map(|vehicle| vehicle.id.as_str()))
	}

	/// Fetches one vehicle.
	pub async fn get_vehicle(&self, vehicle_id: &str) -> Result<Vehicle> {
		self.fetch("get_vehicle", Method::GET, &["vehicles", vehicle_id], None, &GET).await
	}

	/// Asks the vehicle to start charging.
	pub async fn start_charging(&self, vehicle_id: &str) -> Result<VehicleAction> {
		self.control_charging("start_charging", vehicle_id, ChargeCommand::Start).await
	}

	/// Asks the vehicle to stop charging.
	pub async fn stop_charging(&self, vehicle_id: &str) -> Result<VehicleAction> {
		self.control_charging("stop_charging", vehicle_id, ChargeCommand::Stop).await
	}

	async fn control_charging(
		&self,
		stage: &'static str,
		vehicle_id: &str,
		action: ChargeCommand,
	) -> Result<VehicleAction> {
		let body = json_body(&ChargeRequest { action })?;

		self.fetch(stage, Method::POST, &["vehicles", vehicle_id, "charging"], Some(body), &CHARGING)
			.await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn vehicle_decodes_with_sparse_telemetry() {
		let vehicle = serde_json::from_str::<Vehicle>(
			r#"{
				"id": "v-1",
				"userId": "u-1",
				"vendor": "TESLA",
				"isReachable": true,
				"lastSeen": "2024-05-01T10:00:00Z",
				"information": { "brand": "Tesla", "model": "Model 3", "year": 2021 },
				"chargeState": { "batteryLevel": 71, "isCharging": false, "lastUpdated": null },
				"location": { "longitude": 10.75, "latitude": 59.91 },
				"capabilities": {
					"startCharging": { "isCapable": true, "interventionIds": [] },
					"stopCharging": { "isCapable": false, "interventionIds": ["intervention-1"] }
				}
			}"#,
		)
		.expect("Vehicle fixture should decode.");

		assert_eq!(vehicle.information.year, Some(2021));
		assert_eq!(vehicle.charge_state.battery_level, Some(71.0));
		assert_eq!(vehicle.odometer, Odometer::default());
		assert_eq!(vehicle.location.latitude, Some(59.91));
		assert!(vehicle.capabilities.start_charging.is_capable);
		assert_eq!(vehicle.capabilities.stop_charging.intervention_ids, ["intervention-1"]);
		assert_eq!(vehicle.capabilities.odometer, Capability::default());
	}

	#[test]
	fn charge_request_uses_uppercase_action() {
		let body = json_body(&ChargeRequest { action: ChargeCommand::Stop })
			.expect("Charge request should serialize.");

		assert_eq!(body, br#"{"action":"STOP"}"#);
	}
}
