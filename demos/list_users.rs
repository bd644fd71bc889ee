//! Connects with credentials from `ENODE_CLIENT_ID`/`ENODE_CLIENT_SECRET`, lists the linked users,
//! and prints their vehicles.
//!
//! `ENODE_ENVIRONMENT` selects `sandbox` (default), `production`, or a custom base URL.

// std
use std::{env, time::Duration};
// crates.io
use color_eyre::Result;
// self
use enode_client::{
	auth::Credentials,
	environment::Environment,
	session::{RefreshPolicy, Session},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let credentials = Credentials::from_env()?;
	let environment = env::var("ENODE_ENVIRONMENT")
		.ok()
		.map(|value| value.parse::<Environment>())
		.transpose()?
		.unwrap_or(Environment::Sandbox);
	let session = Session::builder(credentials, environment)
		.request_timeout(Duration::from_secs(10))
		.refresh_policy(RefreshPolicy::default().with_margin(Duration::from_secs(60)))
		.connect()
		.await?;
	let token = session.token();

	println!("Connected to {} (token scope: {}).", session.api_base(), token.scope);

	for (id, user) in session.list_users().await? {
		let created =
			user.created_at.map_or_else(|| "at an unknown time".to_owned(), |at| at.to_string());

		println!("{id}: created {created}, {} linked vendors", user.linked_vendors.len());

		for (vehicle_id, vehicle) in session.list_user_vehicles(&id).await? {
			let level = vehicle
				.charge_state
				.battery_level
				.map_or_else(|| "unknown".to_owned(), |level| format!("{level:.0}%"));

			println!("  {vehicle_id} ({}): battery {level}", vehicle.vendor);
		}
	}

	session.stop_refresh();

	Ok(())
}
