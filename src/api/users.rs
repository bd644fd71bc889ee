//! User accounts and their vendor links.

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	api::{Language, Page, Vendor, VendorType, json_body, vendors::UNKNOWN_VENDOR},
	error::ErrorKind,
	http::ApiHttpClient,
	response::{ResourceMessages, ResponseTable, StatusRule},
	session::Session,
};

const MESSAGES: ResourceMessages = ResourceMessages {
	unauthorized: "users: unauthorized access",
	general: "users: unexpected server error",
	read: "users: could not read response body",
	parse: "users: unable to parse user data",
};
const NOT_FOUND: StatusRule =
	StatusRule::new(404, ErrorKind::ResourceNotFound, "users: no user with this id was found");
const TRANSFER: StatusRule =
	StatusRule::new(502, ErrorKind::Transfer, "users: could not transfer user data");
const INVALID: StatusRule =
	StatusRule::new(400, ErrorKind::Validation, "users: invalid request payload input");
const CONNECTION_LIMIT: StatusRule =
	StatusRule::new(403, ErrorKind::ConnectionLimitReached, "users: connection limit reached");
const VENDOR_UNKNOWN: StatusRule = StatusRule::new(400, ErrorKind::UnknownVendor, UNKNOWN_VENDOR);

const LIST: ResponseTable = ResponseTable::new(MESSAGES).with_overrides(&[TRANSFER]);
const GET: ResponseTable = ResponseTable::new(MESSAGES).with_overrides(&[NOT_FOUND, TRANSFER]);
const LINK: ResponseTable =
	ResponseTable::new(MESSAGES).with_overrides(&[NOT_FOUND, INVALID, CONNECTION_LIMIT]);
const UNLINK: ResponseTable = LINK;
const DEAUTHORIZE: ResponseTable = ResponseTable::new(MESSAGES).with_overrides(&[NOT_FOUND]);
const DISCONNECT: ResponseTable =
	ResponseTable::new(MESSAGES).with_overrides(&[NOT_FOUND, VENDOR_UNKNOWN, CONNECTION_LIMIT]);

/// End user of the client application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// User identifier chosen by the client application.
	pub id: String,
	/// Creation time, when the API reports it.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Vendor accounts the user has linked.
	#[serde(default)]
	pub linked_vendors: Vec<Vendor>,
}

/// Parameters for a Link UI session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
	/// Skip vendor selection and link this vendor directly.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vendor: Option<String>,
	/// Asset category to link.
	pub vendor_type: VendorType,
	/// Link UI language.
	pub language: Language,
	/// Scopes the user is asked to grant.
	pub scopes: Vec<String>,
	/// Where the Link UI sends the user afterwards.
	pub redirect_uri: String,
	/// Link UI color scheme (`light`, `dark`, or `system`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color_scheme: Option<String>,
}
impl LinkRequest {
	/// Creates a request with the mandatory fields.
	pub fn new(
		vendor_type: VendorType,
		scopes: impl IntoIterator<Item = impl Into<String>>,
		redirect_uri: impl Into<String>,
	) -> Self {
		Self {
			vendor: None,
			vendor_type,
			language: Language::default(),
			scopes: scopes.into_iter().map(Into::into).collect(),
			redirect_uri: redirect_uri.into(),
			color_scheme: None,
		}
	}

	/// Preselects a vendor.
	pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
		self.vendor = Some(vendor.into());

		self
	}

	/// Sets the Link UI language.
	pub fn language(mut self, language: Language) -> Self {
		self.language = language;

		self
	}

	/// Sets the Link UI color scheme.
	pub fn color_scheme(mut self, scheme: impl Into<String>) -> Self {
		self.color_scheme = Some(scheme.into());

		self
	}
}

/// Short-lived, single-use Link UI session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAccess {
	/// URL presenting the Link UI in a browser.
	pub link_url: String,
	/// Token for presenting the Link UI through a mobile SDK.
	pub link_token: String,
}

impl<C> Session<C>
where
	C: ApiHttpClient,
{
	/// Lists users, keyed by user id.
	pub async fn list_users(&self) -> Result<HashMap<String, User>> {
		let page: Page<User> = self.fetch("list_users", Method::GET, &["users"], None, &LIST).await?;

		Ok(page.into_map(|user| user.id.as_str()))
	}

	/// Fetches one user.
	pub async fn get_user(&self, user_id: &str) -> Result<User> {
		self.fetch("get_user", Method::GET, &["users", user_id], None, &GET).await
	}

	/// Creates a Link UI session for `user_id` (the user is created on first link).
	pub async fn link_user(&self, user_id: &str, request: &LinkRequest) -> Result<LinkAccess> {
		let body = json_body(request)?;

		self.fetch("link_user", Method::POST, &["users", user_id, "link"], Some(body), &LINK).await
	}

	/// Deletes a user and all of their data.
	pub async fn unlink_user(&self, user_id: &str) -> Result<()> {
		self.execute("unlink_user", Method::DELETE, &["users", user_id], &UNLINK).await
	}

	/// Revokes every access token issued for a user.
	pub async fn deauthorize_user(&self, user_id: &str) -> Result<()> {
		self.execute(
			"deauthorize_user",
			Method::DELETE,
			&["users", user_id, "authorization"],
			&DEAUTHORIZE,
		)
		.await
	}

	/// Disconnects one vendor from a user, deleting the assets it provided.
	pub async fn disconnect_vendor(&self, user_id: &str, vendor: &str) -> Result<()> {
		self.execute(
			"disconnect_vendor",
			Method::DELETE,
			&["users", user_id, "vendors", vendor],
			&DISCONNECT,
		)
		.await
	}

	/// Disconnects one asset category of a vendor from a user.
	pub async fn disconnect_vendor_type(
		&self,
		user_id: &str,
		vendor: &str,
		vendor_type: VendorType,
	) -> Result<()> {
		self.execute(
			"disconnect_vendor_type",
			Method::DELETE,
			&["users", user_id, "vendors", vendor, vendor_type.as_str()],
			&DISCONNECT,
		)
		.await
	}
}
