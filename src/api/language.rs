//! Languages supported by the Link UI.

// self
use crate::_prelude::*;

/// Link UI language, serialized as an IETF tag such as `en-US`.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
	#[serde(rename = "da-DK")]
	Danish,
	#[serde(rename = "de-DE")]
	German,
	#[default]
	#[serde(rename = "en-US")]
	EnglishUs,
	#[serde(rename = "en-GB")]
	EnglishUk,
	#[serde(rename = "es-ES")]
	Spanish,
	#[serde(rename = "fi-FI")]
	Finnish,
	#[serde(rename = "fr-FR")]
	French,
	#[serde(rename = "it-IT")]
	Italian,
	#[serde(rename = "nb-NO")]
	Norwegian,
	#[serde(rename = "nl-NL")]
	DutchNetherlands,
	#[serde(rename = "nl-BE")]
	DutchBelgium,
	#[serde(rename = "pt-PT")]
	Portuguese,
	#[serde(rename = "ro-RO")]
	Romanian,
	#[serde(rename = "sv-SE")]
	Swedish,
}
