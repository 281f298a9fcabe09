//! User profiles and the fixed attribute vocabulary.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProfileError;

/// Every attribute a profile can carry.
///
/// Serialized in camelCase (`firstName`, `zipCode`, ...), matching the keys
/// stored by the profile store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileAttribute {
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    Address,
    City,
    State,
    ZipCode,
    Country,
    Company,
    JobTitle,
    Linkedin,
    Github,
    Website,
    Portfolio,
    Skills,
    Experience,
    Education,
    Bio,
    CoverLetter,
    ResumeUrl,
    CardNumber,
    CardHolder,
    ExpiryDate,
    Cvv,
}

impl ProfileAttribute {
    /// All attributes in declaration order.
    pub const ALL: [ProfileAttribute; 26] = [
        Self::FirstName,
        Self::LastName,
        Self::FullName,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::State,
        Self::ZipCode,
        Self::Country,
        Self::Company,
        Self::JobTitle,
        Self::Linkedin,
        Self::Github,
        Self::Website,
        Self::Portfolio,
        Self::Skills,
        Self::Experience,
        Self::Education,
        Self::Bio,
        Self::CoverLetter,
        Self::ResumeUrl,
        Self::CardNumber,
        Self::CardHolder,
        Self::ExpiryDate,
        Self::Cvv,
    ];

    /// Wire key of this attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zipCode",
            Self::Country => "country",
            Self::Company => "company",
            Self::JobTitle => "jobTitle",
            Self::Linkedin => "linkedin",
            Self::Github => "github",
            Self::Website => "website",
            Self::Portfolio => "portfolio",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Bio => "bio",
            Self::CoverLetter => "coverLetter",
            Self::ResumeUrl => "resumeUrl",
            Self::CardNumber => "cardNumber",
            Self::CardHolder => "cardHolder",
            Self::ExpiryDate => "expiryDate",
            Self::Cvv => "cvv",
        }
    }

    /// Whether the attribute holds payment data that should not be echoed in logs.
    pub fn is_sensitive(&self) -> bool {
        matches!(
            self,
            Self::CardNumber | Self::CardHolder | Self::ExpiryDate | Self::Cvv
        )
    }
}

impl fmt::Display for ProfileAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileAttribute {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|attr| attr.as_str() == s)
            .ok_or_else(|| ProfileError::UnknownAttribute(s.to_string()))
    }
}

/// A named, read-only set of attribute values.
///
/// Absent attributes are never filled anywhere. Empty strings are treated as
/// absent so the matcher never has to distinguish between the two.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProfile")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    attributes: BTreeMap<ProfileAttribute, String>,
}

impl Profile {
    /// Create an empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, attribute: ProfileAttribute, value: impl Into<String>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Set an attribute. Blank values remove it.
    pub fn set(&mut self, attribute: ProfileAttribute, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.attributes.remove(&attribute);
        } else {
            self.attributes.insert(attribute, value);
        }
    }

    /// Get a present attribute value.
    pub fn get(&self, attribute: ProfileAttribute) -> Option<&str> {
        self.attributes.get(&attribute).map(String::as_str)
    }

    /// Whether the attribute is present.
    pub fn has(&self, attribute: ProfileAttribute) -> bool {
        self.attributes.contains_key(&attribute)
    }

    /// Number of present attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether no attribute is present.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate present attributes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ProfileAttribute, &str)> {
        self.attributes.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Parse a profile record from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ProfileError::InvalidRecord(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(RawProfile(map).into()),
            other => Err(ProfileError::InvalidRecord(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Flat profile record as stored: header keys plus attribute keys.
#[derive(Deserialize)]
#[serde(transparent)]
struct RawProfile(Map<String, Value>);

impl From<RawProfile> for Profile {
    fn from(raw: RawProfile) -> Self {
        let mut profile = Profile::default();
        for (key, value) in raw.0 {
            let Value::String(text) = value else {
                continue;
            };
            match key.as_str() {
                "id" => profile.id = Some(text),
                "name" => profile.name = text,
                _ => {
                    if let Ok(attribute) = key.parse::<ProfileAttribute>() {
                        profile.set(attribute, text);
                    }
                }
            }
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_round_trips_through_wire_key() {
        for attr in ProfileAttribute::ALL {
            assert_eq!(attr.as_str().parse::<ProfileAttribute>().unwrap(), attr);
            let json = serde_json::to_string(&attr).unwrap();
            assert_eq!(json, format!("\"{}\"", attr.as_str()));
        }
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let err = "favouriteColour".parse::<ProfileAttribute>().unwrap_err();
        assert!(err.to_string().contains("favouriteColour"));
    }

    #[test]
    fn test_profile_from_flat_record() {
        let profile = Profile::from_json(
            r#"{
                "id": "p1",
                "name": "Work",
                "firstName": "Ada",
                "email": "ada@example.com",
                "favouriteColour": "green",
                "phone": "",
                "age": 36
            }"#,
        )
        .unwrap();

        assert_eq!(profile.id.as_deref(), Some("p1"));
        assert_eq!(profile.name, "Work");
        assert_eq!(profile.get(ProfileAttribute::FirstName), Some("Ada"));
        assert_eq!(profile.get(ProfileAttribute::Email), Some("ada@example.com"));
        assert!(!profile.has(ProfileAttribute::Phone));
        assert_eq!(profile.len(), 2);
    }

    #[test]
    fn test_profile_rejects_non_object() {
        let err = Profile::from_json("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_blank_value_removes_attribute() {
        let mut profile = Profile::new("p").with(ProfileAttribute::City, "Oslo");
        assert!(profile.has(ProfileAttribute::City));
        profile.set(ProfileAttribute::City, "   ");
        assert!(!profile.has(ProfileAttribute::City));
        assert!(profile.is_empty());
    }

    #[test]
    fn test_profile_serializes_flat() {
        let profile = Profile::new("Home").with(ProfileAttribute::ZipCode, "0150");
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Home");
        assert_eq!(json["zipCode"], "0150");
        assert!(json.get("id").is_none());

        let back: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_sensitive_attributes() {
        assert!(ProfileAttribute::Cvv.is_sensitive());
        assert!(ProfileAttribute::CardNumber.is_sensitive());
        assert!(!ProfileAttribute::Email.is_sensitive());
    }
}
