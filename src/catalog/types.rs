use crate::auth::AccountId;
use crate::error::PactError;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

/// Schema maturity. Wire encoding: 0 = dev, 1 = prod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SchemaVersion {
    Dev,
    Prod,
}

impl From<SchemaVersion> for u8 {
    fn from(version: SchemaVersion) -> u8 {
        match version {
            SchemaVersion::Dev => 0,
            SchemaVersion::Prod => 1,
        }
    }
}

impl TryFrom<u8> for SchemaVersion {
    type Error = PactError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SchemaVersion::Dev),
            1 => Ok(SchemaVersion::Prod),
            other => Err(PactError::InvalidArgument(format!(
                "version must be 0 or 1 for dev, prod (got {})",
                other
            ))),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::Dev => write!(f, "dev"),
            SchemaVersion::Prod => write!(f, "prod"),
        }
    }
}

/// Delivery schedule. Wire encoding: 1 = daily, 2 = weekly, 3 = monthly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Schedule {
    Daily,
    Weekly,
    Monthly,
}

impl From<Schedule> for u8 {
    fn from(schedule: Schedule) -> u8 {
        match schedule {
            Schedule::Daily => 1,
            Schedule::Weekly => 2,
            Schedule::Monthly => 3,
        }
    }
}

impl TryFrom<u8> for Schedule {
    type Error = PactError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Schedule::Daily),
            2 => Ok(Schedule::Weekly),
            3 => Ok(Schedule::Monthly),
            other => Err(PactError::InvalidArgument(format!(
                "schedule must be 1, 2 or 3 for daily, weekly, monthly (got {})",
                other
            ))),
        }
    }
}

/// Request kind. Wire encoding: 0 = scheduled, 1 = ad-hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RequestType {
    Scheduled,
    Adhoc,
}

impl From<RequestType> for u8 {
    fn from(req_type: RequestType) -> u8 {
        match req_type {
            RequestType::Scheduled => 0,
            RequestType::Adhoc => 1,
        }
    }
}

impl TryFrom<u8> for RequestType {
    type Error = PactError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RequestType::Scheduled),
            1 => Ok(RequestType::Adhoc),
            other => Err(PactError::InvalidArgument(format!(
                "request type must be 0 or 1 for scheduled, ad-hoc (got {})",
                other
            ))),
        }
    }
}

/// A published data schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRecord {
    pub id: u64,
    /// Content pointer to the schema descriptor held off-chain
    pub descriptor_pointer: String,
    pub version: SchemaVersion,
    pub schedule: Schedule,
    pub scheduled_price: u8,
    pub adhoc_price: u8,
}

/// An outstanding data request referencing a provider's schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: u64,
    pub provider: AccountId,
    pub schema_id: u64,
    pub request_type: RequestType,
    pub query_payload: String,
    pub price: u8,
    /// Result hash, written back by the provider
    pub result_hash: String,
    /// Aggregation content pointer, written back by the provider
    pub aggregation_pointer: String,
    pub ts_created: Option<u64>,
    pub ts_updated: Option<u64>,
}

/// Singleton row holding the application's current public key pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppKeyRecord {
    pub public_key_pointer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_wire_encodings() {
        assert_eq!(u8::from(SchemaVersion::Dev), 0);
        assert_eq!(u8::from(SchemaVersion::Prod), 1);
        assert_eq!(u8::from(Schedule::Daily), 1);
        assert_eq!(u8::from(Schedule::Monthly), 3);
        assert_eq!(u8::from(RequestType::Scheduled), 0);
        assert_eq!(u8::from(RequestType::Adhoc), 1);
    }

    #[test]
    fn out_of_domain_codes_are_rejected() {
        assert!(SchemaVersion::try_from(2).is_err());
        assert!(Schedule::try_from(0).is_err());
        assert!(Schedule::try_from(4).is_err());
        assert!(RequestType::try_from(2).is_err());
    }

    #[test]
    fn records_serialize_with_numeric_enum_codes() {
        let record = SchemaRecord {
            id: 0,
            descriptor_pointer: "Qm123".to_string(),
            version: SchemaVersion::Dev,
            schedule: Schedule::Weekly,
            scheduled_price: 10,
            adhoc_price: 50,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["version"], 0);
        assert_eq!(json["schedule"], 2);
    }
}
