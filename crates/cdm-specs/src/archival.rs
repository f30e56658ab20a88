//! Archival locations

use crate::error::SpecError;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// S3 storage class of archived data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageClass {
    #[default]
    Standard,
    StandardIa,
    OnezoneIa,
    ReducedRedundancy,
    Glacier,
}

impl StorageClass {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageClass::Standard => "STANDARD",
            StorageClass::StandardIa => "STANDARD_IA",
            StorageClass::OnezoneIa => "ONEZONE_IA",
            StorageClass::ReducedRedundancy => "REDUCED_REDUNDANCY",
            StorageClass::Glacier => "GLACIER",
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// S3 archival location
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3ArchiveSpec {
    /// Archival location name shown in the appliance
    pub name: String,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default)]
    pub storage_class: StorageClass,
    /// KMS key used to encrypt archived data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_master_key_id: Option<String>,
}

impl S3ArchiveSpec {
    pub fn validate(&self, field: &str) -> Result<(), SpecError> {
        validation::non_empty(&format!("{}.name", field), &self.name)?;
        validation::bucket_name(&format!("{}.bucket", field), &self.bucket)?;
        validation::aws_region(&format!("{}.region", field), &self.region)?;
        validation::non_empty(&format!("{}.accessKey", field), &self.access_key)?;
        validation::non_empty(&format!("{}.secretKey", field), &self.secret_key)?;
        if let Some(key) = &self.kms_master_key_id {
            validation::non_empty(&format!("{}.kmsMasterKeyId", field), key)?;
        }
        Ok(())
    }
}

impl fmt::Debug for S3ArchiveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3ArchiveSpec")
            .field("name", &self.name)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("storage_class", &self.storage_class)
            .field("kms_master_key_id", &self.kms_master_key_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> S3ArchiveSpec {
        S3ArchiveSpec {
            name: "aws-archive".to_string(),
            bucket: "cdm-archive".to_string(),
            region: "us-east-1".to_string(),
            access_key: "AKIAEXAMPLE".to_string(),
            secret_key: "wJalrXUtnFEMI".to_string(),
            storage_class: StorageClass::StandardIa,
            kms_master_key_id: None,
        }
    }

    #[test]
    fn test_storage_class_wire_names() {
        let parsed: StorageClass = serde_yaml::from_str("ONEZONE_IA").unwrap();
        assert_eq!(parsed, StorageClass::OnezoneIa);
        assert_eq!(StorageClass::ReducedRedundancy.as_str(), "REDUCED_REDUNDANCY");
        assert!(serde_yaml::from_str::<StorageClass>("DEEP_FREEZE").is_err());
    }

    #[test]
    fn test_region_and_bucket_are_checked() {
        assert!(spec().validate("archivalLocations[0]").is_ok());

        let mut bad = spec();
        bad.region = "us-central-9".to_string();
        assert!(bad.validate("archivalLocations[0]").is_err());

        let mut bad = spec();
        bad.bucket = "Bad_Bucket".to_string();
        assert!(bad.validate("archivalLocations[0]").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        assert!(!format!("{:?}", spec()).contains("wJalrXUtnFEMI"));
    }
}
