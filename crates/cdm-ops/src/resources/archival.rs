//! Archival location reconciler

use super::{current_of, reject_conflict};
use crate::comparison::Comparison;
use crate::reconciler::{ReconciliationOutcome, reconcile_state};
use crate::state::DesiredState;
use cdm_client::{CdmClientTrait, CdmError, S3ArchiveRequest, TaskHandle};
use cdm_specs::S3ArchiveSpec;

/// Add an S3 archival location unless one with the same name exists
///
/// Only `accessKey` and `bucket` are compared; region and storage class of
/// an existing location are not checked. A location with the same name but a
/// different bucket or access key is a conflict and ends as `Failed`. Adding a
/// location starts an appliance job whose handle is returned.
pub async fn ensure_s3_archival_location(
    client: &dyn CdmClientTrait,
    spec: &S3ArchiveSpec,
) -> ReconciliationOutcome<TaskHandle> {
    let resource = format!("archival location {}", spec.name);
    try_outcome!(&resource, spec.validate("archivalLocation"));

    let request = S3ArchiveRequest {
        name: spec.name.clone(),
        bucket: spec.bucket.clone(),
        access_key: spec.access_key.clone(),
        secret_key: spec.secret_key.clone(),
        default_region: spec.region.clone(),
        storage_class: spec.storage_class.as_str().to_string(),
        object_store_type: "S3".to_string(),
        kms_master_key_id: spec.kms_master_key_id.clone(),
    };
    let desired = DesiredState::new()
        .with("name", spec.name.as_str())
        .with("bucket", spec.bucket.as_str())
        .with("accessKey", spec.access_key.as_str());
    let comparison = Comparison::fields(["accessKey", "bucket"]);
    let fetch = async {
        let location = client.get_archival_location(&spec.name).await?;
        reject_conflict(&resource, &desired, &comparison, current_of(&location.definition)?)
    };
    let apply = async {
        let job = client.add_s3_archival_location(&request).await?;
        Ok::<_, CdmError>(job.task_handle())
    };

    reconcile_state(&resource, &desired, fetch, &comparison, apply).await
}
