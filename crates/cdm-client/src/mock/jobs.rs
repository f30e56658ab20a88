//! Archival and job operations for MockCdmClient
//!
//! Job statuses are scripted per handle; jobs the mock starts itself follow
//! the default script.

use super::MockCdmClient;
use crate::error::CdmError;
use crate::models::*;
use crate::resolver::{ObjectType, single_match};

fn start_job(client: &MockCdmClient, kind: &str) -> AsyncRequest {
    let id = format!("{}_{}", kind, client.next_id());
    let script = client.default_job_script.lock().unwrap().clone();
    let first = script.first().cloned().unwrap_or(TaskStatus::Queued);
    client.script_job(id.clone(), script);
    AsyncRequest {
        id: id.clone(),
        status: first.to_string(),
        progress: None,
        start_time: None,
        end_time: None,
        node_id: None,
        error: None,
        links: Vec::new(),
    }
}

pub async fn get_archival_location(client: &MockCdmClient, name: &str) -> Result<ObjectStoreLocation, CdmError> {
    client.check("get_archival_location")?;
    let locations: Vec<ObjectStoreLocation> = client
        .archival_locations
        .lock()
        .unwrap()
        .values()
        .cloned()
        .collect();
    single_match(locations, ObjectType::ArchivalLocation, name, |l| l.definition.name.as_str())
}

pub async fn add_s3_archival_location(client: &MockCdmClient, request: &S3ArchiveRequest) -> Result<AsyncRequest, CdmError> {
    client.check("add_s3_archival_location")?;
    client.record("add_s3_archival_location", &request.name);
    let location = ObjectStoreLocation {
        id: format!("ArchivalLocation:::{}", client.next_id()),
        definition: ObjectStoreDefinition {
            name: request.name.clone(),
            bucket: request.bucket.clone(),
            access_key: request.access_key.clone(),
            default_region: Some(request.default_region.clone()),
            storage_class: Some(request.storage_class.clone()),
            object_store_type: Some(request.object_store_type.clone()),
        },
    };
    client.add_archival_location(location);
    Ok(start_job(client, "ADD_OBJECT_STORE"))
}

pub async fn vm_on_demand_snapshot(client: &MockCdmClient, vm_id: &str, _sla_id: Option<&str>) -> Result<AsyncRequest, CdmError> {
    client.check("vm_on_demand_snapshot")?;
    if !client.vms.lock().unwrap().contains_key(vm_id) {
        return Err(CdmError::NotFound(format!("VM {}", vm_id)));
    }
    client.record("vm_on_demand_snapshot", vm_id);
    Ok(start_job(client, "CREATE_VMWARE_SNAPSHOT"))
}

pub async fn job_status(client: &MockCdmClient, handle: &TaskHandle) -> Result<AsyncRequest, CdmError> {
    *client
        .job_polls
        .lock()
        .unwrap()
        .entry(handle.as_str().to_string())
        .or_insert(0) += 1;
    client.check("job_status")?;

    let mut jobs = client.jobs.lock().unwrap();
    let script = jobs
        .get_mut(handle.as_str())
        .ok_or_else(|| CdmError::NotFound(format!("job {}", handle)))?;
    let next = if script.len() > 1 { script.pop_front() } else { script.front().cloned() };
    let status = next.unwrap_or(TaskStatus::Queued);

    let error = match status {
        TaskStatus::Failed => Some(AsyncRequestError {
            message: format!("job {} failed", handle),
        }),
        _ => None,
    };
    Ok(AsyncRequest {
        id: handle.as_str().to_string(),
        status: status.to_string(),
        progress: None,
        start_time: None,
        end_time: None,
        node_id: None,
        error,
        links: Vec::new(),
    })
}
