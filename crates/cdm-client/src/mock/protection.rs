//! Protection operations for MockCdmClient
//!
//! Handles hosts, fileset templates, filesets and SLA Domain assignment

use super::MockCdmClient;
use crate::error::CdmError;
use crate::models::*;
use crate::resolver::{ObjectType, single_match};

pub async fn get_host_by_name(client: &MockCdmClient, hostname: &str) -> Result<Host, CdmError> {
    client.check("get_host_by_name")?;
    let hosts: Vec<Host> = client.hosts.lock().unwrap().values().cloned().collect();
    single_match(hosts, ObjectType::PhysicalHost, hostname, |h| h.hostname.as_str())
}

pub async fn register_host(client: &MockCdmClient, request: &RegisterHostRequest) -> Result<Host, CdmError> {
    client.check("register_host")?;
    client.record("register_host", &request.hostname);
    let host = Host {
        id: format!("Host:::{}", client.next_id()),
        hostname: request.hostname.clone(),
        operating_system: None,
        status: Some("Connected".to_string()),
    };
    client.hosts.lock().unwrap().insert(host.id.clone(), host.clone());
    Ok(host)
}

pub async fn get_fileset_template(
    client: &MockCdmClient,
    name: &str,
    operating_system_type: &str,
) -> Result<FilesetTemplate, CdmError> {
    client.check("get_fileset_template")?;
    let templates: Vec<FilesetTemplate> = client
        .templates
        .lock()
        .unwrap()
        .values()
        .filter(|t| t.operating_system_type.as_deref() == Some(operating_system_type))
        .cloned()
        .collect();
    single_match(templates, ObjectType::FilesetTemplate, name, |t| t.name.as_str())
}

pub async fn create_fileset_template(
    client: &MockCdmClient,
    request: &FilesetTemplateRequest,
) -> Result<FilesetTemplate, CdmError> {
    client.check("create_fileset_template")?;
    let exists = client
        .templates
        .lock()
        .unwrap()
        .values()
        .any(|t| t.name == request.name && t.operating_system_type.as_deref() == Some(request.operating_system_type.as_str()));
    if exists {
        return Err(CdmError::Api {
            status: 400,
            message: format!("A fileset template named '{}' already exists", request.name),
        });
    }

    client.record("create_fileset_template", &request.name);
    let template = FilesetTemplate {
        id: format!("FilesetTemplate:::{}", client.next_id()),
        name: request.name.clone(),
        operating_system_type: Some(request.operating_system_type.clone()),
        includes: request.includes.clone(),
        excludes: request.excludes.clone(),
        exceptions: request.exceptions.clone(),
    };
    client
        .templates
        .lock()
        .unwrap()
        .insert(template.id.clone(), template.clone());
    Ok(template)
}

pub async fn get_fileset(client: &MockCdmClient, host_id: &str, template_id: &str) -> Result<Fileset, CdmError> {
    client.check("get_fileset")?;
    client
        .filesets
        .lock()
        .unwrap()
        .values()
        .find(|f| f.host_id == host_id && f.template_id == template_id)
        .cloned()
        .ok_or_else(|| CdmError::NotFound(format!("fileset for host {} and template {}", host_id, template_id)))
}

pub async fn create_fileset(client: &MockCdmClient, host_id: &str, template_id: &str) -> Result<Fileset, CdmError> {
    client.check("create_fileset")?;
    let template_name = client
        .templates
        .lock()
        .unwrap()
        .get(template_id)
        .map(|t| t.name.clone())
        .ok_or_else(|| CdmError::NotFound(format!("fileset template {}", template_id)))?;

    client.record("create_fileset", &format!("{}/{}", host_id, template_id));
    let fileset = Fileset {
        id: format!("Fileset:::{}", client.next_id()),
        name: template_name,
        host_id: host_id.to_string(),
        template_id: template_id.to_string(),
        configured_sla_domain_id: Some(Assignment::Inherited),
    };
    client
        .filesets
        .lock()
        .unwrap()
        .insert(fileset.id.clone(), fileset.clone());
    Ok(fileset)
}

pub async fn vm_sla_assignment(client: &MockCdmClient, vm_id: &str) -> Result<Assignment, CdmError> {
    client.check("vm_sla_assignment")?;
    client
        .vm_assignment(vm_id)
        .ok_or_else(|| CdmError::NotFound(format!("VM {}", vm_id)))
}

pub async fn assign_vm_sla(client: &MockCdmClient, vm_id: &str, assignment: &Assignment) -> Result<VirtualMachine, CdmError> {
    client.check("assign_vm_sla")?;
    let mut vms = client.vms.lock().unwrap();
    let vm = vms
        .get_mut(vm_id)
        .ok_or_else(|| CdmError::NotFound(format!("VM {}", vm_id)))?;
    client.record("assign_vm_sla", vm_id);
    vm.configured_sla_domain_id = assignment.clone();
    Ok(vm.clone())
}

pub async fn fileset_sla_assignment(client: &MockCdmClient, fileset_id: &str) -> Result<Assignment, CdmError> {
    client.check("fileset_sla_assignment")?;
    client
        .filesets
        .lock()
        .unwrap()
        .get(fileset_id)
        .and_then(|f| f.configured_sla_domain_id.clone())
        .ok_or_else(|| CdmError::NotFound(format!("SLA assignment of fileset {}", fileset_id)))
}

pub async fn assign_fileset_sla(client: &MockCdmClient, fileset_id: &str, assignment: &Assignment) -> Result<Fileset, CdmError> {
    client.check("assign_fileset_sla")?;
    let mut filesets = client.filesets.lock().unwrap();
    let fileset = filesets
        .get_mut(fileset_id)
        .ok_or_else(|| CdmError::NotFound(format!("fileset {}", fileset_id)))?;
    client.record("assign_fileset_sla", fileset_id);
    fileset.configured_sla_domain_id = Some(assignment.clone());
    Ok(fileset.clone())
}
