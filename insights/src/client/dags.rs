//! DAG upload, deployment and run status.
//!
//! DAG files are templates; see [`DagTemplate`] for the fields they may use.

use reqwest::Method;
use serde_json::Value;

use super::upload::{templated_form, DagTemplate, UploadMetadata};
use super::{Client, Expect};
use crate::error::Result;

const DAG_RESOURCE: &str = "/api/v1/dags";

/// Inputs of a DAG create or update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DagUpload {
    /// DAG name.
    pub name: String,
    /// Name the file is uploaded as.
    pub file_name: String,
    /// Local path of the DAG file.
    pub file_path: String,
    /// DAG version.
    pub version: String,
    /// Description.
    pub description: String,
    /// Flow type.
    pub flow_type: String,
    /// Values rendered into the file.
    pub template: DagTemplate,
}

pub(crate) fn status_path(name: &str, tail: &[&str]) -> String {
    let mut path = format!("{DAG_RESOURCE}/status/{name}");
    for segment in tail {
        path.push('/');
        path.push_str(segment);
    }
    path
}

impl Client {
    fn dag_metadata(&self, upload: &DagUpload) -> UploadMetadata {
        self.upload_metadata(
            &upload.name,
            &upload.version,
            &upload.description,
            &upload.flow_type,
        )
    }

    /// Lists every DAG of the tenant.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn list_dags(&self) -> Result<Value> {
        let builder = self.request(Method::GET, DAG_RESOURCE);
        self.fetch("GetAllDAGs", builder, Expect::Status(200))
    }

    /// Fetches one DAG by name.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn get_dag(&self, name: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &format!("{DAG_RESOURCE}/{name}"));
        self.fetch("GetDAG", builder, Expect::Status(200))
    }

    /// Uploads a new DAG and returns the created resource.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` on 409, `Api` on any other non-201 status and
    /// upload errors from reading or rendering the file.
    pub fn create_dag(&self, upload: &DagUpload) -> Result<Value> {
        let form = templated_form(
            &self.dag_metadata(upload),
            &upload.file_name,
            &upload.file_path,
            &upload.template,
        )?;
        let builder = self.request(Method::POST, DAG_RESOURCE).multipart(form);
        self.fetch("PostDAG", builder, Expect::Create(201))
    }

    /// Replaces an existing DAG's file and metadata.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-202 status.
    pub fn update_dag(&self, upload: &DagUpload) -> Result<()> {
        let form = templated_form(
            &self.dag_metadata(upload),
            &upload.file_name,
            &upload.file_path,
            &upload.template,
        )?;
        let builder = self
            .request(Method::POST, &format!("{DAG_RESOURCE}/{}", upload.name))
            .multipart(form);
        self.send("UpdateDAG", builder, Expect::Status(202))
    }

    /// Deletes a DAG.
    ///
    /// # Errors
    ///
    /// Returns `Api` unless the status is 200, 202 or 204.
    pub fn delete_dag(&self, name: &str) -> Result<()> {
        let builder = self.json_request(Method::DELETE, &format!("{DAG_RESOURCE}/{name}"));
        self.send("DeleteDAG", builder, Expect::OneOf(&[200, 202, 204]))
    }

    /// Deploys a DAG to the scheduler.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-202 status.
    pub fn deploy_dag(&self, name: &str) -> Result<()> {
        let builder = self.json_request(Method::POST, &format!("{DAG_RESOURCE}/{name}/deploy"));
        self.send("DeployDAG", builder, Expect::Status(202))
    }

    /// Status of every DAG.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn dag_statuses(&self) -> Result<Value> {
        let builder = self.request(Method::GET, &format!("{DAG_RESOURCE}/statusall"));
        self.fetch("GetAllDAGsAllStatuses", builder, Expect::Status(200))
    }

    /// Status of one DAG.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn dag_status(&self, name: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &status_path(name, &[]));
        self.fetch("GetDAGStatusByDAGName", builder, Expect::Status(200))
    }

    /// Runs of a DAG, or a single run when `run_id` is given.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn dag_runs(&self, name: &str, run_id: Option<&str>) -> Result<Value> {
        let (path, operation) = match run_id {
            Some(id) => (status_path(name, &["runs", id]), "GetRunByDAGNameAndRunID"),
            None => (status_path(name, &["runs"]), "GetRunsByDAGName"),
        };
        let builder = self.request(Method::GET, &path);
        self.fetch(operation, builder, Expect::Status(200))
    }

    /// Tasks of a DAG, or a single task when `task_id` is given.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn dag_tasks(&self, name: &str, task_id: Option<&str>) -> Result<Value> {
        let (path, operation) = match task_id {
            Some(id) => (
                status_path(name, &["tasks", id]),
                "GetAllTasksByDagNameAndTaskID",
            ),
            None => (status_path(name, &["tasks"]), "GetAllTasksByDagName"),
        };
        let builder = self.request(Method::GET, &path);
        self.fetch(operation, builder, Expect::Status(200))
    }

    /// One task instance of one run.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn dag_task_run(&self, name: &str, task_id: &str, run_id: &str) -> Result<Value> {
        let path = status_path(name, &["tasks", task_id, "runs", run_id]);
        let builder = self.request(Method::GET, &path);
        self.fetch("GetTaskRunInfo", builder, Expect::Status(200))
    }
}
