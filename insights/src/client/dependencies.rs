//! Shared dependency files (jars, wheels) deployed next to flows.

use reqwest::Method;
use serde_json::{json, Value};

use super::upload::upload_form;
use super::{Client, Expect};
use crate::error::Result;

const DEPENDENCY_RESOURCE: &str = "/api/v1/dependencies/";

/// Path of a deploy or undeploy call; no id targets every dependency.
pub(crate) fn action_path(action: &str, id: Option<&str>) -> String {
    format!("{DEPENDENCY_RESOURCE}{action}/{}", id.unwrap_or_default())
}

impl Client {
    /// Lists every dependency.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn list_dependencies(&self) -> Result<Value> {
        let builder = self.request(Method::GET, DEPENDENCY_RESOURCE);
        self.fetch("GetAllDependencies", builder, Expect::Status(200))
    }

    /// Fetches one dependency.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn get_dependency(&self, id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &format!("{DEPENDENCY_RESOURCE}{id}"));
        self.fetch("GetDependencyByID", builder, Expect::Status(200))
    }

    /// Uploads a dependency file. The service answers with an array.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` on 409 and `Api` on any other non-201 status.
    pub fn create_dependency(&self, dependency_type: &str, file_name: &str, location: &str) -> Result<Value> {
        let metadata = json!({ "type": dependency_type }).to_string();
        let form = upload_form(vec![("metadata", metadata)], file_name, location)?;
        let builder = self.request(Method::POST, DEPENDENCY_RESOURCE).multipart(form);
        self.fetch("PostDependency", builder, Expect::Create(201))
    }

    /// Deploys one dependency, or all of them when `id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn deploy_dependency(&self, id: Option<&str>) -> Result<()> {
        let builder = self.json_request(Method::POST, &action_path("deploy", id));
        self.send("DeployDependency", builder, Expect::Status(200))
    }

    /// Undeploys one dependency, or all of them when `id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-204 status.
    pub fn undeploy_dependency(&self, id: Option<&str>) -> Result<()> {
        let builder = self.json_request(Method::POST, &action_path("undeploy", id));
        self.send("UnDeployDependency", builder, Expect::Status(204))
    }

    /// Deletes a dependency.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-204 status.
    pub fn delete_dependency(&self, id: &str) -> Result<()> {
        let builder = self.json_request(Method::DELETE, &format!("{DEPENDENCY_RESOURCE}{id}"));
        self.send("DeleteDependencyByID", builder, Expect::Status(204))
    }
}
