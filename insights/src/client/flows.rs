//! Flows addressed by name or id, direct uploads and config files.

use reqwest::Method;
use serde_json::{json, Value};

use super::upload::{multi_file_form, upload_form, FileDetails};
use super::{Client, Expect};
use crate::error::Result;

const FLOW_RESOURCE: &str = "/api/v1/flows";

/// Pages fetched by `pi flow list`.
pub const DEFAULT_FLOW_PAGES: u32 = 1;

/// Inputs of a direct flow upload (a flow without a template).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectFlowUpload {
    /// Flow name.
    pub name: String,
    /// Name the analytic file is uploaded as.
    pub file_name: String,
    /// Local path of the analytic file.
    pub file_path: String,
    /// Flow version.
    pub version: String,
    /// Description.
    pub description: String,
    /// Flow type.
    pub flow_type: String,
}

/// The `content` entries of one page, or none if the page is empty.
pub(crate) fn page_content(page: &Value) -> Vec<Value> {
    page.get("content")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

impl Client {
    /// Lists flows page by page, stopping at the first empty page or after
    /// `max_pages` pages.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status for any page.
    pub fn list_flows(&self, max_pages: u32) -> Result<Value> {
        let mut flows = Vec::new();
        for page in 0..max_pages {
            let builder = self
                .request(Method::GET, FLOW_RESOURCE)
                .query(&[("page", page)]);
            let content = page_content(&self.fetch("GetAllFlows", builder, Expect::Status(200))?);
            if content.is_empty() {
                break;
            }
            flows.extend(content);
        }
        Ok(Value::Array(flows))
    }

    /// Fetches one flow by name.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn get_flow(&self, name: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &format!("{FLOW_RESOURCE}/{name}"));
        self.fetch("GetFlow", builder, Expect::Status(200))
    }

    /// Stops a running flow.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-202 status.
    pub fn stop_flow(&self, name: &str) -> Result<()> {
        let builder = self.json_request(Method::POST, &format!("{FLOW_RESOURCE}/{name}/stop"));
        self.send("StopFlow", builder, Expect::Status(202))
    }

    /// Uploads a flow directly, without a template.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-201 status.
    pub fn create_direct_flow(&self, upload: &DirectFlowUpload) -> Result<Value> {
        let metadata = self
            .upload_metadata(&upload.name, &upload.version, &upload.description, &upload.flow_type)
            .to_field()?;
        let form = upload_form(vec![("metadata", metadata)], &upload.file_name, &upload.file_path)?;
        let builder = self.request(Method::POST, FLOW_RESOURCE).multipart(form);
        self.fetch("PostFlowDirectly", builder, Expect::Status(201))
    }

    /// Replaces the analytic file of a direct flow.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-2xx status.
    pub fn update_direct_flow(
        &self,
        flow_id: &str,
        description: &str,
        file_name: &str,
        file_path: &str,
    ) -> Result<Value> {
        let metadata = json!({ "description": description, "tags": [] }).to_string();
        let form = upload_form(vec![("metadata", metadata)], file_name, file_path)?;
        let builder = self
            .request(Method::POST, &format!("{FLOW_RESOURCE}/{flow_id}"))
            .multipart(form);
        self.fetch(
            "UpdateDirectFlowByFlowIDChangeAnalyticFile",
            builder,
            Expect::Success,
        )
    }

    /// Turns a flow into a new flow template.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-201 status.
    pub fn create_template_from_flow(&self, flow_id: &str) -> Result<Value> {
        let builder = self.json_request(
            Method::POST,
            &format!("{FLOW_RESOURCE}/{flow_id}/create-template"),
        );
        self.fetch("CreateFlowTemplateFromFlow", builder, Expect::Status(201))
    }

    /// Deletes a flow by id.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-204 status.
    pub fn delete_flow(&self, flow_id: &str) -> Result<()> {
        let builder = self.json_request(Method::DELETE, &format!("{FLOW_RESOURCE}/{flow_id}"));
        self.send("DeleteFlowByFlowIDOnly", builder, Expect::Status(204))
    }

    /// Adds config files to a flow in one multipart request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if a file cannot be read and `Api` on a non-2xx
    /// status.
    pub fn add_flow_config_files(&self, flow_id: &str, files: &[FileDetails]) -> Result<()> {
        let form = multi_file_form(files)?;
        let builder = self
            .request(Method::POST, &format!("{FLOW_RESOURCE}/{flow_id}/config"))
            .multipart(form);
        self.send("UpdateFlowByFlowIDAddConfigFile", builder, Expect::Success)
    }

    /// Lists the config files of a flow.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn list_flow_config_files(&self, flow_id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &format!("{FLOW_RESOURCE}/{flow_id}/config"));
        self.fetch("ListConfigFilesByFlowID", builder, Expect::Status(200))
    }

    /// Removes one config file from a flow.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-2xx status.
    pub fn delete_flow_config_file(&self, flow_id: &str, file_name: &str) -> Result<()> {
        let builder = self
            .json_request(Method::DELETE, &format!("{FLOW_RESOURCE}/{flow_id}/config"))
            .query(&[("file", file_name)]);
        self.send("UpdateFlowByFlowIDDeleteConfigFile", builder, Expect::Success)
    }
}
