//! Flow templates, the flows created from them, and their tags.

use reqwest::Method;
use serde_json::{json, Value};

use super::upload::{upload_form, EncapsulatedSparkArgs, UploadMetadata};
use super::{Client, Expect};
use crate::error::Result;

const FLOW_TEMPLATE_RESOURCE: &str = "/api/v1/flow-templates";

/// Inputs of a flow-template create or zip replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowTemplateUpload {
    /// Template name.
    pub name: String,
    /// Name the analytic file is uploaded as.
    pub file_name: String,
    /// Local path of the analytic file.
    pub file_path: String,
    /// Template version.
    pub version: String,
    /// Description.
    pub description: String,
    /// Flow type.
    pub flow_type: String,
}

pub(crate) fn template_path(id: &str, tail: &str) -> String {
    format!("{FLOW_TEMPLATE_RESOURCE}/{id}{tail}")
}

pub(crate) fn template_flow_path(template_id: &str, flow_id: &str, tail: &str) -> String {
    format!("{FLOW_TEMPLATE_RESOURCE}/{template_id}/flows/{flow_id}{tail}")
}

impl Client {
    pub(crate) fn upload_metadata(
        &self,
        name: &str,
        version: &str,
        description: &str,
        flow_type: &str,
    ) -> UploadMetadata {
        UploadMetadata {
            version: version.to_string(),
            user: self.credentials().client_id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            flow_type: flow_type.to_string(),
            tags: Vec::new(),
        }
    }

    fn flow_template_form(&self, upload: &FlowTemplateUpload) -> Result<reqwest::blocking::multipart::Form> {
        let metadata = self
            .upload_metadata(&upload.name, &upload.version, &upload.description, &upload.flow_type)
            .to_field()?;
        upload_form(vec![("metadata", metadata)], &upload.file_name, &upload.file_path)
    }

    /// Lists every flow template.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn list_flow_templates(&self) -> Result<Value> {
        let builder = self.request(Method::GET, &format!("{FLOW_TEMPLATE_RESOURCE}/"));
        self.fetch("GetAllFlowTemplates", builder, Expect::Status(200))
    }

    /// Fetches one flow template by id.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn get_flow_template(&self, id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &template_path(id, ""));
        self.fetch("GetFlowTemplate", builder, Expect::Status(200))
    }

    /// Finds flow templates by name.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn find_flow_templates(&self, name: &str) -> Result<Value> {
        let builder = self
            .request(Method::GET, FLOW_TEMPLATE_RESOURCE)
            .query(&[("name", name)]);
        self.fetch("GetFlowTemplateByName", builder, Expect::Status(200))
    }

    /// Uploads a new flow template.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` on 409 and `Api` on any other non-201 status.
    pub fn create_flow_template(&self, upload: &FlowTemplateUpload) -> Result<Value> {
        let form = self.flow_template_form(upload)?;
        let builder = self.request(Method::POST, FLOW_TEMPLATE_RESOURCE).multipart(form);
        self.fetch("PostFlowTemplate", builder, Expect::Create(201))
    }

    /// Replaces a flow template's analytic file and metadata.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-202 status, including 404 for an unknown
    /// template and 401 for an expired token.
    pub fn update_flow_template(&self, id: &str, upload: &FlowTemplateUpload) -> Result<()> {
        let form = self.flow_template_form(upload)?;
        let builder = self.request(Method::POST, &template_path(id, "")).multipart(form);
        self.send(
            "UpdateFlowTemplateByFlowTemplateIDUsingNewZip",
            builder,
            Expect::Status(202),
        )
    }

    /// Replaces a flow template's spark arguments.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-202 status.
    pub fn update_flow_template_spark_args(&self, id: &str, args: &EncapsulatedSparkArgs) -> Result<()> {
        let builder = self
            .json_request(Method::POST, &template_path(id, ""))
            .json(args);
        self.send(
            "UpdateFlowTemplateByFlowTemplateIDChangeSparkArguments",
            builder,
            Expect::Status(202),
        )
    }

    /// Deletes a flow template.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-204 status.
    pub fn delete_flow_template(&self, id: &str) -> Result<()> {
        let builder = self.json_request(Method::DELETE, &template_path(id, ""));
        self.send("DeleteFlowTemplate", builder, Expect::Status(204))
    }

    /// Tags of a flow template.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn flow_template_tags(&self, id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &template_path(id, "/tags"));
        self.fetch("GetTagsByFlowTemplateID", builder, Expect::Status(200))
    }

    /// Replaces the tags of a flow template.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-2xx status.
    pub fn save_flow_template_tags(&self, id: &str, tags: &[String]) -> Result<Value> {
        let builder = self
            .json_request(Method::POST, &template_path(id, "/tags"))
            .json(tags);
        self.fetch("SaveTagsForFlowTemplate", builder, Expect::Success)
    }

    /// Fetches a flow through its template.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn get_template_flow(&self, template_id: &str, flow_id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &template_flow_path(template_id, flow_id, ""));
        self.fetch("GetFlowByTemplateIDAndFlowID", builder, Expect::Status(200))
    }

    /// Lists the flows created from a template.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn list_template_flows(&self, template_id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &template_path(template_id, "/flows"));
        self.fetch("GetAllFlowsByTemplateID", builder, Expect::Status(200))
    }

    /// Creates a flow from a template.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-201 status.
    pub fn create_flow(&self, name: &str, template_id: &str) -> Result<Value> {
        let builder = self
            .json_request(Method::POST, &template_path(template_id, "/flows"))
            .json(&json!({ "name": name }));
        self.fetch("PostFlow", builder, Expect::Status(201))
    }

    /// Launches a flow, starting a new instance.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-202 status.
    pub fn launch_flow(&self, template_id: &str, flow_id: &str) -> Result<Value> {
        let builder =
            self.json_request(Method::POST, &template_flow_path(template_id, flow_id, "/launch"));
        self.fetch("LaunchFlow", builder, Expect::Status(202))
    }

    /// Replaces a flow's spark arguments.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-202 status.
    pub fn update_flow_spark_args(
        &self,
        template_id: &str,
        flow_id: &str,
        args: &EncapsulatedSparkArgs,
    ) -> Result<()> {
        let builder = self
            .json_request(Method::POST, &template_flow_path(template_id, flow_id, ""))
            .json(args);
        self.send("UpdateFlowChangeSparkArguments", builder, Expect::Status(202))
    }

    /// Tags of a flow.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn flow_tags(&self, template_id: &str, flow_id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &template_flow_path(template_id, flow_id, "/tags"));
        self.fetch("GetTagsForFlowByFlowTemplateIDAndFlowID", builder, Expect::Status(200))
    }

    /// Replaces the tags of a flow.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-2xx status.
    pub fn save_flow_tags(&self, template_id: &str, flow_id: &str, tags: &[String]) -> Result<Value> {
        let builder = self
            .json_request(Method::POST, &template_flow_path(template_id, flow_id, "/tags"))
            .json(tags);
        self.fetch("SaveTagsForFlow", builder, Expect::Success)
    }
}
