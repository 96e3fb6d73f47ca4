//! Multipart upload bodies and the JSON payloads sent alongside them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use reqwest::blocking::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The `metadata` field sent with DAG, flow-template and direct-flow uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadMetadata {
    /// Artifact version.
    pub version: String,
    /// Uploading UAA client.
    pub user: String,
    /// Artifact name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Flow type, `SPARK_JAVA` or `SPARK_PYTHON`.
    #[serde(rename = "type")]
    pub flow_type: String,
    /// Always empty on upload; tags are saved separately.
    pub tags: Vec<String>,
}

impl UploadMetadata {
    /// Serializes the metadata as a form field value.
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialization fails.
    pub fn to_field(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Values substituted into a DAG file before upload.
///
/// The file refers to them as `{{.Owner}}`, `{{.FlowName}}` and
/// `{{.Interval}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DagTemplate {
    /// DAG owner.
    #[serde(rename = "Owner", alias = "owner", default)]
    pub owner: String,
    /// Flow the DAG triggers.
    #[serde(rename = "FlowName", alias = "flowName", default)]
    pub flow_name: String,
    /// Schedule interval.
    #[serde(rename = "Interval", alias = "interval", default)]
    pub interval: String,
}

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid placeholder pattern")
});

impl DagTemplate {
    /// Parses the `dagTemplate` option.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the text is not a JSON object.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Validation {
            field: "dagTemplate".into(),
            message: format!("invalid DAG template: {e}"),
        })
    }

    /// Replaces every placeholder in `content`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` naming the first placeholder that is not one of
    /// `Owner`, `FlowName` or `Interval`.
    ///
    /// # Examples
    ///
    /// ```
    /// use insights::client::DagTemplate;
    ///
    /// let template = DagTemplate {
    ///     owner: "ops".into(),
    ///     flow_name: "nightly".into(),
    ///     interval: "5".into(),
    /// };
    /// let rendered = template.render("owner='{{.Owner}}' every {{ .Interval }}").unwrap();
    /// assert_eq!(rendered, "owner='ops' every 5");
    /// ```
    pub fn render(&self, content: &str) -> Result<String> {
        let mut unknown = None;
        let rendered = PLACEHOLDER.replace_all(content, |caps: &Captures<'_>| {
            match &caps[1] {
                "Owner" => self.owner.clone(),
                "FlowName" => self.flow_name.clone(),
                "Interval" => self.interval.clone(),
                other => {
                    unknown.get_or_insert_with(|| other.to_string());
                    caps[0].to_string()
                }
            }
        });
        match unknown {
            Some(name) => Err(Error::Validation {
                field: "dagTemplate".into(),
                message: format!("DAG file uses unknown template field '{name}'"),
            }),
            None => Ok(rendered.into_owned()),
        }
    }
}

/// Spark settings of a flow or flow template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SparkArguments {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub application_args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_cores: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_executors: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spark_listeners: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_conf: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub executor_env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_java_options: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_java_options: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub confs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub system_props: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// The `{"sparkArguments": {..}}` body of spark-argument updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncapsulatedSparkArgs {
    /// The wrapped arguments.
    #[serde(rename = "sparkArguments", default)]
    pub spark_arguments: SparkArguments,
}

impl EncapsulatedSparkArgs {
    /// Parses the `sparkArgs` option.
    ///
    /// # Errors
    ///
    /// Returns `Validation` on malformed JSON.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Validation {
            field: "sparkArgs".into(),
            message: format!("invalid spark arguments: {e}"),
        })
    }
}

/// Parses the `tags` option, a JSON array of strings.
///
/// # Errors
///
/// Returns `Validation` on anything else.
pub fn parse_tags(json: &str) -> Result<Vec<String>> {
    serde_json::from_str(json).map_err(|e| Error::Validation {
        field: "tags".into(),
        message: format!("tags must be a JSON array of strings: {e}"),
    })
}

/// One file of a multi-file config upload, with its own form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileDetails {
    /// Name the file is uploaded as.
    #[serde(alias = "fileName")]
    pub file_name: String,
    /// Local path to read.
    #[serde(alias = "fileLocation")]
    pub file_location: String,
    /// Form field names sent before the file.
    #[serde(default, alias = "fields")]
    pub fields: Vec<String>,
    /// Values for `fields`, position by position.
    #[serde(default, alias = "values")]
    pub values: Vec<String>,
}

impl FileDetails {
    /// Parses the `configFileDetails` option, a JSON array of file entries.
    ///
    /// # Errors
    ///
    /// Returns `Validation` on malformed JSON, an empty list, or an entry
    /// whose fields and values differ in length.
    pub fn parse_list(json: &str) -> Result<Vec<Self>> {
        let details: Vec<Self> = serde_json::from_str(json).map_err(|e| Error::Validation {
            field: "configFileDetails".into(),
            message: format!("invalid config file details: {e}"),
        })?;
        if details.is_empty() {
            return Err(Error::Validation {
                field: "configFileDetails".into(),
                message: "at least one file is required".into(),
            });
        }
        for detail in &details {
            if detail.fields.len() != detail.values.len() {
                return Err(Error::Validation {
                    field: "configFileDetails".into(),
                    message: format!(
                        "'{}' has {} field(s) but {} value(s)",
                        detail.file_name,
                        detail.fields.len(),
                        detail.values.len()
                    ),
                });
            }
        }
        Ok(details)
    }
}

fn read_file(location: &str) -> Result<Vec<u8>> {
    fs::read(location).map_err(|e| Error::InvalidPath {
        path: Path::new(location).to_path_buf(),
        reason: format!("Failed to read upload file: {e}"),
    })
}

fn file_part(bytes: Vec<u8>, file_name: &str) -> Part {
    Part::bytes(bytes).file_name(file_name.to_string())
}

/// Builds a form of text fields followed by one file part named `file`.
///
/// # Errors
///
/// Returns `InvalidPath` if the file cannot be read.
pub fn upload_form(fields: Vec<(&'static str, String)>, file_name: &str, location: &str) -> Result<Form> {
    let bytes = read_file(location)?;
    let form = fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));
    Ok(form.part("file", file_part(bytes, file_name)))
}

/// Builds a DAG upload: metadata, then the rendered DAG file.
///
/// # Errors
///
/// Returns `InvalidPath` if the file cannot be read, `Validation` if the
/// file is not UTF-8 or uses an unknown placeholder.
pub fn templated_form(metadata: &UploadMetadata, file_name: &str, location: &str, template: &DagTemplate) -> Result<Form> {
    let bytes = read_file(location)?;
    let content = String::from_utf8(bytes).map_err(|_| Error::Validation {
        field: "dagFilePath".into(),
        message: format!("{location} is not a UTF-8 text file"),
    })?;
    let rendered = template.render(&content)?;
    Ok(Form::new()
        .text("metadata", metadata.to_field()?)
        .part("file", file_part(rendered.into_bytes(), file_name)))
}

/// Builds a multi-file upload: per file, its fields then a part `File<i>`.
///
/// # Errors
///
/// Returns `InvalidPath` if a file cannot be read.
pub fn multi_file_form(details: &[FileDetails]) -> Result<Form> {
    let mut form = Form::new();
    for (index, detail) in details.iter().enumerate() {
        let bytes = read_file(&detail.file_location)?;
        for (name, value) in detail.fields.iter().zip(&detail.values) {
            form = form.text(name.clone(), value.clone());
        }
        form = form.part(format!("File{index}"), file_part(bytes, &detail.file_name));
    }
    Ok(form)
}
