//! Flow instances, their containers and logs, and the Spark UI proxy.

use std::fmt;

use reqwest::Method;
use serde_json::Value;

use super::{Client, Expect};
use crate::error::{Error, Result};

const INSTANCE_RESOURCE: &str = "/api/v1/instances";

/// Which container log stream to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerLogSink {
    /// Standard error, sink `0`.
    Stderr,
    /// Standard output, sink `1`.
    Stdout,
}

impl ContainerLogSink {
    /// Last path segment of the logs endpoint.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stderr => "stderr",
            Self::Stdout => "stdout",
        }
    }
}

impl fmt::Display for ContainerLogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for ContainerLogSink {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::Stderr),
            1 => Ok(Self::Stdout),
            other => Err(Error::Validation {
                field: "containerLogSink".into(),
                message: format!("invalid container log sink {other}, expected 0 (stderr) or 1 (stdout)"),
            }),
        }
    }
}

fn instance_path(instance_id: &str, tail: &str) -> String {
    format!("{INSTANCE_RESOURCE}/{instance_id}{tail}")
}

pub(crate) fn spark_path(instance_id: &str, segments: &[&str]) -> String {
    let mut path = instance_path(instance_id, "/sparkproxy/");
    path.push_str(&segments.join("/"));
    path
}

impl Client {
    /// Lists every instance.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn list_instances(&self) -> Result<Value> {
        let builder = self.request(Method::GET, INSTANCE_RESOURCE);
        self.fetch("GetAllInstances", builder, Expect::Status(200))
    }

    /// Fetches one instance.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn get_instance(&self, instance_id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &instance_path(instance_id, ""));
        self.fetch("GetInstance", builder, Expect::Status(200))
    }

    /// Lists the containers of an instance.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn list_containers(&self, instance_id: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &instance_path(instance_id, "/containers/"));
        self.fetch("GetAllInstanceContainers", builder, Expect::Status(200))
    }

    /// Stops an instance.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-2xx status.
    pub fn stop_instance(&self, instance_id: &str) -> Result<()> {
        let builder = self.json_request(Method::DELETE, &instance_path(instance_id, ""));
        self.send("StopInstance", builder, Expect::Success)
    }

    /// The log descriptor of one container.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn container_log_response(&self, instance_id: &str, container_id: &str) -> Result<Value> {
        let path = instance_path(instance_id, &format!("/containers/{container_id}/logs"));
        let builder = self.json_request(Method::GET, &path);
        self.fetch(
            "GetContainerLogsByInstanceIDAndContainerID",
            builder,
            Expect::Status(200),
        )
    }

    /// Raw text of one container log stream.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn container_logs(&self, instance_id: &str, container_id: &str, sink: ContainerLogSink) -> Result<String> {
        let path = instance_path(instance_id, &format!("/containers/{container_id}/logs/{sink}"));
        let builder = self.json_request(Method::GET, &path);
        Ok(self
            .execute("GetInstanceContainerLogs", builder, Expect::Status(200))?
            .body)
    }

    /// Raw text of the spark-submit log.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn submit_logs(&self, instance_id: &str) -> Result<String> {
        let builder = self.json_request(Method::GET, &instance_path(instance_id, "/submit-logs"));
        Ok(self
            .execute("GetInstanceSubmitLogsByInstanceID", builder, Expect::Status(200))?
            .body)
    }

    fn spark_proxy(&self, operation: &str, instance_id: &str, segments: &[&str]) -> Result<Value> {
        let builder = self.request(Method::GET, &spark_path(instance_id, segments));
        self.fetch(operation, builder, Expect::Status(200))
    }

    /// Spark application details of an instance.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn spark_application(&self, instance_id: &str) -> Result<Value> {
        self.spark_proxy("GetSparkApplicationDetails", instance_id, &[])
    }

    /// Executors of one application attempt.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn spark_executors(&self, instance_id: &str, attempt_id: &str) -> Result<Value> {
        self.spark_proxy("GetSparkExecutorDetails", instance_id, &[attempt_id, "executors"])
    }

    /// Stages of one application attempt.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn spark_stages(&self, instance_id: &str, attempt_id: &str) -> Result<Value> {
        self.spark_proxy("GetAllStagesOfApplicationInstance", instance_id, &[attempt_id, "stages"])
    }

    /// Attempts of one stage.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn spark_stage_attempts(&self, instance_id: &str, attempt_id: &str, stage_id: &str) -> Result<Value> {
        self.spark_proxy(
            "GetAllAttemptsByStage",
            instance_id,
            &[attempt_id, "stages", stage_id],
        )
    }

    /// Details of one stage attempt.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn spark_stage_attempt(
        &self,
        instance_id: &str,
        attempt_id: &str,
        stage_id: &str,
        stage_attempt_id: &str,
    ) -> Result<Value> {
        self.spark_proxy(
            "GetStageAttemptDetails",
            instance_id,
            &[attempt_id, "stages", stage_id, stage_attempt_id],
        )
    }

    /// Tasks of one stage attempt.
    ///
    /// # Errors
    ///
    /// Returns `Api` on a non-200 status.
    pub fn spark_tasks(
        &self,
        instance_id: &str,
        attempt_id: &str,
        stage_id: &str,
        stage_attempt_id: &str,
    ) -> Result<Value> {
        self.spark_proxy(
            "GetAllTasksByStage",
            instance_id,
            &[attempt_id, "stages", stage_id, stage_attempt_id, "taskList"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_from_int() {
        assert_eq!(ContainerLogSink::try_from(0).unwrap(), ContainerLogSink::Stderr);
        assert_eq!(ContainerLogSink::try_from(1).unwrap(), ContainerLogSink::Stdout);
        let err = ContainerLogSink::try_from(2).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "containerLogSink"));
    }

    #[test]
    fn test_sink_display() {
        assert_eq!(ContainerLogSink::Stderr.to_string(), "stderr");
        assert_eq!(ContainerLogSink::Stdout.to_string(), "stdout");
    }

    #[test]
    fn test_spark_paths() {
        assert_eq!(spark_path("i1", &[]), "/api/v1/instances/i1/sparkproxy/");
        assert_eq!(
            spark_path("i1", &["a1", "stages", "3", "0", "taskList"]),
            "/api/v1/instances/i1/sparkproxy/a1/stages/3/0/taskList"
        );
    }
}
