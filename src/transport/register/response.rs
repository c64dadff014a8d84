//! Register model response.
//!
//! Returned once a model registration has been accepted for asynchronous
//! processing or has completed. The model id is only known once the
//! registration path has assigned one.
//!
//! Binary layout (fixed order):
//! ```text
//! [vInt len][UTF-8 task_id]
//! [vInt len][UTF-8 status]
//! [presence byte][vInt len][UTF-8 model_id]   -- length and bytes omitted when absent
//! ```
//!
//! Document layout: `{"task_id": .., "status": .., "model_id": ..}` with
//! `model_id` omitted entirely when absent.

use std::io::{self, Read, Write};

use ml_stream::{
    DecodeError, Readable, StreamInput, StreamOutput, ToXContent, Writeable, XContentBuilder,
    XContentError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::task::TaskState;

pub const TASK_ID_FIELD: &str = "task_id";
pub const STATUS_FIELD: &str = "status";
pub const MODEL_ID_FIELD: &str = "model_id";

/// Outcome of submitting a model registration request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterModelResponse {
    /// Task tracking the registration
    task_id: String,

    /// Status label of the operation
    status: String,

    /// Registered model, once assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model_id: Option<String>,
}

impl RegisterModelResponse {
    /// Create a response whose model id has not been assigned.
    pub fn new(task_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self::with_model_id(task_id, status, None)
    }

    /// Create a response with an optional model id.
    pub fn with_model_id(
        task_id: impl Into<String>,
        status: impl Into<String>,
        model_id: Option<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            status: status.into(),
            model_id,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    /// The status as a known task state, or `None` for labels this crate
    /// does not recognise.
    pub fn task_state(&self) -> Option<TaskState> {
        TaskState::parse(&self.status)
    }

    /// Render the document and stringify it compactly.
    pub fn to_json_string(&self) -> Result<String, XContentError> {
        self.to_document().map(|doc| doc.to_string())
    }
}

impl Writeable for RegisterModelResponse {
    fn write_to<W: Write>(&self, out: &mut StreamOutput<W>) -> io::Result<()> {
        let start = out.position();
        out.write_string(&self.task_id)?;
        out.write_string(&self.status)?;
        out.write_optional_string(self.model_id.as_deref())?;
        trace!(
            task_id = %self.task_id,
            has_model_id = self.model_id.is_some(),
            bytes = out.position() - start,
            "encoded register model response"
        );
        Ok(())
    }
}

impl Readable for RegisterModelResponse {
    fn read_from<R: Read>(input: &mut StreamInput<R>) -> Result<Self, DecodeError> {
        let start = input.position();
        let task_id = in_field(input.read_string(), TASK_ID_FIELD)?;
        let status = in_field(input.read_string(), STATUS_FIELD)?;
        let model_id = in_field(input.read_optional_string(), MODEL_ID_FIELD)?;
        trace!(
            task_id = %task_id,
            has_model_id = model_id.is_some(),
            bytes = input.position() - start,
            "decoded register model response"
        );
        Ok(Self {
            task_id,
            status,
            model_id,
        })
    }
}

fn in_field<T>(result: Result<T, DecodeError>, field: &'static str) -> Result<T, DecodeError> {
    result.map_err(|err| {
        debug!(field, error = %err, "failed to decode register model response");
        err.in_field(field)
    })
}

impl ToXContent for RegisterModelResponse {
    fn to_xcontent(&self, builder: &mut XContentBuilder) -> Result<(), XContentError> {
        builder
            .start_object()?
            .field(TASK_ID_FIELD, self.task_id.as_str())?
            .field(STATUS_FIELD, self.status.as_str())?
            .optional_field(MODEL_ID_FIELD, self.model_id.as_deref())?
            .end_object()?;
        Ok(())
    }
}
