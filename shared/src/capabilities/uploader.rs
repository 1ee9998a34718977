use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::event::SubmissionId;
use crate::upload::{MediaHandle, UploadFailure};

/// Hands one submission to the shell. The shell owns transport and timing:
/// it must resolve with `UploadFailure::TimedOut` once `timeout_ms` elapses.
pub struct Upload<E> {
    context: CapabilityContext<UploadOperation, E>,
}

impl<Ev> Capability<Ev> for Upload<Ev> {
    type Operation = UploadOperation;
    type MappedSelf<MappedEv> = Upload<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Upload::new(self.context.map_event(f))
    }
}

impl<E> Upload<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<UploadOperation, E>) -> Self {
        Self { context }
    }

    pub fn submit<F>(&self, request: UploadRequest, callback: F)
    where
        F: FnOnce(UploadResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(UploadOperation::Submit(request)).await;
            ctx.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadRequest {
    pub submission: SubmissionId,
    pub image: MediaHandle,
    pub timeout_ms: u64,
    pub simulated_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum UploadOperation {
    Submit(UploadRequest),
}

impl Operation for UploadOperation {
    type Output = UploadResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UploadReceipt {
    /// Where the shell stored the photo, when it knows.
    pub remote_uri: Option<String>,
}

pub type UploadResult = Result<UploadReceipt, UploadFailure>;
