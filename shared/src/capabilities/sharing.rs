use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The platform share sheet.
pub struct Sharing<E> {
    context: CapabilityContext<ShareOperation, E>,
}

impl<Ev> Capability<Ev> for Sharing<Ev> {
    type Operation = ShareOperation;
    type MappedSelf<MappedEv> = Sharing<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Sharing::new(self.context.map_event(f))
    }
}

impl<E> Sharing<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<ShareOperation, E>) -> Self {
        Self { context }
    }

    pub fn share_text<F>(&self, payload: String, callback: F)
    where
        F: FnOnce(ShareResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(ShareOperation::ShareText { payload })
                .await;
            ctx.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareOperation {
    ShareText { payload: String },
}

impl Operation for ShareOperation {
    type Output = ShareResult;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareOutput {
    Shared,
    Dismissed,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareError {
    #[error("sharing is not available on this device")]
    Unavailable,
    #[error("share failed: {message}")]
    Failed { message: String },
}

pub type ShareResult = Result<ShareOutput, ShareError>;
