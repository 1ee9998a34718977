use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::model::Screen;

/// Fire-and-forget screen transitions. The core tracks the current screen
/// itself; the shell only renders the change.
pub struct Navigator<E> {
    context: CapabilityContext<NavigatorOperation, E>,
}

impl<Ev> Capability<Ev> for Navigator<Ev> {
    type Operation = NavigatorOperation;
    type MappedSelf<MappedEv> = Navigator<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Navigator::new(self.context.map_event(f))
    }
}

impl<E> Navigator<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<NavigatorOperation, E>) -> Self {
        Self { context }
    }

    pub fn push(&self, screen: Screen) {
        self.notify(NavigatorOperation::Push { screen });
    }

    pub fn back(&self) {
        self.notify(NavigatorOperation::Back);
    }

    fn notify(&self, operation: NavigatorOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NavigatorOperation {
    Push { screen: Screen },
    Back,
}

impl Operation for NavigatorOperation {
    type Output = ();
}
