use std::collections::BTreeMap;

use tracing::debug;

use crate::controller::traits::{InteractionHub, InteractionKind, SubscriptionId};

/// In-process listener table used by the terminal host.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: BTreeMap<SubscriptionId, Vec<InteractionKind>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl InteractionHub for ListenerRegistry {
    fn subscribe(&mut self, kinds: &[InteractionKind]) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.insert(id, kinds.to_vec());
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.remove(&id);
    }

    fn listeners(&self, kind: InteractionKind) -> Vec<SubscriptionId> {
        self.listeners
            .iter()
            .filter(|(_, kinds)| kinds.contains(&kind))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// One-shot playback retry armed after the output refused to start.
#[derive(Debug, Default)]
pub struct AutoplayRetry {
    subscription: Option<SubscriptionId>,
}

impl AutoplayRetry {
    pub const TRIGGERS: [InteractionKind; 2] = [InteractionKind::Click, InteractionKind::Key];

    pub fn is_armed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn arm(&mut self, hub: &mut dyn InteractionHub) {
        if self.subscription.is_some() {
            return;
        }
        let id = hub.subscribe(&Self::TRIGGERS);
        debug!(subscription = id.0, "autoplay_retry_armed");
        self.subscription = Some(id);
    }

    pub fn disarm(&mut self, hub: &mut dyn InteractionHub) {
        if let Some(id) = self.subscription.take() {
            hub.unsubscribe(id);
            debug!(subscription = id.0, "autoplay_retry_disarmed");
        }
    }

    /// Consumes the subscription when `kind` reaches it. Returns whether the
    /// caller should retry playback.
    pub fn fire(&mut self, hub: &mut dyn InteractionHub, kind: InteractionKind) -> bool {
        let Some(id) = self.subscription else {
            return false;
        };
        if !hub.listeners(kind).contains(&id) {
            return false;
        }
        self.disarm(hub);
        true
    }
}
