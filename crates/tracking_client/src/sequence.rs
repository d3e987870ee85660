use std::collections::HashMap;

/// Remote resources whose responses must not be applied out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Symptoms,
    Triggers,
    Overview,
    EditEntry,
}

/// Hands out monotonic sequence numbers per resource and remembers the
/// newest one applied, so a slow response cannot overwrite a newer one.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: HashMap<ResourceKey, u64>,
    applied: HashMap<ResourceKey, u64>,
}

impl RequestSequencer {
    pub fn issue(&mut self, key: ResourceKey) -> u64 {
        let seq = self.issued.entry(key).or_insert(0);
        *seq += 1;
        *seq
    }

    /// Records `seq` as applied unless a newer response for `key` already was.
    pub fn try_apply(&mut self, key: ResourceKey, seq: u64) -> bool {
        match self.applied.get(&key) {
            Some(&last) if seq < last => false,
            _ => {
                self.applied.insert(key, seq);
                true
            }
        }
    }

    /// Treats a local mutation as the newest state, discarding any response
    /// for `key` issued before this call.
    pub fn supersede(&mut self, key: ResourceKey) {
        let seq = self.issue(key);
        self.applied.insert(key, seq);
    }
}
