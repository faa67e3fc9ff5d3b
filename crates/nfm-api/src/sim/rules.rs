use super::{SimOp, SimPlatform};
use crate::api::{CursorOrder, Rule, RuleCursor, RuleSession, RulesApi};
use crate::error::NfmResult;
use nfm_types::DeviceId;
use tracing::debug;

impl RulesApi for SimPlatform {
    fn rules_open(&self, device: DeviceId, queue_name: &str) -> NfmResult<Box<dyn RuleSession + '_>> {
        let mut state = self.inner.lock();
        state.begin(SimOp::RulesOpen { device })?;
        state.device(device)?;
        debug!(%device, queue_name, "rules session opened");
        Ok(Box::new(SimRuleSession {
            platform: self.clone(),
            device,
        }))
    }
}

/// Rules session on one simulated device. Logs a close when dropped.
struct SimRuleSession {
    platform: SimPlatform,
    device: DeviceId,
}

impl RuleSession for SimRuleSession {
    fn device(&self) -> DeviceId {
        self.device
    }

    fn open_cursor(&mut self, order: CursorOrder) -> NfmResult<Box<dyn RuleCursor + '_>> {
        let mut state = self.platform.inner.lock();
        state.begin(SimOp::RulesOpenCursor {
            device: self.device,
        })?;
        let mut rules = state.device(self.device)?.rules.clone();
        if order == CursorOrder::Priority {
            rules.sort_by_key(|rule| rule.priority);
        }
        drop(state);

        Ok(Box::new(SimRuleCursor {
            platform: &self.platform,
            device: self.device,
            rules,
            position: 0,
        }))
    }
}

impl Drop for SimRuleSession {
    fn drop(&mut self) {
        self.platform.inner.lock().calls.push(SimOp::RulesClose {
            device: self.device,
        });
    }
}

/// Cursor over a snapshot of the rule table taken when it was opened.
struct SimRuleCursor<'a> {
    platform: &'a SimPlatform,
    device: DeviceId,
    rules: Vec<Rule>,
    position: usize,
}

impl RuleCursor for SimRuleCursor<'_> {
    fn read(&mut self) -> NfmResult<Option<Rule>> {
        self.platform.inner.lock().begin(SimOp::RuleRead {
            device: self.device,
            position: self.position,
        })?;
        let rule = self.rules.get(self.position).cloned();
        if rule.is_some() {
            self.position += 1;
        }
        Ok(rule)
    }
}
