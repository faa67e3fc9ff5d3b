//! ForwardingConfigurator - builds a forwarding domain over physical ports
//!
//! Configuration flow:
//! 1. Open the platform's forwarding subsystem
//! 2. Optionally clear existing interfaces, bridges and routers
//! 3. Create the domain
//! 4. Per interface: configure, set address space, attach
//! 5. Commit once
//! 6. Per interface tuning (MTU, frame type, rate limit)
//! 7. Close
//!
//! Steps 2-4 are staged and take effect at the commit. The first failing
//! step aborts the run; the handle is still closed before the error is
//! returned.

use std::fmt;
use std::io::Write;
use tracing::{debug, info, instrument, warn};

use nfm_api::api::{ForwardingHandle, ForwardingSubsystem};
use nfm_api::{IntfKind, LogIntfId, NfmError, NfmResult};
use nfm_tool_common::{ToolError, ToolResult};

use crate::types::{ForwardingPlan, LogIntfSpec};

/// Last step a configuration run completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Open,
    Cleared,
    DomainCreated,
    Configured(LogIntfId),
    AddrSpaceSet(LogIntfId),
    Attached(LogIntfId),
    Committed,
    Tuned(LogIntfId),
    Closed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::Open => write!(f, "open"),
            Stage::Cleared => write!(f, "cleared"),
            Stage::DomainCreated => write!(f, "domain created"),
            Stage::Configured(lif) => write!(f, "lif{} configured", lif),
            Stage::AddrSpaceSet(lif) => write!(f, "lif{} address space set", lif),
            Stage::Attached(lif) => write!(f, "lif{} attached", lif),
            Stage::Committed => write!(f, "committed"),
            Stage::Tuned(lif) => write!(f, "lif{} tuned", lif),
            Stage::Closed => write!(f, "closed"),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardingReport {
    pub interfaces: usize,
    /// Rate limits read back after setting them.
    pub rate_limits: Vec<(LogIntfId, u32)>,
}

/// Owns an open handle and closes it when dropped.
///
/// Close errors on the drop path are logged; the error that caused the
/// abort is the one reported.
struct OpenHandle<H: ForwardingHandle> {
    handle: Option<H>,
}

impl<H: ForwardingHandle> OpenHandle<H> {
    fn get(&mut self) -> NfmResult<&mut H> {
        self.handle
            .as_mut()
            .ok_or_else(|| NfmError::uninitialized("forwarding handle already closed"))
    }

    fn close(mut self) -> NfmResult<()> {
        match self.handle.take() {
            Some(handle) => handle.close(),
            None => Ok(()),
        }
    }
}

impl<H: ForwardingHandle> Drop for OpenHandle<H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Closing forwarding configuration subsystem after error");
            if let Err(e) = handle.close() {
                warn!("Error 0x{:08x} closing forwarding: {}", e.raw(), e);
            }
        }
    }
}

/// Applies [`ForwardingPlan`]s through a forwarding subsystem.
pub struct ForwardingConfigurator<S> {
    subsystem: S,
    stage: Stage,
}

impl<S: ForwardingSubsystem> ForwardingConfigurator<S> {
    pub fn new(subsystem: S) -> Self {
        Self {
            subsystem,
            stage: Stage::Idle,
        }
    }

    /// Last step completed by the most recent run.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn subsystem(&self) -> &S {
        &self.subsystem
    }

    /// Runs `plan`, writing a progress line per step to `out`.
    #[instrument(skip_all, fields(domain = %plan.domain, mode = %plan.mode))]
    pub fn apply(&mut self, plan: &ForwardingPlan, out: &mut dyn Write) -> ToolResult<ForwardingReport> {
        self.stage = Stage::Idle;

        writeln!(out, "Open forwarding configuration subsystem")?;
        let handle = self
            .subsystem
            .open_platform()
            .map_err(|source| ToolError::SubsystemUnavailable { source })?;
        let mut handle = OpenHandle {
            handle: Some(handle),
        };
        self.stage = Stage::Open;

        let report = self.configure(handle.get().map_err(|e| ToolError::config("open", e))?, plan, out)?;

        writeln!(out, "Close forwarding configuration subsystem")?;
        handle
            .close()
            .map_err(|e| ToolError::config("closing forwarding configuration subsystem", e))?;
        self.stage = Stage::Closed;

        info!(
            "Domain {} configured with {} interfaces",
            plan.domain,
            plan.interfaces.len()
        );
        Ok(report)
    }

    fn configure(
        &mut self,
        fwd: &mut S::Handle,
        plan: &ForwardingPlan,
        out: &mut dyn Write,
    ) -> ToolResult<ForwardingReport> {
        if plan.clear {
            writeln!(out, "Clear existing configuration (if any)")?;
            fwd.clear()
                .map_err(|e| ToolError::config("clearing existing configuration", e))?;
            self.stage = Stage::Cleared;
        }

        writeln!(out, "Configure {} domain with ID {}", plan.mode, plan.domain)?;
        fwd.configure_domain(plan.domain, plan.mode).map_err(|e| {
            ToolError::config(format!("configuring {} domain {}", plan.mode, plan.domain), e)
        })?;
        self.stage = Stage::DomainCreated;

        for spec in &plan.interfaces {
            self.stage_interface(fwd, plan, spec, out)?;
        }

        writeln!(out, "Commit changes to the NFE card(s) in the platform")?;
        fwd.commit().map_err(|e| ToolError::config("commit", e))?;
        self.stage = Stage::Committed;

        let mut report = ForwardingReport {
            interfaces: plan.interfaces.len(),
            rate_limits: Vec::new(),
        };
        for spec in &plan.interfaces {
            if let Some(limit) = self.tune_interface(fwd, plan, spec.lif, out)? {
                report.rate_limits.push((spec.lif, limit));
            }
        }
        Ok(report)
    }

    fn stage_interface(
        &mut self,
        fwd: &mut S::Handle,
        plan: &ForwardingPlan,
        spec: &LogIntfSpec,
        out: &mut dyn Write,
    ) -> ToolResult<()> {
        let lif = spec.lif;

        match spec.vlan {
            nfm_types::VlanTag::Untagged => writeln!(
                out,
                "Configure logical interface {} to represent physical port {}",
                lif, spec.port
            )?,
            tagged => writeln!(
                out,
                "Configure logical interface {} to represent physical port {} {}",
                lif, spec.port, tagged
            )?,
        }
        fwd.configure_log_intf(lif, spec.port, spec.vlan).map_err(|e| {
            ToolError::config(
                format!("configuring logical interface {} on physical port {}", lif, spec.port),
                e,
            )
        })?;
        self.stage = Stage::Configured(lif);

        writeln!(out, "Assign logical interface {} to address space ID {}", lif, plan.domain)?;
        fwd.intf_set_addr_space(IntfKind::Logical, lif, plan.domain.as_u32())
            .map_err(|e| {
                ToolError::config(
                    format!("assigning logical interface {} to address space {}", lif, plan.domain),
                    e,
                )
            })?;
        self.stage = Stage::AddrSpaceSet(lif);

        writeln!(out, "Attach logical interface {} to domain {}", lif, plan.domain)?;
        fwd.attach_log_intf(plan.domain, lif).map_err(|e| {
            ToolError::config(
                format!("attaching logical interface {} to domain {}", lif, plan.domain),
                e,
            )
        })?;
        self.stage = Stage::Attached(lif);
        Ok(())
    }

    /// Applies post-commit settings. Returns the rate limit read back, if
    /// one was set.
    fn tune_interface(
        &mut self,
        fwd: &mut S::Handle,
        plan: &ForwardingPlan,
        lif: LogIntfId,
        out: &mut dyn Write,
    ) -> ToolResult<Option<u32>> {
        if !plan.has_tuning() {
            return Ok(None);
        }

        if let Some(mtu) = plan.mtu {
            writeln!(out, "Setting MTU of lif{} to {}", lif, mtu)?;
            fwd.intf_set_mtu(IntfKind::Logical, lif, mtu)
                .map_err(|e| ToolError::config(format!("setting MTU of lif{}", lif), e))?;
        }

        if !plan.frame_type.is_default() {
            writeln!(out, "Setting frame type of lif{} to {}", lif, plan.frame_type)?;
            fwd.intf_set_frame_type(IntfKind::Logical, lif, plan.frame_type)
                .map_err(|e| ToolError::config(format!("setting frame type of lif{}", lif), e))?;
        }

        let mut readback = None;
        if let Some(limit) = plan.l3ex_rate_limit {
            writeln!(out, "Setting lif{} rate limit to {}", lif, limit)?;
            fwd.intf_set_l3ex_ratelim(lif, limit)
                .map_err(|e| ToolError::config(format!("setting lif{} rate limit", lif), e))?;

            writeln!(out, "Reading back lif{} rate limit to verify", lif)?;
            let actual = fwd
                .intf_get_l3ex_ratelim(lif)
                .map_err(|e| ToolError::config(format!("reading back lif{} rate limit", lif), e))?;
            writeln!(out, "L3 exception rate limit for lif{} is {}", lif, actual)?;
            if actual != limit {
                warn!("lif{} rate limit reads back as {}, expected {}", lif, actual, limit);
            }
            readback = Some(actual);
        }

        self.stage = Stage::Tuned(lif);
        Ok(readback)
    }
}
