//! Interfaces to the flow processor services.
//!
//! Each submodule defines the trait a backend implements for one SDK
//! service. The tools are written against these traits only, so the same
//! code drives real hardware bindings or the in-process simulation.
//!
//! - [`loadbalance`]: load-balance group destination masks
//! - [`rules`]: rule table sessions and cursors
//! - [`forwarding`]: forwarding domain and logical interface configuration

pub mod forwarding;
pub mod loadbalance;
pub mod rules;

pub use forwarding::{ForwardingHandle, ForwardingSubsystem};
pub use loadbalance::{GroupTable, LoadBalanceApi};
pub use rules::{AddrSpaceBinding, CursorOrder, Rule, RuleCursor, RuleSession, RulesApi};
