/*!

The engine's single error type, at every boundary.

Errors fall into two families. `MalformedTopology`
and `InternalInvariantViolation` are run-scoped: they can only ever reach
a caller as `Err` from [`crate::engine::Engine::run_all`] or
[`crate::substrate::SubstrateState::from_descriptor`], and a caller should
treat them as fatal. `MalformedVnr`, `NoFeasibleHost` and `NoFeasiblePath`
are VNR-scoped: the engine catches them internally and turns them into a
`success: false` [`crate::metrics::EmbeddingResult`], never propagating
them out of `run_all`. They remain variants of the same enum because
higher layers (logging, a CLI's exit-code mapping) still want to name them
uniformly.

*/

use thiserror::Error;

use crate::ids::{HostId, VnrId};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError
{
	/// The SN descriptor is internally inconsistent: fatal before any VNR runs.
	#[error("malformed substrate topology: {0}")]
	MalformedTopology(String),

	/// The VNR itself is structurally invalid (out-of-range VM index,
	/// negative bandwidth demand, duplicate virtual link). Fatal for that
	/// VNR only; no state is mutated for it.
	#[error("malformed VNR {vnr}: {reason}")]
	MalformedVnr
	{
		vnr: VnrId,
		reason: String,
	},

	/// No host could accommodate a VM of this VNR under the current
	/// substrate state. Triggers rollback of any VMs already tentatively
	/// placed for this VNR.
	#[error("no feasible host for VM{vm_index} of VNR {vnr}")]
	NoFeasibleHost
	{
		vnr: VnrId,
		vm_index: u32,
	},

	/// No bandwidth-feasible path exists between the hosts of a virtual
	/// link's endpoints. Triggers a full per-VNR rollback.
	#[error("no feasible path between {src} and {dst} for VNR {vnr}")]
	NoFeasiblePath
	{
		vnr: VnrId,
		src: HostId,
		dst: HostId,
	},

	/// One of the engine's core invariants was found violated. Indicates a bug in the engine
	/// itself; callers should abort the whole run rather than continue.
	#[error("internal invariant violated: {0}")]
	InternalInvariantViolation(String),
}

impl EngineError
{
	/// Run-scoped errors abort the whole pipeline; VNR-scoped ones are
	/// caught at the per-VNR boundary and never seen by `run_all`'s caller.
	pub fn is_fatal(&self) -> bool
	{
		matches!(self, EngineError::MalformedTopology(_) | EngineError::InternalInvariantViolation(_))
	}
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Helper used by invariant checks scattered through the engine; keeps
/// the call sites ([`crate::substrate`], [`crate::engine`]) terse.
pub fn invariant(condition: bool, message: impl Into<String>) -> Result<()>
{
	if condition
	{
		Ok(())
	}
	else
	{
		Err(EngineError::InternalInvariantViolation(message.into()))
	}
}
