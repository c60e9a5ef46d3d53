/*!

The per-VNR pipeline and the crate's public entry point.

`Engine::run_all` is the in-process entry point: it takes ownership of
iterating a VNR stream and exclusive access to a [`SubstrateState`], and
returns a [`RunReport`]. There is no suspension point inside a single
VNR's processing — node embedding, link embedding, and commit/rollback
run to completion before the next VNR begins, so the whole pipeline
stays sequential and lock-free.

*/

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::descriptor::VnrDescriptor;
use crate::error::{EngineError, Result};
use crate::ids::VlIndex;
use crate::metrics::{EmbeddingResult, MetricsAggregator, MetricsReport};
use crate::node_embedder;
use crate::substrate::{SnapshotToken, SubstrateState};
use crate::vnr::Vnr;
use crate::{link_embedder, ids};

/// Which objective the node embedder optimizes for. Only the
/// energy-and-overload-aware objective is implemented today; this enum
/// exists so a differently-scoped alternative can be added later without
/// changing `Engine::run_all`'s signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlgorithmChoice
{
	EnergyAware,
}

impl Default for AlgorithmChoice
{
	fn default() -> Self
	{
		AlgorithmChoice::EnergyAware
	}
}

/// The full result of processing a VNR stream: the aggregate report plus
/// every per-VNR outcome, in arrival order.
#[derive(Debug, Clone)]
pub struct RunReport
{
	pub metrics: MetricsReport,
	pub results: Vec<EmbeddingResult>,
}

impl RunReport
{
	/// Resolves every internal `EmbeddingResult` into the named §6
	/// boundary shape, against `state` as it stands when this is called
	/// (ordinarily right after `run_all` returns, so `final_graph`
	/// reflects the run's end state for every VNR in the stream).
	pub fn embedding_outputs(&self, state: &SubstrateState) -> Vec<crate::descriptor::EmbeddingOutput>
	{
		self.results.iter().map(|r| crate::descriptor::EmbeddingOutput::from_result(r, state)).collect()
	}
}

#[derive(Debug, Default)]
pub struct Engine
{
	aggregator: MetricsAggregator,
}

impl Engine
{
	pub fn new() -> Self
	{
		Self::default()
	}

	/// Processes every VNR in `vnrs`, in order, against `state`. Returns
	/// `Err` only for run-scoped failures (`InternalInvariantViolation`);
	/// every VNR-scoped failure is folded into a `success: false`
	/// `EmbeddingResult` and processing continues with the next VNR.
	pub fn run_all(
		mut self,
		state: &mut SubstrateState,
		vnrs: impl IntoIterator<Item = VnrDescriptor>,
		_algorithm: AlgorithmChoice,
	) -> Result<RunReport>
	{
		let initial_total_cpu = state.total_available_cpu();
		let initial_total_bandwidth = state.graph.total_available_bandwidth();
		let start = Instant::now();

		let mut results = Vec::new();
		for descriptor in vnrs
		{
			let num_vms = descriptor.vm_cpu_cores.len() as u64;
			let num_vls = descriptor.vm_links.len() as u64;
			let result = self.process_one(state, &descriptor)?;
			self.aggregator.fold_submission(num_vms, num_vls, &result);
			results.push(result);
		}

		let execution_time_seconds = start.elapsed().as_secs_f64();
		let metrics = self.aggregator.finalize(state, initial_total_cpu, initial_total_bandwidth, execution_time_seconds);
		Ok(RunReport { metrics, results })
	}

	/// Runs the full embedding pipeline for a single VNR. Node- and
	/// link-embedding failures are caught here and converted to a
	/// rejected outcome; only an invariant violation propagates.
	fn process_one(&self, state: &mut SubstrateState, descriptor: &VnrDescriptor) -> Result<EmbeddingResult>
	{
		let vnr_id = descriptor.id();
		let span = tracing::info_span!("embed_vnr", vnr = %vnr_id);
		let _enter = span.enter();

		let initial_total_bandwidth = state.graph.total_available_bandwidth();

		let vnr = match Vnr::from_descriptor(descriptor)
		{
			Ok(vnr) => vnr,
			Err(EngineError::MalformedVnr { reason, .. }) =>
			{
				tracing::warn!(reason, "rejecting malformed VNR");
				return Ok(EmbeddingResult::rejected(vnr_id, initial_total_bandwidth));
			}
			Err(other) => return Err(other),
		};

		let mut snapshot = SnapshotToken::default();

		let assignment = match node_embedder::embed_vms(state, &mut snapshot, &vnr)
		{
			Ok(assignment) => assignment,
			Err(EngineError::NoFeasibleHost { vm_index, .. }) =>
			{
				tracing::info!(vm_index, "no feasible host, rolling back");
				state.rollback(snapshot);
				return Ok(EmbeddingResult::rejected(vnr_id, initial_total_bandwidth));
			}
			Err(other) => return Err(other),
		};

		let mut paths = Vec::with_capacity(vnr.links.len());
		let mut cost = vnr.vm_cpu.iter().sum::<i64>() as f64;
		let mut revenue = cost;

		for (link_index, link) in vnr.links.iter().enumerate()
		{
			let src = assignment[&ids::VmIndex(link.i)];
			let dst = assignment[&ids::VmIndex(link.j)];
			let outcome = link_embedder::find_path(&state.graph, src.node(), dst.node(), link.bandwidth)
				.ok_or(EngineError::NoFeasiblePath { vnr: vnr_id, src, dst });
			match outcome
			{
				Ok(path) =>
				{
					state.debit_path(&mut snapshot, &path.edges, link.bandwidth);
					revenue += link.bandwidth as f64;
					cost += path.nodes.len() as f64 * link.bandwidth as f64;
					paths.push((VlIndex(link_index as u32), path.nodes));
				}
				Err(EngineError::NoFeasiblePath { src, dst, .. }) =>
				{
					tracing::info!(src = %src, dst = %dst, "no feasible path, rolling back");
					state.rollback(snapshot);
					return Ok(EmbeddingResult::rejected(vnr_id, initial_total_bandwidth));
				}
				Err(other) => return Err(other),
			}
		}

		state.check_capacity_invariant()?;
		state.commit(snapshot);
		let final_total_bandwidth = state.graph.total_available_bandwidth();
		tracing::info!(revenue, cost, "VNR committed");

		Ok(EmbeddingResult {
			vnr_id,
			success: true,
			vm_to_host: assignment,
			paths,
			revenue,
			cost,
			initial_total_bandwidth,
			final_total_bandwidth,
		})
	}
}
