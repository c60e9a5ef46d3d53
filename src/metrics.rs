/*!

Per-VNR outcomes and the aggregate report.

[`MetricsAggregator`] only needs to accumulate simple running sums as
VNRs are processed — which hosts ended up used and how many links got
flipped are both read directly off the final [`SubstrateState`] once the
whole stream is done, since nothing in this engine ever un-commits a host
or un-flips a `link_used` bit after a successful VNR.

*/

use std::collections::HashMap;

use serde::Serialize;

use crate::ids::{HostId, NodeId, VlIndex, VmIndex, VnrId};
use crate::substrate::SubstrateState;

const P_IDLE: f64 = 150.0;
const P_FULL: f64 = 300.0;

/// Outcome of embedding a single VNR. `vm_to_host` and `paths` are
/// empty whenever `success` is false.
#[derive(Debug, Clone)]
pub struct EmbeddingResult
{
	pub vnr_id: VnrId,
	pub success: bool,
	pub vm_to_host: HashMap<VmIndex, HostId>,
	pub paths: Vec<(VlIndex, Vec<NodeId>)>,
	pub revenue: f64,
	pub cost: f64,
	/// Total undirected-edge `available_bw` immediately before this VNR
	/// was processed, per §6's per-VNR output shape.
	pub initial_total_bandwidth: i64,
	/// Same total immediately after this VNR's commit or rollback; equal
	/// to `initial_total_bandwidth` whenever the VNR was rejected, since
	/// rollback restores every debited edge.
	pub final_total_bandwidth: i64,
}

impl EmbeddingResult
{
	pub fn rejected(vnr_id: VnrId, total_bandwidth: i64) -> Self
	{
		EmbeddingResult {
			vnr_id,
			success: false,
			vm_to_host: HashMap::new(),
			paths: Vec::new(),
			revenue: 0.0,
			cost: 0.0,
			initial_total_bandwidth: total_bandwidth,
			final_total_bandwidth: total_bandwidth,
		}
	}
}

fn round2(x: f64) -> f64
{
	(x * 100.0).round() / 100.0
}

/// The aggregate report appended at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport
{
	pub vnr_count: u64,
	pub accepted_count: u64,
	pub acceptance_ratio: f64,

	pub total_hosts: u64,
	pub servers_used: u64,
	pub idle_servers: u64,

	pub total_edges: u64,
	pub links_used: u64,
	pub idle_links: u64,

	pub total_vms_submitted: u64,
	pub total_vls_submitted: u64,
	pub vms_embedded: u64,
	pub vls_embedded: u64,

	pub node_stress: f64,
	pub active_node_stress: f64,
	pub link_stress: f64,
	pub active_link_stress: f64,

	pub average_path_length: f64,

	pub initial_total_cpu: i64,
	pub final_total_cpu: i64,
	pub initial_total_bandwidth: i64,
	pub final_total_bandwidth: i64,

	/// `None` when no VNR was accepted ("N/A" in the original report).
	pub average_rc_ratio: Option<f64>,

	pub total_energy_watts: f64,
	pub embedded_energy_watts: f64,

	pub execution_time_seconds: f64,
}

/// Accumulates per-VNR outcomes across a run.
#[derive(Debug, Default)]
pub struct MetricsAggregator
{
	vnr_count: u64,
	accepted_count: u64,
	total_vms_submitted: u64,
	total_vls_submitted: u64,
	vms_embedded: u64,
	vls_embedded: u64,
	path_length_sum: u64,
	path_count: u64,
	rc_ratio_sum: f64,
	rc_ratio_count: u64,
}

impl MetricsAggregator
{
	pub fn new() -> Self
	{
		Self::default()
	}

	/// Folds one VNR's outcome in. Must be called exactly once per VNR,
	/// whether accepted or rejected — a rejected VNR contributes zero to
	/// revenue, cost, and every "used" set, which falls out naturally here
	/// since `result.paths`/`vm_to_host` are empty on rejection.
	/// `num_vms`/`num_vls` come from the raw descriptor, not the validated
	/// `Vnr`, so a malformed VNR still counts toward "submitted" totals.
	pub fn fold_submission(&mut self, num_vms: u64, num_vls: u64, result: &EmbeddingResult)
	{
		self.vnr_count += 1;
		self.total_vms_submitted += num_vms;
		self.total_vls_submitted += num_vls;

		if !result.success
		{
			return;
		}
		self.accepted_count += 1;
		self.vms_embedded += num_vms;
		self.vls_embedded += num_vls;
		for (_, path) in &result.paths
		{
			self.path_length_sum += path.len() as u64;
			self.path_count += 1;
		}
		if result.cost > 0.0
		{
			self.rc_ratio_sum += result.revenue / result.cost;
			self.rc_ratio_count += 1;
		}
	}

	/// Produces the final report. `initial_total_cpu`/`initial_total_bandwidth`
	/// must be captured from the substrate before the first VNR was
	/// processed; `state` is read as of the end of the run.
	pub fn finalize(
		self,
		state: &SubstrateState,
		initial_total_cpu: i64,
		initial_total_bandwidth: i64,
		execution_time_seconds: f64,
	) -> MetricsReport
	{
		let total_hosts = state.num_hosts() as u64;
		let servers_used = state.hosts().iter().filter(|h| !h.vms.is_empty()).count() as u64;
		let idle_servers = total_hosts - servers_used;

		let total_edges = state.graph.num_edges() as u64;
		let links_used = state.graph.link_used.iter().filter(|&&used| used).count() as u64;
		let idle_links = total_edges - links_used;

		let node_stress = if total_hosts > 0 { self.vms_embedded as f64 / total_hosts as f64 } else { 0.0 };
		let active_node_stress = if servers_used > 0 { self.vms_embedded as f64 / servers_used as f64 } else { 0.0 };
		let link_stress = if total_edges > 0 { self.vls_embedded as f64 / total_edges as f64 } else { 0.0 };
		let active_link_stress = if links_used > 0 { self.vls_embedded as f64 / links_used as f64 } else { 0.0 };

		let average_path_length = if self.path_count > 0 { self.path_length_sum as f64 / self.path_count as f64 } else { 0.0 };

		let average_rc_ratio = if self.rc_ratio_count > 0 { Some(self.rc_ratio_sum / self.rc_ratio_count as f64) } else { None };

		let mut total_energy_watts = 0.0;
		let mut embedded_energy_watts = 0.0;
		for host in state.hosts()
		{
			let o_h = host.original_cpu as f64;
			let c_h = host.available_cpu as f64;
			let e_h = if o_h > 0.0 { P_IDLE + (P_FULL - P_IDLE) * ((o_h - c_h) / o_h) } else { P_IDLE };
			total_energy_watts += e_h;
			if !host.vms.is_empty()
			{
				embedded_energy_watts += e_h;
			}
		}

		MetricsReport {
			vnr_count: self.vnr_count,
			accepted_count: self.accepted_count,
			acceptance_ratio: round2(100.0 * self.accepted_count as f64 / self.vnr_count.max(1) as f64),
			total_hosts,
			servers_used,
			idle_servers,
			total_edges,
			links_used,
			idle_links,
			total_vms_submitted: self.total_vms_submitted,
			total_vls_submitted: self.total_vls_submitted,
			vms_embedded: self.vms_embedded,
			vls_embedded: self.vls_embedded,
			node_stress: round2(node_stress),
			active_node_stress: round2(active_node_stress),
			link_stress: round2(link_stress),
			active_link_stress: round2(active_link_stress),
			average_path_length: round2(average_path_length),
			initial_total_cpu,
			final_total_cpu: state.total_available_cpu(),
			initial_total_bandwidth,
			final_total_bandwidth: state.graph.total_available_bandwidth(),
			average_rc_ratio: average_rc_ratio.map(round2),
			total_energy_watts: round2(total_energy_watts),
			embedded_energy_watts: round2(embedded_energy_watts),
			execution_time_seconds: round2(execution_time_seconds),
		}
	}
}
