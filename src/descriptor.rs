/*!

The wire shapes crossing the external boundary: the SN descriptor, the
VNR descriptor, the per-VNR embedding output, and the aggregate metrics
row. These are plain `serde` data — no embedding logic lives here.

Per-host entries are nested under a `hosts` map keyed by host name
rather than sitting as sibling keys next to `num_hosts` and
`links_details`, since a typed deserializer wants one shape per field
rather than an open set of dynamic keys mixed with fixed ones.

*/

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::VnrId;
use crate::metrics::EmbeddingResult;
use crate::substrate::SubstrateState;

/// One link in the SN descriptor's `links_details` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDetail
{
	pub node1: String,
	pub node2: String,
	pub assigned_bandwidth: i64,
}

/// A single host's entry in the SN descriptor. `connections` is parsed so
/// a round-tripped descriptor doesn't fail, but is never read by the
/// loader — only `links_details` is consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostEntry
{
	pub allocated_cores: i64,
	#[serde(default)]
	pub connections: Vec<serde_json::Value>,
}

/// The SN descriptor. Node names follow `h<i>` / `l<i>` / `s<i>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnDescriptor
{
	pub num_spine_switches: u32,
	pub num_leaf_switches: u32,
	pub num_hosts: u32,
	pub links_details: Vec<LinkDetail>,
	pub hosts: HashMap<String, HostEntry>,
}

/// The VNR descriptor. `vm_links` pairs are `(i,j)` with `i<j`, and
/// `bandwidth_values` runs parallel to `vm_links`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VnrDescriptor
{
	pub vnr_id: u64,
	pub num_vms: u32,
	pub vm_cpu_cores: Vec<i64>,
	pub vm_links: Vec<(u32, u32)>,
	pub bandwidth_values: Vec<i64>,
}

impl VnrDescriptor
{
	pub fn id(&self) -> VnrId
	{
		VnrId(self.vnr_id)
	}
}

/// Per-VNR embedding output. `vm_to_host` and `paths` use host/node
/// *names* (not dense ids), since this is the boundary shape external
/// tooling (out of scope here) is expected to consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingOutput
{
	pub vnr_id: u64,
	pub success: bool,
	pub vm_to_host: Vec<(String, String)>,
	pub paths: Vec<((String, String, u64), Vec<String>)>,
	pub link_flags: Vec<((String, String), bool)>,
	/// Named snapshot of every edge's `available_bw` as of when this
	/// output was produced — call `from_result` right after a VNR's
	/// commit/rollback if a true per-VNR graph is wanted; calling it once
	/// at the end of a run (as the CLI does) yields the run's final graph
	/// for every VNR's output, which is cheaper than retaining a full
	/// edge-bandwidth snapshot per VNR and is what the table/JSON report
	/// writer needs.
	pub final_graph: Vec<(String, String, i64)>,
	pub revenue: f64,
	pub cost: f64,
	pub initial_total_bandwidth: i64,
	pub final_total_bandwidth: i64,
}

impl EmbeddingOutput
{
	/// Converts the engine-internal `EmbeddingResult` (dense `HostId`s and
	/// `NodeId`s) into the named boundary shape external tooling expects,
	/// resolving every identifier through `state`'s `NameTable`. `result`
	/// must have come from the same `state` it is resolved against.
	pub fn from_result(result: &EmbeddingResult, state: &SubstrateState) -> Self
	{
		let names = &state.names;

		let mut vm_to_host: Vec<(String, String)> = result
			.vm_to_host
			.iter()
			.map(|(vm, host)| (vm.to_string(), names.name_of(host.node()).to_string()))
			.collect();
		vm_to_host.sort();

		let paths: Vec<((String, String, u64), Vec<String>)> = result
			.paths
			.iter()
			.map(|(_, nodes)| {
				let src = names.name_of(nodes[0]).to_string();
				let dst = names.name_of(*nodes.last().unwrap()).to_string();
				let named_path: Vec<String> = nodes.iter().map(|&n| names.name_of(n).to_string()).collect();
				((src, dst, result.vnr_id.0), named_path)
			})
			.collect();

		let link_flags: Vec<((String, String), bool)> = state
			.graph
			.edges
			.iter()
			.zip(state.graph.link_used.iter())
			.map(|(edge, &used)| ((names.name_of(edge.a).to_string(), names.name_of(edge.b).to_string()), used))
			.collect();

		let final_graph: Vec<(String, String, i64)> = state
			.graph
			.edges
			.iter()
			.map(|edge| (names.name_of(edge.a).to_string(), names.name_of(edge.b).to_string(), edge.available_bw))
			.collect();

		EmbeddingOutput {
			vnr_id: result.vnr_id.0,
			success: result.success,
			vm_to_host,
			paths,
			link_flags,
			final_graph,
			revenue: result.revenue,
			cost: result.cost,
			initial_total_bandwidth: result.initial_total_bandwidth,
			final_total_bandwidth: result.final_total_bandwidth,
		}
	}
}
