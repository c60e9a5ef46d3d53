/*!

The mutable world the embedders operate on: hosts with CPU capacity and a
symmetric, weighted graph of available bandwidth.

Each undirected edge is stored exactly once (in `Graph::edges`); both
directions are read by following the edge from whichever endpoint is
not the node you started at, so symmetry holds by construction instead
of by two mutations kept in sync.

*/

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::SnDescriptor;
use crate::error::{EngineError, Result};
use crate::ids::{HostId, NameTable, NodeId, VnrId};

/// A VM committed onto a host. Created during commit, destroyed during
/// rollback; never mutated or removed after a successful commit within
/// the scope of this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedVm
{
	pub vnr_id: VnrId,
	pub vm_index: u32,
	pub cpu: i64,
}

/// A substrate compute host.
#[derive(Debug, Clone)]
pub struct Host
{
	pub id: HostId,
	pub original_cpu: i64,
	pub available_cpu: i64,
	pub vms: Vec<PlacedVm>,
}

impl Host
{
	/// Sum of CPU currently placed on this host. Invariant:
	/// `available_cpu == original_cpu - sum_placed`.
	pub fn sum_placed(&self) -> i64
	{
		self.original_cpu - self.available_cpu
	}
}

/// One undirected, weighted edge of the substrate graph, stored once.
#[derive(Debug, Clone, Copy)]
pub struct Edge
{
	pub a: NodeId,
	pub b: NodeId,
	pub available_bw: i64,
	pub original_bw: i64,
}

impl Edge
{
	/// The endpoint other than `from`. Panics if `from` is not one of
	/// this edge's endpoints — a bug in the caller, not a runtime
	/// condition the engine needs to recover from.
	pub fn other(&self, from: NodeId) -> NodeId
	{
		if from == self.a
		{
			self.b
		}
		else if from == self.b
		{
			self.a
		}
		else
		{
			panic!("Edge::other called with a node not on the edge");
		}
	}
}

/// The symmetric substrate graph. Adjacency lists are kept sorted by
/// ascending neighbor `NodeId` so that traversal order is deterministic
/// without needing to re-sort on every path search.
#[derive(Debug, Clone)]
pub struct Graph
{
	pub edges: Vec<Edge>,
	adjacency: Vec<Vec<usize>>,
	/// Edge indices that have carried at least one committed virtual link.
	pub link_used: Vec<bool>,
}

impl Graph
{
	pub fn new(num_nodes: usize) -> Self
	{
		Graph { edges: Vec::new(), adjacency: vec![Vec::new(); num_nodes], link_used: Vec::new() }
	}

	pub fn num_nodes(&self) -> usize
	{
		self.adjacency.len()
	}

	pub fn num_edges(&self) -> usize
	{
		self.edges.len()
	}

	/// Adds an undirected edge. Returns its index.
	pub fn add_edge(&mut self, a: NodeId, b: NodeId, bandwidth: i64) -> usize
	{
		let idx = self.edges.len();
		self.edges.push(Edge { a, b, available_bw: bandwidth, original_bw: bandwidth });
		self.link_used.push(false);
		self.adjacency[a.index()].push(idx);
		self.adjacency[b.index()].push(idx);
		idx
	}

	/// Finishes construction: sorts each node's incident edges by
	/// ascending neighbor `NodeId`, the order deterministic path
	/// selection requires.
	fn finalize_adjacency(&mut self)
	{
		for node in 0..self.adjacency.len()
		{
			let node_id = NodeId(node as u32);
			self.adjacency[node].sort_by_key(|&edge_idx| self.edges[edge_idx].other(node_id));
		}
	}

	/// Neighbors of `node` in ascending `NodeId` order, paired with the
	/// edge index connecting them.
	pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, usize)> + '_
	{
		self.adjacency[node.index()].iter().map(move |&edge_idx| (self.edges[edge_idx].other(node), edge_idx))
	}

	/// Total of `available_bw` over undirected edges (each counted once).
	pub fn total_available_bandwidth(&self) -> i64
	{
		self.edges.iter().map(|e| e.available_bw).sum()
	}

	pub fn total_original_bandwidth(&self) -> i64
	{
		self.edges.iter().map(|e| e.original_bw).sum()
	}
}

/// Everything captured at VNR entry needed to restore `SubstrateState`
/// exactly. Built lazily: only hosts and edges actually
/// touched while processing the current VNR get an entry, so its cost is
/// bounded by that VNR's footprint rather than by the whole SN.
#[derive(Debug, Default)]
pub struct SnapshotToken
{
	host_cpu: HashMap<HostId, i64>,
	host_vms_len: HashMap<HostId, usize>,
	edge_bw: HashMap<usize, i64>,
	/// Edges whose `link_used` flag this VNR flipped from `false` to
	/// `true` for the first time. Only these need resetting on rollback.
	newly_used_edges: Vec<usize>,
}

impl SnapshotToken
{
	fn touch_host(&mut self, host: &Host)
	{
		self.host_cpu.entry(host.id).or_insert(host.available_cpu);
		self.host_vms_len.entry(host.id).or_insert(host.vms.len());
	}

	fn touch_edge(&mut self, edge_idx: usize, edge: &Edge)
	{
		self.edge_bw.entry(edge_idx).or_insert(edge.available_bw);
	}
}

/// The mutable world. Owns the hosts, the graph, and the bookkeeping
/// needed for metrics at the end of the run.
#[derive(Debug)]
pub struct SubstrateState
{
	/// Dense, ascending-`NodeId` order. `host_index` maps a host's
	/// `NodeId` to its position here.
	hosts: Vec<Host>,
	host_index: HashMap<NodeId, usize>,
	pub graph: Graph,
	pub names: NameTable,
}

impl SubstrateState
{
	/// Builds the initial `SubstrateState` from an SN descriptor.
	/// Fails with `MalformedTopology` if a link references an unknown
	/// node or a host name appears twice.
	pub fn from_descriptor(descriptor: &SnDescriptor) -> Result<Self>
	{
		let mut names = NameTable::new();
		let mut hosts = Vec::with_capacity(descriptor.num_hosts as usize);
		let mut host_index = HashMap::new();
		let mut seen_hosts = std::collections::HashSet::new();

		let mut host_names: Vec<&String> = descriptor.hosts.keys().collect();
		host_names.sort();
		for host_name in host_names
		{
			if !seen_hosts.insert(host_name.clone())
			{
				return Err(EngineError::MalformedTopology(format!("host {host_name} appears twice")));
			}
			let info = &descriptor.hosts[host_name];
			let node_id = names.intern(host_name);
			let host_id = HostId(node_id);
			host_index.insert(node_id, hosts.len());
			hosts.push(Host {
				id: host_id,
				original_cpu: info.allocated_cores,
				available_cpu: info.allocated_cores,
				vms: Vec::new(),
			});
		}

		// Switches (and any host referenced only from links_details) get
		// interned lazily below, growing the node space past num_hosts.
		for link in &descriptor.links_details
		{
			names.intern(&link.node1);
			names.intern(&link.node2);
		}

		let mut graph = Graph::new(names.len());
		for link in &descriptor.links_details
		{
			let a = names.get(&link.node1).ok_or_else(|| {
				EngineError::MalformedTopology(format!("link references unknown node {}", link.node1))
			})?;
			let b = names.get(&link.node2).ok_or_else(|| {
				EngineError::MalformedTopology(format!("link references unknown node {}", link.node2))
			})?;
			if link.assigned_bandwidth < 0
			{
				return Err(EngineError::MalformedTopology(format!(
					"link {} <-> {} has negative bandwidth",
					link.node1, link.node2
				)));
			}
			graph.add_edge(a, b, link.assigned_bandwidth);
		}
		graph.finalize_adjacency();

		Ok(SubstrateState { hosts, host_index, graph, names })
	}

	pub fn hosts(&self) -> &[Host]
	{
		&self.hosts
	}

	pub fn host(&self, id: HostId) -> &Host
	{
		&self.hosts[self.host_index[&id.node()]]
	}

	fn host_mut(&mut self, id: HostId) -> &mut Host
	{
		let idx = self.host_index[&id.node()];
		&mut self.hosts[idx]
	}

	pub fn num_hosts(&self) -> usize
	{
		self.hosts.len()
	}

	pub fn total_available_cpu(&self) -> i64
	{
		self.hosts.iter().map(|h| h.available_cpu).sum()
	}

	pub fn total_original_cpu(&self) -> i64
	{
		self.hosts.iter().map(|h| h.original_cpu).sum()
	}

	/// Tentatively deducts `cpu` from `host` and appends a `PlacedVm`,
	/// recording the pre-mutation state in `snapshot` on first touch.
	pub(crate) fn place_vm(&mut self, snapshot: &mut SnapshotToken, host: HostId, vnr_id: VnrId, vm_index: u32, cpu: i64)
	{
		snapshot.touch_host(self.host(host));
		let h = self.host_mut(host);
		h.available_cpu -= cpu;
		h.vms.push(PlacedVm { vnr_id, vm_index, cpu });
	}

	/// Tentatively debits `demand` from every edge on `path` (both
	/// directions, by construction, since each edge is read symmetrically),
	/// and marks those edges used, recording pre-mutation state on first
	/// touch per edge.
	pub(crate) fn debit_path(&mut self, snapshot: &mut SnapshotToken, edge_indices: &[usize], demand: i64)
	{
		for &edge_idx in edge_indices
		{
			snapshot.touch_edge(edge_idx, &self.graph.edges[edge_idx]);
			self.graph.edges[edge_idx].available_bw -= demand;
			if !self.graph.link_used[edge_idx]
			{
				self.graph.link_used[edge_idx] = true;
				snapshot.newly_used_edges.push(edge_idx);
			}
		}
	}

	/// Discards the token: commit is a no-op on state.
	pub(crate) fn commit(&mut self, _snapshot: SnapshotToken) {}

	/// Restores every host and edge touched during this VNR to its
	/// pre-VNR value, and resets `link_used` for edges this VNR flipped
	/// for the first time. Idempotent: calling it twice with an
	/// already-applied token is a no-op the second time since the
	/// current values already equal the snapshot's.
	pub(crate) fn rollback(&mut self, snapshot: SnapshotToken)
	{
		for (host_id, cpu) in snapshot.host_cpu
		{
			self.host_mut(host_id).available_cpu = cpu;
		}
		for (host_id, len) in snapshot.host_vms_len
		{
			self.host_mut(host_id).vms.truncate(len);
		}
		for (edge_idx, bw) in snapshot.edge_bw
		{
			self.graph.edges[edge_idx].available_bw = bw;
		}
		for edge_idx in snapshot.newly_used_edges
		{
			self.graph.link_used[edge_idx] = false;
		}
	}

	/// Capacity invariant, checked on demand by callers (tests, and
	/// the engine after every commit in debug-oriented configurations).
	pub fn check_capacity_invariant(&self) -> Result<()>
	{
		for host in &self.hosts
		{
			let expected = host.original_cpu - host.vms.iter().map(|v| v.cpu).sum::<i64>();
			crate::error::invariant(
				host.available_cpu == expected,
				format!("host {} available_cpu {} != original-placed {}", host.id, host.available_cpu, expected),
			)?;
			crate::error::invariant(
				host.available_cpu >= 0 && host.available_cpu <= host.original_cpu,
				format!("host {} available_cpu {} out of range [0,{}]", host.id, host.available_cpu, host.original_cpu),
			)?;
		}
		for edge in &self.graph.edges
		{
			crate::error::invariant(
				edge.available_bw >= 0 && edge.available_bw <= edge.original_bw,
				format!("edge {}-{} available_bw {} out of range [0,{}]", edge.a, edge.b, edge.available_bw, edge.original_bw),
			)?;
		}
		Ok(())
	}
}
