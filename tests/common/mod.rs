use std::collections::HashMap;

use vne_core::descriptor::{HostEntry, LinkDetail, SnDescriptor, VnrDescriptor};

/// Encapsulates the parameters needed to build a tiny SN descriptor for
/// a test: a list of `(host_name, allocated_cores)` and a list of
/// `(node1, node2, assigned_bandwidth)` links.
pub struct SnBuilder
{
	pub hosts: Vec<(&'static str, i64)>,
	pub links: Vec<(&'static str, &'static str, i64)>,
}

pub fn build_sn(arg: SnBuilder) -> SnDescriptor
{
	let mut hosts = HashMap::new();
	for (name, cores) in &arg.hosts
	{
		hosts.insert(name.to_string(), HostEntry { allocated_cores: *cores, connections: Vec::new() });
	}
	let links_details = arg
		.links
		.iter()
		.map(|(a, b, bw)| LinkDetail { node1: a.to_string(), node2: b.to_string(), assigned_bandwidth: *bw })
		.collect();
	SnDescriptor { num_spine_switches: 0, num_leaf_switches: 0, num_hosts: arg.hosts.len() as u32, links_details, hosts }
}

/// Builds a VNR descriptor: `vm_cpu` per VM, `links` as `(i,j,bandwidth)`.
pub fn build_vnr(vnr_id: u64, vm_cpu: Vec<i64>, links: Vec<(u32, u32, i64)>) -> VnrDescriptor
{
	let num_vms = vm_cpu.len() as u32;
	let vm_links = links.iter().map(|&(i, j, _)| (i, j)).collect();
	let bandwidth_values = links.iter().map(|&(_, _, bw)| bw).collect();
	VnrDescriptor { vnr_id, num_vms, vm_cpu_cores: vm_cpu, vm_links, bandwidth_values }
}
