mod common;

use common::{build_sn, build_vnr, SnBuilder};
use vne_core::descriptor::EmbeddingOutput;
use vne_core::engine::{AlgorithmChoice, Engine};
use vne_core::ids::{HostId, VmIndex};
use vne_core::substrate::SubstrateState;

fn host_id(state: &SubstrateState, name: &str) -> HostId
{
	HostId(state.names.get(name).unwrap_or_else(|| panic!("unknown node {name}")))
}

#[test]
fn s1_trivial_accept()
{
	let sn = build_sn(SnBuilder { hosts: vec![("h1", 8)], links: vec![] });
	let mut state = SubstrateState::from_descriptor(&sn).unwrap();
	let vnr = build_vnr(1, vec![3], vec![]);

	let report = Engine::new().run_all(&mut state, vec![vnr], AlgorithmChoice::EnergyAware).unwrap();

	let result = &report.results[0];
	assert!(result.success);
	let h1 = host_id(&state, "h1");
	assert_eq!(result.vm_to_host[&VmIndex(0)], h1);
	assert_eq!(state.host(h1).available_cpu, 5);
	assert_eq!(result.revenue, 3.0);
	assert_eq!(result.cost, 3.0);
}

#[test]
fn s2_reject_on_cpu()
{
	let sn = build_sn(SnBuilder { hosts: vec![("h1", 2), ("h2", 2)], links: vec![] });
	let mut state = SubstrateState::from_descriptor(&sn).unwrap();
	let vnr = build_vnr(1, vec![3], vec![]);

	let report = Engine::new().run_all(&mut state, vec![vnr], AlgorithmChoice::EnergyAware).unwrap();

	assert!(!report.results[0].success);
	let h1 = host_id(&state, "h1");
	let h2 = host_id(&state, "h2");
	assert_eq!(state.host(h1).available_cpu, 2);
	assert_eq!(state.host(h2).available_cpu, 2);
}

#[test]
fn s3_no_colocation_and_path_routing()
{
	let sn = build_sn(SnBuilder {
		hosts: vec![("h1", 10), ("h2", 10)],
		links: vec![("h1", "l1", 20), ("l1", "h2", 20)],
	});
	let mut state = SubstrateState::from_descriptor(&sn).unwrap();
	let vnr = build_vnr(1, vec![4, 4], vec![(0, 1, 5)]);

	let report = Engine::new().run_all(&mut state, vec![vnr], AlgorithmChoice::EnergyAware).unwrap();

	let result = &report.results[0];
	assert!(result.success);
	let h1 = host_id(&state, "h1");
	let h2 = host_id(&state, "h2");
	// Lowest HostId wins ties: VM1 -> h1, VM2 -> h2.
	assert_eq!(result.vm_to_host[&VmIndex(0)], h1);
	assert_eq!(result.vm_to_host[&VmIndex(1)], h2);
	assert_eq!(result.paths.len(), 1);
	assert_eq!(result.paths[0].1.len(), 3, "path should be [h1, l1, h2]");

	let edge_h1_l1 = state.graph.edges.iter().find(|e| {
		let a = state.names.name_of(e.a);
		let b = state.names.name_of(e.b);
		(a == "h1" && b == "l1") || (a == "l1" && b == "h1")
	}).unwrap();
	assert_eq!(edge_h1_l1.available_bw, 15);
	let edge_l1_h2 = state.graph.edges.iter().find(|e| {
		let a = state.names.name_of(e.a);
		let b = state.names.name_of(e.b);
		(a == "l1" && b == "h2") || (a == "h2" && b == "l1")
	}).unwrap();
	assert_eq!(edge_l1_h2.available_bw, 15);
}

#[test]
fn s4_rollback_on_routing_failure()
{
	let sn = build_sn(SnBuilder {
		hosts: vec![("h1", 10), ("h2", 10)],
		links: vec![("h1", "l1", 2), ("l1", "h2", 20)],
	});
	let mut state = SubstrateState::from_descriptor(&sn).unwrap();
	let vnr = build_vnr(1, vec![4, 4], vec![(0, 1, 5)]);

	let report = Engine::new().run_all(&mut state, vec![vnr], AlgorithmChoice::EnergyAware).unwrap();

	assert!(!report.results[0].success);
	let h1 = host_id(&state, "h1");
	let h2 = host_id(&state, "h2");
	assert_eq!(state.host(h1).available_cpu, 10);
	assert_eq!(state.host(h2).available_cpu, 10);
	assert!(state.graph.edges.iter().all(|e| e.available_bw == e.original_bw));
	assert!(state.graph.link_used.iter().all(|&used| !used));
}

#[test]
fn s5_tie_break_lowest_host_id()
{
	let sn = build_sn(SnBuilder { hosts: vec![("h1", 10), ("h2", 10)], links: vec![] });
	let mut state = SubstrateState::from_descriptor(&sn).unwrap();
	let vnr = build_vnr(1, vec![3], vec![]);

	let report = Engine::new().run_all(&mut state, vec![vnr], AlgorithmChoice::EnergyAware).unwrap();

	let h1 = host_id(&state, "h1");
	assert_eq!(report.results[0].vm_to_host[&VmIndex(0)], h1);
}

#[test]
fn per_vnr_output_resolves_names()
{
	let sn = build_sn(SnBuilder {
		hosts: vec![("h1", 10), ("h2", 10)],
		links: vec![("h1", "l1", 20), ("l1", "h2", 20)],
	});
	let mut state = SubstrateState::from_descriptor(&sn).unwrap();
	let vnr = build_vnr(7, vec![4, 4], vec![(0, 1, 5)]);

	let report = Engine::new().run_all(&mut state, vec![vnr], AlgorithmChoice::EnergyAware).unwrap();
	let outputs = report.embedding_outputs(&state);

	assert_eq!(outputs.len(), 1);
	let out = &outputs[0];
	assert_eq!(out.vnr_id, 7);
	assert!(out.success);
	assert_eq!(out.vm_to_host.len(), 2);
	assert!(out.vm_to_host.contains(&("VM0".to_string(), "h1".to_string())));
	assert!(out.vm_to_host.contains(&("VM1".to_string(), "h2".to_string())));
	assert_eq!(out.paths.len(), 1);
	let ((src, dst, vnr_id), path) = &out.paths[0];
	assert_eq!(src, "h1");
	assert_eq!(dst, "h2");
	assert_eq!(*vnr_id, 7);
	assert_eq!(path, &vec!["h1".to_string(), "l1".to_string(), "h2".to_string()]);
	assert!(out.link_flags.iter().all(|(_, used)| *used));
	assert_eq!(out.initial_total_bandwidth, 40);
	assert_eq!(out.final_total_bandwidth, 30);
	let roundtrip: EmbeddingOutput = serde_json::from_str(&serde_json::to_string(out).unwrap()).unwrap();
	assert_eq!(roundtrip.vnr_id, out.vnr_id);
}

#[test]
fn s6_single_host_std_floor()
{
	let sn = build_sn(SnBuilder { hosts: vec![("h1", 8)], links: vec![] });
	let mut state = SubstrateState::from_descriptor(&sn).unwrap();
	let vnr = build_vnr(1, vec![3], vec![]);

	let report = Engine::new().run_all(&mut state, vec![vnr], AlgorithmChoice::EnergyAware).unwrap();

	assert!(report.results[0].success);
}
