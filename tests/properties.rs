mod common;

use std::collections::HashSet;

use common::{build_sn, build_vnr, SnBuilder};
use proptest::prelude::*;
use vne_core::engine::{AlgorithmChoice, Engine};
use vne_core::substrate::SubstrateState;

/// A star topology `h1..hN -- l1`, so every pair of hosts is always
/// connected through the switch regardless of which bandwidths are
/// drawn, keeping the generator simple while still randomizing
/// feasibility.
fn arb_sn(max_hosts: usize) -> impl Strategy<Value = vne_core::descriptor::SnDescriptor>
{
	(1..=max_hosts).prop_flat_map(|num_hosts| {
		let cpu = prop::collection::vec(0i64..20, num_hosts);
		let bw = prop::collection::vec(0i64..15, num_hosts);
		(Just(num_hosts), cpu, bw).prop_map(|(num_hosts, cpu, bw)| {
			let host_names: Vec<&'static str> =
				["h1", "h2", "h3", "h4", "h5"].into_iter().take(num_hosts).collect();
			let hosts: Vec<(&'static str, i64)> = host_names.iter().copied().zip(cpu).collect();
			let links: Vec<(&'static str, &'static str, i64)> =
				host_names.iter().copied().zip(bw).map(|(h, b)| (h, "l1", b)).collect();
			build_sn(SnBuilder { hosts, links })
		})
	})
}

fn arb_vnr(vnr_id: u64, max_vms: usize) -> impl Strategy<Value = vne_core::descriptor::VnrDescriptor>
{
	(1..=max_vms).prop_flat_map(move |num_vms| {
		let cpu = prop::collection::vec(0i64..15, num_vms);
		let link_bw = prop::collection::vec(0i64..15, num_vms.max(1));
		(cpu, link_bw).prop_map(move |(cpu, link_bw)| {
			let mut links = Vec::new();
			for i in 0..num_vms
			{
				for j in (i + 1)..num_vms
				{
					// deterministic-but-varied inclusion so link counts differ run to run
					if (i + j + link_bw.len()) % 2 == 0 && links.len() < link_bw.len()
					{
						links.push((i as u32, j as u32, link_bw[links.len()]));
					}
				}
			}
			build_vnr(vnr_id, cpu, links)
		})
	})
}

fn arb_vnr_stream(max_vnrs: usize, max_vms: usize) -> impl Strategy<Value = Vec<vne_core::descriptor::VnrDescriptor>>
{
	(1..=max_vnrs).prop_flat_map(move |n| {
		let strategies: Vec<_> = (0..n).map(|i| arb_vnr(i as u64, max_vms)).collect();
		strategies
	})
}

proptest!
{
	#![proptest_config(ProptestConfig::with_cases(64))]

	/// P1: capacity invariant holds for every host after any run.
	#[test]
	fn p1_capacity_invariant(sn in arb_sn(4), vnrs in arb_vnr_stream(4, 3))
	{
		let mut state = SubstrateState::from_descriptor(&sn).unwrap();
		let _ = Engine::new().run_all(&mut state, vnrs, AlgorithmChoice::EnergyAware).unwrap();
		prop_assert!(state.check_capacity_invariant().is_ok());
		for host in state.hosts()
		{
			prop_assert!(host.available_cpu >= 0);
			prop_assert!(host.available_cpu <= host.original_cpu);
		}
	}

	/// P2: bandwidth stays within [0, original] on every edge (the graph
	/// stores each undirected edge once, so symmetry holds by
	/// construction rather than needing a separate check).
	#[test]
	fn p2_bandwidth_bounds(sn in arb_sn(4), vnrs in arb_vnr_stream(4, 3))
	{
		let mut state = SubstrateState::from_descriptor(&sn).unwrap();
		let _ = Engine::new().run_all(&mut state, vnrs, AlgorithmChoice::EnergyAware).unwrap();
		for edge in &state.graph.edges
		{
			prop_assert!(edge.available_bw >= 0 && edge.available_bw <= edge.original_bw);
		}
	}

	/// P3: no two VMs of the same committed VNR share a host.
	#[test]
	fn p3_no_colocation(sn in arb_sn(4), vnrs in arb_vnr_stream(4, 3))
	{
		let mut state = SubstrateState::from_descriptor(&sn).unwrap();
		let report = Engine::new().run_all(&mut state, vnrs, AlgorithmChoice::EnergyAware).unwrap();
		for result in &report.results
		{
			if !result.success { continue; }
			let mut seen = HashSet::new();
			for &host in result.vm_to_host.values()
			{
				prop_assert!(seen.insert(host), "VNR {} co-located two VMs on {}", result.vnr_id, host);
			}
		}
	}

	/// P4: a rejected VNR leaves the substrate state exactly as it was.
	#[test]
	fn p4_atomicity_on_rejection(sn in arb_sn(4), vnr in arb_vnr(1, 3))
	{
		let mut state = SubstrateState::from_descriptor(&sn).unwrap();
		let before_cpu: Vec<i64> = state.hosts().iter().map(|h| h.available_cpu).collect();
		let before_bw: Vec<i64> = state.graph.edges.iter().map(|e| e.available_bw).collect();

		let report = Engine::new().run_all(&mut state, vec![vnr], AlgorithmChoice::EnergyAware).unwrap();

		if !report.results[0].success
		{
			let after_cpu: Vec<i64> = state.hosts().iter().map(|h| h.available_cpu).collect();
			let after_bw: Vec<i64> = state.graph.edges.iter().map(|e| e.available_bw).collect();
			prop_assert_eq!(before_cpu, after_cpu);
			prop_assert_eq!(before_bw, after_bw);
			prop_assert!(state.graph.link_used.iter().all(|&used| !used));
		}
	}

	/// P6: two runs over identical inputs produce identical outcomes.
	#[test]
	fn p6_determinism(sn in arb_sn(4), vnrs in arb_vnr_stream(4, 3))
	{
		let mut state_a = SubstrateState::from_descriptor(&sn).unwrap();
		let mut state_b = SubstrateState::from_descriptor(&sn).unwrap();

		let report_a = Engine::new().run_all(&mut state_a, vnrs.clone(), AlgorithmChoice::EnergyAware).unwrap();
		let report_b = Engine::new().run_all(&mut state_b, vnrs, AlgorithmChoice::EnergyAware).unwrap();

		prop_assert_eq!(report_a.results.len(), report_b.results.len());
		for (ra, rb) in report_a.results.iter().zip(report_b.results.iter())
		{
			prop_assert_eq!(ra.success, rb.success);
			prop_assert_eq!(ra.revenue, rb.revenue);
			prop_assert_eq!(ra.cost, rb.cost);
			for (vm, host) in &ra.vm_to_host
			{
				prop_assert_eq!(rb.vm_to_host.get(vm), Some(host));
			}
		}
		let cpu_a: Vec<i64> = state_a.hosts().iter().map(|h| h.available_cpu).collect();
		let cpu_b: Vec<i64> = state_b.hosts().iter().map(|h| h.available_cpu).collect();
		prop_assert_eq!(cpu_a, cpu_b);
	}

	/// P7: servers_used and idle_servers partition all hosts; links_used
	/// never exceeds total edges.
	#[test]
	fn p7_metric_identities(sn in arb_sn(4), vnrs in arb_vnr_stream(4, 3))
	{
		let mut state = SubstrateState::from_descriptor(&sn).unwrap();
		let report = Engine::new().run_all(&mut state, vnrs, AlgorithmChoice::EnergyAware).unwrap();
		let m = &report.metrics;
		prop_assert_eq!(m.servers_used + m.idle_servers, m.total_hosts);
		prop_assert!(m.links_used <= m.total_edges);

		let total_vms_embedded: u64 = report.results.iter().filter(|r| r.success).map(|r| r.vm_to_host.len() as u64).sum();
		prop_assert_eq!(total_vms_embedded, m.vms_embedded);
	}
}
