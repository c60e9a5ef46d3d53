/*!

Energy- and overload-aware VM-to-host selection.

For every VM, in order, every feasible host is scored by
`J_k = E_k * exp(alpha * p)` where `E_k` is the host's energy draw after
tentatively placing the VM and `p` is the probability the host becomes
overloaded, estimated from a normal model fit to the current
`available_cpu` distribution across *all* hosts. The minimum-`J_k` host
is chosen; ties go to the lowest `HostId`.

*/

use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::ids::{HostId, VmIndex};
use crate::substrate::{SnapshotToken, SubstrateState};
use crate::vnr::Vnr;

const P_IDLE: f64 = 150.0;
const P_FULL: f64 = 300.0;
const ALPHA: f64 = 1.0;
const STD_FLOOR: f64 = 1e-6;

/// Mean and (floored) sample standard deviation of `available_cpu`
/// across every host, recomputed fresh before each VM placement.
fn cpu_mean_and_std(state: &SubstrateState) -> (f64, f64)
{
	let values: Vec<f64> = state.hosts().iter().map(|h| h.available_cpu as f64).collect();
	let n = values.len() as f64;
	if values.is_empty()
	{
		return (0.0, STD_FLOOR);
	}
	let mean = values.iter().sum::<f64>() / n;
	let variance = if values.len() > 1
	{
		values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
	}
	else
	{
		0.0
	};
	let std = variance.sqrt().max(STD_FLOOR);
	(mean, std)
}

/// Standard normal CDF, `Phi(x) = 0.5 * (1 + erf(x / sqrt(2)))`.
fn standard_normal_cdf(x: f64) -> f64
{
	0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
}

/// Scores a single candidate host for a VM demanding `cpu` cores, given
/// the population mean/std of `available_cpu` across all hosts.
fn score_host(available_cpu: i64, original_cpu: i64, cpu: i64, mean: f64, std: f64) -> f64
{
	let c_k = available_cpu as f64;
	let o_k = original_cpu as f64;
	let demand = cpu as f64;
	let sum_placed = o_k - c_k;

	let overload_prob = 1.0 - standard_normal_cdf((c_k - demand - mean) / std);
	let energy_after = P_IDLE + (P_FULL - P_IDLE) * ((sum_placed + demand) / o_k);
	energy_after * (ALPHA * overload_prob).exp()
}

/// Embeds every VM of `vnr` in order, mutating `state` tentatively and
/// recording pre-mutation values in `snapshot`. Returns the VM-to-host
/// mapping on success, or `NoFeasibleHost` as soon as any VM has no
/// candidate — remaining VMs are not attempted.
pub fn embed_vms(state: &mut SubstrateState, snapshot: &mut SnapshotToken, vnr: &Vnr) -> Result<HashMap<VmIndex, HostId>>
{
	let mut assignment = HashMap::with_capacity(vnr.num_vms());
	let mut used_hosts = std::collections::HashSet::new();

	for (vm_index, &cpu) in vnr.vm_cpu.iter().enumerate()
	{
		let (mean, std) = cpu_mean_and_std(state);

		let mut best: Option<(HostId, f64)> = None;
		for host in state.hosts()
		{
			if host.available_cpu < cpu || used_hosts.contains(&host.id)
			{
				continue;
			}
			let objective = score_host(host.available_cpu, host.original_cpu, cpu, mean, std);
			let utilization = 100.0 * cpu as f64 / host.available_cpu as f64;
			tracing::debug!(
				host = %host.id,
				vm_index,
				utilization,
				objective,
				"node embedding candidate"
			);
			match best
			{
				Some((_, best_objective)) if objective >= best_objective => {}
				_ => best = Some((host.id, objective)),
			}
		}

		let Some((chosen, _)) = best
		else
		{
			return Err(EngineError::NoFeasibleHost { vnr: vnr.vnr_id, vm_index: vm_index as u32 });
		};

		state.place_vm(snapshot, chosen, vnr.vnr_id, vm_index as u32, cpu);
		used_hosts.insert(chosen);
		assignment.insert(VmIndex(vm_index as u32), chosen);
		tracing::debug!(vnr = %vnr.vnr_id, vm_index, host = %chosen, "placed VM");
	}

	Ok(assignment)
}
