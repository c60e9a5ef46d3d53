/*!

The validated, in-memory form of a Virtual Network Request. Immutable
once built — `Vnr::from_descriptor` is the only way to get one, and it
rejects anything `EngineError::MalformedVnr` before the engine ever takes
a `SnapshotToken` for it, so a malformed VNR never touches mutable state.

*/

use crate::descriptor::VnrDescriptor;
use crate::error::{EngineError, Result};
use crate::ids::VnrId;

/// One virtual link: an unordered pair of VM indices with `i < j`, and
/// the bandwidth demand it places on its substrate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualLink
{
	pub i: u32,
	pub j: u32,
	pub bandwidth: i64,
}

#[derive(Debug, Clone)]
pub struct Vnr
{
	pub vnr_id: VnrId,
	pub vm_cpu: Vec<i64>,
	pub links: Vec<VirtualLink>,
}

impl Vnr
{
	pub fn num_vms(&self) -> usize
	{
		self.vm_cpu.len()
	}

	/// Validates and converts a wire-format `VnrDescriptor`. Checks, in
	/// order: VM indices in range, non-negative CPU and bandwidth
	/// demands, and no duplicate virtual link between the same pair.
	pub fn from_descriptor(descriptor: &VnrDescriptor) -> Result<Self>
	{
		let vnr_id = descriptor.id();
		let num_vms = descriptor.vm_cpu_cores.len();

		for &cpu in &descriptor.vm_cpu_cores
		{
			if cpu < 0
			{
				return Err(EngineError::MalformedVnr { vnr: vnr_id, reason: format!("negative CPU demand {cpu}") });
			}
		}

		if descriptor.vm_links.len() != descriptor.bandwidth_values.len()
		{
			return Err(EngineError::MalformedVnr {
				vnr: vnr_id,
				reason: format!(
					"{} virtual links but {} bandwidth values",
					descriptor.vm_links.len(),
					descriptor.bandwidth_values.len()
				),
			});
		}

		let mut links = Vec::with_capacity(descriptor.vm_links.len());
		let mut seen = std::collections::HashSet::new();
		for (&(i, j), &bandwidth) in descriptor.vm_links.iter().zip(descriptor.bandwidth_values.iter())
		{
			if i >= j
			{
				return Err(EngineError::MalformedVnr {
					vnr: vnr_id,
					reason: format!("virtual link ({i},{j}) must have i<j"),
				});
			}
			if j as usize >= num_vms
			{
				return Err(EngineError::MalformedVnr {
					vnr: vnr_id,
					reason: format!("virtual link references VM index {j} but VNR has {num_vms} VMs"),
				});
			}
			if bandwidth < 0
			{
				return Err(EngineError::MalformedVnr {
					vnr: vnr_id,
					reason: format!("negative bandwidth demand {bandwidth} on link ({i},{j})"),
				});
			}
			if !seen.insert((i, j))
			{
				return Err(EngineError::MalformedVnr { vnr: vnr_id, reason: format!("duplicate virtual link ({i},{j})") });
			}
			links.push(VirtualLink { i, j, bandwidth });
		}

		Ok(Vnr { vnr_id, vm_cpu: descriptor.vm_cpu_cores.clone(), links })
	}
}
