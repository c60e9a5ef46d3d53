/*!

Dense integer identifiers for the substrate graph and per-VNR indices.

External systems name nodes and VMs by string (`"h3"`, `"l1"`,
`"VM2"`, ...), but every place inside this crate that needs an identity
uses a dense `u32`-backed index instead, with a side table (`NameTable`)
kept only for the boundary to/from the outside world. Nothing inside
the node/link embedders ever compares names.

*/

use std::collections::HashMap;
use std::fmt;

/// A vertex of the substrate graph. Hosts and switches share this index
/// space; whether a given `NodeId` is a host is determined by whether it
/// has an entry in `SubstrateState::hosts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "n{}", self.0)
	}
}

impl NodeId
{
	pub fn index(self) -> usize
	{
		self.0 as usize
	}
}

/// A `NodeId` known (by construction) to name a host. Converts to
/// `NodeId` for free; the reverse is a lookup against
/// `SubstrateState::hosts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostId(pub NodeId);

impl HostId
{
	pub fn node(self) -> NodeId
	{
		self.0
	}
}

impl fmt::Display for HostId
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "h{}", self.0.0)
	}
}

/// 0-based index of a VM inside the `vm_cpu` sequence of a single VNR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VmIndex(pub u32);

impl fmt::Display for VmIndex
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "VM{}", self.0)
	}
}

/// 0-based index of a virtual link inside the `vm_links` sequence of a
/// single VNR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VlIndex(pub u32);

/// Identifier of a VNR as it arrives from the outside. Opaque to the
/// engine beyond equality and ordering; preserved verbatim in outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VnrId(pub u64);

impl fmt::Display for VnrId
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "{}", self.0)
	}
}

/// Side table between dense `NodeId`s and the original string names
/// (`h3`, `l1`, `s2`, ...). Built once at load time; the embedders never
/// consult it, only the boundary code producing external output does.
#[derive(Debug, Clone, Default)]
pub struct NameTable
{
	names: Vec<String>,
	by_name: HashMap<String, NodeId>,
}

impl NameTable
{
	pub fn new() -> Self
	{
		Self { names: Vec::new(), by_name: HashMap::new() }
	}

	/// Insert a new name, assigning it the next unused `NodeId`. Returns
	/// the existing id without inserting if the name is already known.
	pub fn intern(&mut self, name: &str) -> NodeId
	{
		if let Some(&id) = self.by_name.get(name)
		{
			return id;
		}
		let id = NodeId(self.names.len() as u32);
		self.names.push(name.to_string());
		self.by_name.insert(name.to_string(), id);
		id
	}

	pub fn get(&self, name: &str) -> Option<NodeId>
	{
		self.by_name.get(name).copied()
	}

	pub fn name_of(&self, id: NodeId) -> &str
	{
		&self.names[id.index()]
	}

	pub fn len(&self) -> usize
	{
		self.names.len()
	}

	pub fn is_empty(&self) -> bool
	{
		self.names.is_empty()
	}
}
