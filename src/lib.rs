/*!
vne-core
========

This crate is the core of a Virtual Network Embedding (VNE) engine: a
batch solver that accepts a Substrate Network (SN) of hosts and switches
with finite CPU and link bandwidth, together with a sequence of Virtual
Network Requests (VNRs, small graphs of VMs and virtual links), and
decides for each VNR whether it can be embedded, reserving the chosen
hosts and paths atomically when it can.

# Usage

Add `vne-core` to your dependencies, build a [`substrate::SubstrateState`]
from an [`descriptor::SnDescriptor`], and drive a stream of
[`descriptor::VnrDescriptor`]s through an [`engine::Engine`]:

```no_run
use vne_core::descriptor::{SnDescriptor, VnrDescriptor};
use vne_core::engine::{Engine, AlgorithmChoice};
use vne_core::substrate::SubstrateState;

# fn example(sn: SnDescriptor, vnrs: Vec<VnrDescriptor>) -> vne_core::error::Result<()> {
let mut state = SubstrateState::from_descriptor(&sn)?;
let report = Engine::new().run_all(&mut state, vnrs, AlgorithmChoice::EnergyAware)?;
println!("accepted {}/{}", report.metrics.accepted_count, report.metrics.vnr_count);
# Ok(())
# }
```

# What is out of scope

The Mininet-based SN emulator, the SDN controller pushing forwarding
rules, the random VNR generator, and any interactive menu or spreadsheet
writer are all external collaborators. This crate only exchanges the data
shapes in [`descriptor`] with them; it never spawns or talks to any of
them itself. Likewise there is no on-line admission, preemption,
migration, or substrate-failure handling here — every VNR is embedded, or
rejected, independently and in arrival order (see [`engine`]).

# Determinism

Given identical inputs, [`engine::Engine::run_all`] is required to
produce bit-identical outputs across runs: host/edge iteration order is
always ascending [`ids::NodeId`], tie-breaks in node embedding favor the
lowest [`ids::HostId`], and the link-embedding search's priority queue
breaks ties by insertion order. None of the engine's internals use
randomness.
*/

pub mod descriptor;
pub mod engine;
pub mod error;
pub mod ids;
pub mod link_embedder;
pub mod metrics;
pub mod node_embedder;
pub mod substrate;
pub mod vnr;

pub use descriptor::{EmbeddingOutput, LinkDetail, SnDescriptor, VnrDescriptor};
pub use engine::{AlgorithmChoice, Engine, RunReport};
pub use error::{EngineError, Result};
pub use ids::{HostId, NodeId, VlIndex, VmIndex, VnrId};
pub use metrics::{EmbeddingResult, MetricsReport};
pub use substrate::SubstrateState;
pub use vnr::Vnr;
