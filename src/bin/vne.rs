/*!

Thin out-of-process entry point: read an SN descriptor and a VNR
descriptor stream from disk, run the engine, print the aggregate report.

This is deliberately glue, not core. An interactive menu, a spreadsheet
writer, and topology/VNR generators are all out of scope; this binary
takes two required file arguments and prints a JSON or table report
instead.

*/

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use vne_core::descriptor::{SnDescriptor, VnrDescriptor};
use vne_core::engine::{AlgorithmChoice, Engine};
use vne_core::substrate::SubstrateState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat
{
	Json,
	Table,
}

/// Run the VNE embedding engine over an SN and a VNR stream.
#[derive(Debug, Parser)]
#[command(name = "vne", about = "Virtual Network Embedding batch solver")]
struct Cli
{
	/// Path to the SN descriptor (JSON).
	substrate: PathBuf,

	/// Path to the VNR descriptor stream (JSON array).
	vnrs: PathBuf,

	#[arg(long, value_enum, default_value = "json")]
	format: OutputFormat,

	/// Also print every VNR's named per-VNR embedding output (vm_to_host,
	/// paths, link_flags) alongside the aggregate report.
	#[arg(long)]
	per_vnr: bool,
}

fn load_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T, String>
{
	let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
	serde_json::from_reader(BufReader::new(file)).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

fn print_table(report: &vne_core::MetricsReport)
{
	println!("VNR count                 : {}", report.vnr_count);
	println!("Accepted                   : {}", report.accepted_count);
	println!("Acceptance ratio           : {:.2}%", report.acceptance_ratio);
	println!("Servers used / idle        : {} / {}", report.servers_used, report.idle_servers);
	println!("Links used / idle          : {} / {}", report.links_used, report.idle_links);
	println!("VMs embedded / submitted   : {} / {}", report.vms_embedded, report.total_vms_submitted);
	println!("VLs embedded / submitted   : {} / {}", report.vls_embedded, report.total_vls_submitted);
	println!("Node stress (NS / ANS)     : {:.2} / {:.2}", report.node_stress, report.active_node_stress);
	println!("Link stress (LS / ALS)     : {:.2} / {:.2}", report.link_stress, report.active_link_stress);
	println!("Average path length        : {:.2}", report.average_path_length);
	println!("CPU before / after         : {} / {}", report.initial_total_cpu, report.final_total_cpu);
	println!("BW before / after          : {} / {}", report.initial_total_bandwidth, report.final_total_bandwidth);
	match report.average_rc_ratio
	{
		Some(ratio) => println!("Average R/C ratio          : {ratio:.2}"),
		None => println!("Average R/C ratio          : N/A"),
	}
	println!("Total energy (W)           : {:.2}", report.total_energy_watts);
	println!("Embedded-only energy (W)   : {:.2}", report.embedded_energy_watts);
	println!("Execution time (s)         : {:.2}", report.execution_time_seconds);
}

fn run() -> Result<(), String>
{
	let cli = Cli::parse();

	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.init();

	let sn: SnDescriptor = load_json(&cli.substrate)?;
	let vnrs: Vec<VnrDescriptor> = load_json(&cli.vnrs)?;

	let mut state = SubstrateState::from_descriptor(&sn).map_err(|e| e.to_string())?;
	let report = Engine::new().run_all(&mut state, vnrs, AlgorithmChoice::EnergyAware).map_err(|e| e.to_string())?;

	if cli.per_vnr
	{
		let outputs = report.embedding_outputs(&state);
		println!("{}", serde_json::to_string_pretty(&outputs).map_err(|e| e.to_string())?);
	}

	match cli.format
	{
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.metrics).map_err(|e| e.to_string())?),
		OutputFormat::Table => print_table(&report.metrics),
	}
	Ok(())
}

fn main() -> ExitCode
{
	match run()
	{
		Ok(()) => ExitCode::SUCCESS,
		Err(e) =>
		{
			eprintln!("error: {e}");
			ExitCode::FAILURE
		}
	}
}
