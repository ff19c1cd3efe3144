use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the workspace crates from
/// `info` to `debug` and `trace` while dependencies stay at `warn`. A second
/// call leaves the first subscriber in place and says so on stderr.
pub fn init_logging(verbose: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
	let installed = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose > 0)
		.try_init();
	if let Err(err) = installed {
		eprintln!("edubase-dl: keeping the existing log subscriber: {err}");
	}
}

pub fn default_directives(verbose: u8) -> String {
	let level = match verbose {
		0 => "info",
		1 => "debug",
		_ => "trace",
	};
	format!("warn,edubase={level},edubase_cli={level}")
}
