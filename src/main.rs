use clap::Parser;
use tracing::error;

use flowtag::{cli::Opts, flow, lookup::LookupTable, report, trace};

fn main() {
    let opts = Opts::parse();
    trace::init(opts.log_level());
    std::process::exit(run(&opts));
}

fn run(opts: &Opts) -> exitcode::ExitCode {
    let lookup = match LookupTable::load(&opts.lookup) {
        Ok(lookup) => lookup,
        Err(error) => {
            error!(message = "Failed to load lookup table.", %error);
            return exitcode::NOINPUT;
        }
    };

    if lookup.is_empty() {
        error!(
            message = "No usable tag mappings were loaded.",
            path = %opts.lookup.display(),
        );
        return exitcode::DATAERR;
    }

    let stats = match flow::process(&opts.flow_log, &lookup) {
        Ok(stats) => stats,
        Err(error) => {
            error!(message = "Failed to process flow log.", %error);
            return exitcode::NOINPUT;
        }
    };

    match report::write(&opts.output, &stats) {
        Ok(()) => exitcode::OK,
        Err(error) => {
            error!(message = "Failed to write report.", %error);
            exitcode::IOERR
        }
    }
}
