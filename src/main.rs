use human_panic::{metadata, setup_panic};
use log::error;
use fuelcost::cli::run_cli;
use fuelcost::log::is_logger_initialised;

fn main() {
    setup_panic!(metadata!().support(
        "Please report this bug to the fuelcost maintainers, attaching the report file above."
    ));

    if let Err(err) = run_cli() {
        if is_logger_initialised() {
            error!("{err:?}");
        } else {
            eprintln!("Error: {err:?}");
        }

        // Terminate program, signalling an error
        std::process::exit(1);
    }
}
