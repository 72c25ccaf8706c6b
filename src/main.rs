use reachability::{
    cli::{Args, Command},
    logger::{init_logger, should_use_colors},
};
use std::process;

fn main() {
    let args = Args::parse_args();
    init_logger(args.verbose, args.quiet, args.no_colors || !should_use_colors());

    let command = Command::from_args(args);
    process::exit(command.run());
}
