mod commands;
mod terminal;

use commands::{CommandLine, Commands, info, onboard, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let quiet = commands.quiet;

    logging::init_logging(commands.verbose, quiet);
    print::banner(quiet);

    let outcome = match commands.command {
        Commands::Info => {
            print::header("about the tool", quiet);
            info::info(quiet)
        }
        Commands::Scan(args) => {
            print::header("starting scanner", quiet);
            scan::scan(args, quiet).await
        }
        Commands::Onboard(args) => {
            print::header("getting ready for onboarding", quiet);
            onboard::onboard(args, quiet).await
        }
    };

    if quiet == 0 {
        print::end_of_program();
    }
    outcome
}
