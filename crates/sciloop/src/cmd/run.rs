use sciloop_driver::LoopbackConfig;
use sciloop_frame::DataWord;
use sciloop_link::{CoordinatorConfig, Exerciser};
use tracing::debug;

use crate::cmd::RunArgs;
use crate::exit::{link_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_report, OutputFormat};

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    let word = match args.word {
        Some(raw) => DataWord::new(raw),
        None => {
            if args.hi > 0xFFF || args.lo > 0xFFF {
                return Err(CliError::new(
                    USAGE,
                    format!(
                        "samples {:#x},{:#x} exceed 12 bits",
                        args.hi, args.lo
                    ),
                ));
            }
            DataWord::from_samples(args.hi as u16, args.lo as u16)
        }
    };

    let loopback = LoopbackConfig {
        fifo_depth: args.fifo_depth,
        rx_trigger_level: args.rx_trigger,
        lspclk_hz: args.lspclk,
        baud: args.baud,
    };
    let coordinator = CoordinatorConfig {
        expected_seed: args.seed,
    };

    let mut exerciser = Exerciser::with_loopback(loopback, coordinator)
        .map_err(|err| link_error("starting loop-back run", err))?;
    debug!(%word, cycles = args.cycles, seed = args.seed, "driving link");

    let report = exerciser.run_word(word, args.cycles);
    print_report(&report, format);

    // Mismatches and stalls are counted outcomes of the bench, not
    // process failures.
    Ok(SUCCESS)
}
