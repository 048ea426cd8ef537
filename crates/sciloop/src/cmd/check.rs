use sciloop_frame::{compute_crc, verify_crc, verify_crc_strict, DataWord};

use crate::cmd::CheckArgs;
use crate::exit::{CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_check, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let word = DataWord::new(args.word);
    let computed = compute_crc(word);
    let valid = if args.strict {
        verify_crc_strict(word, args.crc)
    } else {
        verify_crc(word, args.crc)
    };

    print_check(word, args.crc, computed, args.strict, valid, format);
    Ok(if valid { SUCCESS } else { DATA_INVALID })
}
