use sciloop_frame::{DataWord, Frame};

use crate::cmd::EncodeArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let word = DataWord::new(args.word);
    let frame = Frame::encode(word);
    print_frame(word, &frame, format);
    Ok(SUCCESS)
}
