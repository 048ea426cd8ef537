use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use sciloop_frame::{DataWord, Frame};
use sciloop_link::LinkReport;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_report(report: &LinkReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["METRIC", "VALUE"])
                .add_row(vec!["cycles".to_string(), report.cycles.to_string()])
                .add_row(vec![
                    "transmit_events".to_string(),
                    report.stats.transmit_events.to_string(),
                ])
                .add_row(vec![
                    "receive_events".to_string(),
                    report.stats.receive_events.to_string(),
                ])
                .add_row(vec!["matches".to_string(), report.stats.matches.to_string()])
                .add_row(vec![
                    "mismatches".to_string(),
                    report.stats.mismatches.to_string(),
                ])
                .add_row(vec![
                    "dropped_bytes".to_string(),
                    report.dropped_bytes.to_string(),
                ])
                .add_row(vec![
                    "final_phase".to_string(),
                    report.final_phase.to_string(),
                ])
                .add_row(vec![
                    "stalled_at".to_string(),
                    report
                        .stalled_at
                        .map_or_else(|| "-".to_string(), |c| c.to_string()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "cycles={} tx={} rx={} matches={} mismatches={} dropped={} phase={}{}",
                report.cycles,
                report.stats.transmit_events,
                report.stats.receive_events,
                report.stats.matches,
                report.stats.mismatches,
                report.dropped_bytes,
                report.final_phase,
                report
                    .stalled_at
                    .map_or_else(String::new, |c| format!(" stalled_at={c}"))
            );
        }
    }
}

#[derive(Serialize)]
struct FrameOutput {
    word: String,
    payload: [String; 3],
    check_byte: String,
}

pub fn print_frame(word: DataWord, frame: &Frame, format: OutputFormat) {
    let payload = frame.payload();
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                word: format!("{:#08x}", word.value()),
                payload: [
                    format!("{:#04x}", payload[0]),
                    format!("{:#04x}", payload[1]),
                    format!("{:#04x}", payload[2]),
                ],
                check_byte: format!("{:#04x}", frame.check_byte()),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["WORD", "BYTE0", "BYTE1", "BYTE2", "CRC"])
                .add_row(vec![
                    format!("{:#08x}", word.value()),
                    format!("{:#04x}", payload[0]),
                    format!("{:#04x}", payload[1]),
                    format!("{:#04x}", payload[2]),
                    format!("{:#04x}", frame.check_byte()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "word={:#08x} frame=[{:#04x}, {:#04x}, {:#04x}, {:#04x}]",
                word.value(),
                payload[0],
                payload[1],
                payload[2],
                frame.check_byte()
            );
        }
    }
}

#[derive(Serialize)]
struct CheckOutput {
    word: String,
    check_byte: String,
    computed: String,
    policy: &'static str,
    valid: bool,
}

pub fn print_check(
    word: DataWord,
    crc: u8,
    computed: u8,
    strict: bool,
    valid: bool,
    format: OutputFormat,
) {
    let policy = if strict { "strict" } else { "fielded" };
    match format {
        OutputFormat::Json => {
            let out = CheckOutput {
                word: format!("{:#08x}", word.value()),
                check_byte: format!("{crc:#04x}"),
                computed: format!("{computed:#04x}"),
                policy,
                valid,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["WORD", "CRC", "COMPUTED", "POLICY", "VALID"])
                .add_row(vec![
                    format!("{:#08x}", word.value()),
                    format!("{crc:#04x}"),
                    format!("{computed:#04x}"),
                    policy.to_string(),
                    valid.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "word={:#08x} crc={crc:#04x} computed={computed:#04x} policy={policy} valid={valid}",
                word.value()
            );
        }
    }
}
