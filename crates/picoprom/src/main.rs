use std::path::PathBuf;

use picoprom::{Command, RunInfo};

const USAGE: &str = "Usage: picoprom [run <script> [--dump <path>] | pins]";

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let command = match args.next().as_deref() {
        None => Command::Run(RunInfo::builder().build()),
        Some("run") => {
            let script_path = args.next().map(PathBuf::from).unwrap_or_else(|| {
                eprintln!("{}", USAGE);
                std::process::exit(2);
            });
            let dump_path = match args.next().as_deref() {
                None => None,
                Some("--dump") => Some(args.next().map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--dump expects a path.\n{}", USAGE);
                    std::process::exit(2);
                })),
                Some(other) => {
                    eprintln!("Unknown option '{}'.\n{}", other, USAGE);
                    std::process::exit(2);
                }
            };
            Command::Run(
                RunInfo::builder()
                    .script_path(Some(script_path))
                    .dump_path(dump_path)
                    .build(),
            )
        }
        Some("pins") => Command::Pins,
        Some(other) => {
            eprintln!("Unknown command '{}'.\n{}", other, USAGE);
            std::process::exit(2);
        }
    };

    if let Err(err) = picoprom::execute(command) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
