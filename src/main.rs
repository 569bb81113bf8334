/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::process::ExitCode;

use clap::Parser;
use newt::Cli;

fn main() -> ExitCode {
    // `RUST_LOG` overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    match cli.run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
            ExitCode::FAILURE
        }
    }
}
