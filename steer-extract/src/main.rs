//! Extract a live steering direction stream from a camera

use anyhow::Context;
use camsteer::prelude::v1::*;
use clap::*;
use cv_steer::Strategy;
use log::*;

/// Consecutive lost ticks tolerated before the device is considered dead.
const MAX_CAPTURE_FAILURES: usize = 25;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = Command::new("steer-extract")
        .version(crate_version!())
        .arg(
            Arg::new("strategy")
                .long("strategy")
                .short('s')
                .takes_value(true)
                .default_value("flow"),
        )
        .arg(
            Arg::new("device")
                .long("device")
                .short('d')
                .takes_value(true)
                .default_value("0"),
        )
        .arg(
            Arg::new("ticks")
                .long("ticks")
                .short('t')
                .takes_value(true)
                .required(false),
        )
        .arg(Arg::new("display").long("display").required(false))
        .get_matches();

    let strategy: Strategy = matches.value_of("strategy").unwrap().parse()?;
    let device: i32 = matches.value_of("device").unwrap().parse()?;
    let ticks: Option<usize> = matches.value_of("ticks").map(str::parse).transpose()?;
    let display = matches.occurrences_of("display") > 0;

    let mut detector =
        cv_steer::create_detector(strategy, device, display).context("cannot create detector")?;
    detector.activate().context("cannot open the camera")?;

    let mut failures = 0usize;
    let mut tick = 0usize;

    let result = loop {
        if ticks.map(|limit| tick >= limit).unwrap_or(false) {
            break Ok(());
        }

        match detector.direction() {
            Ok(direction) => {
                failures = 0;
                println!("{}", direction);
            }
            Err(err) if err.is_recoverable() => {
                // One lost tick: stand still and try again.
                failures += 1;
                warn!("capture failed ({} in a row): {}", failures, err);
                println!("{}", Direction::Middle);

                if failures >= MAX_CAPTURE_FAILURES {
                    break Err(anyhow::Error::from(err).context("camera stopped producing frames"));
                }
            }
            Err(err) => break Err(err.into()),
        }

        if display {
            // Any key ends the session.
            if opencv::highgui::wait_key(1)? >= 1 {
                break Ok(());
            }
        }

        tick += 1;
    };

    detector.release();

    result
}
