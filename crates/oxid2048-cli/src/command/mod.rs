use clap::{Parser, Subcommand};

use self::{replay::ReplayArg, simulate::SimulateArg, train::TrainArg};

mod replay;
mod simulate;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play many episodes in parallel and report score statistics
    Simulate(#[clap(flatten)] SimulateArg),
    /// Run a sequential training loop with rolling-average logging
    Train(#[clap(flatten)] TrainArg),
    /// Re-run a recorded game and print its final grid
    Replay(#[clap(flatten)] ReplayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
    }
    Ok(())
}
